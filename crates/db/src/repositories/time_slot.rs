use crate::models::DbTimeSlot;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

const SELECT_TIME_SLOT: &str = r#"
    SELECT s.id, s.start_time, s.end_time, s.is_booked, b.id AS booking_id, s.created_at
    FROM time_slots s
    LEFT JOIN bookings b ON b.slot_id = s.id
"#;

pub async fn create_time_slot(
    pool: &Pool<Postgres>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<DbTimeSlot> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let time_slot = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        INSERT INTO time_slots (id, start_time, end_time, is_booked, created_at)
        VALUES ($1, $2, $3, FALSE, $4)
        RETURNING id, start_time, end_time, is_booked, NULL::uuid AS booking_id, created_at
        "#,
    )
    .bind(id)
    .bind(start_time)
    .bind(end_time)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(time_slot)
}

pub async fn get_time_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!("{SELECT_TIME_SLOT} WHERE s.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(time_slot)
}

pub async fn get_time_slot_by_window(
    pool: &Pool<Postgres>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        "{SELECT_TIME_SLOT} WHERE s.start_time = $1 AND s.end_time = $2"
    ))
    .bind(start_time)
    .bind(end_time)
    .fetch_optional(pool)
    .await?;

    Ok(time_slot)
}

pub async fn get_overlapping_time_slots(
    pool: &Pool<Postgres>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<Vec<DbTimeSlot>> {
    let time_slots = sqlx::query_as::<_, DbTimeSlot>(&format!(
        "{SELECT_TIME_SLOT} WHERE s.start_time < $2 AND s.end_time > $1 ORDER BY s.start_time ASC"
    ))
    .bind(start_time)
    .bind(end_time)
    .fetch_all(pool)
    .await?;

    Ok(time_slots)
}

pub async fn get_time_slots_between(
    pool: &Pool<Postgres>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<DbTimeSlot>> {
    let time_slots = sqlx::query_as::<_, DbTimeSlot>(&format!(
        "{SELECT_TIME_SLOT} WHERE s.start_time >= $1 AND s.start_time < $2 ORDER BY s.start_time ASC"
    ))
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(time_slots)
}

/// Deletes the slot only while it is free. Returns whether a row was removed.
pub async fn delete_free_time_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM time_slots
        WHERE id = $1 AND is_booked = FALSE
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Conditional flip from free to booked. Returns false when the slot is
/// missing or already booked.
pub async fn mark_time_slot_booked<'e, E>(executor: E, id: Uuid) -> Result<bool>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE time_slots
        SET is_booked = TRUE
        WHERE id = $1 AND is_booked = FALSE
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn mark_time_slot_free<'e, E>(executor: E, id: Uuid) -> Result<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        UPDATE time_slots
        SET is_booked = FALSE
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(())
}
