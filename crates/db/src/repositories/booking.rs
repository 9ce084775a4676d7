use crate::models::DbBooking;
use chrono::{DateTime, Utc};
use eyre::Result;
use slotbook_core::models::booking::{BookingStatus, ClientDetails};
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

const SELECT_BOOKING: &str = r#"
    SELECT b.id, b.slot_id, s.start_time, s.end_time,
           b.name, b.email, b.phone, b.location, b.service, b.status, b.created_at
    FROM bookings b
    JOIN time_slots s ON s.id = b.slot_id
"#;

/// Inserts a confirmed booking for the slot and returns it joined with the
/// slot window.
pub async fn create_booking<'e, E>(
    executor: E,
    slot_id: Uuid,
    client: &ClientDetails,
) -> Result<DbBooking>
where
    E: PgExecutor<'e>,
{
    let id = Uuid::new_v4();
    let now = Utc::now();

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        WITH inserted AS (
            INSERT INTO bookings (id, slot_id, name, email, phone, location, service, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
        )
        SELECT i.id, i.slot_id, s.start_time, s.end_time,
               i.name, i.email, i.phone, i.location, i.service, i.status, i.created_at
        FROM inserted i
        JOIN time_slots s ON s.id = i.slot_id
        "#,
    )
    .bind(id)
    .bind(slot_id)
    .bind(&client.name)
    .bind(&client.email)
    .bind(&client.phone)
    .bind(&client.location)
    .bind(&client.service)
    .bind(BookingStatus::Confirmed.as_str())
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(booking)
}

/// Deletes the booking and returns the removed row, if there was one.
pub async fn delete_booking<'e, E>(executor: E, id: Uuid) -> Result<Option<DbBooking>>
where
    E: PgExecutor<'e>,
{
    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        WITH deleted AS (
            DELETE FROM bookings
            WHERE id = $1
            RETURNING *
        )
        SELECT d.id, d.slot_id, s.start_time, s.end_time,
               d.name, d.email, d.phone, d.location, d.service, d.status, d.created_at
        FROM deleted d
        JOIN time_slots s ON s.id = d.slot_id
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(booking)
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!("{SELECT_BOOKING} WHERE b.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(booking)
}

pub async fn get_bookings_between(
    pool: &Pool<Postgres>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        "{SELECT_BOOKING} WHERE s.start_time >= $1 AND s.start_time < $2 ORDER BY s.start_time ASC"
    ))
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn get_all_bookings(pool: &Pool<Postgres>) -> Result<Vec<DbBooking>> {
    let bookings =
        sqlx::query_as::<_, DbBooking>(&format!("{SELECT_BOOKING} ORDER BY s.start_time ASC"))
            .fetch_all(pool)
            .await?;

    Ok(bookings)
}
