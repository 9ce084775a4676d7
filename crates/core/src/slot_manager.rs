use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::business_time::{BusinessTime, UpcomingDays};
use crate::errors::{BookingError, BookingResult};
use crate::models::time_slot::{DaySlots, NewTimeSlot, TimeSlot};
use crate::store::SlotStore;

/// Creates, removes and lists bookable slots.
#[derive(Clone)]
pub struct SlotManager {
    store: Arc<dyn SlotStore>,
    time: BusinessTime,
}

impl SlotManager {
    pub fn new(store: Arc<dyn SlotStore>, time: BusinessTime) -> Self {
        Self { store, time }
    }

    pub fn business_time(&self) -> &BusinessTime {
        &self.time
    }

    /// Creates a free slot from a business-local date and time range.
    ///
    /// # Errors
    ///
    /// * `BookingError::InvalidRange` - unparsable input or end not after start
    /// * `BookingError::SlotClash` - the window overlaps an existing slot
    pub async fn create_slot(
        &self,
        date: &str,
        time_start: &str,
        time_end: &str,
    ) -> BookingResult<TimeSlot> {
        let window = self.time.window(date, time_start, time_end)?;

        let clashes = self.store.find_overlapping(window.start, window.end).await?;
        if let Some(existing) = clashes.first() {
            warn!(
                existing_slot = %existing.id,
                start = %window.start,
                end = %window.end,
                "Rejected overlapping slot"
            );
            return Err(BookingError::SlotClash(format!(
                "{} {}-{} overlaps the slot {}-{}",
                window.date,
                time_start.trim(),
                time_end.trim(),
                self.time.local_time_label(existing.start_time),
                self.time.local_time_label(existing.end_time),
            )));
        }

        let slot = self.store.insert_slot(NewTimeSlot::from(window)).await?;
        info!(slot_id = %slot.id, start = %slot.start_time, end = %slot.end_time, "Time slot created");
        Ok(slot)
    }

    /// Deletes a slot that is not currently booked.
    pub async fn delete_slot(&self, id: Uuid) -> BookingResult<()> {
        // A failed conditional delete is either a missing slot, a booked one,
        // or a slot freed between the two calls; the last case gets one retry.
        for _ in 0..2 {
            if self.store.delete_free_slot(id).await? {
                info!(slot_id = %id, "Time slot deleted");
                return Ok(());
            }

            match self.store.get_slot(id).await? {
                None => {
                    return Err(BookingError::NotFound(format!(
                        "Time slot with ID {} not found",
                        id
                    )));
                }
                Some(slot) if slot.is_booked => {
                    warn!(slot_id = %id, "Refused to delete booked slot");
                    return Err(BookingError::SlotBooked(format!(
                        "Time slot {} is booked and cannot be deleted",
                        id
                    )));
                }
                Some(_) => continue,
            }
        }

        Err(BookingError::SlotBooked(format!(
            "Time slot {} is booked and cannot be deleted",
            id
        )))
    }

    /// Slots starting on the given business-local date, earliest first.
    pub async fn list_slots_by_date(&self, date: &str) -> BookingResult<Vec<TimeSlot>> {
        let date = self.time.parse_date(date)?;
        let (from, to) = self.time.day_bounds(date)?;
        debug!(%date, %from, %to, "Listing slots for date");
        self.store.list_slots_between(from, to).await
    }

    /// Slots for today and the following seven days.
    pub async fn list_weekly_slots(&self) -> BookingResult<Vec<DaySlots>> {
        self.list_slots_for_days(UpcomingDays::week_from(self.time.today()))
            .await
    }

    /// One entry per day in `days`, each with that day's slots. Reads the
    /// store once per call and returns the grouped days eagerly; only the
    /// date sequence itself is lazy.
    pub async fn list_slots_for_days(&self, days: UpcomingDays) -> BookingResult<Vec<DaySlots>> {
        let (Some(first), Some(last)) = (days.clone().next(), days.final_day()) else {
            return Ok(Vec::new());
        };
        let (from, _) = self.time.day_bounds(first)?;
        let (_, to) = self.time.day_bounds(last)?;

        let slots = self.store.list_slots_between(from, to).await?;

        let mut listing: Vec<DaySlots> = days
            .map(|date| DaySlots {
                date,
                slots: Vec::new(),
            })
            .collect();
        for slot in slots {
            let date = self.time.local_date(slot.start_time);
            if let Some(day) = listing.iter_mut().find(|day| day.date == date) {
                day.slots.push(slot);
            }
        }

        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn manager() -> (Arc<MemoryStore>, SlotManager) {
        let store = Arc::new(MemoryStore::new());
        let manager = SlotManager::new(store.clone(), BusinessTime::default());
        (store, manager)
    }

    #[tokio::test]
    async fn creates_free_slot() {
        let (_, manager) = manager();

        let slot = manager.create_slot("2025-06-01", "09:00", "09:30").await.unwrap();

        assert!(!slot.is_booked);
        assert_eq!(slot.booking, None);
        assert_eq!((slot.end_time - slot.start_time).num_minutes(), 30);
    }

    #[rstest]
    #[case("09:00", "09:30")]
    #[case("09:15", "09:45")]
    #[case("08:45", "09:15")]
    #[case("08:00", "10:00")]
    #[case("09:10", "09:20")]
    #[tokio::test]
    async fn rejects_overlapping_slots(#[case] start: &str, #[case] end: &str) {
        let (store, manager) = manager();
        manager.create_slot("2025-06-01", "09:00", "09:30").await.unwrap();

        let err = manager.create_slot("2025-06-01", start, end).await.unwrap_err();

        assert!(matches!(err, BookingError::SlotClash(_)));
        assert_eq!(store.snapshot_slots().unwrap().len(), 1);
    }

    #[rstest]
    #[case("08:30", "09:00")]
    #[case("09:30", "10:00")]
    #[tokio::test]
    async fn adjacent_slots_do_not_clash(#[case] start: &str, #[case] end: &str) {
        let (store, manager) = manager();
        manager.create_slot("2025-06-01", "09:00", "09:30").await.unwrap();

        manager.create_slot("2025-06-01", start, end).await.unwrap();

        assert_eq!(store.snapshot_slots().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn stored_slots_never_overlap() {
        let (store, manager) = manager();
        let attempts = [
            ("09:00", "09:30"),
            ("09:20", "09:50"),
            ("09:30", "10:00"),
            ("09:45", "10:15"),
            ("10:00", "11:00"),
            ("10:30", "10:45"),
            ("11:00", "11:30"),
        ];
        for (start, end) in attempts {
            let _ = manager.create_slot("2025-06-01", start, end).await;
        }

        let slots = store.snapshot_slots().unwrap();
        for (i, a) in slots.iter().enumerate() {
            for b in slots.iter().skip(i + 1) {
                assert!(
                    !(a.start_time < b.end_time && b.start_time < a.end_time),
                    "{:?} overlaps {:?}",
                    a,
                    b
                );
            }
        }
        assert_eq!(slots.len(), 4);
    }

    #[tokio::test]
    async fn invalid_range_is_rejected_without_writing() {
        let (store, manager) = manager();

        let err = manager.create_slot("2025-06-01", "10:00", "09:00").await.unwrap_err();
        assert!(matches!(err, BookingError::InvalidRange(_)));

        let err = manager.create_slot("01/06/2025", "09:00", "09:30").await.unwrap_err();
        assert!(matches!(err, BookingError::InvalidRange(_)));

        assert!(store.snapshot_slots().unwrap().is_empty());
    }

    #[tokio::test]
    async fn deletes_free_slot_and_reports_missing() {
        let (store, manager) = manager();
        let slot = manager.create_slot("2025-06-01", "09:00", "09:30").await.unwrap();

        manager.delete_slot(slot.id).await.unwrap();
        assert!(store.snapshot_slots().unwrap().is_empty());

        let err = manager.delete_slot(slot.id).await.unwrap_err();
        assert!(matches!(err, BookingError::NotFound(_)));
    }

    #[tokio::test]
    async fn lists_slots_for_local_day_in_order() {
        let (_, manager) = manager();
        manager.create_slot("2025-06-01", "14:00", "14:30").await.unwrap();
        manager.create_slot("2025-06-01", "00:00", "00:30").await.unwrap();
        manager.create_slot("2025-06-01", "23:30", "00:00").await.unwrap();
        manager.create_slot("2025-06-02", "00:00", "00:30").await.unwrap();
        manager.create_slot("2025-05-31", "23:30", "00:00").await.unwrap();

        let slots = manager.list_slots_by_date("2025-06-01").await.unwrap();
        let labels: Vec<String> = slots
            .iter()
            .map(|slot| manager.business_time().local_time_label(slot.start_time))
            .collect();

        assert_eq!(labels, vec!["00:00", "14:00", "23:30"]);
    }

    #[tokio::test]
    async fn lists_slots_on_day_without_local_midnight() {
        let store = Arc::new(MemoryStore::new());
        let santiago = BusinessTime::from_name("America/Santiago").unwrap();
        let manager = SlotManager::new(store, santiago);
        manager.create_slot("2025-09-07", "10:00", "10:30").await.unwrap();

        let slots = manager.list_slots_by_date("2025-09-07").await.unwrap();
        assert_eq!(slots.len(), 1);

        let from = NaiveDate::from_ymd_opt(2025, 9, 4).unwrap();
        let week = manager
            .list_slots_for_days(UpcomingDays::week_from(from))
            .await
            .unwrap();
        assert_eq!(week[3].date, NaiveDate::from_ymd_opt(2025, 9, 7).unwrap());
        assert_eq!(week[3].slots.len(), 1);
    }

    #[tokio::test]
    async fn lists_eight_days_with_their_slots() {
        let (_, manager) = manager();
        manager.create_slot("2025-06-01", "09:00", "09:30").await.unwrap();
        manager.create_slot("2025-06-03", "10:00", "10:30").await.unwrap();
        manager.create_slot("2025-06-03", "09:00", "09:30").await.unwrap();
        manager.create_slot("2025-06-09", "09:00", "09:30").await.unwrap();

        let from = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let week = manager
            .list_slots_for_days(UpcomingDays::week_from(from))
            .await
            .unwrap();

        assert_eq!(week.len(), 8);
        assert_eq!(week[0].date, from);
        assert_eq!(week[7].date, NaiveDate::from_ymd_opt(2025, 6, 8).unwrap());
        let counts: Vec<usize> = week.iter().map(|day| day.slots.len()).collect();
        assert_eq!(counts, vec![1, 0, 2, 0, 0, 0, 0, 0]);
        assert!(week[2].slots[0].start_time < week[2].slots[1].start_time);
    }

    #[tokio::test]
    async fn weekly_listing_is_recomputed_each_call() {
        let (_, manager) = manager();
        let today = manager.business_time().today().to_string();

        let before = manager.list_weekly_slots().await.unwrap();
        manager.create_slot(&today, "23:00", "23:30").await.unwrap();
        let after = manager.list_weekly_slots().await.unwrap();

        assert_eq!(before.len(), 8);
        assert!(before[0].slots.is_empty());
        assert_eq!(after[0].slots.len(), 1);
    }
}
