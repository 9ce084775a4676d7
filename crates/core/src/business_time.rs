//! Conversion between business-local calendar input and stored UTC instants.
//!
//! Admins and clients speak in terms of a calendar date plus a time of day in
//! the agency's own timezone. Everything persisted is UTC. [`BusinessTime`]
//! is the single place where one becomes the other.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::errors::{BookingError, BookingResult};

/// Timezone used when none is configured.
pub const DEFAULT_BUSINESS_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;

/// Number of calendar days covered by the weekly slot listing, today included.
pub const WEEK_LISTING_DAYS: usize = 8;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"];
const TIME_LABEL_FORMAT: &str = "%H:%M";

/// Step and bound used to find the first wall-clock reading of a day whose
/// midnight falls in a DST gap. No zone has a gap longer than this bound.
const DAY_START_STEP_MINUTES: i64 = 15;
const DAY_START_SEARCH_MINUTES: i64 = 3 * 60;

/// A validated `[start, end)` interval on a single business-local date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessTime {
    tz: Tz,
}

impl Default for BusinessTime {
    fn default() -> Self {
        Self::new(DEFAULT_BUSINESS_TIMEZONE)
    }
}

impl BusinessTime {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Builds a converter from an IANA timezone name such as `Asia/Kolkata`.
    pub fn from_name(name: &str) -> BookingResult<Self> {
        let tz = name
            .trim()
            .parse::<Tz>()
            .map_err(|err| BookingError::Validation(format!("Unknown timezone '{}': {}", name, err)))?;
        Ok(Self::new(tz))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn parse_date(&self, raw: &str) -> BookingResult<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
            BookingError::InvalidRange(format!("Invalid date '{}', expected YYYY-MM-DD", raw))
        })
    }

    /// Accepts `HH:MM`, `HH:MM:SS` and 12-hour `h:MM AM` forms.
    pub fn parse_time(&self, raw: &str) -> BookingResult<NaiveTime> {
        let raw_trimmed = raw.trim();
        TIME_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(raw_trimmed, format).ok())
            .ok_or_else(|| {
                BookingError::InvalidRange(format!("Invalid time '{}', expected HH:MM", raw))
            })
    }

    /// Resolves a local wall-clock reading to a UTC instant.
    ///
    /// Readings that fall in a DST gap do not exist and are rejected.
    /// Ambiguous readings (DST fold) resolve to the earlier instant.
    pub fn to_utc(&self, date: NaiveDate, time: NaiveTime) -> BookingResult<DateTime<Utc>> {
        match self.tz.from_local_datetime(&date.and_time(time)) {
            LocalResult::Single(local) => Ok(local.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
            LocalResult::None => Err(BookingError::InvalidRange(format!(
                "{} {} does not exist in {}",
                date,
                time.format(TIME_LABEL_FORMAT),
                self.tz.name()
            ))),
        }
    }

    /// Parses and validates a date plus start/end time of day.
    ///
    /// An end of `00:00` after a later start means midnight at the close of
    /// `date`, so `23:30`-`00:00` is a valid last slot of the day.
    pub fn window(&self, date: &str, time_start: &str, time_end: &str) -> BookingResult<SlotWindow> {
        let date = self.parse_date(date)?;
        let start_time = self.parse_time(time_start)?;
        let end_time = self.parse_time(time_end)?;
        let start = self.to_utc(date, start_time)?;
        let end = if end_time == NaiveTime::MIN && start_time > NaiveTime::MIN {
            self.day_bounds(date)?.1
        } else {
            self.to_utc(date, end_time)?
        };

        if end <= start {
            return Err(BookingError::InvalidRange(format!(
                "End time {} must be after start time {}",
                time_end.trim(),
                time_start.trim()
            )));
        }

        Ok(SlotWindow { date, start, end })
    }

    /// UTC bounds `[start of day, start of next day)` of a business-local date.
    pub fn day_bounds(&self, date: NaiveDate) -> BookingResult<(DateTime<Utc>, DateTime<Utc>)> {
        let next = date
            .succ_opt()
            .ok_or_else(|| BookingError::InvalidRange(format!("Date {} is out of range", date)))?;
        Ok((self.day_start(date)?, self.day_start(next)?))
    }

    /// First instant of a local date. Normally midnight; where a DST change
    /// skips midnight, the first wall-clock reading that exists that day.
    fn day_start(&self, date: NaiveDate) -> BookingResult<DateTime<Utc>> {
        let midnight = date.and_time(NaiveTime::MIN);
        (0..=DAY_START_SEARCH_MINUTES)
            .step_by(DAY_START_STEP_MINUTES as usize)
            .find_map(|offset| {
                self.tz
                    .from_local_datetime(&(midnight + Duration::minutes(offset)))
                    .earliest()
            })
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| {
                BookingError::InvalidRange(format!(
                    "Start of {} cannot be resolved in {}",
                    date,
                    self.tz.name()
                ))
            })
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(Utc::now())
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// `HH:MM` label of an instant in business-local time.
    pub fn local_time_label(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.tz)
            .format(TIME_LABEL_FORMAT)
            .to_string()
    }
}

/// Consecutive calendar dates starting at a given day.
///
/// Finite and cheap to clone, so a listing can walk it more than once.
#[derive(Debug, Clone)]
pub struct UpcomingDays {
    next: Option<NaiveDate>,
    remaining: usize,
}

impl UpcomingDays {
    pub fn new(from: NaiveDate, count: usize) -> Self {
        Self {
            next: Some(from),
            remaining: count,
        }
    }

    pub fn week_from(from: NaiveDate) -> Self {
        Self::new(from, WEEK_LISTING_DAYS)
    }

    /// Last date the sequence will yield, if any.
    pub fn final_day(&self) -> Option<NaiveDate> {
        self.clone().last()
    }
}

impl Iterator for UpcomingDays {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = current.succ_opt();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let upper = if self.next.is_some() { self.remaining } else { 0 };
        (0, Some(upper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn kolkata() -> BusinessTime {
        BusinessTime::default()
    }

    #[rstest]
    #[case("09:00")]
    #[case("09:00:00")]
    #[case("9:00 AM")]
    #[case("09:00am")]
    fn parses_supported_time_formats(#[case] raw: &str) {
        let time = kolkata().parse_time(raw).unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[rstest]
    #[case("")]
    #[case("25:00")]
    #[case("nine")]
    fn rejects_malformed_times(#[case] raw: &str) {
        let err = kolkata().parse_time(raw).unwrap_err();
        assert!(matches!(err, BookingError::InvalidRange(_)));
    }

    #[test]
    fn converts_kolkata_wall_clock_to_utc() {
        let window = kolkata().window("2025-06-01", "09:00", "09:30").unwrap();

        assert_eq!(window.start.to_rfc3339(), "2025-06-01T03:30:00+00:00");
        assert_eq!(window.end.to_rfc3339(), "2025-06-01T04:00:00+00:00");
        assert_eq!(window.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[rstest]
    #[case("09:30", "09:00")]
    #[case("09:00", "09:00")]
    fn rejects_inverted_or_empty_windows(#[case] start: &str, #[case] end: &str) {
        let err = kolkata().window("2025-06-01", start, end).unwrap_err();
        assert!(matches!(err, BookingError::InvalidRange(_)));
    }

    #[test]
    fn rejects_nonexistent_local_time() {
        let berlin = BusinessTime::from_name("Europe/Berlin").unwrap();
        let err = berlin.window("2025-03-30", "02:15", "02:45").unwrap_err();
        assert!(matches!(err, BookingError::InvalidRange(_)));
    }

    #[test]
    fn unknown_timezone_name_is_rejected() {
        assert!(BusinessTime::from_name("Mars/Olympus").is_err());
    }

    #[test]
    fn day_bounds_cover_the_local_day() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let (start, end) = kolkata().day_bounds(date).unwrap();

        assert_eq!(start.to_rfc3339(), "2025-05-31T18:30:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-06-01T18:30:00+00:00");
    }

    #[test]
    fn day_bounds_survive_dst_starting_at_midnight() {
        // Chile springs forward from 00:00 to 01:00 on 2025-09-07
        let santiago = BusinessTime::from_name("America/Santiago").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 9, 7).unwrap();

        let (start, end) = santiago.day_bounds(date).unwrap();
        assert_eq!(start.to_rfc3339(), "2025-09-07T04:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-09-08T03:00:00+00:00");

        let (_, previous_end) = santiago.day_bounds(date.pred_opt().unwrap()).unwrap();
        assert_eq!(previous_end, start);
    }

    #[test]
    fn midnight_end_closes_the_day() {
        let time = kolkata();
        let window = time.window("2025-06-01", "23:30", "00:00").unwrap();

        assert_eq!(window.end.to_rfc3339(), "2025-06-01T18:30:00+00:00");
        assert_eq!(time.local_date(window.start), window.date);
        assert_eq!(time.local_time_label(window.end), "00:00");
    }

    #[test]
    fn local_labels_round_trip_input() {
        let time = kolkata();
        let window = time.window("2025-06-01", "23:00", "23:30").unwrap();

        assert_eq!(time.local_date(window.start), window.date);
        assert_eq!(time.local_time_label(window.start), "23:00");
        assert_eq!(time.local_time_label(window.end), "23:30");
    }

    #[test]
    fn upcoming_days_is_finite_and_restartable() {
        let from = NaiveDate::from_ymd_opt(2025, 12, 28).unwrap();
        let days = UpcomingDays::week_from(from);

        let first: Vec<_> = days.clone().collect();
        let second: Vec<_> = days.clone().collect();

        assert_eq!(first.len(), WEEK_LISTING_DAYS);
        assert_eq!(first, second);
        assert_eq!(first[0], from);
        assert_eq!(days.final_day(), NaiveDate::from_ymd_opt(2026, 1, 4));
    }
}
