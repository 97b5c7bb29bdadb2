//! Weekly recurrence model and the pure schedule calculator.
//!
//! All functions here are deterministic given a recurrence and a reference
//! instant. Instants are `NaiveDateTime` wall-clock values in the user's
//! calendar timezone; callers at the process edge pass
//! `Local::now().naive_local()`.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Day of the week, calendar-numbered: Sunday = 1 .. Saturday = 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Weekday {
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Calendar raw value, Sunday = 1 .. Saturday = 7.
    pub fn raw(self) -> u8 {
        self as u8
    }

    pub fn from_raw(raw: u8) -> Option<Self> {
        Self::ALL.get(raw.checked_sub(1)? as usize).copied()
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    /// Case-insensitive name lookup, accepting three-letter prefixes ("fri").
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_ascii_lowercase();
        if lower.len() < 3 {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|d| d.display_name().to_ascii_lowercase().starts_with(&lower))
    }
}

impl From<Weekday> for u8 {
    fn from(day: Weekday) -> u8 {
        day.raw()
    }
}

impl TryFrom<u8> for Weekday {
    type Error = String;

    fn try_from(raw: u8) -> std::result::Result<Self, Self::Error> {
        Weekday::from_raw(raw).ok_or_else(|| format!("weekday out of range: {raw}"))
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        // number_from_sunday is 1..=7, always in range.
        Weekday::from_raw(day.number_from_sunday() as u8).unwrap_or(Weekday::Sunday)
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The weekly Sabbath window definition.
///
/// Start and end need not be ordered; the window may wrap past Saturday.
/// A same-day window with `start >= end` is empty rather than invalid.
/// Replaced wholesale on update, never mutated field-by-field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRecurrence {
    #[serde(default = "default_start_day")]
    pub start_day: Weekday,
    #[serde(default = "default_start_hour")]
    pub start_hour: u8,
    #[serde(default)]
    pub start_minute: u8,
    #[serde(default = "default_end_day")]
    pub end_day: Weekday,
    #[serde(default = "default_end_hour")]
    pub end_hour: u8,
    #[serde(default = "default_end_minute")]
    pub end_minute: u8,
}

fn default_start_day() -> Weekday {
    Weekday::Friday
}
fn default_start_hour() -> u8 {
    18
}
fn default_end_day() -> Weekday {
    Weekday::Saturday
}
fn default_end_hour() -> u8 {
    19
}
fn default_end_minute() -> u8 {
    30
}

impl Default for WeeklyRecurrence {
    /// Friday 18:00 (sunset) to Saturday 19:30 (nightfall).
    fn default() -> Self {
        Self {
            start_day: Weekday::Friday,
            start_hour: 18,
            start_minute: 0,
            end_day: Weekday::Saturday,
            end_hour: 19,
            end_minute: 30,
        }
    }
}

impl WeeklyRecurrence {
    pub fn validate(&self) -> Result<()> {
        for (field, value, max) in [
            ("start_hour", self.start_hour, 23),
            ("end_hour", self.end_hour, 23),
            ("start_minute", self.start_minute, 59),
            ("end_minute", self.end_minute, 59),
        ] {
            if value > max {
                return Err(CoreError::Validation {
                    field: field.into(),
                    message: format!("{value} exceeds maximum {max}"),
                });
            }
        }
        Ok(())
    }

    fn start_minutes(&self) -> u32 {
        self.start_hour as u32 * 60 + self.start_minute as u32
    }

    fn end_minutes(&self) -> u32 {
        self.end_hour as u32 * 60 + self.end_minute as u32
    }

    /// Whether `at` falls inside the Sabbath window.
    pub fn is_within(&self, at: NaiveDateTime) -> bool {
        let weekday = at.weekday().number_from_sunday() as u8;
        let minutes = at.hour() * 60 + at.minute();

        let start_day = self.start_day.raw();
        let end_day = self.end_day.raw();
        let start_min = self.start_minutes();
        let end_min = self.end_minutes();

        if start_day == end_day {
            // Same-day window; start >= end is legal and empty.
            return weekday == start_day && minutes >= start_min && minutes < end_min;
        }

        if weekday == start_day && minutes >= start_min {
            return true;
        }
        if weekday == end_day && minutes < end_min {
            return true;
        }

        // Days strictly between start and end, going forward through the week.
        if start_day < end_day {
            weekday > start_day && weekday < end_day
        } else {
            // Wraps past Saturday.
            weekday > start_day || weekday < end_day
        }
    }

    /// Next instant >= `reference` matching the start weekday and time.
    pub fn next_start(&self, reference: NaiveDateTime) -> Result<NaiveDateTime> {
        next_occurrence(
            self.start_day,
            self.start_hour,
            self.start_minute,
            reference,
        )
    }

    /// Next instant >= `reference` matching the end weekday and time.
    pub fn next_end(&self, reference: NaiveDateTime) -> Result<NaiveDateTime> {
        next_occurrence(self.end_day, self.end_hour, self.end_minute, reference)
    }

    /// Whichever boundary comes first from `reference`.
    pub fn next_boundary(&self, reference: NaiveDateTime) -> Result<(BoundaryKind, NaiveDateTime)> {
        let start = self.next_start(reference)?;
        let end = self.next_end(reference)?;
        if end <= start {
            Ok((BoundaryKind::End, end))
        } else {
            Ok((BoundaryKind::Start, start))
        }
    }
}

/// Which edge of the window a boundary instant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryKind {
    Start,
    End,
}

/// Smallest instant >= `reference` with the given weekday, hour and minute
/// (seconds zeroed). The weekday recurs within 7 days, so the scan is bounded;
/// exhausting it means a caller bug and is surfaced as an internal error.
fn next_occurrence(
    day: Weekday,
    hour: u8,
    minute: u8,
    reference: NaiveDateTime,
) -> Result<NaiveDateTime> {
    for offset in 0..=7i64 {
        let date = reference.date() + Duration::days(offset);
        if date.weekday().number_from_sunday() as u8 != day.raw() {
            continue;
        }
        let candidate = date
            .and_hms_opt(hour as u32, minute as u32, 0)
            .ok_or_else(|| {
                CoreError::Internal(format!("invalid time of day: {hour:02}:{minute:02}"))
            })?;
        if candidate >= reference {
            return Ok(candidate);
        }
    }
    Err(CoreError::Internal(format!(
        "no occurrence of {day} {hour:02}:{minute:02} within 7 days of {reference}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn recurrence(
        start_day: Weekday,
        start: (u8, u8),
        end_day: Weekday,
        end: (u8, u8),
    ) -> WeeklyRecurrence {
        WeeklyRecurrence {
            start_day,
            start_hour: start.0,
            start_minute: start.1,
            end_day,
            end_hour: end.0,
            end_minute: end.1,
        }
    }

    // 2024-01-05 is a Friday; 01-06 Saturday; 01-07 Sunday.

    #[test]
    fn default_window_friday_evening_inside() {
        let r = WeeklyRecurrence::default();
        assert!(r.is_within(at(2024, 1, 5, 20, 0)));
    }

    #[test]
    fn default_window_saturday_night_outside() {
        let r = WeeklyRecurrence::default();
        assert!(!r.is_within(at(2024, 1, 6, 20, 0)));
    }

    #[test]
    fn default_window_saturday_morning_inside() {
        let r = WeeklyRecurrence::default();
        assert!(r.is_within(at(2024, 1, 6, 9, 0)));
    }

    #[test]
    fn boundary_start_is_inside_end_is_outside() {
        let r = WeeklyRecurrence::default();
        assert!(r.is_within(at(2024, 1, 5, 18, 0)));
        assert!(!r.is_within(at(2024, 1, 5, 17, 59)));
        assert!(r.is_within(at(2024, 1, 6, 19, 29)));
        assert!(!r.is_within(at(2024, 1, 6, 19, 30)));
    }

    #[test]
    fn same_day_window() {
        let r = recurrence(Weekday::Wednesday, (9, 0), Weekday::Wednesday, (17, 0));
        // 2024-01-03 is a Wednesday.
        assert!(r.is_within(at(2024, 1, 3, 12, 0)));
        assert!(!r.is_within(at(2024, 1, 3, 8, 59)));
        assert!(!r.is_within(at(2024, 1, 3, 17, 0)));
        assert!(!r.is_within(at(2024, 1, 4, 12, 0)));
    }

    #[test]
    fn same_day_inverted_window_is_empty() {
        let r = recurrence(Weekday::Wednesday, (17, 0), Weekday::Wednesday, (9, 0));
        for hour in 0..24 {
            assert!(!r.is_within(at(2024, 1, 3, hour, 30)));
        }
    }

    #[test]
    fn zero_length_window_is_empty() {
        let r = recurrence(Weekday::Monday, (12, 0), Weekday::Monday, (12, 0));
        assert!(!r.is_within(at(2024, 1, 1, 12, 0)));
    }

    #[test]
    fn window_wrapping_past_saturday() {
        let r = recurrence(Weekday::Saturday, (23, 0), Weekday::Sunday, (1, 0));
        assert!(r.is_within(at(2024, 1, 7, 0, 30)));
        assert!(r.is_within(at(2024, 1, 6, 23, 30)));
        assert!(!r.is_within(at(2024, 1, 7, 1, 0)));
        assert!(!r.is_within(at(2024, 1, 6, 22, 59)));
    }

    #[test]
    fn long_wrap_covers_intermediate_days() {
        // Thursday evening through Monday morning.
        let r = recurrence(Weekday::Thursday, (20, 0), Weekday::Monday, (8, 0));
        // Friday, Saturday, Sunday are fully inside.
        assert!(r.is_within(at(2024, 1, 5, 3, 0)));
        assert!(r.is_within(at(2024, 1, 6, 15, 0)));
        assert!(r.is_within(at(2024, 1, 7, 23, 59)));
        // Tuesday is outside.
        assert!(!r.is_within(at(2024, 1, 2, 12, 0)));
    }

    #[test]
    fn next_start_from_midweek() {
        let r = WeeklyRecurrence::default();
        let next = r.next_start(at(2024, 1, 3, 12, 0)).unwrap();
        assert_eq!(next, at(2024, 1, 5, 18, 0));
    }

    #[test]
    fn next_start_same_instant_counts() {
        let r = WeeklyRecurrence::default();
        let reference = at(2024, 1, 5, 18, 0);
        assert_eq!(r.next_start(reference).unwrap(), reference);
    }

    #[test]
    fn next_start_just_after_rolls_a_week() {
        let r = WeeklyRecurrence::default();
        let next = r.next_start(at(2024, 1, 5, 18, 1)).unwrap();
        assert_eq!(next, at(2024, 1, 12, 18, 0));
    }

    #[test]
    fn next_end_from_inside_window() {
        let r = WeeklyRecurrence::default();
        let next = r.next_end(at(2024, 1, 5, 20, 0)).unwrap();
        assert_eq!(next, at(2024, 1, 6, 19, 30));
    }

    #[test]
    fn next_boundary_prefers_sooner_edge() {
        let r = WeeklyRecurrence::default();
        let (kind, when) = r.next_boundary(at(2024, 1, 5, 20, 0)).unwrap();
        assert_eq!(kind, BoundaryKind::End);
        assert_eq!(when, at(2024, 1, 6, 19, 30));

        let (kind, when) = r.next_boundary(at(2024, 1, 3, 12, 0)).unwrap();
        assert_eq!(kind, BoundaryKind::Start);
        assert_eq!(when, at(2024, 1, 5, 18, 0));
    }

    #[test]
    fn validate_rejects_out_of_range_time() {
        let mut r = WeeklyRecurrence::default();
        r.start_hour = 24;
        assert!(r.validate().is_err());
        r.start_hour = 23;
        r.end_minute = 60;
        assert!(r.validate().is_err());
    }

    #[test]
    fn weekday_raw_round_trip() {
        for day in Weekday::ALL {
            assert_eq!(Weekday::from_raw(day.raw()), Some(day));
        }
        assert_eq!(Weekday::from_raw(0), None);
        assert_eq!(Weekday::from_raw(8), None);
    }

    #[test]
    fn weekday_parse() {
        assert_eq!(Weekday::parse("friday"), Some(Weekday::Friday));
        assert_eq!(Weekday::parse("Fri"), Some(Weekday::Friday));
        assert_eq!(Weekday::parse("sun"), Some(Weekday::Sunday));
        assert_eq!(Weekday::parse("sa"), None);
        assert_eq!(Weekday::parse("noday"), None);
    }

    #[test]
    fn recurrence_serde_uses_raw_weekday_numbers() {
        let r = WeeklyRecurrence::default();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["start_day"], 6);
        assert_eq!(json["end_day"], 7);
        let back: WeeklyRecurrence = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }

    /// Expected window length in minutes for a cross-day recurrence.
    fn window_minutes(r: &WeeklyRecurrence) -> u32 {
        let day_span =
            (r.end_day.raw() as i32 - r.start_day.raw() as i32).rem_euclid(7) as u32;
        day_span * 1440 + r.end_minutes() - r.start_minutes()
    }

    /// Sweep every minute of a week and count inside marks and edges.
    fn sweep(r: &WeeklyRecurrence) -> (u32, u32) {
        // Week starting Sunday 2024-01-07 00:00.
        let origin = at(2024, 1, 7, 0, 0);
        let mut inside = 0u32;
        let mut transitions = 0u32;
        let mut prev = r.is_within(origin + Duration::minutes(7 * 1440 - 1));
        for i in 0..7 * 1440 {
            let now = r.is_within(origin + Duration::minutes(i as i64));
            if now {
                inside += 1;
            }
            if now != prev {
                transitions += 1;
            }
            prev = now;
        }
        (inside, transitions)
    }

    #[test]
    fn week_sweep_all_cross_day_pairs() {
        // Every start/end weekday pair with start != end, fixed times.
        for start_day in Weekday::ALL {
            for end_day in Weekday::ALL {
                if start_day == end_day {
                    continue;
                }
                let r = recurrence(start_day, (18, 0), end_day, (19, 30));
                let (inside, transitions) = sweep(&r);
                assert_eq!(inside, window_minutes(&r), "{start_day} -> {end_day}");
                assert_eq!(transitions, 2, "{start_day} -> {end_day}");
            }
        }
    }

    fn arb_weekday() -> impl Strategy<Value = Weekday> {
        (1u8..=7).prop_map(|raw| Weekday::from_raw(raw).unwrap())
    }

    fn arb_recurrence() -> impl Strategy<Value = WeeklyRecurrence> {
        (
            arb_weekday(),
            0u8..24,
            0u8..60,
            arb_weekday(),
            0u8..24,
            0u8..60,
        )
            .prop_map(|(sd, sh, sm, ed, eh, em)| recurrence(sd, (sh, sm), ed, (eh, em)))
    }

    proptest! {
        /// Cross-day windows cover exactly one contiguous arc of the week.
        #[test]
        fn cross_day_window_is_one_arc(r in arb_recurrence()) {
            prop_assume!(r.start_day != r.end_day);
            let (inside, transitions) = sweep(&r);
            prop_assert_eq!(inside, window_minutes(&r));
            prop_assert_eq!(transitions, 2);
        }

        /// next_start is a lower bound and lands on the configured wall time.
        #[test]
        fn next_start_matches_recurrence(
            r in arb_recurrence(),
            day_offset in 0i64..14,
            minute in 0i64..1440,
        ) {
            let reference = at(2024, 1, 1, 0, 0)
                + Duration::days(day_offset)
                + Duration::minutes(minute);
            let next = r.next_start(reference).unwrap();
            prop_assert!(next >= reference);
            prop_assert!(next - reference < Duration::days(8));
            prop_assert_eq!(Weekday::from(next.weekday()), r.start_day);
            prop_assert_eq!(next.hour() as u8, r.start_hour);
            prop_assert_eq!(next.minute() as u8, r.start_minute);
            prop_assert_eq!(next.second(), 0);
        }

        /// Immediately after a start boundary the window is open
        /// (non-degenerate windows only).
        #[test]
        fn instant_after_next_start_is_inside(r in arb_recurrence()) {
            prop_assume!(
                r.start_day != r.end_day || r.start_minutes() < r.end_minutes()
            );
            let next = r.next_start(at(2024, 2, 1, 0, 0)).unwrap();
            prop_assert!(r.is_within(next));
        }
    }
}
