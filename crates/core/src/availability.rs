//! Busy-date availability model.
//!
//! The backend stores availability sparsely: only days explicitly marked
//! unavailable exist, every other day is available. Locally the busy days
//! are held as a set of [`CalendarDay`]s so that toggling compares days,
//! never instants.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::types::CalendarDay;

/// One entry of the backend availability list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityDate {
    #[serde(with = "calendar_day")]
    pub date: CalendarDay,
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AvailabilityDate {
    pub fn busy(date: CalendarDay) -> Self {
        Self {
            date,
            is_available: false,
            note: None,
        }
    }
}

/// Envelope used by both `GET` and `PUT /calendar/availability`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySnapshot {
    #[serde(default)]
    pub dates: Vec<AvailabilityDate>,
}

/// The set of busy calendar days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusyDates {
    days: BTreeSet<CalendarDay>,
}

impl BusyDates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the entries marked unavailable and project them to their day.
    pub fn load(snapshot: &[AvailabilityDate]) -> Self {
        Self {
            days: snapshot
                .iter()
                .filter(|d| !d.is_available)
                .map(|d| d.date)
                .collect(),
        }
    }

    /// Flip `day` between busy and available. Returns `true` if the day is
    /// busy afterwards.
    pub fn toggle(&mut self, day: CalendarDay) -> bool {
        if self.days.remove(&day) {
            false
        } else {
            self.days.insert(day);
            true
        }
    }

    /// Toggle the UTC calendar day containing `instant`.
    pub fn toggle_instant<Tz: TimeZone>(&mut self, instant: &DateTime<Tz>) -> bool {
        self.toggle(instant.with_timezone(&Utc).date_naive())
    }

    /// Replace the whole set, as a multi-select picker does on change.
    pub fn select<I>(&mut self, days: I)
    where
        I: IntoIterator<Item = CalendarDay>,
    {
        self.days = days.into_iter().collect();
    }

    pub fn is_busy(&self, day: CalendarDay) -> bool {
        self.days.contains(&day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Busy days in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = CalendarDay> + '_ {
        self.days.iter().copied()
    }

    /// Sparse full-replace payload: one unavailable entry per busy day,
    /// ascending. Days absent from the set are implicitly available.
    pub fn save(&self) -> Vec<AvailabilityDate> {
        self.iter().map(AvailabilityDate::busy).collect()
    }

    pub fn to_snapshot(&self) -> AvailabilitySnapshot {
        AvailabilitySnapshot { dates: self.save() }
    }
}

impl FromIterator<CalendarDay> for BusyDates {
    fn from_iter<I: IntoIterator<Item = CalendarDay>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

impl From<&AvailabilitySnapshot> for BusyDates {
    fn from(snapshot: &AvailabilitySnapshot) -> Self {
        Self::load(&snapshot.dates)
    }
}

/// `YYYY-MM-DD` on the wire. Reading also accepts RFC 3339 instants and
/// naive date-times, projected to the UTC day.
mod calendar_day {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(day: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&day.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid calendar day: {raw}")))
    }

    pub(super) fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if let Ok(day) = NaiveDate::parse_from_str(raw, FORMAT) {
            return Some(day);
        }
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Some(instant.with_timezone(&Utc).date_naive());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|dt| dt.date())
    }
}

/// Parse a user-supplied day in any of the accepted wire forms.
pub fn parse_calendar_day(raw: &str) -> Option<CalendarDay> {
    calendar_day::parse(raw)
}
