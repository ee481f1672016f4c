/// Backend-assigned project identifiers are opaque strings.
pub type ProjectId = String;

/// Backend-assigned contact submission identifiers are opaque strings.
pub type ContactId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A calendar day with no time component.
pub type CalendarDay = chrono::NaiveDate;
