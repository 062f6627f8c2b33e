/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (habit entries, report windows) carry no time-of-day.
pub type CalendarDate = chrono::NaiveDate;
