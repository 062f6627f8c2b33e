//! Consistency percentage for the habit card progress bar.
//!
//! This is a separate metric from the streak integer: it answers "how many
//! of the recent periods had at least one completion", where the period
//! depends on the habit's frequency.
//!
//! | Frequency | Window                                   |
//! |-----------|------------------------------------------|
//! | daily     | the 7 days ending at `as_of`             |
//! | weekly    | the 4 Sunday-started weeks up to `as_of` |
//! | monthly   | the 3 calendar months up to `as_of`      |
//!
//! The monthly window is an addition to the daily and weekly bars: a plain
//! 7-day or 4-week window would leave monthly habits at 0, so they get their
//! own three-month window instead.

use chrono::{Datelike, Duration, NaiveDate};

use crate::habits::Frequency;

/// Days in the daily window.
pub const DAILY_WINDOW_DAYS: i64 = 7;

/// Weeks in the weekly window.
pub const WEEKLY_WINDOW_WEEKS: i64 = 4;

/// Months in the monthly window.
pub const MONTHLY_WINDOW_MONTHS: i32 = 3;

/// Percentage (0..=100, rounded half up) of periods in the frequency's
/// window that contain at least one completed date.
///
/// `completed` holds distinct completed dates; order does not matter.
pub fn consistency_percent(frequency: Frequency, completed: &[NaiveDate], as_of: NaiveDate) -> i32 {
    match frequency {
        Frequency::Daily => {
            let start = as_of - Duration::days(DAILY_WINDOW_DAYS - 1);
            let hits = completed
                .iter()
                .filter(|d| **d >= start && **d <= as_of)
                .count();
            percent(hits, DAILY_WINDOW_DAYS as usize)
        }
        Frequency::Weekly => {
            let offset = i64::from(as_of.weekday().num_days_from_sunday());
            let current_week_start = as_of - Duration::days(offset);
            let hits = (0..WEEKLY_WINDOW_WEEKS)
                .filter(|i| {
                    let start = current_week_start - Duration::weeks(*i);
                    let end = start + Duration::days(6);
                    completed.iter().any(|d| *d >= start && *d <= end)
                })
                .count();
            percent(hits, WEEKLY_WINDOW_WEEKS as usize)
        }
        Frequency::Monthly => {
            let hits = (0..MONTHLY_WINDOW_MONTHS)
                .filter(|i| {
                    let (year, month) = month_back(as_of, *i);
                    completed
                        .iter()
                        .any(|d| d.year() == year && d.month() == month)
                })
                .count();
            percent(hits, MONTHLY_WINDOW_MONTHS as usize)
        }
    }
}

/// The (year, month) that lies `n` calendar months before `date`'s month.
fn month_back(date: NaiveDate, n: i32) -> (i32, u32) {
    let index = date.year() * 12 + date.month0() as i32 - n;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn percent(hits: usize, periods: usize) -> i32 {
    let hits = hits.min(periods);
    ((hits * 100 + periods / 2) / periods) as i32
}
