//! Habit streak calculation.
//!
//! This is the only place streak math lives. The entry write path, the
//! habit read path and the preview endpoint all go through [`evaluate`].
//!
//! A streak is the number of consecutive days with a completed entry, ending
//! on `as_of` or the day before it (the user still has until the end of
//! `as_of` to log today). The reference date is always passed in; nothing in
//! this module reads the clock.
//!
//! Completions dated after `as_of` are ignored by the current streak: the
//! count starts from the newest completion on or before `as_of`. They still
//! count toward the longest run and the completion total. A current streak
//! pinned to a past date therefore matches what it was on that date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::habits::Frequency;
use crate::progress;

/// One logged entry as the calculator sees it.
///
/// `date` is `None` when the source value was missing or could not be parsed.
/// Such records are skipped rather than failing the computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionRecord {
    pub date: Option<NaiveDate>,
    pub completed: bool,
}

impl CompletionRecord {
    pub fn new(date: NaiveDate, completed: bool) -> Self {
        Self {
            date: Some(date),
            completed,
        }
    }

    /// Build a record from a raw date string, keeping it (undated) when the
    /// string does not parse.
    pub fn from_raw(raw_date: &str, completed: bool) -> Self {
        Self {
            date: parse_entry_date(raw_date),
            completed,
        }
    }
}

/// Parse an entry date.
///
/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps; for timestamps only the
/// date part (in the timestamp's own offset) is kept.
pub fn parse_entry_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Distinct completed dates in ascending order, plus the number of undated
/// records.
fn completed_dates(records: &[CompletionRecord]) -> (Vec<NaiveDate>, usize) {
    let mut by_date: BTreeMap<NaiveDate, bool> = BTreeMap::new();
    let mut skipped = 0;
    for record in records {
        match record.date {
            Some(date) => *by_date.entry(date).or_insert(false) |= record.completed,
            None => skipped += 1,
        }
    }
    let days = by_date
        .into_iter()
        .filter_map(|(date, completed)| completed.then_some(date))
        .collect();
    (days, skipped)
}

/// `days` must be sorted ascending and free of duplicates.
fn current_streak(days: &[NaiveDate], as_of: NaiveDate) -> i32 {
    let mut past = days.iter().rev().skip_while(|d| **d > as_of);
    let Some(&most_recent) = past.next() else {
        return 0;
    };
    if (as_of - most_recent).num_days() > 1 {
        return 0;
    }

    let mut streak = 1;
    let mut newer = most_recent;
    for &day in past {
        if (newer - day).num_days() != 1 {
            break;
        }
        streak += 1;
        newer = day;
    }
    streak
}

/// `days` must be sorted ascending and free of duplicates.
fn longest_run(days: &[NaiveDate]) -> i32 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for &day in days {
        run = match previous {
            Some(p) if (day - p).num_days() == 1 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(day);
    }
    best
}

fn to_count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

// ---------------------------------------------------------------------------
// Habit stats
// ---------------------------------------------------------------------------

/// How the stored best streak participates in a recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestStreak {
    /// Keep the stored value as a floor. Used on every entry write and read.
    KeepStored(i32),
    /// Discard the stored value and derive it from entries alone.
    Reset,
}

/// Derived statistics for a habit, as persisted and served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HabitStats {
    pub streak: i32,
    pub best_streak: i32,
    pub total_completions: i32,
    /// Consistency percentage for the habit's frequency (see [`progress`]).
    pub progress_percent: i32,
}

/// A stats computation plus diagnostics for the caller to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub stats: HabitStats,
    pub skipped: usize,
}

/// Compute the full stats block for one habit as of `as_of`.
///
/// With [`BestStreak::KeepStored`] the best streak never decreases, so an
/// empty or shrunken entry set leaves history untouched.
pub fn evaluate(
    frequency: Frequency,
    records: &[CompletionRecord],
    best: BestStreak,
    as_of: NaiveDate,
) -> Evaluation {
    let (days, skipped) = completed_dates(records);
    let current = current_streak(&days, as_of);
    let derived_best = longest_run(&days).max(current);

    let best_streak = match best {
        BestStreak::KeepStored(stored) => stored.max(derived_best),
        BestStreak::Reset => derived_best,
    };

    Evaluation {
        stats: HabitStats {
            streak: current,
            best_streak,
            total_completions: to_count(days.len()),
            progress_percent: progress::consistency_percent(frequency, &days, as_of),
        },
        skipped,
    }
}
