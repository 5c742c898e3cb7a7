//! Recurrence rule parsing and next-occurrence calculation.
//!
//! A task's `repeat` field holds one of:
//!
//! - `d <n>`: every `n` days, `1 <= n <= 400`
//! - `y`: every year on the same day
//!
//! Weekly (`w`) and monthly (`m`) rules are reserved and always rejected, as
//! is any other leading token.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::dates::{add_years, format_date, parse_date, MAX_YEAR};
use crate::error::RecurrenceError;

/// Largest accepted interval for a `d` rule.
pub const MAX_DAY_INTERVAL: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceRule {
    EveryNDays(u32),
    EveryYear,
}

impl FromStr for RecurrenceRule {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(RecurrenceError::EmptyRule);
        }

        let mut tokens = s.split_whitespace();
        match tokens.next() {
            Some("d") => {
                let raw = tokens.next().ok_or(RecurrenceError::MissingDayParam)?;
                let days: i64 = raw
                    .parse()
                    .map_err(|_| RecurrenceError::NonNumericDay(raw.to_string()))?;
                if days < 1 {
                    return Err(RecurrenceError::DayIntervalNotPositive);
                }
                match u32::try_from(days) {
                    Ok(days) if days <= MAX_DAY_INTERVAL => Ok(RecurrenceRule::EveryNDays(days)),
                    _ => Err(RecurrenceError::DayIntervalTooLarge(days)),
                }
            }
            Some("y") => Ok(RecurrenceRule::EveryYear),
            Some(other) => Err(RecurrenceError::UnsupportedRuleKind(other.to_string())),
            None => Err(RecurrenceError::UnsupportedRuleKind(s.to_string())),
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceRule::EveryNDays(days) => write!(f, "d {}", days),
            RecurrenceRule::EveryYear => write!(f, "y"),
        }
    }
}

impl RecurrenceRule {
    /// Returns the first occurrence strictly after `base` that is not before
    /// `now`.
    ///
    /// The first step is unconditional, so the result is always at least one
    /// full interval past `base`. Dates are compared at midnight: when `now`
    /// carries a time of day, its own calendar day already counts as "before
    /// now" and is skipped. Returns `None` when the result would fall after
    /// year [`MAX_YEAR`], which the fixed date format cannot represent.
    pub fn next_occurrence(&self, now: NaiveDateTime, base: NaiveDate) -> Option<NaiveDate> {
        self.step_past(now, base).filter(|date| date.year() <= MAX_YEAR)
    }

    fn step_past(&self, now: NaiveDateTime, base: NaiveDate) -> Option<NaiveDate> {
        let threshold = first_day_not_before(now)?;

        match *self {
            RecurrenceRule::EveryNDays(days) => {
                let step = i64::from(days);
                let first = base.checked_add_days(Days::new(u64::from(days)))?;
                if first >= threshold {
                    return Some(first);
                }
                // Smallest k with base + k * step >= threshold; k > 1 here.
                let gap = (threshold - base).num_days();
                let steps = (gap + step - 1) / step;
                base.checked_add_days(Days::new(u64::try_from(steps * step).ok()?))
            }
            RecurrenceRule::EveryYear => {
                // Stepping from the previous candidate matters after a Feb 29
                // rollover, so this one iterates.
                let mut candidate = add_years(base, 1)?;
                while candidate < threshold {
                    candidate = add_years(candidate, 1)?;
                }
                Some(candidate)
            }
        }
    }
}

/// Earliest calendar day whose midnight is not before `now`.
fn first_day_not_before(now: NaiveDateTime) -> Option<NaiveDate> {
    if now.time() == NaiveTime::MIN {
        Some(now.date())
    } else {
        now.date().succ_opt()
    }
}

/// Computes the next date for a task from its stored date and repeat rule.
///
/// Callers must not pass an empty rule: one-off tasks have no next date and
/// the empty string is reported as [`RecurrenceError::EmptyRule`].
pub fn next_date(now: NaiveDateTime, base: &str, rule: &str) -> Result<String, RecurrenceError> {
    if rule.is_empty() {
        return Err(RecurrenceError::EmptyRule);
    }
    let base_date =
        parse_date(base).map_err(|_| RecurrenceError::InvalidDate(base.to_string()))?;
    let parsed: RecurrenceRule = rule.parse()?;

    parsed
        .next_occurrence(now, base_date)
        .map(format_date)
        .ok_or(RecurrenceError::DateOutOfRange)
}
