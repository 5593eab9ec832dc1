//! Jump-to-date index.
//!
//! [`DateIndex`] maps every distinct message date to the index of the first
//! message sent that day. Jumps to a date without messages land on the
//! closest date that has some.
//!
//! # Example
//!
//! ```
//! use chatview::navigation::DateIndex;
//! use chatview::Message;
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let messages = vec![
//!     Message::new(0, "Alice", "Hi").with_date(day(10)),
//!     Message::new(1, "Bob", "Hey").with_date(day(10)),
//!     Message::new(2, "Alice", "Later").with_date(day(20)),
//! ];
//!
//! let index = DateIndex::build(&messages);
//! let jump = index.resolve(day(18))?;
//! assert_eq!(jump.date, day(20));
//! assert_eq!(jump.offset, 2);
//! assert!(!jump.exact);
//! # Ok::<(), chatview::ChatviewError>(())
//! ```

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::Message;
use crate::error::ChatviewError;

/// Result of resolving a jump target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateJump {
    /// Date that will be shown.
    pub date: NaiveDate,
    /// Index of the first message on that date.
    pub offset: usize,
    /// `false` when the requested date had no messages.
    pub exact: bool,
}

/// Distinct message dates and where each one starts.
#[derive(Debug, Clone, Default)]
pub struct DateIndex {
    first: BTreeMap<NaiveDate, usize>,
}

impl DateIndex {
    /// Builds the index. Messages without a parsed date are skipped.
    pub fn build(messages: &[Message]) -> Self {
        let mut first = BTreeMap::new();
        for msg in messages {
            if let Some(date) = msg.date {
                first.entry(date).or_insert(msg.index);
            }
        }
        Self { first }
    }

    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    /// All distinct dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.first.keys().copied()
    }

    /// First and last date.
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.first.keys().next()?;
        let last = self.first.keys().next_back()?;
        Some((*first, *last))
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.distinct(|d| d.year())
    }

    /// Distinct months (1-12) across all years, ascending.
    pub fn months(&self) -> Vec<u32> {
        self.distinct(|d| d.month())
    }

    /// Distinct days of month across all months, ascending.
    pub fn days(&self) -> Vec<u32> {
        self.distinct(|d| d.day())
    }

    fn distinct<T: Ord + Copy>(&self, key: impl Fn(&NaiveDate) -> T) -> Vec<T> {
        self.first
            .keys()
            .map(key)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Index of the first message on `date`, if any.
    pub fn offset_of(&self, date: NaiveDate) -> Option<usize> {
        self.first.get(&date).copied()
    }

    /// Resolves `target` to the exact or closest date with messages.
    ///
    /// Distance is measured in days; on a tie the earlier date wins.
    pub fn resolve(&self, target: NaiveDate) -> Result<DateJump, ChatviewError> {
        if let Some(offset) = self.offset_of(target) {
            return Ok(DateJump {
                date: target,
                offset,
                exact: true,
            });
        }

        let before = self.first.range(..target).next_back();
        let after = self.first.range(target..).next();

        let (date, offset) = match (before, after) {
            (Some(b), Some(a)) => {
                let to_before = (target - *b.0).num_days();
                let to_after = (*a.0 - target).num_days();
                if to_before <= to_after { b } else { a }
            }
            (Some(b), None) => b,
            (None, Some(a)) => a,
            (None, None) => return Err(ChatviewError::NoDates),
        };

        tracing::debug!(%target, closest = %date, "no messages on requested date");
        Ok(DateJump {
            date: *date,
            offset: *offset,
            exact: false,
        })
    }

    /// Resolves a year/month/day selection, validating it first.
    pub fn resolve_parts(&self, year: i32, month: u32, day: u32) -> Result<DateJump, ChatviewError> {
        let target = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| ChatviewError::invalid_date(format!("{year:04}-{month:02}-{day:02}")))?;
        self.resolve(target)
    }
}

/// Parses a user-supplied `YYYY-MM-DD` date.
pub fn parse_target_date(input: &str) -> Result<NaiveDate, ChatviewError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| ChatviewError::invalid_date(input))
}
