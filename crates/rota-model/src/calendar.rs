// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Calendar Construction
//!
//! Builds the ordered, contiguous day sequence a scheduling run operates on.
//! Each day carries its date, a `DayKind`, and the `MonthBucket` used for
//! monthly-quota grouping.
//!
//! Day-kind assignment follows a strict priority: a date in the holiday set
//! is a `Holiday`; otherwise Saturday and Sunday are `Weekend`; everything
//! else is a `Workday`. A holiday falling on a Saturday is therefore a
//! holiday, not a weekend day, which matters for the weekend fairness band.
//!
//! `CalendarBuilder` is a pure function of its inputs: the same range and
//! holiday set always produce the same calendar.

use crate::index::DayIndex;
use chrono::{Datelike, NaiveDate, Weekday};
use rustc_hash::FxHashSet;

/// Classification of a calendar day.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DayKind {
    /// A regular working weekday.
    Workday,
    /// A Saturday or Sunday that is not a designated holiday.
    Weekend,
    /// A designated holiday, regardless of its weekday.
    Holiday,
}

impl std::fmt::Display for DayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayKind::Workday => write!(f, "Workday"),
            DayKind::Weekend => write!(f, "Weekend"),
            DayKind::Holiday => write!(f, "Holiday"),
        }
    }
}

/// The (year, month) bucket a day belongs to, used for monthly quotas.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct MonthBucket {
    year: i32,
    month: u32,
}

impl MonthBucket {
    /// Returns the bucket of the given date.
    #[inline]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the bucket year.
    #[inline]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the bucket month (1-12).
    #[inline]
    pub fn month(&self) -> u32 {
        self.month
    }
}

impl std::fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One day of the scheduling horizon.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Day {
    date: NaiveDate,
    kind: DayKind,
    bucket: MonthBucket,
}

impl Day {
    /// Returns the calendar date of this day.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the day kind.
    #[inline]
    pub fn kind(&self) -> DayKind {
        self.kind
    }

    /// Returns the month bucket this day belongs to.
    #[inline]
    pub fn bucket(&self) -> MonthBucket {
        self.bucket
    }
}

/// The error returned when the end date precedes the start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRangeError {
    /// The requested start date.
    pub start: NaiveDate,
    /// The requested end date.
    pub end: NaiveDate,
}

impl std::fmt::Display for InvalidRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "end date {} precedes start date {}",
            self.end, self.start
        )
    }
}

impl std::error::Error for InvalidRangeError {}

/// An ordered, contiguous, ascending sequence of days.
///
/// Immutable once built. Use [`CalendarBuilder`] to construct one.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use rota_model::calendar::{CalendarBuilder, DayKind};
///
/// let start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
/// let calendar = CalendarBuilder::new(start, end).build().unwrap();
///
/// assert_eq!(calendar.num_days(), 7);
/// // 2025-07-05 is a Saturday.
/// assert_eq!(calendar.days()[4].kind(), DayKind::Weekend);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Calendar {
    days: Vec<Day>,
}

impl Calendar {
    /// Returns the number of days in the horizon.
    #[inline]
    pub fn num_days(&self) -> usize {
        self.days.len()
    }

    /// Returns the day at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `day_index` is out of bounds.
    #[inline]
    pub fn day(&self, day_index: DayIndex) -> &Day {
        &self.days[day_index.get()]
    }

    /// Returns all days in ascending date order.
    #[inline]
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// Returns the first date of the horizon.
    #[inline]
    pub fn start(&self) -> NaiveDate {
        self.days[0].date
    }

    /// Returns the last date of the horizon.
    #[inline]
    pub fn end(&self) -> NaiveDate {
        self.days[self.days.len() - 1].date
    }

    /// Returns the index of `date` within the horizon, or `None` if outside.
    #[inline]
    pub fn index_of(&self, date: NaiveDate) -> Option<DayIndex> {
        let offset = date.signed_duration_since(self.start()).num_days();
        if offset < 0 || offset as usize >= self.num_days() {
            return None;
        }
        Some(DayIndex::new(offset as usize))
    }

    /// Returns `true` if `date` lies within the horizon.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.index_of(date).is_some()
    }

    /// Returns the indices of all days of the given kind, ascending.
    pub fn days_of_kind(&self, kind: DayKind) -> Vec<DayIndex> {
        self.days
            .iter()
            .enumerate()
            .filter(|(_, day)| day.kind == kind)
            .map(|(index, _)| DayIndex::new(index))
            .collect()
    }

    /// Groups the day indices of the horizon by month bucket.
    ///
    /// Buckets are returned in ascending chronological order; since the day
    /// sequence is contiguous, every bucket's index list is a consecutive run.
    pub fn month_buckets(&self) -> Vec<(MonthBucket, Vec<DayIndex>)> {
        let mut buckets: Vec<(MonthBucket, Vec<DayIndex>)> = Vec::new();
        for (index, day) in self.days.iter().enumerate() {
            match buckets.last_mut() {
                Some((bucket, indices)) if *bucket == day.bucket => {
                    indices.push(DayIndex::new(index));
                }
                _ => buckets.push((day.bucket, vec![DayIndex::new(index)])),
            }
        }
        buckets
    }
}

/// Builds a [`Calendar`] from an inclusive date range and a holiday set.
///
/// Duplicate holiday entries are ignored. Holiday dates outside the range
/// never match a generated day and are inert at this layer; the pipeline
/// validator rejects them before this builder runs.
#[derive(Clone, Debug)]
pub struct CalendarBuilder {
    start: NaiveDate,
    end: NaiveDate,
    holidays: FxHashSet<NaiveDate>,
}

impl CalendarBuilder {
    /// Creates a builder for the inclusive range `[start, end]`.
    #[inline]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            holidays: FxHashSet::default(),
        }
    }

    /// Marks a single date as a holiday.
    #[inline]
    pub fn holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.insert(date);
        self
    }

    /// Marks every date in the iterator as a holiday.
    #[inline]
    pub fn holidays<I>(mut self, dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.holidays.extend(dates);
        self
    }

    /// Builds the calendar.
    ///
    /// Fails with [`InvalidRangeError`] when the end date precedes the start
    /// date. Otherwise infallible and deterministic.
    pub fn build(self) -> Result<Calendar, InvalidRangeError> {
        if self.end < self.start {
            return Err(InvalidRangeError {
                start: self.start,
                end: self.end,
            });
        }

        let days = self
            .start
            .iter_days()
            .take_while(|date| *date <= self.end)
            .map(|date| {
                let kind = if self.holidays.contains(&date) {
                    DayKind::Holiday
                } else if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                    DayKind::Weekend
                } else {
                    DayKind::Workday
                };
                Day {
                    date,
                    kind,
                    bucket: MonthBucket::of(date),
                }
            })
            .collect();

        Ok(Calendar { days })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_build_contiguous_ascending_sequence() {
        let calendar = CalendarBuilder::new(date(2025, 7, 1), date(2025, 7, 10))
            .build()
            .unwrap();

        assert_eq!(calendar.num_days(), 10);
        assert_eq!(calendar.start(), date(2025, 7, 1));
        assert_eq!(calendar.end(), date(2025, 7, 10));
        for pair in calendar.days().windows(2) {
            assert_eq!(
                pair[1].date().signed_duration_since(pair[0].date()).num_days(),
                1
            );
        }
    }

    #[test]
    fn test_single_day_range_is_valid() {
        let calendar = CalendarBuilder::new(date(2025, 7, 1), date(2025, 7, 1))
            .build()
            .unwrap();
        assert_eq!(calendar.num_days(), 1);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let result = CalendarBuilder::new(date(2025, 7, 2), date(2025, 7, 1)).build();
        assert_eq!(
            result,
            Err(InvalidRangeError {
                start: date(2025, 7, 2),
                end: date(2025, 7, 1),
            })
        );
    }

    #[test]
    fn test_day_kind_priority_holiday_beats_weekend() {
        // 2025-07-05 is a Saturday.
        let saturday = date(2025, 7, 5);
        let calendar = CalendarBuilder::new(date(2025, 7, 1), date(2025, 7, 7))
            .holiday(saturday)
            .build()
            .unwrap();

        let index = calendar.index_of(saturday).unwrap();
        assert_eq!(calendar.day(index).kind(), DayKind::Holiday);
        // The following Sunday stays a weekend day.
        let sunday = calendar.index_of(date(2025, 7, 6)).unwrap();
        assert_eq!(calendar.day(sunday).kind(), DayKind::Weekend);
    }

    #[test]
    fn test_weekday_classification() {
        let calendar = CalendarBuilder::new(date(2025, 7, 1), date(2025, 7, 7))
            .build()
            .unwrap();

        // Tue 1st through Fri 4th are workdays, Sat/Sun weekend, Mon 7th workday.
        let kinds: Vec<DayKind> = calendar.days().iter().map(|d| d.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                DayKind::Workday,
                DayKind::Workday,
                DayKind::Workday,
                DayKind::Workday,
                DayKind::Weekend,
                DayKind::Weekend,
                DayKind::Workday,
            ]
        );
    }

    #[test]
    fn test_duplicate_holidays_are_ignored() {
        let holiday = date(2025, 7, 3);
        let calendar = CalendarBuilder::new(date(2025, 7, 1), date(2025, 7, 7))
            .holidays([holiday, holiday, holiday])
            .build()
            .unwrap();
        assert_eq!(calendar.days_of_kind(DayKind::Holiday).len(), 1);
    }

    #[test]
    fn test_out_of_range_holiday_is_inert() {
        let calendar = CalendarBuilder::new(date(2025, 7, 1), date(2025, 7, 7))
            .holiday(date(2025, 8, 15))
            .build()
            .unwrap();
        assert!(calendar.days_of_kind(DayKind::Holiday).is_empty());
    }

    #[test]
    fn test_index_of_and_contains() {
        let calendar = CalendarBuilder::new(date(2025, 7, 1), date(2025, 7, 10))
            .build()
            .unwrap();

        assert_eq!(calendar.index_of(date(2025, 7, 1)), Some(DayIndex::new(0)));
        assert_eq!(calendar.index_of(date(2025, 7, 10)), Some(DayIndex::new(9)));
        assert_eq!(calendar.index_of(date(2025, 6, 30)), None);
        assert_eq!(calendar.index_of(date(2025, 7, 11)), None);
        assert!(calendar.contains(date(2025, 7, 5)));
        assert!(!calendar.contains(date(2026, 7, 5)));
    }

    #[test]
    fn test_month_buckets_split_at_month_boundary() {
        let calendar = CalendarBuilder::new(date(2025, 7, 30), date(2025, 8, 2))
            .build()
            .unwrap();

        let buckets = calendar.month_buckets();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].0, MonthBucket::of(date(2025, 7, 1)));
        assert_eq!(buckets[0].1.len(), 2);
        assert_eq!(buckets[1].0, MonthBucket::of(date(2025, 8, 1)));
        assert_eq!(buckets[1].1.len(), 2);
    }

    #[test]
    fn test_month_bucket_ordering() {
        assert!(MonthBucket::of(date(2024, 12, 31)) < MonthBucket::of(date(2025, 1, 1)));
        assert_eq!(format!("{}", MonthBucket::of(date(2025, 7, 4))), "2025-07");
    }
}
