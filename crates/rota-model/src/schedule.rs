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

//! # Schedule Extraction
//!
//! Converts a solved variable binding back into per-day roster rows for the
//! presentation layer. Extraction is pure and deterministic.
//!
//! Under a satisfied coverage constraint every day has exactly
//! `staff_per_day` members on duty, but the extractor stays defensive: rows
//! are padded with empty placeholders when fewer are bound true and
//! truncated when more are, so a malformed binding can never produce a
//! ragged table.

use crate::{
    calendar::{Calendar, DayKind},
    index::{DayIndex, StaffIndex},
    roster::Roster,
    solution::Solution,
};
use chrono::NaiveDate;
use smallvec::SmallVec;

/// One output row: a date, its day kind, and exactly `staff_per_day` duty
/// slots. An empty slot is `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleRow {
    date: NaiveDate,
    kind: DayKind,
    on_duty: SmallVec<[Option<StaffIndex>; 4]>,
}

impl ScheduleRow {
    /// Returns the date of this row.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the day kind of this row.
    #[inline]
    pub fn kind(&self) -> DayKind {
        self.kind
    }

    /// Returns the duty slots, `None` marking an empty placeholder.
    #[inline]
    pub fn on_duty(&self) -> &[Option<StaffIndex>] {
        &self.on_duty
    }

    /// Resolves the duty slots to staff names; an empty slot becomes `""`.
    pub fn names<'a>(&self, roster: &'a Roster) -> Vec<&'a str> {
        self.on_duty
            .iter()
            .map(|slot| match slot {
                Some(staff_index) => roster.member(*staff_index).name(),
                None => "",
            })
            .collect()
    }
}

/// The full output table, one row per calendar day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    rows: Vec<ScheduleRow>,
}

impl Schedule {
    /// Extracts the schedule from a solved binding.
    ///
    /// Each row receives exactly `staff_per_day` slots regardless of how
    /// many variables the binding set true for that day.
    pub fn extract(calendar: &Calendar, solution: &Solution, staff_per_day: u32) -> Self {
        let slots = staff_per_day as usize;
        let rows = calendar
            .days()
            .iter()
            .enumerate()
            .map(|(day, descriptor)| {
                let mut on_duty: SmallVec<[Option<StaffIndex>; 4]> = solution
                    .on_duty(DayIndex::new(day))
                    .into_iter()
                    .map(Some)
                    .collect();
                on_duty.truncate(slots);
                while on_duty.len() < slots {
                    on_duty.push(None);
                }
                ScheduleRow {
                    date: descriptor.date(),
                    kind: descriptor.kind(),
                    on_duty,
                }
            })
            .collect();
        Self { rows }
    }

    /// Returns the rows in ascending date order.
    #[inline]
    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    /// Returns the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the schedule has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            write!(f, "{} {:<8}", row.date, format!("{}", row.kind))?;
            for slot in row.on_duty() {
                match slot {
                    Some(staff_index) => write!(f, " {}", staff_index)?,
                    None => write!(f, " -")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarBuilder;
    use crate::roster::RosterEntry;
    use fixedbitset::FixedBitSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar() -> Calendar {
        CalendarBuilder::new(date(2025, 7, 1), date(2025, 7, 3))
            .build()
            .unwrap()
    }

    fn solution_from(num_staff: usize, num_days: usize, on: &[(usize, usize)]) -> Solution {
        let mut values = FixedBitSet::with_capacity(num_staff * num_days);
        for &(staff, day) in on {
            values.insert(staff * num_days + day);
        }
        Solution::new(num_staff, num_days, values)
    }

    #[test]
    fn test_extract_one_row_per_day() {
        let calendar = calendar();
        let solution = solution_from(2, 3, &[(0, 0), (1, 1), (0, 2)]);
        let schedule = Schedule::extract(&calendar, &solution, 1);

        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule.rows()[0].date(), date(2025, 7, 1));
        assert_eq!(
            schedule.rows()[0].on_duty(),
            &[Some(StaffIndex::new(0))]
        );
        assert_eq!(
            schedule.rows()[1].on_duty(),
            &[Some(StaffIndex::new(1))]
        );
    }

    #[test]
    fn test_defensive_padding_on_deficient_binding() {
        let calendar = calendar();
        // Day 2 has nobody on duty; day 0 has only one of two slots filled.
        let solution = solution_from(2, 3, &[(0, 0), (0, 1), (1, 1)]);
        let schedule = Schedule::extract(&calendar, &solution, 2);

        assert_eq!(
            schedule.rows()[0].on_duty(),
            &[Some(StaffIndex::new(0)), None]
        );
        assert_eq!(
            schedule.rows()[1].on_duty(),
            &[Some(StaffIndex::new(0)), Some(StaffIndex::new(1))]
        );
        assert_eq!(schedule.rows()[2].on_duty(), &[None, None]);
    }

    #[test]
    fn test_defensive_truncation_on_overfull_binding() {
        let calendar = calendar();
        let solution = solution_from(2, 3, &[(0, 0), (1, 0)]);
        let schedule = Schedule::extract(&calendar, &solution, 1);

        assert_eq!(schedule.rows()[0].on_duty(), &[Some(StaffIndex::new(0))]);
    }

    #[test]
    fn test_names_resolve_placeholders_to_empty() {
        let calendar = calendar();
        let roster = Roster::from_entries(&[
            RosterEntry::new("A", "cardiology"),
            RosterEntry::new("B", "neurology"),
        ])
        .unwrap();
        let solution = solution_from(2, 3, &[(1, 0)]);
        let schedule = Schedule::extract(&calendar, &solution, 2);

        assert_eq!(schedule.rows()[0].names(&roster), vec!["B", ""]);
        assert_eq!(schedule.rows()[2].names(&roster), vec!["", ""]);
    }

    #[test]
    fn test_row_kind_follows_calendar() {
        // 2025-07-05/06 are a weekend.
        let calendar = CalendarBuilder::new(date(2025, 7, 4), date(2025, 7, 6))
            .build()
            .unwrap();
        let solution = solution_from(1, 3, &[(0, 0), (0, 1), (0, 2)]);
        let schedule = Schedule::extract(&calendar, &solution, 1);

        assert_eq!(schedule.rows()[0].kind(), DayKind::Workday);
        assert_eq!(schedule.rows()[1].kind(), DayKind::Weekend);
        assert_eq!(schedule.rows()[2].kind(), DayKind::Weekend);
    }
}
