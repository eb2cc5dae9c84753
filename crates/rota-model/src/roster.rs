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

//! # Roster
//!
//! Immutable staff records for one scheduling run. Each member carries a
//! unique name, a specialty tag, and a set of vacation spans stored as
//! inclusive intervals on a day-ordinal axis so containment checks are
//! branch-free integer comparisons.
//!
//! A `Roster` is created once from input entries and never mutated; the
//! model builder and result extractor only read from it.

use crate::{index::StaffIndex, validate::ValidationError};
use chrono::{Datelike, NaiveDate};
use rota_core::math::interval::ClosedInterval;
use rustc_hash::FxHashMap;

/// Converts a date to its ordinal position on the proleptic Gregorian axis.
#[inline]
pub fn date_ordinal(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64
}

/// One raw roster line as supplied by the caller: name, specialty, and
/// vacation spans as inclusive date pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterEntry {
    /// Unique staff name.
    pub name: String,
    /// Specialty tag used for the exclusivity rule.
    pub specialty: String,
    /// Inclusive vacation spans.
    pub vacations: Vec<(NaiveDate, NaiveDate)>,
}

impl RosterEntry {
    /// Creates an entry with no vacations.
    #[inline]
    pub fn new(name: impl Into<String>, specialty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specialty: specialty.into(),
            vacations: Vec::new(),
        }
    }

    /// Adds an inclusive vacation span.
    #[inline]
    pub fn vacation(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.vacations.push((start, end));
        self
    }
}

/// An immutable staff member record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaffMember {
    name: String,
    specialty: String,
    vacations: Vec<ClosedInterval<i64>>,
}

impl StaffMember {
    /// Returns the unique name of this member.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the specialty tag of this member.
    #[inline]
    pub fn specialty(&self) -> &str {
        &self.specialty
    }

    /// Returns the vacation spans on the day-ordinal axis.
    #[inline]
    pub fn vacations(&self) -> &[ClosedInterval<i64>] {
        &self.vacations
    }

    /// Returns `true` if the member is on vacation on `date`.
    #[inline]
    pub fn is_unavailable_on(&self, date: NaiveDate) -> bool {
        let ordinal = date_ordinal(date);
        self.vacations.iter().any(|span| span.contains(ordinal))
    }
}

impl std::fmt::Display for StaffMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.specialty)
    }
}

/// The full staff roster for one scheduling run.
///
/// # Examples
///
/// ```rust
/// use rota_model::roster::{Roster, RosterEntry};
///
/// let roster = Roster::from_entries(&[
///     RosterEntry::new("Alice", "cardiology"),
///     RosterEntry::new("Bob", "neurology"),
/// ])
/// .unwrap();
///
/// assert_eq!(roster.num_staff(), 2);
/// assert_eq!(roster.index_of("Bob").map(|s| s.get()), Some(1));
/// ```
#[derive(Clone, Debug)]
pub struct Roster {
    staff: Vec<StaffMember>,
    by_name: FxHashMap<String, StaffIndex>,
}

impl Roster {
    /// Builds a roster from raw entries.
    ///
    /// Fails with [`ValidationError`] on an empty entry list, a duplicate
    /// name, or a vacation span whose end precedes its start. Input order is
    /// preserved; `StaffIndex` values follow it.
    pub fn from_entries(entries: &[RosterEntry]) -> Result<Self, ValidationError> {
        if entries.is_empty() {
            return Err(ValidationError::EmptyRoster);
        }

        let mut staff = Vec::with_capacity(entries.len());
        let mut by_name = FxHashMap::default();

        for (index, entry) in entries.iter().enumerate() {
            if by_name
                .insert(entry.name.clone(), StaffIndex::new(index))
                .is_some()
            {
                return Err(ValidationError::DuplicateStaff {
                    name: entry.name.clone(),
                });
            }

            let mut vacations = Vec::with_capacity(entry.vacations.len());
            for &(start, end) in &entry.vacations {
                let span = ClosedInterval::try_new(date_ordinal(start), date_ordinal(end))
                    .ok_or(ValidationError::InvertedVacation {
                        staff: entry.name.clone(),
                        start,
                        end,
                    })?;
                vacations.push(span);
            }

            staff.push(StaffMember {
                name: entry.name.clone(),
                specialty: entry.specialty.clone(),
                vacations,
            });
        }

        Ok(Self { staff, by_name })
    }

    /// Returns the number of staff members.
    #[inline]
    pub fn num_staff(&self) -> usize {
        self.staff.len()
    }

    /// Returns the member at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `staff_index` is out of bounds.
    #[inline]
    pub fn member(&self, staff_index: StaffIndex) -> &StaffMember {
        &self.staff[staff_index.get()]
    }

    /// Returns all members in input order.
    #[inline]
    pub fn members(&self) -> &[StaffMember] {
        &self.staff
    }

    /// Looks up a member index by name.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<StaffIndex> {
        self.by_name.get(name).copied()
    }

    /// Groups staff indices by specialty, in first-seen specialty order.
    ///
    /// The deterministic grouping order keeps model construction, and
    /// therefore search, reproducible.
    pub fn specialty_groups(&self) -> Vec<(String, Vec<StaffIndex>)> {
        let mut groups: Vec<(String, Vec<StaffIndex>)> = Vec::new();
        let mut positions: FxHashMap<&str, usize> = FxHashMap::default();

        for (index, member) in self.staff.iter().enumerate() {
            let staff_index = StaffIndex::new(index);
            match positions.get(member.specialty()) {
                Some(&position) => groups[position].1.push(staff_index),
                None => {
                    positions.insert(member.specialty(), groups.len());
                    groups.push((member.specialty.clone(), vec![staff_index]));
                }
            }
        }

        groups
    }
}
