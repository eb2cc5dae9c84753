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

use crate::index::{DayIndex, StaffIndex, VarIndex};
use fixedbitset::FixedBitSet;

/// A total, consistent binding of every decision variable.
///
/// Produced by the search engine when every variable is bound and all
/// constraints hold; consumed immediately by the result extractor. The
/// binding is stored as a bitset over the flattened staff-major variable
/// space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    num_staff: usize,
    num_days: usize,
    values: FixedBitSet,
}

impl Solution {
    /// Constructs a solution from a complete binding.
    ///
    /// # Panics
    ///
    /// Panics if the bitset length does not equal `num_staff * num_days`.
    pub fn new(num_staff: usize, num_days: usize, values: FixedBitSet) -> Self {
        assert_eq!(
            values.len(),
            num_staff * num_days,
            "called Solution::new with inconsistent binding length: expected {}, got {}",
            num_staff * num_days,
            values.len()
        );
        Self {
            num_staff,
            num_days,
            values,
        }
    }

    /// Returns the number of staff members in the binding.
    #[inline]
    pub fn num_staff(&self) -> usize {
        self.num_staff
    }

    /// Returns the number of days in the binding.
    #[inline]
    pub fn num_days(&self) -> usize {
        self.num_days
    }

    /// Returns the value bound to a flattened variable.
    ///
    /// # Panics
    ///
    /// In debug mode, panics if `var_index` is out of bounds.
    #[inline]
    pub fn value(&self, var_index: VarIndex) -> bool {
        debug_assert!(
            var_index.get() < self.values.len(),
            "called `Solution::value` with variable index out of bounds: the len is {} but the index is {}",
            self.values.len(),
            var_index.get()
        );
        self.values.contains(var_index.get())
    }

    /// Returns `true` if the given staff member is on duty on the given day.
    #[inline]
    pub fn is_on_duty(&self, staff_index: StaffIndex, day_index: DayIndex) -> bool {
        debug_assert!(staff_index.get() < self.num_staff);
        debug_assert!(day_index.get() < self.num_days);
        self.values
            .contains(staff_index.get() * self.num_days + day_index.get())
    }

    /// Returns the staff on duty on the given day, in roster order.
    pub fn on_duty(&self, day_index: DayIndex) -> Vec<StaffIndex> {
        (0..self.num_staff)
            .map(StaffIndex::new)
            .filter(|&staff_index| self.is_on_duty(staff_index, day_index))
            .collect()
    }

    /// Returns the total number of duties assigned to a staff member.
    pub fn duty_count(&self, staff_index: StaffIndex) -> usize {
        (0..self.num_days)
            .filter(|&day| self.is_on_duty(staff_index, DayIndex::new(day)))
            .count()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Solution({} staff x {} days, {} duties)",
            self.num_staff,
            self.num_days,
            self.values.count_ones(..)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution_from(num_staff: usize, num_days: usize, on: &[(usize, usize)]) -> Solution {
        let mut values = FixedBitSet::with_capacity(num_staff * num_days);
        for &(staff, day) in on {
            values.insert(staff * num_days + day);
        }
        Solution::new(num_staff, num_days, values)
    }

    #[test]
    fn test_duty_queries() {
        let solution = solution_from(2, 3, &[(0, 0), (1, 1), (0, 2)]);

        assert!(solution.is_on_duty(StaffIndex::new(0), DayIndex::new(0)));
        assert!(!solution.is_on_duty(StaffIndex::new(1), DayIndex::new(0)));
        assert_eq!(solution.on_duty(DayIndex::new(1)), vec![StaffIndex::new(1)]);
        assert_eq!(solution.duty_count(StaffIndex::new(0)), 2);
        assert_eq!(solution.duty_count(StaffIndex::new(1)), 1);
    }

    #[test]
    fn test_on_duty_is_in_roster_order() {
        let solution = solution_from(3, 1, &[(2, 0), (0, 0)]);
        assert_eq!(
            solution.on_duty(DayIndex::new(0)),
            vec![StaffIndex::new(0), StaffIndex::new(2)]
        );
    }

    #[test]
    #[should_panic(expected = "inconsistent binding length")]
    fn test_new_rejects_wrong_length() {
        let values = FixedBitSet::with_capacity(5);
        let _ = Solution::new(2, 3, values);
    }

    #[test]
    fn test_display_reports_duty_total() {
        let solution = solution_from(2, 2, &[(0, 0), (1, 1)]);
        assert_eq!(format!("{}", solution), "Solution(2 staff x 2 days, 2 duties)");
    }
}
