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

//! # Scheduling Configuration
//!
//! The explicit, immutable parameter set for one scheduling run. It is
//! constructed up front and threaded through the pipeline by reference;
//! no component reads ambient process state.

use chrono::NaiveDate;

/// A single blocked date for a named staff member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndividualBlock {
    /// The name of the staff member the block applies to.
    pub staff_name: String,
    /// The blocked date.
    pub date: NaiveDate,
}

impl IndividualBlock {
    /// Creates a block entry.
    #[inline]
    pub fn new(staff_name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            staff_name: staff_name.into(),
            date,
        }
    }
}

/// The constraint parameters of one scheduling run.
///
/// # Examples
///
/// ```rust
/// use rota_model::config::ScheduleConfig;
///
/// let config = ScheduleConfig::new(1, 4, 2).with_specialty_exclusivity(false);
/// assert_eq!(config.min_gap_days(), 1);
/// assert_eq!(config.staff_per_day(), 2);
/// assert!(!config.enforce_specialty_exclusivity());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleConfig {
    min_gap_days: u32,
    max_per_month: u32,
    staff_per_day: u32,
    enforce_specialty_exclusivity: bool,
    individual_blocks: Vec<IndividualBlock>,
}

impl ScheduleConfig {
    /// Creates a configuration with the given spacing, monthly quota, and
    /// daily coverage, specialty exclusivity enabled, and no blocks.
    #[inline]
    pub fn new(min_gap_days: u32, max_per_month: u32, staff_per_day: u32) -> Self {
        Self {
            min_gap_days,
            max_per_month,
            staff_per_day,
            enforce_specialty_exclusivity: true,
            individual_blocks: Vec::new(),
        }
    }

    /// Enables or disables the same-specialty exclusivity rule.
    #[inline]
    pub fn with_specialty_exclusivity(mut self, enforce: bool) -> Self {
        self.enforce_specialty_exclusivity = enforce;
        self
    }

    /// Replaces the individual block list.
    #[inline]
    pub fn with_individual_blocks(mut self, blocks: Vec<IndividualBlock>) -> Self {
        self.individual_blocks = blocks;
        self
    }

    /// Appends one individual block.
    #[inline]
    pub fn block(mut self, staff_name: impl Into<String>, date: NaiveDate) -> Self {
        self.individual_blocks.push(IndividualBlock::new(staff_name, date));
        self
    }

    /// Minimum number of free days between two duties of the same person.
    #[inline]
    pub fn min_gap_days(&self) -> u32 {
        self.min_gap_days
    }

    /// Maximum duties per staff member per month bucket.
    #[inline]
    pub fn max_per_month(&self) -> u32 {
        self.max_per_month
    }

    /// Exact number of staff on duty each day.
    #[inline]
    pub fn staff_per_day(&self) -> u32 {
        self.staff_per_day
    }

    /// Whether at most one member of each multi-member specialty may serve
    /// on the same day.
    #[inline]
    pub fn enforce_specialty_exclusivity(&self) -> bool {
        self.enforce_specialty_exclusivity
    }

    /// The individually blocked (staff, date) entries.
    #[inline]
    pub fn individual_blocks(&self) -> &[IndividualBlock] {
        &self.individual_blocks
    }
}

impl Default for ScheduleConfig {
    /// A three-day gap, four duties per month, three staff per day,
    /// exclusivity on.
    #[inline]
    fn default() -> Self {
        Self::new(3, 4, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fluent_construction() {
        let config = ScheduleConfig::new(2, 5, 1)
            .with_specialty_exclusivity(false)
            .block("A", date(2025, 7, 4))
            .block("B", date(2025, 7, 5));

        assert_eq!(config.min_gap_days(), 2);
        assert_eq!(config.max_per_month(), 5);
        assert_eq!(config.staff_per_day(), 1);
        assert!(!config.enforce_specialty_exclusivity());
        assert_eq!(config.individual_blocks().len(), 2);
        assert_eq!(config.individual_blocks()[0].staff_name, "A");
    }

    #[test]
    fn test_default_parameters() {
        let config = ScheduleConfig::default();
        assert_eq!(config.min_gap_days(), 3);
        assert_eq!(config.max_per_month(), 4);
        assert_eq!(config.staff_per_day(), 3);
        assert!(config.enforce_specialty_exclusivity());
        assert!(config.individual_blocks().is_empty());
    }
}
