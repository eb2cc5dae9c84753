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

//! # Input Validation
//!
//! Fail-fast checks that run before model construction so the solver never
//! observes an inconsistent instance. Anything caught here is a caller
//! mistake; nothing is retried or repaired internally.
//!
//! Individual-block entries naming an unknown staff member are always
//! rejected: a silently dropped restriction is a typo the user would never
//! find out about. Blocks whose date lies outside the scheduling range are
//! rejected by default, but `ignore_out_of_range_blocks(true)` tolerates
//! them for callers that feed blocks from a wider horizon (such entries
//! constrain nothing either way).

use crate::{calendar::InvalidRangeError, config::ScheduleConfig, roster::Roster};
use chrono::NaiveDate;

/// Malformed or inconsistent input detected before search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The roster has no entries.
    EmptyRoster,
    /// Two roster entries share the same name.
    DuplicateStaff {
        /// The duplicated name.
        name: String,
    },
    /// The schedule end date precedes the start date.
    InvertedRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },
    /// A vacation span has its end before its start.
    InvertedVacation {
        /// The staff member the span belongs to.
        staff: String,
        /// Span start date.
        start: NaiveDate,
        /// Span end date.
        end: NaiveDate,
    },
    /// A holiday date lies outside the scheduling range.
    HolidayOutsideRange {
        /// The offending holiday date.
        date: NaiveDate,
    },
    /// An individual block names a staff member not on the roster.
    UnknownBlockStaff {
        /// The unknown name.
        name: String,
    },
    /// An individual block date lies outside the scheduling range.
    BlockOutsideRange {
        /// The staff member the block applies to.
        staff: String,
        /// The offending date.
        date: NaiveDate,
    },
    /// A numeric parameter that must be at least one is zero.
    ZeroParameter {
        /// The parameter name.
        name: &'static str,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRoster => write!(f, "the roster has no staff entries"),
            Self::DuplicateStaff { name } => {
                write!(f, "duplicate staff name '{}' in roster", name)
            }
            Self::InvertedRange { start, end } => {
                write!(f, "end date {} precedes start date {}", end, start)
            }
            Self::InvertedVacation { staff, start, end } => write!(
                f,
                "vacation of '{}' ends ({}) before it starts ({})",
                staff, end, start
            ),
            Self::HolidayOutsideRange { date } => {
                write!(f, "holiday {} lies outside the scheduling range", date)
            }
            Self::UnknownBlockStaff { name } => {
                write!(f, "individual block references unknown staff '{}'", name)
            }
            Self::BlockOutsideRange { staff, date } => write!(
                f,
                "individual block for '{}' on {} lies outside the scheduling range",
                staff, date
            ),
            Self::ZeroParameter { name } => {
                write!(f, "parameter '{}' must be at least 1", name)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<InvalidRangeError> for ValidationError {
    fn from(error: InvalidRangeError) -> Self {
        Self::InvertedRange {
            start: error.start,
            end: error.end,
        }
    }
}

/// Structural input validation that runs before model construction.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use rota_model::config::ScheduleConfig;
/// use rota_model::roster::{Roster, RosterEntry};
/// use rota_model::validate::Validator;
///
/// let roster = Roster::from_entries(&[RosterEntry::new("A", "cardiology")]).unwrap();
/// let start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
/// let config = ScheduleConfig::new(1, 4, 1);
///
/// assert!(Validator::new().validate(&roster, start, end, &[], &config).is_ok());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Validator {
    ignore_out_of_range_blocks: bool,
}

impl Validator {
    /// Creates a strict validator.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether out-of-range individual blocks are tolerated
    /// (they constrain nothing) instead of rejected.
    #[inline]
    pub fn ignore_out_of_range_blocks(mut self, ignore: bool) -> Self {
        self.ignore_out_of_range_blocks = ignore;
        self
    }

    /// Checks one scheduling instance.
    ///
    /// The roster itself is validated during [`Roster::from_entries`]; this
    /// method covers the cross-input rules: range orientation, holiday
    /// containment, parameter positivity, and individual-block resolution.
    pub fn validate(
        &self,
        roster: &Roster,
        start: NaiveDate,
        end: NaiveDate,
        holidays: &[NaiveDate],
        config: &ScheduleConfig,
    ) -> Result<(), ValidationError> {
        if end < start {
            return Err(ValidationError::InvertedRange { start, end });
        }

        if config.staff_per_day() == 0 {
            return Err(ValidationError::ZeroParameter {
                name: "staff_per_day",
            });
        }
        if config.max_per_month() == 0 {
            return Err(ValidationError::ZeroParameter {
                name: "max_per_month",
            });
        }

        for &date in holidays {
            if date < start || date > end {
                return Err(ValidationError::HolidayOutsideRange { date });
            }
        }

        for block in config.individual_blocks() {
            if roster.index_of(&block.staff_name).is_none() {
                return Err(ValidationError::UnknownBlockStaff {
                    name: block.staff_name.clone(),
                });
            }
            let in_range = block.date >= start && block.date <= end;
            if !in_range && !self.ignore_out_of_range_blocks {
                return Err(ValidationError::BlockOutsideRange {
                    staff: block.staff_name.clone(),
                    date: block.date,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RosterEntry;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn roster() -> Roster {
        Roster::from_entries(&[
            RosterEntry::new("A", "cardiology"),
            RosterEntry::new("B", "neurology"),
        ])
        .unwrap()
    }

    #[test]
    fn test_valid_instance_passes() {
        let config = ScheduleConfig::new(1, 4, 1).block("A", date(2025, 7, 3));
        let result = Validator::new().validate(
            &roster(),
            date(2025, 7, 1),
            date(2025, 7, 7),
            &[date(2025, 7, 4)],
            &config,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let config = ScheduleConfig::new(1, 4, 1);
        let err = Validator::new()
            .validate(&roster(), date(2025, 7, 7), date(2025, 7, 1), &[], &config)
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvertedRange { .. }));
    }

    #[test]
    fn test_zero_parameters_are_rejected() {
        let err = Validator::new()
            .validate(
                &roster(),
                date(2025, 7, 1),
                date(2025, 7, 7),
                &[],
                &ScheduleConfig::new(1, 4, 0),
            )
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::ZeroParameter {
                name: "staff_per_day"
            }
        );

        let err = Validator::new()
            .validate(
                &roster(),
                date(2025, 7, 1),
                date(2025, 7, 7),
                &[],
                &ScheduleConfig::new(1, 0, 1),
            )
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::ZeroParameter {
                name: "max_per_month"
            }
        );
    }

    #[test]
    fn test_out_of_range_holiday_is_rejected() {
        let err = Validator::new()
            .validate(
                &roster(),
                date(2025, 7, 1),
                date(2025, 7, 7),
                &[date(2025, 8, 15)],
                &ScheduleConfig::new(1, 4, 1),
            )
            .unwrap_err();
        assert!(matches!(err, ValidationError::HolidayOutsideRange { .. }));
    }

    #[test]
    fn test_unknown_block_staff_is_always_rejected() {
        let config = ScheduleConfig::new(1, 4, 1).block("Nobody", date(2025, 7, 3));
        let err = Validator::new()
            .ignore_out_of_range_blocks(true)
            .validate(&roster(), date(2025, 7, 1), date(2025, 7, 7), &[], &config)
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownBlockStaff { name } if name == "Nobody"));
    }

    #[test]
    fn test_out_of_range_block_policy_is_configurable() {
        let config = ScheduleConfig::new(1, 4, 1).block("A", date(2025, 9, 1));

        let strict = Validator::new().validate(
            &roster(),
            date(2025, 7, 1),
            date(2025, 7, 7),
            &[],
            &config,
        );
        assert!(matches!(
            strict.unwrap_err(),
            ValidationError::BlockOutsideRange { .. }
        ));

        let lenient = Validator::new().ignore_out_of_range_blocks(true).validate(
            &roster(),
            date(2025, 7, 1),
            date(2025, 7, 7),
            &[],
            &config,
        );
        assert!(lenient.is_ok());
    }

    #[test]
    fn test_display_messages_name_the_offender() {
        let err = ValidationError::UnknownBlockStaff {
            name: "Zed".to_string(),
        };
        assert!(format!("{}", err).contains("Zed"));

        let err = ValidationError::ZeroParameter {
            name: "max_per_month",
        };
        assert!(format!("{}", err).contains("max_per_month"));
    }
}
