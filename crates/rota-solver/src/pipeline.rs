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

//! # Scheduling Pipeline
//!
//! The one-call entry point of the crate: validate the inputs, build the
//! calendar and the constraint model, run the parallel solver within the
//! time budget, and extract the per-day schedule rows.
//!
//! The pipeline is invoked once per request and runs to completion or
//! timeout; it keeps no state between invocations and never retries on its
//! own. Hard input errors come back as `Err(ScheduleError)`; a completed
//! run returns one of the three terminal statuses of [`ScheduleOutcome`].

use crate::solver::SolverBuilder;
use chrono::NaiveDate;
use rota_model::{
    calendar::CalendarBuilder,
    config::ScheduleConfig,
    model::{ModelBuilder, OverconstrainedError},
    roster::{Roster, RosterEntry},
    schedule::Schedule,
    validate::{ValidationError, Validator},
};
use rota_search::{result::SearchResult, stats::SolverStatistics};

/// The default wall-clock budget of one scheduling run.
pub const DEFAULT_TIME_BUDGET: std::time::Duration = std::time::Duration::from_secs(60);

/// One scheduling request: roster, horizon, holidays, parameters, budget.
#[derive(Clone, Debug)]
pub struct ScheduleRequest {
    roster: Vec<RosterEntry>,
    start: NaiveDate,
    end: NaiveDate,
    holidays: Vec<NaiveDate>,
    config: ScheduleConfig,
    time_budget: std::time::Duration,
    ignore_out_of_range_blocks: bool,
}

impl ScheduleRequest {
    /// Creates a request over the inclusive range `[start, end]` with the
    /// default configuration and time budget and no holidays.
    pub fn new(roster: Vec<RosterEntry>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            roster,
            start,
            end,
            holidays: Vec::new(),
            config: ScheduleConfig::default(),
            time_budget: DEFAULT_TIME_BUDGET,
            ignore_out_of_range_blocks: false,
        }
    }

    /// Replaces the holiday list.
    #[inline]
    pub fn with_holidays(mut self, holidays: Vec<NaiveDate>) -> Self {
        self.holidays = holidays;
        self
    }

    /// Replaces the configuration.
    #[inline]
    pub fn with_config(mut self, config: ScheduleConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the time budget.
    #[inline]
    pub fn with_time_budget(mut self, time_budget: std::time::Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    /// Tolerates individual blocks dated outside the horizon instead of
    /// rejecting them (they constrain nothing either way).
    #[inline]
    pub fn with_lenient_blocks(mut self, lenient: bool) -> Self {
        self.ignore_out_of_range_blocks = lenient;
        self
    }

    /// Returns the roster entries.
    #[inline]
    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    /// Returns the first day of the horizon.
    #[inline]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the last day of the horizon.
    #[inline]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns the holiday list.
    #[inline]
    pub fn holidays(&self) -> &[NaiveDate] {
        &self.holidays
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Returns the time budget.
    #[inline]
    pub fn time_budget(&self) -> std::time::Duration {
        self.time_budget
    }
}

/// A hard input failure detected before any search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Malformed or inconsistent input.
    Validation(ValidationError),
    /// Structurally impossible coverage.
    Overconstrained(OverconstrainedError),
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(error) => write!(f, "validation error: {}", error),
            Self::Overconstrained(error) => write!(f, "overconstrained: {}", error),
        }
    }
}

impl std::error::Error for ScheduleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(error) => Some(error),
            Self::Overconstrained(error) => Some(error),
        }
    }
}

impl From<ValidationError> for ScheduleError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error)
    }
}

impl From<OverconstrainedError> for ScheduleError {
    fn from(error: OverconstrainedError) -> Self {
        Self::Overconstrained(error)
    }
}

/// The terminal status of one completed scheduling run.
#[derive(Clone, Debug)]
pub enum ScheduleOutcome {
    /// A feasible schedule was found.
    Solved {
        /// The per-day roster rows.
        schedule: Schedule,
        /// Aggregated solver statistics.
        statistics: SolverStatistics,
    },
    /// The constraints provably admit no schedule; relax one and resubmit.
    Infeasible {
        /// Aggregated solver statistics.
        statistics: SolverStatistics,
    },
    /// The time budget ran out before the search reached a conclusion;
    /// a larger budget may still find a schedule.
    TimedOutNoSolution {
        /// Aggregated solver statistics.
        statistics: SolverStatistics,
    },
}

impl ScheduleOutcome {
    /// Returns `true` if a schedule was produced.
    #[inline]
    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved { .. })
    }

    /// Returns `true` if infeasibility was proven.
    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Self::Infeasible { .. })
    }

    /// Returns `true` if the run was inconclusive.
    #[inline]
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOutNoSolution { .. })
    }

    /// Returns the produced schedule, if any.
    #[inline]
    pub fn schedule(&self) -> Option<&Schedule> {
        match self {
            Self::Solved { schedule, .. } => Some(schedule),
            _ => None,
        }
    }

    /// Returns the aggregated solver statistics.
    #[inline]
    pub fn statistics(&self) -> &SolverStatistics {
        match self {
            Self::Solved { statistics, .. }
            | Self::Infeasible { statistics }
            | Self::TimedOutNoSolution { statistics } => statistics,
        }
    }
}

impl std::fmt::Display for ScheduleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Solved { schedule, .. } => {
                write!(f, "Solved({} rows)", schedule.len())
            }
            Self::Infeasible { .. } => write!(f, "Infeasible"),
            Self::TimedOutNoSolution { .. } => write!(f, "TimedOutNoSolution"),
        }
    }
}

/// Runs one scheduling request through the full pipeline.
///
/// Control flow: validate -> calendar -> model -> parallel search ->
/// extract. The validator short-circuits the pipeline on malformed input;
/// an impossible daily coverage short-circuits at model construction; the
/// search itself terminates with one of the three statuses of
/// [`ScheduleOutcome`].
pub fn schedule(request: &ScheduleRequest) -> Result<ScheduleOutcome, ScheduleError> {
    let roster = Roster::from_entries(request.roster())?;
    Validator::new()
        .ignore_out_of_range_blocks(request.ignore_out_of_range_blocks)
        .validate(
            &roster,
            request.start(),
            request.end(),
            request.holidays(),
            request.config(),
        )?;

    let calendar = CalendarBuilder::new(request.start(), request.end())
        .holidays(request.holidays().iter().copied())
        .build()
        .map_err(ValidationError::from)?;

    let model = ModelBuilder::new(&calendar, &roster, request.config()).build()?;

    let mut solver = SolverBuilder::default_portfolio()
        .with_time_limit(request.time_budget())
        .build();
    let (result, _reason, statistics) = solver.solve(&model).into_parts();

    Ok(match result {
        SearchResult::Solved(solution) => ScheduleOutcome::Solved {
            schedule: Schedule::extract(&calendar, &solution, request.config().staff_per_day()),
            statistics,
        },
        SearchResult::Infeasible => ScheduleOutcome::Infeasible { statistics },
        SearchResult::Unknown => ScheduleOutcome::TimedOutNoSolution { statistics },
    })
}
