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

use crate::stats::DfsStatistics;
use rota_search::result::{SearchResult, TerminationReason};
use rota_model::solution::Solution;

/// The outcome of one engine run: verdict, termination cause, and counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfsOutcome {
    result: SearchResult,
    reason: TerminationReason,
    statistics: DfsStatistics,
}

impl DfsOutcome {
    /// Creates an outcome from its parts.
    #[inline]
    pub fn new(result: SearchResult, reason: TerminationReason, statistics: DfsStatistics) -> Self {
        Self {
            result,
            reason,
            statistics,
        }
    }

    /// Creates a solved outcome.
    #[inline]
    pub fn solved(solution: Solution, statistics: DfsStatistics) -> Self {
        Self::new(
            SearchResult::Solved(solution),
            TerminationReason::SolutionFound,
            statistics,
        )
    }

    /// Creates an infeasible outcome.
    #[inline]
    pub fn infeasible(statistics: DfsStatistics) -> Self {
        Self::new(
            SearchResult::Infeasible,
            TerminationReason::InfeasibilityProven,
            statistics,
        )
    }

    /// Creates an inconclusive outcome with the given abort reason.
    #[inline]
    pub fn aborted(reason: String, statistics: DfsStatistics) -> Self {
        Self::new(
            SearchResult::Unknown,
            TerminationReason::Aborted(reason),
            statistics,
        )
    }

    /// Returns the search verdict.
    #[inline]
    pub fn result(&self) -> &SearchResult {
        &self.result
    }

    /// Returns the termination cause.
    #[inline]
    pub fn reason(&self) -> &TerminationReason {
        &self.reason
    }

    /// Returns the engine counters.
    #[inline]
    pub fn statistics(&self) -> &DfsStatistics {
        &self.statistics
    }

    /// Consumes the outcome and returns its parts.
    #[inline]
    pub fn into_parts(self) -> (SearchResult, TerminationReason, DfsStatistics) {
        (self.result, self.reason, self.statistics)
    }

    /// Returns `true` if a solution was found.
    #[inline]
    pub fn is_solved(&self) -> bool {
        matches!(self.result, SearchResult::Solved(_))
    }

    /// Returns `true` if infeasibility was proven.
    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self.result, SearchResult::Infeasible)
    }

    /// Returns `true` if the run was inconclusive.
    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self.result, SearchResult::Unknown)
    }
}

impl std::fmt::Display for DfsOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) {}", self.result, self.reason, self.statistics)
    }
}
