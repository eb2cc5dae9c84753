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

//! # Unit Propagation over Cardinality Constraints
//!
//! The inference layer of the search engine. After every binding, each
//! affected constraint `lo <= sum(vars) <= hi` is inspected against its
//! incrementally maintained tallies:
//!
//! - `true_count > hi`, or `true_count + unassigned < lo`: **conflict** —
//!   the current branch cannot be completed.
//! - `true_count == hi` with unbound variables left: every unbound variable
//!   of the constraint is **forced false**.
//! - `true_count + unassigned == lo`: every unbound variable is **forced
//!   true**.
//!
//! Forced bindings are queued and processed to a fixpoint, so one decision
//! can cascade through coverage, spacing, quota, and band constraints at
//! once. Every applied binding is recorded on the trail; on conflict the
//! caller rewinds to the enclosing frame, which keeps the propagator free
//! of any undo logic of its own.

use crate::{state::SearchState, stats::DfsStatistics, trail::SearchTrail};
use rota_model::{
    index::{ConstraintIndex, VarIndex},
    model::Model,
};
use std::collections::VecDeque;

/// The reason a propagation pass failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    /// A constraint's bounds became unsatisfiable.
    Violated(ConstraintIndex),
    /// A variable was forced to both polarities.
    Contradiction(VarIndex),
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Conflict::Violated(constraint_index) => {
                write!(f, "constraint {} violated", constraint_index)
            }
            Conflict::Contradiction(var_index) => {
                write!(f, "variable {} forced both ways", var_index)
            }
        }
    }
}

/// A reusable propagation work queue.
///
/// The queue is owned by the engine and cleared at the start of every pass,
/// so repeated solves allocate nothing in the steady state.
#[derive(Debug, Clone, Default)]
pub struct Propagator {
    queue: VecDeque<(VarIndex, bool)>,
}

impl Propagator {
    /// Creates an empty propagator.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a propagator with capacity for the given variable count.
    #[inline]
    pub fn preallocated(num_vars: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(num_vars),
        }
    }

    /// Binds `var_index` to `value` and propagates to a fixpoint.
    ///
    /// Every applied binding is recorded on `trail`. On conflict the state
    /// is left mid-branch; the caller rewinds through the trail.
    pub fn assign(
        &mut self,
        model: &Model,
        state: &mut SearchState,
        trail: &mut SearchTrail,
        stats: &mut DfsStatistics,
        var_index: VarIndex,
        value: bool,
    ) -> Result<(), Conflict> {
        self.queue.clear();
        self.queue.push_back((var_index, value));
        self.drain(model, state, trail, stats)
    }

    /// Inspects every constraint of the model once, seeding forcings from
    /// constraints that are tight at the root, then propagates to a
    /// fixpoint. Used once per solve before any decision is taken.
    pub fn propagate_all(
        &mut self,
        model: &Model,
        state: &mut SearchState,
        trail: &mut SearchTrail,
        stats: &mut DfsStatistics,
    ) -> Result<(), Conflict> {
        self.queue.clear();
        for row in 0..model.num_constraints() {
            self.inspect(model, state, ConstraintIndex::new(row))?;
        }
        self.drain(model, state, trail, stats)
    }

    /// Processes the queue until empty or a conflict arises.
    fn drain(
        &mut self,
        model: &Model,
        state: &mut SearchState,
        trail: &mut SearchTrail,
        stats: &mut DfsStatistics,
    ) -> Result<(), Conflict> {
        while let Some((var_index, value)) = self.queue.pop_front() {
            if state.is_assigned(var_index) {
                if state.value(var_index) != value {
                    return Err(Conflict::Contradiction(var_index));
                }
                continue;
            }

            state.bind(model, var_index, value);
            trail.push_entry(var_index);
            stats.propagations += 1;

            for &constraint_index in model.memberships(var_index) {
                self.inspect(model, state, constraint_index)?;
            }
        }
        Ok(())
    }

    /// Checks one constraint's tallies and queues any forced bindings.
    #[inline]
    fn inspect(
        &mut self,
        model: &Model,
        state: &SearchState,
        constraint_index: ConstraintIndex,
    ) -> Result<(), Conflict> {
        let constraint = model.constraint(constraint_index);
        let true_count = state.true_count(constraint_index);
        let unassigned = state.unassigned_count(constraint_index);

        if true_count > constraint.hi() || true_count + unassigned < constraint.lo() {
            return Err(Conflict::Violated(constraint_index));
        }

        if unassigned == 0 {
            return Ok(());
        }

        if true_count == constraint.hi() {
            for &other in constraint.vars() {
                if !state.is_assigned(other) {
                    self.queue.push_back((other, false));
                }
            }
        } else if true_count + unassigned == constraint.lo() {
            for &other in constraint.vars() {
                if !state.is_assigned(other) {
                    self.queue.push_back((other, true));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rota_model::calendar::CalendarBuilder;
    use rota_model::config::ScheduleConfig;
    use rota_model::index::{DayIndex, StaffIndex};
    use rota_model::model::ModelBuilder;
    use rota_model::roster::{Roster, RosterEntry};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn model(staff_per_day: u32, gap: u32) -> rota_model::model::Model {
        let calendar = CalendarBuilder::new(date(2025, 7, 1), date(2025, 7, 3))
            .build()
            .unwrap();
        let roster = Roster::from_entries(&[
            RosterEntry::new("A", "cardiology"),
            RosterEntry::new("B", "neurology"),
        ])
        .unwrap();
        let config =
            ScheduleConfig::new(gap, 4, staff_per_day).with_specialty_exclusivity(false);
        ModelBuilder::new(&calendar, &roster, &config).build().unwrap()
    }

    #[test]
    fn test_coverage_forces_second_staff_false() {
        // One person per day: binding A on day 0 true must force B on day 0
        // false.
        let model = model(1, 0);
        let mut state = SearchState::new(&model);
        let mut trail = SearchTrail::new();
        let mut stats = DfsStatistics::default();
        let mut propagator = Propagator::new();

        let a_day0 = model.var_index(StaffIndex::new(0), DayIndex::new(0));
        let b_day0 = model.var_index(StaffIndex::new(1), DayIndex::new(0));

        propagator
            .assign(&model, &mut state, &mut trail, &mut stats, a_day0, true)
            .unwrap();

        assert!(state.is_assigned(b_day0));
        assert!(!state.value(b_day0));
        assert!(stats.propagations >= 2);
    }

    #[test]
    fn test_coverage_forces_last_staff_true() {
        // One person per day: binding A on day 0 false leaves B as the only
        // candidate, so B is forced true.
        let model = model(1, 0);
        let mut state = SearchState::new(&model);
        let mut trail = SearchTrail::new();
        let mut stats = DfsStatistics::default();
        let mut propagator = Propagator::new();

        let a_day0 = model.var_index(StaffIndex::new(0), DayIndex::new(0));
        let b_day0 = model.var_index(StaffIndex::new(1), DayIndex::new(0));

        propagator
            .assign(&model, &mut state, &mut trail, &mut stats, a_day0, false)
            .unwrap();

        assert!(state.is_assigned(b_day0));
        assert!(state.value(b_day0));
    }

    #[test]
    fn test_unreachable_lower_bound_is_a_conflict() {
        // Two per day from a two-person roster: everyone serves every day.
        // Binding anyone false starves the coverage constraint.
        let model = model(2, 0);
        let mut state = SearchState::new(&model);
        let mut trail = SearchTrail::new();
        let mut stats = DfsStatistics::default();
        let mut propagator = Propagator::new();

        let a_day0 = model.var_index(StaffIndex::new(0), DayIndex::new(0));
        let result =
            propagator.assign(&model, &mut state, &mut trail, &mut stats, a_day0, false);

        assert!(matches!(result, Err(Conflict::Violated(_))));
    }

    #[test]
    fn test_propagation_cascades_through_spacing() {
        // Gap 1: windows of two consecutive days hold at most one duty.
        // With one person per day, binding A true on day 0 forces B false on
        // day 0 (coverage), and A false on day 1 (spacing), which in turn
        // forces B true on day 1 (coverage).
        let model = model(1, 1);
        let mut state = SearchState::new(&model);
        let mut trail = SearchTrail::new();
        let mut stats = DfsStatistics::default();
        let mut propagator = Propagator::new();

        let a_day0 = model.var_index(StaffIndex::new(0), DayIndex::new(0));
        let a_day1 = model.var_index(StaffIndex::new(0), DayIndex::new(1));
        let b_day1 = model.var_index(StaffIndex::new(1), DayIndex::new(1));

        propagator
            .assign(&model, &mut state, &mut trail, &mut stats, a_day0, true)
            .unwrap();

        assert!(state.is_assigned(a_day1));
        assert!(!state.value(a_day1));
        assert!(state.is_assigned(b_day1));
        assert!(state.value(b_day1));
    }

    #[test]
    fn test_propagate_all_seeds_tight_constraints() {
        // Two per day from two staff: the root already forces every
        // variable true.
        let model = model(2, 0);
        let mut state = SearchState::new(&model);
        let mut trail = SearchTrail::new();
        let mut stats = DfsStatistics::default();
        let mut propagator = Propagator::new();

        propagator
            .propagate_all(&model, &mut state, &mut trail, &mut stats)
            .unwrap();

        assert!(state.is_complete());
        for var in 0..model.num_vars() {
            assert!(state.value(VarIndex::new(var)));
        }
    }

    #[test]
    fn test_trail_records_every_propagated_binding() {
        let model = model(1, 0);
        let mut state = SearchState::new(&model);
        let mut trail = SearchTrail::new();
        let mut stats = DfsStatistics::default();
        let mut propagator = Propagator::new();

        let a_day0 = model.var_index(StaffIndex::new(0), DayIndex::new(0));
        propagator
            .assign(&model, &mut state, &mut trail, &mut stats, a_day0, true)
            .unwrap();

        assert_eq!(trail.num_entries() as u64, stats.propagations);
        assert_eq!(trail.num_entries(), state.num_assigned());
    }

    #[test]
    fn test_assign_to_already_bound_variable_is_checked() {
        let model = model(1, 0);
        let mut state = SearchState::new(&model);
        let mut trail = SearchTrail::new();
        let mut stats = DfsStatistics::default();
        let mut propagator = Propagator::new();

        let a_day0 = model.var_index(StaffIndex::new(0), DayIndex::new(0));
        propagator
            .assign(&model, &mut state, &mut trail, &mut stats, a_day0, true)
            .unwrap();

        // Re-asserting the same value is a no-op.
        assert!(propagator
            .assign(&model, &mut state, &mut trail, &mut stats, a_day0, true)
            .is_ok());

        // Asserting the opposite value is a contradiction.
        let result =
            propagator.assign(&model, &mut state, &mut trail, &mut stats, a_day0, false);
        assert!(matches!(result, Err(Conflict::Contradiction(_))));
    }
}
