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

//! Backtracking search engine for rota models.
//!
//! This module implements the stateful engine that explores variable
//! bindings while pruning through unit propagation. The `DfsEngine` owns
//! reusable internal structures (trail, propagation queue) so repeated
//! solves allocate nothing in the steady state; a search session object
//! encapsulates per-run state, statistics, and monitor wiring, enabling
//! reproducible and debuggable runs.
//!
//! One run applies the model's fixed-false variables and propagates the
//! root to a fixpoint, then loops: take a decision from the builder, bind
//! and propagate, and on conflict rewind through the trail — flipping the
//! innermost untried polarity or popping exhausted frames. Running out of
//! frames proves infeasibility; completing the binding yields a solution;
//! a monitor can terminate the run at any node boundary, which is reported
//! as inconclusive.

use crate::{
    branching::decision::{Decision, DecisionBuilder},
    propagate::Propagator,
    result::DfsOutcome,
    state::SearchState,
    stats::DfsStatistics,
    trail::SearchTrail,
};
use rota_model::{index::VarIndex, model::Model};
use rota_search::monitor::search_monitor::{SearchCommand, SearchMonitor};

/// A backtracking constraint-search engine with unit propagation.
///
/// The engine is just the execution loop; the choice of branching variable
/// is delegated to a [`DecisionBuilder`] and run control to a
/// [`SearchMonitor`].
#[derive(Debug, Clone, Default)]
pub struct DfsEngine {
    propagator: Propagator,
    trail: SearchTrail,
}

impl DfsEngine {
    /// Creates a new engine.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new engine with preallocated storage for the given
    /// variable count. Solving moves the allocation cost to construction
    /// time; it does not change the engine's asymptotic memory use.
    #[inline]
    pub fn preallocated(num_vars: usize) -> Self {
        Self {
            propagator: Propagator::preallocated(num_vars),
            trail: SearchTrail::preallocated(num_vars),
        }
    }

    /// Solves the given model with the provided branching strategy and
    /// monitor.
    pub fn solve<B, M>(&mut self, model: &Model, builder: &mut B, monitor: &mut M) -> DfsOutcome
    where
        B: DecisionBuilder + ?Sized,
        M: SearchMonitor + ?Sized,
    {
        self.trail.clear();
        let session = SearchSession {
            model,
            builder,
            monitor,
            propagator: &mut self.propagator,
            trail: &mut self.trail,
            state: SearchState::new(model),
            stats: DfsStatistics::default(),
        };
        session.run()
    }
}

/// Per-run state of one solve invocation.
struct SearchSession<'a, B: ?Sized, M: ?Sized> {
    model: &'a Model,
    builder: &'a mut B,
    monitor: &'a mut M,
    propagator: &'a mut Propagator,
    trail: &'a mut SearchTrail,
    state: SearchState,
    stats: DfsStatistics,
}

impl<B, M> SearchSession<'_, B, M>
where
    B: DecisionBuilder + ?Sized,
    M: SearchMonitor + ?Sized,
{
    fn run(mut self) -> DfsOutcome {
        self.monitor.on_enter_search(self.model);
        self.builder.prepare(self.model);

        if !self.initialize() {
            return self.finalize_infeasible();
        }

        loop {
            if self.state.is_complete() {
                return self.finalize_solved();
            }

            if let SearchCommand::Terminate(reason) = self.monitor.search_command() {
                return self.finalize_aborted(reason);
            }

            let decision = self.next_decision();
            self.monitor.on_step();
            self.stats.nodes_explored += 1;
            self.trail.push_frame(decision.var(), decision.value());
            self.stats.max_depth = self.stats.max_depth.max(self.trail.depth());

            let applied = self.propagator.assign(
                self.model,
                &mut self.state,
                self.trail,
                &mut self.stats,
                decision.var(),
                decision.value(),
            );
            if applied.is_err() && !self.backtrack() {
                return self.finalize_infeasible();
            }
        }
    }

    /// Applies the root: fixed-false variables plus a full propagation
    /// sweep. Returns `false` when the root itself is contradictory.
    fn initialize(&mut self) -> bool {
        for &var in self.model.fixed_false() {
            let applied = self.propagator.assign(
                self.model,
                &mut self.state,
                self.trail,
                &mut self.stats,
                var,
                false,
            );
            if applied.is_err() {
                return false;
            }
        }

        self.propagator
            .propagate_all(self.model, &mut self.state, self.trail, &mut self.stats)
            .is_ok()
    }

    /// Fetches the next decision from the builder.
    fn next_decision(&mut self) -> Decision {
        match self.builder.next_decision(self.model, &self.state) {
            Some(decision) => decision,
            None => {
                debug_assert!(
                    false,
                    "decision builder returned no decision on an incomplete binding"
                );
                // Defensive fallback keeps release builds progressing.
                let var = (0..self.model.num_vars())
                    .map(VarIndex::new)
                    .find(|&var| !self.state.is_assigned(var))
                    .expect("incomplete binding has an unassigned variable");
                Decision::new(var, true)
            }
        }
    }

    /// Rewinds after a conflict. Returns `true` when a flipped polarity was
    /// applied successfully and the search can continue, `false` when the
    /// root's alternatives are exhausted and infeasibility is proven.
    fn backtrack(&mut self) -> bool {
        loop {
            let Some(frame) = self.trail.last_frame() else {
                return false;
            };
            self.trail
                .undo_to(self.model, &mut self.state, frame.entry_start());
            self.stats.backtracks += 1;

            if frame.flipped() {
                self.trail.pop_frame();
                continue;
            }

            self.trail.mark_last_flipped();
            self.monitor.on_step();
            self.stats.nodes_explored += 1;

            let applied = self.propagator.assign(
                self.model,
                &mut self.state,
                self.trail,
                &mut self.stats,
                frame.decision_var(),
                !frame.first_value(),
            );
            if applied.is_ok() {
                return true;
            }

            self.trail
                .undo_to(self.model, &mut self.state, frame.entry_start());
            self.trail.pop_frame();
        }
    }

    fn finalize_solved(mut self) -> DfsOutcome {
        let solution = self.state.to_solution(self.model);
        self.monitor.on_solution_found(&solution);
        self.monitor.on_exit_search();
        DfsOutcome::solved(solution, self.stats)
    }

    fn finalize_infeasible(mut self) -> DfsOutcome {
        self.monitor.on_exit_search();
        DfsOutcome::infeasible(self.stats)
    }

    fn finalize_aborted(mut self, reason: String) -> DfsOutcome {
        self.monitor.on_exit_search();
        DfsOutcome::aborted(reason, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::chronological::ChronologicalBuilder;
    use crate::branching::shuffled::ShuffledBuilder;
    use crate::branching::tightest::TightestDayBuilder;
    use chrono::NaiveDate;
    use rota_model::calendar::CalendarBuilder;
    use rota_model::config::ScheduleConfig;
    use rota_model::index::{DayIndex, StaffIndex};
    use rota_model::model::{Model, ModelBuilder};
    use rota_model::roster::{Roster, RosterEntry};
    use rota_model::solution::Solution;
    use rota_search::monitor::interrupt::InterruptMonitor;
    use rota_search::monitor::search_monitor::NoOpMonitor;
    use rota_search::monitor::time_limit::TimeLimitMonitor;
    use rota_search::result::{SearchResult, TerminationReason};
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn build_model(entries: &[RosterEntry], days: u32, config: &ScheduleConfig) -> Model {
        let start = date(2025, 7, 1);
        let end = start + chrono::Days::new((days - 1) as u64);
        let calendar = CalendarBuilder::new(start, end).build().unwrap();
        let roster = Roster::from_entries(entries).unwrap();
        ModelBuilder::new(&calendar, &roster, config).build().unwrap()
    }

    /// Exhaustively checks a solution against every constraint row.
    fn assert_satisfies(model: &Model, solution: &Solution) {
        for constraint in model.constraints() {
            let trues = constraint
                .vars()
                .iter()
                .filter(|&&var| solution.value(var))
                .count() as u32;
            assert!(
                constraint.lo() <= trues && trues <= constraint.hi(),
                "constraint {} violated with {} true variables",
                constraint,
                trues
            );
        }
        for &var in model.fixed_false() {
            assert!(!solution.value(var), "fixed-false variable {} is set", var);
        }
    }

    fn reference_entries() -> Vec<RosterEntry> {
        vec![
            RosterEntry::new("A", "cardiology"),
            RosterEntry::new("B", "cardiology"),
            RosterEntry::new("C", "neurology"),
        ]
    }

    #[test]
    fn test_solves_reference_scenario() {
        // 3 staff, 7 days, one per day, gap 1, quota 4, exclusivity on.
        let config = ScheduleConfig::new(1, 4, 1);
        let model = build_model(&reference_entries(), 7, &config);

        let outcome =
            DfsEngine::new().solve(&model, &mut ChronologicalBuilder::new(), &mut NoOpMonitor);
        assert!(outcome.is_solved(), "expected a solution, got {}", outcome);
        assert_eq!(outcome.reason(), &TerminationReason::SolutionFound);

        let SearchResult::Solved(solution) = outcome.result() else {
            unreachable!();
        };
        assert_satisfies(&model, solution);

        // Exactly one person per day.
        for day in 0..7 {
            assert_eq!(solution.on_duty(DayIndex::new(day)).len(), 1);
        }
        // No staff member serves two consecutive days.
        for staff in 0..3 {
            for day in 0..6 {
                let staff_index = StaffIndex::new(staff);
                assert!(
                    !(solution.is_on_duty(staff_index, DayIndex::new(day))
                        && solution.is_on_duty(staff_index, DayIndex::new(day + 1))),
                    "staff {} serves days {} and {}",
                    staff,
                    day,
                    day + 1
                );
            }
        }
        // Everyone serves two or three times over the week.
        for staff in 0..3 {
            let count = solution.duty_count(StaffIndex::new(staff));
            assert!((2..=3).contains(&count), "staff {} serves {} times", staff, count);
        }
    }

    #[test]
    fn test_root_propagation_proves_infeasibility() {
        // Both staff must serve both days, but the spacing window forbids
        // serving twice in two days; the contradiction surfaces at the root.
        let entries = vec![
            RosterEntry::new("A", "cardiology"),
            RosterEntry::new("B", "neurology"),
        ];
        let config = ScheduleConfig::new(1, 4, 2).with_specialty_exclusivity(false);
        let model = build_model(&entries, 2, &config);

        let outcome =
            DfsEngine::new().solve(&model, &mut ChronologicalBuilder::new(), &mut NoOpMonitor);
        assert!(outcome.is_infeasible());
        assert_eq!(outcome.reason(), &TerminationReason::InfeasibilityProven);
        assert_eq!(outcome.statistics().nodes_explored, 0);
    }

    #[test]
    fn test_search_proves_infeasibility_beyond_the_root() {
        // Gap 4 over 5 days caps everyone at one duty, but coverage needs
        // five duties from three staff. The root alone does not expose the
        // contradiction; systematic search must exhaust the alternatives.
        let config = ScheduleConfig::new(4, 4, 1).with_specialty_exclusivity(false);
        let model = build_model(&reference_entries(), 5, &config);

        let outcome =
            DfsEngine::new().solve(&model, &mut ChronologicalBuilder::new(), &mut NoOpMonitor);
        assert!(outcome.is_infeasible());
        assert!(outcome.statistics().backtracks > 0);
    }

    #[test]
    fn test_full_range_vacation_routes_all_duties_to_the_other_member() {
        let entries = vec![
            RosterEntry::new("A", "cardiology").vacation(date(2025, 6, 1), date(2025, 8, 31)),
            RosterEntry::new("B", "neurology"),
        ];
        let config = ScheduleConfig::new(0, 10, 1).with_specialty_exclusivity(false);
        let model = build_model(&entries, 7, &config);

        let outcome =
            DfsEngine::new().solve(&model, &mut ChronologicalBuilder::new(), &mut NoOpMonitor);
        let SearchResult::Solved(solution) = outcome.result() else {
            panic!("expected a solution, got {}", outcome);
        };
        assert_satisfies(&model, solution);
        assert_eq!(solution.duty_count(StaffIndex::new(0)), 0);
        assert_eq!(solution.duty_count(StaffIndex::new(1)), 7);
    }

    #[test]
    fn test_individual_block_is_respected() {
        let entries = vec![
            RosterEntry::new("A", "cardiology"),
            RosterEntry::new("B", "neurology"),
        ];
        let config = ScheduleConfig::new(0, 10, 1)
            .with_specialty_exclusivity(false)
            .block("A", date(2025, 7, 2));
        let model = build_model(&entries, 4, &config);

        let outcome =
            DfsEngine::new().solve(&model, &mut ChronologicalBuilder::new(), &mut NoOpMonitor);
        let SearchResult::Solved(solution) = outcome.result() else {
            panic!("expected a solution, got {}", outcome);
        };
        assert!(!solution.is_on_duty(StaffIndex::new(0), DayIndex::new(1)));
    }

    #[test]
    fn test_deterministic_under_chronological_branching() {
        let config = ScheduleConfig::new(1, 4, 1);
        let model = build_model(&reference_entries(), 7, &config);

        let mut engine = DfsEngine::new();
        let first = engine.solve(&model, &mut ChronologicalBuilder::new(), &mut NoOpMonitor);
        let second = engine.solve(&model, &mut ChronologicalBuilder::new(), &mut NoOpMonitor);

        assert_eq!(first, second, "identical runs must produce identical outcomes");
    }

    #[test]
    fn test_shuffled_strategy_is_deterministic_under_fixed_seed() {
        let config = ScheduleConfig::new(1, 4, 1);
        let model = build_model(&reference_entries(), 7, &config);

        let first =
            DfsEngine::new().solve(&model, &mut ShuffledBuilder::new(99), &mut NoOpMonitor);
        let second =
            DfsEngine::new().solve(&model, &mut ShuffledBuilder::new(99), &mut NoOpMonitor);

        assert_eq!(first, second);
        assert!(first.is_solved());
    }

    #[test]
    fn test_every_strategy_finds_a_valid_solution() {
        let config = ScheduleConfig::new(1, 4, 1);
        let model = build_model(&reference_entries(), 7, &config);

        let outcomes = [
            DfsEngine::new().solve(&model, &mut ChronologicalBuilder::new(), &mut NoOpMonitor),
            DfsEngine::new().solve(&model, &mut TightestDayBuilder::new(), &mut NoOpMonitor),
            DfsEngine::new().solve(&model, &mut ShuffledBuilder::new(7), &mut NoOpMonitor),
        ];
        for outcome in outcomes {
            let SearchResult::Solved(solution) = outcome.result() else {
                panic!("expected a solution, got {}", outcome);
            };
            assert_satisfies(&model, solution);
        }
    }

    #[test]
    fn test_expired_time_budget_reports_unknown() {
        let config = ScheduleConfig::new(1, 4, 1);
        let model = build_model(&reference_entries(), 7, &config);

        // A zero budget with an always-checking mask expires before the
        // first decision.
        let mut monitor = TimeLimitMonitor::with_clock_check_mask(Duration::ZERO, 0);
        let outcome =
            DfsEngine::new().solve(&model, &mut ChronologicalBuilder::new(), &mut monitor);

        assert!(outcome.is_unknown());
        match outcome.reason() {
            TerminationReason::Aborted(reason) => assert!(reason.contains("time limit")),
            other => panic!("expected Aborted, got {:?}", other),
        }
    }

    #[test]
    fn test_preset_interrupt_flag_aborts_the_search() {
        let config = ScheduleConfig::new(1, 4, 1);
        let model = build_model(&reference_entries(), 7, &config);

        let stop = AtomicBool::new(true);
        let mut monitor = InterruptMonitor::new(&stop);
        let outcome =
            DfsEngine::new().solve(&model, &mut ChronologicalBuilder::new(), &mut monitor);

        assert!(outcome.is_unknown());
        match outcome.reason() {
            TerminationReason::Aborted(reason) => assert!(reason.contains("interrupt")),
            other => panic!("expected Aborted, got {:?}", other),
        }
    }

    #[test]
    fn test_root_solved_instance_beats_an_expired_budget() {
        // Fixed-false plus the [7, 7] band complete the binding at the root,
        // so the solution is returned even though the budget is zero.
        let entries = vec![
            RosterEntry::new("A", "cardiology").vacation(date(2025, 6, 1), date(2025, 8, 31)),
            RosterEntry::new("B", "neurology"),
        ];
        let config = ScheduleConfig::new(0, 10, 1).with_specialty_exclusivity(false);
        let model = build_model(&entries, 7, &config);

        let mut monitor = TimeLimitMonitor::with_clock_check_mask(Duration::ZERO, 0);
        let outcome =
            DfsEngine::new().solve(&model, &mut ChronologicalBuilder::new(), &mut monitor);
        assert!(outcome.is_solved());
    }

    #[test]
    fn test_statistics_are_coherent_after_a_solve() {
        let config = ScheduleConfig::new(1, 4, 1);
        let model = build_model(&reference_entries(), 7, &config);

        let outcome =
            DfsEngine::new().solve(&model, &mut ChronologicalBuilder::new(), &mut NoOpMonitor);
        let stats = outcome.statistics();

        assert!(outcome.is_solved());
        assert!(stats.nodes_explored > 0);
        assert!(stats.propagations as usize >= model.num_vars());
        assert!(stats.max_depth > 0);
        assert!(stats.max_depth <= model.num_vars());
    }
}
