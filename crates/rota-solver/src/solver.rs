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

//! # Portfolio-Orchestrated Solver
//!
//! A high-level orchestrator that runs multiple branching strategies in
//! parallel over one immutable model, manages a shared first-solution
//! store, and enforces global termination criteria via pluggable monitors
//! (time limit, external interrupt).
//!
//! ## Motivation
//!
//! Different branching orders perform better on different instances. This
//! solver lets a portfolio of strategies compete: the first worker to find
//! a feasible binding installs it and signals the others to stop, and a
//! worker that proves infeasibility settles the run for everyone (the model
//! is shared, so one proof is a proof for all).
//!
//! ## Highlights
//!
//! - Portfolio execution: one OS thread per strategy via
//!   `std::thread::scope`, each with its own engine and a per-thread
//!   `CompositeMonitor` of interrupt and optional time-limit monitors.
//! - Shared state: a `SharedFirstSolution` accepts exactly one winner; an
//!   `AtomicBool` stop signal delivers cooperative cancellation.
//! - Outcome construction: aggregates worker outcomes under the hierarchy
//!   solution > infeasibility proof > inconclusive, with summed statistics.

use rota_dfs::{branching::decision::DecisionBuilder, engine::DfsEngine, result::DfsOutcome};
use rota_model::model::Model;
use rota_search::{
    found::SharedFirstSolution,
    monitor::{
        composite::CompositeMonitor, interrupt::InterruptMonitor, time_limit::TimeLimitMonitor,
    },
    result::{SearchResult, SolveOutcome, TerminationReason},
    stats::SolverStatisticsBuilder,
};
use std::sync::atomic::{AtomicBool, Ordering};

/// Runs a portfolio of branching strategies in parallel over one model.
pub struct Solver {
    strategies: Vec<Box<dyn DecisionBuilder + Send>>,
    time_limit: Option<std::time::Duration>,
}

impl Solver {
    /// Returns the configured time limit, if any.
    #[inline]
    pub fn time_limit(&self) -> Option<std::time::Duration> {
        self.time_limit
    }

    /// Returns the number of configured strategies.
    #[inline]
    pub fn num_strategies(&self) -> usize {
        self.strategies.len()
    }

    /// Solves the model, returning the aggregated outcome.
    ///
    /// # Panics
    ///
    /// Panics if no strategies were added.
    pub fn solve(&mut self, model: &Model) -> SolveOutcome {
        assert!(
            !self.strategies.is_empty(),
            "called `Solver::solve` with no strategies added"
        );

        let start_time = std::time::Instant::now();
        let stop_signal = AtomicBool::new(false);
        let found = SharedFirstSolution::new();

        let results = self.run_portfolio(model, &stop_signal, &found);
        Self::construct_outcome(start_time, &found, results)
    }

    /// Spawns one worker per strategy and collects their outcomes.
    fn run_portfolio(
        &mut self,
        model: &Model,
        stop_signal: &AtomicBool,
        found: &SharedFirstSolution,
    ) -> Vec<DfsOutcome> {
        let time_limit = self.time_limit;
        let mut results = Vec::with_capacity(self.strategies.len());

        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.strategies.len());

            for strategy in &mut self.strategies {
                let handle = scope.spawn(move || {
                    // Every worker carries the interrupt monitor so it can be
                    // stopped once another worker settles the run.
                    let mut monitor = CompositeMonitor::new();
                    monitor.add_monitor(InterruptMonitor::new(stop_signal));
                    if let Some(limit) = time_limit {
                        monitor.add_monitor(TimeLimitMonitor::new(limit));
                    }

                    let mut engine = DfsEngine::preallocated(model.num_vars());
                    let outcome = engine.solve(model, strategy.as_mut(), &mut monitor);

                    match outcome.result() {
                        SearchResult::Solved(solution) => {
                            found.try_install(solution);
                            stop_signal.store(true, Ordering::Relaxed);
                        }
                        SearchResult::Infeasible => {
                            // One proof settles the run for every worker.
                            stop_signal.store(true, Ordering::Relaxed);
                        }
                        SearchResult::Unknown => {}
                    }

                    outcome
                });
                handles.push(handle);
            }

            for handle in handles {
                results.push(handle.join().expect("portfolio worker thread panicked"));
            }
        });

        results
    }

    fn construct_outcome(
        start_time: std::time::Instant,
        found: &SharedFirstSolution,
        results: Vec<DfsOutcome>,
    ) -> SolveOutcome {
        let statistics = SolverStatisticsBuilder::new()
            .solutions_found(results.iter().filter(|outcome| outcome.is_solved()).count() as u64)
            .used_threads(results.len())
            .nodes_explored(
                results
                    .iter()
                    .map(|outcome| outcome.statistics().nodes_explored)
                    .sum(),
            )
            .backtracks(
                results
                    .iter()
                    .map(|outcome| outcome.statistics().backtracks)
                    .sum(),
            )
            .solve_duration(start_time.elapsed())
            .build();

        // Hierarchy: solution > infeasibility proof > inconclusive.
        if let Some(solution) = found.snapshot() {
            return SolveOutcome::solved(solution, statistics);
        }

        if results.iter().any(|outcome| outcome.is_infeasible()) {
            return SolveOutcome::infeasible(statistics);
        }

        let reason = Self::determine_abort_reason(&results);
        SolveOutcome::unknown(reason, statistics)
    }

    fn determine_abort_reason(results: &[DfsOutcome]) -> String {
        results
            .iter()
            .find_map(|outcome| match outcome.reason() {
                TerminationReason::Aborted(reason) => Some(reason.clone()),
                _ => None,
            })
            .unwrap_or_else(|| "search ended without conclusion".to_string())
    }
}

impl std::fmt::Debug for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let strategies = self
            .strategies
            .iter()
            .map(|strategy| strategy.name())
            .collect::<Vec<&str>>()
            .join(", ");
        f.debug_struct("Solver")
            .field("strategies", &strategies)
            .field("time_limit", &self.time_limit)
            .finish()
    }
}

/// Builder for [`Solver`].
pub struct SolverBuilder {
    strategies: Vec<Box<dyn DecisionBuilder + Send>>,
    time_limit: Option<std::time::Duration>,
}

impl Default for SolverBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SolverBuilder {
    /// Creates an empty builder.
    #[inline]
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
            time_limit: None,
        }
    }

    /// Creates a builder preloaded with the standard strategy portfolio:
    /// chronological, tightest-day, and a seeded shuffled order.
    pub fn default_portfolio() -> Self {
        use rota_dfs::branching::{
            chronological::ChronologicalBuilder, shuffled::ShuffledBuilder,
            tightest::TightestDayBuilder,
        };
        Self::new()
            .add_strategy(ChronologicalBuilder::new())
            .add_strategy(TightestDayBuilder::new())
            .add_strategy(ShuffledBuilder::new(0x5EED))
    }

    /// Sets the wall-clock budget applied to every worker.
    #[inline]
    pub fn with_time_limit(mut self, limit: std::time::Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Adds a branching strategy to the portfolio.
    #[inline]
    pub fn add_strategy<S>(mut self, strategy: S) -> Self
    where
        S: DecisionBuilder + Send + 'static,
    {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Builds the solver.
    #[inline]
    pub fn build(self) -> Solver {
        Solver {
            strategies: self.strategies,
            time_limit: self.time_limit,
        }
    }
}
