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

use crate::{
    branching::decision::{Decision, DecisionBuilder},
    state::SearchState,
};
use rota_model::{
    index::{DayIndex, StaffIndex},
    model::Model,
};

/// Branches on the most constrained day first: the open day whose coverage
/// constraint has the fewest spare candidates relative to the coverage it
/// still needs. Ties break toward the earlier day, keeping the strategy
/// deterministic.
///
/// Days with no slack are where infeasibility surfaces fastest, so visiting
/// them first shrinks the search tree on tight instances (the
/// minimum-remaining-values heuristic applied to coverage).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TightestDayBuilder;

impl TightestDayBuilder {
    /// Creates the builder.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl DecisionBuilder for TightestDayBuilder {
    fn name(&self) -> &str {
        "TightestDayBuilder"
    }

    fn next_decision(&mut self, model: &Model, state: &SearchState) -> Option<Decision> {
        let mut best_day: Option<(u32, DayIndex)> = None;

        for day in 0..model.num_days() {
            let day_index = DayIndex::new(day);
            let constraint_index = model.coverage_constraint(day_index);
            let unassigned = state.unassigned_count(constraint_index);
            if unassigned == 0 {
                continue;
            }

            // After propagation every open coverage constraint still needs
            // duties, so slack = candidates - needed is well-defined.
            let needed = model
                .constraint(constraint_index)
                .lo()
                .saturating_sub(state.true_count(constraint_index));
            let slack = unassigned.saturating_sub(needed);

            match best_day {
                Some((best_slack, _)) if best_slack <= slack => {}
                _ => best_day = Some((slack, day_index)),
            }
        }

        let (_, day_index) = best_day?;
        for staff in 0..model.num_staff() {
            let var = model.var_index(StaffIndex::new(staff), day_index);
            if !state.is_assigned(var) {
                return Some(Decision::new(var, true));
            }
        }
        unreachable!("day with unassigned coverage variables has an unassigned variable")
    }
}
