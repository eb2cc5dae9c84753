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

/// Branches on the first unbound variable in day-major order, trying the
/// on-duty polarity first.
///
/// Filling the horizon day by day lets the coverage constraint of each day
/// close early, which keeps propagation cascades short. The traversal is
/// fully deterministic, so two runs over the same model take the same path
/// and return the same solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChronologicalBuilder;

impl ChronologicalBuilder {
    /// Creates the builder.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl DecisionBuilder for ChronologicalBuilder {
    fn name(&self) -> &str {
        "ChronologicalBuilder"
    }

    fn next_decision(&mut self, model: &Model, state: &SearchState) -> Option<Decision> {
        for day in 0..model.num_days() {
            for staff in 0..model.num_staff() {
                let var = model.var_index(StaffIndex::new(staff), DayIndex::new(day));
                if !state.is_assigned(var) {
                    return Some(Decision::new(var, true));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rota_model::calendar::CalendarBuilder;
    use rota_model::config::ScheduleConfig;
    use rota_model::model::ModelBuilder;
    use rota_model::roster::{Roster, RosterEntry};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn model() -> rota_model::model::Model {
        let calendar = CalendarBuilder::new(date(2025, 7, 1), date(2025, 7, 2))
            .build()
            .unwrap();
        let roster = Roster::from_entries(&[
            RosterEntry::new("A", "cardiology"),
            RosterEntry::new("B", "neurology"),
        ])
        .unwrap();
        let config = ScheduleConfig::new(0, 4, 1).with_specialty_exclusivity(false);
        ModelBuilder::new(&calendar, &roster, &config).build().unwrap()
    }

    #[test]
    fn test_day_major_order_duty_first() {
        let model = model();
        let mut state = SearchState::new(&model);
        let mut builder = ChronologicalBuilder::new();

        let first = builder.next_decision(&model, &state).unwrap();
        assert_eq!(
            first.var(),
            model.var_index(StaffIndex::new(0), DayIndex::new(0))
        );
        assert!(first.value());

        // Binding the first staff member moves the choice to the second
        // member of the same day, not the next day.
        state.bind(&model, first.var(), false);
        let second = builder.next_decision(&model, &state).unwrap();
        assert_eq!(
            second.var(),
            model.var_index(StaffIndex::new(1), DayIndex::new(0))
        );
    }

    #[test]
    fn test_returns_none_when_complete() {
        let model = model();
        let mut state = SearchState::new(&model);
        let mut builder = ChronologicalBuilder::new();

        for var in 0..model.num_vars() {
            state.bind(&model, rota_model::index::VarIndex::new(var), false);
        }
        assert!(builder.next_decision(&model, &state).is_none());
    }
}
