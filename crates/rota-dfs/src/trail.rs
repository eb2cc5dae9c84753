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

//! Trail-based undo for the search engine.
//!
//! Every binding applied during search — decision or propagation — is
//! recorded on a linear log. A frame marker is pushed per decision level;
//! backtracking undoes all bindings recorded after the frame's start index
//! and either flips the decision to its second polarity or pops the frame
//! entirely. Root bindings (fixed-false variables and their consequences)
//! sit below the first frame and are never undone.

use crate::state::SearchState;
use rota_model::{index::VarIndex, model::Model};

/// A frame marker describing one decision level on the trail.
///
/// `entry_start` is the trail length at the moment the decision was taken;
/// all bindings recorded at or after it belong to this level. `flipped`
/// records whether the second polarity has already been tried.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameEntry {
    decision_var: VarIndex,
    first_value: bool,
    flipped: bool,
    entry_start: usize,
}

impl FrameEntry {
    /// Returns the decision variable of this frame.
    #[inline]
    pub fn decision_var(&self) -> VarIndex {
        self.decision_var
    }

    /// Returns the polarity tried first at this frame.
    #[inline]
    pub fn first_value(&self) -> bool {
        self.first_value
    }

    /// Returns `true` once both polarities have been tried.
    #[inline]
    pub fn flipped(&self) -> bool {
        self.flipped
    }

    /// Returns the trail length at the moment this frame was opened.
    #[inline]
    pub fn entry_start(&self) -> usize {
        self.entry_start
    }
}

impl std::fmt::Display for FrameEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Frame(var: {}, first: {}, flipped: {}, start: {})",
            self.decision_var, self.first_value, self.flipped, self.entry_start
        )
    }
}

/// The linear undo log of the search: bound variables in binding order plus
/// a stack of decision frames.
#[derive(Debug, Clone, Default)]
pub struct SearchTrail {
    entries: Vec<VarIndex>,
    frames: Vec<FrameEntry>,
}

impl SearchTrail {
    /// Creates an empty trail.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty trail with capacity for the given variable count.
    #[inline]
    pub fn preallocated(num_vars: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_vars),
            frames: Vec::with_capacity(num_vars),
        }
    }

    /// Records one applied binding.
    #[inline]
    pub fn push_entry(&mut self, var_index: VarIndex) {
        self.entries.push(var_index);
    }

    /// Returns the number of recorded bindings.
    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the current decision depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Opens a new decision frame at the current trail position.
    #[inline]
    pub fn push_frame(&mut self, decision_var: VarIndex, first_value: bool) {
        self.frames.push(FrameEntry {
            decision_var,
            first_value,
            flipped: false,
            entry_start: self.entries.len(),
        });
    }

    /// Returns the innermost frame, if any.
    #[inline]
    pub fn last_frame(&self) -> Option<FrameEntry> {
        self.frames.last().copied()
    }

    /// Marks the innermost frame as having tried both polarities.
    ///
    /// # Panics
    ///
    /// Panics if there is no open frame.
    #[inline]
    pub fn mark_last_flipped(&mut self) {
        self.frames
            .last_mut()
            .expect("called `SearchTrail::mark_last_flipped` with no open frame")
            .flipped = true;
    }

    /// Pops the innermost frame without touching the entry log.
    #[inline]
    pub fn pop_frame(&mut self) -> Option<FrameEntry> {
        self.frames.pop()
    }

    /// Undoes every binding recorded at or after `entry_start`, newest
    /// first, restoring the search state tallies exactly.
    pub fn undo_to(&mut self, model: &Model, state: &mut SearchState, entry_start: usize) {
        debug_assert!(
            entry_start <= self.entries.len(),
            "called `SearchTrail::undo_to` beyond the trail end: the len is {} but the start is {}",
            self.entries.len(),
            entry_start
        );
        while self.entries.len() > entry_start {
            let var_index = self.entries.pop().expect("trail entry count checked above");
            state.unbind(model, var_index);
        }
    }

    /// Clears all entries and frames, keeping capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rota_model::calendar::CalendarBuilder;
    use rota_model::config::ScheduleConfig;
    use rota_model::index::{ConstraintIndex, DayIndex, StaffIndex};
    use rota_model::model::ModelBuilder;
    use rota_model::roster::{Roster, RosterEntry};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn small_model() -> rota_model::model::Model {
        let calendar = CalendarBuilder::new(date(2025, 7, 1), date(2025, 7, 3))
            .build()
            .unwrap();
        let roster = Roster::from_entries(&[
            RosterEntry::new("A", "cardiology"),
            RosterEntry::new("B", "neurology"),
        ])
        .unwrap();
        let config = ScheduleConfig::new(1, 4, 1).with_specialty_exclusivity(false);
        ModelBuilder::new(&calendar, &roster, &config).build().unwrap()
    }

    #[test]
    fn test_frames_track_entry_positions() {
        let mut trail = SearchTrail::new();
        assert_eq!(trail.depth(), 0);
        assert!(trail.last_frame().is_none());

        trail.push_entry(VarIndex::new(0));
        trail.push_frame(VarIndex::new(1), true);

        let frame = trail.last_frame().unwrap();
        assert_eq!(frame.decision_var(), VarIndex::new(1));
        assert!(frame.first_value());
        assert!(!frame.flipped());
        assert_eq!(frame.entry_start(), 1);
    }

    #[test]
    fn test_mark_last_flipped() {
        let mut trail = SearchTrail::new();
        trail.push_frame(VarIndex::new(0), true);
        trail.mark_last_flipped();
        assert!(trail.last_frame().unwrap().flipped());
    }

    #[test]
    fn test_undo_restores_state_exactly() {
        let model = small_model();
        let mut state = SearchState::new(&model);
        let reference = state.clone();
        let mut trail = SearchTrail::new();

        // A root binding below the frame must survive the undo.
        let root_var = model.var_index(StaffIndex::new(0), DayIndex::new(0));
        state.bind(&model, root_var, false);
        trail.push_entry(root_var);

        trail.push_frame(model.var_index(StaffIndex::new(1), DayIndex::new(0)), true);
        let frame = trail.last_frame().unwrap();

        for day in 0..3 {
            let var = model.var_index(StaffIndex::new(1), DayIndex::new(day));
            state.bind(&model, var, day == 0);
            trail.push_entry(var);
        }
        assert_eq!(state.num_assigned(), 4);

        trail.undo_to(&model, &mut state, frame.entry_start());
        assert_eq!(trail.num_entries(), 1);
        assert_eq!(state.num_assigned(), 1);
        assert!(state.is_assigned(root_var));

        // Tallies match a fresh state with only the root binding applied.
        let mut expected = reference.clone();
        expected.bind(&model, root_var, false);
        for row in 0..model.num_constraints() {
            let constraint_index = ConstraintIndex::new(row);
            assert_eq!(
                state.true_count(constraint_index),
                expected.true_count(constraint_index)
            );
            assert_eq!(
                state.unassigned_count(constraint_index),
                expected.unassigned_count(constraint_index)
            );
        }
    }

    #[test]
    fn test_clear_keeps_nothing() {
        let mut trail = SearchTrail::new();
        trail.push_entry(VarIndex::new(0));
        trail.push_frame(VarIndex::new(1), false);
        trail.clear();
        assert_eq!(trail.num_entries(), 0);
        assert_eq!(trail.depth(), 0);
    }
}
