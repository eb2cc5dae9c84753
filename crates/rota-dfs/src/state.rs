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

//! Search state management for the constraint engine.
//!
//! This module provides `SearchState`, a compact, mutable container for
//! tracking the incremental binding of decision variables during search.
//!
//! Key responsibilities:
//! - Maintain the assigned/value bitsets over the flattened variable space.
//! - Maintain, per constraint, the count of variables bound true and the
//!   count still unassigned, so propagation never rescans a constraint to
//!   learn its tallies.
//! - Uphold the invariant `num_assigned <= num_vars` and keep the tallies
//!   exactly consistent with the bitsets across bind/unbind pairs.
//!
//! Debug assertions are used extensively to catch invariant violations in
//! debug builds; release builds rely on the trail discipline of the engine.

use fixedbitset::FixedBitSet;
use rota_model::{
    index::{ConstraintIndex, VarIndex},
    model::Model,
    solution::Solution,
};

/// A compact, mutable container holding the incremental search state.
///
/// The state tracks:
/// - `assigned`: whether each variable is currently bound.
/// - `values`: the bound value of each variable (meaningful only while the
///   corresponding `assigned` bit is set).
/// - `true_counts[c]`: how many of constraint `c`'s variables are bound true.
/// - `unassigned_counts[c]`: how many of constraint `c`'s variables are
///   still unbound.
/// - `num_assigned`: total bound variables.
#[derive(Debug, Clone)]
pub struct SearchState {
    assigned: FixedBitSet,
    values: FixedBitSet,
    true_counts: Vec<u32>,
    unassigned_counts: Vec<u32>,
    num_assigned: usize,
}

impl SearchState {
    /// Creates the root state for the given model: nothing assigned, every
    /// constraint's unassigned tally equal to its size.
    pub fn new(model: &Model) -> Self {
        let num_vars = model.num_vars();
        Self {
            assigned: FixedBitSet::with_capacity(num_vars),
            values: FixedBitSet::with_capacity(num_vars),
            true_counts: vec![0; model.num_constraints()],
            unassigned_counts: model
                .constraints()
                .iter()
                .map(|constraint| constraint.len() as u32)
                .collect(),
            num_assigned: 0,
        }
    }

    /// Returns the number of decision variables.
    #[inline]
    pub fn num_vars(&self) -> usize {
        self.assigned.len()
    }

    /// Returns the number of bound variables.
    #[inline]
    pub fn num_assigned(&self) -> usize {
        self.num_assigned
    }

    /// Returns `true` once every variable is bound.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.num_assigned == self.num_vars()
    }

    /// Returns `true` if the variable is currently bound.
    #[inline]
    pub fn is_assigned(&self, var_index: VarIndex) -> bool {
        debug_assert!(
            var_index.get() < self.num_vars(),
            "called `SearchState::is_assigned` with variable index out of bounds: the len is {} but the index is {}",
            self.num_vars(),
            var_index.get()
        );
        self.assigned.contains(var_index.get())
    }

    /// Returns the value bound to a variable.
    ///
    /// # Panics
    ///
    /// In debug mode, panics if the variable is unbound.
    #[inline]
    pub fn value(&self, var_index: VarIndex) -> bool {
        debug_assert!(
            self.is_assigned(var_index),
            "called `SearchState::value` on unassigned variable {}",
            var_index
        );
        self.values.contains(var_index.get())
    }

    /// Returns how many of a constraint's variables are bound true.
    #[inline]
    pub fn true_count(&self, constraint_index: ConstraintIndex) -> u32 {
        self.true_counts[constraint_index.get()]
    }

    /// Returns how many of a constraint's variables are still unbound.
    #[inline]
    pub fn unassigned_count(&self, constraint_index: ConstraintIndex) -> u32 {
        self.unassigned_counts[constraint_index.get()]
    }

    /// Binds a variable and updates every affected constraint tally.
    ///
    /// # Panics
    ///
    /// In debug mode, panics if the variable is already bound.
    #[inline]
    pub fn bind(&mut self, model: &Model, var_index: VarIndex, value: bool) {
        debug_assert!(
            !self.is_assigned(var_index),
            "called `SearchState::bind` on already assigned variable {}",
            var_index
        );

        self.assigned.insert(var_index.get());
        self.values.set(var_index.get(), value);
        self.num_assigned += 1;

        for &constraint_index in model.memberships(var_index) {
            let row = constraint_index.get();
            debug_assert!(self.unassigned_counts[row] > 0);
            self.unassigned_counts[row] -= 1;
            if value {
                self.true_counts[row] += 1;
            }
        }
    }

    /// Reverts a `bind`, restoring every affected constraint tally.
    ///
    /// # Panics
    ///
    /// In debug mode, panics if the variable is unbound.
    #[inline]
    pub fn unbind(&mut self, model: &Model, var_index: VarIndex) {
        debug_assert!(
            self.is_assigned(var_index),
            "called `SearchState::unbind` on unassigned variable {}",
            var_index
        );

        let value = self.values.contains(var_index.get());
        self.assigned.set(var_index.get(), false);
        self.num_assigned -= 1;

        for &constraint_index in model.memberships(var_index) {
            let row = constraint_index.get();
            self.unassigned_counts[row] += 1;
            if value {
                debug_assert!(self.true_counts[row] > 0);
                self.true_counts[row] -= 1;
            }
        }
    }

    /// Returns `true` if every constraint is satisfied by the current
    /// (possibly partial) binding: no upper bound exceeded and every lower
    /// bound still reachable.
    pub fn is_consistent(&self, model: &Model) -> bool {
        model.constraints().iter().enumerate().all(|(row, constraint)| {
            let true_count = self.true_counts[row];
            let unassigned = self.unassigned_counts[row];
            true_count <= constraint.hi() && true_count + unassigned >= constraint.lo()
        })
    }

    /// Extracts the complete binding as a [`Solution`].
    ///
    /// # Panics
    ///
    /// In debug mode, panics if the binding is incomplete or inconsistent.
    pub fn to_solution(&self, model: &Model) -> Solution {
        debug_assert!(
            self.is_complete(),
            "called `SearchState::to_solution` on an incomplete binding"
        );
        debug_assert!(
            self.is_consistent(model),
            "called `SearchState::to_solution` on an inconsistent binding"
        );
        Solution::new(model.num_staff(), model.num_days(), self.values.clone())
    }
}
