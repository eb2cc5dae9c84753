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

use crate::state::SearchState;
use rota_model::{index::VarIndex, model::Model};

/// A branching decision: bind `var` to `value` first; the engine tries the
/// opposite polarity on backtrack.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decision {
    var: VarIndex,
    value: bool,
}

impl Decision {
    /// Creates a decision.
    #[inline]
    pub fn new(var: VarIndex, value: bool) -> Self {
        Self { var, value }
    }

    /// Returns the variable to bind.
    #[inline]
    pub fn var(&self) -> VarIndex {
        self.var
    }

    /// Returns the polarity to try first.
    #[inline]
    pub fn value(&self) -> bool {
        self.value
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Decision(var: {}, value: {})", self.var, self.value)
    }
}

/// Chooses the next branching decision from the current search state.
///
/// `next_decision` must return `None` exactly when every variable is bound;
/// builders that track extra structure receive `prepare` once per solve.
pub trait DecisionBuilder {
    /// A short human-readable name for diagnostics.
    fn name(&self) -> &str;

    /// Called once per solve, before the root propagation.
    fn prepare(&mut self, _model: &Model) {}

    /// Returns the next decision, or `None` when the binding is complete.
    fn next_decision(&mut self, model: &Model, state: &SearchState) -> Option<Decision>;
}

impl std::fmt::Debug for dyn DecisionBuilder + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DecisionBuilder({})", self.name())
    }
}
