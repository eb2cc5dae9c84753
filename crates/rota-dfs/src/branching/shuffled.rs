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
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use rota_model::{index::VarIndex, model::Model};

/// Branches over a seeded random permutation of the variable space, trying
/// the on-duty polarity first.
///
/// A portfolio of workers running the same deterministic strategy would
/// explore the same tree; a shuffled order gives each worker a different
/// path for the same model. The permutation is derived from the seed alone,
/// so a fixed seed reproduces the identical search run after run.
#[derive(Debug, Clone)]
pub struct ShuffledBuilder {
    seed: u64,
    order: Vec<VarIndex>,
}

impl ShuffledBuilder {
    /// Creates the builder with the given seed.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            order: Vec::new(),
        }
    }

    /// Returns the seed this builder permutes with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl DecisionBuilder for ShuffledBuilder {
    fn name(&self) -> &str {
        "ShuffledBuilder"
    }

    fn prepare(&mut self, model: &Model) {
        self.order = (0..model.num_vars()).map(VarIndex::new).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.order.shuffle(&mut rng);
    }

    fn next_decision(&mut self, _model: &Model, state: &SearchState) -> Option<Decision> {
        self.order
            .iter()
            .find(|&&var| !state.is_assigned(var))
            .map(|&var| Decision::new(var, true))
    }
}
