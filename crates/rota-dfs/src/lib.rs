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

//! # Rota DFS
//!
//! The search engine of the rota scheduling pipeline: a backtracking
//! depth-first search with unit propagation over cardinality constraints.
//!
//! One solve invocation walks the state machine
//! `Unstarted -> Propagating -> {Branching <-> Propagating} -> terminal`:
//! the root applies the model's fixed-false variables and propagates to a
//! fixpoint, then the engine alternates between taking a branching decision
//! and propagating its consequences, undoing both through a trail on every
//! conflict. Exhausting the root's two polarities proves infeasibility;
//! completing the binding yields a solution; a monitor can cut the search
//! short at any node boundary.
//!
//! The engine is deliberately split along the same seams as the rest of the
//! workspace: `state` holds the mutable assignment, `trail` the undo log,
//! `propagate` the inference rules, and `branching` the pluggable decision
//! strategies. `engine` ties them together in a per-run search session.

pub mod branching;
pub mod engine;
pub mod propagate;
pub mod result;
pub mod state;
pub mod stats;
pub mod trail;
