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

//! Branching strategies for rota search.
//!
//! Defines the decision type and the builders that choose which variable to
//! bind next during branch-and-backtrack search. Every builder tries the
//! on-duty polarity first and is deterministic given its construction
//! parameters.
//!
//! Provided builders:
//! - `chronological`: first unbound variable in day-major order.
//! - `tightest`: most-constrained day first (fewest spare candidates for
//!   the remaining coverage).
//! - `shuffled`: a seeded random variable order for portfolio diversity;
//!   identical seeds reproduce identical searches.

pub mod chronological;
pub mod decision;
pub mod shuffled;
pub mod tightest;
