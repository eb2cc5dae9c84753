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

//! # Rota Search
//!
//! Search infrastructure shared by every engine that explores a rota model:
//! the monitor abstraction that lets callers bound and observe a search
//! (time limits, external interrupts, composite stacks, progress logging),
//! the concurrent first-solution store used by parallel portfolios, and the
//! outcome and statistics types every solve reports through.
//!
//! The engine itself lives in `rota_dfs`; the parallel orchestration in
//! `rota_solver`. This crate has no opinion on how the search is conducted,
//! only on how it is controlled and what it returns.

pub mod found;
pub mod monitor;
pub mod result;
pub mod stats;
