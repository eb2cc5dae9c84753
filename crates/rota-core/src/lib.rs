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

//! # Rota Core
//!
//! Foundational utilities and math primitives for the rota on-call
//! scheduling ecosystem. This crate consolidates the reusable building
//! blocks that underpin the higher-level model and solver crates.
//!
//! ## Modules
//!
//! - `math`: Inclusive interval `[start, end]` primitives with validation,
//!   containment and overlap queries, measurement, and iteration. Used to
//!   represent vacation spans on a day-ordinal axis.
//! - `utils`: Phantom-tagged, strongly typed indices (`TypedIndex<T>`) that
//!   keep the staff, day, variable, and constraint index spaces from being
//!   accidentally mixed.
//!
//! ## Purpose
//!
//! These primitives enable robust, generic code in the scheduling pipeline,
//! reducing accidental bugs (e.g., index mixing) while keeping runtime
//! overhead minimal.

pub mod math;
pub mod utils;
