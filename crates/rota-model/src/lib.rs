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

//! # Rota Model
//!
//! **The Core Domain Model for the Rota On-Call Scheduling Solver.**
//!
//! This crate defines the data structures that represent an on-call duty
//! assignment problem: who can be on duty when, and which hard rules any
//! roster must satisfy. It serves as the data interchange layer between the
//! problem definition (user input) and the solving engine (`rota_dfs`).
//!
//! ## Architecture
//!
//! The crate is designed around a strict separation of concerns between
//! **construction** and **solving**:
//!
//! * **`index`**: Strongly-typed wrappers (`StaffIndex`, `DayIndex`,
//!   `VarIndex`, `ConstraintIndex`) to prevent logical indexing errors.
//! * **`calendar`**: The ordered day sequence with day kinds and month
//!   buckets, built once per run by `CalendarBuilder`.
//! * **`roster`**: Immutable staff records with specialty tags and vacation
//!   spans.
//! * **`config`**: The explicit, immutable configuration value threaded
//!   through the pipeline; no component reads ambient state.
//! * **`validate`**: Fail-fast input validation so the solver never sees an
//!   inconsistent instance.
//! * **`model`**: The `Model` (immutable, optimized for solving) and
//!   `ModelBuilder` (translates calendar + roster + config into cardinality
//!   constraints over boolean decision variables).
//! * **`solution`**: A total binding of every decision variable.
//! * **`schedule`**: The per-day output rows extracted from a solution.
//!
//! ## Design Philosophy
//!
//! 1.  **Type Safety**: Indices are distinct types. You cannot accidentally
//!     use a `StaffIndex` to access a day.
//! 2.  **Single Constraint Normal Form**: every rule — coverage, spacing,
//!     quotas, fairness bands, specialty exclusivity — is a cardinality
//!     bound `lo <= sum(vars) <= hi`, which keeps propagation uniform.
//! 3.  **Fail-Fast**: Builders and validators reject bad input eagerly so
//!     the search phase only ever observes a well-formed model.

pub mod calendar;
pub mod config;
pub mod index;
pub mod model;
pub mod roster;
pub mod schedule;
pub mod solution;
pub mod validate;
