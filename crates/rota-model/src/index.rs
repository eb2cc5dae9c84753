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

use rota_core::utils::index::{TypedIndex, TypedIndexTag};

/// A tag type for staff indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StaffIndexTag;

impl TypedIndexTag for StaffIndexTag {
    const NAME: &'static str = "StaffIndex";
}

/// A typed index for staff members.
pub type StaffIndex = TypedIndex<StaffIndexTag>;

/// A tag type for day indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DayIndexTag;

impl TypedIndexTag for DayIndexTag {
    const NAME: &'static str = "DayIndex";
}

/// A typed index for calendar days.
pub type DayIndex = TypedIndex<DayIndexTag>;

/// A tag type for decision-variable indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct VarIndexTag;

impl TypedIndexTag for VarIndexTag {
    const NAME: &'static str = "VarIndex";
}

/// A typed index for boolean decision variables `x[staff, day]`.
pub type VarIndex = TypedIndex<VarIndexTag>;

/// A tag type for constraint indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ConstraintIndexTag;

impl TypedIndexTag for ConstraintIndexTag {
    const NAME: &'static str = "ConstraintIndex";
}

/// A typed index for constraint rows of a model.
pub type ConstraintIndex = TypedIndex<ConstraintIndexTag>;
