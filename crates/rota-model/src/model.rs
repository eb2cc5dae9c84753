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

//! # Decision Model
//!
//! Translates a calendar, roster, and configuration into the immutable
//! constraint model consumed by the search engine.
//!
//! The variable space is the boolean grid `x[staff, day]`, flattened
//! staff-major so `VarIndex = staff * num_days + day`. Every rule is encoded
//! in a single normal form, the [`CardinalityConstraint`]
//! `lo <= sum(vars) <= hi`:
//!
//! - daily coverage: `lo = hi = staff_per_day` over a day's column;
//! - minimum spacing: `hi = 1` over each sliding window of a staff row;
//! - monthly quota: `hi = max_per_month` over a staff row's month slice;
//! - fairness bands: `[lo, hi]` over a staff row (all days, weekend days);
//! - specialty exclusivity: `hi = 1` over a specialty's column entries.
//!
//! Unavailability (vacations and individual blocks) does not generate
//! constraint rows; it becomes a list of variables pre-fixed to false that
//! the engine applies at the root of search.
//!
//! Fairness bands divide the duty total among the *effectively available*
//! staff: members whose unavailability covers the entire range are excluded
//! from the divisor and receive no band rows (their variables are all fixed
//! false already). Partial unavailability does not shrink a member's band;
//! if vacations make a band unreachable the model is simply infeasible and
//! the engine proves it.
//!
//! The model is built once per run and never mutated after the search
//! engine begins, which is what makes parallel search over it safe.

use crate::{
    calendar::{Calendar, DayKind},
    config::ScheduleConfig,
    index::{ConstraintIndex, DayIndex, StaffIndex, VarIndex},
    roster::Roster,
};
use smallvec::SmallVec;

/// A cardinality bound `lo <= sum(vars) <= hi` over a set of boolean
/// decision variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardinalityConstraint {
    vars: Vec<VarIndex>,
    lo: u32,
    hi: u32,
}

impl CardinalityConstraint {
    /// Creates a new constraint.
    ///
    /// # Panics
    ///
    /// Panics if `lo > hi` or the variable set is empty.
    #[inline]
    pub fn new(vars: Vec<VarIndex>, lo: u32, hi: u32) -> Self {
        assert!(
            lo <= hi,
            "called `CardinalityConstraint::new` with lo {} > hi {}",
            lo,
            hi
        );
        assert!(
            !vars.is_empty(),
            "called `CardinalityConstraint::new` with an empty variable set"
        );
        Self { vars, lo, hi }
    }

    /// Returns the variables this constraint ranges over.
    #[inline]
    pub fn vars(&self) -> &[VarIndex] {
        &self.vars
    }

    /// Returns the inclusive lower bound on the number of true variables.
    #[inline]
    pub fn lo(&self) -> u32 {
        self.lo
    }

    /// Returns the inclusive upper bound on the number of true variables.
    #[inline]
    pub fn hi(&self) -> u32 {
        self.hi
    }

    /// Returns the number of variables in this constraint.
    #[inline]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// A constraint is never empty; provided for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl std::fmt::Display for CardinalityConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cardinality({} <= sum of {} vars <= {})",
            self.lo,
            self.vars.len(),
            self.hi
        )
    }
}

/// A structural impossibility detectable without search: more staff are
/// requested per day than exist on the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverconstrainedError {
    /// The requested daily coverage.
    pub staff_per_day: u32,
    /// The roster size.
    pub num_staff: usize,
}

impl std::fmt::Display for OverconstrainedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "staff_per_day ({}) exceeds the roster size ({})",
            self.staff_per_day, self.num_staff
        )
    }
}

impl std::error::Error for OverconstrainedError {}

/// The immutable constraint model for one scheduling run.
///
/// Holds the flattened variable space, every constraint row, the reverse
/// variable-to-constraint membership lists used by propagation, and the
/// variables pre-fixed to false by unavailability.
#[derive(Clone, Debug)]
pub struct Model {
    num_staff: usize,
    num_days: usize,
    staff_per_day: u32,
    constraints: Vec<CardinalityConstraint>,
    var_constraints: Vec<SmallVec<[ConstraintIndex; 8]>>,
    coverage_constraints: Vec<ConstraintIndex>,
    fixed_false: Vec<VarIndex>,
}

impl Model {
    /// Returns the number of staff members.
    #[inline]
    pub fn num_staff(&self) -> usize {
        self.num_staff
    }

    /// Returns the number of days in the horizon.
    #[inline]
    pub fn num_days(&self) -> usize {
        self.num_days
    }

    /// Returns the total number of decision variables.
    #[inline]
    pub fn num_vars(&self) -> usize {
        self.num_staff * self.num_days
    }

    /// Returns the configured daily coverage.
    #[inline]
    pub fn staff_per_day(&self) -> u32 {
        self.staff_per_day
    }

    /// Flattens a (staff, day) pair into its variable index.
    ///
    /// # Panics
    ///
    /// In debug mode, panics if either index is out of bounds.
    #[inline(always)]
    pub fn var_index(&self, staff_index: StaffIndex, day_index: DayIndex) -> VarIndex {
        debug_assert!(
            staff_index.get() < self.num_staff,
            "called `Model::var_index` with staff index out of bounds: the len is {} but the index is {}",
            self.num_staff,
            staff_index.get()
        );
        debug_assert!(
            day_index.get() < self.num_days,
            "called `Model::var_index` with day index out of bounds: the len is {} but the index is {}",
            self.num_days,
            day_index.get()
        );
        VarIndex::new(staff_index.get() * self.num_days + day_index.get())
    }

    /// Returns the staff member a variable belongs to.
    #[inline(always)]
    pub fn staff_of(&self, var_index: VarIndex) -> StaffIndex {
        StaffIndex::new(var_index.get() / self.num_days)
    }

    /// Returns the day a variable belongs to.
    #[inline(always)]
    pub fn day_of(&self, var_index: VarIndex) -> DayIndex {
        DayIndex::new(var_index.get() % self.num_days)
    }

    /// Returns all constraint rows.
    #[inline]
    pub fn constraints(&self) -> &[CardinalityConstraint] {
        &self.constraints
    }

    /// Returns the number of constraint rows.
    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Returns the constraint at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `constraint_index` is out of bounds.
    #[inline]
    pub fn constraint(&self, constraint_index: ConstraintIndex) -> &CardinalityConstraint {
        &self.constraints[constraint_index.get()]
    }

    /// Returns the constraints a variable participates in.
    ///
    /// # Panics
    ///
    /// Panics if `var_index` is out of bounds.
    #[inline]
    pub fn memberships(&self, var_index: VarIndex) -> &[ConstraintIndex] {
        &self.var_constraints[var_index.get()]
    }

    /// Returns the coverage constraint of the given day.
    ///
    /// # Panics
    ///
    /// Panics if `day_index` is out of bounds.
    #[inline]
    pub fn coverage_constraint(&self, day_index: DayIndex) -> ConstraintIndex {
        self.coverage_constraints[day_index.get()]
    }

    /// Returns the variables fixed to false by unavailability, sorted and
    /// deduplicated.
    #[inline]
    pub fn fixed_false(&self) -> &[VarIndex] {
        &self.fixed_false
    }
}

/// Translates calendar + roster + configuration into a [`Model`].
///
/// Construction is deterministic: constraint rows are emitted in a fixed
/// order (coverage, spacing, monthly quota, total band, weekend band,
/// specialty exclusivity), so identical inputs always produce identical
/// models and, under a deterministic branching strategy, identical search.
#[derive(Clone, Copy, Debug)]
pub struct ModelBuilder<'a> {
    calendar: &'a Calendar,
    roster: &'a Roster,
    config: &'a ScheduleConfig,
}

impl<'a> ModelBuilder<'a> {
    /// Creates a builder over the given inputs.
    #[inline]
    pub fn new(calendar: &'a Calendar, roster: &'a Roster, config: &'a ScheduleConfig) -> Self {
        Self {
            calendar,
            roster,
            config,
        }
    }

    /// Builds the model.
    ///
    /// Fails with [`OverconstrainedError`] when the requested daily coverage
    /// exceeds the roster size; every other inconsistency is left for the
    /// search engine to prove infeasible.
    pub fn build(self) -> Result<Model, OverconstrainedError> {
        let num_staff = self.roster.num_staff();
        let num_days = self.calendar.num_days();
        let staff_per_day = self.config.staff_per_day();

        if staff_per_day as usize > num_staff {
            return Err(OverconstrainedError {
                staff_per_day,
                num_staff,
            });
        }

        let mut model = Model {
            num_staff,
            num_days,
            staff_per_day,
            constraints: Vec::new(),
            var_constraints: vec![SmallVec::new(); num_staff * num_days],
            coverage_constraints: Vec::with_capacity(num_days),
            fixed_false: Vec::new(),
        };

        let fixed_per_staff = self.collect_fixed_false(&mut model);
        self.add_coverage(&mut model);
        self.add_spacing(&mut model);
        self.add_monthly_quota(&mut model);
        self.add_fairness_bands(&mut model, &fixed_per_staff);
        if self.config.enforce_specialty_exclusivity() {
            self.add_specialty_exclusivity(&mut model);
        }

        Self::index_memberships(&mut model);
        Ok(model)
    }

    /// Collects the variables forced false by vacations and individual
    /// blocks. Returns the per-staff count of fixed variables, which the
    /// fairness bands use to identify fully-unavailable members.
    fn collect_fixed_false(&self, model: &mut Model) -> Vec<usize> {
        for (staff, member) in self.roster.members().iter().enumerate() {
            let staff_index = StaffIndex::new(staff);
            for (day, descriptor) in self.calendar.days().iter().enumerate() {
                if member.is_unavailable_on(descriptor.date()) {
                    model
                        .fixed_false
                        .push(model.var_index(staff_index, DayIndex::new(day)));
                }
            }
        }

        // Entries that do not resolve were already rejected (or deliberately
        // tolerated) by the validator.
        for block in self.config.individual_blocks() {
            let staff_index = match self.roster.index_of(&block.staff_name) {
                Some(index) => index,
                None => continue,
            };
            let day_index = match self.calendar.index_of(block.date) {
                Some(index) => index,
                None => continue,
            };
            model.fixed_false.push(model.var_index(staff_index, day_index));
        }

        model.fixed_false.sort_unstable();
        model.fixed_false.dedup();

        let mut fixed_per_staff = vec![0usize; model.num_staff];
        for &var in &model.fixed_false {
            fixed_per_staff[model.staff_of(var).get()] += 1;
        }
        fixed_per_staff
    }

    /// Daily coverage: exactly `staff_per_day` members serve each day.
    fn add_coverage(&self, model: &mut Model) {
        let staff_per_day = self.config.staff_per_day();
        for day in 0..model.num_days {
            let day_index = DayIndex::new(day);
            let vars = (0..model.num_staff)
                .map(|staff| model.var_index(StaffIndex::new(staff), day_index))
                .collect();
            model
                .coverage_constraints
                .push(ConstraintIndex::new(model.constraints.len()));
            model
                .constraints
                .push(CardinalityConstraint::new(vars, staff_per_day, staff_per_day));
        }
    }

    /// Minimum spacing: at most one duty per staff member in every window of
    /// `min_gap_days + 1` consecutive days. A gap of zero makes every window
    /// a single day and the rule vacuous, so no rows are emitted.
    fn add_spacing(&self, model: &mut Model) {
        let gap = self.config.min_gap_days() as usize;
        if gap == 0 {
            return;
        }
        let window = gap + 1;
        if model.num_days < window {
            return;
        }

        for staff in 0..model.num_staff {
            let staff_index = StaffIndex::new(staff);
            for start in 0..=(model.num_days - window) {
                let vars = (start..start + window)
                    .map(|day| model.var_index(staff_index, DayIndex::new(day)))
                    .collect();
                model.constraints.push(CardinalityConstraint::new(vars, 0, 1));
            }
        }
    }

    /// Monthly quota: at most `max_per_month` duties per staff member per month
    /// bucket. Buckets shorter than the quota cannot violate it and are
    /// skipped.
    fn add_monthly_quota(&self, model: &mut Model) {
        let max_per_month = self.config.max_per_month();
        for (_, day_indices) in self.calendar.month_buckets() {
            if day_indices.len() <= max_per_month as usize {
                continue;
            }
            for staff in 0..model.num_staff {
                let staff_index = StaffIndex::new(staff);
                let vars = day_indices
                    .iter()
                    .map(|&day_index| model.var_index(staff_index, day_index))
                    .collect();
                model
                    .constraints
                    .push(CardinalityConstraint::new(vars, 0, max_per_month));
            }
        }
    }

    /// Equitable total and weekend load. The duty total is
    /// divided among the effectively available staff; fully-unavailable
    /// members get no band rows.
    fn add_fairness_bands(&self, model: &mut Model, fixed_per_staff: &[usize]) {
        let effective: Vec<StaffIndex> = (0..model.num_staff)
            .filter(|&staff| fixed_per_staff[staff] < model.num_days)
            .map(StaffIndex::new)
            .collect();
        if effective.is_empty() {
            // Coverage alone will prove the instance infeasible.
            return;
        }

        let staff_per_day = self.config.staff_per_day() as usize;

        let total = model.num_days * staff_per_day;
        let (lo, hi) = Self::band(total, effective.len());
        for &staff_index in &effective {
            let vars = (0..model.num_days)
                .map(|day| model.var_index(staff_index, DayIndex::new(day)))
                .collect();
            model.constraints.push(CardinalityConstraint::new(vars, lo, hi));
        }

        let weekend_days = self.calendar.days_of_kind(DayKind::Weekend);
        if weekend_days.is_empty() {
            return;
        }
        let weekend_total = weekend_days.len() * staff_per_day;
        let (weekend_lo, weekend_hi) = Self::band(weekend_total, effective.len());
        for &staff_index in &effective {
            let vars = weekend_days
                .iter()
                .map(|&day_index| model.var_index(staff_index, day_index))
                .collect();
            model
                .constraints
                .push(CardinalityConstraint::new(vars, weekend_lo, weekend_hi));
        }
    }

    /// Specialty exclusivity: at most one member of each multi-member
    /// specialty per day.
    fn add_specialty_exclusivity(&self, model: &mut Model) {
        let groups = self.roster.specialty_groups();
        for day in 0..model.num_days {
            let day_index = DayIndex::new(day);
            for (_, staff_indices) in &groups {
                if staff_indices.len() < 2 {
                    continue;
                }
                let vars = staff_indices
                    .iter()
                    .map(|&staff_index| model.var_index(staff_index, day_index))
                    .collect();
                model.constraints.push(CardinalityConstraint::new(vars, 0, 1));
            }
        }
    }

    /// The fairness band `[lo, hi]` for distributing `total` duty slots
    /// among `count` members.
    #[inline]
    fn band(total: usize, count: usize) -> (u32, u32) {
        let lo = (total / count) as u32;
        let hi = if total % count > 0 { lo + 1 } else { lo };
        (lo, hi)
    }

    /// Builds the reverse variable-to-constraint membership lists.
    fn index_memberships(model: &mut Model) {
        for (row, constraint) in model.constraints.iter().enumerate() {
            let constraint_index = ConstraintIndex::new(row);
            for &var in constraint.vars() {
                model.var_constraints[var.get()].push(constraint_index);
            }
        }
    }
}
