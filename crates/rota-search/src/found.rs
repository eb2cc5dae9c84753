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

//! # Shared First-Solution Store
//!
//! A concurrent cell holding the first feasible solution discovered by a
//! parallel search portfolio. It exposes a fast, lock-free `is_found` flag
//! via an atomic and stores the actual `Solution` behind a `Mutex` as the
//! source of truth.
//!
//! ## Motivation
//!
//! The rota model asks for exact feasibility, not iterative improvement, so
//! there is no incumbent to tighten: the first satisfying binding wins and
//! everyone else stops. The atomic flag lets workers poll cheaply without
//! locking; the mutex guarantees exactly one install succeeds even when two
//! workers finish in the same instant.

use rota_model::solution::Solution;
use std::sync::{Mutex, atomic::AtomicBool};

/// A concurrent holder for the first feasible solution found during search.
///
/// Concurrency and memory ordering:
/// - The `found` flag is loaded/stored with `Ordering::Relaxed`. It is only
///   a hint to short-circuit work; all correctness-sensitive state is
///   synchronized via the `Mutex`.
#[derive(Debug, Default)]
pub struct SharedFirstSolution {
    found: AtomicBool,
    solution: Mutex<Option<Solution>>,
}

impl std::fmt::Display for SharedFirstSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedFirstSolution(found: {})", self.is_found())
    }
}

impl SharedFirstSolution {
    /// Creates an empty store.
    #[inline]
    pub fn new() -> Self {
        Self {
            found: AtomicBool::new(false),
            solution: Mutex::new(None),
        }
    }

    /// Returns `true` if a solution has been installed.
    #[inline]
    pub fn is_found(&self) -> bool {
        self.found.load(std::sync::atomic::Ordering::Relaxed)
    }

    /// Returns a snapshot of the installed solution, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Solution> {
        let guard = self.solution.lock().unwrap();
        guard.clone()
    }

    /// Attempts to install the candidate as the accepted solution.
    /// Returns `true` only for the single winning install.
    #[inline]
    pub fn try_install(&self, candidate: &Solution) -> bool {
        if self.is_found() {
            return false;
        }

        let mut guard = self.solution.lock().unwrap();
        // Another thread might have installed while we waited for the lock;
        // the mutex-held slot, not the atomic hint, decides.
        if guard.is_some() {
            return false;
        }

        *guard = Some(candidate.clone());
        self.found
            .store(true, std::sync::atomic::Ordering::Relaxed);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixedbitset::FixedBitSet;
    use std::sync::Arc;
    use std::thread;

    fn make_solution(on: &[usize]) -> Solution {
        let mut values = FixedBitSet::with_capacity(6);
        for &var in on {
            values.insert(var);
        }
        Solution::new(2, 3, values)
    }

    #[test]
    fn test_initial_state_is_empty() {
        let store = SharedFirstSolution::new();
        assert!(!store.is_found());
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_first_install_wins_and_is_snapshotted() {
        let store = SharedFirstSolution::new();
        let solution = make_solution(&[0, 4]);

        assert!(store.try_install(&solution));
        assert!(store.is_found());
        assert_eq!(store.snapshot(), Some(solution));
    }

    #[test]
    fn test_second_install_is_rejected() {
        let store = SharedFirstSolution::new();
        let first = make_solution(&[0]);
        let second = make_solution(&[1]);

        assert!(store.try_install(&first));
        assert!(!store.try_install(&second));
        assert_eq!(store.snapshot(), Some(first));
    }

    #[test]
    fn test_concurrent_installs_exactly_one_wins() {
        let store = Arc::new(SharedFirstSolution::new());

        let mut handles = Vec::new();
        for var in 0..8usize {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let candidate = make_solution(&[var % 6]);
                store.try_install(&candidate)
            }));
        }

        let wins = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|&installed| installed)
            .count();

        assert_eq!(wins, 1, "exactly one concurrent install must win");
        assert!(store.is_found());
        assert!(store.snapshot().is_some());
    }
}
