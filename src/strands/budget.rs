//! Step and wall-clock limits for the exponential searches.
//!
//! The placement search and the exact-cover solver both call [`BudgetTracker::tick`]
//! once per node they expand. When the budget runs out every worker stops
//! expanding, and the partial results come back tagged with
//! [`SearchStatus::BudgetExceeded`].

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use log::warn;
use serde::Serialize;

use crate::error::{Result, StrandsError};

/// Limits for one search call. The default never stops a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchBudget {
    pub time_limit: Option<Duration>,
    pub max_steps: Option<u64>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    pub fn start(&self) -> BudgetTracker {
        BudgetTracker {
            start: Instant::now(),
            budget: *self,
            steps: AtomicU64::new(0),
            exhausted: AtomicBool::new(false),
        }
    }
}

/// Running state of a [`SearchBudget`], shareable between rayon workers.
#[derive(Debug)]
pub struct BudgetTracker {
    start: Instant,
    budget: SearchBudget,
    steps: AtomicU64,
    exhausted: AtomicBool,
}

// Checking the clock on every node is wasteful; once every this many steps is plenty
const CLOCK_INTERVAL: u64 = 256;

impl BudgetTracker {
    /// Counts one unit of work. Returns `false` once the budget is used up, after
    /// which it keeps returning `false`.
    pub fn tick(&self) -> bool {
        if self.exhausted.load(Ordering::Relaxed) {
            return false;
        }
        let steps = self.steps.fetch_add(1, Ordering::Relaxed) + 1;

        let over_steps = self.budget.max_steps.map_or(false, |max| steps > max);
        let over_time = steps % CLOCK_INTERVAL == 0
            && self
                .budget
                .time_limit
                .map_or(false, |limit| self.start.elapsed() > limit);

        if over_steps || over_time {
            if !self.exhausted.swap(true, Ordering::Relaxed) {
                warn!(
                    "search budget exceeded after {:?} ({} steps)",
                    self.start.elapsed(),
                    steps
                );
            }
            return false;
        }
        true
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Relaxed)
    }

    pub fn steps(&self) -> u64 {
        self.steps.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn status(&self) -> SearchStatus {
        if self.is_exhausted() {
            SearchStatus::BudgetExceeded {
                elapsed: self.elapsed(),
                steps: self.steps(),
            }
        } else {
            SearchStatus::Complete
        }
    }
}

/// Why a search stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchStatus {
    /// The whole search space was explored
    Complete,
    /// The budget ran out; the results are a partial set
    BudgetExceeded { elapsed: Duration, steps: u64 },
}

/// Results of a bounded search together with how the search ended.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome<T> {
    pub results: T,
    pub status: SearchStatus,
}

impl<T> SearchOutcome<T> {
    pub fn new(results: T, status: SearchStatus) -> Self {
        Self { results, status }
    }

    pub fn is_complete(&self) -> bool {
        self.status == SearchStatus::Complete
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SearchOutcome<U> {
        SearchOutcome {
            results: f(self.results),
            status: self.status,
        }
    }

    /// Turns an incomplete search into `SearchBudgetExceeded`, dropping the partial results
    pub fn into_result(self) -> Result<T> {
        match self.status {
            SearchStatus::Complete => Ok(self.results),
            SearchStatus::BudgetExceeded { elapsed, steps } => {
                Err(StrandsError::SearchBudgetExceeded { elapsed, steps })
            }
        }
    }
}

impl<T> SearchOutcome<Vec<T>> {
    /// Fails with `NoExactCover` when a complete search found nothing. An empty
    /// result from an incomplete search is reported as `SearchBudgetExceeded`.
    pub fn require_solution(self) -> Result<Vec<T>> {
        let results = self.into_result()?;
        if results.is_empty() {
            return Err(StrandsError::NoExactCover);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited() {
        let tracker = SearchBudget::unlimited().start();
        for _ in 0..10_000 {
            assert!(tracker.tick());
        }
        assert_eq!(tracker.status(), SearchStatus::Complete);
        assert_eq!(tracker.steps(), 10_000);
    }

    #[test]
    fn test_step_limit() {
        let tracker = SearchBudget::unlimited().with_max_steps(3).start();
        assert!(tracker.tick());
        assert!(tracker.tick());
        assert!(tracker.tick());
        assert!(!tracker.tick());
        assert!(!tracker.tick());
        assert!(matches!(
            tracker.status(),
            SearchStatus::BudgetExceeded { steps: 4, .. }
        ));
    }

    #[test]
    fn test_time_limit() {
        let tracker = SearchBudget::unlimited()
            .with_time_limit(Duration::from_millis(0))
            .start();
        std::thread::sleep(Duration::from_millis(2));
        let stopped = (0..CLOCK_INTERVAL).any(|_| !tracker.tick());
        assert!(stopped);
        assert!(tracker.is_exhausted());
    }

    #[test]
    fn test_outcome_conversions() {
        let done = SearchOutcome::new(vec![1, 2], SearchStatus::Complete);
        assert_eq!(done.clone().require_solution().unwrap(), vec![1, 2]);

        let empty: SearchOutcome<Vec<u8>> = SearchOutcome::new(vec![], SearchStatus::Complete);
        assert!(matches!(
            empty.require_solution(),
            Err(StrandsError::NoExactCover)
        ));

        let partial = SearchOutcome::new(
            vec![1],
            SearchStatus::BudgetExceeded {
                elapsed: Duration::from_secs(1),
                steps: 9,
            },
        );
        assert!(!partial.is_complete());
        assert!(matches!(
            partial.into_result(),
            Err(StrandsError::SearchBudgetExceeded { steps: 9, .. })
        ));
    }
}
