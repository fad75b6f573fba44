//! Per-cycle crawl state and its transitions.
//!
//! Transitions are pure: they take the state by value and return the next
//! one, so the orchestrator loop is the only place that owns it.

use chrono::{DateTime, Utc};

use super::processor::PageOutcome;
use crate::models::PageRef;

/// Progress through one category cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlState {
    pub category: String,
    pub current_page: u32,
    /// Assumed 1 until page 1 reports otherwise.
    pub total_pages: u32,
    pub items_seen: u64,
}

/// Result of a finished category cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleSummary {
    pub category: String,
    pub pages_visited: u32,
    pub items_seen: u64,
    pub finished_at: DateTime<Utc>,
}

/// What follows a processed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Fetch the next page of the same category.
    NextPage(CrawlState),
    /// The category is exhausted; select a new one.
    CycleComplete(CycleSummary),
}

impl CrawlState {
    /// Fresh state for a newly selected category.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            current_page: 1,
            total_pages: 1,
            items_seen: 0,
        }
    }

    pub fn page_ref(&self) -> PageRef {
        PageRef::new(self.category.clone(), self.current_page)
    }

    /// Fold a processed page into the state.
    ///
    /// Only page 1 may set `total_pages`; later pages never change it.
    pub fn observe(mut self, outcome: &PageOutcome) -> Self {
        self.items_seen += outcome.items_persisted as u64;
        if self.current_page == 1 {
            if let Some(total) = outcome.total_pages {
                self.total_pages = total.max(1);
            }
        }
        self
    }

    /// Move to the next page, or finish the cycle on the last one.
    pub fn advance(self, now: DateTime<Utc>) -> Transition {
        if self.current_page >= self.total_pages {
            Transition::CycleComplete(CycleSummary {
                category: self.category,
                pages_visited: self.current_page,
                items_seen: self.items_seen,
                finished_at: now,
            })
        } else {
            Transition::NextPage(Self {
                current_page: self.current_page + 1,
                ..self
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(items: usize, total_pages: Option<u32>) -> PageOutcome {
        PageOutcome {
            items_persisted: items,
            total_pages,
            ..PageOutcome::default()
        }
    }

    fn next(transition: Transition) -> CrawlState {
        match transition {
            Transition::NextPage(state) => state,
            Transition::CycleComplete(summary) => panic!("cycle ended early: {summary:?}"),
        }
    }

    #[test]
    fn test_single_page_by_default() {
        let state = CrawlState::new("kettles").observe(&outcome(4, None));
        match state.advance(Utc::now()) {
            Transition::CycleComplete(summary) => {
                assert_eq!(summary.category, "kettles");
                assert_eq!(summary.pages_visited, 1);
                assert_eq!(summary.items_seen, 4);
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn test_total_pages_only_from_first_page() {
        let state = CrawlState::new("kettles").observe(&outcome(2, Some(3)));
        assert_eq!(state.total_pages, 3);

        let state = next(state.advance(Utc::now()));
        assert_eq!(state.current_page, 2);
        // A later page reporting a different count is ignored.
        let state = state.observe(&outcome(2, Some(9)));
        assert_eq!(state.total_pages, 3);

        let state = next(state.advance(Utc::now())).observe(&outcome(1, None));
        assert_eq!(state.current_page, 3);
        assert!(matches!(
            state.advance(Utc::now()),
            Transition::CycleComplete(CycleSummary {
                pages_visited: 3,
                items_seen: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_pages_reported_means_one() {
        let state = CrawlState::new("kettles").observe(&outcome(0, Some(0)));
        assert_eq!(state.total_pages, 1);
    }
}
