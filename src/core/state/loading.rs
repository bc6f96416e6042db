//! In-flight operation tracking for the loading flag
//!
//! Every operation that affects `loading` holds a [`LoadingGuard`]. The flag
//! is true while at least one guard is alive and drops to false when the last
//! one is released, whether the operation succeeded, failed or was cancelled.

use super::cells::HospitalState;
use std::sync::{Arc, PoisonError};

/// RAII marker for one in-flight operation
#[derive(Debug)]
#[must_use = "loading is cleared as soon as the guard is dropped"]
pub struct LoadingGuard {
    state: Arc<HospitalState>,
}

impl LoadingGuard {
    pub(super) fn acquire(state: Arc<HospitalState>) -> Self {
        {
            let mut count = state.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            *count += 1;
            state.set_loading(true);
        }
        Self { state }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut count = self
            .state
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.state.set_loading(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Year;

    fn state() -> Arc<HospitalState> {
        Arc::new(HospitalState::new(Year::new("2024").unwrap()))
    }

    #[test]
    fn test_single_guard() {
        let state = state();
        let guard = state.begin_loading();
        assert!(state.is_loading());
        drop(guard);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_overlapping_guards() {
        let state = state();
        let first = state.begin_loading();
        let second = state.begin_loading();

        drop(first);
        assert!(state.is_loading(), "still loading while the second op runs");

        drop(second);
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_guard_released_when_task_aborted() {
        let state = state();
        let guard = state.begin_loading();
        let task = tokio::spawn(async move {
            let _guard = guard;
            std::future::pending::<()>().await;
        });

        assert!(state.is_loading());
        task.abort();
        let _ = task.await;
        assert!(!state.is_loading());
    }
}
