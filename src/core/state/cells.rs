//! Reactive state cells
//!
//! The repository publishes four independently observable cells: the
//! flattened hospital list, the loading flag, the last error message and the
//! year a consumer has selected. Each cell is a `tokio::sync::watch` channel:
//! readers see the latest value and can await changes, and values are always
//! replaced wholesale.

use super::loading::LoadingGuard;
use crate::domain::{Hospital, Year};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Shared, cheaply cloneable hospital list
pub type HospitalList = Arc<Vec<Hospital>>;

/// Owner side of the reactive cells
#[derive(Debug)]
pub struct HospitalState {
    hospitals: watch::Sender<HospitalList>,
    loading: watch::Sender<bool>,
    error: watch::Sender<Option<String>>,
    selected_year: watch::Sender<Year>,

    /// Operations currently holding a loading guard
    pub(super) in_flight: Mutex<usize>,
}

impl HospitalState {
    /// Fresh cells: empty list, not loading, no error
    pub fn new(selected_year: Year) -> Self {
        Self {
            hospitals: watch::channel(Arc::new(Vec::new())).0,
            loading: watch::channel(false).0,
            error: watch::channel(None).0,
            selected_year: watch::channel(selected_year).0,
            in_flight: Mutex::new(0),
        }
    }

    /// Mark one more operation as in flight until the guard is dropped
    pub fn begin_loading(self: &Arc<Self>) -> LoadingGuard {
        LoadingGuard::acquire(Arc::clone(self))
    }

    /// Current hospital list
    pub fn hospitals(&self) -> HospitalList {
        self.hospitals.borrow().clone()
    }

    /// Replace the hospital list wholesale
    pub fn replace_hospitals(&self, hospitals: Vec<Hospital>) {
        self.hospitals.send_replace(Arc::new(hospitals));
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub(super) fn set_loading(&self, loading: bool) {
        self.loading.send_if_modified(|current| {
            let changed = *current != loading;
            *current = loading;
            changed
        });
    }

    /// Current error message, if any
    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.error.send_replace(Some(message.into()));
    }

    pub fn clear_error(&self) {
        self.error.send_if_modified(|current| current.take().is_some());
    }

    pub fn selected_year(&self) -> Year {
        self.selected_year.borrow().clone()
    }

    pub fn set_selected_year(&self, year: Year) {
        self.selected_year.send_if_modified(|current| {
            if *current == year {
                return false;
            }
            *current = year;
            true
        });
    }

    /// Read-only handle on all four cells
    pub fn view(&self) -> StateView {
        StateView {
            hospitals: self.hospitals.subscribe(),
            loading: self.loading.subscribe(),
            error: self.error.subscribe(),
            selected_year: self.selected_year.subscribe(),
        }
    }
}

/// Consumer side of the reactive cells
///
/// Each field is a `watch::Receiver`; use `borrow()` for the current value and
/// `changed()` to await the next replacement.
#[derive(Debug, Clone)]
pub struct StateView {
    pub hospitals: watch::Receiver<HospitalList>,
    pub loading: watch::Receiver<bool>,
    pub error: watch::Receiver<Option<String>>,
    pub selected_year: watch::Receiver<Year>,
}

impl StateView {
    /// Wait until no operation is in flight
    ///
    /// Returns immediately if nothing is loading. Returns early if the
    /// repository owning the cells has been dropped.
    pub async fn wait_until_idle(&mut self) {
        let _ = self.loading.wait_for(|loading| !*loading).await;
    }
}
