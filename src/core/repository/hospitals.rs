//! Hospital repository
//!
//! Binds the reactive state cells to the `hospitals` subtree of a realtime
//! store. Activation attaches one live listener whose snapshots are
//! flattened into the hospital list; add, update and delete forward a single
//! store call each and report their outcome through the loading and error
//! cells.

use super::options::RepositoryOptions;
use crate::adapters::store::subscription::SnapshotReceiver;
use crate::adapters::store::{ListenerRegistration, RealtimeStore, StorePath};
use crate::core::state::{HospitalList, HospitalState, LoadingGuard, StateView};
use crate::core::transform::flatten_snapshot;
use crate::domain::{
    Fields, Hospital, HospitalError, HospitalId, Locale, NewHospital, OperationKind, Result,
    StoreError, Year,
};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

/// The live listener of an active repository
struct ActiveListener {
    /// Cleared before the listener is detached, and by the listener task when
    /// the listener fails or its stream ends. Snapshots are only applied while
    /// it is set, under its lock
    open: Arc<Mutex<bool>>,
    registration: ListenerRegistration,
    task: JoinHandle<()>,
}

impl ActiveListener {
    fn is_open(&self) -> bool {
        *self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn detach(self) {
        *self.open.lock().unwrap_or_else(PoisonError::into_inner) = false;
        self.registration.release();
        self.task.abort();
    }
}

/// Reactive access to hospital records grouped by year
///
/// # Example
///
/// ```rust,no_run
/// use hospital_sync::adapters::memory::MemoryStore;
/// use hospital_sync::core::repository::{HospitalRepository, RepositoryOptions};
/// use hospital_sync::domain::{NewHospital, Year};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # async fn example() -> hospital_sync::domain::Result<()> {
/// let store = Arc::new(MemoryStore::new());
/// let repository = HospitalRepository::new(store, RepositoryOptions::default());
/// repository.activate().await?;
///
/// let record = NewHospital::from_value(json!({"YEAR": "2024", "name": "Seoul General"}))?;
/// let id = repository.add_hospital(record).await?;
///
/// let fields = json!({"name": "Seoul Central"}).as_object().cloned().unwrap_or_default();
/// repository.update_hospital(&id, &Year::new("2024").unwrap(), fields).await?;
/// repository.deactivate();
/// # Ok(())
/// # }
/// ```
pub struct HospitalRepository {
    store: Arc<dyn RealtimeStore>,
    state: Arc<HospitalState>,
    options: RepositoryOptions,
    listener: Mutex<Option<ActiveListener>>,
}

impl HospitalRepository {
    /// Create an inactive repository over `store`
    pub fn new(store: Arc<dyn RealtimeStore>, options: RepositoryOptions) -> Self {
        let state = Arc::new(HospitalState::new(options.default_year.clone()));
        Self {
            store,
            state,
            options,
            listener: Mutex::new(None),
        }
    }

    pub fn options(&self) -> &RepositoryOptions {
        &self.options
    }

    /// Listener slot, with a listener that has already failed cleared out
    fn listener(&self) -> MutexGuard<'_, Option<ActiveListener>> {
        let mut slot = self.listener.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|active| !active.is_open()) {
            if let Some(closed) = slot.take() {
                closed.detach();
                tracing::debug!("Closed hospital listener cleared");
            }
        }
        slot
    }

    /// Whether a live listener is attached
    ///
    /// Turns false when the listener fails, after which [`activate`] may be
    /// called again.
    ///
    /// [`activate`]: HospitalRepository::activate
    pub fn is_active(&self) -> bool {
        self.listener().is_some()
    }

    /// Attach the live listener to `hospitals`
    ///
    /// Loading is set until the first snapshot (or listener failure) arrives.
    /// Every snapshot replaces the hospital list wholesale. A listener
    /// failure sets the load failure message, keeps the list that was
    /// loaded before it and leaves the repository inactive; it is not
    /// retried.
    ///
    /// # Errors
    ///
    /// Returns `HospitalError::Subscription` if the repository is already
    /// active, or the store error if the listener cannot be registered.
    pub async fn activate(&self) -> Result<()> {
        if self.is_active() {
            return Err(HospitalError::Subscription(
                "repository is already active".to_string(),
            ));
        }

        let path = StorePath::hospitals();
        let loading = self.state.begin_loading();

        let subscription = match self.store.subscribe(&path).await {
            Ok(subscription) => subscription,
            Err(err) => {
                let err = HospitalError::from(err);
                self.report_failure(OperationKind::Load, &err);
                return Err(err);
            }
        };

        let (receiver, registration) = subscription.into_parts();
        let mut slot = self.listener();
        if slot.is_some() {
            // Lost a race with a concurrent activate
            registration.release();
            return Err(HospitalError::Subscription(
                "repository is already active".to_string(),
            ));
        }

        let open = Arc::new(Mutex::new(true));
        let task = tokio::spawn(apply_snapshots(
            receiver,
            Arc::clone(&self.state),
            Arc::clone(&open),
            self.options.locale,
            loading,
        ));

        *slot = Some(ActiveListener {
            open,
            registration,
            task,
        });

        tracing::info!(
            path = %path,
            backend = self.store.backend_name(),
            "Hospital listener attached"
        );
        Ok(())
    }

    /// Detach the live listener
    ///
    /// After this returns the hospital list is no longer updated. Calling it
    /// on an inactive repository does nothing.
    pub fn deactivate(&self) {
        let Some(active) = self.listener().take() else {
            return;
        };

        active.detach();
        tracing::info!("Hospital listener detached");
    }

    /// Append a new record under `hospitals/{year}`
    ///
    /// # Returns
    ///
    /// The store-assigned id of the new record. The hospital list is not
    /// touched; the record shows up through the live listener.
    ///
    /// # Errors
    ///
    /// Returns the store failure after setting the add failure message.
    pub async fn add_hospital(&self, hospital: NewHospital) -> Result<HospitalId> {
        let _loading = self.begin(OperationKind::Add);
        let NewHospital { year, fields } = hospital;
        let parent = StorePath::partition(&year);

        let outcome = match self.store.push(&parent, Value::Object(fields)).await {
            Ok(key) => HospitalId::new(key)
                .map_err(|e| HospitalError::Store(StoreError::InvalidResponse(e))),
            Err(err) => Err(err.into()),
        };

        match outcome {
            Ok(id) => {
                tracing::info!(year = %year, id = %id, "Hospital added");
                Ok(id)
            }
            Err(err) => {
                self.report_failure(OperationKind::Add, &err);
                Err(err)
            }
        }
    }

    /// Replace the record at `hospitals/{year}/{id}` with `fields`
    ///
    /// Fields missing from `fields` are removed from the stored record.
    ///
    /// # Errors
    ///
    /// Returns the store failure after setting the update failure message.
    /// With `strict_partitions`, returns `HospitalError::NotFound` if no
    /// record exists at that location.
    pub async fn update_hospital(&self, id: &HospitalId, year: &Year, fields: Fields) -> Result<()> {
        let _loading = self.begin(OperationKind::Update);
        let path = StorePath::record(year, id);

        let outcome = async {
            self.ensure_exists(&path, id, year).await?;
            self.store.set(&path, Value::Object(fields)).await?;
            Ok::<(), HospitalError>(())
        }
        .await;

        self.finish(OperationKind::Update, outcome, id, year)
    }

    /// Remove the record at `hospitals/{year}/{id}`
    ///
    /// # Errors
    ///
    /// Returns the store failure after setting the delete failure message.
    /// With `strict_partitions`, returns `HospitalError::NotFound` if no
    /// record exists at that location.
    pub async fn delete_hospital(&self, id: &HospitalId, year: &Year) -> Result<()> {
        let _loading = self.begin(OperationKind::Delete);
        let path = StorePath::record(year, id);

        let outcome = async {
            self.ensure_exists(&path, id, year).await?;
            self.store.remove(&path).await?;
            Ok::<(), HospitalError>(())
        }
        .await;

        self.finish(OperationKind::Delete, outcome, id, year)
    }

    /// Current hospital list, in unspecified order
    pub fn hospitals(&self) -> HospitalList {
        self.state.hospitals()
    }

    /// Hospitals of one year partition
    pub fn hospitals_for_year(&self, year: &Year) -> Vec<Hospital> {
        self.state
            .hospitals()
            .iter()
            .filter(|h| &h.year == year)
            .cloned()
            .collect()
    }

    /// Hospitals of the currently selected year
    pub fn hospitals_in_selected_year(&self) -> Vec<Hospital> {
        self.hospitals_for_year(&self.state.selected_year())
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Last failure message, if any
    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    pub fn selected_year(&self) -> Year {
        self.state.selected_year()
    }

    pub fn set_selected_year(&self, year: Year) {
        self.state.set_selected_year(year);
    }

    /// Observable handle on the state cells
    pub fn view(&self) -> StateView {
        self.state.view()
    }

    /// Start a write operation: loading on, previous error cleared
    fn begin(&self, kind: OperationKind) -> LoadingGuard {
        let guard = self.state.begin_loading();
        self.state.clear_error();
        tracing::debug!(operation = %kind, "Operation started");
        guard
    }

    fn finish(
        &self,
        kind: OperationKind,
        outcome: Result<()>,
        id: &HospitalId,
        year: &Year,
    ) -> Result<()> {
        match outcome {
            Ok(()) => {
                tracing::info!(operation = %kind, year = %year, id = %id, "Hospital operation succeeded");
                Ok(())
            }
            Err(err) => {
                self.report_failure(kind, &err);
                Err(err)
            }
        }
    }

    /// Log the failure and publish the fixed message for `kind`
    fn report_failure(&self, kind: OperationKind, err: &HospitalError) {
        tracing::error!(operation = %kind, error = %err, "Hospital operation failed");
        self.state.set_error(kind.failure_message(self.options.locale));
    }

    async fn ensure_exists(&self, path: &StorePath, id: &HospitalId, year: &Year) -> Result<()> {
        if !self.options.strict_partitions {
            return Ok(());
        }
        if self.store.get(path).await?.is_null() {
            return Err(HospitalError::NotFound(format!(
                "no hospital '{id}' in year {year}"
            )));
        }
        Ok(())
    }
}

impl Drop for HospitalRepository {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl std::fmt::Debug for HospitalRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HospitalRepository")
            .field("backend", &self.store.backend_name())
            .field("options", &self.options)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Listener task: apply each snapshot to the state while the gate is open
async fn apply_snapshots(
    mut receiver: SnapshotReceiver,
    state: Arc<HospitalState>,
    open: Arc<Mutex<bool>>,
    locale: Locale,
    loading: LoadingGuard,
) {
    let mut loading = Some(loading);

    while let Some(item) = receiver.recv().await {
        let mut gate = open.lock().unwrap_or_else(PoisonError::into_inner);
        if !*gate {
            break;
        }

        match item {
            Ok(snapshot) => {
                let hospitals = flatten_snapshot(&snapshot);
                tracing::debug!(count = hospitals.len(), "Hospital snapshot applied");
                state.replace_hospitals(hospitals);
                loading.take();
            }
            Err(err) => {
                tracing::error!(error = %err, "Hospital listener failed");
                *gate = false;
                state.set_error(OperationKind::Load.failure_message(locale));
                loading.take();
                break;
            }
        }
    }

    *open.lock().unwrap_or_else(PoisonError::into_inner) = false;
    tracing::debug!("Hospital listener task finished");
}
