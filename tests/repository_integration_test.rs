//! Integration tests for the hospital repository over the in-memory store

use hospital_sync::adapters::memory::{MemoryStore, Operation};
use hospital_sync::adapters::store::StorePath;
use hospital_sync::core::repository::{HospitalRepository, RepositoryOptions};
use hospital_sync::core::state::{HospitalList, StateView};
use hospital_sync::domain::{
    Fields, HospitalError, HospitalId, Locale, NewHospital, OperationKind, StoreError, Year,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(2);

fn year(y: &str) -> Year {
    Year::new(y).unwrap()
}

fn id(i: &str) -> HospitalId {
    HospitalId::new(i).unwrap()
}

fn fields(value: Value) -> Fields {
    value.as_object().cloned().unwrap()
}

fn record_path(y: &str, i: &str) -> StorePath {
    StorePath::record(&year(y), &id(i))
}

fn repository(store: &MemoryStore) -> HospitalRepository {
    HospitalRepository::new(Arc::new(store.clone()), RepositoryOptions::default())
}

fn seeded_store() -> MemoryStore {
    MemoryStore::with_data(json!({
        "hospitals": {
            "2024": {
                "x": {"name": "A", "beds": 10},
                "y": {"name": "B"}
            },
            "2025": {
                "z": {"name": "C"}
            }
        }
    }))
}

async fn wait_for_hospitals(view: &mut StateView, predicate: impl FnMut(&HospitalList) -> bool) {
    tokio::time::timeout(WAIT, view.hospitals.wait_for(predicate))
        .await
        .expect("timed out waiting for hospitals")
        .expect("state dropped");
}

async fn wait_until_idle(view: &mut StateView) {
    tokio::time::timeout(WAIT, view.wait_until_idle())
        .await
        .expect("timed out waiting for loading to clear");
}

fn sorted_values(list: &HospitalList) -> Vec<Value> {
    let mut hospitals: Vec<_> = list.iter().cloned().collect();
    hospitals.sort_by(|a, b| (&a.year, &a.id).cmp(&(&b.year, &b.id)));
    hospitals.iter().map(|h| h.to_value()).collect()
}

#[tokio::test]
async fn test_activate_loads_flattened_snapshot() {
    let store = seeded_store();
    let repository = repository(&store);
    let mut view = repository.view();

    repository.activate().await.unwrap();
    assert!(repository.is_loading(), "loading until the first snapshot");

    wait_until_idle(&mut view).await;
    assert!(!repository.is_loading());
    assert_eq!(repository.error(), None);
    assert_eq!(
        sorted_values(&repository.hospitals()),
        vec![
            json!({"id": "x", "YEAR": "2024", "name": "A", "beds": 10}),
            json!({"id": "y", "YEAR": "2024", "name": "B"}),
            json!({"id": "z", "YEAR": "2025", "name": "C"}),
        ]
    );
}

#[tokio::test]
async fn test_empty_store_yields_empty_list() {
    let store = MemoryStore::new();
    let repository = repository(&store);
    let mut view = repository.view();

    repository.activate().await.unwrap();
    wait_until_idle(&mut view).await;

    assert!(repository.hospitals().is_empty());
    assert_eq!(repository.error(), None);
}

#[tokio::test]
async fn test_remote_changes_replace_list() {
    let store = seeded_store();
    let repository = repository(&store);
    let mut view = repository.view();

    repository.activate().await.unwrap();
    wait_until_idle(&mut view).await;

    store.external_write(&record_path("2025", "w"), json!({"name": "D"}));
    wait_for_hospitals(&mut view, |list| list.len() == 4).await;

    store.external_write(&StorePath::hospitals(), Value::Null);
    wait_for_hospitals(&mut view, |list| list.is_empty()).await;
}

#[tokio::test]
async fn test_add_appends_under_year() {
    let store = MemoryStore::new();
    let repository = repository(&store);

    let record = NewHospital::from_value(json!({"YEAR": "2024", "name": "A"})).unwrap();
    let new_id = repository.add_hospital(record).await.unwrap();

    assert_eq!(new_id.as_str().len(), 20);
    assert_eq!(
        store.value_at(&StorePath::record(&year("2024"), &new_id)),
        json!({"name": "A"})
    );
    assert!(!repository.is_loading());
    assert_eq!(repository.error(), None);
    assert!(
        repository.hospitals().is_empty(),
        "add does not touch the list of an inactive repository"
    );
}

#[tokio::test]
async fn test_added_hospital_arrives_through_listener() {
    let store = MemoryStore::new();
    let repository = repository(&store);
    let mut view = repository.view();
    repository.activate().await.unwrap();
    wait_until_idle(&mut view).await;

    let record = NewHospital::new(year("2024"), fields(json!({"name": "A"})));
    let new_id = repository.add_hospital(record).await.unwrap();

    wait_for_hospitals(&mut view, |list| list.iter().any(|h| h.id == new_id)).await;
    let hospitals = repository.hospitals();
    assert_eq!(hospitals[0].year, year("2024"));
    assert_eq!(hospitals[0].name(), Some("A"));
}

#[tokio::test]
async fn test_update_replaces_record_wholesale() {
    let store = seeded_store();
    let repository = repository(&store);

    repository
        .update_hospital(&id("x"), &year("2024"), fields(json!({"name": "B"})))
        .await
        .unwrap();

    assert_eq!(store.value_at(&record_path("2024", "x")), json!({"name": "B"}));
    assert!(!repository.is_loading());
}

#[tokio::test]
async fn test_delete_removes_record() {
    let store = seeded_store();
    let repository = repository(&store);

    repository.delete_hospital(&id("x"), &year("2024")).await.unwrap();

    assert_eq!(store.value_at(&record_path("2024", "x")), Value::Null);
    assert_eq!(store.value_at(&record_path("2024", "y")), json!({"name": "B"}));
}

#[tokio::test]
async fn test_add_failure_sets_message_and_returns_error() {
    let store = MemoryStore::new();
    store.fail_next(Operation::Push, StoreError::Injected("push refused".into()));
    let repository = repository(&store);

    let record = NewHospital::new(year("2024"), fields(json!({"name": "A"})));
    let err = repository.add_hospital(record).await.unwrap_err();

    assert!(matches!(
        err,
        HospitalError::Store(StoreError::Injected(ref m)) if m == "push refused"
    ));
    assert!(!repository.is_loading());
    assert_eq!(
        repository.error().as_deref(),
        Some("병원을 추가하는 중 오류가 발생했습니다.")
    );
}

#[tokio::test]
async fn test_update_failure_sets_message() {
    let store = seeded_store();
    store.fail_next(Operation::Set, StoreError::PermissionDenied("rules".into()));
    let repository = repository(&store);

    let err = repository
        .update_hospital(&id("x"), &year("2024"), fields(json!({"name": "B"})))
        .await
        .unwrap_err();

    assert!(matches!(err, HospitalError::Store(ref e) if e.is_permission_denied()));
    assert!(!repository.is_loading());
    assert_eq!(
        repository.error().as_deref(),
        Some(OperationKind::Update.failure_message(Locale::Ko))
    );
    assert_eq!(
        store.value_at(&record_path("2024", "x")),
        json!({"name": "A", "beds": 10})
    );
}

#[tokio::test]
async fn test_delete_failure_sets_message() {
    let store = seeded_store();
    store.fail_next(Operation::Remove, StoreError::Injected("offline".into()));
    let repository = repository(&store);

    assert!(repository
        .delete_hospital(&id("x"), &year("2024"))
        .await
        .is_err());
    assert!(!repository.is_loading());
    assert_eq!(
        repository.error().as_deref(),
        Some("병원을 삭제하는 중 오류가 발생했습니다.")
    );
}

#[tokio::test]
async fn test_next_operation_clears_previous_error() {
    let store = seeded_store();
    store.fail_next(Operation::Remove, StoreError::Injected("offline".into()));
    let repository = repository(&store);

    assert!(repository.delete_hospital(&id("x"), &year("2024")).await.is_err());
    assert!(repository.error().is_some());

    repository.delete_hospital(&id("x"), &year("2024")).await.unwrap();
    assert_eq!(repository.error(), None);
}

#[tokio::test]
async fn test_english_messages() {
    let store = MemoryStore::new();
    store.fail_next(Operation::Push, StoreError::Injected("x".into()));
    let options = RepositoryOptions {
        locale: Locale::En,
        ..Default::default()
    };
    let repository = HospitalRepository::new(Arc::new(store.clone()), options);

    let record = NewHospital::new(year("2024"), Fields::new());
    assert!(repository.add_hospital(record).await.is_err());
    assert_eq!(repository.error().as_deref(), Some("Failed to add the hospital."));
}

#[tokio::test]
async fn test_listener_failure_keeps_previous_list() {
    let store = seeded_store();
    let repository = repository(&store);
    let mut view = repository.view();
    repository.activate().await.unwrap();
    wait_until_idle(&mut view).await;
    assert_eq!(repository.hospitals().len(), 3);

    store.deny_reads("Permission denied");

    tokio::time::timeout(WAIT, view.error.wait_for(Option::is_some))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        repository.error().as_deref(),
        Some("데이터를 불러오는 중 오류가 발생했습니다.")
    );
    assert!(!repository.is_loading());
    assert_eq!(repository.hospitals().len(), 3, "list survives listener failure");
}

#[tokio::test]
async fn test_reactivate_after_listener_failure() {
    let store = seeded_store();
    let repository = repository(&store);
    let mut view = repository.view();
    repository.activate().await.unwrap();
    wait_until_idle(&mut view).await;

    store.deny_reads("rules");
    tokio::time::timeout(WAIT, view.error.wait_for(Option::is_some))
        .await
        .unwrap()
        .unwrap();
    assert!(!repository.is_active(), "a failed listener is not active");
    assert_eq!(store.listener_count(), 0);

    store.allow_reads();
    repository.activate().await.unwrap();
    assert!(repository.is_active());
    assert_eq!(store.listener_count(), 1);
    wait_until_idle(&mut view).await;

    store.external_write(&record_path("2025", "w"), json!({"name": "D"}));
    wait_for_hospitals(&mut view, |list| list.iter().any(|h| h.id.as_str() == "w")).await;
    assert_eq!(repository.hospitals().len(), 4);
}

#[tokio::test]
async fn test_listener_denied_before_first_snapshot() {
    let store = seeded_store();
    store.deny_reads("rules");
    let repository = repository(&store);
    let mut view = repository.view();

    repository.activate().await.unwrap();
    wait_until_idle(&mut view).await;

    assert!(repository.hospitals().is_empty());
    assert_eq!(
        repository.error().as_deref(),
        Some(OperationKind::Load.failure_message(Locale::Ko))
    );
}

#[tokio::test]
async fn test_subscribe_failure_fails_activation() {
    let store = MemoryStore::new();
    store.fail_next(
        Operation::Subscribe,
        StoreError::ConnectionFailed("unreachable".into()),
    );
    let repository = repository(&store);

    let err = repository.activate().await.unwrap_err();
    assert!(matches!(err, HospitalError::Store(StoreError::ConnectionFailed(_))));
    assert!(!repository.is_active());
    assert!(!repository.is_loading());
    assert!(repository.error().is_some());
}

#[tokio::test]
async fn test_no_updates_after_deactivation() {
    let store = seeded_store();
    let repository = repository(&store);
    let mut view = repository.view();
    repository.activate().await.unwrap();
    wait_until_idle(&mut view).await;
    let _ = view.hospitals.borrow_and_update();

    repository.deactivate();
    assert!(!repository.is_active());
    assert_eq!(store.listener_count(), 0);

    store.external_write(&record_path("2024", "new"), json!({"name": "N"}));
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert!(!view.hospitals.has_changed().unwrap());
    assert_eq!(repository.hospitals().len(), 3);
}

#[tokio::test]
async fn test_activation_lifecycle() {
    let store = MemoryStore::new();
    let repository = repository(&store);

    repository.activate().await.unwrap();
    assert!(matches!(
        repository.activate().await,
        Err(HospitalError::Subscription(_))
    ));
    assert_eq!(store.listener_count(), 1);

    repository.deactivate();
    repository.deactivate();
    assert_eq!(store.listener_count(), 0);

    repository.activate().await.unwrap();
    assert_eq!(store.listener_count(), 1);

    drop(repository);
    assert_eq!(store.listener_count(), 0, "drop detaches the listener");
}

#[tokio::test]
async fn test_mismatched_year_without_strict_partitions() {
    let store = seeded_store();
    let repository = repository(&store);

    repository.delete_hospital(&id("x"), &year("2025")).await.unwrap();
    assert_eq!(
        store.value_at(&record_path("2024", "x")),
        json!({"name": "A", "beds": 10}),
        "wrong year leaves the record alone"
    );

    repository
        .update_hospital(&id("x"), &year("2025"), fields(json!({"name": "X"})))
        .await
        .unwrap();
    assert_eq!(store.value_at(&record_path("2025", "x")), json!({"name": "X"}));
}

#[tokio::test]
async fn test_strict_partitions_reject_missing_record() {
    let store = seeded_store();
    let options = RepositoryOptions {
        strict_partitions: true,
        ..Default::default()
    };
    let repository = HospitalRepository::new(Arc::new(store.clone()), options);

    let err = repository
        .update_hospital(&id("x"), &year("2025"), fields(json!({"name": "X"})))
        .await
        .unwrap_err();
    assert!(matches!(err, HospitalError::NotFound(_)));
    assert_eq!(
        repository.error().as_deref(),
        Some(OperationKind::Update.failure_message(Locale::Ko))
    );
    assert_eq!(store.value_at(&record_path("2025", "x")), Value::Null);

    assert!(matches!(
        repository.delete_hospital(&id("x"), &year("2025")).await,
        Err(HospitalError::NotFound(_))
    ));

    repository.delete_hospital(&id("x"), &year("2024")).await.unwrap();
    assert_eq!(store.value_at(&record_path("2024", "x")), Value::Null);
}

#[tokio::test]
async fn test_selected_year_filtering() {
    let store = seeded_store();
    let repository = repository(&store);
    let mut view = repository.view();
    repository.activate().await.unwrap();
    wait_until_idle(&mut view).await;

    assert_eq!(repository.selected_year(), year("2024"));
    assert_eq!(repository.hospitals_in_selected_year().len(), 2);

    repository.set_selected_year(year("2025"));
    let in_year = repository.hospitals_in_selected_year();
    assert_eq!(in_year.len(), 1);
    assert_eq!(in_year[0].name(), Some("C"));

    assert!(repository.hospitals_for_year(&year("1999")).is_empty());
}
