use std::collections::BTreeSet;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::bail;
use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;

use super::AlertService;
use super::ALERTS_STORAGE_KEY;
use crate::domain::models::AlertCondition;
use crate::domain::models::AlertDefinition;
use crate::domain::models::AlertEvent;
use crate::domain::models::AlertPatch;
use crate::domain::models::AlertType;
use crate::domain::models::Clock;
use crate::domain::models::ClockRef;
use crate::domain::models::DeskError;
use crate::domain::models::DeskResult;
use crate::domain::models::Storage;

#[derive(Clone, Default)]
struct SharedStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
    failing: Arc<AtomicBool>,
}

impl SharedStorage {
    fn raw(&self) -> Option<String> {
        return self.values.lock().unwrap().get(ALERTS_STORAGE_KEY).cloned();
    }
}

impl Storage for SharedStorage {
    fn get(&self, key: &str) -> DeskResult<Option<String>> {
        return Ok(self.values.lock().unwrap().get(key).cloned());
    }

    fn set(&self, key: &str, value: &str) -> DeskResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeskError::Storage("quota exceeded".to_string()));
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        return Ok(());
    }

    fn remove(&self, key: &str) -> DeskResult<()> {
        self.values.lock().unwrap().remove(key);
        return Ok(());
    }
}

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        return self.0;
    }
}

fn clock() -> ClockRef {
    return Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap()));
}

fn service(storage: &SharedStorage) -> AlertService {
    return AlertService::load(Box::new(storage.clone()), clock());
}

fn price_alert() -> AlertDefinition {
    return AlertDefinition::new("aapl", AlertType::Price, AlertCondition::Above, 190.0);
}

#[test]
fn it_creates_and_persists() {
    let storage = SharedStorage::default();
    let mut alerts = service(&storage);

    let alert = alerts.create(price_alert()).unwrap();
    assert_eq!(alert.symbol, "AAPL");
    assert_eq!(alert.triggered_count, 0);
    assert_eq!(alert.last_triggered, None);
    assert_eq!(alert.created_at, clock().now());
    assert_eq!(alerts.list().len(), 1);

    let reloaded = service(&storage);
    assert_eq!(reloaded.list(), alerts.list());
}

#[test]
fn it_assigns_unique_ids() {
    let storage = SharedStorage::default();
    let mut alerts = service(&storage);

    let first = alerts.create(price_alert()).unwrap();
    let second = alerts.create(price_alert()).unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn it_rejects_invalid_definitions() {
    let storage = SharedStorage::default();
    let mut alerts = service(&storage);

    let definition = AlertDefinition::new("", AlertType::Price, AlertCondition::Above, 1.0);
    assert!(matches!(alerts.create(definition), Err(DeskError::Validation(_))));
    assert!(alerts.list().is_empty());
    assert_eq!(storage.raw(), None);
}

#[test]
fn it_starts_empty_on_malformed_storage() {
    let storage = SharedStorage::default();
    storage.set(ALERTS_STORAGE_KEY, "{not json").unwrap();

    assert!(service(&storage).list().is_empty());
    assert!(matches!(
        AlertService::try_load(Box::new(storage.clone()), clock()),
        Err(DeskError::Serialization { .. })
    ));
}

#[test]
fn it_returns_none_for_unknown_ids() {
    let storage = SharedStorage::default();
    let mut alerts = service(&storage);

    assert_eq!(alerts.update("missing", AlertPatch::default()).unwrap(), None);
    assert_eq!(alerts.toggle_active("missing").unwrap(), None);
    assert!(!alerts.delete("missing").unwrap());
    assert!(matches!(
        alerts.fire("missing", clock().now()),
        Err(DeskError::NotFound(_))
    ));
}

#[test]
fn it_updates_toggles_and_deletes() {
    let storage = SharedStorage::default();
    let mut alerts = service(&storage);
    let alert = alerts.create(price_alert()).unwrap();

    let patch = AlertPatch {
        value: Some(200.0),
        ..AlertPatch::default()
    };
    let updated = alerts.update(&alert.id, patch).unwrap().unwrap();
    assert_eq!(updated.value, 200.0);
    assert_eq!(updated.symbol, "AAPL");

    let toggled = alerts.toggle_active(&alert.id).unwrap().unwrap();
    assert!(!toggled.is_active);
    assert!(alerts.active().is_empty());

    assert!(alerts.delete(&alert.id).unwrap());
    assert!(alerts.list().is_empty());
    assert_eq!(storage.raw().as_deref(), Some("[]"));
}

#[test]
fn it_records_triggers() {
    let storage = SharedStorage::default();
    let mut alerts = service(&storage);
    let alert = alerts.create(price_alert()).unwrap();

    let now = clock().now();
    alerts.fire(&alert.id, now).unwrap();
    let fired = alerts.fire(&alert.id, now).unwrap();

    assert_eq!(fired.triggered_count, 2);
    assert_eq!(fired.last_triggered, Some(now));
    assert_eq!(service(&storage).get(&alert.id), Some(&fired));
}

#[test]
fn it_keeps_memory_state_when_persistence_fails() {
    let storage = SharedStorage::default();
    let mut alerts = service(&storage);
    let alert = alerts.create(price_alert()).unwrap();

    let seen = Arc::new(Mutex::new(vec![]));
    let events = seen.clone();
    alerts.subscribe(Box::new(move |event: &AlertEvent| -> anyhow::Result<()> {
        events.lock().unwrap().push(event.name());
        return Ok(());
    }));

    storage.failing.store(true, Ordering::SeqCst);
    let res = alerts.toggle_active(&alert.id);

    assert!(matches!(res, Err(DeskError::Storage(_))));
    assert!(!alerts.get(&alert.id).unwrap().is_active);

    let res = alerts.fire(&alert.id, clock().now());
    assert!(matches!(res, Err(DeskError::Storage(_))));
    assert_eq!(alerts.get(&alert.id).unwrap().triggered_count, 1);

    assert_eq!(*seen.lock().unwrap(), vec!["alertToggled", "alertTriggered"]);
}

#[test]
fn it_rejects_invalid_patches() {
    let storage = SharedStorage::default();
    let mut alerts = service(&storage);
    let alert = alerts.create(price_alert()).unwrap();
    let stored = storage.raw();

    let updates = Arc::new(Mutex::new(0));
    let counter = updates.clone();
    alerts.subscribe(Box::new(move |_: &AlertEvent| -> anyhow::Result<()> {
        *counter.lock().unwrap() += 1;
        return Ok(());
    }));

    let patches = vec![
        AlertPatch {
            alert_type: Some(AlertType::News),
            ..AlertPatch::default()
        },
        AlertPatch {
            value: Some(f64::NAN),
            ..AlertPatch::default()
        },
        AlertPatch {
            value: Some(-1.0),
            ..AlertPatch::default()
        },
        AlertPatch {
            symbol: Some("".to_string()),
            ..AlertPatch::default()
        },
        AlertPatch {
            notifications: Some(BTreeSet::new()),
            ..AlertPatch::default()
        },
    ];

    for patch in patches {
        let res = alerts.update(&alert.id, patch.clone());
        assert!(matches!(res, Err(DeskError::Validation(_))), "{patch:?}");
    }

    assert_eq!(alerts.get(&alert.id), Some(&alert));
    assert_eq!(storage.raw(), stored);
    assert_eq!(*updates.lock().unwrap(), 0);

    let patch = AlertPatch {
        alert_type: Some(AlertType::News),
        condition: Some(AlertCondition::Negative),
        ..AlertPatch::default()
    };
    let updated = alerts.update(&alert.id, patch).unwrap().unwrap();
    assert_eq!(updated.alert_type, AlertType::News);
    assert_eq!(*updates.lock().unwrap(), 1);
}

#[test]
fn it_notifies_subscribers_in_order() {
    let storage = SharedStorage::default();
    let mut alerts = service(&storage);
    let seen = Arc::new(Mutex::new(vec![]));

    let first = seen.clone();
    alerts.subscribe(Box::new(move |event: &AlertEvent| -> anyhow::Result<()> {
        first.lock().unwrap().push(format!("first:{}", event.name()));
        return Ok(());
    }));
    let second = seen.clone();
    let id = alerts.subscribe(Box::new(move |event: &AlertEvent| -> anyhow::Result<()> {
        second.lock().unwrap().push(format!("second:{}", event.name()));
        return Ok(());
    }));

    let alert = alerts.create(price_alert()).unwrap();
    assert!(alerts.unsubscribe(id));
    assert!(!alerts.unsubscribe(id));
    alerts.delete(&alert.id).unwrap();

    insta::assert_debug_snapshot!(seen.lock().unwrap().clone(), @r###"
    [
        "first:alertCreated",
        "second:alertCreated",
        "first:alertDeleted",
    ]
    "###);
}

#[test]
fn it_isolates_failing_subscribers() {
    let storage = SharedStorage::default();
    let mut alerts = service(&storage);
    let delivered = Arc::new(Mutex::new(0));

    alerts.subscribe(Box::new(|_: &AlertEvent| -> anyhow::Result<()> {
        bail!("subscriber broke");
    }));
    alerts.subscribe(Box::new(|_: &AlertEvent| -> anyhow::Result<()> {
        panic!("subscriber panicked");
    }));
    let counter = delivered.clone();
    alerts.subscribe(Box::new(move |_: &AlertEvent| -> anyhow::Result<()> {
        *counter.lock().unwrap() += 1;
        return Ok(());
    }));

    alerts.create(price_alert()).unwrap();
    assert_eq!(*delivered.lock().unwrap(), 1);
}
