#[cfg(test)]
#[path = "alerts_test.rs"]
mod tests;

use std::panic::AssertUnwindSafe;

use anyhow::Result;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use super::validation::validate_alert_definition;
use crate::domain::models::Alert;
use crate::domain::models::AlertDefinition;
use crate::domain::models::AlertEvent;
use crate::domain::models::AlertPatch;
use crate::domain::models::ClockRef;
use crate::domain::models::DeskError;
use crate::domain::models::DeskResult;
use crate::domain::models::StorageBox;

pub const ALERTS_STORAGE_KEY: &str = "alerts";

pub type SubscriptionId = usize;
pub type AlertCallback = Box<dyn Fn(&AlertEvent) -> Result<()> + Send + Sync>;

/// Owns the alert definitions, keeps storage in step with them and tells
/// subscribers about every change.
pub struct AlertService {
    alerts: Vec<Alert>,
    storage: StorageBox,
    clock: ClockRef,
    subscribers: Vec<(SubscriptionId, AlertCallback)>,
    next_subscription: SubscriptionId,
}

impl AlertService {
    /// Loads persisted alerts, starting empty when the stored JSON is
    /// unreadable.
    pub fn load(storage: StorageBox, clock: ClockRef) -> AlertService {
        let alerts = match read_alerts(&storage) {
            Ok(alerts) => alerts,
            Err(err) => {
                tracing::error!(error = %err, "Failed to load alerts, starting empty");
                vec![]
            }
        };

        return AlertService::with_alerts(alerts, storage, clock);
    }

    pub fn try_load(storage: StorageBox, clock: ClockRef) -> DeskResult<AlertService> {
        let alerts = read_alerts(&storage)?;
        return Ok(AlertService::with_alerts(alerts, storage, clock));
    }

    fn with_alerts(alerts: Vec<Alert>, storage: StorageBox, clock: ClockRef) -> AlertService {
        return AlertService {
            alerts,
            storage,
            clock,
            subscribers: vec![],
            next_subscription: 0,
        };
    }

    pub fn list(&self) -> &[Alert] {
        return &self.alerts;
    }

    pub fn get(&self, id: &str) -> Option<&Alert> {
        return self.alerts.iter().find(|alert| return alert.id == id);
    }

    pub fn active(&self) -> Vec<Alert> {
        return self
            .alerts
            .iter()
            .filter(|alert| return alert.is_active)
            .cloned()
            .collect();
    }

    pub fn now(&self) -> DateTime<Utc> {
        return self.clock.now();
    }

    pub fn create(&mut self, definition: AlertDefinition) -> DeskResult<Alert> {
        validate_alert_definition(&definition)?;

        let alert = Alert {
            id: Uuid::new_v4().to_string(),
            symbol: definition.symbol.trim().to_uppercase(),
            alert_type: definition.alert_type,
            condition: definition.condition,
            value: definition.value,
            notifications: definition.notifications,
            is_active: definition.is_active,
            triggered_count: 0,
            last_triggered: None,
            created_at: self.clock.now(),
        };

        self.alerts.push(alert.clone());
        tracing::info!(id = %alert.id, alert = %alert.describe(), "Alert created");

        self.commit(AlertEvent::Created(alert.clone()))?;
        return Ok(alert);
    }

    /// Applies a patch only when the patched alert would still pass the same
    /// checks as a new one.
    pub fn update(&mut self, id: &str, patch: AlertPatch) -> DeskResult<Option<Alert>> {
        let idx = match self.alerts.iter().position(|alert| return alert.id == id) {
            Some(idx) => idx,
            None => return Ok(None),
        };

        let mut alert = self.alerts[idx].clone();
        patch.apply(&mut alert);
        validate_alert_definition(&alert.definition())?;

        self.alerts[idx] = alert.clone();
        self.commit(AlertEvent::Updated(alert.clone()))?;
        return Ok(Some(alert));
    }

    pub fn toggle_active(&mut self, id: &str) -> DeskResult<Option<Alert>> {
        let alert = match self.alerts.iter_mut().find(|alert| return alert.id == id) {
            Some(alert) => alert,
            None => return Ok(None),
        };

        alert.is_active = !alert.is_active;
        let alert = alert.clone();

        self.commit(AlertEvent::Toggled(alert.clone()))?;
        return Ok(Some(alert));
    }

    pub fn delete(&mut self, id: &str) -> DeskResult<bool> {
        let before = self.alerts.len();
        self.alerts.retain(|alert| return alert.id != id);
        if self.alerts.len() == before {
            return Ok(false);
        }

        self.commit(AlertEvent::Deleted(id.to_string()))?;
        return Ok(true);
    }

    /// Records a trigger. Unknown ids are a `NotFound` error since the
    /// monitor only fires alerts it just read from this service.
    pub fn fire(&mut self, id: &str, now: DateTime<Utc>) -> DeskResult<Alert> {
        let alert = match self.alerts.iter_mut().find(|alert| return alert.id == id) {
            Some(alert) => alert,
            None => return Err(DeskError::NotFound(format!("alert {id}"))),
        };

        alert.triggered_count += 1;
        alert.last_triggered = Some(now);
        let alert = alert.clone();
        tracing::info!(
            id = %alert.id,
            count = alert.triggered_count,
            "Alert triggered"
        );

        self.commit(AlertEvent::Triggered(alert.clone()))?;
        return Ok(alert);
    }

    pub fn subscribe(&mut self, callback: AlertCallback) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, callback));
        return id;
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| return *sub != id);
        return self.subscribers.len() != before;
    }

    fn emit(&self, event: &AlertEvent) {
        for (id, callback) in &self.subscribers {
            match std::panic::catch_unwind(AssertUnwindSafe(|| return callback(event))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::error!(subscriber = id, event = event.name(), error = %err, "Alert subscriber failed");
                }
                Err(_) => {
                    tracing::error!(subscriber = id, event = event.name(), "Alert subscriber panicked");
                }
            }
        }
    }

    /// Writes the current list and tells subscribers about the change. The
    /// in-memory list is already updated, so subscribers hear about it even
    /// when the write fails.
    fn commit(&self, event: AlertEvent) -> DeskResult<()> {
        let res = self.persist();
        self.emit(&event);
        return res;
    }

    fn persist(&self) -> DeskResult<()> {
        let payload = serde_json::to_string(&self.alerts)
            .map_err(|err| return DeskError::serialization("alerts", err))?;

        if let Err(err) = self.storage.set(ALERTS_STORAGE_KEY, &payload) {
            tracing::error!(error = %err, "Failed to persist alerts");
            return Err(err);
        }

        return Ok(());
    }
}

fn read_alerts(storage: &StorageBox) -> DeskResult<Vec<Alert>> {
    let raw = match storage.get(ALERTS_STORAGE_KEY)? {
        Some(raw) => raw,
        None => return Ok(vec![]),
    };

    return serde_json::from_str(&raw).map_err(|err| return DeskError::serialization("alerts", err));
}
