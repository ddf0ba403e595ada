#[cfg(test)]
#[path = "alert_test.rs"]
mod tests;

use std::collections::BTreeSet;

use chrono::DateTime;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumString;
use strum::EnumVariantNames;

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    EnumVariantNames,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertType {
    Price,
    Volume,
    News,
    Earnings,
}

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    EnumVariantNames,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertCondition {
    Above,
    Below,
    Positive,
    Negative,
    Any,
}

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    EnumVariantNames,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationChannel {
    Push,
    Email,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub condition: AlertCondition,
    pub value: f64,
    pub notifications: BTreeSet<NotificationChannel>,
    pub is_active: bool,
    pub triggered_count: u32,
    pub last_triggered: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// The user supplied part, as it would be checked on creation.
    pub fn definition(&self) -> AlertDefinition {
        return AlertDefinition {
            symbol: self.symbol.clone(),
            alert_type: self.alert_type,
            condition: self.condition,
            value: self.value,
            notifications: self.notifications.clone(),
            is_active: self.is_active,
        };
    }

    pub fn describe(&self) -> String {
        match self.alert_type {
            AlertType::Price | AlertType::Volume => {
                return format!(
                    "{} {} {} {}",
                    self.symbol, self.alert_type, self.condition, self.value
                );
            }
            AlertType::News => {
                return format!("{} news ({})", self.symbol, self.condition);
            }
            AlertType::Earnings => {
                return format!("{} earnings within 7 days", self.symbol);
            }
        }
    }
}

/// The user supplied part of an alert.
#[derive(Clone, Debug, PartialEq)]
pub struct AlertDefinition {
    pub symbol: String,
    pub alert_type: AlertType,
    pub condition: AlertCondition,
    pub value: f64,
    pub notifications: BTreeSet<NotificationChannel>,
    pub is_active: bool,
}

impl AlertDefinition {
    pub fn new(
        symbol: &str,
        alert_type: AlertType,
        condition: AlertCondition,
        value: f64,
    ) -> AlertDefinition {
        return AlertDefinition {
            symbol: symbol.trim().to_uppercase(),
            alert_type,
            condition,
            value,
            notifications: BTreeSet::from([NotificationChannel::Push]),
            is_active: true,
        };
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlertPatch {
    pub symbol: Option<String>,
    pub alert_type: Option<AlertType>,
    pub condition: Option<AlertCondition>,
    pub value: Option<f64>,
    pub notifications: Option<BTreeSet<NotificationChannel>>,
    pub is_active: Option<bool>,
}

impl AlertPatch {
    pub fn apply(self, alert: &mut Alert) {
        if let Some(symbol) = self.symbol {
            alert.symbol = symbol.trim().to_uppercase();
        }
        if let Some(alert_type) = self.alert_type {
            alert.alert_type = alert_type;
        }
        if let Some(condition) = self.condition {
            alert.condition = condition;
        }
        if let Some(value) = self.value {
            alert.value = value;
        }
        if let Some(notifications) = self.notifications {
            alert.notifications = notifications;
        }
        if let Some(is_active) = self.is_active {
            alert.is_active = is_active;
        }
    }

    pub fn is_empty(&self) -> bool {
        return *self == AlertPatch::default();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AlertEvent {
    Created(Alert),
    Updated(Alert),
    Toggled(Alert),
    Deleted(String),
    Triggered(Alert),
}

impl AlertEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AlertEvent::Created(_) => return "alertCreated",
            AlertEvent::Updated(_) => return "alertUpdated",
            AlertEvent::Toggled(_) => return "alertToggled",
            AlertEvent::Deleted(_) => return "alertDeleted",
            AlertEvent::Triggered(_) => return "alertTriggered",
        }
    }
}
