use std::collections::BTreeSet;

use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;

use super::format_alert;
use crate::domain::models::Alert;
use crate::domain::models::AlertCondition;
use crate::domain::models::AlertType;
use crate::domain::models::NotificationChannel;

fn alert() -> Alert {
    let created_at = Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap();
    return Alert {
        id: "5b7c".to_string(),
        symbol: "AAPL".to_string(),
        alert_type: AlertType::Price,
        condition: AlertCondition::Above,
        value: 1250.5,
        notifications: BTreeSet::from([NotificationChannel::Push, NotificationChannel::Email]),
        is_active: true,
        triggered_count: 0,
        last_triggered: None,
        created_at,
    };
}

#[test]
fn it_formats_fresh_alerts() {
    let alert = alert();
    insta::assert_snapshot!(format_alert(&alert, alert.created_at), @"- (ID: 5b7c) AAPL price above, Threshold: $1,250.50, Notify: push,email, Status: active, Triggered: 0 (last never)");
}

#[test]
fn it_formats_triggered_alerts() {
    let mut alert = alert();
    alert.alert_type = AlertType::News;
    alert.condition = AlertCondition::Negative;
    alert.is_active = false;
    alert.triggered_count = 3;
    alert.last_triggered = Some(alert.created_at);

    let now = alert.created_at + Duration::minutes(5);
    insta::assert_snapshot!(format_alert(&alert, now), @"- (ID: 5b7c) AAPL news negative, Threshold: -, Notify: push,email, Status: paused, Triggered: 3 (last 5m ago)");
}
