use async_trait::async_trait;

use super::Alert;
use super::DeskResult;
use super::NotificationChannel;

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn for_alert(alert: &Alert) -> Notification {
        return Notification {
            title: format!("Alert triggered: {}", alert.symbol),
            body: format!(
                "{} (triggered {} time(s))",
                alert.describe(),
                alert.triggered_count
            ),
        };
    }
}

#[async_trait]
pub trait Notifier {
    fn channel(&self) -> NotificationChannel;

    /// Fire-and-forget delivery. Errors are reported but nothing retries.
    async fn send(&self, notification: &Notification) -> DeskResult<()>;
}

pub type NotifierBox = Box<dyn Notifier + Send + Sync>;
