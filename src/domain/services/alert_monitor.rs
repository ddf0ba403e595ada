#[cfg(test)]
#[path = "alert_monitor_test.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::alerts::AlertService;
use super::evaluation;
use crate::domain::models::Alert;
use crate::domain::models::DeskError;
use crate::domain::models::DeskResult;
use crate::domain::models::MarketDataBox;
use crate::domain::models::Notification;
use crate::domain::models::NotifierBox;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60 * 60);
const MIN_INTERVAL: Duration = Duration::from_secs(1);

struct MonitorContext {
    alerts: Arc<Mutex<AlertService>>,
    market: MarketDataBox,
    notifiers: Vec<NotifierBox>,
    cooldown: chrono::Duration,
}

impl MonitorContext {
    async fn check(&self) -> DeskResult<Vec<Alert>> {
        let (active, now) = {
            let service = self.alerts.lock().await;
            (service.active(), service.now())
        };

        if active.is_empty() {
            tracing::debug!("No active alerts to check");
            return Ok(vec![]);
        }

        let mut symbols = active
            .iter()
            .map(|alert| return alert.symbol.clone())
            .collect::<Vec<String>>();
        symbols.sort();
        symbols.dedup();

        // The lock is released while the provider is awaited.
        let snapshots = self.market.fetch(&symbols).await?;

        let mut fired = vec![];
        let mut service = self.alerts.lock().await;
        for candidate in active {
            let alert = match service.get(&candidate.id) {
                Some(alert) if alert.is_active => alert.clone(),
                _ => continue,
            };

            let snapshot = match snapshots.get(&alert.symbol) {
                Some(snapshot) => snapshot,
                None => {
                    tracing::debug!(symbol = %alert.symbol, "No market data for symbol");
                    continue;
                }
            };

            if !evaluation::should_fire(&alert, now, self.cooldown)
                || !evaluation::matches(&alert, snapshot, now)
            {
                continue;
            }

            match service.fire(&alert.id, now) {
                Ok(alert) => fired.push(alert),
                Err(DeskError::NotFound(_)) => continue,
                Err(err) => {
                    // The trigger is recorded in memory even when storage fails.
                    tracing::error!(id = %alert.id, error = %err, "Failed to record alert trigger");
                    if let Some(alert) = service.get(&alert.id) {
                        fired.push(alert.clone());
                    }
                }
            }
        }
        drop(service);

        self.notify(&fired).await;

        return Ok(fired);
    }

    async fn notify(&self, fired: &[Alert]) {
        let mut deliveries = vec![];
        for alert in fired {
            let notification = Notification::for_alert(alert);
            for notifier in &self.notifiers {
                if !alert.notifications.contains(&notifier.channel()) {
                    continue;
                }

                let notification = notification.clone();
                let id = alert.id.clone();
                deliveries.push(async move {
                    if let Err(err) = notifier.send(&notification).await {
                        tracing::warn!(
                            id = %id,
                            channel = %notifier.channel(),
                            error = %err,
                            "Notification delivery failed"
                        );
                    }
                });
            }
        }

        join_all(deliveries).await;
    }
}

/// Periodically evaluates active alerts against fresh market data.
pub struct AlertMonitor {
    context: Arc<MonitorContext>,
    interval: Duration,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl AlertMonitor {
    pub fn new(
        alerts: Arc<Mutex<AlertService>>,
        market: MarketDataBox,
        notifiers: Vec<NotifierBox>,
    ) -> AlertMonitor {
        return AlertMonitor {
            context: Arc::new(MonitorContext {
                alerts,
                market,
                notifiers,
                cooldown: cooldown_from(DEFAULT_COOLDOWN),
            }),
            interval: DEFAULT_INTERVAL,
            cancel: CancellationToken::new(),
            handle: None,
        };
    }

    pub fn with_interval(mut self, interval: Duration) -> AlertMonitor {
        self.interval = interval.max(MIN_INTERVAL);
        return self;
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> AlertMonitor {
        if let Some(context) = Arc::get_mut(&mut self.context) {
            context.cooldown = cooldown_from(cooldown);
        }
        return self;
    }

    pub fn interval(&self) -> Duration {
        return self.interval;
    }

    pub fn is_running(&self) -> bool {
        return self
            .handle
            .as_ref()
            .map(|handle| return !handle.is_finished())
            .unwrap_or(false);
    }

    /// Runs a single evaluation pass and returns the alerts that fired.
    pub async fn check_alerts(&self) -> DeskResult<Vec<Alert>> {
        return self.context.check().await;
    }

    /// Checks immediately, then once per interval until stopped.
    pub fn start(&mut self) {
        if self.is_running() {
            tracing::warn!("Alert monitor already running");
            return;
        }

        self.cancel = CancellationToken::new();
        let cancel = self.cancel.clone();
        let context = self.context.clone();
        let interval = self.interval;

        self.handle = Some(tokio::spawn(async move {
            tracing::info!(interval_secs = interval.as_secs(), "Alert monitor started");
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!("Alert monitor stopped");
                        return;
                    }
                    _ = ticker.tick() => {
                        match context.check().await {
                            Ok(fired) if !fired.is_empty() => {
                                tracing::info!(count = fired.len(), "Alerts fired");
                            }
                            Ok(_) => {}
                            Err(err) => {
                                tracing::warn!(error = %err, "Alert check failed");
                            }
                        }
                    }
                }
            }
        }));
    }

    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "Alert monitor task failed");
            }
        }
    }
}

fn cooldown_from(cooldown: Duration) -> chrono::Duration {
    return chrono::Duration::from_std(cooldown).unwrap_or_else(|_| return chrono::Duration::max_value());
}
