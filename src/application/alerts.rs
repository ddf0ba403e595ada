#[cfg(test)]
#[path = "alerts_test.rs"]
mod tests;

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use chrono::DateTime;
use chrono::Utc;
use clap::ArgMatches;
use owo_colors::OwoColorize;
use tokio::sync::Mutex;

use crate::configuration::Config;
use crate::domain::models::Alert;
use crate::domain::models::AlertCondition;
use crate::domain::models::AlertDefinition;
use crate::domain::models::AlertEvent;
use crate::domain::models::AlertPatch;
use crate::domain::models::AlertType;
use crate::domain::models::NotificationChannel;
use crate::domain::models::Storage;
use crate::domain::models::SystemClock;
use crate::domain::services::formatters::format_currency;
use crate::domain::services::formatters::format_large_number;
use crate::domain::services::formatters::format_relative_time;
use crate::domain::services::AlertMonitor;
use crate::domain::services::AlertService;
use crate::domain::services::ALERTS_STORAGE_KEY;
use crate::infrastructure::market_data::SimulatedMarket;
use crate::infrastructure::notifiers::NotifierManager;
use crate::infrastructure::storage::FileStorage;
use crate::infrastructure::storage::MemoryStorage;

fn open_service() -> Result<AlertService> {
    let service = AlertService::try_load(
        Box::<FileStorage>::default(),
        Arc::new(SystemClock::default()),
    )?;
    return Ok(service);
}

/// A copy of the stored alerts that is never written back.
fn open_scratch_service() -> Result<AlertService> {
    let scratch = MemoryStorage::default();
    if let Some(raw) = FileStorage::default().get(ALERTS_STORAGE_KEY)? {
        scratch.set(ALERTS_STORAGE_KEY, &raw)?;
    }

    let service = AlertService::try_load(Box::new(scratch), Arc::new(SystemClock::default()))?;
    return Ok(service);
}

fn parse_enum<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>> {
    let raw = match matches.get_one::<String>(name) {
        Some(raw) => raw,
        None => return Ok(None),
    };

    return match T::from_str(raw) {
        Ok(val) => Ok(Some(val)),
        Err(_) => bail!(format!("Invalid value '{raw}' for --{name}")),
    };
}

fn parse_channels(matches: &ArgMatches) -> Result<Option<BTreeSet<NotificationChannel>>> {
    let raw = match matches.get_many::<String>("notify") {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let mut channels = BTreeSet::new();
    for val in raw {
        match NotificationChannel::from_str(val) {
            Ok(channel) => channels.insert(channel),
            Err(_) => bail!(format!("Unknown notification channel '{val}'")),
        };
    }

    return Ok(Some(channels));
}

fn required_id(matches: &ArgMatches) -> Result<String> {
    return match matches.get_one::<String>("id") {
        Some(id) => Ok(id.to_string()),
        None => bail!("An alert id is required"),
    };
}

fn format_threshold(alert: &Alert) -> String {
    match alert.alert_type {
        AlertType::Price => return format_currency(alert.value),
        AlertType::Volume => return format_large_number(alert.value),
        AlertType::News | AlertType::Earnings => return "-".to_string(),
    }
}

pub fn format_alert(alert: &Alert, now: DateTime<Utc>) -> String {
    let status = if alert.is_active { "active" } else { "paused" };
    let channels = alert
        .notifications
        .iter()
        .map(|channel| return channel.to_string())
        .collect::<Vec<String>>()
        .join(",");
    let last = alert
        .last_triggered
        .map(|last| return format_relative_time(last, now))
        .unwrap_or_else(|| return "never".to_string());

    return format!(
        "- (ID: {}) {} {} {}, Threshold: {}, Notify: {channels}, Status: {status}, Triggered: {} (last {last})",
        alert.id,
        alert.symbol,
        alert.alert_type,
        alert.condition,
        format_threshold(alert),
        alert.triggered_count
    );
}

fn print_alerts(alerts: &[Alert], now: DateTime<Utc>) {
    if alerts.is_empty() {
        println!("There are no alerts yet. Create one with `filingsdesk alerts create`.");
        return;
    }

    let lines = alerts
        .iter()
        .map(|alert| return format_alert(alert, now))
        .collect::<Vec<String>>();
    println!("{}", lines.join("\n"));
}

fn create(matches: &ArgMatches) -> Result<()> {
    let symbol = match matches.get_one::<String>("symbol") {
        Some(symbol) => symbol,
        None => bail!("A symbol is required"),
    };
    let alert_type = match parse_enum::<AlertType>(matches, "type")? {
        Some(alert_type) => alert_type,
        None => bail!("An alert type is required"),
    };
    let condition = parse_enum::<AlertCondition>(matches, "condition")?.unwrap_or(AlertCondition::Any);
    let value = matches.get_one::<f64>("value").copied().unwrap_or(0.0);

    let mut definition = AlertDefinition::new(symbol, alert_type, condition, value);
    if let Some(channels) = parse_channels(matches)? {
        definition.notifications = channels;
    }
    definition.is_active = !matches.get_flag("inactive");

    let mut service = open_service()?;
    let alert = service.create(definition)?;
    println!("Created alert {}: {}", alert.id, alert.describe());
    return Ok(());
}

fn update(matches: &ArgMatches) -> Result<()> {
    let id = required_id(matches)?;
    let patch = AlertPatch {
        symbol: matches.get_one::<String>("symbol").map(|symbol| return symbol.to_string()),
        alert_type: parse_enum::<AlertType>(matches, "type")?,
        condition: parse_enum::<AlertCondition>(matches, "condition")?,
        value: matches.get_one::<f64>("value").copied(),
        notifications: parse_channels(matches)?,
        is_active: matches.get_one::<bool>("active").copied(),
    };
    if patch.is_empty() {
        bail!("Nothing to update, pass at least one field");
    }

    let mut service = open_service()?;
    match service.update(&id, patch)? {
        Some(alert) => println!("Updated alert {}: {}", alert.id, alert.describe()),
        None => bail!(format!("No alert with id {id}")),
    }
    return Ok(());
}

async fn watch() -> Result<()> {
    let service = Arc::new(Mutex::new(open_service()?));
    let active = {
        let mut service = service.lock().await;
        service.subscribe(Box::new(|event: &AlertEvent| -> Result<()> {
            if let AlertEvent::Triggered(alert) = event {
                tracing::info!(id = %alert.id, symbol = %alert.symbol, event = event.name(), "Alert fired");
            }
            return Ok(());
        }));
        service.active().len()
    };

    let mut monitor = AlertMonitor::new(
        service.clone(),
        Box::<SimulatedMarket>::default(),
        NotifierManager::get()?,
    )
    .with_interval(Config::alert_interval()?)
    .with_cooldown(Config::alert_cooldown()?);

    println!(
        "Watching {active} active alert(s) every {}s. Press Ctrl-C to stop.",
        monitor.interval().as_secs()
    );
    monitor.start();
    tokio::signal::ctrl_c().await?;
    monitor.stop().await;

    return Ok(());
}

async fn check(dry_run: bool) -> Result<()> {
    let service = if dry_run {
        open_scratch_service()?
    } else {
        open_service()?
    };
    let notifiers = if dry_run {
        Vec::new()
    } else {
        NotifierManager::get()?
    };
    let service = Arc::new(Mutex::new(service));
    let monitor = AlertMonitor::new(service, Box::<SimulatedMarket>::default(), notifiers)
        .with_cooldown(Config::alert_cooldown()?);

    let fired = monitor.check_alerts().await?;
    if dry_run {
        for alert in &fired {
            println!("Would fire: {}", alert.describe());
        }
    }
    if fired.is_empty() {
        println!("No alerts fired.");
    } else {
        println!("{} alert(s) fired.", fired.len().bold());
    }

    return Ok(());
}

pub async fn run(matches: &ArgMatches) -> Result<bool> {
    match matches.subcommand() {
        Some(("create", create_matches)) => create(create_matches)?,
        Some(("list", _)) => {
            let service = open_service()?;
            print_alerts(service.list(), service.now());
        }
        Some(("update", update_matches)) => update(update_matches)?,
        Some(("toggle", toggle_matches)) => {
            let id = required_id(toggle_matches)?;
            match open_service()?.toggle_active(&id)? {
                Some(alert) => {
                    let status = if alert.is_active { "resumed" } else { "paused" };
                    println!("Alert {} {status}", alert.id);
                }
                None => bail!(format!("No alert with id {id}")),
            }
        }
        Some(("delete", delete_matches)) => {
            let id = required_id(delete_matches)?;
            if !open_service()?.delete(&id)? {
                bail!(format!("No alert with id {id}"));
            }
            println!("Deleted alert {id}");
        }
        Some(("check", check_matches)) => check(check_matches.get_flag("dry-run")).await?,
        Some(("watch", _)) => watch().await?,
        _ => return Ok(false),
    }

    return Ok(true);
}
