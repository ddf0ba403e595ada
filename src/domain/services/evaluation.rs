#[cfg(test)]
#[path = "evaluation_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::models::Alert;
use crate::domain::models::AlertCondition;
use crate::domain::models::AlertType;
use crate::domain::models::MarketSnapshot;
use crate::domain::models::NewsItem;
use crate::domain::models::Sentiment;

const NEWS_WINDOW_HOURS: i64 = 24;
const EARNINGS_WINDOW_DAYS: i64 = 7;
const SECONDS_PER_DAY: f64 = 86_400.0;

fn compare(condition: AlertCondition, current: f64, threshold: f64) -> bool {
    match condition {
        AlertCondition::Above => return current >= threshold,
        AlertCondition::Below => return current <= threshold,
        _ => return false,
    }
}

fn news_matches(condition: AlertCondition, news: &[NewsItem], now: DateTime<Utc>) -> bool {
    let window = Duration::hours(NEWS_WINDOW_HOURS);
    let mut recent = news
        .iter()
        .filter(|item| return now.signed_duration_since(item.published_at) <= window);

    match condition {
        AlertCondition::Any => return recent.next().is_some(),
        AlertCondition::Positive => {
            return recent.any(|item| return item.sentiment == Sentiment::Positive);
        }
        AlertCondition::Negative => {
            return recent.any(|item| return item.sentiment == Sentiment::Negative);
        }
        _ => return false,
    }
}

/// Whole days until `next`, rounded up so anything later today counts as 0.
pub fn days_until(next: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = next.signed_duration_since(now).num_seconds() as f64;
    return (seconds / SECONDS_PER_DAY).ceil() as i64;
}

fn earnings_matches(next_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    if let Some(next) = next_date {
        let days = days_until(next, now);
        return (0..=EARNINGS_WINDOW_DAYS).contains(&days);
    }

    return false;
}

/// Evaluates the type specific predicate of `alert` against `snapshot`.
pub fn matches(alert: &Alert, snapshot: &MarketSnapshot, now: DateTime<Utc>) -> bool {
    match alert.alert_type {
        AlertType::Price => return compare(alert.condition, snapshot.price, alert.value),
        AlertType::Volume => return compare(alert.condition, snapshot.volume, alert.value),
        AlertType::News => return news_matches(alert.condition, &snapshot.news, now),
        AlertType::Earnings => return earnings_matches(snapshot.earnings.next_date, now),
    }
}

/// Cooldown gate: an alert fires again only once more than `cooldown` has
/// passed since it last fired.
pub fn should_fire(alert: &Alert, now: DateTime<Utc>, cooldown: Duration) -> bool {
    match alert.last_triggered {
        None => return true,
        Some(last) => return now.signed_duration_since(last) > cooldown,
    }
}
