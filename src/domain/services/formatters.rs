#[cfg(test)]
#[path = "formatters_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;

const NOT_AVAILABLE: &str = "N/A";
const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

fn is_zero(formatted: &str) -> bool {
    return formatted.chars().all(|c| return c == '0' || c == '.');
}

/// Inserts thousands separators into the integer part of a plain decimal.
fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }

    return grouped;
}

/// `$1,234.56`, negatives as `-$1,234.56`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let rounded = format!("{:.2}", value.abs());
    let sign = if value < 0.0 && !is_zero(&rounded) { "-" } else { "" };
    return format!("{sign}${}", group_thousands(&rounded));
}

/// Signed percentage, `+1.23%` / `-0.50%`.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let body = format!("{:.*}", decimals, value.abs());
    let sign = if is_zero(&body) {
        ""
    } else if value > 0.0 {
        "+"
    } else {
        "-"
    };

    return format!("{sign}{body}%");
}

fn abbreviate(value: f64, decimals: usize) -> Option<String> {
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    for (threshold, suffix) in SUFFIXES {
        if magnitude >= threshold {
            return Some(format!(
                "{sign}{:.*}{suffix}",
                decimals,
                magnitude / threshold
            ));
        }
    }

    return None;
}

/// `1.23K`, `4.56M`, `7.89B`, `1.00T`. Values under a thousand keep two
/// decimals unless they are whole.
pub fn format_large_number(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    if let Some(short) = abbreviate(value, 2) {
        return short;
    }

    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    return format!("{value:.2}");
}

/// Share volume: one decimal when abbreviated, whole shares otherwise.
pub fn format_volume(volume: f64) -> String {
    if !volume.is_finite() || volume < 0.0 {
        return NOT_AVAILABLE.to_string();
    }

    if let Some(short) = abbreviate(volume, 1) {
        return short;
    }

    return group_thousands(&format!("{volume:.0}"));
}

/// `Jan 5, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    return date.format("%b %-d, %Y").to_string();
}

pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);

    if elapsed.num_seconds() < 60 {
        return "just now".to_string();
    }
    if elapsed.num_minutes() < 60 {
        return format!("{}m ago", elapsed.num_minutes());
    }
    if elapsed.num_hours() < 24 {
        return format!("{}h ago", elapsed.num_hours());
    }
    if elapsed.num_days() < 7 {
        return format!("{}d ago", elapsed.num_days());
    }

    return format_date(then.date_naive());
}
