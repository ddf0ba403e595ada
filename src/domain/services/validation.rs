#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;

use crate::domain::models::AlertCondition;
use crate::domain::models::AlertDefinition;
use crate::domain::models::AlertType;
use crate::domain::models::DeskError;
use crate::domain::models::DeskResult;

const MAX_SYMBOL_LEN: usize = 10;

fn invalid(message: String) -> DeskError {
    return DeskError::Validation(message);
}

/// Ticker symbols: a leading letter, then letters, digits, `.` or `-`
/// (`BRK.B`, `RDS-A`). Case is ignored.
pub fn validate_symbol(symbol: &str) -> DeskResult<()> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(invalid("symbol is empty".to_string()));
    }
    if symbol.chars().count() > MAX_SYMBOL_LEN {
        return Err(invalid(format!(
            "symbol {symbol} is longer than {MAX_SYMBOL_LEN} characters"
        )));
    }
    if !symbol.starts_with(|c: char| return c.is_ascii_alphabetic()) {
        return Err(invalid(format!("symbol {symbol} must start with a letter")));
    }
    if let Some(bad) = symbol
        .chars()
        .find(|c| return !(c.is_ascii_alphanumeric() || *c == '.' || *c == '-'))
    {
        return Err(invalid(format!("symbol {symbol} contains '{bad}'")));
    }

    return Ok(());
}

pub fn validate_email(email: &str) -> DeskResult<()> {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return Err(invalid(format!("email {email} contains whitespace")));
    }

    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return Err(invalid(format!("email {email} is missing '@'"))),
    };

    if local.is_empty() || domain.contains('@') {
        return Err(invalid(format!("email {email} is malformed")));
    }
    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return Err(invalid(format!("email domain {domain} is malformed")));
    }

    return Ok(());
}

fn allowed_conditions(alert_type: AlertType) -> &'static [AlertCondition] {
    match alert_type {
        AlertType::Price | AlertType::Volume => {
            return &[AlertCondition::Above, AlertCondition::Below];
        }
        AlertType::News => {
            return &[
                AlertCondition::Positive,
                AlertCondition::Negative,
                AlertCondition::Any,
            ];
        }
        AlertType::Earnings => return &[AlertCondition::Any],
    }
}

/// Checks a definition before it is stored. Evaluation itself tolerates
/// anything, so this is the only gate.
pub fn validate_alert_definition(definition: &AlertDefinition) -> DeskResult<()> {
    validate_symbol(&definition.symbol)?;

    if !allowed_conditions(definition.alert_type).contains(&definition.condition) {
        return Err(invalid(format!(
            "condition {} does not apply to {} alerts",
            definition.condition, definition.alert_type
        )));
    }

    if !definition.value.is_finite() {
        return Err(invalid("value must be a finite number".to_string()));
    }

    if matches!(definition.alert_type, AlertType::Price | AlertType::Volume)
        && definition.value < 0.0
    {
        return Err(invalid(format!(
            "{} threshold cannot be negative",
            definition.alert_type
        )));
    }

    if definition.notifications.is_empty() {
        return Err(invalid(
            "at least one notification channel is required".to_string(),
        ));
    }

    return Ok(());
}
