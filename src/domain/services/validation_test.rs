use std::collections::BTreeSet;

use super::validate_alert_definition;
use super::validate_email;
use super::validate_symbol;
use crate::domain::models::AlertCondition;
use crate::domain::models::AlertDefinition;
use crate::domain::models::AlertType;
use crate::domain::models::DeskError;

#[test]
fn it_accepts_common_symbols() {
    for symbol in ["AAPL", "msft", "BRK.B", "RDS-A", " TSLA "] {
        assert!(validate_symbol(symbol).is_ok(), "{symbol}");
    }
}

#[test]
fn it_rejects_bad_symbols() {
    for symbol in ["", "   ", "1ABC", "AB CD", "A$", "ABCDEFGHIJK"] {
        assert!(validate_symbol(symbol).is_err(), "{symbol}");
    }
}

#[test]
fn it_reports_the_offending_character() {
    let err = validate_symbol("AB$").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Validation failed: symbol AB$ contains '$'");
}

#[test]
fn it_validates_emails() {
    assert!(validate_email("ops@example.com").is_ok());
    assert!(validate_email("first.last@mail.example.co").is_ok());

    for email in ["", "ops", "@example.com", "ops@", "ops@example", "ops@@example.com", "o ps@example.com", "ops@example..com"] {
        assert!(validate_email(email).is_err(), "{email}");
    }
}

#[test]
fn it_accepts_a_default_definition() {
    let definition = AlertDefinition::new("aapl", AlertType::Price, AlertCondition::Above, 190.0);
    assert!(validate_alert_definition(&definition).is_ok());

    let definition = AlertDefinition::new("AAPL", AlertType::Earnings, AlertCondition::Any, 0.0);
    assert!(validate_alert_definition(&definition).is_ok());
}

#[test]
fn it_rejects_conditions_that_do_not_apply() {
    let definition = AlertDefinition::new("AAPL", AlertType::Price, AlertCondition::Positive, 1.0);
    let err = validate_alert_definition(&definition).unwrap_err();
    assert!(matches!(err, DeskError::Validation(_)));
    insta::assert_snapshot!(err.to_string(), @"Validation failed: condition positive does not apply to price alerts");

    let definition = AlertDefinition::new("AAPL", AlertType::Earnings, AlertCondition::Below, 1.0);
    assert!(validate_alert_definition(&definition).is_err());
}

#[test]
fn it_rejects_bad_values_and_channels() {
    let definition = AlertDefinition::new("AAPL", AlertType::Volume, AlertCondition::Above, f64::NAN);
    assert!(validate_alert_definition(&definition).is_err());

    let definition = AlertDefinition::new("AAPL", AlertType::Price, AlertCondition::Below, -1.0);
    assert!(validate_alert_definition(&definition).is_err());

    let mut definition = AlertDefinition::new("AAPL", AlertType::Price, AlertCondition::Below, 1.0);
    definition.notifications = BTreeSet::new();
    assert!(validate_alert_definition(&definition).is_err());
}
