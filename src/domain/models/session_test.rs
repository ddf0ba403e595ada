use super::ChatSession;
use super::SessionField;
use super::SessionKey;
use super::SessionValue;

#[test]
fn it_normalizes_keys() {
    let key = SessionKey::new(" aapl ", "0000320193-23-000106 ");
    assert_eq!(key.ticker, "AAPL");
    assert_eq!(key.accession_number, "0000320193-23-000106");
}

#[test]
fn it_renders_paths() {
    let key = SessionKey::new("AAPL", "0000320193-23-000106");
    assert_eq!(
        key.path(SessionField::Messages),
        "chat.AAPL.0000320193-23-000106.messages"
    );
    assert_eq!(
        key.path(SessionField::TipsVisible),
        "chat.AAPL.0000320193-23-000106.tipsVisible"
    );
}

#[test]
fn it_round_trips_footprints() {
    let key = SessionKey::new("MSFT", "0000950170-23-035122");
    assert_eq!(key.footprint(), "MSFT_0000950170-23-035122");
    assert_eq!(SessionKey::parse_footprint(&key.footprint()), Some(key));
    assert_eq!(SessionKey::parse_footprint("nounderscore"), None);
    assert_eq!(SessionKey::parse_footprint("_123"), None);
}

#[test]
fn it_defaults_to_visible_tips() {
    let session = ChatSession::default();
    assert!(session.tips_visible);
    assert!(!session.typing);
    assert!(session.messages.is_empty());
}

#[test]
fn it_reads_what_it_writes() {
    let mut session = ChatSession::default();
    session.write(SessionValue::Typing(true));
    session.write(SessionValue::Input("draft".to_string()));

    assert_eq!(session.read(SessionField::Typing), SessionValue::Typing(true));
    assert_eq!(
        session.read(SessionField::Input),
        SessionValue::Input("draft".to_string())
    );
    assert_eq!(SessionValue::Typing(true).field(), SessionField::Typing);
}
