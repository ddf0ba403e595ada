use anyhow::Result;
use mockito::Matcher;
use test_utils::chat_response_fixture;
use test_utils::filing_html_fixture;

use super::HttpBackend;
use crate::domain::models::ChatMessage;
use crate::domain::models::ChatRequest;
use crate::domain::models::DeskError;
use crate::domain::models::FilingsBackend;
use crate::domain::models::Role;
use crate::domain::models::SessionKey;

fn backend(url: &str) -> HttpBackend {
    return HttpBackend::new(url, "secret", "200");
}

#[tokio::test]
async fn it_successfully_health_checks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/health")
        .with_status(200)
        .create_async()
        .await;

    let res = backend(&server.url()).health_check().await;

    assert!(res.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn it_fails_health_checks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/health")
        .with_status(500)
        .create_async()
        .await;

    let res = backend(&server.url()).health_check().await;

    assert!(matches!(res, Err(DeskError::TransientNetwork(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn it_sends_chat_turns() -> Result<()> {
    let key = SessionKey::new("aapl", "0000320193-23-000106");
    let history = vec![ChatMessage::new(Role::User, "What were net sales?")];
    let request = ChatRequest::new(&key, "And margins?", &history);

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_header("authorization", "Bearer secret")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "ticker": "AAPL",
            "message": "And margins?",
            "accessionNumber": "0000320193-23-000106",
            "chatHistory": [{ "role": "user", "content": "What were net sales?" }],
        })))
        .with_status(200)
        .with_body(chat_response_fixture())
        .create_async()
        .await;

    let res = backend(&server.url()).chat(&request).await?;
    mock.assert_async().await;

    let messages = res.into_messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id, "m-1");
    assert!(!messages[1].id.is_empty());
    assert_eq!(messages[1].references.len(), 1);
    assert_eq!(messages[1].references[0].key(), "0000320193-23-000106-12");

    return Ok(());
}

#[tokio::test]
async fn it_reports_server_errors_as_transient() {
    let key = SessionKey::new("AAPL", "1");
    let request = ChatRequest::new(&key, "hi", &[]);

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .with_status(502)
        .create_async()
        .await;

    let res = backend(&server.url()).chat(&request).await;

    mock.assert_async().await;
    assert!(matches!(res, Err(DeskError::TransientNetwork(_))));
}

#[tokio::test]
async fn it_reports_malformed_bodies() {
    let key = SessionKey::new("AAPL", "1");
    let request = ChatRequest::new(&key, "hi", &[]);

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let res = backend(&server.url()).chat(&request).await;

    mock.assert_async().await;
    assert!(matches!(res, Err(DeskError::Serialization { .. })));
}

#[tokio::test]
async fn it_lists_filings() -> Result<()> {
    let body = serde_json::json!([
        { "formType": "10-K", "reportDate": "2023-09-30", "accessionNumber": "0000320193-23-000106" },
        { "form_type": "10-Q", "report_date": "2023-07-01", "accession_number": "0000320193-23-000077" },
    ]);

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/filings/AAPL")
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let filings = backend(&server.url()).list_filings("aapl").await?;
    mock.assert_async().await;

    assert_eq!(filings.len(), 2);
    assert_eq!(filings[0].form_type, "10-K");
    assert_eq!(filings[1].accession_number, "0000320193-23-000077");

    return Ok(());
}

#[tokio::test]
async fn it_fetches_documents() -> Result<()> {
    let body = serde_json::json!({ "content": filing_html_fixture() });

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/filings/AAPL/0000320193-23-000106")
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let content = backend(&server.url())
        .fetch_document("AAPL", "0000320193-23-000106")
        .await?;
    mock.assert_async().await;

    assert_eq!(content, filing_html_fixture());
    return Ok(());
}

#[tokio::test]
async fn it_maps_missing_documents_to_not_found() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/filings/AAPL/nope")
        .with_status(404)
        .create_async()
        .await;

    let res = backend(&server.url()).fetch_document("AAPL", "nope").await;

    mock.assert_async().await;
    assert!(matches!(res, Err(DeskError::NotFound(_))));
}
