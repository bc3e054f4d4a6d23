//! End-to-end command flow tests with a mock form endpoint.

use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use redhill_aircon_bot::commands::CommandHandler;
use redhill_aircon_bot::config::{FormFieldIds, UserRegistry};
use redhill_aircon_bot::form::FormClient;
use redhill_aircon_bot::session::{InMemorySessionStore, SessionStore};

fn field_ids() -> FormFieldIds {
    serde_json::from_str(
        r#"{
            "name": "entry.10",
            "usage_duration": "entry.11",
            "start_time_hour": "entry.20",
            "start_time_minute": "entry.21",
            "start_date_year": "entry.22",
            "start_date_month": "entry.23",
            "start_date_day": "entry.24",
            "end_time_hour": "entry.30",
            "end_time_minute": "entry.31",
            "end_date_year": "entry.32",
            "end_date_month": "entry.33",
            "end_date_day": "entry.34"
        }"#,
    )
    .unwrap()
}

fn handler_for(server: &MockServer) -> (CommandHandler, Arc<InMemorySessionStore>) {
    let registry: UserRegistry = serde_json::from_str(r#"{"alice": "Alice Tan"}"#).unwrap();
    let form = FormClient::new(format!("{}/submit", server.uri()), field_ids()).unwrap();
    let sessions = Arc::new(InMemorySessionStore::new());
    let handler = CommandHandler::new(
        registry,
        Arc::clone(&sessions) as Arc<dyn SessionStore>,
        form,
    );
    (handler, sessions)
}

#[tokio::test]
async fn test_on_off_submits_exactly_once_and_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (handler, sessions) = handler_for(&server);

    let on_reply = handler.handle(Some("alice"), "/on").await.unwrap();
    assert!(on_reply.starts_with("Timer started."));
    assert!(sessions.exists("alice").unwrap());

    let off_reply = handler.handle(Some("alice"), "/off").await.unwrap();
    assert!(
        off_reply.starts_with("Form submitted successfully!"),
        "unexpected reply: {off_reply}"
    );
    assert!(!sessions.exists("alice").unwrap());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(body.contains("entry.10=Alice+Tan"), "body: {body}");
}

#[tokio::test]
async fn test_off_failure_reports_and_drops_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (handler, sessions) = handler_for(&server);

    handler.handle(Some("alice"), "/on").await.unwrap();
    let reply = handler.handle(Some("alice"), "/off").await.unwrap();

    assert_eq!(reply, "Failed to submit the form. Please try again.");
    // The deletion is not rolled back; the user starts over with /on.
    assert!(!sessions.exists("alice").unwrap());
}

#[tokio::test]
async fn test_unregistered_user_never_reaches_the_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (handler, sessions) = handler_for(&server);

    let on_reply = handler.handle(Some("mallory"), "/on").await.unwrap();
    assert!(on_reply.starts_with("You are not registered yet."));

    let hour_reply = handler.handle(Some("mallory"), "/hour 6.5").await.unwrap();
    assert!(hour_reply.starts_with("You are not registered yet."));

    assert!(!sessions.exists("mallory").unwrap());
    server.verify().await;
}

#[tokio::test]
async fn test_hour_submits_directly_with_duration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (handler, sessions) = handler_for(&server);

    let reply = handler.handle(Some("alice"), "/hour 6.5").await.unwrap();
    assert_eq!(
        reply,
        "Form submitted successfully! You used the AC for 6.5 hours."
    );
    assert!(!sessions.exists("alice").unwrap());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(body.contains("entry.11=6.5"), "body: {body}");
}

#[tokio::test]
async fn test_abort_never_reaches_the_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (handler, sessions) = handler_for(&server);

    handler.handle(Some("alice"), "/on").await.unwrap();
    let reply = handler.handle(Some("alice"), "/abort").await.unwrap();

    assert!(reply.starts_with("Your session has been cancelled."));
    assert!(!sessions.exists("alice").unwrap());
    server.verify().await;
}
