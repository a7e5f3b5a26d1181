#![allow(clippy::unwrap_used)]
// Integration tests for `ConciergeClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use concierge_api::{
    ChatRequest, ConciergeClient, Error, MatchGuestRequest, RegisterGuestRequest,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ConciergeClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ConciergeClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn stay_request() -> MatchGuestRequest {
    MatchGuestRequest {
        property_id: "CT-01".into(),
        arrival_date: Some("2025-12-10".into()),
        departure_date: Some("2025-12-13".into()),
        ..MatchGuestRequest::default()
    }
}

// ── Match guest ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_match_guest_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/match-guest"))
        .and(body_json(json!({
            "property_id": "CT-01",
            "arrival_date": "2025-12-10",
            "departure_date": "2025-12-13"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "row_index": 7,
            "data": {
                "guest_first_name": "Mario",
                "guest_last_name": "Rossi",
                "checkin_date": "2025-12-10",
                "checkout_date": "2025-12-13",
                "wifi_coupon": "MyWifi"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let matched = client.match_guest(&stay_request()).await.unwrap();

    assert_eq!(matched.row_index, Some(7));
    let record = matched.reservation.unwrap();
    assert_eq!(record.guest_first_name.as_deref(), Some("Mario"));
    assert_eq!(record.guest_last_name.as_deref(), Some("Rossi"));
    assert_eq!(record.checkout_date.as_deref(), Some("2025-12-13"));
}

#[tokio::test]
async fn test_match_guest_ok_without_data() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/match-guest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let matched = client.match_guest(&stay_request()).await.unwrap();
    assert_eq!(matched.reservation, None);
}

#[tokio::test]
async fn test_match_guest_ok_with_odd_row_index_and_data() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/match-guest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "row_index": "4",
            "data": []
        })))
        .mount(&server)
        .await;

    let matched = client.match_guest(&stay_request()).await.unwrap();
    assert_eq!(matched.row_index, Some(4));
    assert_eq!(matched.reservation, None);
}

#[tokio::test]
async fn test_match_guest_not_found_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/match-guest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "not_found",
            "message": "Nessuna prenotazione trovata."
        })))
        .mount(&server)
        .await;

    let err = client.match_guest(&stay_request()).await.unwrap_err();
    assert!(err.is_not_found());

    match err {
        Error::Rejected {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 200);
            assert_eq!(code.as_deref(), Some("not_found"));
            assert_eq!(message.as_deref(), Some("Nessuna prenotazione trovata."));
        }
        other => panic!("expected Rejected error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_match_guest_http_error_keeps_server_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/match-guest"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "Data non valida" })),
        )
        .mount(&server)
        .await;

    let err = client.match_guest(&stay_request()).await.unwrap_err();

    assert!(
        matches!(err, Error::Rejected { status: 422, .. }),
        "expected Rejected(422), got: {err:?}"
    );
    assert_eq!(err.server_message(), Some("Data non valida"));
}

#[tokio::test]
async fn test_match_guest_non_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/match-guest"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
        .mount(&server)
        .await;

    let err = client.match_guest(&stay_request()).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Rejected {
            status: 502,
            message: None,
            ..
        }
    ));
}

// ── Chat ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_chat_sends_full_context() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({
            "message": "Qual è la password del wifi?",
            "propertyId": "CT-01",
            "locale": "it",
            "arrival_date": "2025-11-03",
            "departure_date": null,
            "last_name": "Rossi",
            "first_name": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": "La password è MyWifi.",
            "used_ai": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client
        .chat(&ChatRequest {
            message: "Qual è la password del wifi?".into(),
            property_id: "CT-01".into(),
            locale: "it".into(),
            arrival_date: Some("2025-11-03".into()),
            last_name: Some("Rossi".into()),
            ..ChatRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(reply.answer(), Some("La password è MyWifi."));
    assert_eq!(reply.used_ai, Some(false));
}

#[tokio::test]
async fn test_chat_error_status_with_json_body_yields_empty_reply() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "detail": "Internal error" })),
        )
        .mount(&server)
        .await;

    let reply = client.chat(&ChatRequest::default()).await.unwrap();
    assert_eq!(reply.answer(), None);
}

#[tokio::test]
async fn test_chat_unparseable_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.chat(&ChatRequest::default()).await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { ref body, .. } if body == "not json"));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop a listener so nothing is accepting on the port.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
    let client = ConciergeClient::with_client(reqwest::Client::new(), base);

    let err = client.chat(&ChatRequest::default()).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert!(err.is_transient());
}

// ── Health & registration ───────────────────────────────────────────

#[tokio::test]
async fn test_health() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ok", "area": "booking" })),
        )
        .mount(&server)
        .await;

    let health = client.health().await.unwrap();
    assert!(health.is_ok());
    assert_eq!(health.area.as_deref(), Some("booking"));
}

#[tokio::test]
async fn test_health_http_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client.health().await.unwrap_err();
    assert!(matches!(err, Error::Http { status: 503, ref body } if body == "maintenance"));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_register_guest() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/guest/register"))
        .and(body_json(json!({
            "arrival_date": "2025-12-10",
            "last_name": "Rossi",
            "first_name": "Mario",
            "property_id": "CT-01",
            "phone": "+39 333 000 0000"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "action": "created",
            "data": { "guest_last_name": "Rossi", "status": "pending" },
            "notification": "Notifica inviata all'host (host@example.com)."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registered = client
        .register_guest(&RegisterGuestRequest {
            arrival_date: "2025-12-10".into(),
            last_name: "Rossi".into(),
            first_name: "Mario".into(),
            property_id: Some("CT-01".into()),
            phone: Some("+39 333 000 0000".into()),
            ..RegisterGuestRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(registered.action, "created");
    assert_eq!(registered.data["status"], "pending");
    assert!(registered.notification.unwrap().contains("host@example.com"));
}
