use std::{net::TcpListener, time::Duration};

use serde_json::{Value, json};
use weather_lookup_core::{
    Config, HttpLookupService, LookupError, LookupForm, SubmissionResult, WeatherLookupService,
    model::{NETWORK_ERROR_MESSAGE, REJECTED_FALLBACK_MESSAGE, SUCCESS_MESSAGE},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn paris() -> Value {
    json!({
        "location": { "name": "Paris", "region": "Ile-de-France", "country": "France" },
        "current": { "temperature": 18, "weather_descriptions": ["Sunny"] }
    })
}

/// An address on which nothing is listening.
fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

// ============================================================================
// Lookup service
// ============================================================================

#[tokio::test]
async fn sends_get_to_weather_path_with_json_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/12"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris()))
        .expect(1)
        .mount(&server)
        .await;

    let service = HttpLookupService::new(server.uri());
    let body = service.fetch("12").await.unwrap();

    assert_eq!(body, paris());
}

#[tokio::test]
async fn identifier_is_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/station%207"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let service = HttpLookupService::new(server.uri());
    assert_eq!(service.fetch("station 7").await.unwrap(), json!({}));
}

#[tokio::test]
async fn rejection_carries_status_and_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/999"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "identifier not found" })),
        )
        .mount(&server)
        .await;

    let service = HttpLookupService::new(server.uri());
    let err = service.fetch("999").await.unwrap_err();

    match err {
        LookupError::Rejected { status, detail, url } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(detail.as_deref(), Some("identifier not found"));
            assert!(url.ends_with("/weather/999"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let service = HttpLookupService::new(closed_address());
    let err = service.fetch("12").await.unwrap_err();

    assert!(matches!(err, LookupError::Transport { .. }), "got {err:?}");
    assert!(err.to_string().contains("Could not reach weather service"));
}

#[tokio::test]
async fn configured_timeout_turns_hung_request_into_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(paris())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut cfg = Config::default();
    cfg.set_base_url(&server.uri()).unwrap();
    cfg.request_timeout_secs = Some(1);

    let service = HttpLookupService::from_config(&cfg).unwrap();
    let err = service.fetch("12").await.unwrap_err();

    assert!(matches!(err, LookupError::Transport { .. }), "got {err:?}");
}

// ============================================================================
// Form over HTTP
// ============================================================================

#[tokio::test]
async fn successful_round_trip_resets_input() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris()))
        .mount(&server)
        .await;

    let form = LookupForm::new(HttpLookupService::new(server.uri()));
    form.set_input("12");
    form.submit().await;

    assert_eq!(
        form.result(),
        Some(SubmissionResult::Success {
            message: SUCCESS_MESSAGE.into(),
            weather_data: paris(),
        })
    );
    assert_eq!(form.input(), "");
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn not_found_keeps_input_and_shows_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/999"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "identifier not found" })),
        )
        .mount(&server)
        .await;

    let form = LookupForm::new(HttpLookupService::new(server.uri()));
    form.set_input("999");
    form.submit().await;

    assert_eq!(
        form.result(),
        Some(SubmissionResult::failure("identifier not found"))
    );
    assert_eq!(form.input(), "999");
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn error_without_detail_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather/2"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let form = LookupForm::new(HttpLookupService::new(server.uri()));
    for id in ["1", "2"] {
        form.set_input(id);
        form.submit().await;

        assert_eq!(
            form.result(),
            Some(SubmissionResult::failure(REJECTED_FALLBACK_MESSAGE)),
            "id {id}"
        );
        assert_eq!(form.input(), id);
    }
}

#[tokio::test]
async fn non_json_success_body_reads_as_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let form = LookupForm::new(HttpLookupService::new(server.uri()));
    form.set_input("5");
    form.submit().await;

    assert_eq!(
        form.result(),
        Some(SubmissionResult::failure(NETWORK_ERROR_MESSAGE))
    );
    assert_eq!(form.input(), "5");
}

#[tokio::test]
async fn connection_refused_reads_as_network_error() {
    let form = LookupForm::new(HttpLookupService::new(closed_address()));
    form.set_input("12");
    form.submit().await;

    assert_eq!(
        form.result(),
        Some(SubmissionResult::failure(NETWORK_ERROR_MESSAGE))
    );
    assert_eq!(form.input(), "12");
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn second_submission_replaces_first_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/999"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "identifier not found" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather/12"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(paris())
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let form = LookupForm::new(HttpLookupService::new(server.uri()));
    form.set_input("999");
    form.submit().await;
    assert!(form.result().is_some_and(|r| !r.is_success()));

    form.set_input("12");
    let (_, during) = tokio::join!(form.submit(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        form.state()
    });

    assert!(during.submitting);
    assert_eq!(during.result, None);
    assert!(form.result().is_some_and(|r| r.is_success()));
}
