//! Integration tests for the Graphite relay.
//!
//! Each test points the router at a local upstream on an ephemeral port and
//! drives it with `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, Response, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use graphite_proxy::api::{create_router, AppState};
use graphite_proxy::availability::{classify_response, Availability};
use graphite_proxy::config::Config;
use graphite_proxy::upstream::GraphiteClient;


const EXPECTED_OUTBOUND: &str = r#"{"path":"/render/?target=virgil.gov-vigilant-nat-01.host.hostalive.perfdata.pl.value&format=json&from=-90d&to=-30d","payload":""}"#;

fn client_for(upstream_url: String) -> GraphiteClient {
    let config = Config {
        upstream_url,
        ..Config::default()
    };
    GraphiteClient::new(&config).unwrap()
}

async fn get_graphite(upstream_url: String) -> Response<Body> {
    let app = create_router(AppState::new(client_for(upstream_url)));

    app.oneshot(
        Request::builder()
            .uri("/api/graphite")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn assert_cors(response: &Response<Body>) {
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, PUT, DELETE"
    );
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, Authorization"
    );
}

#[tokio::test]
async fn relays_successful_upstream_json() {
    let body = r#"[{"target":"hostalive","datapoints":[[0,1700000000],[null,1700000060]]}]"#;
    let (url, _) = upstream::start_canned(200, "application/json", body).await;

    let response = get_graphite(url).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_cors(&response);
    assert_eq!(
        json_body(response).await,
        serde_json::from_str::<Value>(body).unwrap()
    );
}

#[tokio::test]
async fn mirrors_upstream_error_statuses() {
    for status in [404u16, 503] {
        let (url, _) =
            upstream::start_canned(status, "application/json", r#"{"message":"nope","code":7}"#)
                .await;

        let response = get_graphite(url).await;

        assert_eq!(response.status().as_u16(), status);
        assert_cors(&response);
        assert_eq!(json_body(response).await, json!({"message": "nope", "code": 7}));
    }
}

#[tokio::test]
async fn relays_scalar_json() {
    let (url, _) = upstream::start_canned(200, "application/json", "42").await;

    let response = get_graphite(url).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!(42));
}

#[tokio::test]
async fn non_json_upstream_is_parse_failure() {
    let (url, _) = upstream::start_canned(200, "text/html", "<html>oops</html>").await;

    let response = get_graphite(url).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&response);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Failed to parse JSON response"})
    );
}

#[tokio::test]
async fn non_json_error_status_is_still_parse_failure() {
    let (url, _) = upstream::start_canned(502, "text/plain", "bad gateway").await;

    let response = get_graphite(url).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Failed to parse JSON response"})
    );
}

#[tokio::test]
async fn unreachable_upstream_is_request_failure() {
    let response = get_graphite(upstream::unreachable_url().await).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&response);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Failed to make API request"})
    );
}

#[tokio::test]
async fn truncated_upstream_body_is_read_failure() {
    let response = get_graphite(upstream::start_truncating().await).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&response);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Failed to read response body"})
    );
}

#[tokio::test]
async fn outbound_request_is_fixed_json_post() {
    let (url, seen) = upstream::start_canned(200, "application/json", "{}").await;
    let app = create_router(AppState::new(client_for(url)));

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/graphite?target=ignored")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);
    for captured in seen {
        assert_eq!(captured.method, Method::POST);
        assert_eq!(captured.content_type.as_deref(), Some("application/json"));
        assert_eq!(std::str::from_utf8(&captured.body).unwrap(), EXPECTED_OUTBOUND);
    }
}

#[tokio::test]
async fn availability_from_relayed_series() {
    let (url, _) = upstream::start_canned(
        200,
        "application/json",
        r#"{"target":"hostalive","datapoints":[[0,1],[0,2],[0,3],[0,4],[0,5],[0,6],[0,7],[1,8],[1,9],[null,10]]}"#,
    )
    .await;

    let response = client_for(url).fetch().await.unwrap();
    assert_eq!(classify_response(&response), Availability::Up);
}

#[tokio::test]
async fn availability_down_when_upstream_fails() {
    let (url, _) =
        upstream::start_canned(503, "application/json", r#"{"datapoints":[[0,1]]}"#).await;

    let response = client_for(url).fetch().await.unwrap();
    assert_eq!(classify_response(&response), Availability::Down);
}
