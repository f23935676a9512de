#![cfg(feature = "reqwest")]

mod common;

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use parking_lot::Mutex;
use serde_json::json;
use time::Duration;
// self
use common::build_reqwest_test_client;
use esc_oauth::{
	client::ReqwestEscClient,
	config::ClientConfig,
	error::Error,
	ext::FixedWindowLimiter,
	obs::{TelemetryEvent, TelemetrySink},
};

const CLIENT_ID: &str = "client-exchange";
const CLIENT_SECRET: &str = "secret-exchange";

#[derive(Default)]
struct RecordingTelemetry {
	events: Mutex<Vec<(TelemetryEvent, String)>>,
}
impl RecordingTelemetry {
	fn recorded(&self) -> Vec<(TelemetryEvent, String)> {
		self.events.lock().clone()
	}
}
impl TelemetrySink for RecordingTelemetry {
	fn emit(&self, event: TelemetryEvent, error: &Error) {
		self.events.lock().push((event, error.code().to_owned()));
	}
}

fn build_config(api_url: &str) -> ClientConfig {
	ClientConfig::builder()
		.client_id(CLIENT_ID)
		.client_secret(CLIENT_SECRET)
		.redirect_uri("https://app.test/callback")
		.api_url(api_url)
		.oauth_url("https://esc.test")
		.build()
		.expect("Client configuration should build for exchange tests.")
}

fn build_client(server: &MockServer) -> (ReqwestEscClient, Arc<RecordingTelemetry>) {
	let telemetry = Arc::new(RecordingTelemetry::default());
	let client = build_reqwest_test_client(build_config(&server.base_url()))
		.with_telemetry(telemetry.clone());

	(client, telemetry)
}

#[tokio::test]
async fn exchange_code_posts_credentials_and_returns_tokens() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/v1/auth/token")
				.header("content-type", "application/json")
				.json_body(json!({
					"client_id": CLIENT_ID,
					"client_secret": CLIENT_SECRET,
					"code": "valid-code",
				}));
			then.status(200).header("content-type", "application/json").json_body(json!({
				"access_token": "access-1",
				"refresh_token": "refresh-1",
				"token_type": "Bearer",
				"expires_in": 604800,
				"scope": "identify",
			}));
		})
		.await;
	let (client, telemetry) = build_client(&server);

	assert!(server.base_url().starts_with("https://"), "Mock server should serve TLS.");

	let tokens =
		client.exchange_code("valid-code").await.expect("Code exchange should succeed.");

	mock.assert_async().await;

	assert_eq!(tokens.access_token.secret(), "access-1");
	assert_eq!(
		tokens.refresh_token.as_ref().map(|token| token.secret().as_str()),
		Some("refresh-1")
	);
	assert_eq!(tokens.expires_in_duration(), Some(Duration::days(7)));
	assert!(telemetry.recorded().is_empty(), "Successful calls must not emit telemetry.");
}

#[tokio::test]
async fn refresh_token_posts_refresh_body() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/refresh-token").json_body(json!({
				"client_id": CLIENT_ID,
				"client_secret": CLIENT_SECRET,
				"refresh_token": "refresh-1",
			}));
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "access_token": "access-2", "refresh_token": "refresh-2" }));
		})
		.await;
	let (client, _) = build_client(&server);
	let tokens =
		client.refresh_token("refresh-1").await.expect("Token refresh should succeed.");

	mock.assert_async().await;

	assert_eq!(tokens.access_token.secret(), "access-2");
	assert_eq!(
		tokens.refresh_token.as_ref().map(|token| token.secret().as_str()),
		Some("refresh-2")
	);
}

#[tokio::test]
async fn api_errors_carry_body_code_and_status() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/token");
			then.status(403)
				.header("content-type", "application/json")
				.json_body(json!({ "code": "X", "message": "Y" }));
		})
		.await;
	let (client, telemetry) = build_client(&server);
	let err = client.exchange_code("bad-code").await.expect_err("403 should surface as an error.");

	mock.assert_async().await;

	match &err {
		Error::Api { message, code, status, details } => {
			assert_eq!(message, "Y");
			assert_eq!(code, "X");
			assert_eq!(*status, 403);
			assert_eq!(details.as_ref(), Some(&json!({ "code": "X", "message": "Y" })));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert_eq!(telemetry.recorded(), vec![(TelemetryEvent::TokenExchangeError, "X".to_owned())]);
}

#[tokio::test]
async fn api_errors_without_json_fall_back_to_generic_fields() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/refresh-token");
			then.status(502).body("bad gateway");
		})
		.await;
	let (client, telemetry) = build_client(&server);
	let err = client.refresh_token("refresh-1").await.expect_err("502 should surface as an error.");
	let normalized = err.normalized();

	assert_eq!(normalized.code, "ESC_API_ERROR");
	assert_eq!(normalized.status, 502);
	assert_eq!(normalized.message, "The ESC API returned an error.");
	assert_eq!(normalized.details, Some(json!("bad gateway")));
	assert_eq!(
		telemetry.recorded(),
		vec![(TelemetryEvent::RefreshTokenError, "ESC_API_ERROR".to_owned())]
	);
}

#[tokio::test]
async fn unreachable_api_is_a_network_error() {
	let telemetry = Arc::new(RecordingTelemetry::default());
	let client = build_reqwest_test_client(build_config("http://127.0.0.1:1"))
		.with_telemetry(telemetry.clone());
	let err = client.exchange_code("any").await.expect_err("Connection should be refused.");

	assert!(matches!(err, Error::Network { .. }));
	assert_eq!(err.code(), "ESC_NETWORK_ERROR");
	assert_eq!(err.status(), 503);
	assert_eq!(err.to_string(), "Unable to communicate with the ESC API.");
	assert_eq!(
		telemetry.recorded(),
		vec![(TelemetryEvent::TokenExchangeError, "ESC_NETWORK_ERROR".to_owned())]
	);
}

#[tokio::test]
async fn rate_limited_calls_skip_the_network_but_still_report() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/token");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "access_token": "access-1" }));
		})
		.await;
	let (client, telemetry) = build_client(&server);
	let client =
		client.with_rate_limiter(Arc::new(FixedWindowLimiter::new(1, Duration::seconds(60))));

	client.exchange_code("first").await.expect("First call should be admitted.");

	let err = client.exchange_code("second").await.expect_err("Second call should be throttled.");

	mock.assert_calls_async(1).await;

	match &err {
		Error::ClientRateLimited { operation, retry_after } => {
			assert_eq!(operation, "exchangeCode");
			assert!(*retry_after > Duration::ZERO && *retry_after <= Duration::seconds(60));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert_eq!(err.status(), 429);
	assert_eq!(
		telemetry.recorded(),
		vec![(TelemetryEvent::TokenExchangeError, "ESC_CLIENT_RATE_LIMITED".to_owned())]
	);
}

#[tokio::test]
async fn rate_limit_windows_are_tracked_per_operation() {
	let server = MockServer::start_async().await;
	let exchange = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/token");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "access_token": "access-1" }));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/refresh-token");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "access_token": "access-2" }));
		})
		.await;
	let (client, _) = build_client(&server);
	let client =
		client.with_rate_limiter(Arc::new(FixedWindowLimiter::new(1, Duration::seconds(60))));

	client.exchange_code("code").await.expect("Exchange should be admitted.");
	client.refresh_token("refresh").await.expect("Refresh has its own window.");

	exchange.assert_calls_async(1).await;
	refresh.assert_calls_async(1).await;
}

#[tokio::test]
async fn malformed_success_body_is_an_unknown_error() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/token");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "token_type": "Bearer" }));
		})
		.await;
	let (client, _) = build_client(&server);
	let err = client.exchange_code("code").await.expect_err("Body lacks an access token.");

	assert!(matches!(err, Error::Unknown { .. }));
	assert_eq!(err.code(), "ESC_UNKNOWN_ERROR");
	assert_eq!(err.status(), 500);
}
