//! Helpers shared by the reqwest-backed integration tests.

// crates.io
use reqwest::Client;
// self
use esc_oauth::{
	client::ReqwestEscClient, config::ClientConfig, http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
};

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
/// `httpmock` during tests.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Constructs a client for `config` backed by [`test_reqwest_http_client`].
pub fn build_reqwest_test_client(config: ClientConfig) -> ReqwestEscClient {
	ReqwestEscClient::with_http_client(
		config,
		test_reqwest_http_client(),
		ReqwestTransportErrorMapper,
	)
}
