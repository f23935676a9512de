//! Authorization code exchange and token refresh.
//!
//! Both calls post the client credentials as JSON and return the provider's raw token
//! response. They are admitted by the rate limiter under `exchangeCode` / `refreshToken`; a
//! rejected call never reaches the network but is still reported to telemetry.

// self
use crate::{
	_prelude::*,
	auth::TokenResponse,
	client::EscClient,
	http::EscHttpClient,
	oauth::TransportErrorMapper,
	obs::Operation,
};

#[derive(Serialize)]
struct CodeExchangeBody<'a> {
	client_id: &'a str,
	client_secret: &'a str,
	code: &'a str,
}

#[derive(Serialize)]
struct RefreshBody<'a> {
	client_id: &'a str,
	client_secret: &'a str,
	refresh_token: &'a str,
}

impl<C, M> EscClient<C, M>
where
	C: ?Sized + EscHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Exchanges an authorization code for tokens.
	///
	/// Failures emit the `TOKEN_EXCHANGE_ERROR` telemetry event.
	pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
		let body = CodeExchangeBody {
			client_id: self.config.client_id.as_str(),
			client_secret: self.config.client_secret.secret(),
			code,
		};

		self.post_token_request(
			Operation::ExchangeCode,
			&self.config.endpoints.token,
			&body,
			"Exchanging authorization code.",
		)
		.await
	}

	/// Exchanges a refresh token for a new token response.
	///
	/// The cached profile for the old access token is left in place; call
	/// [`invalidate_profile`](Self::invalidate_profile) if it must not be served again.
	/// Failures emit the `REFRESH_TOKEN_ERROR` telemetry event.
	pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse> {
		let body = RefreshBody {
			client_id: self.config.client_id.as_str(),
			client_secret: self.config.client_secret.secret(),
			refresh_token,
		};

		self.post_token_request(
			Operation::RefreshToken,
			&self.config.endpoints.refresh,
			&body,
			"Refreshing access token.",
		)
		.await
	}
}
