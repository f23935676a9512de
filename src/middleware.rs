//! Bearer-token extraction for inbound requests.
//!
//! [`bearer_token`] holds the framework-free parsing rule. With the `axum` feature,
//! [`require_bearer`] applies it as middleware (rejecting with `401 NO_TOKEN`) and
//! [`BearerToken`] doubles as an extractor. Tokens are not validated here; pass them to
//! [`EscClient::fetch_profile`](crate::client::EscClient::fetch_profile) for that.

// crates.io
#[cfg(feature = "axum")]
use axum::{
	Json,
	extract::{FromRequestParts, Request},
	http::{StatusCode, header::AUTHORIZATION, request::Parts},
	middleware::Next,
	response::{IntoResponse, Response},
};
// self
use crate::{_prelude::*, auth::AccessToken};
#[cfg(feature = "axum")] use crate::error::ErrorBody;

/// Scheme prefix expected in the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Access token extracted from an inbound `Authorization` header.
#[derive(Clone, Debug)]
pub struct BearerToken(pub AccessToken);
impl BearerToken {
	/// Wraps a raw token string.
	pub fn new(token: impl Into<String>) -> Self {
		Self(AccessToken::new(token.into()))
	}

	/// Returns the raw token. Callers must avoid logging it.
	pub fn secret(&self) -> &str {
		self.0.secret()
	}
}

/// Extracts the token from an `Authorization` header value.
///
/// The token is everything after the `Bearer ` prefix, returned verbatim with no trimming.
/// Fails with [`Error::MissingToken`] if the header is absent or lacks the prefix. A bare
/// `Bearer ` with nothing after it also fails, since an empty string is never a credential.
pub fn bearer_token(header: Option<&str>) -> Result<&str> {
	header
		.and_then(|value| value.strip_prefix(BEARER_PREFIX))
		.filter(|token| !token.is_empty())
		.ok_or(Error::MissingToken)
}

/// Axum middleware that attaches a [`BearerToken`] extension or rejects the request.
///
/// Install with `axum::middleware::from_fn(require_bearer)`.
#[cfg(feature = "axum")]
pub async fn require_bearer(mut request: Request, next: Next) -> Response {
	let header = request.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok());

	match bearer_token(header).map(BearerToken::new) {
		Ok(token) => {
			request.extensions_mut().insert(token);

			next.run(request).await
		},
		Err(err) => err.into_response(),
	}
}

#[cfg(feature = "axum")]
impl<S> FromRequestParts<S> for BearerToken
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(token) = parts.extensions.get::<BearerToken>() {
			return Ok(token.clone());
		}

		let header = parts.headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok());

		bearer_token(header).map(BearerToken::new)
	}
}

#[cfg(feature = "axum")]
impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status =
			StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

		(status, Json(ErrorBody::from(&self))).into_response()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn extracts_token_after_prefix() {
		assert_eq!(bearer_token(Some("Bearer abc123")).ok(), Some("abc123"));
		assert_eq!(bearer_token(Some("Bearer  padded ")).ok(), Some(" padded "));
	}

	#[test]
	fn rejects_missing_or_foreign_schemes() {
		for header in [None, Some(""), Some("Basic dXNlcjpwYXNz"), Some("bearer abc"), Some("Bearer ")]
		{
			let err = bearer_token(header).expect_err("Header should be rejected.");

			assert!(matches!(err, Error::MissingToken));
			assert_eq!(err.code(), "NO_TOKEN");
			assert_eq!(err.status(), 401);
		}
	}

	#[test]
	fn token_debug_is_redacted() {
		let token = BearerToken::new("abc123");

		assert_eq!(token.secret(), "abc123");
		assert!(!format!("{token:?}").contains("abc123"));
	}
}
