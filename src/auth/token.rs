//! Token endpoint response returned by code exchanges and refreshes.

// std
use std::collections::BTreeMap;
// crates.io
pub use oauth2::{AccessToken, RefreshToken};
// self
use crate::_prelude::*;

/// Raw token response from `/api/v1/auth/token` or `/api/v1/auth/refresh-token`.
///
/// Secrets are held in `oauth2` newtypes so `Debug` output never leaks them. Fields the ESC API
/// adds beyond the standard set are kept in [`extra`](Self::extra).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
	/// Newly issued access token.
	pub access_token: AccessToken,
	/// Refresh token, when the provider rotates or issues one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<RefreshToken>,
	/// Token type, usually `Bearer`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token_type: Option<String>,
	/// Lifetime of the access token in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires_in: Option<u64>,
	/// Space-delimited scopes granted by the provider.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,
	/// Remaining provider-specific fields.
	#[serde(flatten)]
	pub extra: BTreeMap<String, JsonValue>,
}
impl TokenResponse {
	/// Access token lifetime as a [`Duration`], when the provider reported one.
	pub fn expires_in_duration(&self) -> Option<Duration> {
		self.expires_in.and_then(|secs| i64::try_from(secs).ok()).map(Duration::seconds)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn parses_standard_and_extra_fields() {
		let response: TokenResponse = serde_json::from_value(json!({
			"access_token": "access-1",
			"refresh_token": "refresh-1",
			"token_type": "Bearer",
			"expires_in": 3600,
			"scope": "identify",
			"user_id": 42
		}))
		.expect("Token response fixture should deserialize.");

		assert_eq!(response.access_token.secret(), "access-1");
		assert_eq!(response.refresh_token.as_ref().map(|t| t.secret().as_str()), Some("refresh-1"));
		assert_eq!(response.expires_in_duration(), Some(Duration::hours(1)));
		assert_eq!(response.extra.get("user_id"), Some(&json!(42)));
	}

	#[test]
	fn debug_output_redacts_secrets() {
		let response: TokenResponse =
			serde_json::from_value(json!({ "access_token": "super-secret" }))
				.expect("Minimal token response should deserialize.");

		assert!(!format!("{response:?}").contains("super-secret"));
		assert!(response.refresh_token.is_none());
	}
}
