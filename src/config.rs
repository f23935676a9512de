//! Client configuration and the ESC endpoint set derived from it.
//!
//! Configuration is validated once by [`ClientConfigBuilder::build`]; afterwards every URL the
//! client touches is precomputed in [`EscEndpoints`], so operations never re-parse URLs.

/// Builder API for assembling client configuration.
pub mod builder;

pub use builder::*;

// crates.io
pub use oauth2::{ClientId, ClientSecret, RedirectUrl};
// self
use crate::_prelude::*;

/// Endpoints exposed by the ESC identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscEndpoints {
	/// Browser redirect target: `{oauth_url}/authorize/login`.
	pub authorize: Url,
	/// Code exchange: `{api_url}/api/v1/auth/token`.
	pub token: Url,
	/// Token refresh: `{api_url}/api/v1/auth/refresh-token`.
	pub refresh: Url,
	/// Authenticated profile: `{api_url}/api/v1/users/@me`.
	pub profile: Url,
}
impl EscEndpoints {
	/// Derives the endpoint set from the API and OAuth base URLs.
	pub fn from_bases(api_url: &Url, oauth_url: &Url) -> Result<Self, ConfigError> {
		Ok(Self {
			authorize: join_segments("oauth_url", oauth_url, &["authorize", "login"])?,
			token: join_segments("api_url", api_url, &["api", "v1", "auth", "token"])?,
			refresh: join_segments("api_url", api_url, &["api", "v1", "auth", "refresh-token"])?,
			profile: join_segments("api_url", api_url, &["api", "v1", "users", "@me"])?,
		})
	}
}

/// Immutable client configuration.
///
/// `Debug` output redacts the client secret.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// OAuth client identifier.
	pub client_id: ClientId,
	/// OAuth client secret sent with exchanges and refreshes.
	pub client_secret: ClientSecret,
	/// Redirect URI registered with ESC.
	pub redirect_uri: RedirectUrl,
	/// Base URL of the ESC API.
	pub api_url: Url,
	/// Base URL of the ESC OAuth frontend.
	pub oauth_url: Url,
	/// Endpoints derived from the base URLs.
	pub endpoints: EscEndpoints,
}
impl ClientConfig {
	/// Creates a new builder.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}
}

fn join_segments(field: &'static str, base: &Url, segments: &[&str]) -> Result<Url, ConfigError> {
	let mut url = base.clone();

	url.set_query(None);
	url.set_fragment(None);
	url.path_segments_mut()
		.map_err(|_| ConfigError::UnsupportedScheme { field, url: base.to_string() })?
		.pop_if_empty()
		.extend(segments);

	Ok(url)
}
