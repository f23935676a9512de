// self
use crate::{
	_prelude::*,
	config::{ClientConfig, ClientId, ClientSecret, EscEndpoints, RedirectUrl},
};

pub use crate::error::ConfigError;

/// Environment variable holding the client identifier.
pub const ENV_CLIENT_ID: &str = "ESC_CLIENT_ID";
/// Environment variable holding the client secret.
pub const ENV_CLIENT_SECRET: &str = "ESC_CLIENT_SECRET";
/// Environment variable holding the redirect URI.
pub const ENV_REDIRECT_URI: &str = "ESC_REDIRECT_URI";
/// Environment variable holding the API base URL.
pub const ENV_API_URL: &str = "ESC_API_URL";
/// Environment variable holding the OAuth base URL.
pub const ENV_OAUTH_URL: &str = "ESC_OAUTH_URL";

/// Builder for [`ClientConfig`] values.
#[derive(Clone, Default)]
pub struct ClientConfigBuilder {
	/// OAuth client identifier.
	pub client_id: Option<String>,
	/// OAuth client secret.
	pub client_secret: Option<String>,
	/// Registered redirect URI.
	pub redirect_uri: Option<String>,
	/// ESC API base URL.
	pub api_url: Option<String>,
	/// ESC OAuth base URL.
	pub oauth_url: Option<String>,
}
impl ClientConfigBuilder {
	/// Seeds a builder from the `ESC_*` environment variables.
	pub fn from_env() -> Self {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Seeds a builder from an arbitrary key lookup using the `ESC_*` variable names.
	pub fn from_lookup<F>(mut lookup: F) -> Self
	where
		F: FnMut(&str) -> Option<String>,
	{
		Self {
			client_id: lookup(ENV_CLIENT_ID),
			client_secret: lookup(ENV_CLIENT_SECRET),
			redirect_uri: lookup(ENV_REDIRECT_URI),
			api_url: lookup(ENV_API_URL),
			oauth_url: lookup(ENV_OAUTH_URL),
		}
	}

	/// Sets the client identifier.
	pub fn client_id(mut self, value: impl Into<String>) -> Self {
		self.client_id = Some(value.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, value: impl Into<String>) -> Self {
		self.client_secret = Some(value.into());

		self
	}

	/// Sets the redirect URI.
	pub fn redirect_uri(mut self, value: impl Into<String>) -> Self {
		self.redirect_uri = Some(value.into());

		self
	}

	/// Sets the ESC API base URL.
	pub fn api_url(mut self, value: impl Into<String>) -> Self {
		self.api_url = Some(value.into());

		self
	}

	/// Sets the ESC OAuth base URL.
	pub fn oauth_url(mut self, value: impl Into<String>) -> Self {
		self.oauth_url = Some(value.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let client_id = required("client_id", self.client_id)?;
		let client_secret = required("client_secret", self.client_secret)?;
		let redirect_uri = RedirectUrl::new(required("redirect_uri", self.redirect_uri)?)
			.map_err(|source| ConfigError::InvalidUrl { field: "redirect_uri", source })?;
		let api_url = base_url("api_url", self.api_url)?;
		let oauth_url = base_url("oauth_url", self.oauth_url)?;
		let endpoints = EscEndpoints::from_bases(&api_url, &oauth_url)?;

		Ok(ClientConfig {
			client_id: ClientId::new(client_id),
			client_secret: ClientSecret::new(client_secret),
			redirect_uri,
			api_url,
			oauth_url,
			endpoints,
		})
	}
}
impl Debug for ClientConfigBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfigBuilder")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("redirect_uri", &self.redirect_uri)
			.field("api_url", &self.api_url)
			.field("oauth_url", &self.oauth_url)
			.finish()
	}
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
	match value {
		Some(value) if !value.trim().is_empty() => Ok(value),
		_ => Err(ConfigError::MissingField { field }),
	}
}

fn base_url(field: &'static str, value: Option<String>) -> Result<Url, ConfigError> {
	let raw = required(field, value)?;
	let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { field, source })?;

	match url.scheme() {
		"http" | "https" => Ok(url),
		_ => Err(ConfigError::UnsupportedScheme { field, url: url.to_string() }),
	}
}
