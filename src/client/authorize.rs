//! Authorization URL construction.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
// self
use crate::{
	_prelude::*,
	auth::ScopeList,
	client::EscClient,
	http::EscHttpClient,
	oauth::TransportErrorMapper,
};

/// Everything except unreserved URI component characters is escaped; a space becomes `%20`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'!')
	.remove(b'~')
	.remove(b'*')
	.remove(b'(')
	.remove(b')');

impl<C, M> EscClient<C, M>
where
	C: ?Sized + EscHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the browser redirect target for the provided scopes.
	///
	/// The result is `{oauth_url}/authorize/login?client_id=..&redirect_uri=..&scope=..` with
	/// every parameter percent-encoded, so the scope separator is sent as `%20`.
	pub fn authorization_url(&self, scopes: &ScopeList) -> Url {
		let mut url = self.config.endpoints.authorize.clone();
		let query = format!(
			"client_id={}&redirect_uri={}&scope={}",
			utf8_percent_encode(self.config.client_id.as_str(), QUERY_COMPONENT),
			utf8_percent_encode(self.config.redirect_uri.as_str(), QUERY_COMPONENT),
			utf8_percent_encode(&scopes.joined(), QUERY_COMPONENT),
		);

		url.set_query(Some(&query));

		url
	}

	/// Normalizes `scopes` and builds the authorization URL.
	pub fn build_authorization_url<I, S>(&self, scopes: I) -> Url
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.authorization_url(&ScopeList::new(scopes))
	}

	/// Builds the authorization URL from untyped input, which must be a JSON array.
	pub fn authorization_url_from_json(&self, scopes: &JsonValue) -> Result<Url> {
		Ok(self.authorization_url(&ScopeList::from_json(scopes)?))
	}

	/// Builds the authorization URL requesting only the `identify` scope.
	pub fn default_authorization_url(&self) -> Url {
		self.authorization_url(&ScopeList::default())
	}
}
