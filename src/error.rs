//! Client-level error types and the normalized error shape surfaced to callers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed transport error retained as the source of network failures.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Code reported for non-2xx responses whose body carries no `code` field.
pub const API_ERROR_CODE: &str = "ESC_API_ERROR";
/// Code reported when a request was sent but no response arrived.
pub const NETWORK_ERROR_CODE: &str = "ESC_NETWORK_ERROR";
/// Code reported for local failures before or after dispatch.
pub const UNKNOWN_ERROR_CODE: &str = "ESC_UNKNOWN_ERROR";
/// Code reported when the local rate limiter rejects a call.
pub const RATE_LIMITED_CODE: &str = "ESC_CLIENT_RATE_LIMITED";
/// Code reported for malformed caller input.
pub const INVALID_ARGUMENT_CODE: &str = "ESC_INVALID_ARGUMENT";
/// Code reported by the middleware when no bearer token is present.
pub const NO_TOKEN_CODE: &str = "NO_TOKEN";

/// Canonical client error exposed by public APIs.
///
/// Every variant maps onto a stable [`code`](Self::code) and HTTP [`status`](Self::status), and
/// [`normalized`](Self::normalized) renders the uniform `{message, code, status, details}` shape.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The ESC API answered with a non-2xx status.
	#[error("{message}")]
	Api {
		/// Body `message` field, or a generic fallback.
		message: String,
		/// Body `code` field, or [`API_ERROR_CODE`].
		code: String,
		/// HTTP status returned by the API.
		status: u16,
		/// Full response body, when one was returned.
		details: Option<JsonValue>,
	},
	/// The request was dispatched but no response arrived.
	#[error("Unable to communicate with the ESC API.")]
	Network {
		/// Transport failure reported by the HTTP client.
		#[source]
		source: BoxError,
	},
	/// Local failure (request never sent, or the response could not be read).
	#[error("{message}")]
	Unknown {
		/// Underlying error message, or a generic fallback.
		message: String,
	},
	/// The local fixed-window limiter rejected the call.
	#[error("Client rate limit exceeded for {operation}.")]
	ClientRateLimited {
		/// Operation name that was throttled.
		operation: String,
		/// Time until the current window closes.
		retry_after: Duration,
	},
	/// Caller input could not be used.
	#[error(transparent)]
	InvalidArgument(#[from] crate::auth::ScopeError),
	/// No bearer token accompanied an inbound request.
	#[error("Missing access token.")]
	MissingToken,
}
impl Error {
	/// Stable machine-readable code for the failure.
	pub fn code(&self) -> &str {
		match self {
			Self::Api { code, .. } => code,
			Self::Network { .. } => NETWORK_ERROR_CODE,
			Self::Unknown { .. } => UNKNOWN_ERROR_CODE,
			Self::ClientRateLimited { .. } => RATE_LIMITED_CODE,
			Self::InvalidArgument(_) => INVALID_ARGUMENT_CODE,
			Self::MissingToken => NO_TOKEN_CODE,
		}
	}

	/// HTTP status associated with the failure.
	pub fn status(&self) -> u16 {
		match self {
			Self::Api { status, .. } => *status,
			Self::Network { .. } => 503,
			Self::Unknown { .. } => 500,
			Self::ClientRateLimited { .. } => 429,
			Self::InvalidArgument(_) => 400,
			Self::MissingToken => 401,
		}
	}

	/// Upstream response body, if the failure carried one.
	pub fn details(&self) -> Option<&JsonValue> {
		match self {
			Self::Api { details, .. } => details.as_ref(),
			_ => None,
		}
	}

	/// Renders the uniform error shape.
	pub fn normalized(&self) -> NormalizedError {
		NormalizedError {
			message: self.to_string(),
			code: self.code().to_owned(),
			status: self.status(),
			details: self.details().cloned(),
		}
	}

	pub(crate) fn unknown(message: impl Into<String>) -> Self {
		Self::Unknown { message: message.into() }
	}
}

/// Uniform error shape shared by every failure the client surfaces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedError {
	/// Human-readable message.
	pub message: String,
	/// Machine-readable code.
	pub code: String,
	/// HTTP status.
	pub status: u16,
	/// Upstream response body, when available.
	pub details: Option<JsonValue>,
}

/// JSON body written to HTTP responses when a request is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
	/// Always `true`.
	pub error: bool,
	/// Machine-readable code.
	pub code: String,
	/// Human-readable message.
	pub message: String,
}
impl From<&Error> for ErrorBody {
	fn from(err: &Error) -> Self {
		Self { error: true, code: err.code().to_owned(), message: err.to_string() }
	}
}

/// Configuration and validation failures raised while building a [`ClientConfig`].
///
/// [`ClientConfig`]: crate::config::ClientConfig
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// A required field was never set.
	#[error("Missing required configuration field `{field}`.")]
	MissingField {
		/// Field name.
		field: &'static str,
	},
	/// A URL field could not be parsed.
	#[error("Configuration field `{field}` is not a valid URL.")]
	InvalidUrl {
		/// Field name.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A base URL does not use `http` or `https`.
	#[error("Configuration field `{field}` must be an http(s) URL: {url}.")]
	UnsupportedScheme {
		/// Field name.
		field: &'static str,
		/// Offending URL.
		url: String,
	},
}
