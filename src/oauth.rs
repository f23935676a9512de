//! Outbound call plumbing: request construction, dispatch, and error normalization.
//!
//! Every failure observed while talking to the ESC API is first classified into a
//! [`CallFailure`] (the server answered, the server never answered, or the request never left
//! the process) and then [`normalize`]d into an [`Error`]. No raw transport error escapes.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{API_ERROR_CODE, BoxError},
	http::EscHttpClient,
	obs::Operation,
};

const API_ERROR_FALLBACK: &str = "The ESC API returned an error.";
const UNKNOWN_ERROR_FALLBACK: &str = "Unknown error.";
const JSON_MIME: &str = "application/json";

/// Transport-agnostic classification of a failed outbound call.
#[derive(Debug)]
pub enum CallFailure {
	/// The server responded with a non-2xx status.
	Response {
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: Vec<u8>,
	},
	/// The request was sent but no response arrived.
	NoResponse {
		/// Transport failure.
		source: BoxError,
	},
	/// The request never left the process, or failed locally.
	Local {
		/// Underlying error message, if any.
		message: Option<String>,
	},
}

/// Maps HTTP transport failures into [`CallFailure`] categories.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Classifies an [`HttpClientError`] emitted by the transport during `operation`.
	fn map_transport_error(&self, operation: Operation, error: HttpClientError<E>) -> CallFailure;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		operation: Operation,
		err: HttpClientError<ReqwestError>,
	) -> CallFailure {
		// Operation reserved for future use.
		let _ = operation;

		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(*inner),
			HttpClientError::Http(inner) => CallFailure::Local { message: Some(inner.to_string()) },
			HttpClientError::Io(inner) => CallFailure::NoResponse { source: Box::new(inner) },
			HttpClientError::Other(message) => CallFailure::Local { message: Some(message) },
			_ => CallFailure::Local { message: None },
		}
	}
}

/// Coerces a classified failure into the client's uniform [`Error`].
pub fn normalize(failure: CallFailure) -> Error {
	match failure {
		CallFailure::Response { status, body } => {
			let details = parse_details(&body);
			let field = |name: &str| {
				details
					.as_ref()
					.and_then(|value| value.get(name))
					.and_then(JsonValue::as_str)
					.filter(|value| !value.is_empty())
					.map(str::to_owned)
			};

			Error::Api {
				message: field("message").unwrap_or_else(|| API_ERROR_FALLBACK.into()),
				code: field("code").unwrap_or_else(|| API_ERROR_CODE.into()),
				status,
				details,
			}
		},
		CallFailure::NoResponse { source } => Error::Network { source },
		CallFailure::Local { message } => Error::unknown(
			message
				.filter(|value| !value.is_empty())
				.unwrap_or_else(|| UNKNOWN_ERROR_FALLBACK.into()),
		),
	}
}

/// Builds a JSON `POST` request.
pub(crate) fn post_json<B>(url: &Url, body: &B) -> Result<HttpRequest>
where
	B: ?Sized + Serialize,
{
	let payload = serde_json::to_vec(body).map_err(|err| Error::unknown(err.to_string()))?;

	Request::builder()
		.method(Method::POST)
		.uri(url.as_str())
		.header(CONTENT_TYPE, JSON_MIME)
		.header(ACCEPT, JSON_MIME)
		.body(payload)
		.map_err(|err| Error::unknown(err.to_string()))
}

/// Builds a `GET` request authenticated with a bearer token.
pub(crate) fn get_with_bearer(url: &Url, access_token: &str) -> Result<HttpRequest> {
	Request::builder()
		.method(Method::GET)
		.uri(url.as_str())
		.header(ACCEPT, JSON_MIME)
		.header(AUTHORIZATION, format!("Bearer {access_token}"))
		.body(Vec::new())
		.map_err(|err| Error::unknown(err.to_string()))
}

/// Sends `request` and decodes a 2xx JSON body into `T`, normalizing every failure.
pub(crate) async fn dispatch<C, M, T>(
	http_client: &C,
	mapper: &M,
	operation: Operation,
	request: HttpRequest,
) -> Result<T>
where
	C: ?Sized + EscHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
	T: DeserializeOwned,
{
	let handle = http_client.handle();
	let response = handle
		.call(request)
		.await
		.map_err(|err| normalize(mapper.map_transport_error(operation, err)))?;
	let status = response.status();

	if !status.is_success() {
		return Err(normalize(CallFailure::Response {
			status: status.as_u16(),
			body: response.into_body(),
		}));
	}

	decode_body(response.body())
}

fn decode_body<T>(body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let de = &mut serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(de).map_err(|err| {
		Error::unknown(format!(
			"The ESC API returned an unreadable body at `{}`: {}.",
			err.path(),
			err.inner()
		))
	})
}

fn parse_details(body: &[u8]) -> Option<JsonValue> {
	if body.is_empty() {
		return None;
	}

	match serde_json::from_slice::<JsonValue>(body) {
		Ok(JsonValue::Null) => None,
		Ok(value) => Some(value),
		Err(_) => Some(JsonValue::String(String::from_utf8_lossy(body).into_owned())),
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(err: ReqwestError) -> CallFailure {
	if err.is_builder() {
		CallFailure::Local { message: Some(err.to_string()) }
	} else {
		CallFailure::NoResponse { source: Box::new(err) }
	}
}
