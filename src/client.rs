//! ESC OAuth client and its operations.
//!
//! [`EscClient`] owns the configuration, transport, token cache, rate limiter, and telemetry
//! sink. Each operation lives in its own submodule as an `impl` block:
//!
//! - [`authorize`]: authorization URL construction (no I/O).
//! - [`exchange`]: code exchange and token refresh, both gated by the rate limiter.
//! - [`profile`]: `/users/@me` lookups served from the token cache when possible.

pub mod authorize;
pub mod exchange;
pub mod profile;

mod common;

// self
use crate::{
	_prelude::*,
	cache::ProfileCache,
	config::ClientConfig,
	ext::{FixedWindowLimiter, RateLimitPolicy},
	http::EscHttpClient,
	oauth::TransportErrorMapper,
	obs::{TelemetrySink, TracingTelemetry},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestEscClient = EscClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// OAuth client for the ESC identity provider.
///
/// State that the client mutates (the profile cache and the rate limiter) is held behind `Arc`
/// so several clients can share it, or a test can inspect it. Nothing here coalesces concurrent
/// requests: two simultaneous profile lookups for an uncached token both reach the API.
pub struct EscClient<C, M>
where
	C: ?Sized + EscHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Validated client configuration.
	pub config: ClientConfig,
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before normalization.
	pub transport_mapper: Arc<M>,
	/// Profiles cached by access token.
	pub profile_cache: Arc<ProfileCache>,
	/// Admission policy consulted before code exchanges and refreshes.
	pub rate_limiter: Arc<dyn RateLimitPolicy>,
	/// Receiver for operation failures.
	pub telemetry: Arc<dyn TelemetrySink>,
}
impl<C, M> EscClient<C, M>
where
	C: ?Sized + EscHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: ClientConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			config,
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			profile_cache: Default::default(),
			rate_limiter: Arc::new(FixedWindowLimiter::default()),
			telemetry: Arc::new(TracingTelemetry),
		}
	}

	/// Replaces the profile cache, e.g. to share one cache between clients.
	pub fn with_profile_cache(mut self, cache: Arc<ProfileCache>) -> Self {
		self.profile_cache = cache;

		self
	}

	/// Replaces the rate-limit policy.
	pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimitPolicy>) -> Self {
		self.rate_limiter = limiter;

		self
	}

	/// Replaces the telemetry sink.
	pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
		self.telemetry = telemetry;

		self
	}
}
#[cfg(feature = "reqwest")]
impl EscClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a new client backed by a default reqwest transport.
	pub fn new(config: ClientConfig) -> Self {
		Self::with_http_client(
			config,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Clone for EscClient<C, M>
where
	C: ?Sized + EscHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			profile_cache: self.profile_cache.clone(),
			rate_limiter: self.rate_limiter.clone(),
			telemetry: self.telemetry.clone(),
		}
	}
}
impl<C, M> Debug for EscClient<C, M>
where
	C: ?Sized + EscHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("EscClient")
			.field("config", &self.config)
			.field("profile_cache", &self.profile_cache)
			.finish()
	}
}
