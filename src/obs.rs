//! Observability helpers for client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `esc_oauth.operation` with the `operation`
//!   and `stage` fields, plus an info event whenever a request is dispatched.
//! - Enable `metrics` to increment the `esc_oauth_operation_total` counter for every
//!   attempt/success/failure/cache hit, labeled by `operation` + `outcome`.
//!
//! Failures are additionally reported to a [`TelemetrySink`], which logs through `tracing` by
//! default.

mod metrics;
mod telemetry;
mod tracing;

pub use self::metrics::*;
pub use self::telemetry::*;
pub use self::tracing::*;

// self
use crate::_prelude::*;

/// Outbound operations performed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Authorization code exchange.
	ExchangeCode,
	/// Refresh token exchange.
	RefreshToken,
	/// `/users/@me` lookup.
	FetchProfile,
}
impl Operation {
	/// Returns the stable name used for rate-limit keys, span fields, and metric labels.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::ExchangeCode => "exchangeCode",
			Operation::RefreshToken => "refreshToken",
			Operation::FetchProfile => "fetchProfile",
		}
	}

	/// Snake-case method name recorded as the span `stage`.
	pub const fn call_site(self) -> &'static str {
		match self {
			Operation::ExchangeCode => "exchange_code",
			Operation::RefreshToken => "refresh_token",
			Operation::FetchProfile => "fetch_profile",
		}
	}

	/// Telemetry event emitted when the operation fails.
	pub const fn failure_event(self) -> TelemetryEvent {
		match self {
			Operation::ExchangeCode => TelemetryEvent::TokenExchangeError,
			Operation::RefreshToken => TelemetryEvent::RefreshTokenError,
			Operation::FetchProfile => TelemetryEvent::GetMeError,
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Answer served from the token cache.
	CacheHit,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::CacheHit => "cache_hit",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
