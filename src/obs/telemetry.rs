// self
use crate::_prelude::*;

/// Failure events reported to a [`TelemetrySink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TelemetryEvent {
	/// Authorization code exchange failed.
	TokenExchangeError,
	/// Token refresh failed.
	RefreshTokenError,
	/// Profile lookup failed.
	GetMeError,
}
impl TelemetryEvent {
	/// Returns the event tag.
	pub const fn as_str(self) -> &'static str {
		match self {
			TelemetryEvent::TokenExchangeError => "TOKEN_EXCHANGE_ERROR",
			TelemetryEvent::RefreshTokenError => "REFRESH_TOKEN_ERROR",
			TelemetryEvent::GetMeError => "GET_ME_ERROR",
		}
	}
}
impl Display for TelemetryEvent {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fire-and-forget receiver for operation failures.
///
/// Sinks run inline on the failing operation, so implementations should hand work off instead
/// of blocking.
pub trait TelemetrySink
where
	Self: Send + Sync,
{
	/// Reports `error` under `event`.
	fn emit(&self, event: TelemetryEvent, error: &Error);
}

/// Default sink that logs failures as `tracing` warn events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingTelemetry;
impl TelemetrySink for TracingTelemetry {
	fn emit(&self, event: TelemetryEvent, error: &Error) {
		#[cfg(feature = "tracing")]
		{
			tracing::warn!(
				event = event.as_str(),
				code = error.code(),
				status = error.status(),
				"{error}"
			);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (event, error);
		}
	}
}

/// Sink that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTelemetry;
impl TelemetrySink for NoopTelemetry {
	fn emit(&self, _event: TelemetryEvent, _error: &Error) {}
}
