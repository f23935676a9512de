//! Rate limit policy contracts and the bundled fixed-window limiter.
//!
//! The limiter is local to the process. Each operation name owns an independent window, so a
//! burst of code exchanges never starves refreshes.

// self
use crate::_prelude::*;

/// Calls allowed per window by [`FixedWindowLimiter::default`].
pub const DEFAULT_LIMIT: u32 = 30;
/// Window length used by [`FixedWindowLimiter::default`].
pub const DEFAULT_WINDOW: Duration = Duration::seconds(60);

/// Strategy consulted before the client issues a rate-limited outbound call.
pub trait RateLimitPolicy
where
	Self: Send + Sync,
{
	/// Evaluates whether the call described by `context` may proceed.
	fn evaluate(&self, context: &RateLimitContext) -> RateLimitDecision;
}

/// Context shared with a [`RateLimitPolicy`] before an outbound call is made.
#[derive(Clone, Debug)]
pub struct RateLimitContext {
	/// Logical operation being attempted (`exchangeCode`, `refreshToken`).
	pub operation: String,
	/// Timestamp the client observed before invoking the policy.
	pub observed_at: OffsetDateTime,
}
impl RateLimitContext {
	/// Creates a new context for the given operation.
	pub fn new(operation: impl Into<String>) -> Self {
		Self { operation: operation.into(), observed_at: OffsetDateTime::now_utc() }
	}

	/// Overrides the timestamp associated with the observation.
	pub fn with_observed_at(mut self, instant: OffsetDateTime) -> Self {
		self.observed_at = instant;

		self
	}
}

/// Result emitted by a [`RateLimitPolicy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
	/// The request may proceed immediately.
	Allow,
	/// The request must not be sent before the directive's instant.
	Delay(RetryDirective),
}
impl RateLimitDecision {
	/// Returns true for [`RateLimitDecision::Allow`].
	pub fn is_allowed(&self) -> bool {
		matches!(self, Self::Allow)
	}
}

/// Advises callers when a throttled operation may be attempted again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryDirective {
	/// Instant when the current window closes.
	pub earliest_retry_at: OffsetDateTime,
	/// Time remaining until `earliest_retry_at`.
	pub recommended_backoff: Duration,
	/// Optional descriptive string.
	pub reason: Option<String>,
}
impl RetryDirective {
	/// Creates a new directive with the provided timing metadata.
	pub fn new(earliest_retry_at: OffsetDateTime, recommended_backoff: Duration) -> Self {
		Self { earliest_retry_at, recommended_backoff, reason: None }
	}

	/// Adds a human-readable reason.
	pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
		self.reason = Some(reason.into());

		self
	}
}

/// Counter state for one operation name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateWindow {
	/// Calls counted in the current window, including rejected ones.
	pub count: u32,
	/// Instant at which the window elapses and the count resets.
	pub reset_at: OffsetDateTime,
}

/// Fixed-window limiter allowing `limit` calls per `window` for each operation name.
#[derive(Debug)]
pub struct FixedWindowLimiter {
	limit: u32,
	window: Duration,
	windows: Mutex<HashMap<String, RateWindow>>,
}
impl FixedWindowLimiter {
	/// Creates a limiter that admits `limit` calls per `window` and operation.
	///
	/// Negative windows are clamped to zero, which makes every window expire immediately.
	pub fn new(limit: u32, window: Duration) -> Self {
		let window = if window.is_negative() { Duration::ZERO } else { window };

		Self { limit, window, windows: Default::default() }
	}

	/// Configured calls per window.
	pub fn limit(&self) -> u32 {
		self.limit
	}

	/// Configured window length.
	pub fn window(&self) -> Duration {
		self.window
	}

	/// Counts a call for `operation` now and reports whether it is within the limit.
	pub fn allow(&self, operation: &str) -> bool {
		self.allow_at(operation, OffsetDateTime::now_utc()).is_allowed()
	}

	/// Counts a call for `operation` observed at `now`.
	pub fn allow_at(&self, operation: &str, now: OffsetDateTime) -> RateLimitDecision {
		let mut windows = self.windows.lock();
		let state = windows
			.entry(operation.to_owned())
			.or_insert(RateWindow { count: 0, reset_at: now + self.window });

		if now >= state.reset_at {
			state.count = 0;
			state.reset_at = now + self.window;
		}

		state.count = state.count.saturating_add(1);

		if state.count <= self.limit {
			RateLimitDecision::Allow
		} else {
			RateLimitDecision::Delay(
				RetryDirective::new(state.reset_at, state.reset_at - now)
					.with_reason(format!("{operation} exceeded {} calls per window", self.limit)),
			)
		}
	}

	/// Current window state for `operation`, if one was opened.
	pub fn window_state(&self, operation: &str) -> Option<RateWindow> {
		self.windows.lock().get(operation).copied()
	}

	/// Forgets every window.
	pub fn reset(&self) {
		self.windows.lock().clear();
	}
}
impl Default for FixedWindowLimiter {
	fn default() -> Self {
		Self::new(DEFAULT_LIMIT, DEFAULT_WINDOW)
	}
}
impl RateLimitPolicy for FixedWindowLimiter {
	fn evaluate(&self, context: &RateLimitContext) -> RateLimitDecision {
		self.allow_at(&context.operation, context.observed_at)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn allows_limit_then_rejects() {
		let limiter = FixedWindowLimiter::new(3, Duration::minutes(1));
		let results = (0..4).map(|_| limiter.allow("exchangeCode")).collect::<Vec<_>>();

		assert_eq!(results, vec![true, true, true, false]);
	}

	#[test]
	fn operations_have_independent_windows() {
		let limiter = FixedWindowLimiter::new(1, Duration::minutes(1));

		assert!(limiter.allow("exchangeCode"));
		assert!(!limiter.allow("exchangeCode"));
		assert!(limiter.allow("refreshToken"));
	}

	#[test]
	fn elapsed_window_resets_count() {
		let limiter = FixedWindowLimiter::new(2, Duration::seconds(10));
		let start = OffsetDateTime::now_utc();

		assert!(limiter.allow_at("op", start).is_allowed());
		assert!(limiter.allow_at("op", start + Duration::seconds(1)).is_allowed());

		let denied = limiter.allow_at("op", start + Duration::seconds(4));

		match denied {
			RateLimitDecision::Delay(directive) => {
				assert_eq!(directive.earliest_retry_at, start + Duration::seconds(10));
				assert_eq!(directive.recommended_backoff, Duration::seconds(6));
				assert!(directive.reason.is_some());
			},
			RateLimitDecision::Allow => panic!("Third call inside the window must be delayed."),
		}

		assert!(limiter.allow_at("op", start + Duration::seconds(10)).is_allowed());
		assert_eq!(
			limiter.window_state("op").map(|window| window.count),
			Some(1),
			"Count should restart in the new window."
		);
	}

	#[test]
	fn policy_uses_context_timestamp() {
		let limiter = FixedWindowLimiter::new(1, Duration::seconds(5));
		let now = OffsetDateTime::now_utc();
		let ctx = RateLimitContext::new("refreshToken").with_observed_at(now);

		assert_eq!(limiter.evaluate(&ctx), RateLimitDecision::Allow);
		assert!(!limiter.evaluate(&ctx).is_allowed());
		assert!(limiter.evaluate(&ctx.with_observed_at(now + Duration::seconds(5))).is_allowed());
	}

	#[test]
	fn zero_limit_rejects_everything() {
		let limiter = FixedWindowLimiter::new(0, DEFAULT_WINDOW);

		assert!(!limiter.allow("exchangeCode"));

		limiter.reset();

		assert!(limiter.window_state("exchangeCode").is_none());
	}
}
