//! Extension contracts the client consults around outbound calls.
//!
//! The client only depends on the [`RateLimitPolicy`] trait, so callers can swap the bundled
//! [`FixedWindowLimiter`] for their own admission control.

pub mod rate_limit;

pub use rate_limit::*;
