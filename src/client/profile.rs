//! Authenticated profile lookups backed by the token cache.
//!
//! A cache hit answers immediately: no outbound call and no rate-limit check. A miss calls
//! `/api/v1/users/@me` with the token as a bearer credential and caches a successful answer for
//! one hour.

// self
use crate::{
	_prelude::*,
	auth::Profile,
	cache::DEFAULT_TTL_SECS,
	client::EscClient,
	http::EscHttpClient,
	oauth::{self, TransportErrorMapper},
	obs::{self, Operation, OperationOutcome, OperationSpan},
};

impl<C, M> EscClient<C, M>
where
	C: ?Sized + EscHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Returns the profile for `access_token`, preferring the cache.
	///
	/// Failures emit the `GET_ME_ERROR` telemetry event.
	pub async fn fetch_profile(&self, access_token: &str) -> Result<Profile> {
		const OPERATION: Operation = Operation::FetchProfile;

		if let Some(cached) = self.profile_cache.get(access_token) {
			obs::record_operation_outcome(OPERATION, OperationOutcome::CacheHit);

			return Ok(cached);
		}

		let span = OperationSpan::new(OPERATION, OPERATION.call_site());

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result: Result<Profile> = span
			.instrument(async move {
				obs::log_dispatch(OPERATION, "Fetching /@me.");

				let request =
					oauth::get_with_bearer(&self.config.endpoints.profile, access_token)?;
				let profile: Profile = oauth::dispatch(
					self.http_client.as_ref(),
					self.transport_mapper.as_ref(),
					OPERATION,
					request,
				)
				.await?;

				self.profile_cache.set_with_ttl(
					access_token,
					profile.clone(),
					Duration::seconds(DEFAULT_TTL_SECS),
				);

				Ok(profile)
			})
			.await;

		self.report(OPERATION, result)
	}

	/// Drops the cached profile for `access_token`, returning it if one was cached.
	pub fn invalidate_profile(&self, access_token: &str) -> Option<Profile> {
		self.profile_cache.remove(access_token)
	}
}
