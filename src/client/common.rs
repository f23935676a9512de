//! Shared plumbing for client operations (rate-limit gate, dispatch, outcome reporting).

// self
use crate::{
	_prelude::*,
	auth::TokenResponse,
	client::EscClient,
	ext::{RateLimitContext, RateLimitDecision},
	http::EscHttpClient,
	oauth::{self, TransportErrorMapper},
	obs::{self, Operation, OperationOutcome, OperationSpan},
};

impl<C, M> EscClient<C, M>
where
	C: ?Sized + EscHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Rate-limits, posts `body` to `url`, and decodes a token response.
	pub(crate) async fn post_token_request<B>(
		&self,
		operation: Operation,
		url: &Url,
		body: &B,
		message: &'static str,
	) -> Result<TokenResponse>
	where
		B: ?Sized + Serialize + Sync,
	{
		let span = OperationSpan::new(operation, operation.call_site());

		obs::record_operation_outcome(operation, OperationOutcome::Attempt);

		let result: Result<TokenResponse> = span
			.instrument(async move {
				self.admit(operation)?;
				obs::log_dispatch(operation, message);

				let request = oauth::post_json(url, body)?;

				oauth::dispatch(
					self.http_client.as_ref(),
					self.transport_mapper.as_ref(),
					operation,
					request,
				)
				.await
			})
			.await;

		self.report(operation, result)
	}

	/// Consults the rate-limit policy for `operation`.
	pub(crate) fn admit(&self, operation: Operation) -> Result<()> {
		match self.rate_limiter.evaluate(&RateLimitContext::new(operation.as_str())) {
			RateLimitDecision::Allow => Ok(()),
			RateLimitDecision::Delay(directive) => Err(Error::ClientRateLimited {
				operation: operation.as_str().into(),
				retry_after: directive.recommended_backoff,
			}),
		}
	}

	/// Records the outcome and forwards failures to the telemetry sink.
	pub(crate) fn report<T>(&self, operation: Operation, result: Result<T>) -> Result<T> {
		match &result {
			Ok(_) => obs::record_operation_outcome(operation, OperationOutcome::Success),
			Err(err) => {
				obs::record_operation_outcome(operation, OperationOutcome::Failure);
				self.telemetry.emit(operation.failure_event(), err);
			},
		}

		result
	}
}
