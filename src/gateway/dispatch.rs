//! Credential attachment, response classification, and replay.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::HttpError,
	gateway::{ApiRequest, Gateway},
	http::{ApiResponse, HttpTransport},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

impl<T> Gateway<T>
where
	T: ?Sized + HttpTransport,
{
	/// Sends `request`, transparently recovering from an expired access token.
	///
	/// Non-2xx responses are logged and returned as [`Error::Http`]. A `401` on a request that
	/// is neither a retry nor addressed to an authentication route triggers the refresh
	/// protocol; when recovery succeeds the caller only sees the replayed response.
	pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		const KIND: CallKind = CallKind::Request;

		let span = CallSpan::new(KIND, "send");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let credential = self.session.outbound_credential().await?;
				let response = self.dispatch(&request, credential.as_ref()).await?;

				match self.classify(&request, response) {
					Ok(response) => Ok(response),
					Err(failure) if self.should_recover(&request, &failure) =>
						self.recover(request, failure, credential).await,
					Err(failure) => Err(failure.into()),
				}
			})
			.await;

		record_outcome(KIND, &result);

		result
	}

	/// Sends `request` and decodes the successful response body as JSON.
	pub async fn send_json<R>(&self, request: ApiRequest) -> Result<R>
	where
		R: DeserializeOwned,
	{
		Ok(self.send(request).await?.json()?)
	}

	/// Attaches `credential` (if any) and hands the request to the transport.
	pub(crate) async fn dispatch(
		&self,
		request: &ApiRequest,
		credential: Option<&TokenSecret>,
	) -> Result<ApiResponse> {
		let outbound = request.to_outbound(&self.config, credential)?;

		Ok(self.transport.execute(outbound).await?)
	}

	/// Splits 2xx responses from failures, logging every failure.
	pub(crate) fn classify(
		&self,
		request: &ApiRequest,
		response: ApiResponse,
	) -> Result<ApiResponse, HttpError> {
		if response.is_success() {
			return Ok(response);
		}

		let failure = response.to_error();

		obs::log_http_failure(request.method, &request.path, failure.status, &failure.detail);

		Err(failure)
	}

	/// Replays `request` once with `token`; any failure is passed through.
	pub(crate) async fn replay(
		&self,
		request: ApiRequest,
		token: &TokenSecret,
	) -> Result<ApiResponse> {
		const KIND: CallKind = CallKind::Replay;

		let span = CallSpan::new(KIND, "replay");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		self.refresh_metrics.record_replay();

		let result = span
			.instrument(async move {
				let request = request.retried();
				let response = self.dispatch(&request, Some(token)).await?;

				self.classify(&request, response).map_err(Error::from)
			})
			.await;

		record_outcome(KIND, &result);

		result
	}

	fn should_recover(&self, request: &ApiRequest, failure: &HttpError) -> bool {
		failure.is_unauthorized()
			&& !request.is_retry()
			&& !self.config.is_auth_route(&request.path)
	}
}

pub(crate) fn record_outcome<R>(kind: CallKind, result: &Result<R>) {
	match result {
		Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
		Err(_) => obs::record_call_outcome(kind, CallOutcome::Failure),
	}
}
