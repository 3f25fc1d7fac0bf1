//! Single-flight token refresh with an ordered queue of waiting requests.
//!
//! The first request to observe a recoverable `401` becomes the leader: it exchanges the
//! stored refresh token, persists the rotated pair, and settles the queue. Requests failing
//! while the leader is in flight enqueue a continuation instead of starting their own refresh;
//! settling resolves (or rejects) them in the order they queued. The in-flight marker and the
//! queue share one lock, so clearing the marker and draining the queue happen atomically, and
//! a leader dropped mid-refresh still settles its waiters.

// crates.io
use tokio::sync::oneshot;
// self
use crate::{
	_prelude::*,
	auth::{RefreshTokenRequest, TokenPair, TokenSecret},
	error::{ConfigError, HttpError, TransportError},
	gateway::{ApiRequest, Gateway, dispatch::record_outcome},
	http::{ApiResponse, HttpTransport, Method, OutboundRequest},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

type RefreshOutcome = Result<TokenSecret, Arc<Error>>;
type Waiter = oneshot::Sender<RefreshOutcome>;

/// Single-flight gate: `None` while idle, `Some(queue)` while a refresh is in flight.
#[derive(Debug, Default)]
pub(crate) struct RefreshCoordinator(Mutex<Option<Vec<Waiter>>>);
impl RefreshCoordinator {
	/// Joins the refresh, becoming the leader when none is in flight.
	pub(crate) fn join(&self) -> RefreshTicket<'_> {
		let mut state = self.0.lock();

		match state.as_mut() {
			Some(queue) => {
				let (tx, rx) = oneshot::channel();

				queue.push(tx);

				RefreshTicket::Waiter(rx)
			},
			None => {
				*state = Some(Vec::new());

				RefreshTicket::Leader(RefreshLease { coordinator: self, settled: false })
			},
		}
	}

	pub(crate) fn is_refreshing(&self) -> bool {
		self.0.lock().is_some()
	}

	fn settle(&self, outcome: RefreshOutcome) -> usize {
		let waiters = self.0.lock().take().unwrap_or_default();
		let count = waiters.len();

		for waiter in waiters {
			// A dropped receiver means the waiting caller went away.
			let _ = waiter.send(outcome.clone());
		}

		count
	}
}

/// Role assigned by [`RefreshCoordinator::join`].
pub(crate) enum RefreshTicket<'a> {
	/// Caller must perform the refresh and settle the lease.
	Leader(RefreshLease<'a>),
	/// Caller waits for the leader's outcome.
	Waiter(oneshot::Receiver<RefreshOutcome>),
}

/// Leader's obligation to settle the queue; dropping it unsettled rejects every waiter.
pub(crate) struct RefreshLease<'a> {
	coordinator: &'a RefreshCoordinator,
	settled: bool,
}
impl RefreshLease<'_> {
	/// Clears the in-flight marker and delivers `outcome` to every waiter in queue order.
	pub(crate) fn settle(mut self, outcome: RefreshOutcome) -> usize {
		self.settled = true;

		self.coordinator.settle(outcome)
	}
}
impl Drop for RefreshLease<'_> {
	fn drop(&mut self) {
		if !self.settled {
			self.coordinator.settle(Err(Arc::new(Error::RefreshAbandoned)));
		}
	}
}

impl<T> Gateway<T>
where
	T: ?Sized + HttpTransport,
{
	/// Refreshes the session explicitly, sharing any refresh already in flight.
	///
	/// Returns `Ok(false)` without touching the session when no refresh token is stored. A
	/// rejected refresh ends the session exactly like a failed recovery does.
	pub async fn refresh_session(&self) -> Result<bool> {
		if self.session.refresh_token().await?.is_none() {
			return Ok(false);
		}

		match self.refresh.join() {
			RefreshTicket::Waiter(waiter) => {
				self.refresh_metrics.record_queued();
				Self::await_refresh(waiter).await?;
			},
			RefreshTicket::Leader(lease) => {
				self.lead_refresh(lease).await.map_err(|source| Error::RefreshFailed { source })?;
			},
		}

		Ok(true)
	}

	/// Recovers from a `401` on `request`, which was sent with `used`.
	pub(crate) async fn recover(
		&self,
		request: ApiRequest,
		failure: HttpError,
		used: Option<TokenSecret>,
	) -> Result<ApiResponse> {
		// Another caller already rotated the credential since this request was sent.
		if let Some(current) = self.session.access_token().await?
			&& used.as_ref() != Some(&current)
			&& !self.refresh.is_refreshing()
		{
			return self.replay(request, &current).await;
		}

		let token = match self.refresh.join() {
			RefreshTicket::Waiter(waiter) => {
				self.refresh_metrics.record_queued();

				Self::await_refresh(waiter).await?
			},
			RefreshTicket::Leader(lease) => match self.lead_refresh(lease).await {
				Ok(token) => token,
				Err(source) if matches!(*source, Error::Config(ConfigError::MissingRefreshToken)) =>
					return Err(failure.into()),
				Err(source) => return Err(Error::RefreshFailed { source }),
			},
		};

		self.replay(request, &token).await
	}

	async fn await_refresh(waiter: oneshot::Receiver<RefreshOutcome>) -> Result<TokenSecret> {
		match waiter.await {
			Ok(Ok(token)) => Ok(token),
			Ok(Err(source)) => Err(Error::RefreshFailed { source }),
			Err(_) => Err(Error::RefreshAbandoned),
		}
	}

	async fn lead_refresh(&self, lease: RefreshLease<'_>) -> Result<TokenSecret, Arc<Error>> {
		const KIND: CallKind = CallKind::Refresh;

		let span = CallSpan::new(KIND, "lead_refresh");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		obs::log_refresh("started", 0);
		self.refresh_metrics.record_attempt();

		let result = span.instrument(self.exchange_refresh_token()).await;

		record_outcome(KIND, &result);

		match result {
			Ok(pair) => {
				let waiters = lease.settle(Ok(pair.access_token.clone()));

				self.refresh_metrics.record_success();
				obs::log_refresh("succeeded", waiters);

				Ok(pair.access_token)
			},
			Err(err) => {
				let err = Arc::new(err);
				let waiters = lease.settle(Err(err.clone()));

				self.refresh_metrics.record_failure();
				obs::log_refresh("failed", waiters);
				self.end_session(&err).await;

				Err(err)
			},
		}
	}

	/// Exchanges the stored refresh token and persists the rotated pair.
	async fn exchange_refresh_token(&self) -> Result<TokenPair> {
		let refresh_token =
			self.session.refresh_token().await?.ok_or(ConfigError::MissingRefreshToken)?;
		let url = self.config.endpoint(&self.config.refresh_path, &[])?;
		let body = serde_json::to_vec(&RefreshTokenRequest { refresh_token: &refresh_token })
			.map_err(ConfigError::from)?;
		let outbound = OutboundRequest::new(Method::Post, url)
			.header("content-type", "application/json")
			.body(body);
		let call = self.transport.execute(outbound);
		let response = match self.config.refresh_bound() {
			Some(bound) => tokio::time::timeout(bound, call)
				.await
				.map_err(|_| TransportError::Timeout { after: self.config.refresh_timeout })??,
			None => call.await?,
		};

		if !response.is_success() {
			let failure = response.to_error();

			obs::log_http_failure(
				Method::Post,
				&self.config.refresh_path,
				failure.status,
				&failure.detail,
			);

			return Err(failure.into());
		}

		let pair = response.json::<TokenPair>()?;

		self.session.persist(&pair).await?;

		Ok(pair)
	}

	/// Clears the session and sends the navigator to the login route.
	pub(crate) async fn end_session(&self, reason: &dyn Display) {
		if let Err(e) = self.session.clear().await {
			obs::log_clear_failure(&e);
		}

		self.refresh_metrics.record_logout();
		obs::log_logout(reason);
		self.navigator.navigate(&self.config.login_route);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		config::GatewayConfig,
		http::TransportFuture,
		nav::RecordingNavigator,
		store::{
			ACCESS_TOKEN_KEY, MemoryStore, REFRESH_TOKEN_KEY, SessionStore, StoreError, StoreFuture,
		},
	};

	struct Unreachable;
	impl HttpTransport for Unreachable {
		fn execute(&self, _: OutboundRequest) -> TransportFuture<'_> {
			Box::pin(async { Ok(ApiResponse::new(503, Vec::new())) })
		}
	}

	struct LockedAccessStore(MemoryStore);
	impl SessionStore for LockedAccessStore {
		fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
			self.0.get(key)
		}

		fn set<'a>(&'a self, key: &'a str, value: String) -> StoreFuture<'a, ()> {
			self.0.set(key, value)
		}

		fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
			if key == ACCESS_TOKEN_KEY {
				return Box::pin(async { Err(StoreError::Backend { message: "locked".into() }) });
			}

			self.0.remove(key)
		}
	}

	#[tokio::test]
	async fn logout_still_redirects_when_the_store_cannot_be_cleared() {
		let backend =
			MemoryStore::with_entries([(ACCESS_TOKEN_KEY, "A"), (REFRESH_TOKEN_KEY, "R")]);
		let navigator = RecordingNavigator::default();
		let gateway = Gateway::<Unreachable>::with_transport(
			GatewayConfig::parse("http://localhost:8000/api/v1").expect("Config should parse."),
			Arc::new(LockedAccessStore(backend.clone())),
			Unreachable,
		)
		.with_navigator(navigator.clone());

		gateway.end_session(&"refresh rejected").await;

		assert_eq!(backend.peek(REFRESH_TOKEN_KEY), None);
		assert_eq!(navigator.visited(), vec!["/login".to_owned()]);
		assert_eq!(gateway.refresh_metrics.logouts(), 1);
		assert!(!gateway.refresh_session().await.expect("No refresh token should be a no-op."));
	}

	#[tokio::test]
	async fn only_the_first_joiner_leads() {
		let coordinator = RefreshCoordinator::default();
		let RefreshTicket::Leader(lease) = coordinator.join() else {
			panic!("First joiner should lead the refresh.");
		};
		let RefreshTicket::Waiter(first) = coordinator.join() else {
			panic!("Second joiner should wait.");
		};
		let RefreshTicket::Waiter(second) = coordinator.join() else {
			panic!("Third joiner should wait.");
		};

		assert!(coordinator.is_refreshing());
		assert_eq!(lease.settle(Ok(TokenSecret::new("A2"))), 2);
		assert!(!coordinator.is_refreshing());

		for waiter in [first, second] {
			let token = waiter
				.await
				.expect("Waiter should receive an outcome.")
				.expect("Outcome should carry the new token.");

			assert_eq!(token.expose(), "A2");
		}
	}

	#[tokio::test]
	async fn dropped_lease_rejects_waiters_and_reopens_the_gate() {
		let coordinator = RefreshCoordinator::default();
		let lease = coordinator.join();
		let RefreshTicket::Waiter(waiter) = coordinator.join() else {
			panic!("Second joiner should wait.");
		};

		drop(lease);

		let outcome = waiter.await.expect("Waiter should receive an outcome.");

		assert!(matches!(outcome, Err(ref e) if matches!(**e, Error::RefreshAbandoned)));
		assert!(matches!(coordinator.join(), RefreshTicket::Leader(_)));
	}

	#[tokio::test]
	async fn settle_delivers_the_shared_failure_to_every_waiter() {
		let coordinator = RefreshCoordinator::default();
		let RefreshTicket::Leader(lease) = coordinator.join() else {
			panic!("First joiner should lead the refresh.");
		};
		let waiters = (0..4)
			.map(|_| match coordinator.join() {
				RefreshTicket::Waiter(rx) => rx,
				RefreshTicket::Leader(_) => panic!("Only one leader may exist."),
			})
			.collect::<Vec<_>>();
		let failure = Arc::new(Error::from(ConfigError::MissingRefreshToken));

		lease.settle(Err(failure.clone()));

		for waiter in waiters {
			let outcome = waiter.await.expect("Waiter should receive an outcome.");
			let err = outcome.expect_err("Waiters should share the refresh failure.");

			assert!(Arc::ptr_eq(&err, &failure));
		}
	}
}
