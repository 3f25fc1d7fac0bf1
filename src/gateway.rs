//! Authenticated request gateway.
//!
//! [`Gateway`] wraps every outbound API call: it attaches the stored bearer credential,
//! classifies the response, and recovers from `401 Unauthorized` by running a single
//! coordinated token refresh. Requests that fail while a refresh is in flight are queued and
//! replayed, in queue order, with the new access token once the refresh settles. A refresh that
//! cannot complete clears the session and sends the [`Navigator`] to the login route.

pub mod metrics;
pub mod request;

mod dispatch;
mod refresh;

pub use self::metrics::RefreshMetrics;
pub use request::*;

// self
use crate::{
	_prelude::*,
	auth::Session,
	config::GatewayConfig,
	gateway::refresh::RefreshCoordinator,
	http::HttpTransport,
	nav::{LogNavigator, Navigator},
	store::SessionStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = Gateway<ReqwestTransport>;

/// Authenticated request gateway for a single client session.
pub struct Gateway<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport used for every outbound request, including refresh calls.
	pub transport: Arc<T>,
	/// Shared counters for refresh outcomes, queued waiters, replays, and logouts.
	pub refresh_metrics: Arc<RefreshMetrics>,
	config: Arc<GatewayConfig>,
	session: Session,
	navigator: Arc<dyn Navigator>,
	refresh: Arc<RefreshCoordinator>,
}
impl<T> Gateway<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a gateway that reuses the caller-provided transport.
	///
	/// Terminal authentication failures are only logged until a navigator is attached with
	/// [`Gateway::with_navigator`].
	pub fn with_transport(
		config: GatewayConfig,
		store: Arc<dyn SessionStore>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			refresh_metrics: Default::default(),
			config: Arc::new(config),
			session: Session::new(store),
			navigator: Arc::new(LogNavigator),
			refresh: Default::default(),
		}
	}

	/// Sets the navigator that receives the login redirect on terminal failures.
	pub fn with_navigator(mut self, navigator: impl 'static + Navigator) -> Self {
		self.navigator = Arc::new(navigator);

		self
	}

	/// Active configuration.
	pub fn config(&self) -> &GatewayConfig {
		&self.config
	}

	/// Session whose credentials this gateway attaches and rotates.
	pub fn session(&self) -> &Session {
		&self.session
	}

	/// Returns `true` while a refresh call is in flight.
	pub fn is_refreshing(&self) -> bool {
		self.refresh.is_refreshing()
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestTransport> {
	/// Creates a gateway backed by a default reqwest client.
	pub fn new(config: GatewayConfig, store: Arc<dyn SessionStore>) -> Self {
		Self::with_transport(config, store, ReqwestTransport::default())
	}
}
impl<T> Clone for Gateway<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			config: self.config.clone(),
			session: self.session.clone(),
			navigator: self.navigator.clone(),
			refresh: self.refresh.clone(),
		}
	}
}
impl<T> Debug for Gateway<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("config", &self.config)
			.field("session", &self.session)
			.field("refreshing", &self.is_refreshing())
			.finish()
	}
}
