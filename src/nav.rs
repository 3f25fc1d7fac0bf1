//! Client navigation hook invoked on terminal authentication failures.

// self
use crate::_prelude::*;

/// Receives hard redirects issued by the gateway (e.g. to the login route after logout).
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Navigates the client to `route`.
	fn navigate(&self, route: &str);
}
impl<F> Navigator for F
where
	F: Fn(&str) + Send + Sync,
{
	fn navigate(&self, route: &str) {
		self(route)
	}
}

/// Navigator that only records the redirect in the log; the default for headless clients.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNavigator;
impl Navigator for LogNavigator {
	fn navigate(&self, route: &str) {
		#[cfg(feature = "tracing")]
		tracing::warn!(route, "Session ended; client must re-authenticate.");
		#[cfg(not(feature = "tracing"))]
		let _ = route;
	}
}

/// Navigator that keeps every route it was sent to, in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingNavigator(Arc<Mutex<Vec<String>>>);
impl RecordingNavigator {
	/// Routes visited so far.
	pub fn visited(&self) -> Vec<String> {
		self.0.lock().clone()
	}
}
impl Navigator for RecordingNavigator {
	fn navigate(&self, route: &str) {
		self.0.lock().push(route.to_owned());
	}
}
