// self
use crate::{_prelude::*, http::Method, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by gateway calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind + stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("authgate.call", call = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a non-2xx response; invoked for every failure regardless of recovery.
pub fn log_http_failure(method: Method, path: &str, status: u16, detail: &str) {
	#[cfg(feature = "tracing")]
	{
		if status == 401 {
			tracing::debug!(%method, path, status, detail, "API call unauthorized.");
		} else {
			tracing::warn!(%method, path, status, detail, "API call failed.");
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, path, status, detail);
	}
}

/// Logs a refresh state transition.
pub fn log_refresh(event: &'static str, waiters: usize) {
	#[cfg(feature = "tracing")]
	tracing::debug!(event, waiters, "Token refresh state changed.");
	#[cfg(not(feature = "tracing"))]
	let _ = (event, waiters);
}

/// Logs a session store that could not be fully cleared during logout.
pub fn log_clear_failure(error: &dyn Display) {
	#[cfg(feature = "tracing")]
	tracing::error!(%error, "Failed to clear stored credentials during logout.");
	#[cfg(not(feature = "tracing"))]
	let _ = error;
}

/// Logs a terminal authentication failure that cleared the session.
pub fn log_logout(reason: &dyn Display) {
	#[cfg(feature = "tracing")]
	tracing::warn!(%reason, "Session ended; redirecting to login.");
	#[cfg(not(feature = "tracing"))]
	let _ = reason;
}
