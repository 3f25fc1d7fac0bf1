//! Counters describing how the gateway's recovery protocol has been exercised.

// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for refresh attempts and their side effects.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
	queued: AtomicU64,
	replays: AtomicU64,
	logouts: AtomicU64,
}
impl RefreshMetrics {
	/// Returns the number of refreshes started (one per single-flight leader).
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of refreshes that produced a new credential pair.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of refreshes that failed, including missing refresh tokens.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Returns the number of requests that waited on an in-flight refresh.
	pub fn queued(&self) -> u64 {
		self.queued.load(Ordering::Relaxed)
	}

	/// Returns the number of requests replayed with a rotated credential.
	pub fn replays(&self) -> u64 {
		self.replays.load(Ordering::Relaxed)
	}

	/// Returns the number of times the session was cleared by a terminal failure.
	pub fn logouts(&self) -> u64 {
		self.logouts.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_queued(&self) {
		self.queued.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_replay(&self) {
		self.replays.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_logout(&self) {
		self.logouts.fetch_add(1, Ordering::Relaxed);
	}
}
