//! Durable key-value storage contracts and built-in backends for session credentials.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::_prelude::*;

/// Key holding the current access token.
pub const ACCESS_TOKEN_KEY: &str = "auth_token";
/// Key holding the current refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Boxed future returned by [`SessionStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Durable string key-value storage backing a client session.
///
/// Absence of a key is a valid state meaning "logged out"; writes are last-write-wins.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Reads the value stored under `key`, if any.
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

	/// Stores `value` under `key`, replacing any previous value.
	fn set<'a>(&'a self, key: &'a str, value: String) -> StoreFuture<'a, ()>;

	/// Removes `key`; removing an absent key is not an error.
	fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
