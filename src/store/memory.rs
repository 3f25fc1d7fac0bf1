//! Thread-safe in-memory [`SessionStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{SessionStore, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<String, String>>>;

/// Thread-safe storage backend that keeps values in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Builds a store pre-populated with the provided entries.
	pub fn with_entries<I, K, V>(entries: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let map = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();

		Self(Arc::new(RwLock::new(map)))
	}

	/// Returns the value stored under `key` without going through the async contract.
	pub fn peek(&self, key: &str) -> Option<String> {
		self.0.read().get(key).cloned()
	}

	/// Returns the number of stored keys.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no keys are stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl SessionStore for MemoryStore {
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
		let value = self.peek(key);

		Box::pin(async move { Ok(value) })
	}

	fn set<'a>(&'a self, key: &'a str, value: String) -> StoreFuture<'a, ()> {
		self.0.write().insert(key.to_owned(), value);

		Box::pin(async move { Ok::<_, StoreError>(()) })
	}

	fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
		self.0.write().remove(key);

		Box::pin(async move { Ok::<_, StoreError>(()) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn set_get_remove_follow_last_write_wins() {
		let store = MemoryStore::default();

		store.set("auth_token", "A".into()).await.expect("First write should succeed.");
		store.set("auth_token", "A2".into()).await.expect("Second write should succeed.");

		assert_eq!(
			store.get("auth_token").await.expect("Read should succeed."),
			Some("A2".to_owned())
		);

		store.remove("auth_token").await.expect("Remove should succeed.");
		store.remove("auth_token").await.expect("Removing an absent key should succeed.");

		assert!(store.is_empty());
	}
}
