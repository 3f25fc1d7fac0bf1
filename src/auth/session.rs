//! Explicit session object over durable storage.
//!
//! [`Session`] is the only reader and writer of the persisted credential pair. The gateway
//! owns one and hands clones to callers that need to inspect or seed credentials, which keeps
//! multi-session setups (one gateway per session) free of ambient global state.

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret},
	store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SessionStore, StoreError},
};

/// Credential pair persisted in a [`SessionStore`] plus the default outbound credential.
#[derive(Clone)]
pub struct Session {
	store: Arc<dyn SessionStore>,
	default_credential: Arc<RwLock<Option<TokenSecret>>>,
}
impl Session {
	/// Creates a session backed by the provided store.
	pub fn new(store: Arc<dyn SessionStore>) -> Self {
		Self { store, default_credential: Default::default() }
	}

	/// Underlying durable store.
	pub fn store(&self) -> &Arc<dyn SessionStore> {
		&self.store
	}

	/// Reads the stored access token. Empty values count as absent.
	pub async fn access_token(&self) -> Result<Option<TokenSecret>, StoreError> {
		self.read(ACCESS_TOKEN_KEY).await
	}

	/// Reads the stored refresh token. Empty values count as absent.
	pub async fn refresh_token(&self) -> Result<Option<TokenSecret>, StoreError> {
		self.read(REFRESH_TOKEN_KEY).await
	}

	/// Credential to attach to the next outbound request.
	///
	/// The stored access token wins; the in-memory default set by the last refresh is only
	/// used when storage holds none.
	pub async fn outbound_credential(&self) -> Result<Option<TokenSecret>, StoreError> {
		match self.access_token().await? {
			Some(token) => Ok(Some(token)),
			None => Ok(self.default_credential()),
		}
	}

	/// Default credential installed by the most recent refresh, if any.
	pub fn default_credential(&self) -> Option<TokenSecret> {
		self.default_credential.read().clone()
	}

	/// Persists both tokens and installs the new access token as the default credential.
	pub async fn persist(&self, pair: &TokenPair) -> Result<(), StoreError> {
		self.store.set(ACCESS_TOKEN_KEY, pair.access_token.expose().to_owned()).await?;
		self.store.set(REFRESH_TOKEN_KEY, pair.refresh_token.expose().to_owned()).await?;

		*self.default_credential.write() = Some(pair.access_token.clone());

		Ok(())
	}

	/// Removes both tokens and the default credential.
	///
	/// Both removals are always attempted; the first failure is returned.
	pub async fn clear(&self) -> Result<(), StoreError> {
		self.default_credential.write().take();

		let access = self.store.remove(ACCESS_TOKEN_KEY).await;
		let refresh = self.store.remove(REFRESH_TOKEN_KEY).await;

		access.and(refresh)
	}

	/// Returns `true` when an access token is stored.
	pub async fn is_authenticated(&self) -> Result<bool, StoreError> {
		Ok(self.access_token().await?.is_some())
	}

	async fn read(&self, key: &str) -> Result<Option<TokenSecret>, StoreError> {
		let value = self.store.get(key).await?;

		Ok(value.filter(|v| !v.is_empty()).map(TokenSecret::new))
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("default_credential_set", &self.default_credential.read().is_some())
			.finish()
	}
}
