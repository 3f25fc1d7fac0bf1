//! Access/refresh credential pair as issued by the login and refresh endpoints.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Credential pair returned by `/auth/login` and `/auth/refresh`.
///
/// Extra response fields (such as `token_type`) are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Short-lived bearer credential attached to every request.
	pub access_token: TokenSecret,
	/// Longer-lived credential exchanged for a new pair.
	pub refresh_token: TokenSecret,
}
impl TokenPair {
	/// Builds a pair from raw token strings.
	pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: TokenSecret::new(refresh_token),
		}
	}
}

/// Body posted to the refresh endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct RefreshTokenRequest<'a> {
	/// Refresh token being exchanged.
	pub refresh_token: &'a TokenSecret,
}
