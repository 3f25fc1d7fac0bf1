//! Gateway configuration: API location, authentication routes, and refresh bounds.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Endpoints and policies used by [`Gateway`](crate::Gateway).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
	/// API base URL; request paths are appended to it verbatim.
	pub base_url: Url,
	/// Path of the token-refresh endpoint, relative to `base_url`.
	pub refresh_path: String,
	/// Marker identifying authentication routes; `401`s on such paths are never recovered.
	pub auth_route_marker: String,
	/// Client route the navigator is sent to on terminal authentication failures.
	pub login_route: String,
	/// Upper bound for a single refresh call. [`Duration::ZERO`] disables the bound.
	pub refresh_timeout: Duration,
}
impl GatewayConfig {
	/// Environment variable consulted by [`GatewayConfig::from_env`].
	pub const API_URL_ENV: &'static str = "AUTHGATE_API_URL";
	/// Base URL used when [`Self::API_URL_ENV`] is unset.
	pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000/api/v1";
	/// Default refresh endpoint path.
	pub const DEFAULT_REFRESH_PATH: &'static str = "/auth/refresh";
	/// Default authentication-route marker.
	pub const DEFAULT_AUTH_ROUTE_MARKER: &'static str = "/auth/";
	/// Default login route.
	pub const DEFAULT_LOGIN_ROUTE: &'static str = "/login";
	/// Default refresh bound.
	pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::seconds(30);

	/// Creates a configuration with default routes for the provided base URL.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			refresh_path: Self::DEFAULT_REFRESH_PATH.into(),
			auth_route_marker: Self::DEFAULT_AUTH_ROUTE_MARKER.into(),
			login_route: Self::DEFAULT_LOGIN_ROUTE.into(),
			refresh_timeout: Self::DEFAULT_REFRESH_TIMEOUT,
		}
	}

	/// Parses `base_url` and validates the resulting configuration.
	pub fn parse(base_url: &str) -> Result<Self, ConfigError> {
		let config = Self::new(Url::parse(base_url)?);

		config.validate()?;

		Ok(config)
	}

	/// Reads the base URL from [`Self::API_URL_ENV`], falling back to
	/// [`Self::DEFAULT_BASE_URL`].
	pub fn from_env() -> Result<Self, ConfigError> {
		let base_url = env::var(Self::API_URL_ENV)
			.ok()
			.filter(|v| !v.trim().is_empty())
			.unwrap_or_else(|| Self::DEFAULT_BASE_URL.into());

		Self::parse(base_url.trim())
	}

	/// Overrides the refresh endpoint path.
	pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Overrides the authentication-route marker.
	pub fn with_auth_route_marker(mut self, marker: impl Into<String>) -> Self {
		self.auth_route_marker = marker.into();

		self
	}

	/// Overrides the login route.
	pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
		self.login_route = route.into();

		self
	}

	/// Overrides the refresh bound; negative values are clamped to zero (unbounded).
	pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
		self.refresh_timeout = if timeout.is_negative() { Duration::ZERO } else { timeout };

		self
	}

	/// Checks the base URL scheme and the shape of every configured path.
	pub fn validate(&self) -> Result<(), ConfigError> {
		match self.base_url.scheme() {
			"http" | "https" => {},
			scheme => return Err(ConfigError::UnsupportedScheme { scheme: scheme.into() }),
		}

		if self.base_url.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase { url: self.base_url.to_string() });
		}

		for path in [&self.refresh_path, &self.login_route] {
			if !path.starts_with('/') {
				return Err(ConfigError::InvalidPath { path: path.clone() });
			}
		}

		Ok(())
	}

	/// Joins `path` (and optional query pairs) onto the base URL.
	///
	/// Unlike [`Url::join`], the base path is always kept: `/api/v1` + `/coupons/` yields
	/// `/api/v1/coupons/`.
	pub fn endpoint(&self, path: &str, query: &[(String, String)]) -> Result<Url, ConfigError> {
		if !path.starts_with('/') {
			return Err(ConfigError::InvalidPath { path: path.into() });
		}

		let base = self.base_url.as_str().trim_end_matches('/');
		let mut url = Url::parse(&format!("{base}{path}"))?;

		if !query.is_empty() {
			url.query_pairs_mut()
				.extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
		}

		Ok(url)
	}

	/// Returns `true` when `path` targets an authentication route.
	pub fn is_auth_route(&self, path: &str) -> bool {
		!self.auth_route_marker.is_empty() && path.contains(self.auth_route_marker.as_str())
	}

	/// Refresh bound as a std duration, or `None` when unbounded.
	pub(crate) fn refresh_bound(&self) -> Option<std::time::Duration> {
		self.refresh_timeout.is_positive().then(|| self.refresh_timeout.unsigned_abs())
	}
}
