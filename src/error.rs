//! Gateway-level error types shared across transports, stores, and API calls.

// self
use crate::_prelude::*;

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Backend answered with a non-2xx status.
	#[error(transparent)]
	Http(#[from] HttpError),

	/// Token refresh failed; every request waiting on it receives the same cause.
	#[error("Token refresh failed: {source}")]
	RefreshFailed {
		/// Shared refresh failure.
		#[source]
		source: Arc<Error>,
	},
	/// The task performing the refresh was dropped before it settled.
	#[error("Token refresh was abandoned before it settled.")]
	RefreshAbandoned,
}
impl Error {
	/// Returns the HTTP status carried by this error, looking through shared refresh failures.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Http(e) => Some(e.status),
			Self::Decode(DecodeError::Json { status, .. }) => *status,
			Self::RefreshFailed { source } => source.status(),
			_ => None,
		}
	}

	/// Returns `true` when the backend rejected the call with `401 Unauthorized`.
	pub fn is_unauthorized(&self) -> bool {
		matches!(self, Self::Http(e) if e.is_unauthorized())
	}
}

/// Configuration and validation failures raised by the gateway.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Base URL or joined endpoint cannot be parsed.
	#[error("API URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than `http`/`https`.
	#[error("API URL must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Offending scheme.
		scheme: String,
	},
	/// Base URL cannot carry a path (e.g. `mailto:`).
	#[error("API URL `{url}` cannot be used as a base.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// Route or endpoint path does not start with `/`.
	#[error("Path `{path}` must start with `/`.")]
	InvalidPath {
		/// Offending path.
		path: String,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Body(#[from] serde_json::Error),

	/// Durable storage holds no refresh token.
	#[error("Session storage is missing a refresh token.")]
	MissingRefreshToken,
}
impl From<url::ParseError> for ConfigError {
	fn from(source: url::ParseError) -> Self {
		Self::InvalidUrl { source }
	}
}

/// Transport-level failures: no response arrived, or it arrived too late.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Call did not settle within the configured bound.
	#[error("API call timed out after {after}.")]
	Timeout {
		/// Bound that elapsed.
		after: Duration,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Response decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Backend responded with JSON that does not match the expected shape.
	#[error("API returned malformed JSON.")]
	Json {
		/// Structured parsing failure naming the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Non-2xx response surfaced to callers unchanged.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("API responded with status {status}: {detail}.")]
pub struct HttpError {
	/// HTTP status code.
	pub status: u16,
	/// Backend `detail` message, or a generic `HTTP <status>` label.
	pub detail: String,
	/// Retry-After hint from upstream, if supplied.
	pub retry_after: Option<Duration>,
}
impl HttpError {
	/// Returns `true` for `401 Unauthorized`.
	pub fn is_unauthorized(&self) -> bool {
		self.status == 401
	}
}
