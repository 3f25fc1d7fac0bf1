//! Transport primitives for API calls.
//!
//! The gateway depends on [`HttpTransport`] only, so downstream crates can plug in their own
//! HTTP stack (or a scripted fake in tests). Requests arrive fully resolved: absolute URL,
//! lower-cased header names, serialized body. Responses are buffered into an [`ApiResponse`]
//! before the gateway classifies them.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use time::format_description::well_known::Rfc2822;
// self
use crate::{
	_prelude::*,
	error::{DecodeError, HttpError, TransportError},
};

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing gateway requests.
///
/// Implementations must not interpret status codes: every response, including `401`, is
/// returned as `Ok` so the gateway can run its recovery protocol. Only failures that produce
/// no response at all (DNS, TCP, TLS) map to [`TransportError`].
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and buffers the full response.
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_>;
}

/// HTTP methods used by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl Method {
	/// Returns the canonical upper-case method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<Method> for reqwest::Method {
	fn from(method: Method) -> Self {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Patch => reqwest::Method::PATCH,
			Method::Delete => reqwest::Method::DELETE,
		}
	}
}

/// Fully resolved request handed to an [`HttpTransport`].
#[derive(Clone, Debug)]
pub struct OutboundRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute request URL including query.
	pub url: Url,
	/// Header map keyed by lower-cased name.
	pub headers: BTreeMap<String, String>,
	/// Serialized body, if any.
	pub body: Option<Vec<u8>>,
}
impl OutboundRequest {
	/// Creates a request without headers or body.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: BTreeMap::new(), body: None }
	}

	/// Sets a header, replacing any previous value for the same (case-insensitive) name.
	pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
		self.headers.insert(name.to_ascii_lowercase(), value.into());

		self
	}

	/// Sets the body.
	pub fn body(mut self, body: Vec<u8>) -> Self {
		self.body = Some(body);

		self
	}

	/// Returns the `Authorization` header, if set.
	pub fn authorization(&self) -> Option<&str> {
		self.headers.get("authorization").map(String::as_str)
	}
}

/// Buffered HTTP response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Header map keyed by lower-cased name.
	pub headers: BTreeMap<String, String>,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Builds a response from a status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: BTreeMap::new(), body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes the body as JSON, reporting the failing field path on mismatch.
	pub fn json<T>(&self) -> Result<T, DecodeError>
	where
		T: DeserializeOwned,
	{
		let body: &[u8] = if self.body.is_empty() { b"null" } else { &self.body };
		let mut de = serde_json::Deserializer::from_slice(body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| DecodeError::Json { source, status: Some(self.status) })
	}

	/// Retry-After hint expressed as a relative duration.
	pub fn retry_after(&self) -> Option<Duration> {
		parse_retry_after(self.headers.get("retry-after")?)
	}

	/// Backend-supplied failure detail (`{"detail": ...}`), if any.
	pub fn detail(&self) -> Option<String> {
		let value = serde_json::from_slice::<serde_json::Value>(&self.body).ok()?;

		match value.get("detail")? {
			serde_json::Value::String(s) => Some(s.clone()),
			serde_json::Value::Null => None,
			other => Some(other.to_string()),
		}
	}

	/// Converts a non-2xx response into the error surfaced to callers.
	pub fn to_error(&self) -> HttpError {
		HttpError {
			status: self.status,
			detail: self.detail().unwrap_or_else(|| format!("HTTP {}", self.status)),
			retry_after: self.retry_after(),
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = client.request(request.method.into(), request.url);

			for (name, value) in &request.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|v| (name.as_str().to_owned(), v.to_owned()))
				})
				.collect();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, headers, body })
		})
	}
}

fn parse_retry_after(raw: &str) -> Option<Duration> {
	let raw = raw.trim();

	if let Ok(secs) = raw.parse::<u32>() {
		return Some(Duration::seconds(i64::from(secs)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn error_prefers_backend_detail_and_falls_back_to_status() {
		let response = ApiResponse::new(403, "{\"detail\":\"Daily analysis limit reached\"}");

		assert_eq!(response.to_error().detail, "Daily analysis limit reached");
		assert_eq!(ApiResponse::new(502, "<html>bad gateway</html>").to_error().detail, "HTTP 502");

		let validation = ApiResponse::new(422, "{\"detail\":[{\"loc\":[\"body\",\"email\"]}]}");

		assert!(validation.to_error().detail.contains("email"));
	}

	#[test]
	fn retry_after_accepts_delta_seconds() {
		let mut response = ApiResponse::new(429, Vec::new());

		response.headers.insert("retry-after".into(), " 120 ".into());

		assert_eq!(response.retry_after(), Some(Duration::seconds(120)));

		response.headers.insert("retry-after".into(), "Wed, 21 Oct 2015 07:28:00 GMT".into());

		assert_eq!(response.retry_after(), None);
	}

	#[test]
	fn json_reports_failing_path() {
		#[derive(Debug, Deserialize)]
		struct Body {
			#[allow(dead_code)]
			access_token: String,
		}

		let err = ApiResponse::new(200, "{\"access_token\":7}")
			.json::<Body>()
			.expect_err("Mismatched types should fail to decode.");
		let DecodeError::Json { source, status } = err;

		assert_eq!(source.path().to_string(), "access_token");
		assert_eq!(status, Some(200));
	}

	#[test]
	fn outbound_headers_are_case_insensitive() {
		let url = Url::parse("http://localhost/api").expect("URL fixture should parse.");
		let request = OutboundRequest::new(Method::Get, url)
			.header("Authorization", "Bearer A")
			.header("authorization", "Bearer A2");

		assert_eq!(request.authorization(), Some("Bearer A2"));
		assert_eq!(request.headers.len(), 1);
	}
}
