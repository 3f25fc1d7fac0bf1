//! Caller-facing request model consumed by [`Gateway::send`](crate::Gateway::send).

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::GatewayConfig,
	error::ConfigError,
	http::{Method, OutboundRequest},
};

/// Request body variants supported by the API.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestBody {
	/// No body.
	#[default]
	Empty,
	/// JSON document sent as `application/json`.
	Json(serde_json::Value),
	/// Key/value pairs sent as `application/x-www-form-urlencoded`.
	Form(Vec<(String, String)>),
}
impl RequestBody {
	fn content_type(&self) -> Option<&'static str> {
		match self {
			Self::Empty => None,
			Self::Json(_) => Some("application/json"),
			Self::Form(_) => Some("application/x-www-form-urlencoded"),
		}
	}

	fn encode(&self) -> Result<Option<Vec<u8>>, ConfigError> {
		match self {
			Self::Empty => Ok(None),
			Self::Json(value) => Ok(Some(serde_json::to_vec(value)?)),
			Self::Form(pairs) => {
				let encoded = form_urlencoded::Serializer::new(String::new())
					.extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
					.finish();

				Ok(Some(encoded.into_bytes()))
			},
		}
	}
}

/// API request addressed by path relative to the configured base URL.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Path relative to the base URL, starting with `/`.
	pub path: String,
	/// Query pairs appended in order.
	pub query: Vec<(String, String)>,
	/// Extra headers keyed by lower-cased name.
	pub headers: BTreeMap<String, String>,
	/// Request body.
	pub body: RequestBody,
	retried: bool,
}
impl ApiRequest {
	/// Creates a request without query, headers, or body.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			headers: BTreeMap::new(),
			body: RequestBody::Empty,
			retried: false,
		}
	}

	/// `GET path`.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// `POST path`.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// `PUT path`.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	/// `PATCH path`.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::Patch, path)
	}

	/// `DELETE path`.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	/// Appends a query pair.
	pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.query.push((key.into(), value.to_string()));

		self
	}

	/// Sets a header. An `Authorization` header is replaced by the session credential when one
	/// is available.
	pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
		self.headers.insert(name.to_ascii_lowercase(), value.into());

		self
	}

	/// Sets a JSON body.
	pub fn json(mut self, body: serde_json::Value) -> Self {
		self.body = RequestBody::Json(body);

		self
	}

	/// Serializes `body` into a JSON body.
	pub fn try_json<B>(self, body: &B) -> Result<Self, ConfigError>
	where
		B: ?Sized + Serialize,
	{
		Ok(self.json(serde_json::to_value(body)?))
	}

	/// Sets a form-encoded body.
	pub fn form<I, K, V>(mut self, pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let pairs = pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();

		self.body = RequestBody::Form(pairs);

		self
	}

	/// Marks the request as already retried; a `401` on it is passed through unchanged.
	pub fn retried(mut self) -> Self {
		self.retried = true;

		self
	}

	/// Returns `true` once the request has been replayed (or explicitly marked retried).
	pub fn is_retry(&self) -> bool {
		self.retried
	}

	/// Resolves the request against `config`, attaching `credential` as a bearer token.
	pub fn to_outbound(
		&self,
		config: &GatewayConfig,
		credential: Option<&TokenSecret>,
	) -> Result<OutboundRequest, ConfigError> {
		let url = config.endpoint(&self.path, &self.query)?;
		let mut outbound = OutboundRequest::new(self.method, url);

		if let Some(content_type) = self.body.content_type() {
			outbound = outbound.header("content-type", content_type);
		}

		outbound.headers.extend(self.headers.iter().map(|(k, v)| (k.clone(), v.clone())));

		if let Some(credential) = credential {
			outbound = outbound.header("authorization", credential.bearer());
		}
		if let Some(body) = self.body.encode()? {
			outbound = outbound.body(body);
		}

		Ok(outbound)
	}
}
