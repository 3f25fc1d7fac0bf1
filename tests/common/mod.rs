//! Shared fixtures for the gateway integration suites.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use httpmock::MockServer;
// self
use authgate::{
	GatewayConfig, ReqwestGateway,
	nav::RecordingNavigator,
	store::{MemoryStore, SessionStore},
};

/// Base path every mocked endpoint lives under.
pub const API_PREFIX: &str = "/api/v1";

/// Gateway wired to a mock server together with handles on its store and navigator.
pub struct Harness {
	pub gateway: ReqwestGateway,
	pub store: MemoryStore,
	pub navigator: RecordingNavigator,
}

/// Prefixes `path` with [`API_PREFIX`].
pub fn api_path(path: &str) -> String {
	format!("{API_PREFIX}{path}")
}

/// Config pointing at the mock server's API prefix.
pub fn config(server: &MockServer) -> GatewayConfig {
	GatewayConfig::parse(&server.url(API_PREFIX)).expect("Mock server URL should parse.")
}

/// Builds a gateway whose store already holds `entries`.
pub fn harness_with(config: GatewayConfig, entries: &[(&str, &str)]) -> Harness {
	let store = MemoryStore::with_entries(entries.iter().copied());
	let navigator = RecordingNavigator::default();
	let gateway = ReqwestGateway::new(config, Arc::new(store.clone()) as Arc<dyn SessionStore>)
		.with_navigator(navigator.clone());

	Harness { gateway, store, navigator }
}

/// Builds a gateway signed in with access token `A` and refresh token `R`.
pub fn signed_in(server: &MockServer) -> Harness {
	harness_with(config(server), &[("auth_token", "A"), ("refresh_token", "R")])
}
