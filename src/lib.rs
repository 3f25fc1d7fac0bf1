//! Authenticated request gateway for the match-analysis API.
//!
//! Requests carry the stored bearer token. An expired token triggers one shared refresh, and
//! requests that failed in the meantime are replayed in order once it settles.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod nav;
pub mod obs;
pub mod odds;
pub mod store;

pub use config::GatewayConfig;
pub use error::{Error, Result};
pub use gateway::{ApiRequest, Gateway};
#[cfg(feature = "reqwest")] pub use gateway::ReqwestGateway;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
