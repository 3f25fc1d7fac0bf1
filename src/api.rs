//! Typed calls against the match-analysis API, all routed through [`Gateway`](crate::Gateway).
//!
//! These are thin wrappers: they build an [`ApiRequest`](crate::ApiRequest), send it through
//! the gateway's recovery protocol, and decode the JSON body. The gateway itself never
//! interprets these shapes.

pub mod analyze;
pub mod auth;
pub mod chat;
pub mod coupons;
pub mod subscription;

pub use analyze::*;
pub use auth::*;
pub use chat::*;
pub use coupons::*;
pub use subscription::*;
