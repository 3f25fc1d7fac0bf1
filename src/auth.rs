//! Credential models and the explicit session object shared by the gateway.

pub mod session;
pub mod token;

pub use session::*;
pub use token::{pair::*, secret::*};
