//! Token secrets and the access/refresh credential pair.

pub mod pair;
pub mod secret;
