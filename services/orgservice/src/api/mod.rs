//! Organization service HTTP API module.
//!
//! # Purpose
//! Exposes the route handler modules, the wire types and the mapping from
//! store failures to HTTP errors.
pub mod convert;
pub mod domains;
pub mod error;
pub mod metadata;
pub mod openapi;
pub mod organizations;
pub mod policies;
pub mod system;
pub mod types;
pub mod users;
