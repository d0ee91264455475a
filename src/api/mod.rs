//! API client for the catalog service
//!
//! - request: endpoint paths and query items
//! - tmdb: authenticated client and typed operations

pub mod request;
pub mod tmdb;

pub use request::Endpoint;
pub use tmdb::{TmdbClient, TmdbError};
