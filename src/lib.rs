//! watchany - browse movie and TV catalogs and find where they stream
//!
//! A thin client for The Movie Database API: typed requests, a unified item
//! model for movies and shows, and memoized reference data.
//!
//! # Modules
//!
//! - `models` - Items, reference data and provider availability
//! - `api` - Endpoint catalog and the TMDB client
//! - `cache` - Single-flight caches for configuration, genres and regions
//! - `home` - Landing feed sections
//! - `config` - Config file and access token lookup
//! - `cli` / `commands` - Command-line front-end

pub mod models;
pub mod api;
pub mod cache;
pub mod home;
pub mod config;
pub mod cli;
pub mod commands;

// Re-export commonly used types
pub use models::{
    Availability, ImageConfig, Item, ItemList, MediaKind, MediaType, NamedId, Provider,
    ProviderOffers, Region, WatchProviders,
};

pub use api::{Endpoint, TmdbClient, TmdbError};
pub use cache::{Memo, ReferenceCache, SharedError};
pub use config::Config;
