//! TMDB (The Movie Database) API client
//!
//! Typed GET wrappers for the catalog, reference and provider endpoints.
//! API docs: https://developer.themoviedb.org/docs

use anyhow::Result;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::request::Endpoint;
use crate::config::Config;
use crate::models::{
    merge_providers, Configuration, GenreList, IdPage, ItemList, MediaKind, NamedId, Provider,
    ProviderList, Region, RegionList, WatchProviders,
};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Access token rejected (401)")]
    Unauthorized,

    #[error("Rate limited (429), retries exhausted")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// TMDB API client
#[derive(Debug, Clone)]
pub struct TmdbClient {
    access_token: String,
    base_url: String,
    language: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl TmdbClient {
    /// Create a new TMDB client with the given read access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            client: build_http_client(DEFAULT_TIMEOUT),
            max_retries: 3,
        }
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = config.access_token()?;
        let mut client = Self::with_base_url(token, config.base_url());
        client.language = config.language().to_string();
        client.client = build_http_client(config.timeout());
        Ok(client)
    }

    /// Override the response language (e.g. "de-DE")
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Make an authenticated GET request with retry logic for rate limits
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &Endpoint) -> Result<T> {
        let url = format!(
            "{}{}",
            self.base_url,
            endpoint.to_url_suffix(&self.language)
        );
        let mut retries = 0;

        loop {
            debug!(%url, "GET");
            let response = self
                .client
                .get(&url)
                .header("Authorization", format!("Bearer {}", self.access_token))
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(TmdbError::from)?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.text().await.map_err(TmdbError::from)?;
                    let parsed: T = serde_json::from_str(&body).map_err(|e| {
                        TmdbError::InvalidResponse(format!("JSON parse error: {}", e))
                    })?;
                    return Ok(parsed);
                }
                StatusCode::UNAUTHORIZED => {
                    return Err(TmdbError::Unauthorized.into());
                }
                StatusCode::NOT_FOUND => {
                    return Err(TmdbError::NotFound.into());
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    retries += 1;
                    if retries >= self.max_retries {
                        return Err(TmdbError::RateLimited.into());
                    }

                    // Get Retry-After header or default to exponential backoff
                    let wait_secs = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(2u64.pow(retries));

                    warn!(retry = retries, wait_secs, "rate limited, backing off");
                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                    continue;
                }
                status => {
                    return Err(TmdbError::ServerError(status.as_u16()).into());
                }
            }
        }
    }

    async fn list(&self, endpoint: Endpoint, kind: Option<MediaKind>) -> Result<ItemList> {
        let list: ItemList = self.get(&endpoint).await?;
        Ok(match kind {
            Some(kind) => list.stamp_kind(kind),
            None => list,
        })
    }

    // =========================================================================
    // Reference data
    // =========================================================================

    /// Image hosting configuration
    pub async fn configuration(&self) -> Result<Configuration> {
        self.get(&Endpoint::Configuration).await
    }

    /// Genre id/name pairs for one catalog
    pub async fn genres(&self, kind: MediaKind) -> Result<Vec<NamedId>> {
        let response: GenreList = self.get(&Endpoint::Genres(kind)).await?;
        Ok(response.genres)
    }

    /// Countries with provider data
    pub async fn regions(&self) -> Result<Vec<Region>> {
        let response: RegionList = self.get(&Endpoint::Regions).await?;
        Ok(response.results)
    }

    // =========================================================================
    // Providers
    // =========================================================================

    /// All providers known for one catalog
    pub async fn provider_catalog(&self, kind: MediaKind) -> Result<Vec<Provider>> {
        let response: ProviderList = self.get(&Endpoint::ProviderCatalog(kind)).await?;
        Ok(response.results)
    }

    /// Movie and TV provider catalogs merged by provider id
    pub async fn providers(&self) -> Result<Vec<Provider>> {
        let movie = self.provider_catalog(MediaKind::Movie).await?;
        let tv = self.provider_catalog(MediaKind::Tv).await?;
        Ok(merge_providers(movie, tv))
    }

    /// Per-country offers for one movie or show
    pub async fn watch_providers(&self, kind: MediaKind, id: u64) -> Result<WatchProviders> {
        self.get(&Endpoint::WatchProviders(kind, id)).await
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Search movies, shows and people
    pub async fn search(&self, query: &str) -> Result<ItemList> {
        self.list(Endpoint::Search(query.to_string()), None).await
    }

    /// Search keywords by text
    pub async fn search_keyword(&self, query: &str) -> Result<Vec<NamedId>> {
        let response: IdPage = self.get(&Endpoint::SearchKeyword(query.to_string())).await?;
        Ok(response.results)
    }

    /// Ids of keywords matching `query`, or just the best match
    pub async fn keyword_ids(&self, query: &str, first_only: bool) -> Result<Vec<u64>> {
        let keywords = self.search_keyword(query).await?;
        let ids = keywords.into_iter().map(|k| k.id);
        Ok(if first_only {
            ids.take(1).collect()
        } else {
            ids.collect()
        })
    }

    // =========================================================================
    // Browsing lists
    // =========================================================================

    /// Today's trending titles
    pub async fn trending(&self, kind: MediaKind) -> Result<ItemList> {
        self.list(Endpoint::Trending(kind), Some(kind)).await
    }

    /// Most popular titles, optionally restricted to titles tagged with
    /// keywords matching `keywords`
    pub async fn discover(&self, kind: MediaKind, keywords: Option<&str>) -> Result<ItemList> {
        let keyword_ids = match keywords {
            Some(text) => {
                let ids = self.keyword_ids(text, false).await?;
                if ids.is_empty() {
                    debug!(keywords = text, "no matching keywords, discovering unfiltered");
                }
                Some(ids)
            }
            None => None,
        };
        self.list(Endpoint::Discover(kind, keyword_ids), Some(kind))
            .await
    }

    pub async fn top_rated(&self, kind: MediaKind) -> Result<ItemList> {
        self.list(Endpoint::TopRated(kind), Some(kind)).await
    }

    pub async fn popular(&self, kind: MediaKind) -> Result<ItemList> {
        self.list(Endpoint::Popular(kind), Some(kind)).await
    }

    /// Movies about to be released
    pub async fn upcoming(&self) -> Result<ItemList> {
        self.list(Endpoint::Upcoming, Some(MediaKind::Movie)).await
    }

    /// Movies currently in theatres
    pub async fn now_playing(&self) -> Result<ItemList> {
        self.list(Endpoint::NowPlaying, Some(MediaKind::Movie)).await
    }
}

fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}
