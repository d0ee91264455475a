//! Process-lifetime caches for slowly changing reference data
//!
//! Configuration, genre names and region names are fetched at most once per
//! process. Concurrent lookups while a fetch is in flight wait for that fetch
//! instead of starting their own. Entries are never evicted.

use anyhow::Result;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, warn};

use crate::api::TmdbClient;
use crate::models::{ImageConfig, Item, MediaKind, NamedId, Region};

/// Genre id to genre name
pub type GenreMap = HashMap<u64, String>;

/// ISO 3166-1 code to English country name
pub type RegionMap = HashMap<String, String>;

/// A failed fetch, handed to every caller that waited on it
#[derive(Debug, Clone)]
pub struct SharedError(Arc<anyhow::Error>);

impl SharedError {
    /// The error the fetch returned
    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }
}

impl fmt::Display for SharedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl StdError for SharedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// Single-flight memoized value.
///
/// The first caller runs `fetch`; callers arriving while it runs wait for it
/// and share its result, success or failure. A failed fetch leaves the memo
/// empty so a call made after the failure tries again.
#[derive(Debug)]
pub struct Memo<T> {
    cell: OnceCell<Arc<T>>,
    /// Held for the duration of a fetch; remembers the last failure
    in_flight: Mutex<Option<Arc<anyhow::Error>>>,
    /// Number of failed fetches so far
    failures: AtomicU64,
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
            in_flight: Mutex::new(None),
            failures: AtomicU64::new(0),
        }
    }

    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.cell.get() {
            return Ok(Arc::clone(value));
        }

        let failures_seen = self.failures.load(Ordering::Acquire);
        let mut last_error = self.in_flight.lock().await;

        if let Some(value) = self.cell.get() {
            return Ok(Arc::clone(value));
        }
        // The fetch we waited on failed; report its error instead of refetching
        if self.failures.load(Ordering::Acquire) != failures_seen {
            if let Some(err) = last_error.as_ref() {
                return Err(SharedError(Arc::clone(err)).into());
            }
        }

        match fetch().await {
            Ok(value) => {
                *last_error = None;
                let value = Arc::new(value);
                let stored = self.cell.get_or_init(|| async move { value }).await;
                Ok(Arc::clone(stored))
            }
            Err(err) => {
                let err = Arc::new(err);
                *last_error = Some(Arc::clone(&err));
                self.failures.fetch_add(1, Ordering::AcqRel);
                Err(SharedError(err).into())
            }
        }
    }

    /// Cached value, if a fetch has completed
    pub fn get(&self) -> Option<Arc<T>> {
        self.cell.get().cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reference data lookups backed by a [`TmdbClient`]
#[derive(Debug)]
pub struct ReferenceCache {
    client: TmdbClient,
    config: Memo<ImageConfig>,
    movie_genres: Memo<GenreMap>,
    show_genres: Memo<GenreMap>,
    regions: Memo<RegionMap>,
}

impl ReferenceCache {
    pub fn new(client: TmdbClient) -> Self {
        Self {
            client,
            config: Memo::new(),
            movie_genres: Memo::new(),
            show_genres: Memo::new(),
            regions: Memo::new(),
        }
    }

    pub fn client(&self) -> &TmdbClient {
        &self.client
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Image hosting configuration
    pub async fn image_config(&self) -> Result<Arc<ImageConfig>> {
        self.config
            .get_or_fetch(move || async move {
                debug!("loading image configuration");
                Ok(self.client.configuration().await?.images)
            })
            .await
    }

    // =========================================================================
    // Genres
    // =========================================================================

    /// Genre map for one catalog
    pub async fn genres(&self, kind: MediaKind) -> Result<Arc<GenreMap>> {
        let memo = match kind {
            MediaKind::Movie => &self.movie_genres,
            MediaKind::Tv => &self.show_genres,
        };
        memo.get_or_fetch(move || async move {
            debug!(%kind, "loading genres");
            Ok(genre_map(self.client.genres(kind).await?))
        })
        .await
    }

    /// Name of one genre, `None` when the catalog has no such id
    pub async fn genre_name(&self, id: u64, kind: MediaKind) -> Result<Option<String>> {
        Ok(self.genres(kind).await?.get(&id).cloned())
    }

    /// Names for a list of genre ids, in input order, skipping unknown ids
    pub async fn genre_names(&self, ids: &[u64], kind: MediaKind) -> Result<Vec<String>> {
        let genres = self.genres(kind).await?;
        Ok(ids.iter().filter_map(|id| genres.get(id).cloned()).collect())
    }

    /// Genre names for an item, using the catalog the item belongs to
    pub async fn item_genres(&self, item: &Item) -> Result<Vec<String>> {
        match &item.genre_ids {
            Some(ids) => self.genre_names(ids, item.kind()).await,
            None => Ok(Vec::new()),
        }
    }

    /// Warm both genre maps. Failures are logged and left for the next lookup.
    pub async fn preload_genres(&self) {
        let (movie, tv) = tokio::join!(self.genres(MediaKind::Movie), self.genres(MediaKind::Tv));
        for (kind, result) in [(MediaKind::Movie, movie), (MediaKind::Tv, tv)] {
            if let Err(e) = result {
                warn!(%kind, error = %e, "failed to preload genres");
            }
        }
    }

    // =========================================================================
    // Regions
    // =========================================================================

    /// Region map for all countries with provider data
    pub async fn regions(&self) -> Result<Arc<RegionMap>> {
        self.regions
            .get_or_fetch(move || async move {
                debug!("loading regions");
                Ok(region_map(self.client.regions().await?))
            })
            .await
    }

    /// English name for a country code, or the code itself when unknown
    pub async fn region_name(&self, iso_code: &str) -> Result<String> {
        let regions = self.regions().await?;
        Ok(regions
            .get(iso_code)
            .cloned()
            .unwrap_or_else(|| iso_code.to_string()))
    }

    /// English names for several country codes, sorted
    pub async fn country_names(&self, iso_codes: &[String]) -> Result<Vec<String>> {
        let regions = self.regions().await?;
        let mut names: Vec<String> = iso_codes
            .iter()
            .map(|code| regions.get(code).cloned().unwrap_or_else(|| code.clone()))
            .collect();
        names.sort();
        Ok(names)
    }
}

fn genre_map(genres: Vec<NamedId>) -> GenreMap {
    genres.into_iter().map(|g| (g.id, g.name)).collect()
}

fn region_map(regions: Vec<Region>) -> RegionMap {
    regions
        .into_iter()
        .map(|r| (r.iso_3166_1, r.english_name))
        .collect()
}
