//! CLI Command Handlers
//!
//! Implements all CLI commands on top of the API client and reference cache.
//! Each handler takes CLI args and Output, returns ExitCode.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

use crate::api::{TmdbClient, TmdbError};
use crate::cache::{ReferenceCache, SharedError};
use crate::cli::{
    Category, DiscoverCmd, ExitCode, GenresCmd, HomeCmd, ImagesCmd, ListCmd, Output,
    ProvidersCmd, RegionsCmd, SearchCmd, WhereCmd,
};
use crate::home::HomeFeed;
use crate::models::{filter_providers, Availability, Item, MediaKind, MediaType, NamedId};

/// Exit code for a failed operation.
///
/// Errors shared out of a reference cache are unwrapped to the request error
/// underneath.
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    let err = err
        .downcast_ref::<SharedError>()
        .map(SharedError::inner)
        .unwrap_or(err);
    match err.downcast_ref::<TmdbError>() {
        Some(TmdbError::NotFound) => ExitCode::NotFound,
        Some(TmdbError::Unauthorized) => ExitCode::AuthError,
        Some(TmdbError::InvalidResponse(_)) => ExitCode::Error,
        Some(_) => ExitCode::NetworkError,
        None => ExitCode::Error,
    }
}

/// Report a failed operation and return its exit code
fn failure(output: &Output, what: &str, err: anyhow::Error) -> ExitCode {
    output.error(format!("{} failed: {}", what, err), exit_code_for(&err))
}

/// Print a list, mapping serialization errors to an exit code
fn emit<T: Serialize + fmt::Display>(output: &Output, items: &[T]) -> ExitCode {
    match output.print_lines(items) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Search Command
// =============================================================================

/// A search hit with its genre names
#[derive(Debug, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub item: Item,
    pub genres: Vec<String>,
}

impl fmt::Display for SearchHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.item)?;
        if !self.genres.is_empty() {
            write!(f, "  {}", self.genres.join(", "))?;
        }
        Ok(())
    }
}

/// Search results worth showing.
///
/// Unless `all` is set, people and entries without a poster are dropped.
/// `kind` keeps only one catalog.
pub fn visible_results(mut items: Vec<Item>, all: bool, kind: Option<MediaKind>) -> Vec<Item> {
    if !all {
        items.retain(|r| {
            matches!(r.media_type, Some(MediaType::Movie) | Some(MediaType::Tv))
                && r.poster_path.is_some()
        });
    }
    if let Some(kind) = kind {
        items.retain(|r| r.media_type == Some(kind.into()));
    }
    items
}

/// Attach genre names to an item. Hits whose genres cannot be resolved are
/// still shown, without genres.
pub async fn search_hit(cache: &ReferenceCache, item: Item) -> SearchHit {
    let genres = match cache.item_genres(&item).await {
        Ok(genres) => genres,
        Err(e) => {
            warn!(id = item.id, error = %e, "failed to resolve genres");
            Vec::new()
        }
    };
    SearchHit { item, genres }
}

pub async fn search_cmd(cmd: SearchCmd, cache: &ReferenceCache, output: &Output) -> ExitCode {
    output.info(format!("Searching for: {}", cmd.query));

    let (result, ()) = tokio::join!(cache.client().search(&cmd.query), cache.preload_genres());

    match result {
        Ok(list) => {
            let mut results =
                visible_results(list.results, cmd.all, cmd.media_type.map(MediaKind::from));
            results.truncate(cmd.limit);

            let mut hits = Vec::with_capacity(results.len());
            for item in results {
                hits.push(search_hit(cache, item).await);
            }
            emit(output, &hits)
        }
        Err(e) => failure(output, "Search", e),
    }
}

// =============================================================================
// List / Discover Commands
// =============================================================================

pub async fn list_cmd(cmd: ListCmd, client: &TmdbClient, output: &Output) -> ExitCode {
    use MediaKind::{Movie, Tv};

    output.info(format!("Fetching {:?}...", cmd.category));

    let result = match cmd.category {
        Category::TrendingMovies => client.trending(Movie).await,
        Category::TrendingShows => client.trending(Tv).await,
        Category::PopularMovies => client.popular(Movie).await,
        Category::PopularShows => client.popular(Tv).await,
        Category::TopRatedMovies => client.top_rated(Movie).await,
        Category::TopRatedShows => client.top_rated(Tv).await,
        Category::Upcoming => client.upcoming().await,
        Category::NowPlaying => client.now_playing().await,
    };

    match result {
        Ok(list) => {
            let mut results = list.results;
            results.truncate(cmd.limit);
            emit(output, &results)
        }
        Err(e) => failure(output, "List fetch", e),
    }
}

pub async fn discover_cmd(cmd: DiscoverCmd, client: &TmdbClient, output: &Output) -> ExitCode {
    let kind = MediaKind::from(cmd.media_type);
    match &cmd.keywords {
        Some(k) => output.info(format!("Discovering {} titles about: {}", kind, k)),
        None => output.info(format!("Discovering {} titles...", kind)),
    }

    match client.discover(kind, cmd.keywords.as_deref()).await {
        Ok(list) => {
            let mut results = list.results;
            results.truncate(cmd.limit);
            emit(output, &results)
        }
        Err(e) => failure(output, "Discover", e),
    }
}

pub async fn home_cmd(cmd: HomeCmd, client: &TmdbClient, output: &Output) -> ExitCode {
    output.info("Loading home feed...");

    let mut feed = match HomeFeed::load(client).await {
        Ok(feed) => feed,
        Err(e) => return failure(output, "Home feed", e),
    };
    for section in &mut feed.sections {
        section.items.truncate(cmd.limit);
    }

    if output.json {
        if let Err(e) = output.print(&feed) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
        return ExitCode::Success;
    }

    for section in &feed.sections {
        println!("== {} ==", section.title);
        for item in &section.items {
            println!("{}", item);
        }
        println!();
    }
    ExitCode::Success
}

// =============================================================================
// Reference Commands
// =============================================================================

pub async fn genres_cmd(cmd: GenresCmd, cache: &ReferenceCache, output: &Output) -> ExitCode {
    let kind = MediaKind::from(cmd.media_type);

    let genres = match cache.genres(kind).await {
        Ok(genres) => genres,
        Err(e) => return failure(output, "Genre fetch", e),
    };

    let mut entries: Vec<NamedId> = if cmd.ids.is_empty() {
        genres
            .iter()
            .map(|(id, name)| NamedId {
                id: *id,
                name: name.clone(),
            })
            .collect()
    } else {
        cmd.ids
            .iter()
            .filter_map(|id| {
                genres.get(id).map(|name| NamedId {
                    id: *id,
                    name: name.clone(),
                })
            })
            .collect()
    };

    if entries.is_empty() {
        return output.error("No matching genres", ExitCode::NoResults);
    }
    if cmd.ids.is_empty() {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
    }
    emit(output, &entries)
}

/// A country code with its resolved English name
#[derive(Debug, Serialize)]
pub struct RegionName {
    pub code: String,
    pub name: String,
}

impl fmt::Display for RegionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.code, self.name)
    }
}

pub async fn regions_cmd(cmd: RegionsCmd, cache: &ReferenceCache, output: &Output) -> ExitCode {
    if !cmd.codes.is_empty() {
        let mut entries = Vec::with_capacity(cmd.codes.len());
        for code in &cmd.codes {
            let code = code.to_uppercase();
            match cache.region_name(&code).await {
                Ok(name) => entries.push(RegionName { code, name }),
                Err(e) => return failure(output, "Region fetch", e),
            }
        }
        return emit(output, &entries);
    }

    let mut entries: Vec<RegionName> = match cache.regions().await {
        Ok(regions) => regions
            .iter()
            .map(|(code, name)| RegionName {
                code: code.clone(),
                name: name.clone(),
            })
            .collect(),
        Err(e) => return failure(output, "Region fetch", e),
    };
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    emit(output, &entries)
}

pub async fn images_cmd(_cmd: ImagesCmd, cache: &ReferenceCache, output: &Output) -> ExitCode {
    match cache.image_config().await {
        Ok(config) => {
            if let Err(e) = output.print(config.as_ref()) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => failure(output, "Configuration fetch", e),
    }
}

// =============================================================================
// Provider Commands
// =============================================================================

pub async fn providers_cmd(cmd: ProvidersCmd, client: &TmdbClient, output: &Output) -> ExitCode {
    let result = match cmd.media_type {
        Some(filter) => client.provider_catalog(filter.into()).await,
        None => client.providers().await,
    };

    match result {
        Ok(providers) => {
            let matches: Vec<_> = filter_providers(&providers, cmd.filter.as_deref().unwrap_or(""))
                .into_iter()
                .cloned()
                .collect();
            if matches.is_empty() {
                return output.error("No matching providers", ExitCode::NoResults);
            }
            emit(output, &matches)
        }
        Err(e) => failure(output, "Provider fetch", e),
    }
}

/// One provider carrying a title, with the countries it streams in
#[derive(Debug, Serialize)]
pub struct ProviderAvailability {
    pub provider_id: u64,
    pub provider_name: String,
    pub logo_url: Option<String>,
    pub countries: Vec<String>,
}

impl fmt::Display for ProviderAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>6}  {}: {}",
            self.provider_id,
            self.provider_name,
            self.countries.join(", ")
        )
    }
}

pub async fn where_cmd(cmd: WhereCmd, cache: &ReferenceCache, output: &Output) -> ExitCode {
    let kind = MediaKind::from(cmd.media_type);
    output.info(format!("Looking up providers for {} {}", kind, cmd.id));

    let watch = match cache.client().watch_providers(kind, cmd.id).await {
        Ok(watch) => watch,
        Err(e) => return failure(output, "Provider lookup", e),
    };

    let selected: HashSet<u64> = cmd.providers.iter().copied().collect();
    let availability = Availability::collect(&watch, &selected);
    if availability.is_empty() {
        return output.error("Not streamable on the selected providers", ExitCode::NoResults);
    }

    // Logos are optional; a failed configuration fetch only drops them
    let images = cache.image_config().await.ok();

    let mut entries = Vec::with_capacity(availability.providers.len());
    for provider in &availability.providers {
        let countries = match cache
            .country_names(availability.countries_for(provider.provider_id))
            .await
        {
            Ok(names) => names,
            Err(e) => return failure(output, "Region fetch", e),
        };
        entries.push(ProviderAvailability {
            provider_id: provider.provider_id,
            provider_name: provider.provider_name.clone(),
            logo_url: images.as_ref().map(|c| c.logo_url(&provider.logo_path)),
            countries,
        });
    }

    emit(output, &entries)
}
