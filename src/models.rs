//! Data structures for watchany
//!
//! Contains the shared models decoded from the catalog API, organized by domain:
//! - **Items**: unified movie/TV records and paged result lists
//! - **Reference**: image configuration, genres, regions
//! - **Providers**: streaming services and per-country availability

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

// =============================================================================
// Media Kinds
// =============================================================================

/// The two catalogs exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    /// Path segment used by the API for this catalog
    pub fn as_path(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "Movie"),
            MediaKind::Tv => write!(f, "TV Show"),
        }
    }
}

/// The `media_type` tag attached to list results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
    Person,
    #[serde(other)]
    Other,
}

impl From<MediaKind> for MediaType {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Movie => MediaType::Movie,
            MediaKind::Tv => MediaType::Tv,
        }
    }
}

// =============================================================================
// Items
// =============================================================================

/// A single movie or TV show.
///
/// Movies and shows use different keys for the same concepts. Decoding folds
/// them onto one shape: `name` into `title`, `original_name` into
/// `original_title` and `first_air_date` into `release_date`. The movie key
/// wins when both are present. Only `id` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ItemRaw")]
pub struct Item {
    pub adult: Option<bool>,
    pub backdrop_path: Option<String>,
    pub id: u64,
    pub title: Option<String>,
    pub original_language: Option<String>,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub media_type: Option<MediaType>,
    pub genre_ids: Option<Vec<u64>>,
    pub popularity: Option<f64>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ItemRaw {
    adult: Option<bool>,
    backdrop_path: Option<String>,
    id: u64,
    // Movies use "title", TV uses "name"
    title: Option<String>,
    name: Option<String>,
    original_language: Option<String>,
    original_title: Option<String>,
    original_name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    media_type: Option<MediaType>,
    genre_ids: Option<Vec<u64>>,
    popularity: Option<f64>,
    // Movies use "release_date", TV uses "first_air_date"
    release_date: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f64>,
    vote_count: Option<u64>,
}

impl From<ItemRaw> for Item {
    fn from(raw: ItemRaw) -> Self {
        Item {
            adult: raw.adult,
            backdrop_path: raw.backdrop_path,
            id: raw.id,
            title: raw.title.or(raw.name),
            original_language: raw.original_language,
            original_title: raw.original_title.or(raw.original_name),
            overview: raw.overview,
            poster_path: raw.poster_path,
            media_type: raw.media_type,
            genre_ids: raw.genre_ids,
            popularity: raw.popularity,
            release_date: raw.release_date.or(raw.first_air_date),
            vote_average: raw.vote_average,
            vote_count: raw.vote_count,
        }
    }
}

impl Item {
    /// Catalog this item belongs to. Untagged items count as movies.
    pub fn kind(&self) -> MediaKind {
        match self.media_type {
            Some(MediaType::Tv) => MediaKind::Tv,
            _ => MediaKind::Movie,
        }
    }

    /// Release year taken from the unified release date
    pub fn year(&self) -> Option<u16> {
        self.release_date.as_deref().and_then(extract_year)
    }

    /// Title for display, empty when the record has none
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{:>8}  {}{} [{}]", self.id, self.display_title(), year_str, self.kind())
    }
}

/// Date window attached to "now playing" and "upcoming" lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub maximum: String,
    pub minimum: String,
}

/// One page of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemList {
    pub dates: Option<DateRange>,
    pub page: u32,
    pub results: Vec<Item>,
    pub total_pages: u32,
    pub total_results: u32,
}

impl ItemList {
    /// Tag untagged items with the catalog they were listed from
    pub fn stamp_kind(mut self, kind: MediaKind) -> Self {
        for item in self.results.iter_mut().filter(|i| i.media_type.is_none()) {
            item.media_type = Some(kind.into());
        }
        self
    }
}

// =============================================================================
// Reference Data
// =============================================================================

/// Image hosting details from the configuration endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    pub base_url: String,
    pub secure_base_url: String,
    pub backdrop_sizes: Vec<String>,
    pub logo_sizes: Vec<String>,
    pub poster_sizes: Vec<String>,
    pub profile_sizes: Vec<String>,
    pub still_sizes: Vec<String>,
}

impl ImageConfig {
    pub fn poster_url(&self, path: &str) -> String {
        self.image_url(&self.poster_sizes, path)
    }

    pub fn logo_url(&self, path: &str) -> String {
        self.image_url(&self.logo_sizes, path)
    }

    pub fn backdrop_url(&self, path: &str) -> String {
        self.image_url(&self.backdrop_sizes, path)
    }

    /// The second-smallest size is the preferred thumbnail size
    fn image_url(&self, sizes: &[String], path: &str) -> String {
        let size = sizes
            .get(1)
            .or_else(|| sizes.first())
            .map(String::as_str)
            .unwrap_or("original");
        format!("{}{}{}", self.secure_base_url, size, path)
    }
}

/// Full response of the configuration endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub images: ImageConfig,
    #[serde(default)]
    pub change_keys: Vec<String>,
}

/// An `{id, name}` pair (genres, keywords)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedId {
    pub id: u64,
    pub name: String,
}

impl fmt::Display for NamedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}  {}", self.id, self.name)
    }
}

/// One page of id/name pairs from keyword search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdPage {
    pub page: u32,
    pub results: Vec<NamedId>,
    pub total_pages: u32,
    pub total_results: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreList {
    pub genres: Vec<NamedId>,
}

/// Country where provider data is available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub iso_3166_1: String,
    pub english_name: String,
    pub native_name: String,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.iso_3166_1, self.english_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionList {
    pub results: Vec<Region>,
}

// =============================================================================
// Providers
// =============================================================================

/// A streaming service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub display_priorities: Option<HashMap<String, i64>>,
    pub logo_path: String,
    pub provider_id: u64,
    pub provider_name: String,
    pub display_priority: i64,
}

impl Provider {
    /// Mean of the per-country display priorities
    pub fn average_display_priority(&self) -> Option<f64> {
        let priorities = self.display_priorities.as_ref()?;
        if priorities.is_empty() {
            return None;
        }
        let total: i64 = priorities.values().sum();
        Some(total as f64 / priorities.len() as f64)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}  {}", self.provider_id, self.provider_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderList {
    pub results: Vec<Provider>,
}

/// Offers for one item in one country, grouped by monetization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderOffers {
    pub link: String,
    pub flatrate: Option<Vec<Provider>>,
    pub ads: Option<Vec<Provider>>,
    pub free: Option<Vec<Provider>>,
    pub rent: Option<Vec<Provider>>,
    pub buy: Option<Vec<Provider>>,
}

impl ProviderOffers {
    /// Subscription and free offers, in that order
    pub fn streamable(&self) -> impl Iterator<Item = &Provider> {
        self.flatrate
            .iter()
            .flatten()
            .chain(self.free.iter().flatten())
    }
}

/// Watch providers of one item, keyed by ISO 3166-1 country code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchProviders {
    pub id: u64,
    pub results: BTreeMap<String, ProviderOffers>,
}

/// Movie providers first, then TV providers not already listed
pub fn merge_providers(movie: Vec<Provider>, tv: Vec<Provider>) -> Vec<Provider> {
    let mut seen: HashSet<u64> = movie.iter().map(|p| p.provider_id).collect();
    let mut merged = movie;
    merged.extend(tv.into_iter().filter(|p| seen.insert(p.provider_id)));
    merged
}

/// Case-insensitive name filter
pub fn filter_providers<'a>(providers: &'a [Provider], query: &str) -> Vec<&'a Provider> {
    let needle = query.to_lowercase();
    providers
        .iter()
        .filter(|p| needle.is_empty() || p.provider_name.to_lowercase().contains(&needle))
        .collect()
}

/// Where an item can be streamed, restricted to a provider selection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Availability {
    /// Matching providers in first-seen order
    pub providers: Vec<Provider>,
    /// Country codes per provider id
    pub countries: HashMap<u64, Vec<String>>,
}

impl Availability {
    /// Collect streamable offers of `selected` providers across countries.
    /// An empty selection keeps every provider.
    pub fn collect(watch: &WatchProviders, selected: &HashSet<u64>) -> Self {
        let mut availability = Availability::default();

        for (country, offers) in &watch.results {
            for provider in offers.streamable() {
                if !selected.is_empty() && !selected.contains(&provider.provider_id) {
                    continue;
                }
                let countries = availability
                    .countries
                    .entry(provider.provider_id)
                    .or_default();
                if countries.is_empty() {
                    availability.providers.push(provider.clone());
                }
                if !countries.contains(country) {
                    countries.push(country.clone());
                }
            }
        }

        availability
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Country codes for one provider
    pub fn countries_for(&self, provider_id: u64) -> &[String] {
        self.countries
            .get(&provider_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Extract year from a date string like "2022-03-04"
pub fn extract_year(date: &str) -> Option<u16> {
    date.get(..4)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(id: u64, name: &str) -> Provider {
        Provider {
            display_priorities: None,
            logo_path: format!("/{}.jpg", id),
            provider_id: id,
            provider_name: name.to_string(),
            display_priority: 0,
        }
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("2022-03-04"), Some(2022));
        assert_eq!(extract_year("2019"), Some(2019));
        assert_eq!(extract_year(""), None);
        assert_eq!(extract_year("abc"), None);
    }

    #[test]
    fn test_item_prefers_movie_keys() {
        let item: Item = serde_json::from_str(
            r#"{"id": 1, "title": "Movie", "name": "Show",
                "release_date": "2020-01-01", "first_air_date": "1999-01-01",
                "original_title": "Orig", "original_name": "OrigShow"}"#,
        )
        .unwrap();
        assert_eq!(item.title.as_deref(), Some("Movie"));
        assert_eq!(item.release_date.as_deref(), Some("2020-01-01"));
        assert_eq!(item.original_title.as_deref(), Some("Orig"));
    }

    #[test]
    fn test_item_falls_back_to_show_keys() {
        let item: Item = serde_json::from_str(
            r#"{"id": 94605, "name": "Arcane", "original_name": "Arcane",
                "first_air_date": "2021-11-06", "media_type": "tv"}"#,
        )
        .unwrap();
        assert_eq!(item.title.as_deref(), Some("Arcane"));
        assert_eq!(item.original_title.as_deref(), Some("Arcane"));
        assert_eq!(item.release_date.as_deref(), Some("2021-11-06"));
        assert_eq!(item.kind(), MediaKind::Tv);
        assert_eq!(item.year(), Some(2021));
    }

    #[test]
    fn test_item_null_title_falls_back() {
        let item: Item =
            serde_json::from_str(r#"{"id": 3, "title": null, "name": "Named"}"#).unwrap();
        assert_eq!(item.title.as_deref(), Some("Named"));
    }

    #[test]
    fn test_item_requires_id() {
        assert!(serde_json::from_str::<Item>(r#"{"title": "No id"}"#).is_err());
        let bare: Item = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(bare.id, 7);
        assert!(bare.title.is_none());
        assert_eq!(bare.kind(), MediaKind::Movie);
    }

    #[test]
    fn test_unknown_media_type() {
        let item: Item =
            serde_json::from_str(r#"{"id": 1, "media_type": "collection"}"#).unwrap();
        assert_eq!(item.media_type, Some(MediaType::Other));
    }

    #[test]
    fn test_stamp_kind_keeps_existing_tag() {
        let list: ItemList = serde_json::from_str(
            r#"{"page": 1, "total_pages": 1, "total_results": 2,
                "results": [{"id": 1}, {"id": 2, "media_type": "movie"}]}"#,
        )
        .unwrap();
        let list = list.stamp_kind(MediaKind::Tv);
        assert_eq!(list.results[0].media_type, Some(MediaType::Tv));
        assert_eq!(list.results[1].media_type, Some(MediaType::Movie));
    }

    #[test]
    fn test_image_urls() {
        let config = ImageConfig {
            base_url: "http://image.tmdb.org/t/p/".into(),
            secure_base_url: "https://image.tmdb.org/t/p/".into(),
            backdrop_sizes: vec!["w300".into(), "w780".into()],
            logo_sizes: vec!["w45".into()],
            poster_sizes: vec!["w92".into(), "w154".into(), "w185".into()],
            profile_sizes: vec![],
            still_sizes: vec![],
        };
        assert_eq!(config.poster_url("/a.jpg"), "https://image.tmdb.org/t/p/w154/a.jpg");
        assert_eq!(config.logo_url("/b.jpg"), "https://image.tmdb.org/t/p/w45/b.jpg");
        assert_eq!(config.backdrop_url("/c.jpg"), "https://image.tmdb.org/t/p/w780/c.jpg");
        assert_eq!(
            config.image_url(&config.still_sizes, "/d.jpg"),
            "https://image.tmdb.org/t/p/original/d.jpg"
        );
    }

    #[test]
    fn test_average_display_priority() {
        let mut p = provider(8, "Netflix");
        assert_eq!(p.average_display_priority(), None);

        p.display_priorities = Some(HashMap::new());
        assert_eq!(p.average_display_priority(), None);

        p.display_priorities = Some(HashMap::from([
            ("US".to_string(), 2),
            ("GB".to_string(), 4),
        ]));
        assert_eq!(p.average_display_priority(), Some(3.0));
    }

    #[test]
    fn test_merge_providers_dedups_by_id() {
        let movie = vec![provider(8, "Netflix"), provider(9, "Prime")];
        let tv = vec![provider(9, "Prime Video"), provider(337, "Disney Plus")];
        let merged = merge_providers(movie, tv);
        let ids: Vec<u64> = merged.iter().map(|p| p.provider_id).collect();
        assert_eq!(ids, vec![8, 9, 337]);
        assert_eq!(merged[1].provider_name, "Prime");
    }

    #[test]
    fn test_filter_providers() {
        let providers = vec![provider(8, "Netflix"), provider(2, "Apple TV")];
        assert_eq!(filter_providers(&providers, "").len(), 2);
        let hits = filter_providers(&providers, "NETF");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].provider_id, 8);
        assert!(filter_providers(&providers, "hulu").is_empty());
    }

    #[test]
    fn test_availability_collect() {
        let offers = |flatrate: Vec<Provider>, free: Vec<Provider>, rent: Vec<Provider>| {
            ProviderOffers {
                link: "https://example.com".into(),
                flatrate: Some(flatrate),
                ads: None,
                free: Some(free),
                rent: Some(rent),
                buy: None,
            }
        };
        let watch = WatchProviders {
            id: 1,
            results: BTreeMap::from([
                (
                    "GB".to_string(),
                    offers(vec![provider(8, "Netflix")], vec![], vec![provider(2, "Apple TV")]),
                ),
                (
                    "US".to_string(),
                    offers(
                        vec![provider(8, "Netflix"), provider(9, "Prime")],
                        vec![provider(73, "Tubi")],
                        vec![],
                    ),
                ),
            ]),
        };

        let selected = HashSet::from([8, 73, 2]);
        let availability = Availability::collect(&watch, &selected);
        let ids: Vec<u64> = availability.providers.iter().map(|p| p.provider_id).collect();
        // Rent offers never count, unselected Prime is dropped
        assert_eq!(ids, vec![8, 73]);
        assert_eq!(availability.countries_for(8), ["GB", "US"]);
        assert_eq!(availability.countries_for(73), ["US"]);
        assert!(availability.countries_for(2).is_empty());

        let everything = Availability::collect(&watch, &HashSet::new());
        assert_eq!(everything.providers.len(), 3);
    }
}
