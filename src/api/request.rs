//! Endpoint catalog
//!
//! Every request the client can make, with its path and query items.

use crate::models::MediaKind;

/// A catalog API endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Configuration,
    Genres(MediaKind),
    Regions,
    ProviderCatalog(MediaKind),
    WatchProviders(MediaKind, u64),
    Search(String),
    SearchKeyword(String),
    Trending(MediaKind),
    /// Discover sorted by popularity, optionally restricted to keyword ids
    Discover(MediaKind, Option<Vec<u64>>),
    TopRated(MediaKind),
    Popular(MediaKind),
    Upcoming,
    NowPlaying,
}

impl Endpoint {
    /// Path relative to the API base URL, with leading slash
    pub fn path(&self) -> String {
        match self {
            Endpoint::Configuration => "/configuration".to_string(),
            Endpoint::Genres(kind) => format!("/genre/{}/list", kind.as_path()),
            Endpoint::Regions => "/watch/providers/regions".to_string(),
            Endpoint::ProviderCatalog(kind) => format!("/watch/providers/{}", kind.as_path()),
            Endpoint::WatchProviders(kind, id) => {
                format!("/{}/{}/watch/providers", kind.as_path(), id)
            }
            Endpoint::Search(_) => "/search/multi".to_string(),
            Endpoint::SearchKeyword(_) => "/search/keyword".to_string(),
            Endpoint::Trending(kind) => format!("/trending/{}/day", kind.as_path()),
            Endpoint::Discover(kind, _) => format!("/discover/{}", kind.as_path()),
            Endpoint::TopRated(kind) => format!("/{}/top_rated", kind.as_path()),
            Endpoint::Popular(kind) => format!("/{}/popular", kind.as_path()),
            Endpoint::Upcoming => "/movie/upcoming".to_string(),
            Endpoint::NowPlaying => "/movie/now_playing".to_string(),
        }
    }

    /// Query items in request order
    pub fn query(&self, language: &str) -> Vec<(&'static str, String)> {
        let lang = || ("language", language.to_string());
        let first_page = || ("page", "1".to_string());

        match self {
            Endpoint::Configuration | Endpoint::WatchProviders(..) => Vec::new(),
            Endpoint::Genres(_)
            | Endpoint::Regions
            | Endpoint::ProviderCatalog(_)
            | Endpoint::Trending(_) => vec![lang()],
            Endpoint::Search(query) => vec![
                ("query", query.clone()),
                ("include_adult", "true".to_string()),
                lang(),
                first_page(),
            ],
            Endpoint::SearchKeyword(query) => vec![("query", query.clone()), first_page()],
            Endpoint::Discover(kind, keywords) => {
                let mut items = match kind {
                    MediaKind::Movie => vec![
                        ("include_adult", "true".to_string()),
                        ("include_video", "false".to_string()),
                        first_page(),
                        ("sort_by", "popularity.desc".to_string()),
                    ],
                    MediaKind::Tv => vec![
                        ("include_adult", "true".to_string()),
                        ("include_null_first_air_dates", "false".to_string()),
                        lang(),
                        first_page(),
                        ("sort_by", "popularity.desc".to_string()),
                    ],
                };
                if let Some(ids) = keywords.as_ref().filter(|ids| !ids.is_empty()) {
                    items.push(("with_keywords", join_ids(ids)));
                }
                items
            }
            Endpoint::TopRated(_)
            | Endpoint::Popular(_)
            | Endpoint::Upcoming
            | Endpoint::NowPlaying => vec![lang(), first_page()],
        }
    }

    /// Path plus percent-encoded query string
    pub fn to_url_suffix(&self, language: &str) -> String {
        let query = self.query(language);
        if query.is_empty() {
            return self.path();
        }
        let encoded: Vec<String> = query
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();
        format!("{}?{}", self.path(), encoded.join("&"))
    }
}

/// Keyword ids joined with `|` (OR semantics)
fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Endpoint::Configuration.path(), "/configuration");
        assert_eq!(Endpoint::Genres(MediaKind::Tv).path(), "/genre/tv/list");
        assert_eq!(
            Endpoint::WatchProviders(MediaKind::Movie, 550).path(),
            "/movie/550/watch/providers"
        );
        assert_eq!(Endpoint::Trending(MediaKind::Tv).path(), "/trending/tv/day");
        assert_eq!(Endpoint::TopRated(MediaKind::Movie).path(), "/movie/top_rated");
        assert_eq!(Endpoint::NowPlaying.path(), "/movie/now_playing");
    }

    #[test]
    fn test_search_query_is_encoded() {
        let url = Endpoint::Search("blade runner & co".into()).to_url_suffix("en-US");
        assert_eq!(
            url,
            "/search/multi?query=blade%20runner%20%26%20co&include_adult=true&language=en-US&page=1"
        );
    }

    #[test]
    fn test_no_query_has_no_question_mark() {
        assert_eq!(Endpoint::Configuration.to_url_suffix("en-US"), "/configuration");
    }

    #[test]
    fn test_discover_movie_omits_language() {
        let query = Endpoint::Discover(MediaKind::Movie, None).query("de-DE");
        assert!(!query.iter().any(|(k, _)| *k == "language"));
        assert!(query.contains(&("include_video", "false".to_string())));
    }

    #[test]
    fn test_discover_with_keywords() {
        let url = Endpoint::Discover(MediaKind::Tv, Some(vec![210024, 6075])).to_url_suffix("en-US");
        assert!(url.ends_with("&with_keywords=210024%7C6075"));

        let empty = Endpoint::Discover(MediaKind::Tv, Some(vec![])).query("en-US");
        assert!(!empty.iter().any(|(k, _)| *k == "with_keywords"));
    }
}
