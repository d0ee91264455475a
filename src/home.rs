//! Landing feed: the browsing sections shown before any search

use anyhow::Result;
use serde::Serialize;

use crate::api::TmdbClient;
use crate::models::{Item, ItemList, MediaKind};

/// One titled row of items
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub items: Vec<Item>,
}

/// All landing sections, in display order
#[derive(Debug, Clone, Serialize)]
pub struct HomeFeed {
    pub sections: Vec<Section>,
}

impl HomeFeed {
    /// Fetch every section concurrently. Any failing section fails the feed.
    pub async fn load(client: &TmdbClient) -> Result<Self> {
        use MediaKind::{Movie, Tv};

        let (
            discover_movies,
            discover_shows,
            trending_movies,
            trending_shows,
            popular_movies,
            popular_shows,
            top_rated_movies,
            top_rated_shows,
            in_theatres,
            upcoming,
            anime_movies,
            anime_shows,
            competition_shows,
        ) = tokio::try_join!(
            client.discover(Movie, None),
            client.discover(Tv, None),
            client.trending(Movie),
            client.trending(Tv),
            client.popular(Movie),
            client.popular(Tv),
            client.top_rated(Movie),
            client.top_rated(Tv),
            client.now_playing(),
            client.upcoming(),
            client.discover(Movie, Some("anime")),
            client.discover(Tv, Some("anime")),
            client.discover(Tv, Some("competition")),
        )?;

        let section = |title: &'static str, list: ItemList| Section {
            title,
            items: list.results,
        };

        Ok(Self {
            sections: vec![
                section("Discover Movies", discover_movies),
                section("Discover TV Shows", discover_shows),
                section("Trending Movies", trending_movies),
                section("Trending TV Shows", trending_shows),
                section("Popular Movies", popular_movies),
                section("Popular TV Shows", popular_shows),
                section("Top Rated Movies", top_rated_movies),
                section("Top Rated TV Shows", top_rated_shows),
                section("In Theatres", in_theatres),
                section("Upcoming Movies", upcoming),
                section("Anime Movies", anime_movies),
                section("Anime TV Shows", anime_shows),
                section("Competition Shows", competition_shows),
            ],
        })
    }

    /// Section by title
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}
