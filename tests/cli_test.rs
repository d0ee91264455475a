//! CLI Command Tests
//!
//! Argument parsing for every subcommand, plus the JSON output envelope.

// =============================================================================
// CLI Argument Parsing Tests
// =============================================================================

mod cli_parsing {
    use clap::Parser;
    use watchany::cli::{Category, Cli, Command, MediaTypeFilter};

    #[test]
    fn test_no_subcommand_is_error() {
        assert!(Cli::try_parse_from(["watchany"]).is_err());
    }

    #[test]
    fn test_search_with_filters() {
        let cli = Cli::parse_from([
            "watchany", "search", "batman", "--limit", "10", "-t", "tv", "--all",
        ]);
        match cli.command {
            Command::Search(cmd) => {
                assert_eq!(cmd.query, "batman");
                assert_eq!(cmd.limit, 10);
                assert_eq!(cmd.media_type, Some(MediaTypeFilter::Tv));
                assert!(cmd.all);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_search_alias() {
        let cli = Cli::parse_from(["watchany", "s", "dune"]);
        assert!(matches!(cli.command, Command::Search(ref cmd) if cmd.query == "dune"));
    }

    #[test]
    fn test_list_categories() {
        let cases = [
            ("trending-movies", Category::TrendingMovies),
            ("trending-shows", Category::TrendingShows),
            ("popular-movies", Category::PopularMovies),
            ("popular-shows", Category::PopularShows),
            ("top-rated-movies", Category::TopRatedMovies),
            ("top-rated-shows", Category::TopRatedShows),
            ("upcoming", Category::Upcoming),
            ("now-playing", Category::NowPlaying),
        ];
        for (arg, expected) in cases {
            let cli = Cli::parse_from(["watchany", "list", arg]);
            match cli.command {
                Command::List(cmd) => {
                    assert_eq!(cmd.category, expected);
                    assert_eq!(cmd.limit, 20);
                }
                _ => panic!("Expected List command"),
            }
        }
    }

    #[test]
    fn test_list_unknown_category() {
        assert!(Cli::try_parse_from(["watchany", "list", "cult-classics"]).is_err());
    }

    #[test]
    fn test_discover_defaults_to_movies() {
        let cli = Cli::parse_from(["watchany", "discover"]);
        match cli.command {
            Command::Discover(cmd) => {
                assert_eq!(cmd.media_type, MediaTypeFilter::Movie);
                assert!(cmd.keywords.is_none());
            }
            _ => panic!("Expected Discover command"),
        }
    }

    #[test]
    fn test_discover_with_keywords() {
        let cli = Cli::parse_from(["watchany", "discover", "-t", "tv", "-k", "anime", "-l", "3"]);
        match cli.command {
            Command::Discover(cmd) => {
                assert_eq!(cmd.media_type, MediaTypeFilter::Tv);
                assert_eq!(cmd.keywords.as_deref(), Some("anime"));
                assert_eq!(cmd.limit, 3);
            }
            _ => panic!("Expected Discover command"),
        }
    }

    #[test]
    fn test_home_limit() {
        let cli = Cli::parse_from(["watchany", "home"]);
        assert!(matches!(cli.command, Command::Home(ref cmd) if cmd.limit == 5));
    }

    #[test]
    fn test_genres_ids() {
        let cli = Cli::parse_from(["watchany", "genres", "16", "10765", "-t", "tv"]);
        match cli.command {
            Command::Genres(cmd) => {
                assert_eq!(cmd.ids, vec![16, 10765]);
                assert_eq!(cmd.media_type, MediaTypeFilter::Tv);
            }
            _ => panic!("Expected Genres command"),
        }
    }

    #[test]
    fn test_genres_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["watchany", "genres", "action"]).is_err());
    }

    #[test]
    fn test_regions_codes() {
        let cli = Cli::parse_from(["watchany", "regions", "nl", "US"]);
        match cli.command {
            Command::Regions(cmd) => assert_eq!(cmd.codes, vec!["nl", "US"]),
            _ => panic!("Expected Regions command"),
        }
    }

    #[test]
    fn test_providers_filter() {
        let cli = Cli::parse_from(["watchany", "providers", "netflix", "-t", "movie"]);
        match cli.command {
            Command::Providers(cmd) => {
                assert_eq!(cmd.filter.as_deref(), Some("netflix"));
                assert_eq!(cmd.media_type, Some(MediaTypeFilter::Movie));
            }
            _ => panic!("Expected Providers command"),
        }
    }

    #[test]
    fn test_where_without_providers() {
        let cli = Cli::parse_from(["watchany", "where", "550"]);
        match cli.command {
            Command::Where(cmd) => {
                assert_eq!(cmd.id, 550);
                assert_eq!(cmd.media_type, MediaTypeFilter::Movie);
                assert!(cmd.providers.is_empty());
            }
            _ => panic!("Expected Where command"),
        }
    }

    #[test]
    fn test_where_requires_id() {
        assert!(Cli::try_parse_from(["watchany", "where"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "watchany",
            "images",
            "-j",
            "-c",
            "/tmp/watchany.toml",
            "--language",
            "nl-NL",
        ]);
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Images(_)));
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("/tmp/watchany.toml"))
        );
        assert_eq!(cli.language.as_deref(), Some("nl-NL"));
    }
}

// =============================================================================
// JSON Output Tests
// =============================================================================

mod json_output {
    use serde_json::json;
    use watchany::cli::{ExitCode, JsonOutput};

    #[test]
    fn test_success_omits_error_fields() {
        let output = JsonOutput::success(vec![1, 2, 3]);
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value, json!({"data": [1, 2, 3]}));
    }

    #[test]
    fn test_error_has_message_and_code() {
        let output = JsonOutput::<()>::error_msg("Provider lookup failed", ExitCode::NotFound);
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(
            value,
            json!({"error": "Provider lookup failed", "exit_code": 4})
        );
    }
}
