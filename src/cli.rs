//! CLI - Command Line Interface for watchany
//!
//! Every browsing action is a subcommand. All output is JSON-parseable with
//! `--json` (the default when stdout is not a terminal).
//!
//! # Examples
//!
//! ```bash
//! # Search for content
//! watchany search "arcane" --json
//!
//! # Browse lists
//! watchany list trending-shows -l 5
//! watchany discover -t tv -k anime
//!
//! # Where can I stream it?
//! watchany where 94605 -t tv -p 8,337
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::MediaKind;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments or configuration
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Resource not found
    NotFound = 4,
    /// Request succeeded but nothing matched
    NoResults = 5,
    /// Access token rejected
    AuthError = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// watchany - browse movie and TV catalogs and find where they stream
#[derive(Parser, Debug)]
#[command(
    name = "watchany",
    version,
    about = "Browse movie and TV catalogs and find where they stream",
    long_about = "Search movies and TV shows, browse trending and popular lists, \
                  and see which streaming services carry a title in each country.\n\n\
                  Requires a TMDB read access token in TMDB_ACCESS_TOKEN or the config file.",
    after_help = "EXAMPLES:\n\
                  watchany search \"arcane\"            Search for content\n\
                  watchany list popular-movies        Browse a list\n\
                  watchany where 94605 -t tv -p 8     Where a show streams\n\
                  watchany providers netflix          Find a provider id"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Response language (e.g. en-US, de-DE)
    #[arg(long, global = true)]
    pub language: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for movies and TV shows
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Show a curated list (trending, popular, top rated, ...)
    #[command(visible_alias = "ls")]
    List(ListCmd),

    /// Discover popular titles, optionally by keyword
    #[command(visible_alias = "d")]
    Discover(DiscoverCmd),

    /// Show every landing section at once
    Home(HomeCmd),

    /// List genres or resolve genre ids to names
    #[command(visible_alias = "g")]
    Genres(GenresCmd),

    /// List regions or resolve country codes to names
    #[command(visible_alias = "r")]
    Regions(RegionsCmd),

    /// List streaming providers
    #[command(visible_alias = "p")]
    Providers(ProvidersCmd),

    /// Show where a title can be streamed
    #[command(visible_alias = "w")]
    Where(WhereCmd),

    /// Show image hosting configuration
    Images(ImagesCmd),
}

/// Media type filter
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaTypeFilter {
    /// Movies only
    Movie,
    /// TV shows only
    Tv,
}

impl From<MediaTypeFilter> for MediaKind {
    fn from(filter: MediaTypeFilter) -> Self {
        match filter {
            MediaTypeFilter::Movie => MediaKind::Movie,
            MediaTypeFilter::Tv => MediaKind::Tv,
        }
    }
}

// =============================================================================
// Search Command
// =============================================================================

/// Search for movies and TV shows by query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,

    /// Filter by media type
    #[arg(long, short = 't', value_enum)]
    pub media_type: Option<MediaTypeFilter>,

    /// Include people and results without a poster
    #[arg(long, short = 'a')]
    pub all: bool,
}

// =============================================================================
// List Command
// =============================================================================

/// Show one curated list
#[derive(Args, Debug)]
pub struct ListCmd {
    /// Which list to show
    #[arg(value_enum)]
    pub category: Category,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Curated lists
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    TrendingMovies,
    TrendingShows,
    PopularMovies,
    PopularShows,
    TopRatedMovies,
    TopRatedShows,
    /// Movies about to be released
    Upcoming,
    /// Movies currently in theatres
    NowPlaying,
}

// =============================================================================
// Discover Command
// =============================================================================

/// Discover popular titles
#[derive(Args, Debug)]
pub struct DiscoverCmd {
    /// Catalog to discover in
    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: MediaTypeFilter,

    /// Only titles tagged with keywords matching this text
    #[arg(long, short = 'k')]
    pub keywords: Option<String>,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

// =============================================================================
// Home Command
// =============================================================================

/// Show every landing section
#[derive(Args, Debug)]
pub struct HomeCmd {
    /// Maximum number of items per section
    #[arg(long, short = 'l', default_value = "5")]
    pub limit: usize,
}

// =============================================================================
// Reference Commands
// =============================================================================

/// List genres or resolve genre ids
#[derive(Args, Debug)]
pub struct GenresCmd {
    /// Genre ids to resolve (all genres when omitted)
    pub ids: Vec<u64>,

    /// Catalog the genres belong to
    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: MediaTypeFilter,
}

/// List regions or resolve country codes
#[derive(Args, Debug)]
pub struct RegionsCmd {
    /// ISO 3166-1 codes to resolve (all regions when omitted)
    pub codes: Vec<String>,
}

/// Show image hosting configuration
#[derive(Args, Debug)]
pub struct ImagesCmd {}

// =============================================================================
// Provider Commands
// =============================================================================

/// List streaming providers
#[derive(Args, Debug)]
pub struct ProvidersCmd {
    /// Case-insensitive name filter
    pub filter: Option<String>,

    /// Only providers from one catalog (both merged when omitted)
    #[arg(long, short = 't', value_enum)]
    pub media_type: Option<MediaTypeFilter>,
}

/// Show where a title can be streamed
#[derive(Args, Debug)]
pub struct WhereCmd {
    /// TMDB id of the movie or show
    #[arg(required = true)]
    pub id: u64,

    /// Whether the id is a movie or a show
    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: MediaTypeFilter,

    /// Provider ids to consider, comma-separated (all when omitted)
    #[arg(long, short = 'p', value_delimiter = ',')]
    pub providers: Vec<u64>,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            // For non-JSON, caller should handle formatting
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print a list as JSON, or one display line per entry
    pub fn print_lines<T: Serialize + Display>(&self, items: &[T]) -> anyhow::Result<()> {
        if self.json {
            return self.print(items);
        }
        for item in items {
            println!("{}", item);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
