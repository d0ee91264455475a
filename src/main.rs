//! watchany - browse movie and TV catalogs and find where they stream
//!
//! # Usage
//!
//! ```bash
//! export TMDB_ACCESS_TOKEN=...
//!
//! watchany search "arcane"
//! watchany list trending-shows
//! watchany where 94605 -t tv -p 8,337
//! watchany regions NL US --json
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use watchany::cache::ReferenceCache;
use watchany::cli::{Cli, Command, ExitCode, Output};
use watchany::commands;
use watchany::config::Config;
use watchany::TmdbClient;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output on stdout stays clean
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    run(cli).await.into()
}

/// Load configuration, build the client and dispatch the subcommand
async fn run(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);

    let config = match &cli.config {
        Some(path) => match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => return output.error(format!("{:#}", e), ExitCode::InvalidArgs),
        },
        None => Config::load(),
    };

    let mut client = match TmdbClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };
    if let Some(language) = &cli.language {
        client = client.with_language(language.clone());
    }

    let cache = ReferenceCache::new(client);
    let client = cache.client();

    match cli.command {
        Command::Search(cmd) => commands::search_cmd(cmd, &cache, &output).await,
        Command::List(cmd) => commands::list_cmd(cmd, client, &output).await,
        Command::Discover(cmd) => commands::discover_cmd(cmd, client, &output).await,
        Command::Home(cmd) => commands::home_cmd(cmd, client, &output).await,
        Command::Genres(cmd) => commands::genres_cmd(cmd, &cache, &output).await,
        Command::Regions(cmd) => commands::regions_cmd(cmd, &cache, &output).await,
        Command::Providers(cmd) => commands::providers_cmd(cmd, client, &output).await,
        Command::Where(cmd) => commands::where_cmd(cmd, &cache, &output).await,
        Command::Images(cmd) => commands::images_cmd(cmd, &cache, &output).await,
    }
}
