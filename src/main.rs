use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use docs_versioning::changelog;
use docs_versioning::config::{self, DocsConfig};
use docs_versioning::logger::{self, LogFormat};
use docs_versioning::site::collections::build_collections;
use docs_versioning::site::routing::{LocaleContext, normalize_route, parse_route};
use docs_versioning::site::setup::{VersioningState, resolve_versions};
use docs_versioning::site::switcher::SwitcherState;
use docs_versioning::version::cache::VersionCache;
use docs_versioning::version::fetcher::GithubVersionsFetcher;

#[derive(Parser)]
#[command(name = "docs-versioning")]
#[command(version, about = "Documentation versions backed by GitHub releases")]
struct Cli {
    /// Config file, defaults to ./docs-versioning.json when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to the data directory instead of stderr
    #[arg(long, global = true)]
    log_file: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Filter used when DOCS_VERSIONING_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_filter: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the resolved versions
    Versions,
    /// Print the content collections of every served version
    Collections,
    /// Print the version switcher for a route
    Switcher {
        #[arg(long, default_value = "/")]
        route: String,
    },
    /// Normalize a route and print the decision
    Route {
        path: String,
        /// Active locale
        #[arg(long)]
        locale: Option<String>,
        /// Available locales; i18n is off when empty
        #[arg(long, value_delimiter = ',')]
        locales: Vec<String>,
    },
    Changelog {
        #[command(subcommand)]
        action: ChangelogAction,
    },
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum ChangelogAction {
    /// Badge labels per major.minor version
    Labels { dir: Option<PathBuf> },
    /// Release date per major version
    Majors { dir: Option<PathBuf> },
    /// Distinct major.minor versions
    MajorMinor { dir: Option<PathBuf> },
    /// Credited authors per release
    Authors { dir: Option<PathBuf> },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Delete the cache entry of the configured repository
    Clear,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.then(config::log_path);
    let _guard = logger::init(&cli.log_filter, cli.log_format, log_path.as_deref())?;

    let config = DocsConfig::load_or_default(cli.config.as_deref())?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command, config))
}

async fn run(command: Command, config: DocsConfig) -> anyhow::Result<()> {
    match command {
        Command::Versions => {
            let state = resolve(&config).await?;
            print_json(&state)
        }
        Command::Collections => {
            let state = resolve(&config).await?;
            print_json(&build_collections(
                &state,
                &config.content,
                &config.content_dir(),
            ))
        }
        Command::Switcher { route } => {
            let state = resolve(&config).await?;
            print_json(&SwitcherState::resolve(&state, &route))
        }
        Command::Route {
            path,
            locale,
            locales,
        } => {
            let current = locale
                .or_else(|| locales.first().cloned())
                .unwrap_or_default();
            let context = LocaleContext {
                enabled: !locales.is_empty(),
                current,
                available: locales,
            };
            let decision = normalize_route(
                &parse_route(&path),
                &context,
                config.docs_versioning.enable,
            );
            print_json(&decision)
        }
        Command::Changelog { action } => {
            let dir = |dir: Option<PathBuf>| {
                dir.map(|d| config.resolve(&d))
                    .unwrap_or_else(|| config.changelog_dir())
            };
            match action {
                ChangelogAction::Labels { dir: d } => {
                    print_json(&changelog::labels_for_versions(&dir(d)))
                }
                ChangelogAction::Majors { dir: d } => {
                    print_json(&changelog::majors_with_date(&dir(d)))
                }
                ChangelogAction::MajorMinor { dir: d } => {
                    print_json(&changelog::versions_major_minor(&dir(d)))
                }
                ChangelogAction::Authors { dir: d } => print_json(&changelog::authors_by_release(
                    &dir(d),
                    &config.authors,
                    config.default_author(),
                )),
            }
        }
        Command::Cache {
            action: CacheAction::Clear,
        } => clear_cache(&config).await,
    }
}

async fn resolve(config: &DocsConfig) -> anyhow::Result<VersioningState> {
    let fetcher =
        GithubVersionsFetcher::from_config(config).context("Failed to create GitHub client")?;
    Ok(resolve_versions(&config.docs_versioning, &fetcher).await)
}

async fn clear_cache(config: &DocsConfig) -> anyhow::Result<()> {
    let Some(github) = &config.docs_versioning.versions.github else {
        warn!("No GitHub source configured, nothing to clear");
        return Ok(());
    };

    let cache = VersionCache::new(config.cache_dir(), config.cache.ttl);
    let removed = cache
        .clear(&github.owner, &github.repo)
        .await
        .with_context(|| {
            format!(
                "Failed to clear {}",
                cache.path(&github.owner, &github.repo).display()
            )
        })?;

    if removed {
        info!("Cleared cache for {}/{}", github.owner, github.repo);
    } else {
        info!("No cache entry for {}/{}", github.owner, github.repo);
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
