//! Birbybot - finds, classifies and posts baby shorebird photos.
//!
//! The pipeline runs as three independent commands: `search` stores new
//! Flickr photos, `classify` decides which of them show a bird, and `post`
//! publishes a random bird photo to Twitter.

#![warn(missing_docs)]

pub mod cache;
pub mod classify;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod output;
pub mod post;
pub mod record;
pub mod search;
pub mod store;
pub mod utils;
pub mod vision;

use cache::ImageCache;
use chrono::Utc;
use classify::{ClassifySettings, TargetTerms, classify_pending};
use clap::Parser;
use cli::{ClassifyArgs, Cli, Command, GlobalArgs, PostArgs, SearchArgs};
use config::{
    Config, config_file_path, init_default_config, load_default_config, require, validate_config,
};
use constants::env;
use post::{PostOutcome, PostSettings, TwitterClient, post_random};
use search::{FlickrClient, SearchParams, ingest_terms};
use std::path::PathBuf;
use store::JsonStore;
use tracing::{debug, info};
use utils::date::start_of_month_before;
use vision::VisionClient;

pub use error::{Error, Result};

/// Main entry point for the birbybot CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet);

    let Some(command) = cli.command else {
        cli::help::print_smart_help();
        return Ok(());
    };

    match command {
        Command::Config { action } => handle_config_command(action),
        Command::Search(args) => {
            let config = load_checked_config()?;
            block_on(run_search(&args, &cli.global, &config))
        }
        Command::Classify(args) => {
            let config = load_checked_config()?;
            block_on(run_classify(&args, &cli.global, &config))
        }
        Command::Post(args) => {
            let config = load_checked_config()?;
            block_on(run_post(&args, &cli.global, &config))
        }
    }
}

fn load_checked_config() -> Result<Config> {
    let config = load_default_config()?;
    validate_config(&config)?;
    Ok(config)
}

fn block_on(task: impl Future<Output = Result<()>>) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().map_err(|e| Error::Internal {
        message: format!("Failed to create async runtime: {e}"),
    })?;
    runtime.block_on(task)
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // HTTP internals stay quiet unless tracing everything.
    let filter_str = if quiet {
        "warn".to_string()
    } else {
        match verbose {
            0 => "info,hyper=off,reqwest=warn".to_string(),
            1 => "debug,hyper=warn,reqwest=info".to_string(),
            2 => "trace,hyper=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Resolved storage locations for a run.
struct Storage {
    assets_dir: PathBuf,
    store_path: PathBuf,
}

impl Storage {
    fn resolve(global: &GlobalArgs, config: &Config) -> Result<Self> {
        let data_dir = config::data_dir()?;
        let storage = Self {
            assets_dir: global
                .assets_dir
                .clone()
                .unwrap_or_else(|| config.storage.assets_dir_or(&data_dir)),
            store_path: global
                .store
                .clone()
                .unwrap_or_else(|| config.storage.store_path_or(&data_dir)),
        };
        debug!(
            "Store: {}, assets: {}",
            storage.store_path.display(),
            storage.assets_dir.display()
        );
        Ok(storage)
    }
}

const fn show_progress(global: &GlobalArgs) -> bool {
    !global.quiet && !global.no_progress
}

async fn run_search(args: &SearchArgs, global: &GlobalArgs, config: &Config) -> Result<()> {
    let api_key = require(env::FLICKR_KEY)?;
    let storage = Storage::resolve(global, config)?;

    let http = http::build_client(&config.api)?;
    let flickr = FlickrClient::new(http, config.api.flickr_base.clone(), api_key);
    let store = JsonStore::open(storage.store_path).await?;

    let terms = if args.terms.is_empty() {
        config.search.terms.clone()
    } else {
        args.terms.clone()
    };
    let template = SearchParams {
        text: String::new(),
        licenses: config.search.licenses.clone(),
        sort: config.search.sort.clone(),
        per_page: config.search.per_page,
        min_upload_date: args
            .since
            .unwrap_or_else(|| start_of_month_before(Utc::now(), config.search.lookback_months)),
    };
    let max_pages = args.max_pages.unwrap_or(config.search.max_pages);

    let summary = ingest_terms(
        &flickr,
        &store,
        &terms,
        &template,
        max_pages,
        show_progress(global),
    )
    .await;

    info!(
        "Search complete: {} found, {} new, {} skipped",
        summary.found, summary.created, summary.skipped
    );
    Ok(())
}

async fn run_classify(args: &ClassifyArgs, global: &GlobalArgs, config: &Config) -> Result<()> {
    let api_key = require(env::VISION_API_KEY)?;
    let storage = Storage::resolve(global, config)?;

    let targets = TargetTerms::new(args.targets.as_ref().unwrap_or(&config.classify.targets));
    if targets.is_empty() {
        return Err(Error::ConfigValidation {
            message: "no target labels given".to_string(),
        });
    }
    let settings = ClassifySettings {
        targets,
        label_byte_budget: config.classify.label_byte_budget,
    };

    let http = http::build_client(&config.api)?;
    let detector = VisionClient::new(http.clone(), config.api.vision_base.clone(), api_key);
    let cache = ImageCache::new(http, storage.assets_dir);
    let store = JsonStore::open(storage.store_path).await?;

    classify_pending(&detector, &store, &cache, &settings, show_progress(global)).await?;
    Ok(())
}

async fn run_post(args: &PostArgs, global: &GlobalArgs, config: &Config) -> Result<()> {
    // A dry run never talks to Twitter, so it needs no token.
    let token = if args.dry_run {
        String::new()
    } else {
        require(env::TWITTER_ACCESS_TOKEN)?
    };
    let storage = Storage::resolve(global, config)?;

    let settings = PostSettings {
        hashtag: config.post.hashtag.clone(),
        cooldown_months: args.cooldown_months.unwrap_or(config.post.cooldown_months),
        max_chars: config.post.max_chars,
        dry_run: args.dry_run,
    };

    let http = http::build_client(&config.api)?;
    let poster = TwitterClient::new(http.clone(), config.api.twitter_base.clone(), token);
    let cache = ImageCache::new(http, storage.assets_dir);
    let store = JsonStore::open(storage.store_path).await?;

    match post_random(&poster, &store, &cache, &settings, Utc::now()).await? {
        PostOutcome::Posted {
            key, posted_at, ..
        } => info!("Posted {} at {}", key, posted_at),
        PostOutcome::DryRun { key, message } => {
            println!("{key}: {message}");
        }
    }
    Ok(())
}

fn handle_config_command(action: cli::ConfigAction) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let (path, created) = init_default_config()?;
            if created {
                println!("Created configuration file: {}", path.display());
                println!("\nNext steps:");
                println!("  Edit [search] terms and [classify] targets, then run 'birbybot search'");
            } else {
                println!("Configuration file already exists: {}", path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            let contents =
                toml::to_string_pretty(&config).map_err(|e| Error::ConfigSerialize { source: e })?;
            println!("{contents}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
