use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use secrecy::SecretString;
use std::path::PathBuf;
use tokio::sync::mpsc;

use banca::app::{App, AppEvent};
use banca::cms::CmsClient;
use banca::config::Config;
use banca::{listing, sitemap, ui};

/// Get the config directory path (~/.config/banca/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("banca"))
}

#[derive(Parser, Debug)]
#[command(name = "banca", about = "Terminal reader for a headless-CMS blog")]
struct Args {
    /// Path to config file (default: ~/.config/banca/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the sitemap XML for the configured site and exit
    #[arg(long)]
    sitemap: bool,

    /// Print the article store as JSON and exit
    #[arg(long)]
    dump_store: bool,

    /// With --dump-store, restrict to one topic slug
    #[arg(long, value_name = "SLUG", requires = "dump_store")]
    topic: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if config.api_url.is_empty() {
        eprintln!("Error: no CMS endpoint configured.");
        eprintln!();
        eprintln!("Create {} with at least:", config_path.display());
        eprintln!("  api_url = \"https://your-cms.example.com/api\"");
        eprintln!("  site_url = \"https://your-blog.example.com\"");
        eprintln!();
        eprintln!("and one [[topics]] entry per category.");
        std::process::exit(1);
    }
    config.validate().context("Invalid configuration")?;

    // Env var takes precedence over config file for the token
    let access_token = std::env::var("BANCA_ACCESS_TOKEN")
        .ok()
        .or_else(|| config.access_token.clone())
        .map(SecretString::from);

    let cms = CmsClient::new(&config.api_url, access_token).context("Failed to create CMS client")?;

    if args.sitemap {
        return print_sitemap(&cms, &config.site_url).await;
    }
    if args.dump_store {
        return dump_store(&cms, args.topic.as_deref()).await;
    }

    // Initial store fetch. A dead CMS does not block startup — the user
    // gets an empty listing and a hint to refresh.
    let mut app = App::new(cms.clone(), &config.site_url, config.topics.clone());
    match cms.fetch_all_articles().await {
        Ok(articles) => {
            tracing::info!(count = articles.len(), "Loaded article store");
            app.set_store(articles);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Initial store fetch failed, starting empty");
            app.set_status("Não foi possível carregar os artigos (r para tentar de novo)");
        }
    }

    // Event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Até logo!");
    Ok(())
}

/// `--sitemap`: fetch the store and print the sitemap XML to stdout.
///
/// A failed fetch degrades to the home entry alone rather than erroring —
/// the sitemap route always answers.
async fn print_sitemap(cms: &CmsClient, site_url: &str) -> Result<()> {
    let articles = match cms.fetch_all_articles().await {
        Ok(articles) => articles,
        Err(e) => {
            tracing::warn!(error = %e, "Store fetch failed, emitting home entry only");
            Vec::new()
        }
    };
    let entries = sitemap::build_sitemap(site_url, &articles, Utc::now());
    print!("{}", sitemap::render_xml(&entries));
    Ok(())
}

/// `--dump-store`: print article summaries as a JSON array, optionally
/// restricted to one topic.
async fn dump_store(cms: &CmsClient, topic: Option<&str>) -> Result<()> {
    let store = cms
        .fetch_all_articles()
        .await
        .context("Failed to fetch article store")?;
    let articles = match topic {
        Some(slug) => listing::view(&store, Some(slug), listing::SortMode::Recent),
        None => listing::view(&store, None, listing::SortMode::Recent),
    };

    let values: Vec<serde_json::Value> = articles
        .iter()
        .map(|a| {
            serde_json::json!({
                "id": &*a.id,
                "slug": &*a.slug,
                "title": &*a.title,
                "description": a.description.as_deref(),
                "category": a.category.as_deref(),
                "published_at": a.published_at.map(|dt| dt.to_rfc3339()),
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}
