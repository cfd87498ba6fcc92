use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use palavra::config::Config;
use palavra::digest::{self, Digest};
use palavra::feed;
use palavra::mailer::{self, SmtpCredentials};
use palavra::server::{self, AppState};
use palavra::storage::Database;

/// Get the config directory path (~/.config/palavra/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("palavra"))
}

#[derive(Parser, Debug)]
#[command(name = "palavra", about = "Priberam word of the day: JSON API and subscriptions")]
struct Args {
    /// Config file (default: ~/.config/palavra/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the words and subscription endpoints
    Serve {
        /// Listen address, overrides `bind_address`
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
    /// Fetch the feed once and print the words as JSON
    Words,
    /// Email today's word to every subscriber
    Digest {
        /// Also write the rendered HTML here
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Render and list recipients without sending (HTML to stdout unless --out)
        #[arg(long)]
        dry_run: bool,
    },
}

async fn open_database(config: &Config, config_dir: &std::path::Path) -> Result<Database> {
    let db_path = config.resolve_database_path(config_dir);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    Database::open(db_path_str)
        .await
        .with_context(|| format!("Failed to open database at {}", db_path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palavra=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let client = config
        .http_client()
        .context("Failed to build HTTP client")?;

    match args.command {
        Command::Serve { bind } => {
            let db = open_database(&config, &config_dir).await?;
            let state = AppState::new(client, &config.feed_url, db);
            let app = server::router(state, config.static_dir.clone());
            let addr = bind.unwrap_or_else(|| config.bind_address.clone());
            server::serve(&addr, app)
                .await
                .with_context(|| format!("Server on {} failed", addr))?;
        }
        Command::Words => {
            let response = feed::fetch_words(&client, &config.feed_url)
                .await
                .context("Failed to fetch the words of the day")?;
            let json = serde_json::to_string_pretty(&response)?;
            println!("{}", json);
        }
        Command::Digest { out, dry_run } => {
            let response = feed::fetch_words(&client, &config.feed_url)
                .await
                .context("Failed to fetch the words of the day")?;
            let digest = Digest::for_first(&response.words)?;
            tracing::info!(subject = %digest.subject, "Rendered digest");

            let db = open_database(&config, &config_dir).await?;
            let recipients = digest::recipients(&db, &config.recipients_file).await?;

            match &out {
                Some(path) => {
                    std::fs::write(path, &digest.html)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Wrote digest to {}", path.display());
                }
                None if dry_run => {
                    std::io::stdout().write_all(digest.html.as_bytes())?;
                }
                None => {}
            }

            if recipients.is_empty() {
                tracing::error!("No recipients found");
                return Ok(());
            }
            if dry_run {
                tracing::info!(count = recipients.len(), "Dry run, not sending");
                return Ok(());
            }

            let credentials = SmtpCredentials::from_env(&config)?;
            let transport = mailer::smtp_transport(&config, &credentials)?;
            tracing::info!(count = recipients.len(), "Sending digest");
            let report =
                mailer::send(&transport, &credentials.sender, &digest, &recipients).await;
            if report.sent.is_empty() {
                anyhow::bail!(
                    "Digest could not be delivered to any of {} recipients",
                    report.failed.len()
                );
            }
        }
    }

    Ok(())
}
