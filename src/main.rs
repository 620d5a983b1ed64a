use clap::{Parser, Subcommand};
use moments_gal::source::{ContentSource, HttpContentSource};
use moments_gal::{config, output, server};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "moments-gal")]
#[command(about = "Photo-moment gallery served from a headless content API")]
#[command(long_about = "\
Photo-moment gallery served from a headless content API

Moments are titled photo collections with a location, a date and a rich-text
description. They live in the content API; this program only reads them:

  GET {content_url}/api/moments?populate=image

Every page view fetches the collection again, so edits show up immediately.

Pages:
  /              Masonry grid of every moment that has at least one photo
  /moment/{id}   All photos of one moment, then its description

Configuration (later wins):
  stock defaults → moments.toml (or --config) → MOMENTS_CONTENT_URL

A .env file in the working directory is loaded before the environment is read.
Run 'moments-gal gen-config' to print a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./moments.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the gallery over HTTP
    Serve {
        /// Address to listen on, overriding server.bind
        #[arg(long)]
        bind: Option<String>,
    },
    /// Fetch the collection once and print an inventory
    Check,
    /// Print a stock config file with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("moments_gal=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind } => {
            let site_config = load_config(cli.config.as_deref())?;
            let addr = bind.unwrap_or_else(|| site_config.server.bind.clone());
            server::serve(site_config, &addr).await?;
        }
        Command::Check => {
            let site_config = load_config(cli.config.as_deref())?;
            let source = HttpContentSource::new(
                site_config.base_url(),
                Duration::from_secs(site_config.fetch.timeout_secs),
            )?;
            println!("==> Checking {}", source.url());
            let moments = source.fetch_moments().await?;
            output::print_check_output(&moments, &site_config);
            println!("==> Content is reachable");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<config::SiteConfig, config::ConfigError> {
    config::load_config(path, |key| std::env::var(key).ok())
}
