use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bannerwheel::config::Config;

mod commands;

use commands::{sample, serve, watch, ServeParams, WatchParams};

#[derive(Parser)]
#[command(
    name = "bannerwheel",
    version,
    about = "Rotating promotional banner feed server and rotation client",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML); environment variables are used otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the banner feed server
    Serve {
        /// Host to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Ad catalog file (JSON or TOML)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Seed for reproducible selections
        #[arg(long)]
        seed: Option<u64>,

        /// Ads per response
        #[arg(long)]
        size: Option<usize>,

        /// Disable CORS headers
        #[arg(long, default_value = "false")]
        no_cors: bool,

        /// Disable per-request logging
        #[arg(long, default_value = "false")]
        no_request_logging: bool,
    },

    /// Run the rotation loop against a feed and print each render
    Watch {
        /// Feed URL
        #[arg(short, long)]
        url: Option<String>,

        /// Milliseconds between rotations
        #[arg(short, long)]
        interval_ms: Option<u64>,

        /// Milliseconds between fade-out and fetch
        #[arg(long)]
        fade_delay_ms: Option<u64>,

        /// Extra fetch attempts per cycle
        #[arg(long)]
        retries: Option<u32>,

        /// Stop after this many cycles
        #[arg(long)]
        cycles: Option<u64>,
    },

    /// Print random selections as JSON
    Sample {
        /// Ad catalog file (JSON or TOML)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Seed for reproducible selections
        #[arg(long)]
        seed: Option<u64>,

        /// Ads per selection
        #[arg(long)]
        size: Option<usize>,

        /// Number of selections to print
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());

    // Initialize tracing/logging
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    config.validate()?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            catalog,
            seed,
            size,
            no_cors,
            no_request_logging,
        } => {
            tracing::info!(
                host = ?host,
                port = ?port,
                catalog = ?catalog,
                seed = ?seed,
                "Starting serve command"
            );
            serve(
                config,
                ServeParams {
                    host,
                    port,
                    catalog,
                    seed,
                    size,
                    disable_cors: no_cors,
                    disable_request_logging: no_request_logging,
                },
            )
            .await?;
        }

        Commands::Watch {
            url,
            interval_ms,
            fade_delay_ms,
            retries,
            cycles,
        } => {
            tracing::info!(
                url = ?url,
                interval_ms = ?interval_ms,
                cycles = ?cycles,
                "Starting watch command"
            );
            watch(
                config,
                WatchParams {
                    feed_url: url,
                    interval_ms,
                    fade_delay_ms,
                    retries,
                    cycles,
                },
            )
            .await?;
        }

        Commands::Sample {
            catalog,
            seed,
            size,
            count,
        } => {
            sample(config, catalog, seed, size, count)?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("bannerwheel=debug,tower_http=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!("bannerwheel={level},warn"))
        })
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
