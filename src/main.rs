use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fraudguard::client::{ApiClient, MemoryNavigator};
use fraudguard::commands;
use fraudguard::config::Config;
use fraudguard::models::{LoginRequest, Pagination};

#[derive(Parser)]
#[command(
    name = "fraudguard",
    version,
    about = "Command-line client for the FraudGuard fraud-detection API",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// TOML config file; environment variables are used otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Sign in with this login before running the command
    #[arg(long, global = true, env = "FRAUDGUARD_LOGIN")]
    login: Option<String>,

    /// Password for --login
    #[arg(long, global = true, env = "FRAUDGUARD_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and show the account
    Login,

    /// Analyze a single text
    Analyze {
        /// Text to analyze
        text: String,
    },

    /// Analyze every non-empty line of a file
    Batch {
        /// Input file, one text per line
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show analysis history
    History {
        #[arg(short, long, default_value = "1")]
        page: u32,

        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Show analysis statistics
    Stats,

    /// List users (admin only)
    Users {
        #[arg(short, long, default_value = "1")]
        page: u32,

        #[arg(short, long, default_value = "20")]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    let log_format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(log_format, &config.logging.level, cli.verbose)?;

    tracing::info!(base_url = %config.api.base_url, "FraudGuard client starting");

    let navigator = Arc::new(MemoryNavigator::default());
    let client = ApiClient::new(&config, navigator).context("Failed to create API client")?;

    let credentials = credentials(&cli.login, &cli.password);
    if !matches!(cli.command, Commands::Login) {
        if let Some((login, password)) = credentials {
            sign_in(&client, login, password).await?;
        }
    }

    run(&client, cli.command, credentials).await?;

    let stats = client.coordinator().stats();
    tracing::debug!(
        refreshes = stats.refreshes,
        refresh_failures = stats.refresh_failures,
        retried = stats.retried,
        "Session activity"
    );

    Ok(())
}

async fn run(
    client: &ApiClient,
    command: Commands,
    credentials: Option<(&str, &str)>,
) -> Result<()> {
    match command {
        Commands::Login => {
            let (login, password) =
                credentials.context("login requires --login and --password")?;
            commands::login(client, login, password).await
        }
        Commands::Analyze { text } => {
            tracing::info!(chars = text.chars().count(), "Starting analyze command");
            commands::analyze(client, &text).await
        }
        Commands::Batch { file } => {
            tracing::info!(file = %file.display(), "Starting batch command");
            commands::batch(client, &file).await
        }
        Commands::History { page, limit } => {
            tracing::info!(page, limit, "Starting history command");
            commands::history(client, Pagination::new(page, limit)).await
        }
        Commands::Stats => commands::stats(client).await,
        Commands::Users { page, limit } => {
            tracing::info!(page, limit, "Starting users command");
            commands::users(client, Pagination::new(page, limit)).await
        }
    }
}

fn credentials<'a>(
    login: &'a Option<String>,
    password: &'a Option<String>,
) -> Option<(&'a str, &'a str)> {
    Some((login.as_deref()?, password.as_deref()?))
}

async fn sign_in(client: &ApiClient, login: &str, password: &str) -> Result<()> {
    client
        .auth()
        .login(&LoginRequest {
            login: login.to_string(),
            password: password.to_string(),
        })
        .await
        .context("Login failed")?;
    tracing::info!(login = %login, "Signed in");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("fraudguard=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("fraudguard={level},warn"))
            .context("Invalid log level")?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
