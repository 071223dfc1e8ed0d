//! Vault CLI - a command-line client for the dedup file vault.
//!
//! Provides the login, listing, search, upload, and storage statistics
//! flows of the vault client from a terminal.

mod app;
mod output;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;

#[derive(Parser, Debug)]
#[command(name = "vault", version, about = "Client for the dedup file vault")]
struct Cli {
    /// Server URL, overriding config and VAULT_BASE_URL
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Create a new account
    Register {
        #[arg(short, long)]
        username: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List your files
    List(PageArgs),
    /// List files shared publicly by any user
    Public(PageArgs),
    /// Search your files
    Search(SearchArgs),
    /// Show storage usage and deduplication savings
    Stats,
    /// Upload one or more files
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,
    },
    /// Delete a file reference
    Delete { id: i64 },
    /// Make a file public
    Publish { id: i64 },
    /// Print a download link for a file
    DownloadUrl { id: i64 },
    /// Print a preview link for a file
    PreviewUrl { id: i64 },
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(short, long, default_value_t = 1)]
    page: u32,
    #[arg(long)]
    page_size: Option<u32>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Filename to match
    query: Option<String>,
    #[arg(long)]
    tags: Option<String>,
    #[arg(long)]
    mime_type: Option<String>,
    #[arg(long)]
    min_size: Option<u64>,
    #[arg(long)]
    max_size: Option<u64>,
    /// YYYY-MM-DD
    #[arg(long)]
    from: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    to: Option<String>,
    #[command(flatten)]
    paging: PageArgs,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    let cli = Cli::parse();
    info!("Vault CLI starting");

    let mut app = App::new(cli.server)?;

    match cli.command {
        Command::Login { username } => app.login(username).await,
        Command::Register { username } => app.register(username).await,
        Command::Logout => app.logout(),
        Command::Whoami => app.whoami(),
        Command::List(args) => app.list(args.page, args.page_size).await,
        Command::Public(args) => app.list_public(args.page, args.page_size).await,
        Command::Search(args) => {
            let params = vault_core::models::SearchParams {
                filename: args.query,
                tags: args.tags,
                mime_type: args.mime_type,
                min_size_bytes: args.min_size,
                max_size_bytes: args.max_size,
                start_date: args.from,
                end_date: args.to,
                page: Some(args.paging.page),
                page_size: args.paging.page_size,
            };
            app.search(params).await
        }
        Command::Stats => app.stats().await,
        Command::Upload { paths, tags } => app.upload(paths, tags).await,
        Command::Delete { id } => app.delete(id).await,
        Command::Publish { id } => app.publish(id).await,
        Command::DownloadUrl { id } => app.download_url(id),
        Command::PreviewUrl { id } => app.preview_url(id),
    }
}
