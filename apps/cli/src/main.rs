use clap::{Parser, Subcommand};

use qrpass_cli::config::Config;
use qrpass_cli::tags_cmd::{self, TagsAction};
use qrpass_cli::{build_context, init_tracing, qr_cmd};

#[derive(Parser, Debug)]
#[command(name = "qrpass")]
#[command(version, about = "Health status QR pass", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the self QR held locally
    Show {
        /// Fetch a freshly issued QR before printing
        #[arg(short, long)]
        refresh: bool,
    },
    /// Keep the self QR refreshed and print every state change
    Watch,
    /// Decode a scanned QR token
    Scan {
        /// Token text read from the QR code
        token: String,
    },
    /// Manage the cached tag map
    Tags {
        #[command(subcommand)]
        action: TagsAction,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(config.log_format);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Starting qrpass");

    let ctx = build_context(config).await?;
    match cli.command {
        Command::Show { refresh } => qr_cmd::show(&ctx, refresh).await,
        Command::Watch => qr_cmd::watch(&ctx).await,
        Command::Scan { token } => qr_cmd::scan(&ctx, &token).await,
        Command::Tags { action } => tags_cmd::run(&ctx, action).await,
    }
}
