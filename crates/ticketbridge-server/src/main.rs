use std::net::SocketAddr;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

use ticketbridge_core::conversion::ConversionRequest;
use ticketbridge_core::message::MessageId;
use ticketbridge_db::LinkStore;
use ticketbridge_server::auth;
use ticketbridge_server::config::ServerConfig;

#[derive(Parser)]
#[command(name = "ticketbridge", about = "Turn chat messages into tracker issues")]
struct Cli {
    #[command(flatten)]
    config: ServerConfig,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Convert one message into an issue
    CreateIssue {
        /// Channel the message was posted in
        #[arg(long)]
        channel: String,
        /// Message ID to convert
        #[arg(long)]
        message: String,
        /// Issue title
        #[arg(long)]
        title: String,
        /// Comma-separated labels
        #[arg(long)]
        labels: Option<String>,
        /// Comma-separated GitHub usernames
        #[arg(long)]
        assignees: Option<String>,
    },
    /// Check link store and tracker connectivity
    Health,
    /// Show the issue linked to a message
    ShowLink {
        /// Message ID to look up
        message: String,
    },
    /// Generate a new API key
    Keygen,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let components = ticketbridge_server::build_components(&config).await?;

            let auth = auth::build_auth_config(config.api_key().as_deref());
            if auth.is_some() {
                info!("authentication enabled");
            } else {
                info!("authentication disabled (no TICKETBRIDGE_API_KEY)");
            }

            let addr = SocketAddr::new(config.bind.parse()?, config.port);
            let listener = TcpListener::bind(addr).await?;
            info!("ticketbridge listening on http://{addr}");

            let state = ticketbridge_server::app_state(components, auth);
            ticketbridge_server::serve(listener, state).await?;
        }
        Commands::CreateIssue {
            channel,
            message,
            title,
            labels,
            assignees,
        } => {
            let components = ticketbridge_server::build_components(&config).await?;
            let request = ConversionRequest {
                channel_id: channel,
                message_id: message,
                title,
                labels,
                assignees,
            };
            let result = components.workflow.convert(&request).await;
            if !result.is_success() {
                bail!("{}", result.summary());
            }
            println!("{}", result.summary());
        }
        Commands::Health => {
            let components = ticketbridge_server::build_components(&config).await?;
            let report = components.probe.check().await;
            let mark = |ok: bool| if ok { "ok" } else { "unreachable" };
            println!("store:   {}", mark(report.store));
            println!("tracker: {}", mark(report.tracker));
            println!("status:  {}", report.status_str());
            if !report.healthy() {
                std::process::exit(1);
            }
        }
        Commands::ShowLink { message } => {
            let id = MessageId::parse(&message)?;
            let store = ticketbridge_db::open_store(&config.db_config()).await?;
            match store.get_link(&id.to_string()).await? {
                Some(link) => println!("{}", serde_json::to_string_pretty(&link)?),
                None => bail!("no issue linked to message {id}"),
            }
        }
        Commands::Keygen => {
            let raw_key = auth::generate_api_key();
            // Print the raw key to stdout so it can be captured
            println!("{raw_key}");
            eprintln!("\nSet TICKETBRIDGE_API_KEY to this value to require it on the API.");
        }
    }

    Ok(())
}
