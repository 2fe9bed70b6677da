pub mod auth;
pub mod config;
mod routes;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use ticketbridge_db::LinkStore;
use ticketbridge_providers::chat::discord::DiscordChatClient;
use ticketbridge_providers::tracker::github::GitHubTracker;
use ticketbridge_service::{ConversionWorkflow, HealthProbe};

use config::{Credentials, ServerConfig};

pub use routes::{build_router, AppState, InnerAppState};

/// Collaborators and store wired together from configuration.
pub struct Components {
    pub workflow: ConversionWorkflow,
    pub probe: HealthProbe,
    pub store: Arc<dyn LinkStore>,
}

/// Validate configuration, open the link store and build the collaborators.
pub async fn build_components(config: &ServerConfig) -> Result<Components> {
    let Credentials {
        discord_token,
        github_token,
        github_repo_owner,
        github_repo_name,
    } = config.credentials()?;

    let chat = Arc::new(
        DiscordChatClient::new(&config.discord_api_base, discord_token)
            .context("configuring discord client")?,
    );
    let tracker = Arc::new(
        GitHubTracker::new(
            &config.github_api_base,
            github_token,
            &github_repo_owner,
            &github_repo_name,
        )
        .context("configuring github client")?,
    );
    info!("tracking issues in {}", tracker.repo_slug());

    let store = ticketbridge_db::open_store(&config.db_config())
        .await
        .context("opening link store")?;

    Ok(Components {
        workflow: ConversionWorkflow::new(chat, tracker.clone(), store.clone()),
        probe: HealthProbe::new(store.clone(), tracker).with_probe_path(config.probe_path.clone()),
        store,
    })
}

pub fn app_state(components: Components, auth: Option<Arc<auth::AuthConfig>>) -> AppState {
    Arc::new(InnerAppState {
        workflow: components.workflow,
        probe: components.probe,
        store: components.store,
        auth,
    })
}

/// Serve the HTTP API until SIGINT or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let app = build_router(state).layer(TraceLayer::new_for_http());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
