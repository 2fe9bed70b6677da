use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use ticketbridge_db::{LinkStore, SqliteLinkStore};
use ticketbridge_providers::chat::mock::{sample_message, MockChatClient};
use ticketbridge_providers::tracker::mock::MockTracker;
use ticketbridge_service::{ConversionWorkflow, HealthProbe};

use crate::auth::AuthConfig;
use crate::routes::InnerAppState;

/// Channel that holds the sample messages served by the default mock chat.
pub const TEST_CHANNEL: &str = "7";

/// Router plus handles on its collaborators, for assertions.
pub struct TestApp {
    pub router: Router,
    pub chat: Arc<MockChatClient>,
    pub tracker: Arc<MockTracker>,
    pub store: Arc<dyn LinkStore>,
}

/// Build a router over the given mocks and an in-memory SQLite store.
pub fn test_app(chat: MockChatClient, tracker: MockTracker, auth: Option<Arc<AuthConfig>>) -> TestApp {
    let chat = Arc::new(chat);
    let tracker = Arc::new(tracker);
    let store: Arc<dyn LinkStore> = Arc::new(SqliteLinkStore::open_in_memory().unwrap());
    let state = Arc::new(InnerAppState {
        workflow: ConversionWorkflow::new(chat.clone(), tracker.clone(), store.clone()),
        probe: HealthProbe::new(store.clone(), tracker.clone()),
        store: store.clone(),
        auth,
    });
    TestApp {
        router: crate::routes::build_router(state),
        chat,
        tracker,
        store,
    }
}

/// Mock chat serving messages 42 and 43 in `TEST_CHANNEL`.
pub fn default_chat() -> MockChatClient {
    MockChatClient::new()
        .with_message(sample_message(42, TEST_CHANNEL))
        .with_message(sample_message(43, TEST_CHANNEL))
}

/// Build a test router with default mocks and no auth.
pub async fn test_router() -> Router {
    test_app(default_chat(), MockTracker::new(), None).router
}

/// Build a test router with auth enabled, returning (router, api_key).
pub async fn test_router_with_auth() -> (Router, String) {
    let api_key = crate::auth::generate_api_key();
    let auth = crate::auth::build_auth_config(Some(&api_key));
    let app = test_app(default_chat(), MockTracker::new(), auth);
    (app.router, api_key)
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn an axum test server for `router` on a random port.
pub async fn spawn_router(router: Router) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    TestServer {
        base_url,
        _handle: handle,
    }
}

/// Spawn a test server with default mocks and no auth.
pub async fn spawn_test_server() -> TestServer {
    spawn_router(test_router().await).await
}
