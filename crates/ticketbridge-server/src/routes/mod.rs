pub mod health;
pub mod issues;
pub mod links;

use std::sync::Arc;

use axum::{middleware, Router};

use ticketbridge_db::LinkStore;
use ticketbridge_service::{ConversionWorkflow, HealthProbe};

use crate::auth::{auth_middleware, AuthConfig};

pub struct InnerAppState {
    pub workflow: ConversionWorkflow,
    pub probe: HealthProbe,
    pub store: Arc<dyn LinkStore>,
    pub auth: Option<Arc<AuthConfig>>,
}

pub type AppState = Arc<InnerAppState>;

pub fn build_router(state: AppState) -> Router {
    let public = Router::new().merge(health::routes());

    let protected = Router::new()
        .merge(issues::routes())
        .merge(links::routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public.merge(protected).with_state(state)
}
