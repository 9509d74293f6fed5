use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{get_registration_context, submit_registration};

pub fn init_registrations_router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_registration))
        .route("/context", get(get_registration_context))
}
