use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_academic_period, delete_academic_period, get_academic_period_by_id,
    get_academic_periods, update_academic_period,
};

pub fn init_academic_periods_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_academic_period).get(get_academic_periods))
        .route(
            "/{id}",
            get(get_academic_period_by_id)
                .put(update_academic_period)
                .delete(delete_academic_period),
        )
}
