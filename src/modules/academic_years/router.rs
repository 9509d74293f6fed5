use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    create_academic_year, delete_academic_year, get_academic_year_by_id, get_academic_years,
    promote_level, set_active_semester, update_academic_year,
};

pub fn init_academic_years_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_academic_year).get(get_academic_years))
        .route(
            "/{id}",
            get(get_academic_year_by_id)
                .put(update_academic_year)
                .delete(delete_academic_year),
        )
        .route("/{id}/active-semester", put(set_active_semester))
        .route("/{id}/promote-level", post(promote_level))
}
