use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{get_student_profile, login_student};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/student", post(login_student))
        .route("/student/profile", get(get_student_profile))
}
