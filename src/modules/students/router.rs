use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    create_student, delete_student, get_student_by_id, get_students, reset_student_password,
    update_student,
};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_student).get(get_students))
        .route(
            "/{id}",
            get(get_student_by_id).put(update_student).delete(delete_student),
        )
        .route("/{id}/password", put(reset_student_password))
}
