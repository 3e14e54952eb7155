use axum::{routing::get, Router};

pub mod courses;
pub mod system;

/// Router for every route handler (middleware is layered on in `app::build_app`).
pub fn router() -> Router {
    Router::new()
        .route("/", get(system::greeting))
        .nest("/api/courses", courses::router())
}
