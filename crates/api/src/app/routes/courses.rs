//! Course CRUD routes.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    routing::get,
    Json, Router,
};

use coursebook_core::Entity;
use coursebook_courses::{validate_course, Course, CourseId};

use crate::app::dto::CourseBody;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route(
            "/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
}

/// Anything that is not a positive decimal id matches no course.
fn parse_id(raw: &str) -> Result<CourseId, ApiError> {
    Ok(raw.parse::<CourseId>()?)
}

/// GET /api/courses
pub async fn list_courses(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Course>>, ApiError> {
    Ok(Json(services.courses.list()?))
}

/// GET /api/courses/:id
pub async fn get_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Course>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(services.courses.get(id)?))
}

/// POST /api/courses
pub async fn create_course(
    Extension(services): Extension<Arc<AppServices>>,
    CourseBody(body): CourseBody,
) -> Result<Json<Course>, ApiError> {
    let name = validate_course(&body)?;
    let course = services.courses.create(name)?;
    tracing::info!(course_id = %course.id(), "course created");
    Ok(Json(course))
}

/// PUT /api/courses/:id - a missing course wins over an invalid body.
pub async fn update_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    CourseBody(body): CourseBody,
) -> Result<Json<Course>, ApiError> {
    let id = parse_id(&id)?;
    services.courses.get(id)?;

    let name = validate_course(&body)?;
    Ok(Json(services.courses.update(id, name)?))
}

/// DELETE /api/courses/:id
pub async fn delete_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Course>, ApiError> {
    let id = parse_id(&id)?;
    let removed = services.courses.delete(id)?;
    tracing::info!(course_id = %id, "course deleted");
    Ok(Json(removed))
}
