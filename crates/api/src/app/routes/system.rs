use std::sync::Arc;

use axum::{extract::Extension, response::Html};

use crate::app::services::AppServices;

/// GET / - static greeting.
pub async fn greeting(Extension(services): Extension<Arc<AppServices>>) -> Html<String> {
    Html(format!("Hello World! from <br /><br /> {}", services.public_url))
}
