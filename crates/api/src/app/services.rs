//! Service wiring: the objects handlers reach through `Extension<Arc<AppServices>>`.

use std::sync::Arc;

use coursebook_courses::{CourseRepository, InMemoryCourseRepository};

use crate::config::AppConfig;

pub struct AppServices {
    /// The single owned course store.
    pub courses: Arc<dyn CourseRepository>,
    /// Address shown in the root greeting.
    pub public_url: String,
}

impl std::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppServices")
            .field("public_url", &self.public_url)
            .finish_non_exhaustive()
    }
}

/// Build services for a fresh process: a seeded in-memory store.
pub fn build_services(config: &AppConfig) -> AppServices {
    let repo = InMemoryCourseRepository::seeded(config.id_assignment);
    tracing::debug!(id_assignment = ?repo.assignment(), "course store seeded");

    AppServices {
        courses: Arc::new(repo),
        public_url: format!("http://localhost:{}/", config.port),
    }
}
