use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::AppState;

/// Dedicated pages: kitchen, cash desk and storeroom.
pub const PAGES: [(&str, &str); 3] = [
    ("/cucina", "cucina.html"),
    ("/cassa", "cassa.html"),
    ("/magazzino", "magazzino.html"),
];

/// Serves the dedicated pages from `public_dir` and falls back to any other static asset
/// found there. Missing files answer 404.
pub fn pages_router(public_dir: &Path) -> Router<AppState> {
    let router = PAGES
        .iter()
        .fold(Router::new(), |router, (route, file)| {
            router.route_service(route, ServeFile::new(public_dir.join(file)))
        });

    router.fallback_service(ServeDir::new(public_dir))
}
