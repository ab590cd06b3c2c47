//! Static files: source PDFs, table images and the review client

use axum::Router;
use tabledesk_common::config::AssetsConfig;
use tower_http::services::{ServeDir, ServeFile};
use tracing::warn;

use crate::AppState;

/// `/pdf/*` and `/jpg/*` from their directories; every other unmatched path
/// goes to the client build, falling back to its index document so client
/// side routes load the app.
pub fn routes(assets: &AssetsConfig) -> Router<AppState> {
    Router::new()
        .nest_service("/pdf", ServeDir::new(&assets.pdfs_path))
        .nest_service("/jpg", ServeDir::new(&assets.jpgs_path))
        .fallback_service(client_app(assets))
}

fn client_app(assets: &AssetsConfig) -> ServeDir<ServeFile> {
    let index = assets.client_path.join(&assets.index_file);
    ServeDir::new(&assets.client_path).fallback(ServeFile::new(index))
}

/// Missing directories only produce 404s later; say so at startup
pub fn check_directories(assets: &AssetsConfig) {
    let dirs = [
        ("pdfs_path", &assets.pdfs_path),
        ("jpgs_path", &assets.jpgs_path),
        ("client_path", &assets.client_path),
    ];

    for (name, dir) in dirs {
        if !dir.is_dir() {
            warn!(setting = name, path = %dir.display(), "Asset directory is not accessible");
        }
    }
}
