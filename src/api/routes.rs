use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let request_limit = state.config.max_request_size as usize;

    let mut router = Router::new()
        // Users
        .route("/users", post(handlers::register))
        .route("/auth/verify", post(handlers::verify_credentials))
        .route("/users/me", get(handlers::me))
        .route("/users/me/creator", post(handlers::become_creator))
        // Comics
        .route(
            "/comics",
            get(handlers::list_comics).post(handlers::create_comic),
        )
        .route("/comics/mine", get(handlers::my_comics))
        .route(
            "/comics/:id",
            get(handlers::get_comic)
                .put(handlers::update_comic)
                .delete(handlers::delete_comic),
        )
        .route("/comics/:id/publish", post(handlers::request_publish))
        .route("/comics/:id/chapters", post(handlers::create_chapter))
        .route("/chapters/:id", get(handlers::get_chapter))
        // Moderation
        .route("/admin/comics/pending", get(handlers::list_pending))
        .route("/admin/comics/:id/approve", post(handlers::approve_comic))
        .route("/admin/comics/:id/reject", post(handlers::reject_comic))
        // Uploads
        .route(
            "/uploads",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(request_limit)),
        )
        // Library
        .route(
            "/library",
            get(handlers::get_library).post(handlers::add_to_library),
        )
        .route("/library/:comic_id", delete(handlers::remove_from_library))
        .route(
            "/library/folders",
            get(handlers::list_folders).post(handlers::create_folder),
        )
        .route(
            "/library/folders/:id",
            get(handlers::get_folder).delete(handlers::delete_folder),
        )
        .route("/library/folders/:id/items", post(handlers::add_to_folder))
        .route(
            "/library/folders/:id/items/:comic_id",
            delete(handlers::remove_from_folder),
        )
        .route("/folders/:slug", get(handlers::get_public_folder))
        // Stored objects
        .route(
            "/storage/v1/object/public/:bucket/*path",
            get(handlers::serve_object),
        )
        // Internal
        .route("/_internal/health", get(handlers::health));

    // Test-only routes
    if state.config.test_mode {
        tracing::warn!("Test mode enabled, purge route is available.");
        router = router.route("/admin/purge", delete(handlers::admin_purge));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
