//! Axum router construction.
//!
//! Builds the full application router with the page routes, the JSON API,
//! middleware layers, and optional static file serving.

use std::path::PathBuf;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/movies", get(routes::api::list_movies))
        .route("/movies/{id}", get(routes::api::get_movie))
        .route("/genres", get(routes::api::list_genres))
        .route("/featured", get(routes::api::featured))
        .route("/search", get(routes::api::search))
        .route("/explore", get(routes::explore::explore_api))
        .route("/admin/movies", post(routes::admin::add_movie_json))
        .route("/upload", post(routes::upload::upload));

    let mut app = Router::new()
        .route("/", get(routes::pages::home))
        .route("/explore", get(routes::explore::explore_page))
        .route("/movie/{id}", get(routes::pages::movie))
        .route("/watch/{id}", get(routes::pages::watch))
        .route(
            "/admin",
            get(routes::admin::admin_page).post(routes::admin::submit_form),
        )
        .route("/about", get(routes::about::about_page))
        .route("/about/request", post(routes::about::request_movie))
        .route("/settings", get(routes::pages::settings))
        .route("/health", get(routes::health::health_check))
        .nest("/api", api);

    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            app = app.nest_service("/static", tower_http::services::ServeDir::new(&dir));
        } else {
            tracing::warn!("Static directory {:?} does not exist, not serving it", dir);
        }
    }

    app.fallback(routes::pages::not_found)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
