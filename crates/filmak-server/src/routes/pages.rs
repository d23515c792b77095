//! HTML pages: home, movie details, watch, settings and the 404 fallback.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use filmak_core::Profile;

use crate::context::AppContext;
use crate::views::pages;

/// GET /
pub async fn home(State(ctx): State<AppContext>) -> Html<String> {
    let (featured, groups) = tokio::join!(ctx.catalog.featured_movie(), ctx.catalog.movies_by_genre());
    Html(pages::home_page(featured.as_ref(), &groups))
}

/// GET /movie/{id}
pub async fn movie(State(ctx): State<AppContext>, Path(id): Path<String>) -> Response {
    match ctx.catalog.movie_details(&id).await {
        Some(details) => Html(pages::movie_page(&details)).into_response(),
        None => not_found_html("We couldn't find that movie."),
    }
}

/// GET /watch/{id}
pub async fn watch(State(ctx): State<AppContext>, Path(id): Path<String>) -> Response {
    let Some(movie) = ctx.catalog.movie_by_id(&id).await else {
        return not_found_html("We couldn't find that movie.");
    };
    let src = if movie.video_url.is_empty() {
        ctx.config.player.embed_url(&movie.id)
    } else {
        movie.video_url.clone()
    };
    Html(pages::watch_page(&movie, &src)).into_response()
}

/// GET /settings
pub async fn settings() -> Html<String> {
    Html(pages::settings_page(&Profile::default()))
}

/// Fallback for unknown paths.
pub async fn not_found() -> Response {
    not_found_html("This page doesn't exist.")
}

pub fn not_found_html(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Html(pages::not_found_page(message))).into_response()
}
