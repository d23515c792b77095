//! JSON catalog API.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use filmak_core::{Movie, MovieDetails, MovieGenre};

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;

/// GET /api/movies
pub async fn list_movies(State(ctx): State<AppContext>) -> Json<Vec<Movie>> {
    Json(ctx.catalog.all_movies().await)
}

/// GET /api/movies/{id}
pub async fn get_movie(
    State(ctx): State<AppContext>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<MovieDetails>, AppError> {
    ctx.catalog
        .movie_details(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::new(filmak_core::Error::not_found("movie", &id)).with_request_id(request_id.0))
}

/// GET /api/genres
pub async fn list_genres(State(ctx): State<AppContext>) -> Json<Vec<MovieGenre>> {
    Json(ctx.catalog.movies_by_genre().await)
}

/// GET /api/featured
pub async fn featured(State(ctx): State<AppContext>) -> Json<Option<Movie>> {
    Json(ctx.catalog.featured_movie().await)
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<u32>,
}

/// GET /api/search?q=
pub async fn search(State(ctx): State<AppContext>, Query(params): Query<SearchQuery>) -> Json<Vec<Movie>> {
    Json(ctx.catalog.search(&params.q, params.page.unwrap_or(1)).await)
}
