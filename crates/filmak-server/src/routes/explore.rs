//! Explore grid: the HTML page and its JSON pagination endpoint.

use axum::extract::{RawQuery, State};
use axum::response::Html;
use axum::Json;
use chrono::Datelike;
use serde::Serialize;

use filmak_core::explore::{page_from_query, ExploreFilters};
use filmak_core::Movie;

use crate::context::AppContext;
use crate::views::{explore as view, movie_cards};

/// GET /explore
///
/// Always renders the first page; later pages come from `/api/explore`.
pub async fn explore_page(State(ctx): State<AppContext>, RawQuery(query): RawQuery) -> Html<String> {
    let filters = ExploreFilters::from_query(query.as_deref().unwrap_or_default());
    let movies = ctx.catalog.discover(&filters, 1).await;
    let current_year = u16::try_from(chrono::Utc::now().year()).unwrap_or(u16::MAX);
    Html(view::explore_page(&filters, &movies, current_year))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreResponse {
    pub page: u32,
    pub has_more: bool,
    pub query: String,
    pub movies: Vec<Movie>,
    /// Rendered cards, appended to the grid by the page script.
    pub html: String,
}

/// GET /api/explore
pub async fn explore_api(State(ctx): State<AppContext>, RawQuery(query): RawQuery) -> Json<ExploreResponse> {
    let raw = query.as_deref().unwrap_or_default();
    let filters = ExploreFilters::from_query(raw);
    let page = page_from_query(raw);
    let movies = ctx.catalog.discover(&filters, page).await;

    Json(ExploreResponse {
        page,
        has_more: view::has_more(&movies),
        query: filters.to_query(),
        html: movie_cards(&movies),
        movies,
    })
}
