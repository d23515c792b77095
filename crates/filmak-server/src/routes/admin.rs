//! Admin form and its JSON twin.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};

use crate::admin::{add_movie, AddMovieForm, AddMovieResult};
use crate::context::AppContext;
use crate::views::pages;

/// GET /admin
pub async fn admin_page() -> Html<String> {
    Html(pages::admin_page(&AddMovieForm::default(), None))
}

/// POST /admin
pub async fn submit_form(State(ctx): State<AppContext>, Form(form): Form<AddMovieForm>) -> Response {
    let result = run(&ctx, &form).await;
    let status = if result.field_errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Html(pages::admin_page(&form, Some(&result)))).into_response()
}

/// POST /api/admin/movies
pub async fn add_movie_json(
    State(ctx): State<AppContext>,
    Json(form): Json<AddMovieForm>,
) -> (StatusCode, Json<AddMovieResult>) {
    let result = run(&ctx, &form).await;
    let status = StatusCode::from_u16(result.http_status()).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, Json(result))
}

async fn run(ctx: &AppContext, form: &AddMovieForm) -> AddMovieResult {
    add_movie(ctx.tmdb.as_deref(), ctx.datastore.as_deref(), form).await
}
