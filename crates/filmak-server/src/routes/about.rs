//! About page and the Telegram movie-request redirect.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::context::AppContext;
use crate::views::pages::{self, RequestErrors, MOVIE_TYPES};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRequest {
    #[serde(default)]
    pub movie_name: String,
    #[serde(default)]
    pub movie_type: String,
}

impl MovieRequest {
    pub fn validate(&self) -> RequestErrors {
        let mut errors = RequestErrors::default();
        if self.movie_name.trim().chars().count() < 2 {
            errors.movie_name = Some("Movie name must be at least 2 characters.".into());
        }
        if !MOVIE_TYPES.contains(&self.movie_type.as_str()) {
            errors.movie_type = Some("Please select a type.".into());
        }
        errors
    }

    /// Pre-filled request message.
    pub fn message(&self) -> String {
        format!(
            "I want to request a movie: {} (Type: {})",
            self.movie_name.trim(),
            self.movie_type
        )
    }
}

/// `https://t.me/{contact}?text=...` for a request.
pub fn telegram_url(contact: &str, request: &MovieRequest) -> Option<String> {
    let contact = contact.trim().trim_start_matches('@');
    if contact.is_empty() {
        return None;
    }
    url::Url::parse_with_params(&format!("https://t.me/{contact}"), &[("text", request.message())])
        .ok()
        .map(String::from)
}

/// GET /about
pub async fn about_page(State(ctx): State<AppContext>) -> Html<String> {
    Html(pages::about_page(&ctx.config.about, "", MOVIE_TYPES[0], &RequestErrors::default()))
}

/// POST /about/request
pub async fn request_movie(State(ctx): State<AppContext>, Form(request): Form<MovieRequest>) -> Response {
    let mut errors = request.validate();
    if errors.is_empty() {
        match telegram_url(&ctx.config.about.telegram_contact, &request) {
            Some(url) => {
                tracing::info!(movie = %request.movie_name.trim(), kind = %request.movie_type, "Movie request");
                return Redirect::to(&url).into_response();
            }
            None => errors.movie_name = Some("Requests are not available right now.".into()),
        }
    }
    let html = pages::about_page(&ctx.config.about, &request.movie_name, &request.movie_type, &errors);
    (StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response()
}
