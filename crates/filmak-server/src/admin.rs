//! Admin "add movie" action.
//!
//! Looks the submitted title up on TMDB, builds a datastore row from the
//! best match, and inserts it. Every failure comes back as a structured
//! [`AddMovieResult`] so the form can render it inline.

use serde::{Deserialize, Serialize};

use filmak_core::UNCATEGORIZED;

use crate::supabase::{MovieRow, SupabaseClient};
use crate::tmdb::{backdrop_url, parse_year, poster_url, TmdbClient, TmdbMovie};

pub const MIN_TITLE_LEN: usize = 2;
pub const MIN_DESCRIPTION_LEN: usize = 10;

const EXPECTED_COLUMNS: &str =
    "tmdb_id, title, description, genre, release_year, thumbnail_url, backdrop_url, video_url, is_premium";

/// Submitted admin form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMovieForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_url: String,
}

impl AddMovieForm {
    /// Field-level validation.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.title.trim().chars().count() < MIN_TITLE_LEN {
            errors.title = Some(format!("Title must be at least {MIN_TITLE_LEN} characters."));
        }
        if self.description.trim().chars().count() < MIN_DESCRIPTION_LEN {
            errors.description = Some(format!(
                "Description must be at least {MIN_DESCRIPTION_LEN} characters."
            ));
        }
        if !is_valid_video_url(self.video_url.trim()) {
            errors.video_url = Some("Please enter a valid URL.".to_string());
        }
        errors
    }
}

/// Whether `s` is an absolute `http`/`https` URL with a host.
pub fn is_valid_video_url(s: &str) -> bool {
    url::Url::parse(s)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some_and(|h| !h.is_empty()))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.video_url.is_none()
    }
}

/// Outcome of [`add_movie`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMovieResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub field_errors: FieldErrors,
    /// Title of the inserted movie, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl AddMovieResult {
    fn saved(title: String) -> Self {
        Self {
            success: true,
            error: None,
            field_errors: FieldErrors::default(),
            title: Some(title),
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            field_errors: FieldErrors::default(),
            title: None,
        }
    }

    fn invalid(field_errors: FieldErrors) -> Self {
        Self {
            field_errors,
            ..Self::failed("Invalid input.")
        }
    }

    /// Status for the JSON variant of the action.
    pub fn http_status(&self) -> u16 {
        if self.success {
            201
        } else if !self.field_errors.is_empty() {
            422
        } else {
            502
        }
    }
}

/// Validate, enrich from TMDB and insert one movie row.
pub async fn add_movie(
    tmdb: Option<&TmdbClient>,
    datastore: Option<&SupabaseClient>,
    form: &AddMovieForm,
) -> AddMovieResult {
    let field_errors = form.validate();
    if !field_errors.is_empty() {
        return AddMovieResult::invalid(field_errors);
    }

    let title = form.title.trim();

    let Some(tmdb) = tmdb else {
        return AddMovieResult::failed("TMDB API key is not configured.");
    };

    let results = match tmdb.search_movie(title, 1).await {
        Ok(results) => results,
        Err(e) => {
            tracing::warn!(title, error = %e, "Admin TMDB search failed");
            return AddMovieResult::failed("Could not search for movie on TMDB.");
        }
    };
    let Some(first) = results.first() else {
        return AddMovieResult::failed(format!("Could not find a movie matching \"{title}\" on TMDB."));
    };

    let details = match tmdb.get_movie(first.id).await {
        Ok(details) => details,
        Err(e) => {
            tracing::warn!(tmdb_id = first.id, error = %e, "Admin TMDB detail lookup failed");
            return AddMovieResult::failed("Could not fetch movie details from TMDB.");
        }
    };

    let row = build_row(&details, form, tmdb.image_base_url());

    let Some(datastore) = datastore else {
        return AddMovieResult::failed("The movie database is not configured.");
    };

    match datastore.insert_movie(&row).await {
        Ok(()) => {
            tracing::info!(tmdb_id = details.id, title = %row.title, "Movie added");
            AddMovieResult::saved(row.title)
        }
        Err(e) => {
            tracing::error!(error = %e, "Datastore insert failed");
            let reason = match e {
                filmak_core::Error::Upstream { message, .. } => message,
                other => other.to_string(),
            };
            AddMovieResult::failed(format!(
                "Failed to save movie to database: {reason}. Make sure your '{}' table has the following columns: {EXPECTED_COLUMNS}.",
                datastore.table()
            ))
        }
    }
}

/// Row for a TMDB match, preferring TMDB text and falling back to the form.
pub fn build_row(details: &TmdbMovie, form: &AddMovieForm, image_base: &str) -> MovieRow {
    let title = details
        .title
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| form.title.trim().to_string());
    let description = details
        .overview
        .clone()
        .filter(|o| !o.is_empty())
        .unwrap_or_else(|| form.description.trim().to_string());

    MovieRow {
        id: None,
        tmdb_id: Some(details.id),
        title,
        description: Some(description),
        genre: Some(
            details
                .genres
                .first()
                .map(|g| g.name.clone())
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
        ),
        release_year: parse_year(details.release_date.as_deref()).map(|y| y.to_string()),
        thumbnail_url: Some(poster_url(image_base, details.poster_path.as_deref(), details.id)),
        backdrop_url: Some(backdrop_url(image_base, details.backdrop_path.as_deref(), details.id)),
        video_url: Some(form.video_url.trim().to_string()),
        is_premium: Some(false),
    }
}
