//! Normalized movie model shared by every data source and view.
//!
//! TMDB responses, datastore rows and placeholder records are all mapped into
//! [`Movie`] before they reach the views. JSON field names follow the public
//! API contract (`videoURL`, `thumbnailURL`, ...).

use serde::{Deserialize, Serialize};

/// Genre label used when a source provides none.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A movie as shown in carousels, cards and the watch page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Single display genre.
    pub genre: String,
    /// Embed URL for the player iframe. Empty when the player should be
    /// derived from the movie id.
    #[serde(rename = "videoURL")]
    pub video_url: String,
    #[serde(rename = "thumbnailURL")]
    pub thumbnail_url: String,
    #[serde(rename = "backdropURL", default, skip_serializing_if = "Option::is_none")]
    pub backdrop_url: Option<String>,
    /// Carried through from the datastore; never used for gating.
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<u16>,
}

impl Movie {
    /// Release year for display, `"N/A"` when unknown.
    pub fn year_label(&self) -> String {
        self.release_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// The backdrop if present, otherwise the thumbnail.
    pub fn hero_image(&self) -> &str {
        self.backdrop_url.as_deref().unwrap_or(&self.thumbnail_url)
    }
}

/// A titled, ordered group of movies (one carousel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieGenre {
    pub title: String,
    pub movies: Vec<Movie>,
}

/// Genre reference as returned by TMDB (`{id, name}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreRef {
    pub id: u32,
    pub name: String,
}

/// One credited cast member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: String,
    #[serde(rename = "profileURL")]
    pub profile_url: String,
}

/// Full detail view of a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    pub vote_average: f64,
    pub genres: Vec<GenreRef>,
    pub cast: Vec<CastMember>,
}

impl MovieDetails {
    /// Wrap a plain movie when no richer source is available.
    pub fn from_movie(movie: Movie) -> Self {
        let genres = if movie.genre.is_empty() {
            Vec::new()
        } else {
            vec![GenreRef {
                id: 0,
                name: movie.genre.clone(),
            }]
        };
        Self {
            movie,
            vote_average: 0.0,
            genres,
            cast: Vec::new(),
        }
    }
}

/// Profile shown on the settings page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            id: "guest".into(),
            name: "Guest".into(),
            avatar_url: "https://picsum.photos/seed/avatar/96/96".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Movie {
        Movie {
            id: "603".into(),
            title: "The Matrix".into(),
            description: "A hacker learns the truth.".into(),
            genre: "Action".into(),
            video_url: String::new(),
            thumbnail_url: "https://img/w500/m.jpg".into(),
            backdrop_url: None,
            is_premium: false,
            release_year: Some(1999),
        }
    }

    #[test]
    fn serializes_with_public_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["videoURL"], "");
        assert_eq!(json["thumbnailURL"], "https://img/w500/m.jpg");
        assert_eq!(json["isPremium"], false);
        assert_eq!(json["releaseYear"], 1999);
        assert!(json.get("backdropURL").is_none());
    }

    #[test]
    fn details_flatten_movie_fields() {
        let details = MovieDetails::from_movie(sample());
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["title"], "The Matrix");
        assert_eq!(json["voteAverage"], 0.0);
        assert_eq!(json["genres"][0]["name"], "Action");
        assert!(json["cast"].as_array().unwrap().is_empty());
    }

    #[test]
    fn hero_image_prefers_backdrop() {
        let mut movie = sample();
        assert_eq!(movie.hero_image(), "https://img/w500/m.jpg");
        movie.backdrop_url = Some("https://img/w1280/b.jpg".into());
        assert_eq!(movie.hero_image(), "https://img/w1280/b.jpg");
    }

    #[test]
    fn year_label_unknown() {
        let mut movie = sample();
        movie.release_year = None;
        assert_eq!(movie.year_label(), "N/A");
    }
}
