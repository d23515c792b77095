//! TMDB (The Movie Database) API client.
//!
//! Provides trending, popular, discover, search and detail lookups for
//! movies, plus the mapping from TMDB payloads into [`Movie`] and
//! [`MovieDetails`]. Rate-limited to stay under TMDB's API limits.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use filmak_core::config::TmdbConfig;
use filmak_core::explore::ExploreFilters;
use filmak_core::genre::{display_genre, DISPLAY_GENRES};
use filmak_core::{CastMember, GenreRef, Movie, MovieDetails, MovieGenre, UNCATEGORIZED};

use crate::catalog::MovieSource;

const SERVICE: &str = "tmdb";

/// Number of cast members kept on the detail page.
const CAST_LIMIT: usize = 10;

/// Title of the fallback carousel when no genre carousel could be built.
pub const TRENDING_TITLE: &str = "Trending Now";

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct TmdbClient {
    http: reqwest::Client,
    api_key: String,
    language: String,
    base_url: String,
    image_base_url: String,
    limiter: Arc<RateLimiter<governor::state::NotKeyed, governor::state::InMemoryState, governor::clock::DefaultClock>>,
}

impl TmdbClient {
    /// Build a client from config. Returns `None` when no API key is set.
    pub fn from_config(config: &TmdbConfig) -> Option<Self> {
        let api_key = config.api_key.as_deref()?.trim();
        if api_key.is_empty() {
            return None;
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build TMDB HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

        Some(Self {
            http,
            api_key: api_key.to_string(),
            language: config.language.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
            limiter,
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str, extra_params: &[(&str, &str)]) -> filmak_core::Result<T> {
        self.limiter.until_ready().await;

        let url = format!("{}{path}", self.base_url);
        let mut params: Vec<(&str, &str)> = vec![
            ("api_key", self.api_key.as_str()),
            ("language", self.language.as_str()),
        ];
        params.extend_from_slice(extra_params);

        tracing::debug!(path, "TMDB request");

        let resp = self.http.get(&url).query(&params).send().await
            .map_err(|e| filmak_core::Error::upstream(SERVICE, format!("request failed: {e}")))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(filmak_core::Error::not_found("tmdb resource", path));
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(filmak_core::Error::upstream(SERVICE, format!("{status}: {body}")));
        }

        resp.json::<T>().await
            .map_err(|e| filmak_core::Error::upstream(SERVICE, format!("parse error: {e}")))
    }

    // -----------------------------------------------------------------------
    // Lists
    // -----------------------------------------------------------------------

    pub async fn movie_genres(&self) -> filmak_core::Result<Vec<GenreRef>> {
        let resp: TmdbGenreList = self.get("/genre/movie/list", &[]).await?;
        Ok(resp.genres)
    }

    pub async fn trending_movies(&self) -> filmak_core::Result<Vec<TmdbMovieSummary>> {
        let resp: TmdbPage = self.get("/trending/movie/week", &[]).await?;
        Ok(resp.results)
    }

    pub async fn popular_movies(&self) -> filmak_core::Result<Vec<TmdbMovieSummary>> {
        let resp: TmdbPage = self.get("/movie/popular", &[]).await?;
        Ok(resp.results)
    }

    pub async fn discover_movies(&self, params: &DiscoverParams) -> filmak_core::Result<Vec<TmdbMovieSummary>> {
        let pairs = params.to_pairs();
        let borrowed: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let resp: TmdbPage = self.get("/discover/movie", &borrowed).await?;
        Ok(resp.results)
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    pub async fn search_movie(&self, query: &str, page: u32) -> filmak_core::Result<Vec<TmdbMovieSummary>> {
        let page = page.max(1).to_string();
        let params: Vec<(&str, &str)> = vec![
            ("query", query),
            ("page", page.as_str()),
            ("include_adult", "false"),
        ];
        let resp: TmdbPage = self.get("/search/movie", &params).await?;
        Ok(resp.results)
    }

    // -----------------------------------------------------------------------
    // Details
    // -----------------------------------------------------------------------

    pub async fn get_movie(&self, id: u64) -> filmak_core::Result<TmdbMovie> {
        self.get(&format!("/movie/{id}"), &[]).await
    }

    /// Movie details with the `credits` sub-resource appended.
    pub async fn get_movie_with_credits(&self, id: u64) -> filmak_core::Result<TmdbMovie> {
        self.get(&format!("/movie/{id}"), &[("append_to_response", "credits")]).await
    }

    // -----------------------------------------------------------------------
    // Mapping
    // -----------------------------------------------------------------------

    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    /// Map a list entry. `genres` resolves the first `genre_ids` entry; the
    /// display genres are consulted when it is empty.
    pub fn summary_to_movie(&self, summary: &TmdbMovieSummary, genres: &[GenreRef]) -> Movie {
        let genre = summary
            .genre_ids
            .first()
            .and_then(|id| {
                genres
                    .iter()
                    .find(|g| g.id == *id)
                    .map(|g| g.name.clone())
                    .or_else(|| display_genre(*id).map(|g| g.name.to_string()))
            })
            .unwrap_or_else(|| UNCATEGORIZED.to_string());

        Movie {
            id: summary.id.to_string(),
            title: summary.title.clone().unwrap_or_default(),
            description: summary.overview.clone().unwrap_or_default(),
            genre,
            video_url: String::new(),
            thumbnail_url: poster_url(&self.image_base_url, summary.poster_path.as_deref(), summary.id),
            backdrop_url: Some(backdrop_url(&self.image_base_url, summary.backdrop_path.as_deref(), summary.id)),
            is_premium: false,
            release_year: parse_year(summary.release_date.as_deref()),
        }
    }

    /// Map a full movie record.
    pub fn movie_to_movie(&self, movie: &TmdbMovie) -> Movie {
        Movie {
            id: movie.id.to_string(),
            title: movie.title.clone().unwrap_or_default(),
            description: movie.overview.clone().unwrap_or_default(),
            genre: movie
                .genres
                .first()
                .map(|g| g.name.clone())
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            video_url: String::new(),
            thumbnail_url: poster_url(&self.image_base_url, movie.poster_path.as_deref(), movie.id),
            backdrop_url: Some(backdrop_url(&self.image_base_url, movie.backdrop_path.as_deref(), movie.id)),
            is_premium: false,
            release_year: parse_year(movie.release_date.as_deref()),
        }
    }

    /// Map a full movie record, including credits when present.
    pub fn movie_to_details(&self, movie: TmdbMovie) -> MovieDetails {
        let base = self.movie_to_movie(&movie);
        let cast = movie
            .credits
            .map(|c| c.cast)
            .unwrap_or_default()
            .into_iter()
            .take(CAST_LIMIT)
            .map(|member| CastMember {
                profile_url: profile_url(&self.image_base_url, member.profile_path.as_deref(), member.id),
                id: member.id,
                name: member.name,
                character: member.character.unwrap_or_default(),
            })
            .collect();

        MovieDetails {
            movie: base,
            vote_average: movie.vote_average.unwrap_or(0.0),
            genres: movie.genres,
            cast,
        }
    }

    /// One carousel per display genre that TMDB knows about, falling back
    /// to the first five TMDB genres, then to a single trending carousel.
    async fn genre_carousels(&self) -> filmak_core::Result<Vec<MovieGenre>> {
        let all_genres = self.movie_genres().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "TMDB genre list unavailable");
            Vec::new()
        });

        let mut to_show: Vec<GenreRef> = DISPLAY_GENRES
            .iter()
            .filter(|d| all_genres.iter().any(|g| g.id == d.id))
            .map(|d| GenreRef {
                id: d.id,
                name: d.name.to_string(),
            })
            .collect();
        if to_show.is_empty() {
            to_show = all_genres.iter().take(DISPLAY_GENRES.len()).cloned().collect();
        }

        let mut carousels = Vec::new();
        for genre in &to_show {
            match self.discover_movies(&DiscoverParams::for_genre(genre.id)).await {
                Ok(results) => carousels.push(MovieGenre {
                    title: genre.name.clone(),
                    movies: results
                        .iter()
                        .map(|r| self.summary_to_movie(r, &all_genres))
                        .collect(),
                }),
                Err(e) => tracing::warn!(genre = %genre.name, error = %e, "TMDB discover failed"),
            }
        }

        if carousels.is_empty() {
            let trending = self.trending_movies().await?;
            if !trending.is_empty() {
                carousels.push(MovieGenre {
                    title: TRENDING_TITLE.to_string(),
                    movies: trending
                        .iter()
                        .map(|r| self.summary_to_movie(r, &all_genres))
                        .collect(),
                });
            }
        }

        Ok(carousels)
    }
}

#[async_trait]
impl MovieSource for TmdbClient {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn all_movies(&self) -> filmak_core::Result<Vec<Movie>> {
        let trending = self.trending_movies().await?;
        if trending.is_empty() {
            return Ok(Vec::new());
        }
        let genres = self.movie_genres().await.unwrap_or_default();
        Ok(trending.iter().map(|r| self.summary_to_movie(r, &genres)).collect())
    }

    async fn movie_by_id(&self, id: &str) -> filmak_core::Result<Option<Movie>> {
        let Ok(tmdb_id) = id.parse::<u64>() else {
            return Ok(None);
        };
        match self.get_movie(tmdb_id).await {
            Ok(movie) => Ok(Some(self.movie_to_movie(&movie))),
            Err(filmak_core::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn movies_by_genre(&self) -> filmak_core::Result<Vec<MovieGenre>> {
        self.genre_carousels().await
    }

    async fn featured_candidates(&self, pool: usize) -> filmak_core::Result<Vec<Movie>> {
        let popular = self.popular_movies().await?;
        Ok(popular
            .iter()
            .take(pool)
            .map(|r| self.summary_to_movie(r, &[]))
            .collect())
    }

    async fn refresh_featured(&self, movie: Movie) -> Movie {
        let Ok(id) = movie.id.parse::<u64>() else {
            return movie;
        };
        match self.get_movie(id).await {
            Ok(full) => self.movie_to_movie(&full),
            Err(e) => {
                tracing::warn!(id, error = %e, "TMDB featured detail lookup failed");
                movie
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Discover parameters
// ---------------------------------------------------------------------------

/// Query parameters for `/discover/movie`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoverParams {
    pub genre: Option<u32>,
    pub year: Option<u16>,
    pub min_rating: Option<f32>,
    pub page: u32,
}

impl DiscoverParams {
    /// Most popular movies of one genre.
    pub fn for_genre(genre: u32) -> Self {
        Self {
            genre: Some(genre),
            page: 1,
            ..Self::default()
        }
    }

    /// Parameters for the explore grid.
    pub fn from_filters(filters: &ExploreFilters, page: u32) -> Self {
        Self {
            genre: filters.genre,
            year: filters.year,
            min_rating: filters.rating,
            page: page.max(1),
        }
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("include_adult", "false".to_string()),
            ("include_video", "false".to_string()),
            ("page", self.page.max(1).to_string()),
            ("sort_by", "popularity.desc".to_string()),
        ];
        if let Some(genre) = self.genre {
            pairs.push(("with_genres", genre.to_string()));
        }
        if let Some(year) = self.year {
            pairs.push(("primary_release_year", year.to_string()));
        }
        if let Some(rating) = self.min_rating.filter(|r| *r > 0.0) {
            pairs.push(("vote_average.gte", rating.to_string()));
        }
        pairs
    }
}

// ---------------------------------------------------------------------------
// Image URLs
// ---------------------------------------------------------------------------

/// Poster URL (`w500`), or a seeded placeholder image.
pub fn poster_url(image_base: &str, path: Option<&str>, id: u64) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{image_base}/w500{p}"),
        _ => format!("https://picsum.photos/seed/{id}/500/281"),
    }
}

/// Backdrop URL (`w1280`), or a seeded placeholder image.
pub fn backdrop_url(image_base: &str, path: Option<&str>, id: u64) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{image_base}/w1280{p}"),
        _ => format!("https://picsum.photos/seed/hero-{id}/1280/720"),
    }
}

/// Cast profile URL (`w185`), or a seeded placeholder image.
pub fn profile_url(image_base: &str, path: Option<&str>, id: u64) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{image_base}/w185{p}"),
        _ => format!("https://picsum.photos/seed/cast-{id}/185/278"),
    }
}

/// Extract a four-digit year from a date string like `"2023-04-15"`.
pub fn parse_year(date: Option<&str>) -> Option<u16> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse::<u16>().ok())
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbPage {
    #[serde(default)]
    results: Vec<TmdbMovieSummary>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenreList {
    #[serde(default)]
    genres: Vec<GenreRef>,
}

/// Entry of a TMDB movie list (trending, popular, discover, search).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbMovieSummary {
    pub id: u64,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    pub vote_average: Option<f64>,
}

/// Full TMDB movie record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<GenreRef>,
    pub vote_average: Option<f64>,
    pub credits: Option<TmdbCredits>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbCastMember {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TmdbClient {
        let config = TmdbConfig {
            api_key: Some("key".into()),
            ..TmdbConfig::default()
        };
        TmdbClient::from_config(&config).unwrap()
    }

    fn summary(id: u64, genre_ids: Vec<u32>) -> TmdbMovieSummary {
        TmdbMovieSummary {
            id,
            title: Some("Inception".into()),
            overview: Some("Dreams within dreams.".into()),
            release_date: Some("2010-07-15".into()),
            poster_path: Some("/poster.jpg".into()),
            backdrop_path: None,
            genre_ids,
            vote_average: Some(8.4),
        }
    }

    #[test]
    fn no_client_without_key() {
        assert!(TmdbClient::from_config(&TmdbConfig::default()).is_none());
        let blank = TmdbConfig {
            api_key: Some("  ".into()),
            ..TmdbConfig::default()
        };
        assert!(TmdbClient::from_config(&blank).is_none());
    }

    #[test]
    fn summary_mapping_resolves_genre_and_images() {
        let genres = vec![GenreRef { id: 12, name: "Adventure".into() }];
        let movie = client().summary_to_movie(&summary(27205, vec![12, 28]), &genres);
        assert_eq!(movie.id, "27205");
        assert_eq!(movie.genre, "Adventure");
        assert_eq!(movie.release_year, Some(2010));
        assert_eq!(movie.thumbnail_url, "https://image.tmdb.org/t/p/w500/poster.jpg");
        assert_eq!(
            movie.backdrop_url.as_deref(),
            Some("https://picsum.photos/seed/hero-27205/1280/720")
        );
        assert!(movie.video_url.is_empty());
    }

    #[test]
    fn summary_mapping_falls_back_to_display_genres() {
        let movie = client().summary_to_movie(&summary(1, vec![878]), &[]);
        assert_eq!(movie.genre, "Science Fiction");
        let movie = client().summary_to_movie(&summary(1, vec![]), &[]);
        assert_eq!(movie.genre, UNCATEGORIZED);
    }

    #[test]
    fn details_keep_top_cast() {
        let cast = (0..15)
            .map(|i| TmdbCastMember {
                id: i,
                name: format!("Actor {i}"),
                character: None,
                profile_path: (i == 0).then(|| "/p.jpg".to_string()),
            })
            .collect();
        let movie = TmdbMovie {
            id: 603,
            title: Some("The Matrix".into()),
            overview: None,
            release_date: None,
            poster_path: None,
            backdrop_path: Some("/b.jpg".into()),
            genres: vec![GenreRef { id: 28, name: "Action".into() }],
            vote_average: Some(8.2),
            credits: Some(TmdbCredits { cast }),
        };
        let details = client().movie_to_details(movie);
        assert_eq!(details.cast.len(), CAST_LIMIT);
        assert_eq!(details.cast[0].profile_url, "https://image.tmdb.org/t/p/w185/p.jpg");
        assert_eq!(details.cast[1].profile_url, "https://picsum.photos/seed/cast-1/185/278");
        assert_eq!(details.movie.genre, "Action");
        assert_eq!(details.vote_average, 8.2);
        assert_eq!(details.movie.thumbnail_url, "https://picsum.photos/seed/603/500/281");
    }

    #[test]
    fn discover_params_from_filters() {
        let filters = ExploreFilters::from_query("genre=35&year=1999&rating=6.5");
        let pairs = DiscoverParams::from_filters(&filters, 2).to_pairs();
        let get = |k: &str| pairs.iter().find(|(key, _)| *key == k).map(|(_, v)| v.as_str());
        assert_eq!(get("with_genres"), Some("35"));
        assert_eq!(get("primary_release_year"), Some("1999"));
        assert_eq!(get("vote_average.gte"), Some("6.5"));
        assert_eq!(get("page"), Some("2"));
        assert_eq!(get("sort_by"), Some("popularity.desc"));
        assert_eq!(get("include_adult"), Some("false"));
    }

    #[test]
    fn discover_params_omit_unset_filters() {
        let pairs = DiscoverParams::from_filters(&ExploreFilters::default(), 0).to_pairs();
        assert!(pairs.iter().all(|(k, _)| !k.starts_with("with_") && *k != "vote_average.gte"));
        assert!(pairs.contains(&("page", "1".to_string())));
    }

    #[test]
    fn year_parsing() {
        assert_eq!(parse_year(Some("2023-04-15")), Some(2023));
        assert_eq!(parse_year(Some("1999")), Some(1999));
        assert_eq!(parse_year(Some("")), None);
        assert_eq!(parse_year(None), None);
    }
}
