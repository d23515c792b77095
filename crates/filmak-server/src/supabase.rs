//! Supabase (PostgREST) datastore client.
//!
//! Reads and inserts rows of the movies table over the REST interface,
//! authenticating with the project's anon key.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use filmak_core::config::SupabaseConfig;
use filmak_core::genre::group_by_genre;
use filmak_core::{Movie, MovieGenre, UNCATEGORIZED};

use crate::catalog::MovieSource;

const SERVICE: &str = "supabase";

/// Prefix of movie ids taken from a row's primary key, keeping them apart
/// from TMDB ids.
pub const ROW_ID_PREFIX: &str = "ds-";

pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    table: String,
}

impl SupabaseClient {
    /// Build a client from config. Returns `None` unless both the URL and
    /// the anon key are set.
    pub fn from_config(config: &SupabaseConfig) -> Option<Self> {
        if !config.is_configured() {
            return None;
        }
        let base_url = config.url.as_deref()?.trim().trim_end_matches('/').to_string();
        let anon_key = config.anon_key.as_deref()?.trim().to_string();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build datastore HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        Some(Self {
            http,
            base_url,
            anon_key,
            table: config.table.clone(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.endpoint())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    async fn fetch_rows(&self, params: &[(&str, &str)]) -> filmak_core::Result<Vec<MovieRow>> {
        tracing::debug!(table = %self.table, ?params, "Datastore select");

        let resp = self
            .request(reqwest::Method::GET)
            .query(params)
            .send()
            .await
            .map_err(|e| filmak_core::Error::upstream(SERVICE, format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(filmak_core::Error::upstream(SERVICE, format!("{status}: {body}")));
        }

        resp.json::<Vec<MovieRow>>()
            .await
            .map_err(|e| filmak_core::Error::upstream(SERVICE, format!("parse error: {e}")))
    }

    /// Every row of the movies table.
    pub async fn list_movies(&self) -> filmak_core::Result<Vec<MovieRow>> {
        self.fetch_rows(&[("select", "*")]).await
    }

    /// A single row. Ids carrying [`ROW_ID_PREFIX`] match the primary key,
    /// other numeric ids match `tmdb_id`, anything else the primary key.
    pub async fn find_movie(&self, id: &str) -> filmak_core::Result<Option<MovieRow>> {
        let (column, key) = match id.strip_prefix(ROW_ID_PREFIX) {
            Some(key) => ("id", key),
            None if id.parse::<u64>().is_ok() => ("tmdb_id", id),
            None => ("id", id),
        };
        let filter = format!("eq.{key}");
        let rows = self
            .fetch_rows(&[("select", "*"), (column, filter.as_str()), ("limit", "1")])
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Insert one row.
    pub async fn insert_movie(&self, row: &MovieRow) -> filmak_core::Result<()> {
        tracing::info!(table = %self.table, title = %row.title, "Inserting movie");

        let resp = self
            .request(reqwest::Method::POST)
            .header("Prefer", "return=minimal")
            .json(&[row])
            .send()
            .await
            .map_err(|e| filmak_core::Error::upstream(SERVICE, format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| format!("{status}: {body}"));
            return Err(filmak_core::Error::upstream(SERVICE, message));
        }
        Ok(())
    }

    /// Cheap reachability probe.
    pub async fn ping(&self) -> filmak_core::Result<()> {
        self.fetch_rows(&[("select", "*"), ("limit", "1")]).await.map(|_| ())
    }
}

#[async_trait]
impl MovieSource for SupabaseClient {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn all_movies(&self) -> filmak_core::Result<Vec<Movie>> {
        let rows = self.list_movies().await?;
        Ok(rows.into_iter().filter_map(MovieRow::into_movie).collect())
    }

    async fn movie_by_id(&self, id: &str) -> filmak_core::Result<Option<Movie>> {
        Ok(self.find_movie(id).await?.and_then(MovieRow::into_movie))
    }

    async fn movies_by_genre(&self) -> filmak_core::Result<Vec<MovieGenre>> {
        let movies = self.all_movies().await?;
        Ok(group_by_genre(&movies))
    }

    async fn featured_candidates(&self, pool: usize) -> filmak_core::Result<Vec<Movie>> {
        let mut movies = self.all_movies().await?;
        movies.truncate(pool);
        Ok(movies)
    }
}

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row of the movies table. Columns other than `title` are optional so
/// partially filled rows still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRow {
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub tmdb_id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub release_year: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub backdrop_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub is_premium: Option<bool>,
}

impl MovieRow {
    /// Map into the shared model. Rows without any identifier are dropped.
    ///
    /// The TMDB id is preferred as the movie id so that detail pages can
    /// enrich datastore rows from TMDB. Rows without one fall back to
    /// their primary key behind [`ROW_ID_PREFIX`].
    pub fn into_movie(self) -> Option<Movie> {
        let id = match self.tmdb_id {
            Some(tmdb_id) => tmdb_id.to_string(),
            None => format!("{ROW_ID_PREFIX}{}", non_empty(self.id)?.trim()),
        };

        let thumbnail_url = non_empty(self.thumbnail_url)
            .unwrap_or_else(|| format!("https://picsum.photos/seed/{id}/500/281"));

        Some(Movie {
            title: self.title,
            description: self.description.unwrap_or_default(),
            genre: non_empty(self.genre).unwrap_or_else(|| UNCATEGORIZED.to_string()),
            video_url: non_empty(self.video_url).unwrap_or_default(),
            thumbnail_url,
            backdrop_url: non_empty(self.backdrop_url),
            is_premium: self.is_premium.unwrap_or(false),
            release_year: self
                .release_year
                .as_deref()
                .and_then(|y| y.trim().get(..4))
                .and_then(|y| y.parse().ok()),
            id,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accept a JSON string or number, yielding its string form.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_client_when_half_configured() {
        let config = SupabaseConfig {
            url: Some("https://x.supabase.co".into()),
            ..SupabaseConfig::default()
        };
        assert!(SupabaseClient::from_config(&config).is_none());
    }

    #[test]
    fn endpoint_uses_table() {
        let config = SupabaseConfig {
            url: Some("https://x.supabase.co/".into()),
            anon_key: Some("anon".into()),
            ..SupabaseConfig::default()
        };
        let client = SupabaseClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint(), "https://x.supabase.co/rest/v1/movies");
    }

    #[test]
    fn row_accepts_numeric_and_string_columns() {
        let row: MovieRow = serde_json::from_value(json!({
            "id": 7,
            "tmdb_id": null,
            "title": "Arrival",
            "release_year": 2016,
            "genre": "",
            "video_url": "https://player.example/7"
        }))
        .unwrap();
        assert_eq!(row.id.as_deref(), Some("7"));
        assert_eq!(row.release_year.as_deref(), Some("2016"));

        let movie = row.into_movie().unwrap();
        assert_eq!(movie.id, "ds-7");
        assert_eq!(movie.genre, UNCATEGORIZED);
        assert_eq!(movie.release_year, Some(2016));
        assert_eq!(movie.thumbnail_url, "https://picsum.photos/seed/ds-7/500/281");
        assert_eq!(movie.video_url, "https://player.example/7");
    }

    #[test]
    fn tmdb_id_takes_precedence() {
        let row = MovieRow {
            id: Some("uuid-1".into()),
            tmdb_id: Some(329865),
            title: "Arrival".into(),
            release_year: Some("2016-11-10".into()),
            ..MovieRow::default()
        };
        let movie = row.into_movie().unwrap();
        assert_eq!(movie.id, "329865");
        assert_eq!(movie.release_year, Some(2016));
    }

    #[test]
    fn primary_key_ids_never_look_like_tmdb_ids() {
        let row = MovieRow {
            id: Some("2".into()),
            title: "Local".into(),
            ..MovieRow::default()
        };
        let id = row.into_movie().unwrap().id;
        assert_eq!(id, "ds-2");
        assert!(id.parse::<u64>().is_err());
    }

    #[test]
    fn rows_without_id_are_dropped() {
        let row = MovieRow {
            title: "Nameless".into(),
            ..MovieRow::default()
        };
        assert!(row.into_movie().is_none());
    }

    #[test]
    fn insert_payload_omits_missing_id() {
        let row = MovieRow {
            tmdb_id: Some(1),
            title: "T".into(),
            ..MovieRow::default()
        };
        let value = serde_json::to_value(&row).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["tmdb_id"], 1);
    }
}
