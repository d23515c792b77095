//! Shared test harness for integration tests.
//!
//! [`TestHarness`] builds an [`AppContext`] from a config and serves the full
//! router on a random port. The `*_config` helpers point the TMDB and
//! datastore clients at a [`MockServer`].

#![allow(dead_code)]

use std::net::SocketAddr;

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use filmak_core::config::Config;
use filmak_server::context::AppContext;
use filmak_server::router::build_router;

pub const TMDB_KEY: &str = "test-key";
pub const ANON_KEY: &str = "anon-key";
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

pub struct TestHarness {
    pub ctx: AppContext,
    pub addr: SocketAddr,
}

impl TestHarness {
    /// Serve the router for `config` on a random port.
    pub async fn with_config(config: Config) -> Self {
        let ctx = AppContext::new(config);
        let app = build_router(ctx.clone(), None);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { ctx, addr }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::get(self.url(path)).await.expect("request failed")
    }

    pub async fn get_json(&self, path: &str) -> Value {
        let resp = self.get(path).await;
        assert!(resp.status().is_success(), "GET {path} returned {}", resp.status());
        resp.json().await.expect("invalid JSON")
    }
}

/// No sources, no placeholders.
pub fn bare_config() -> Config {
    let mut config = Config::default();
    config.catalog.placeholder_fallback = false;
    config
}

/// TMDB pointed at `server`.
pub fn tmdb_config(server: &MockServer) -> Config {
    let mut config = bare_config();
    config.tmdb.api_key = Some(TMDB_KEY.into());
    config.tmdb.base_url = server.uri();
    config.tmdb.image_base_url = IMAGE_BASE.into();
    config.tmdb.timeout_secs = 2;
    config
}

/// TMDB and the datastore both pointed at `server`.
pub fn full_config(server: &MockServer) -> Config {
    let mut config = tmdb_config(server);
    config.supabase.url = Some(server.uri());
    config.supabase.anon_key = Some(ANON_KEY.into());
    config.supabase.timeout_secs = 2;
    config
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn tmdb_summary(id: u64, title: &str, genre_ids: &[u32]) -> Value {
    json!({
        "id": id,
        "title": title,
        "overview": format!("{title} overview"),
        "release_date": "2010-07-15",
        "poster_path": format!("/poster-{id}.jpg"),
        "backdrop_path": null,
        "genre_ids": genre_ids,
        "vote_average": 7.9
    })
}

pub fn tmdb_page(results: Vec<Value>) -> Value {
    json!({ "page": 1, "results": results, "total_pages": 1, "total_results": results.len() })
}

pub fn tmdb_genres() -> Value {
    json!({ "genres": [
        { "id": 28, "name": "Action" },
        { "id": 35, "name": "Comedy" },
        { "id": 18, "name": "Drama" }
    ]})
}

pub fn row(id: u64, title: &str, genre: &str) -> Value {
    json!({
        "id": id,
        "tmdb_id": null,
        "title": title,
        "description": format!("{title} description"),
        "genre": genre,
        "release_year": "1999",
        "thumbnail_url": format!("https://img.example/{id}.jpg"),
        "backdrop_url": null,
        "video_url": format!("https://player.example/{id}"),
        "is_premium": false
    })
}

// ---------------------------------------------------------------------------
// Mock helpers
// ---------------------------------------------------------------------------

pub async fn mock_tmdb(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("api_key", TMDB_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mock_tmdb_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({"status_message": "nope"})))
        .mount(server)
        .await;
}

pub async fn mock_rows(server: &MockServer, rows: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/movies"))
        .and(header("apikey", ANON_KEY))
        .and(header("authorization", format!("Bearer {ANON_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(rows)))
        .mount(server)
        .await;
}

pub async fn mock_rows_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/movies"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({"message": "down"})))
        .mount(server)
        .await;
}
