//! HTML pages, the about-page redirect and the upload endpoint.

mod common;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_lists_sources_in_fallback_order() {
    let server = MockServer::start().await;
    let harness = TestHarness::with_config(full_config(&server)).await;

    let body = harness.get_json("/health").await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sources"], json!(["supabase", "tmdb"]));
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

#[tokio::test]
async fn home_without_sources_shows_empty_state() {
    let harness = TestHarness::with_config(bare_config()).await;
    let resp = harness.get("/").await;
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("No movies found"));
}

#[tokio::test]
async fn home_renders_datastore_carousels() {
    let server = MockServer::start().await;
    mock_rows(&server, vec![row(1, "Heat", "Action"), row(2, "Clue", "Comedy")]).await;

    let harness = TestHarness::with_config(full_config(&server)).await;
    let html = harness.get("/").await.text().await.unwrap();

    assert!(html.contains(r#"<section class="hero""#));
    assert!(html.contains("<h2>Action</h2>"));
    assert!(html.contains("<h2>Comedy</h2>"));
    assert!(html.contains(r#"href="/movie/ds-2""#));
}

// ---------------------------------------------------------------------------
// Movie / watch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn movie_page_for_datastore_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/movies"))
        .and(query_param("id", "eq.row-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "row-7",
            "title": "Local Cut",
            "description": "Only in the datastore.",
            "genre": "Drama"
        }])))
        .mount(&server)
        .await;

    let harness = TestHarness::with_config(full_config(&server)).await;
    let resp = harness.get("/movie/ds-row-7").await;
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("<h1>Local Cut</h1>"));
    assert!(html.contains(r#"href="/watch/ds-row-7""#));
}

#[tokio::test]
async fn unknown_movie_page_is_404() {
    let harness = TestHarness::with_config(bare_config()).await;
    let resp = harness.get("/movie/12345").await;
    assert_eq!(resp.status(), 404);
    assert!(resp.text().await.unwrap().contains("We couldn&#39;t find that movie."));
}

#[tokio::test]
async fn watch_page_embeds_row_video() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/movies"))
        .and(query_param("tmdb_id", "eq.550"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "tmdb_id": 550,
            "title": "Fight Club",
            "video_url": "https://player.example/fc"
        }])))
        .mount(&server)
        .await;

    let harness = TestHarness::with_config(full_config(&server)).await;
    let html = harness.get("/watch/550").await.text().await.unwrap();
    assert!(html.contains(r#"<iframe src="https://player.example/fc""#));
}

#[tokio::test]
async fn watch_page_without_video_uses_embed_template() {
    let server = MockServer::start().await;
    mock_rows(&server, vec![]).await;
    mock_tmdb(
        &server,
        "/movie/603",
        json!({"id": 603, "title": "The Matrix", "genres": []}),
    )
    .await;

    let mut config = full_config(&server);
    config.player.embed_url_template = "https://embed.example/movie/{id}".into();
    let harness = TestHarness::with_config(config).await;

    let html = harness.get("/watch/603").await.text().await.unwrap();
    assert!(html.contains(r#"<iframe src="https://embed.example/movie/603""#));
}

// ---------------------------------------------------------------------------
// Explore
// ---------------------------------------------------------------------------

#[tokio::test]
async fn explore_page_renders_first_page_and_controls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("with_genres", "27"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(tmdb_page(vec![tmdb_summary(694, "The Shining", &[27])])),
        )
        .mount(&server)
        .await;

    let harness = TestHarness::with_config(tmdb_config(&server)).await;
    let html = harness.get("/explore?genre=27&year=all").await.text().await.unwrap();

    assert!(html.contains(r#"<option value="27" selected>Horror</option>"#));
    assert!(html.contains("The Shining"));
    assert!(html.contains("IntersectionObserver"));
    assert!(html.contains(r#"id="explore-sentinel" data-next-page="0""#));
}

// ---------------------------------------------------------------------------
// About / settings
// ---------------------------------------------------------------------------

fn no_redirects() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn movie_request_redirects_to_telegram() {
    let mut config = bare_config();
    config.about.telegram_contact = "filmak_requests".into();
    let harness = TestHarness::with_config(config).await;

    let resp = no_redirects()
        .post(harness.url("/about/request"))
        .form(&[("movieName", "Perfect Blue"), ("movieType", "Anime")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 303);
    let location = resp.headers()["location"].to_str().unwrap();
    assert!(location.starts_with("https://t.me/filmak_requests?text="));
    let parsed = url::Url::parse(location).unwrap();
    let text = parsed.query_pairs().find(|(k, _)| k == "text").unwrap().1.into_owned();
    assert_eq!(text, "I want to request a movie: Perfect Blue (Type: Anime)");
}

#[tokio::test]
async fn invalid_movie_request_rerenders_form() {
    let harness = TestHarness::with_config(bare_config()).await;
    let resp = no_redirects()
        .post(harness.url("/about/request"))
        .form(&[("movieName", "P"), ("movieType", "Podcast")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 422);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Movie name must be at least 2 characters."));
    assert!(html.contains("Please select a type."));
}

#[tokio::test]
async fn settings_page_shows_guest_profile() {
    let harness = TestHarness::with_config(bare_config()).await;
    let html = harness.get("/settings").await.text().await.unwrap();
    assert!(html.contains("Guest"));
    assert!(html.contains("Subscription"));
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_requires_video_url() {
    let harness = TestHarness::with_config(bare_config()).await;
    let resp = reqwest::Client::new()
        .post(harness.url("/api/upload"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"error": "videoUrl is required"}));
}

#[tokio::test]
async fn upload_rejects_malformed_json_with_error_body() {
    let harness = TestHarness::with_config(bare_config()).await;
    let resp = reqwest::Client::new()
        .post(harness.url("/api/upload"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let request_id = resp.headers()["x-request-id"].to_str().unwrap().to_string();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "validation_error");
    assert!(body["error"].as_str().unwrap().contains("invalid JSON body"));
    assert_eq!(body["request_id"], request_id.as_str());
}

#[tokio::test]
async fn upload_acknowledges_with_stored_url() {
    let harness = TestHarness::with_config(bare_config()).await;
    let resp = reqwest::Client::new()
        .post(harness.url("/api/upload"))
        .json(&json!({"videoUrl": "https://cdn.example/raw.mp4"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Video upload process initiated.");
    assert_eq!(body["originalUrl"], "https://cdn.example/raw.mp4");
    let stored = body["storedUrl"].as_str().unwrap();
    assert!(stored.starts_with("https://supabase.example.com/storage/v1/object/public/videos/uploaded_"));
    assert!(stored.ends_with(".mp4"));
}
