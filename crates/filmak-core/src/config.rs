//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries all
//! sub-configs for the server, the two data sources, the catalog and the
//! player. Every section defaults sensibly so a completely empty `{}` file is
//! valid. Credentials usually arrive through the environment, see
//! [`Config::apply_env`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub tmdb: TmdbConfig,
    pub supabase: SupabaseConfig,
    pub catalog: CatalogConfig,
    pub player: PlayerConfig,
    pub about: AboutConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Load a config file strictly: read and parse errors are returned.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Overlay values from an arbitrary variable lookup. Empty values are
    /// ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = var("FILMAK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("FILMAK_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid FILMAK_PORT value '{port}'"),
            }
        }
        if let Some(key) = var("TMDB_API_KEY") {
            self.tmdb.api_key = Some(key);
        }
        if let Some(language) = var("TMDB_LANGUAGE") {
            self.tmdb.language = language;
        }
        if let Some(url) = var("SUPABASE_URL") {
            self.supabase.url = Some(url);
        }
        if let Some(key) = var("SUPABASE_ANON_KEY") {
            self.supabase.anon_key = Some(key);
        }
        if let Some(contact) = var("FILMAK_TELEGRAM_CONTACT") {
            self.about.telegram_contact = contact;
        }
        if let Some(address) = var("FILMAK_BITCOIN_ADDRESS") {
            self.about.bitcoin_address = Some(address);
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if !self.tmdb.is_configured() {
            warnings.push(
                "tmdb.api_key is not set; TMDB features are disabled".into(),
            );
        }

        match (&self.supabase.url, &self.supabase.anon_key) {
            (Some(_), None) => warnings.push(
                "supabase.url is set but anon_key is missing; the datastore is disabled".into(),
            ),
            (None, Some(_)) => warnings.push(
                "supabase.anon_key is set but url is missing; the datastore is disabled".into(),
            ),
            _ => {}
        }

        if let Some(ref url) = self.supabase.url {
            if url::Url::parse(url).is_err() {
                warnings.push(format!("supabase.url '{url}' is not a valid URL"));
            }
        }

        if !self.player.embed_url_template.contains("{id}") {
            warnings.push(
                "player.embed_url_template has no {id} placeholder; every movie will embed the same URL"
                    .into(),
            );
        }

        if self.catalog.featured_pool == 0 {
            warnings.push("catalog.featured_pool is 0; treated as 1".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static` (stylesheets, icons).
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            static_dir: None,
        }
    }
}

/// TMDB API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    pub api_key: Option<String>,
    pub language: String,
    pub base_url: String,
    pub image_base_url: String,
    pub timeout_secs: u64,
    pub requests_per_second: u32,
}

impl TmdbConfig {
    /// Whether an API key is present.
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: "en-US".into(),
            base_url: "https://api.themoviedb.org/3".into(),
            image_base_url: "https://image.tmdb.org/t/p".into(),
            timeout_secs: 10,
            requests_per_second: 30,
        }
    }
}

/// Supabase (PostgREST) datastore settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub table: String,
    pub timeout_secs: u64,
}

impl SupabaseConfig {
    /// Whether both the project URL and the anon key are present.
    pub fn is_configured(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        set(&self.url) && set(&self.anon_key)
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            table: "movies".into(),
            timeout_secs: 10,
        }
    }
}

/// Data-adapter behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Serve the built-in placeholder movies when both sources come back empty.
    pub placeholder_fallback: bool,
    /// How many top entries the featured movie is drawn from.
    pub featured_pool: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            placeholder_fallback: true,
            featured_pool: 10,
        }
    }
}

/// Video player settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Embed URL used when a movie has no stored video URL. `{id}` is
    /// replaced by the movie id.
    pub embed_url_template: String,
}

impl PlayerConfig {
    /// Embed URL for a movie id.
    pub fn embed_url(&self, id: &str) -> String {
        self.embed_url_template.replace("{id}", id)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            embed_url_template: "https://vidsrc.to/embed/movie/{id}".into(),
        }
    }
}

/// Contact details shown on the about page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutConfig {
    /// Telegram username that receives movie requests.
    pub telegram_contact: String,
    /// Bitcoin address shown in the support section.
    pub bitcoin_address: Option<String>,
}

impl Default for AboutConfig {
    fn default() -> Self {
        Self {
            telegram_contact: "nasre15".into(),
            bitcoin_address: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn fully_configured() -> Config {
        let mut cfg = Config::default();
        cfg.tmdb.api_key = Some("key".into());
        cfg.supabase.url = Some("https://abc.supabase.co".into());
        cfg.supabase.anon_key = Some("anon".into());
        cfg
    }

    #[test]
    fn default_config_values() {
        let cfg = Config::default();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.tmdb.language, "en-US");
        assert_eq!(cfg.supabase.table, "movies");
        assert!(cfg.catalog.placeholder_fallback);
        assert_eq!(cfg.catalog.featured_pool, 10);
        assert!(!cfg.tmdb.is_configured());
        assert!(!cfg.supabase.is_configured());
    }

    #[test]
    fn configured_config_no_warnings() {
        let warnings = fully_configured().validate();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn missing_tmdb_key_warns() {
        let warnings = Config::default().validate();
        assert!(warnings.iter().any(|w| w.contains("tmdb.api_key")));
    }

    #[test]
    fn half_configured_datastore_warns() {
        let mut cfg = fully_configured();
        cfg.supabase.anon_key = None;
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("anon_key is missing")));
        assert!(!cfg.supabase.is_configured());
    }

    #[test]
    fn embed_template_without_placeholder_warns() {
        let mut cfg = fully_configured();
        cfg.player.embed_url_template = "https://player.example/embed".into();
        assert!(cfg.validate().iter().any(|w| w.contains("{id}")));
    }

    #[test]
    fn embed_url_substitutes_id() {
        let player = PlayerConfig::default();
        assert_eq!(player.embed_url("603"), "https://vidsrc.to/embed/movie/603");
    }

    #[test]
    fn parse_json_config() {
        let json = r#"{"server": {"port": 9090}, "tmdb": {"api_key": "abc"}}"#;
        let cfg = Config::from_json(json).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert!(cfg.tmdb.is_configured());
        assert_eq!(cfg.tmdb.base_url, "https://api.themoviedb.org/3");
    }

    #[test]
    fn parse_empty_json_uses_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn parse_invalid_json_is_validation_error() {
        let err = Config::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn load_or_default_with_missing_file() {
        let cfg = Config::load_or_default(Some(Path::new("/nonexistent/filmak.json")));
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filmak.json");
        std::fs::write(&path, r#"{"catalog": {"placeholder_fallback": false}}"#).unwrap();
        let cfg = Config::load(&path).unwrap();
        assert!(!cfg.catalog.placeholder_fallback);
    }

    #[test]
    fn env_overlay() {
        let vars: HashMap<&str, &str> = [
            ("FILMAK_PORT", "8081"),
            ("TMDB_API_KEY", "tmdb-key"),
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_ANON_KEY", ""),
            ("FILMAK_BITCOIN_ADDRESS", "bc1qexample"),
        ]
        .into_iter()
        .collect();

        let mut cfg = Config::default();
        cfg.apply_env_from(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.tmdb.api_key.as_deref(), Some("tmdb-key"));
        assert_eq!(cfg.supabase.url.as_deref(), Some("https://x.supabase.co"));
        assert_eq!(cfg.supabase.anon_key, None);
        assert_eq!(cfg.about.bitcoin_address.as_deref(), Some("bc1qexample"));
    }

    #[test]
    fn env_overlay_ignores_bad_port() {
        let mut cfg = Config::default();
        cfg.apply_env_from(|name| (name == "FILMAK_PORT").then(|| "http".to_string()));
        assert_eq!(cfg.server.port, 3000);
    }
}
