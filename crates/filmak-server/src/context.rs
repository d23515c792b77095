//! Application context shared across all route handlers via Axum state.
//!
//! Configuration is read-only after startup, so everything lives behind
//! plain `Arc`s.

use std::sync::Arc;

use filmak_core::config::Config;

use crate::catalog::Catalog;
use crate::supabase::SupabaseClient;
use crate::tmdb::TmdbClient;

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
    /// TMDB client, present when an API key is configured.
    pub tmdb: Option<Arc<TmdbClient>>,
    /// Datastore client, present when URL and anon key are configured.
    pub datastore: Option<Arc<SupabaseClient>>,
}

impl AppContext {
    /// Build the clients and the catalog from configuration.
    pub fn new(config: Config) -> Self {
        let tmdb = TmdbClient::from_config(&config.tmdb).map(Arc::new);
        let datastore = SupabaseClient::from_config(&config.supabase).map(Arc::new);

        match &tmdb {
            Some(_) => tracing::info!("TMDB client enabled ({})", config.tmdb.base_url),
            None => tracing::info!("TMDB client disabled (no API key)"),
        }
        match &datastore {
            Some(ds) => tracing::info!("Datastore enabled (table '{}')", ds.table()),
            None => tracing::info!("Datastore disabled (URL or anon key missing)"),
        }

        let catalog = Catalog::new(datastore.clone(), tmdb.clone(), config.catalog.clone());

        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            tmdb,
            datastore,
        }
    }
}
