//! Movie catalog: the fallback chain over the configured data sources.
//!
//! Every lookup tries the datastore first, then TMDB, then the built-in
//! placeholder movies. A source that errors or comes back empty is logged
//! and skipped; catalog operations themselves never fail.

use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Serialize;

use filmak_core::config::{CatalogConfig, Config};
use filmak_core::explore::ExploreFilters;
use filmak_core::genre::group_by_genre;
use filmak_core::{Movie, MovieDetails, MovieGenre};

use crate::placeholder::{placeholder_movie, placeholder_movies};
use crate::supabase::SupabaseClient;
use crate::tmdb::{DiscoverParams, TmdbClient};

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// A backend that can supply movies to the catalog.
#[async_trait]
pub trait MovieSource: Send + Sync {
    /// Short name used in logs (e.g. "tmdb").
    fn name(&self) -> &'static str;

    /// Every movie this source offers for the flat listing.
    async fn all_movies(&self) -> filmak_core::Result<Vec<Movie>>;

    /// Look up a single movie. `Ok(None)` means the source does not know it.
    async fn movie_by_id(&self, id: &str) -> filmak_core::Result<Option<Movie>>;

    /// Movies grouped into home-page carousels.
    async fn movies_by_genre(&self) -> filmak_core::Result<Vec<MovieGenre>>;

    /// Pool the featured movie is drawn from.
    async fn featured_candidates(&self, pool: usize) -> filmak_core::Result<Vec<Movie>>;

    /// Enrich the chosen featured movie. Defaults to returning it unchanged.
    async fn refresh_featured(&self, movie: Movie) -> Movie {
        movie
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

pub struct Catalog {
    sources: Vec<Arc<dyn MovieSource>>,
    tmdb: Option<Arc<TmdbClient>>,
    config: CatalogConfig,
}

impl Catalog {
    /// Build the chain from the configured clients: datastore, then TMDB.
    pub fn new(
        datastore: Option<Arc<SupabaseClient>>,
        tmdb: Option<Arc<TmdbClient>>,
        config: CatalogConfig,
    ) -> Self {
        let mut sources: Vec<Arc<dyn MovieSource>> = Vec::new();
        if let Some(ds) = datastore {
            sources.push(ds);
        }
        if let Some(t) = &tmdb {
            sources.push(t.clone());
        }
        Self {
            sources,
            tmdb,
            config,
        }
    }

    /// Build from an explicit source list. `tmdb` backs details, discover
    /// and search, which only TMDB can answer.
    pub fn with_sources(
        sources: Vec<Arc<dyn MovieSource>>,
        tmdb: Option<Arc<TmdbClient>>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            sources,
            tmdb,
            config,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let datastore = SupabaseClient::from_config(&config.supabase).map(Arc::new);
        let tmdb = TmdbClient::from_config(&config.tmdb).map(Arc::new);
        Self::new(datastore, tmdb, config.catalog.clone())
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    fn placeholders(&self) -> Vec<Movie> {
        if self.config.placeholder_fallback {
            placeholder_movies()
        } else {
            Vec::new()
        }
    }

    /// Flat list from the first source that returns a non-empty list.
    pub async fn all_movies(&self) -> Vec<Movie> {
        for source in &self.sources {
            match source.all_movies().await {
                Ok(movies) if !movies.is_empty() => {
                    tracing::debug!(source = source.name(), count = movies.len(), "Listed movies");
                    return movies;
                }
                Ok(_) => tracing::debug!(source = source.name(), "Source returned no movies"),
                Err(e) => tracing::warn!(source = source.name(), error = %e, "Failed to list movies"),
            }
        }
        self.placeholders()
    }

    /// First source that knows the id wins.
    pub async fn movie_by_id(&self, id: &str) -> Option<Movie> {
        self.lookup(id, None).await
    }

    /// [`Catalog::movie_by_id`] over every source except the one named `skip`.
    async fn lookup(&self, id: &str, skip: Option<&str>) -> Option<Movie> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        for source in self.sources.iter().filter(|s| Some(s.name()) != skip) {
            match source.movie_by_id(id).await {
                Ok(Some(movie)) => return Some(movie),
                Ok(None) => {}
                Err(e) => tracing::warn!(source = source.name(), id, error = %e, "Movie lookup failed"),
            }
        }
        if self.config.placeholder_fallback {
            placeholder_movie(id)
        } else {
            None
        }
    }

    /// Carousels from the first source that yields at least one group.
    pub async fn movies_by_genre(&self) -> Vec<MovieGenre> {
        for source in &self.sources {
            match source.movies_by_genre().await {
                Ok(groups) if groups.iter().any(|g| !g.movies.is_empty()) => {
                    return groups.into_iter().filter(|g| !g.movies.is_empty()).collect();
                }
                Ok(_) => tracing::debug!(source = source.name(), "Source returned no genres"),
                Err(e) => tracing::warn!(source = source.name(), error = %e, "Failed to group movies"),
            }
        }
        group_by_genre(&self.placeholders())
    }

    /// A random pick from the first non-empty candidate pool.
    pub async fn featured_movie(&self) -> Option<Movie> {
        let pool = self.config.featured_pool.max(1);
        for source in &self.sources {
            match source.featured_candidates(pool).await {
                Ok(candidates) if !candidates.is_empty() => {
                    if let Some(choice) = pick(&candidates) {
                        return Some(source.refresh_featured(choice).await);
                    }
                }
                Ok(_) => tracing::debug!(source = source.name(), "No featured candidates"),
                Err(e) => tracing::warn!(source = source.name(), error = %e, "Featured lookup failed"),
            }
        }
        pick(&self.placeholders())
    }

    /// Detail view: TMDB with credits for numeric ids, otherwise whatever
    /// the remaining sources find. TMDB is asked at most once.
    pub async fn movie_details(&self, id: &str) -> Option<MovieDetails> {
        let id = id.trim();
        let mut skip = None;
        if let (Some(tmdb), Ok(tmdb_id)) = (&self.tmdb, id.parse::<u64>()) {
            match tmdb.get_movie_with_credits(tmdb_id).await {
                Ok(movie) => return Some(tmdb.movie_to_details(movie)),
                Err(filmak_core::Error::NotFound { .. }) => {
                    tracing::debug!(id, "TMDB has no such movie");
                }
                Err(e) => tracing::warn!(id, error = %e, "TMDB detail lookup failed"),
            }
            skip = Some(tmdb.name());
        }
        self.lookup(id, skip).await.map(MovieDetails::from_movie)
    }

    /// One page of the explore grid. Search filters go to the search
    /// endpoint; everything else to discover. Never uses placeholders.
    pub async fn discover(&self, filters: &ExploreFilters, page: u32) -> Vec<Movie> {
        if let Some(query) = &filters.query {
            return self.search(query, page).await;
        }
        let Some(tmdb) = &self.tmdb else {
            return Vec::new();
        };
        match tmdb.discover_movies(&DiscoverParams::from_filters(filters, page)).await {
            Ok(results) => results.iter().map(|r| tmdb.summary_to_movie(r, &[])).collect(),
            Err(e) => {
                tracing::warn!(error = %e, page, "TMDB discover failed");
                Vec::new()
            }
        }
    }

    /// Title search. Blank queries return nothing.
    pub async fn search(&self, query: &str, page: u32) -> Vec<Movie> {
        let query = query.trim();
        let Some(tmdb) = &self.tmdb else {
            return Vec::new();
        };
        if query.is_empty() {
            return Vec::new();
        }
        match tmdb.search_movie(query, page).await {
            Ok(results) => results.iter().map(|r| tmdb.summary_to_movie(r, &[])).collect(),
            Err(e) => {
                tracing::warn!(error = %e, query, "TMDB search failed");
                Vec::new()
            }
        }
    }
}

fn pick(movies: &[Movie]) -> Option<Movie> {
    let mut rng = rand::thread_rng();
    movies.choose(&mut rng).cloned()
}

// ---------------------------------------------------------------------------
// Source probing
// ---------------------------------------------------------------------------

/// Reachability of one configured source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub name: &'static str,
    pub configured: bool,
    pub reachable: bool,
    pub detail: Option<String>,
}

/// Probe TMDB and the datastore with one cheap request each.
pub async fn check_sources(config: &Config) -> Vec<SourceStatus> {
    let mut statuses = Vec::new();

    let datastore = SupabaseClient::from_config(&config.supabase);
    statuses.push(match datastore {
        Some(client) => match client.ping().await {
            Ok(()) => status("supabase", true, true, None),
            Err(e) => status("supabase", true, false, Some(e.to_string())),
        },
        None => status("supabase", false, false, None),
    });

    let tmdb = TmdbClient::from_config(&config.tmdb);
    statuses.push(match tmdb {
        Some(client) => match client.movie_genres().await {
            Ok(genres) => status("tmdb", true, true, Some(format!("{} genres", genres.len()))),
            Err(e) => status("tmdb", true, false, Some(e.to_string())),
        },
        None => status("tmdb", false, false, None),
    });

    statuses
}

fn status(name: &'static str, configured: bool, reachable: bool, detail: Option<String>) -> SourceStatus {
    SourceStatus {
        name,
        configured,
        reachable,
        detail,
    }
}
