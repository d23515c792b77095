//! Explore-page filter state and its query-string mapping.
//!
//! The URL query is the source of truth for the explore page. [`ExploreFilters`]
//! parses it (never failing) and renders it back; for any filter set produced
//! by [`ExploreFilters::from_query`] or [`ExploreFilters::normalized`],
//! `from_query(f.to_query()) == f`.

use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

/// Oldest year offered by the year filter.
pub const MIN_YEAR: u16 = 1900;

/// Highest rating accepted by the rating filter.
pub const MAX_RATING: f32 = 10.0;

/// The filter keys that live in the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Genre,
    Year,
    Rating,
    Query,
}

impl FilterKey {
    pub const ALL: [FilterKey; 4] = [
        FilterKey::Genre,
        FilterKey::Year,
        FilterKey::Rating,
        FilterKey::Query,
    ];

    /// Query parameter name.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterKey::Genre => "genre",
            FilterKey::Year => "year",
            FilterKey::Rating => "rating",
            FilterKey::Query => "q",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| crate::Error::Validation(format!("unknown filter key '{s}'")))
    }
}

/// Filters applied to the explore grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExploreFilters {
    /// TMDB genre id.
    pub genre: Option<u32>,
    /// Primary release year.
    pub year: Option<u16>,
    /// Minimum vote average, in half-point steps.
    pub rating: Option<f32>,
    /// Free-text search. When set, the other filters are ignored.
    pub query: Option<String>,
}

impl ExploreFilters {
    /// Parse a raw query string (without the leading `?`).
    ///
    /// Unknown keys, malformed values and the "unset" markers (`""`, `"all"`,
    /// `"0"`) are ignored. A non-empty `q` clears the other filters.
    pub fn from_query(query: &str) -> Self {
        let mut filters = Self::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            if let Ok(key) = key.parse::<FilterKey>() {
                filters.set_value(key, &value);
            }
        }
        filters.normalized()
    }

    /// Render as a query string (without the leading `?`). Unset filters are
    /// omitted; keys appear in `genre`, `year`, `rating`, `q` order.
    pub fn to_query(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.to_pairs() {
            out.append_pair(key.as_str(), &value);
        }
        out.finish()
    }

    /// The set filters as key/value pairs, in canonical order.
    pub fn to_pairs(&self) -> Vec<(FilterKey, String)> {
        let normalized = self.clone().normalized();
        FilterKey::ALL
            .into_iter()
            .filter_map(|key| normalized.get(key).map(|v| (key, v)))
            .collect()
    }

    /// Current value of one filter, formatted as it appears in the URL.
    pub fn get(&self, key: FilterKey) -> Option<String> {
        match key {
            FilterKey::Genre => self.genre.map(|g| g.to_string()),
            FilterKey::Year => self.year.map(|y| y.to_string()),
            FilterKey::Rating => self.rating.map(|r| r.to_string()),
            FilterKey::Query => self.query.clone(),
        }
    }

    /// Apply a single filter change the way the filter controls do.
    ///
    /// An "unset" value removes the filter. Setting a search query drops
    /// the genre, year and rating filters.
    pub fn apply(&mut self, key: FilterKey, value: &str) {
        if key == FilterKey::Query && !is_unset(value.trim()) {
            self.genre = None;
            self.year = None;
            self.rating = None;
        }
        self.set_value(key, value);
    }

    /// Whether the grid shows search results instead of discover results.
    pub fn is_search(&self) -> bool {
        self.query.is_some()
    }

    /// Whether no filter is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Canonical form: trimmed query, rating rounded to half points and
    /// clamped, the search query taking precedence over the other filters.
    pub fn normalized(mut self) -> Self {
        self.query = self
            .query
            .map(|q| q.trim().to_string())
            .filter(|q| !is_unset(q));
        self.rating = self.rating.and_then(normalize_rating);
        self.genre = self.genre.filter(|g| *g != 0);
        self.year = self.year.filter(|y| *y >= MIN_YEAR);
        if self.query.is_some() {
            self.genre = None;
            self.year = None;
            self.rating = None;
        }
        self
    }

    /// Query string for a given page of these filters.
    pub fn page_query(&self, page: u32) -> String {
        let mut query = self.to_query();
        if page > 1 {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(&format!("page={page}"));
        }
        query
    }

    fn set_value(&mut self, key: FilterKey, value: &str) {
        let value = value.trim();
        let value = (!is_unset(value)).then_some(value);
        match key {
            FilterKey::Genre => self.genre = value.and_then(|v| v.parse().ok()),
            FilterKey::Year => {
                self.year = value
                    .and_then(|v| v.parse().ok())
                    .filter(|y| *y >= MIN_YEAR)
            }
            FilterKey::Rating => {
                self.rating = value
                    .and_then(|v| v.parse::<f32>().ok())
                    .and_then(normalize_rating)
            }
            FilterKey::Query => self.query = value.map(String::from),
        }
    }
}

/// Page number from a raw query string; defaults to 1.
pub fn page_from_query(query: &str) -> u32 {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1)
}

/// Years offered by the year filter, newest first.
pub fn year_options(current_year: u16) -> Vec<u16> {
    (MIN_YEAR..=current_year.max(MIN_YEAR)).rev().collect()
}

fn is_unset(value: &str) -> bool {
    matches!(value, "" | "all" | "0")
}

fn normalize_rating(rating: f32) -> Option<f32> {
    if !rating.is_finite() {
        return None;
    }
    let rounded = (rating.clamp(0.0, MAX_RATING) * 2.0).round() / 2.0;
    (rounded > 0.0).then_some(rounded)
}
