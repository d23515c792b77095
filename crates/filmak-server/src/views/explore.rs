//! Explore page: filter controls, result grid and the infinite-scroll script.

use filmak_core::explore::{year_options, ExploreFilters, FilterKey, MAX_RATING};
use filmak_core::genre::DISPLAY_GENRES;
use filmak_core::Movie;

use super::{escape, layout, movie_cards};

/// TMDB list page size; a shorter page means there is nothing after it.
pub const PAGE_SIZE: usize = 20;

/// Debounces text and slider input and refetches the first page over
/// `/api/explore` on every filter change, keeping the URL in sync. Further
/// pages are appended when the sentinel scrolls into view. Each filter
/// change bumps `generation`; responses for an older filter set are dropped.
const SCRIPT: &str = r#"
(function () {
  var form = document.getElementById('explore-filters');
  var heading = document.getElementById('explore-heading');
  var grid = document.getElementById('explore-grid');
  var empty = document.getElementById('explore-empty');
  var sentinel = document.getElementById('explore-sentinel');
  var ratingValue = document.getElementById('rating-value');
  var generation = 0;
  var timer = null;
  var loading = false;
  var observer = null;

  function params() {
    var p = new URLSearchParams();
    new FormData(form).forEach(function (value, key) {
      value = String(value).trim();
      if (value !== '' && value !== 'all' && value !== '0') p.set(key, value);
    });
    if (p.has('q')) { p.delete('genre'); p.delete('year'); p.delete('rating'); }
    return p;
  }

  function fetchPage(query, page) {
    var p = new URLSearchParams(query);
    p.set('page', String(page));
    return fetch('/api/explore?' + p.toString()).then(function (res) { return res.json(); });
  }

  function rearm() {
    if (!observer) return;
    observer.unobserve(sentinel);
    observer.observe(sentinel);
  }

  function apply() {
    clearTimeout(timer);
    var gen = ++generation;
    var p = params();
    var qs = p.toString();
    history.replaceState(null, '', qs ? '?' + qs : window.location.pathname);
    sentinel.dataset.query = qs;
    sentinel.dataset.nextPage = '0';
    heading.textContent = p.has('q') ? 'Results for "' + p.get('q') + '"' : 'Explore';
    fetchPage(qs, 1)
      .then(function (data) {
        if (gen !== generation) return;
        grid.innerHTML = data.html || '';
        empty.hidden = (data.movies || []).length > 0;
        sentinel.dataset.nextPage = data.hasMore ? '2' : '0';
        rearm();
      })
      .catch(function (err) { console.error('explore: failed to apply filters', err); });
  }

  function debounced() {
    clearTimeout(timer);
    timer = setTimeout(apply, 500);
  }

  form.querySelectorAll('select').forEach(function (el) { el.addEventListener('change', apply); });
  form.querySelectorAll('input').forEach(function (el) {
    el.addEventListener('input', function () {
      if (el.name === 'rating' && ratingValue) ratingValue.textContent = el.value;
      debounced();
    });
  });
  form.addEventListener('submit', function (e) { e.preventDefault(); apply(); });

  if (!('IntersectionObserver' in window)) return;

  observer = new IntersectionObserver(function (entries) {
    if (entries.some(function (e) { return e.isIntersecting; })) loadMore();
  });
  observer.observe(sentinel);

  function loadMore() {
    var next = Number(sentinel.dataset.nextPage);
    if (loading || !next) return;
    loading = true;
    var gen = generation;
    fetchPage(sentinel.dataset.query || '', next)
      .then(function (data) {
        if (gen !== generation) return;
        grid.insertAdjacentHTML('beforeend', data.html || '');
        sentinel.dataset.nextPage = data.hasMore ? String(next + 1) : '0';
      })
      .catch(function (err) { console.error('explore: failed to load page', next, err); })
      .then(function () { loading = false; });
  }
})();
"#;

/// Whether a page of results might be followed by another.
pub fn has_more(results: &[Movie]) -> bool {
    results.len() >= PAGE_SIZE
}

pub fn explore_page(filters: &ExploreFilters, movies: &[Movie], current_year: u16) -> String {
    let genre_options: String = std::iter::once(r#"<option value="all">All genres</option>"#.to_string())
        .chain(DISPLAY_GENRES.iter().map(|g| {
            let selected = if filters.genre == Some(g.id) { " selected" } else { "" };
            format!(r#"<option value="{}"{selected}>{}</option>"#, g.id, g.name)
        }))
        .collect();

    let year_opts: String = std::iter::once(r#"<option value="all">Any year</option>"#.to_string())
        .chain(year_options(current_year).into_iter().map(|y| {
            let selected = if filters.year == Some(y) { " selected" } else { "" };
            format!(r#"<option value="{y}"{selected}>{y}</option>"#)
        }))
        .collect();

    let rating = filters.rating.unwrap_or(0.0);
    let query = filters.get(FilterKey::Query).unwrap_or_default();

    let heading = match &filters.query {
        Some(q) => format!("Results for \"{}\"", escape(q)),
        None => "Explore".to_string(),
    };

    // The grid, empty state and sentinel are always present so the script
    // can swap results in place.
    let hidden = if movies.is_empty() { "" } else { " hidden" };
    let next_page = if has_more(movies) { 2 } else { 0 };
    let results = format!(
        r#"<div id="explore-empty" class="empty"{hidden}><h2>No movies found</h2><p>Try different filters.</p></div>
<div id="explore-grid" class="grid">{}</div>
<div id="explore-sentinel" data-next-page="{next_page}" data-query="{}"></div>"#,
        movie_cards(movies),
        escape(&filters.to_query())
    );

    let body = format!(
        r#"<h1 id="explore-heading">{heading}</h1>
<form id="explore-filters" class="filters" method="get" action="/explore">
<label>Search<input type="search" name="q" value="{query}" placeholder="Title..."></label>
<label>Genre<select name="genre">{genre_options}</select></label>
<label>Year<select name="year">{year_opts}</select></label>
<label>Min rating: <span id="rating-value">{rating}</span><input type="range" name="rating" min="0" max="{MAX_RATING}" step="0.5" value="{rating}"></label>
<a class="btn secondary" href="/explore">Reset</a>
</form>
{results}
<script>{SCRIPT}</script>"#,
        query = escape(&query),
    );
    layout("Explore", "/explore", &body)
}
