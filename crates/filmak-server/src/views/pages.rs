//! Full pages.

use filmak_core::config::AboutConfig;
use filmak_core::{Movie, MovieDetails, MovieGenre, Profile};

use super::{carousel, escape, hero, layout, no_movies_found, video_player};
use crate::admin::{AddMovieForm, AddMovieResult};

pub fn home_page(featured: Option<&Movie>, groups: &[MovieGenre]) -> String {
    if featured.is_none() && groups.is_empty() {
        return layout("Home", "/", &no_movies_found());
    }
    let mut body = featured.map(hero).unwrap_or_default();
    for group in groups {
        body.push_str(&carousel(group));
    }
    layout("Home", "/", &body)
}

pub fn movie_page(details: &MovieDetails) -> String {
    let movie = &details.movie;

    let genres: String = details
        .genres
        .iter()
        .map(|g| format!("<span>{}</span>", escape(&g.name)))
        .collect();

    let rating = if details.vote_average > 0.0 {
        format!(r#" &middot; <span class="rating">&#9733; {:.1}</span>"#, details.vote_average)
    } else {
        String::new()
    };

    let cast = if details.cast.is_empty() {
        String::new()
    } else {
        let members: String = details
            .cast
            .iter()
            .map(|c| {
                format!(
                    r#"<div class="member"><img src="{img}" alt="{name}" loading="lazy"><div class="title">{name}</div><div class="meta">{character}</div></div>"#,
                    img = escape(&c.profile_url),
                    name = escape(&c.name),
                    character = escape(&c.character),
                )
            })
            .collect();
        format!(r#"<h2>Cast</h2><div class="cast">{members}</div>"#)
    };

    let body = format!(
        r#"<section class="hero" style="background-image:url('{backdrop}')"><div class="shade"></div></section>
<div class="details">
<img class="poster" src="{poster}" alt="{title}">
<div class="info">
<h1>{title}</h1>
<div class="meta">{year}{rating}</div>
<div class="chips">{genres}</div>
<p>{description}</p>
<a class="btn" href="/watch/{id}">Watch Now</a>
</div>
</div>
{cast}"#,
        backdrop = escape(movie.hero_image()),
        poster = escape(&movie.thumbnail_url),
        title = escape(&movie.title),
        year = escape(&movie.year_label()),
        description = escape(&movie.description),
        id = escape(&movie.id),
    );
    layout(&movie.title, "", &body)
}

/// Player page. `src` is the resolved iframe source.
pub fn watch_page(movie: &Movie, src: &str) -> String {
    let body = format!(
        r#"<p><a href="/movie/{id}">&larr; Back to details</a></p>
<h1>{title}</h1>
{player}
<p>{description}</p>"#,
        id = escape(&movie.id),
        title = escape(&movie.title),
        player = video_player(src, &movie.title),
        description = escape(&movie.description),
    );
    layout(&format!("Watch {}", movie.title), "", &body)
}

pub fn not_found_page(what: &str) -> String {
    let body = format!(
        r#"<div class="empty"><h1>404</h1><p>{}</p><a class="btn" href="/">Back to home</a></div>"#,
        escape(what)
    );
    layout("Not Found", "", &body)
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

pub fn admin_page(form: &AddMovieForm, result: Option<&AddMovieResult>) -> String {
    let notice = match result {
        Some(r) if r.success => format!(
            r#"<div class="notice ok">Movie "{}" was added to the catalog.</div>"#,
            escape(r.title.as_deref().unwrap_or_default())
        ),
        Some(r) => format!(
            r#"<div class="notice err">{}</div>"#,
            escape(r.error.as_deref().unwrap_or("Something went wrong."))
        ),
        None => String::new(),
    };

    let errors = result.map(|r| r.field_errors.clone()).unwrap_or_default();
    let field_error = |e: &Option<String>| {
        e.as_deref()
            .map(|m| format!(r#"<span class="field-error">{}</span>"#, escape(m)))
            .unwrap_or_default()
    };

    // A successful insert clears the form.
    let keep = !result.is_some_and(|r| r.success);
    let value = |v: &str| if keep { escape(v) } else { String::new() };

    let body = format!(
        r#"<h1>Add a Movie</h1>
<p>Enter a title; details and artwork are looked up on TMDB.</p>
{notice}
<form class="stack" method="post" action="/admin">
<label>Title<input name="title" value="{title}" placeholder="The Cosmic Adventure" required minlength="2">{title_err}</label>
<label>Description<textarea name="description" rows="4" required minlength="10">{description}</textarea>{description_err}</label>
<label>Video URL<input name="videoUrl" type="url" value="{video_url}" placeholder="https://..." required>{video_err}</label>
<button class="btn" type="submit">Add Movie</button>
</form>"#,
        title = value(&form.title),
        description = value(&form.description),
        video_url = value(&form.video_url),
        title_err = field_error(&errors.title),
        description_err = field_error(&errors.description),
        video_err = field_error(&errors.video_url),
    );
    layout("Admin", "/admin", &body)
}

// ---------------------------------------------------------------------------
// About
// ---------------------------------------------------------------------------

pub const MOVIE_TYPES: [&str; 3] = ["Movie", "Anime", "Series"];

/// Errors for the movie request form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestErrors {
    pub movie_name: Option<String>,
    pub movie_type: Option<String>,
}

impl RequestErrors {
    pub fn is_empty(&self) -> bool {
        self.movie_name.is_none() && self.movie_type.is_none()
    }
}

pub fn about_page(about: &AboutConfig, name: &str, movie_type: &str, errors: &RequestErrors) -> String {
    let options: String = MOVIE_TYPES
        .iter()
        .map(|t| {
            let selected = if *t == movie_type { " selected" } else { "" };
            format!(r#"<option value="{t}"{selected}>{t}</option>"#)
        })
        .collect();
    let err = |e: &Option<String>| {
        e.as_deref()
            .map(|m| format!(r#"<span class="field-error">{}</span>"#, escape(m)))
            .unwrap_or_default()
    };

    let support = about
        .bitcoin_address
        .as_deref()
        .filter(|a| !a.is_empty())
        .map(|addr| {
            format!(
                r#"<h2>Support Filmak</h2><p>Donations keep the servers running. Bitcoin (BTC):</p><p><code>{}</code></p>"#,
                escape(addr)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<h1>About Filmak</h1>
<p>Filmak is a free place to discover and watch movies. Metadata and artwork come from TMDB.</p>
<h2>Request a Movie</h2>
<p>Can't find something? Send a request on Telegram to <a href="https://t.me/{contact}">@{contact}</a>.</p>
<form class="stack" method="post" action="/about/request">
<label>Movie name<input name="movieName" value="{name}" required minlength="2">{name_err}</label>
<label>Type<select name="movieType">{options}</select>{type_err}</label>
<button class="btn" type="submit">Send Request</button>
</form>
{support}"#,
        contact = escape(&about.telegram_contact),
        name = escape(name),
        name_err = err(&errors.movie_name),
        type_err = err(&errors.movie_type),
    );
    layout("About", "/about", &body)
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

pub fn settings_page(profile: &Profile) -> String {
    let body = format!(
        r#"<h1>Settings</h1>
<h2>Profile</h2>
<div class="details"><img src="{avatar}" alt="{name}" width="96" height="96" style="border-radius:50%"><div><div class="title">{name}</div><div class="meta">Signed in as {id}</div></div></div>
<h2>Preferences</h2>
<form class="stack">
<label>Language<select disabled><option>English</option></select></label>
<label><span><input type="checkbox" checked disabled> Autoplay previews</span></label>
</form>
<h2>Subscription</h2>
<p>Free plan. All movies are available to every viewer.</p>"#,
        avatar = escape(&profile.avatar_url),
        name = escape(&profile.name),
        id = escape(&profile.id),
    );
    layout("Settings", "/settings", &body)
}
