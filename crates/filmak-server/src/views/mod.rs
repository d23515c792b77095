//! Server-rendered HTML.
//!
//! Pages are assembled from small string-building components. Everything
//! interpolated from data sources or user input goes through [`escape`].

pub mod explore;
pub mod pages;

use filmak_core::{Movie, MovieGenre};

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
*{box-sizing:border-box}
body{margin:0;font-family:system-ui,-apple-system,"Segoe UI",Roboto,sans-serif;background:#0b0b0f;color:#e8e8ec}
a{color:inherit;text-decoration:none}
header{display:flex;align-items:center;gap:1.5rem;padding:1rem 2rem;background:#111118;position:sticky;top:0;z-index:10}
header .logo{font-weight:800;font-size:1.4rem;color:#e50914}
header nav{display:flex;gap:1rem;flex:1}
header nav a{opacity:.75}
header nav a.active,header nav a:hover{opacity:1}
header form input{background:#1c1c24;border:1px solid #2c2c36;color:inherit;padding:.4rem .7rem;border-radius:4px}
main{padding:1.5rem 2rem}
footer{padding:2rem;opacity:.6;font-size:.85rem;text-align:center}
.hero{min-height:60vh;background-size:cover;background-position:center;display:flex;align-items:flex-end;margin:-1.5rem -2rem 2rem}
.hero .shade{width:100%;padding:3rem 2rem;background:linear-gradient(transparent,#0b0b0f)}
.hero h1{font-size:2.6rem;margin:0 0 .5rem}
.hero p{max-width:40rem;opacity:.85}
.btn{display:inline-block;padding:.6rem 1.2rem;border-radius:4px;background:#e50914;color:#fff;font-weight:600;border:0;cursor:pointer}
.btn.secondary{background:#2c2c36}
.carousel h2{margin:1.5rem 0 .75rem}
.row{display:flex;gap:.75rem;overflow-x:auto;padding-bottom:.5rem}
.row .card{flex:0 0 220px}
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(200px,1fr));gap:1rem}
.card img{width:100%;aspect-ratio:16/9;object-fit:cover;border-radius:4px;background:#1c1c24}
.card .title{font-weight:600;margin-top:.35rem}
.card .meta{font-size:.8rem;opacity:.65}
.player{position:relative;padding-top:56.25%;background:#000}
.player iframe{position:absolute;inset:0;width:100%;height:100%;border:0}
.details{display:flex;gap:2rem;flex-wrap:wrap}
.details img.poster{width:260px;border-radius:6px}
.chips span{display:inline-block;padding:.2rem .6rem;margin:0 .3rem .3rem 0;border-radius:999px;background:#2c2c36;font-size:.8rem}
.cast{display:grid;grid-template-columns:repeat(auto-fill,minmax(120px,1fr));gap:1rem}
.cast img{width:100%;border-radius:4px}
.empty{text-align:center;padding:4rem 1rem;opacity:.8}
form.stack{display:flex;flex-direction:column;gap:1rem;max-width:32rem}
form.stack label{display:flex;flex-direction:column;gap:.35rem}
form.stack input,form.stack textarea,form.stack select,.filters select,.filters input{background:#1c1c24;border:1px solid #2c2c36;color:inherit;padding:.5rem;border-radius:4px}
.field-error{color:#ff6b6b;font-size:.85rem}
.notice{padding:.75rem 1rem;border-radius:4px;margin-bottom:1rem}
.notice.ok{background:#123d24}
.notice.err{background:#4a1515}
.filters{display:flex;flex-wrap:wrap;gap:1rem;align-items:end;margin-bottom:1.5rem}
.filters label{display:flex;flex-direction:column;gap:.3rem;font-size:.85rem}
"#;

const NAV: [(&str, &str); 5] = [
    ("/", "Home"),
    ("/explore", "Explore"),
    ("/admin", "Admin"),
    ("/about", "About"),
    ("/settings", "Settings"),
];

/// Full HTML document around `body`. `active` is the nav path to highlight.
pub fn layout(title: &str, active: &str, body: &str) -> String {
    let nav: String = NAV
        .iter()
        .map(|(href, label)| {
            let class = if *href == active { r#" class="active""# } else { "" };
            format!(r#"<a href="{href}"{class}>{label}</a>"#)
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Filmak</title>
<style>{STYLE}</style>
</head>
<body>
<header>
<a class="logo" href="/">Filmak</a>
<nav>{nav}</nav>
<form action="/explore" method="get" role="search"><input type="search" name="q" placeholder="Search movies..." aria-label="Search movies"></form>
</header>
<main>
{body}
</main>
<footer>Movie data provided by TMDB.</footer>
</body>
</html>"#,
        title = escape(title),
    )
}

/// Poster card linking to the detail page.
pub fn movie_card(movie: &Movie) -> String {
    format!(
        r#"<a class="card" href="/movie/{id}"><img src="{img}" alt="{title}" loading="lazy"><div class="title">{title}</div><div class="meta">{year} &middot; {genre}</div></a>"#,
        id = escape(&movie.id),
        img = escape(&movie.thumbnail_url),
        title = escape(&movie.title),
        year = escape(&movie.year_label()),
        genre = escape(&movie.genre),
    )
}

/// Cards for a list of movies, without a wrapper.
pub fn movie_cards(movies: &[Movie]) -> String {
    movies.iter().map(movie_card).collect()
}

/// One horizontally scrolling row of cards.
pub fn carousel(group: &MovieGenre) -> String {
    format!(
        r#"<section class="carousel"><h2>{title}</h2><div class="row">{cards}</div></section>"#,
        title = escape(&group.title),
        cards = movie_cards(&group.movies),
    )
}

/// Full-width banner for the featured movie.
pub fn hero(movie: &Movie) -> String {
    format!(
        r#"<section class="hero" style="background-image:url('{img}')"><div class="shade"><h1>{title}</h1><div class="meta">{year} &middot; {genre}</div><p>{description}</p><a class="btn" href="/watch/{id}">Play</a> <a class="btn secondary" href="/movie/{id}">More Info</a></div></section>"#,
        img = escape(movie.hero_image()),
        title = escape(&movie.title),
        year = escape(&movie.year_label()),
        genre = escape(&movie.genre),
        description = escape(&movie.description),
        id = escape(&movie.id),
    )
}

/// Embedded player. Playback is always an iframe.
pub fn video_player(src: &str, title: &str) -> String {
    format!(
        r#"<div class="player"><iframe src="{src}" title="{title}" allow="autoplay; encrypted-media; picture-in-picture; fullscreen" allowfullscreen referrerpolicy="no-referrer"></iframe></div>"#,
        src = escape(src),
        title = escape(title),
    )
}

/// Shown when every source came back empty.
pub fn no_movies_found() -> String {
    r#"<div class="empty"><h2>No movies found</h2><p>No data source returned any movies. Check that a TMDB API key or the Supabase datastore is configured.</p></div>"#
        .to_string()
}
