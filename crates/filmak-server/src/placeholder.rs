//! Built-in catalog used when no data source returns anything.

use filmak_core::Movie;

const SAMPLE_BASE: &str = "https://storage.googleapis.com/gtv-videos-bucket/sample";

fn placeholder(
    n: u32,
    title: &str,
    description: &str,
    genre: &str,
    video: &str,
    year: u16,
) -> Movie {
    let id = format!("placeholder-{n}");
    Movie {
        thumbnail_url: format!("https://picsum.photos/seed/{id}/500/281"),
        backdrop_url: Some(format!("https://picsum.photos/seed/hero-{id}/1280/720")),
        id,
        title: title.to_string(),
        description: description.to_string(),
        genre: genre.to_string(),
        video_url: format!("{SAMPLE_BASE}/{video}"),
        is_premium: false,
        release_year: Some(year),
    }
}

/// The placeholder movies, in display order.
pub fn placeholder_movies() -> Vec<Movie> {
    vec![
        placeholder(
            1,
            "The Cosmic Adventure",
            "A crew of misfits chases a signal to the edge of the galaxy.",
            "Science Fiction",
            "BigBuckBunny.mp4",
            2021,
        ),
        placeholder(
            2,
            "Midnight Harbor",
            "A dock worker uncovers a smuggling ring on the night shift.",
            "Drama",
            "ElephantsDream.mp4",
            2019,
        ),
        placeholder(
            3,
            "Echoes of Tomorrow",
            "A physicist receives messages from her future self.",
            "Science Fiction",
            "Sintel.mp4",
            2022,
        ),
        placeholder(
            4,
            "Laugh Track",
            "A sitcom writer's life starts following his own scripts.",
            "Comedy",
            "TearsOfSteel.mp4",
            2018,
        ),
        placeholder(
            5,
            "Signal Lost",
            "Hikers lose contact with the world and then with each other.",
            "Horror",
            "ForBiggerEscapes.mp4",
            2020,
        ),
        placeholder(
            6,
            "Full Throttle",
            "A getaway driver takes one last job across three borders.",
            "Action",
            "ForBiggerBlazes.mp4",
            2023,
        ),
    ]
}

/// Look up a placeholder by id.
pub fn placeholder_movie(id: &str) -> Option<Movie> {
    placeholder_movies().into_iter().find(|m| m.id == id)
}
