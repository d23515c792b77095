//! Genre grouping for carousels and the fixed set of display genres.

use std::collections::HashSet;

use crate::movie::{Movie, MovieGenre, UNCATEGORIZED};

/// A TMDB genre that the home page and explore filters offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGenre {
    pub id: u32,
    pub name: &'static str,
}

/// Genres shown as carousels, in display order.
pub const DISPLAY_GENRES: [DisplayGenre; 5] = [
    DisplayGenre { id: 28, name: "Action" },
    DisplayGenre { id: 35, name: "Comedy" },
    DisplayGenre { id: 878, name: "Science Fiction" },
    DisplayGenre { id: 18, name: "Drama" },
    DisplayGenre { id: 27, name: "Horror" },
];

/// Look up a display genre by TMDB id.
pub fn display_genre(id: u32) -> Option<DisplayGenre> {
    DISPLAY_GENRES.iter().copied().find(|g| g.id == id)
}

/// Group movies by their `genre` label.
///
/// Groups appear in order of first occurrence and keep input order inside.
/// A movie id appears at most once per group; for id-unique input the group
/// sizes sum to the input length.
pub fn group_by_genre(movies: &[Movie]) -> Vec<MovieGenre> {
    let mut groups: Vec<MovieGenre> = Vec::new();
    let mut seen: Vec<HashSet<&str>> = Vec::new();

    for movie in movies {
        let title = match movie.genre.trim() {
            "" => UNCATEGORIZED,
            g => g,
        };

        let idx = match groups.iter().position(|g| g.title == title) {
            Some(idx) => idx,
            None => {
                groups.push(MovieGenre {
                    title: title.to_string(),
                    movies: Vec::new(),
                });
                seen.push(HashSet::new());
                groups.len() - 1
            }
        };

        if seen[idx].insert(movie.id.as_str()) {
            groups[idx].movies.push(movie.clone());
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str, genre: &str) -> Movie {
        Movie {
            id: id.into(),
            title: format!("Movie {id}"),
            description: String::new(),
            genre: genre.into(),
            video_url: String::new(),
            thumbnail_url: String::new(),
            backdrop_url: None,
            is_premium: false,
            release_year: None,
        }
    }

    #[test]
    fn groups_in_first_seen_order() {
        let movies = vec![
            movie("1", "Drama"),
            movie("2", "Action"),
            movie("3", "Drama"),
        ];
        let groups = group_by_genre(&movies);
        let titles: Vec<_> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, ["Drama", "Action"]);
        assert_eq!(groups[0].movies.len(), 2);
        assert_eq!(groups[0].movies[1].id, "3");
    }

    #[test]
    fn group_sizes_sum_to_input_length() {
        let genres = ["Action", "Comedy", "", "Drama", "Action", "Horror", ""];
        let movies: Vec<_> = genres
            .iter()
            .enumerate()
            .map(|(i, g)| movie(&i.to_string(), g))
            .collect();
        let groups = group_by_genre(&movies);
        let total: usize = groups.iter().map(|g| g.movies.len()).sum();
        assert_eq!(total, movies.len());
    }

    #[test]
    fn no_duplicate_ids_within_a_group() {
        let movies = vec![movie("7", "Action"), movie("7", "Action"), movie("8", "Action")];
        let groups = group_by_genre(&movies);
        assert_eq!(groups.len(), 1);
        let ids: Vec<_> = groups[0].movies.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["7", "8"]);
    }

    #[test]
    fn blank_genre_is_uncategorized() {
        let groups = group_by_genre(&[movie("1", "  ")]);
        assert_eq!(groups[0].title, UNCATEGORIZED);
    }

    #[test]
    fn empty_input_no_groups() {
        assert!(group_by_genre(&[]).is_empty());
    }

    #[test]
    fn display_genre_lookup() {
        assert_eq!(display_genre(878).map(|g| g.name), Some("Science Fiction"));
        assert!(display_genre(99).is_none());
    }
}
