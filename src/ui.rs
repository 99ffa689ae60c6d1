//! Terminal rendering for movie listings

use tabled::{Table, Tabled, settings::Style};

use crate::contract::{Movie, RATING_MAX, RATING_MIN};

#[derive(Tabled)]
struct MovieRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Rating")]
    rating: String,
}

/// Render a rating as filled and empty stars, e.g. `★★★☆☆`.
/// The rating-bar analog for a terminal.
pub fn stars(rating: i64) -> String {
    let filled = rating.clamp(RATING_MIN, RATING_MAX) as usize;
    let empty = RATING_MAX as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

/// Build a rounded table of movies for the terminal
pub fn movie_table(movies: &[Movie]) -> String {
    if movies.is_empty() {
        return String::new();
    }

    let rows: Vec<MovieRow> = movies
        .iter()
        .map(|movie| MovieRow {
            id: movie.id,
            title: movie.title.clone(),
            rating: stars(movie.rating),
        })
        .collect();

    Table::new(&rows).with(Style::rounded()).to_string()
}
