// Text rendering for result cards and the detail view
use std::fmt;

use crate::models::{GenreTable, Movie, MovieDetails};

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
pub const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/400x600";
const NO_GENRES: &str = "N/A";
const NO_OVERVIEW: &str = "No description available.";

/// First four characters of a `YYYY-MM-DD` date, or the whole string if shorter
pub fn release_year(date: &str) -> &str {
    match date.char_indices().nth(4) {
        Some((idx, _)) => &date[..idx],
        None => date,
    }
}

/// Names for `ids`, unresolved ids skipped; `N/A` when nothing resolves
pub fn genre_names(ids: &[u32], table: &GenreTable) -> String {
    let names: Vec<&str> = ids
        .iter()
        .filter_map(|id| table.get(id).map(String::as_str))
        .collect();
    join_or_na(&names)
}

fn join_or_na(names: &[&str]) -> String {
    if names.is_empty() {
        NO_GENRES.to_string()
    } else {
        names.join(", ")
    }
}

/// One decimal place, exact binary ties rounded away from zero
pub fn one_decimal(value: f64) -> String {
    // Only .25 and .75 fractions sit exactly between two tenths
    let tie = value.is_finite() && (value * 4.0).fract() == 0.0 && (value * 2.0).fract() != 0.0;
    if tie {
        format!("{:.1}", value + value.signum() * 0.05)
    } else {
        format!("{:.1}", value)
    }
}

pub fn image_url(size: &str, path: &str) -> String {
    format!("{}/{}{}", IMAGE_BASE, size, path)
}

pub fn poster_url(path: Option<&str>) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(path) => image_url("w500", path),
        None => POSTER_PLACEHOLDER.to_string(),
    }
}

/// One grid entry
pub struct MovieCard<'a> {
    pub movie: &'a Movie,
    pub genres: &'a GenreTable,
}

impl fmt::Display for MovieCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let movie = self.movie;
        writeln!(f, "{}  [#{}]", movie.title, movie.id)?;
        writeln!(f, "  {}", release_year(&movie.release_date))?;
        writeln!(f, "  Rating : {}", one_decimal(movie.vote_average))?;
        writeln!(f, "  Genres: {}", genre_names(&movie.genre_ids, self.genres))?;
        write!(f, "  {}", poster_url(movie.poster_path.as_deref()))
    }
}

/// Whole result list, or the empty-state message
pub fn render_grid(movies: &[Movie], genres: &GenreTable) -> String {
    if movies.is_empty() {
        return "No movies found".to_string();
    }
    movies
        .iter()
        .map(|movie| MovieCard { movie, genres }.to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub struct DetailView<'a>(pub &'a MovieDetails);

impl fmt::Display for DetailView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let movie = self.0;

        writeln!(f, "{}", release_year(&movie.release_date))?;
        writeln!(f, "{}", movie.title)?;
        if let Some(tagline) = movie.tagline.as_deref().filter(|t| !t.is_empty()) {
            writeln!(f, "\u{201c}{}\u{201d}", tagline)?;
        }

        let mut badges = vec![format!("\u{2b50} {}", one_decimal(movie.vote_average))];
        if let Some(runtime) = movie.runtime.filter(|r| *r > 0) {
            badges.push(format!("\u{23f1} {} min", runtime));
        }
        let names: Vec<&str> = movie.genres.iter().map(|g| g.name.as_str()).collect();
        badges.push(format!("Genres: {}", join_or_na(&names)));
        writeln!(f, "{}", badges.join("  |  "))?;

        writeln!(f)?;
        writeln!(f, "Overview")?;
        if movie.overview.trim().is_empty() {
            writeln!(f, "{}", NO_OVERVIEW)?;
        } else {
            writeln!(f, "{}", movie.overview)?;
        }

        writeln!(f)?;
        write!(f, "Poster: {}", poster_url(movie.poster_path.as_deref()))?;
        if let Some(backdrop) = movie.backdrop_path.as_deref().filter(|p| !p.is_empty()) {
            write!(f, "\nBackdrop: {}", image_url("w1280", backdrop))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Genre;

    fn table() -> GenreTable {
        [(14, "Fantasy".to_string()), (28, "Action".to_string())]
            .into_iter()
            .collect()
    }

    fn spider_man() -> Movie {
        Movie {
            id: 557,
            title: "Spider-Man".to_string(),
            poster_path: Some("/gh4cZbhZxyTbgxQPxD0dOudNPTn.jpg".to_string()),
            release_date: "2002-05-01".to_string(),
            vote_average: 7.278,
            genre_ids: vec![14, 28, 999],
        }
    }

    #[test]
    fn test_release_year() {
        assert_eq!(release_year("2002-05-01"), "2002");
        assert_eq!(release_year("20"), "20");
        assert_eq!(release_year(""), "");
    }

    #[test]
    fn test_genre_names() {
        assert_eq!(genre_names(&[14, 28, 999], &table()), "Fantasy, Action");
        assert_eq!(genre_names(&[999], &table()), "N/A");
        assert_eq!(genre_names(&[], &GenreTable::new()), "N/A");
    }

    #[test]
    fn test_card() {
        let movie = spider_man();
        let genres = table();
        let card = MovieCard {
            movie: &movie,
            genres: &genres,
        }
        .to_string();

        assert!(card.contains("Spider-Man"));
        assert!(card.contains("  2002\n"));
        assert!(card.contains("Rating : 7.3"));
        assert!(card.contains("Genres: Fantasy, Action"));
        assert!(card.contains("https://image.tmdb.org/t/p/w500/gh4cZbhZxyTbgxQPxD0dOudNPTn.jpg"));
    }

    #[test]
    fn test_one_decimal() {
        assert_eq!(one_decimal(7.25), "7.3");
        assert_eq!(one_decimal(7.75), "7.8");
        assert_eq!(one_decimal(7.278), "7.3");
        assert_eq!(one_decimal(8.45), "8.4");
        assert_eq!(one_decimal(7.0), "7.0");
        assert_eq!(one_decimal(0.0), "0.0");
        assert_eq!(one_decimal(-2.25), "-2.3");
    }

    #[test]
    fn test_card_rating_tie() {
        let movie = Movie {
            vote_average: 7.25,
            ..spider_man()
        };
        let card = MovieCard {
            movie: &movie,
            genres: &table(),
        }
        .to_string();
        assert!(card.contains("Rating : 7.3"));
    }

    #[test]
    fn test_card_without_poster() {
        let movie = Movie {
            poster_path: None,
            ..spider_man()
        };
        let card = MovieCard {
            movie: &movie,
            genres: &GenreTable::new(),
        }
        .to_string();
        assert!(card.contains(POSTER_PLACEHOLDER));
        assert!(card.contains("Genres: N/A"));
    }

    #[test]
    fn test_empty_grid() {
        assert_eq!(render_grid(&[], &table()), "No movies found");
    }

    #[test]
    fn test_detail_view() {
        let details = MovieDetails {
            id: 550,
            title: "Fight Club".to_string(),
            overview: String::new(),
            release_date: "1999-10-15".to_string(),
            runtime: Some(0),
            vote_average: 8.433,
            backdrop_path: Some("/bd.jpg".to_string()),
            poster_path: None,
            genres: vec![Genre {
                id: 18,
                name: "Drama".to_string(),
            }],
            tagline: Some("Mischief. Mayhem. Soap.".to_string()),
        };
        let text = DetailView(&details).to_string();

        assert!(text.starts_with("1999\nFight Club\n"));
        assert!(text.contains("\u{201c}Mischief. Mayhem. Soap.\u{201d}"));
        assert!(text.contains("\u{2b50} 8.4"));
        assert!(!text.contains("min"));
        assert!(text.contains("Genres: Drama"));
        assert!(text.contains("No description available."));
        assert!(text.contains(&format!("Poster: {}", POSTER_PLACEHOLDER)));
        assert!(text.contains("Backdrop: https://image.tmdb.org/t/p/w1280/bd.jpg"));
    }
}
