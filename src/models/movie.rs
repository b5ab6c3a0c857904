use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Genre id -> display name. Serializes as a JSON object with string keys.
pub type GenreTable = BTreeMap<u32, String>;

/// One entry of a popular/search/discover page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

/// Paged list response; only the first page is ever requested
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub results: Vec<Movie>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl GenreList {
    pub fn into_table(self) -> GenreTable {
        self.genres.into_iter().map(|g| (g.id, g.name)).collect()
    }
}

/// Single-title detail response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub tagline: Option<String>,
}
