pub mod config;
pub mod movie;

pub use config::{AppConfig, ClientConfig};
pub use movie::{Genre, GenreList, GenreTable, Movie, MovieDetails, MoviePage};
