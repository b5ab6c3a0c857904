// Browsing client - consumes the movie proxy and renders results

pub mod api;
pub mod cache;
pub mod error;
pub mod render;

pub use api::MovieArcClient;
pub use cache::{FileGenreCache, GenreCache, MemoryGenreCache, GENRE_CACHE_KEY};
pub use error::ClientError;
