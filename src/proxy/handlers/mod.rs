// API endpoint handlers
pub mod movies;
