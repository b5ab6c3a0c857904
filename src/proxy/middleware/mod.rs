// Middleware module - Axum middleware

pub mod cors;

pub use cors::{cors_middleware, CorsPolicy};
