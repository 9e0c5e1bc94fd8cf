use sqlx::PgPool;

pub mod auth;
pub mod billing;
pub mod customers;
pub mod db;
pub mod error;
pub mod models;
pub mod profile;

/// Application state containing shared resources.
///
/// This struct holds the database connection pool and other
/// shared state that needs to be accessible to route handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub db: PgPool,
}
