pub mod api {
    pub mod extract;
    pub mod handler;
    pub mod model;
}
pub mod config;
pub mod db {
    pub mod db_error;
    pub mod entity;
    pub mod repo;
}
pub mod error;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod service;
pub mod util;

// Re-export AppState for convenience
pub use crate::config::app_config::AppState;
pub use crate::routes::build_router;
