pub mod config;
pub mod entities;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_fixtures;

pub use config::Config;
pub use error::AppError;
pub use routes::create_routes;
pub use state::AppState;
