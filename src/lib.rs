mod app_state;
pub mod config;
pub mod database;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub use app_state::AppState;
pub use config::Config;
