//! Invoicing back-office REST API: users, clients, bank details, invoices,
//! line items, and user-client relations over PostgreSQL.

pub mod case;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod password;
pub mod registry;
pub mod repository;
pub mod routes;
pub mod sql;
pub mod state;
pub mod validate;

pub use config::{AppConfig, ConfigError};
pub use db::{connect_pool, ensure_database_exists};
pub use error::AppError;
pub use migration::apply_migrations;
pub use repository::Repository;
pub use routes::app;
pub use state::AppState;
