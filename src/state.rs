//! Shared application state for all routes.

use crate::repository::Repository;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        AppState { pool }
    }

    pub fn repository(&self) -> Repository {
        Repository::new(self.pool.clone())
    }
}
