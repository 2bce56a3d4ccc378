#![doc = "The `projectmanagement` library crate."]
#![doc = ""]
#![doc = "Projects, their tasks and the logins allowed to manage them, persisted"]
#![doc = "through the engine-agnostic `database::Database` contract. The crate also"]
#![doc = "holds the validation rules, configuration loading, and the actix-web routes"]
#![doc = "used by the binary (`main.rs`)."]

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod routes;
pub mod validation;

use futures::future::LocalBoxFuture;

use crate::database::Database;
use crate::error::AppError;

/// Read-only state shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection descriptor handed to the database factory for each request.
    pub database_url: String,
    /// Key used to sign and verify login tokens.
    pub secret_key: String,
}

impl AppState {
    pub fn new(database_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Runs `f` with a database connection scoped to the current request.
    pub async fn with_database<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: for<'c> FnOnce(&'c mut dyn Database) -> LocalBoxFuture<'c, Result<T, AppError>>,
    {
        database::with_database(&self.database_url, f).await
    }
}
