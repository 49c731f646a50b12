//! A REST collection of transactions backed by SQLite.
//!
//! The web front-end only ever talks to this over HTTP, so any other server
//! that implements `GET /transactions` and `POST /transactions` with the same
//! JSON can take its place.

use std::sync::{Arc, Mutex};

use axum::{Router, routing::get};
use rusqlite::Connection;

use crate::{Error, endpoints};

mod db;
mod handlers;

pub use db::{count_transactions, initialize, insert_transaction, list_transactions};
pub use handlers::{ApiError, create_transaction_endpoint, list_transactions_endpoint};

/// The state of the API server.
#[derive(Debug, Clone)]
pub struct ApiState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl ApiState {
    /// Create a new [ApiState], adding the transaction table to the database if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

/// Return a router with the transactions collection routes.
pub fn build_api_router(state: ApiState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .with_state(state)
}
