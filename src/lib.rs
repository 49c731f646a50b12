//! Money Tracker is a small web app for keeping track of income and outcome.
//!
//! The heart of the library is the [TransactionStore]: it holds the list of
//! transactions in memory and keeps it in sync with a REST collection of
//! transactions through a [TransactionsRemote]. The [frontend] module serves
//! HTML pages built on top of one store, and the [backend] module is a SQLite
//! implementation of the REST collection.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
pub mod backend;
mod endpoints;
mod error;
pub mod frontend;
mod html;
mod logging;
mod not_found;
mod remote;
mod store;
mod timezone;
pub mod transaction;

#[cfg(test)]
mod test_utils;

pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, add_tracing_layer, logging_middleware, setup_logging};
pub use remote::{HttpRemote, TransactionsRemote};
pub use store::{LoadStatus, StoreState, TransactionStore};
pub use timezone::get_local_offset;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
