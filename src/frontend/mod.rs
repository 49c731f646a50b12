//! The web front-end: a single page listing transactions, with a header
//! button that opens the dialog for creating new ones.
//!
//! Every handler reads and writes transactions through the shared
//! [TransactionStore], never through the API directly.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    endpoints, not_found::get_404_not_found, remote::TransactionsRemote, store::TransactionStore,
};

mod header;
mod new_transaction;
mod summary;
mod transactions_page;
mod view;

pub use new_transaction::{NewTransactionForm, create_transaction_endpoint};
pub use summary::Summary;
pub use transactions_page::{SearchQuery, get_transactions_page, search_transactions_endpoint};

/// The state of the web front-end.
pub struct AppState<R> {
    /// The store holding the transactions shown on the page.
    pub store: Arc<TransactionStore<R>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl<R> AppState<R> {
    /// Create the state for the front-end from a store that has already been initialized.
    pub fn new(store: Arc<TransactionStore<R>>, local_timezone: &str) -> Self {
        Self {
            store,
            local_timezone: local_timezone.to_owned(),
        }
    }
}

// Derived `Clone` would require `R: Clone`.
impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            local_timezone: self.local_timezone.clone(),
        }
    }
}

/// Return a router with all the front-end's routes.
pub fn build_router<R: TransactionsRemote>(state: AppState<R>) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_transactions_page::<R>))
        .route(
            endpoints::SEARCH_TRANSACTIONS,
            get(search_transactions_endpoint::<R>),
        )
        .route(
            endpoints::CREATE_TRANSACTION,
            post(create_transaction_endpoint::<R>),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use time::macros::datetime;

    use crate::{
        endpoints,
        store::{LoadStatus, TransactionStore},
        test_utils::{FakeRemote, sample_transaction},
    };

    use super::{AppState, build_router};

    async fn get_test_server(remote: FakeRemote) -> TestServer {
        let store = Arc::new(TransactionStore::init(remote));
        store
            .subscribe()
            .wait_for(|state| state.status != LoadStatus::Loading)
            .await
            .unwrap();
        let app = build_router(AppState::new(store, "Etc/UTC"));

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn serves_transactions_page() {
        let server = get_test_server(FakeRemote::with_transactions(vec![sample_transaction(
            1,
            "Groceries",
            datetime!(2024-01-02 00:00 UTC),
        )]))
        .await;

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        response.assert_text_contains("Groceries");
    }

    #[tokio::test]
    async fn created_transaction_shows_up_first() {
        let server = get_test_server(FakeRemote::with_transactions(vec![sample_transaction(
            1,
            "Groceries",
            datetime!(2024-01-02 00:00 UTC),
        )]))
        .await;

        server
            .post(endpoints::CREATE_TRANSACTION)
            .form(&[
                ("description", "Salary"),
                ("price", "5000"),
                ("category", "Job"),
                ("type", "income"),
            ])
            .await
            .assert_status(StatusCode::SEE_OTHER);
        let page = server.get(endpoints::ROOT).await.text();

        let salary = page.find("Salary").expect("page should list the new transaction");
        let groceries = page.find("Groceries").expect("page should list the old transaction");
        assert!(
            salary < groceries,
            "want the new transaction listed before the old one"
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server(FakeRemote::default()).await;

        server
            .get("/does-not-exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
