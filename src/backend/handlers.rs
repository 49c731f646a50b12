//! Route handlers for the transactions collection.

use std::sync::MutexGuard;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    Error,
    transaction::{ListTransactionsQuery, NewTransaction, Transaction},
};

use super::{
    ApiState,
    db::{insert_transaction, list_transactions},
};

/// An [Error] rendered as a JSON body of the form `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self.0 {
            Error::InvalidTransactionForm(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status_code, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

fn lock_connection(state: &ApiState) -> Result<MutexGuard<'_, Connection>, Error> {
    state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}

/// List the transactions, sorted and filtered by the `_sort`, `_order` and `q` parameters.
pub async fn list_transactions_endpoint(
    State(state): State<ApiState>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let connection = lock_connection(&state)?;
    let transactions = list_transactions(&query, &connection)?;

    tracing::debug!("listing {} transactions for {query:?}", transactions.len());

    Ok(Json(transactions))
}

/// Store a new transaction and respond with the stored record.
pub async fn create_transaction_endpoint(
    State(state): State<ApiState>,
    Json(new_transaction): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let connection = lock_connection(&state)?;
    let transaction = insert_transaction(&new_transaction, &connection)?;

    tracing::info!("created transaction {}", transaction.id);

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{endpoints, transaction::Transaction};

    use super::super::{ApiState, build_api_router};

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().expect("Could not open database");
        let state = ApiState::new(connection).expect("Could not create API state");

        TestServer::new(build_api_router(state)).expect("Could not create test server.")
    }

    async fn post_transaction(
        server: &TestServer,
        description: &str,
        transaction_type: &str,
        created_at: &str,
    ) -> Transaction {
        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "description": description,
                "price": 25.5,
                "category": "Food",
                "type": transaction_type,
                "createdAt": created_at,
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        response.json::<Transaction>()
    }

    #[tokio::test]
    async fn create_responds_with_stored_record() {
        let server = get_test_server();

        let created = post_transaction(&server, "Lunch", "outcome", "2024-03-01T12:00:00Z").await;

        assert_eq!(created.id, 1);
        assert_eq!(created.description, "Lunch");
        assert_eq!(created.price, 25.5);
    }

    #[tokio::test]
    async fn list_sorts_and_filters() {
        let server = get_test_server();
        post_transaction(&server, "Groceries", "outcome", "2024-01-02T00:00:00Z").await;
        post_transaction(&server, "Salary", "income", "2024-01-01T00:00:00Z").await;
        post_transaction(&server, "Takeaways", "outcome", "2024-01-03T00:00:00Z").await;

        let response = server
            .get(endpoints::TRANSACTIONS_API)
            .add_query_param("_sort", "createdAt")
            .add_query_param("_order", "desc")
            .add_query_param("q", "outcome")
            .await;

        response.assert_status_ok();
        let descriptions = response
            .json::<Vec<Transaction>>()
            .into_iter()
            .map(|transaction| transaction.description)
            .collect::<Vec<_>>();
        assert_eq!(descriptions, vec!["Takeaways", "Groceries"]);
    }

    #[tokio::test]
    async fn list_without_parameters_returns_everything() {
        let server = get_test_server();
        post_transaction(&server, "Groceries", "outcome", "2024-01-02").await;
        post_transaction(&server, "Salary", "income", "2024-01-01").await;

        let response = server.get(endpoints::TRANSACTIONS_API).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Transaction>>().len(), 2);
    }

    #[tokio::test]
    async fn create_rejects_unknown_type() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "description": "Lunch",
                "price": 25.5,
                "category": "Food",
                "type": "transfer",
                "createdAt": "2024-03-01T12:00:00Z",
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn rejects_unknown_sort_order() {
        let server = get_test_server();

        let response = server
            .get(endpoints::TRANSACTIONS_API)
            .add_query_param("_order", "sideways")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn sql_errors_are_json() {
        let connection = Connection::open_in_memory().unwrap();
        let state = ApiState::new(connection).unwrap();
        state
            .db_connection
            .lock()
            .unwrap()
            .execute("DROP TABLE \"transaction\"", ())
            .unwrap();
        let server = TestServer::new(build_api_router(state)).unwrap();

        let response = server.get(endpoints::TRANSACTIONS_API).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.json::<Value>();
        assert!(
            body["error"].as_str().is_some_and(|error| !error.is_empty()),
            "want an error message, got {body}"
        );
    }
}
