//! Transaction records and the query parameters for listing them.
//!
//! This module contains the types shared by the REST client, the transaction
//! store and the backend:
//! - The `Transaction` model and the payloads for creating one
//! - The `ListTransactionsQuery` for sorting and filtering the collection

mod models;
mod query;

pub use models::{
    CreateTransactionInput, NewTransaction, Transaction, TransactionId, TransactionType,
    UnknownTransactionType,
};
pub use query::{ListTransactionsQuery, SortField, SortOrder};
