//! An in-memory stand-in for the transactions API.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use time::OffsetDateTime;
use tokio::sync::Notify;

use crate::{
    Error,
    remote::TransactionsRemote,
    transaction::{ListTransactionsQuery, NewTransaction, Transaction, TransactionType},
};

pub(crate) fn sample_transaction(
    id: i64,
    description: &str,
    created_at: OffsetDateTime,
) -> Transaction {
    Transaction {
        id,
        description: description.to_owned(),
        transaction_type: TransactionType::Outcome,
        price: 10.0 * id as f64,
        category: "Food".to_owned(),
        created_at,
    }
}

#[derive(Default)]
struct FakeRemoteState {
    transactions: Vec<Transaction>,
    list_failure: Option<String>,
    list_hold: Option<Arc<Notify>>,
    create_responses: VecDeque<Transaction>,
    create_failure: Option<String>,
    next_id: i64,
    list_queries: Vec<ListTransactionsQuery>,
    created_payloads: Vec<NewTransaction>,
}

/// Records every request and answers with canned data.
///
/// Listing returns the configured transactions as-is, without filtering or
/// sorting. Creating echoes the payload with the next ID unless a response
/// was queued with [FakeRemote::respond_to_create_with].
#[derive(Clone, Default)]
pub(crate) struct FakeRemote {
    state: Arc<Mutex<FakeRemoteState>>,
}

impl FakeRemote {
    pub(crate) fn with_transactions(transactions: Vec<Transaction>) -> Self {
        let remote = Self::default();
        remote.set_transactions(transactions);
        remote
    }

    pub(crate) fn set_transactions(&self, transactions: Vec<Transaction>) {
        let mut state = self.state.lock().unwrap();
        state.next_id = transactions
            .iter()
            .map(|transaction| transaction.id)
            .max()
            .unwrap_or(0);
        state.transactions = transactions;
        state.list_failure = None;
    }

    pub(crate) fn fail_list(&self, message: &str) {
        self.state.lock().unwrap().list_failure = Some(message.to_owned());
    }

    /// Make the next list call wait until `hold` is notified.
    pub(crate) fn hold_list_until(&self, hold: Arc<Notify>) {
        self.state.lock().unwrap().list_hold = Some(hold);
    }

    pub(crate) fn respond_to_create_with(&self, transaction: Transaction) {
        self.state
            .lock()
            .unwrap()
            .create_responses
            .push_back(transaction);
    }

    pub(crate) fn fail_create(&self, message: &str) {
        self.state.lock().unwrap().create_failure = Some(message.to_owned());
    }

    pub(crate) fn list_queries(&self) -> Vec<ListTransactionsQuery> {
        self.state.lock().unwrap().list_queries.clone()
    }

    pub(crate) fn created_payloads(&self) -> Vec<NewTransaction> {
        self.state.lock().unwrap().created_payloads.clone()
    }
}

impl TransactionsRemote for FakeRemote {
    async fn list(&self, query: &ListTransactionsQuery) -> Result<Vec<Transaction>, Error> {
        // Answer with the data as it was when the request was made, even if
        // the response is held back.
        let (response, hold) = {
            let mut state = self.state.lock().unwrap();
            state.list_queries.push(query.clone());
            let response = match &state.list_failure {
                Some(message) => Err(Error::RemoteCallFailed(message.clone())),
                None => Ok(state.transactions.clone()),
            };
            (response, state.list_hold.take())
        };

        if let Some(hold) = hold {
            hold.notified().await;
        }

        response
    }

    async fn create(&self, transaction: &NewTransaction) -> Result<Transaction, Error> {
        let mut state = self.state.lock().unwrap();
        state.created_payloads.push(transaction.clone());

        if let Some(message) = &state.create_failure {
            return Err(Error::RemoteCallFailed(message.clone()));
        }

        if let Some(response) = state.create_responses.pop_front() {
            return Ok(response);
        }

        state.next_id += 1;
        let created = Transaction {
            id: state.next_id,
            description: transaction.description.clone(),
            transaction_type: transaction.transaction_type,
            price: transaction.price,
            category: transaction.category.clone(),
            created_at: transaction.created_at,
        };
        state.transactions.insert(0, created.clone());

        Ok(created)
    }
}
