//! The client side of the transactions collection.
//!
//! [TransactionsRemote] is the seam between the transaction store and the
//! network: the store only ever talks to the backend through it, so tests can
//! swap in a fake.

use std::{future::Future, time::Duration};

use reqwest::{Client, Url};

use crate::{
    Error, endpoints,
    transaction::{ListTransactionsQuery, NewTransaction, Transaction},
};

/// A remote collection of transactions.
pub trait TransactionsRemote: Send + Sync + 'static {
    /// Fetch the transactions matching `query`, in the order the backend returns them.
    ///
    /// # Errors
    /// Returns [Error::RemoteCallFailed] if the request fails for any reason.
    fn list(
        &self,
        query: &ListTransactionsQuery,
    ) -> impl Future<Output = Result<Vec<Transaction>, Error>> + Send;

    /// Submit a new transaction and return the record the backend stored.
    ///
    /// # Errors
    /// Returns [Error::RemoteCallFailed] if the request fails for any reason.
    fn create(
        &self,
        transaction: &NewTransaction,
    ) -> impl Future<Output = Result<Transaction, Error>> + Send;
}

/// Talks to a JSON-over-HTTP transactions collection at `{base_url}/transactions`.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    transactions_url: Url,
}

impl HttpRemote {
    /// Create a client for the API at `base_url`, e.g. "http://localhost:3333".
    ///
    /// Every request is abandoned after `timeout`.
    ///
    /// # Errors
    /// Returns [Error::InvalidBaseUrl] if `base_url` is not an absolute HTTP(S) URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let transactions_url = transactions_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::RemoteCallFailed(format!("could not build client: {error}")))?;

        Ok(Self {
            client,
            transactions_url,
        })
    }

    /// The URL of the transactions collection.
    pub fn transactions_url(&self) -> &Url {
        &self.transactions_url
    }
}

fn transactions_url(base_url: &str) -> Result<Url, Error> {
    let mut base = Url::parse(base_url)
        .map_err(|error| Error::InvalidBaseUrl(format!("\"{base_url}\": {error}")))?;

    if !matches!(base.scheme(), "http" | "https") {
        return Err(Error::InvalidBaseUrl(format!(
            "\"{base_url}\": expected an http or https URL"
        )));
    }

    // Without a trailing slash `join` would replace the last path segment.
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(endpoints::TRANSACTIONS_API.trim_start_matches('/'))
        .map_err(|error| Error::InvalidBaseUrl(format!("\"{base_url}\": {error}")))
}

fn remote_error(error: reqwest::Error) -> Error {
    Error::RemoteCallFailed(error.to_string())
}

impl TransactionsRemote for HttpRemote {
    async fn list(&self, query: &ListTransactionsQuery) -> Result<Vec<Transaction>, Error> {
        tracing::debug!("GET {} {query:?}", self.transactions_url);

        self.client
            .get(self.transactions_url.clone())
            .query(query)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(remote_error)?
            .json()
            .await
            .map_err(remote_error)
    }

    async fn create(&self, transaction: &NewTransaction) -> Result<Transaction, Error> {
        tracing::debug!("POST {} {transaction:?}", self.transactions_url);

        self.client
            .post(self.transactions_url.clone())
            .json(transaction)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(remote_error)?
            .json()
            .await
            .map_err(remote_error)
    }
}
