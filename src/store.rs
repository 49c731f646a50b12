//! The transaction store: the in-memory list of transactions and its
//! synchronization with the transactions collection.
//!
//! A [TransactionStore] is created with [TransactionStore::init], which
//! immediately starts fetching every transaction, newest first. Afterwards the
//! list only changes through [TransactionStore::get_transactions], which
//! replaces it wholesale, and [TransactionStore::create_transaction], which
//! puts the record returned by the backend at the front. The list is never
//! re-sorted locally.
//!
//! Fetches are numbered in the order they start, and results only ever
//! replace those of an earlier fetch. A search made before the initial fetch
//! finishes therefore keeps its results.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use time::OffsetDateTime;
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    Error,
    remote::TransactionsRemote,
    transaction::{CreateTransactionInput, ListTransactionsQuery, Transaction},
};

/// The outcome of the most recent fetch of the transaction list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing has been fetched yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Loaded,
    /// The last fetch failed. The list holds whatever it held before.
    Failed,
}

/// A snapshot of a [TransactionStore].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    /// The transactions in display order.
    pub transactions: Vec<Transaction>,
    /// The outcome of the most recent fetch.
    pub status: LoadStatus,
    pub(crate) disposed: bool,
}

impl StoreState {
    /// Whether the store this snapshot came from has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

struct Inner<R> {
    remote: R,
    state: watch::Sender<StoreState>,
    /// How many fetches have been started. A fetch is numbered by the count
    /// when it started, so the newest fetch has the highest number.
    fetches_started: AtomicU64,
    /// The number of the newest fetch whose results are in the list.
    newest_applied: AtomicU64,
}

impl<R: TransactionsRemote> Inner<R> {
    /// Apply `update` to the state unless the store has been disposed.
    ///
    /// Returns `false` if the update was dropped.
    fn update(&self, update: impl FnOnce(&mut StoreState)) -> bool {
        self.state.send_if_modified(|state| {
            if state.disposed {
                return false;
            }

            update(state);
            true
        })
    }

    fn ensure_active(&self) -> Result<(), Error> {
        if self.state.borrow().disposed {
            Err(Error::StoreDisposed)
        } else {
            Ok(())
        }
    }

    fn is_newest_fetch(&self, fetch: u64) -> bool {
        self.fetches_started.load(Ordering::SeqCst) == fetch
    }

    /// Set the status to `status` if `fetch` is the newest fetch.
    ///
    /// Older fetches leave the status to the newer one still in flight.
    fn settle_status(&self, fetch: u64, status: LoadStatus) {
        self.state.send_if_modified(|state| {
            if state.disposed || !self.is_newest_fetch(fetch) || state.status == status {
                return false;
            }

            state.status = status;
            true
        });
    }

    async fn get_transactions(&self, query: Option<&str>) -> Result<(), Error> {
        self.ensure_active()?;

        let query = ListTransactionsQuery::newest_first(query);
        let fetch = self.fetches_started.fetch_add(1, Ordering::SeqCst) + 1;
        self.update(|state| state.status = LoadStatus::Loading);

        let mut pending = PendingFetch {
            inner: self,
            fetch,
            finished: false,
        };
        let result = self.remote.list(&query).await;
        pending.finished = true;

        match result {
            Ok(transactions) => {
                tracing::debug!(
                    "fetched {} transactions for {:?}",
                    transactions.len(),
                    query.q
                );
                self.apply_fetch(fetch, transactions)
            }
            Err(error) => {
                tracing::error!("could not fetch transactions: {error}");
                self.settle_status(fetch, LoadStatus::Failed);
                Err(error)
            }
        }
    }

    /// Replace the list with the results of `fetch`, unless a fetch that
    /// started later has already replaced it.
    fn apply_fetch(&self, fetch: u64, transactions: Vec<Transaction>) -> Result<(), Error> {
        let mut result = Err(Error::StoreDisposed);

        self.state.send_if_modified(|state| {
            if state.disposed {
                return false;
            }

            result = Ok(());

            if self.newest_applied.load(Ordering::SeqCst) > fetch {
                tracing::debug!("dropping the results of fetch {fetch}, newer results are shown");
                return false;
            }

            self.newest_applied.store(fetch, Ordering::SeqCst);
            state.transactions = transactions;

            if self.is_newest_fetch(fetch) {
                state.status = LoadStatus::Loaded;
            }

            true
        });

        result
    }

    async fn create_transaction(
        &self,
        input: CreateTransactionInput,
    ) -> Result<Transaction, Error> {
        self.ensure_active()?;

        let payload = input.into_new_transaction(OffsetDateTime::now_utc());
        let created = self
            .remote
            .create(&payload)
            .await
            .inspect_err(|error| tracing::error!("could not create transaction: {error}"))?;

        tracing::info!("created transaction {}", created.id);

        if self.update(|state| state.transactions.insert(0, created.clone())) {
            Ok(created)
        } else {
            Err(Error::StoreDisposed)
        }
    }
}

/// Marks a fetch as failed if it is dropped before the remote answers, e.g.
/// when the request that started it is cancelled.
struct PendingFetch<'a, R: TransactionsRemote> {
    inner: &'a Inner<R>,
    fetch: u64,
    finished: bool,
}

impl<R: TransactionsRemote> Drop for PendingFetch<'_, R> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("fetch {} was cancelled before it finished", self.fetch);
            self.inner.settle_status(self.fetch, LoadStatus::Failed);
        }
    }
}

/// Owns the list of transactions and keeps it in sync with a [TransactionsRemote].
///
/// The store is meant to be created once and shared, e.g. behind an [Arc] in
/// the web server's state.
pub struct TransactionStore<R> {
    inner: Arc<Inner<R>>,
    initial_fetch: Mutex<Option<JoinHandle<()>>>,
}

impl<R: TransactionsRemote> TransactionStore<R> {
    /// Create a store and start fetching all transactions, newest first.
    ///
    /// The store starts out empty with the status [LoadStatus::Loading]. A
    /// failed initial fetch is logged and leaves the status at
    /// [LoadStatus::Failed], callers can retry with [Self::get_transactions].
    ///
    /// # Panics
    /// Panics if called outside of a tokio runtime.
    pub fn init(remote: R) -> Self {
        let (state, _) = watch::channel(StoreState {
            status: LoadStatus::Loading,
            ..Default::default()
        });
        let inner = Arc::new(Inner {
            remote,
            state,
            fetches_started: AtomicU64::new(0),
            newest_applied: AtomicU64::new(0),
        });

        let task_inner = inner.clone();
        let initial_fetch = tokio::spawn(async move {
            if let Err(error) = task_inner.get_transactions(None).await {
                tracing::warn!("initial fetch of transactions failed: {error}");
            }
        });

        Self {
            inner,
            initial_fetch: Mutex::new(Some(initial_fetch)),
        }
    }

    /// The current transactions in display order.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.inner.state.borrow().transactions.clone()
    }

    /// The outcome of the most recent fetch.
    pub fn status(&self) -> LoadStatus {
        self.inner.state.borrow().status
    }

    /// The transactions and status, read together.
    pub fn snapshot(&self) -> StoreState {
        self.inner.state.borrow().clone()
    }

    /// Get notified whenever the transactions or status change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.inner.state.subscribe()
    }

    /// Replace the list with the transactions matching `query`, newest first.
    ///
    /// `None` fetches every transaction. When fetches overlap, the list ends up
    /// with the results of the one started last: results that arrive after those
    /// of a later fetch are discarded.
    ///
    /// If the returned future is dropped before the remote answers, the
    /// status becomes [LoadStatus::Failed] and the list is left as it was.
    ///
    /// # Errors
    /// Returns [Error::RemoteCallFailed] if the request fails, in which case the
    /// list is left as it was, or [Error::StoreDisposed] if the store has been
    /// disposed.
    pub async fn get_transactions(&self, query: Option<&str>) -> Result<(), Error> {
        self.inner.get_transactions(query).await
    }

    /// Submit a new transaction, stamped with the current time, and put the
    /// record returned by the backend at the front of the list.
    ///
    /// # Errors
    /// Returns [Error::RemoteCallFailed] if the request fails, in which case the
    /// list is left as it was, or [Error::StoreDisposed] if the store has been
    /// disposed.
    pub async fn create_transaction(
        &self,
        input: CreateTransactionInput,
    ) -> Result<Transaction, Error> {
        self.inner.create_transaction(input).await
    }

    /// Stop the initial fetch if it is still running and discard the list.
    ///
    /// Every later call fails with [Error::StoreDisposed], and the results of
    /// calls that are still in flight are dropped.
    pub fn dispose(&self) {
        self.abort_initial_fetch();

        let was_disposed = self.inner.state.send_replace(StoreState {
            disposed: true,
            ..Default::default()
        });

        if !was_disposed.disposed {
            tracing::debug!("transaction store disposed");
        }
    }

    fn abort_initial_fetch(&self) {
        let handle = match self.initial_fetch.lock() {
            Ok(mut initial_fetch) => initial_fetch.take(),
            Err(error) => {
                tracing::error!("could not acquire the initial fetch lock: {error}");
                None
            }
        };

        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

impl<R> Drop for TransactionStore<R> {
    fn drop(&mut self) {
        if let Ok(mut initial_fetch) = self.initial_fetch.lock() {
            if let Some(handle) = initial_fetch.take() {
                handle.abort();
            }
        }
    }
}
