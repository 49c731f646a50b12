//! The transactions page and the search endpoint that refreshes its list.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::UtcOffset;

use crate::{
    Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base},
    remote::TransactionsRemote,
    store::StoreState,
    timezone::get_local_offset,
};

use super::{
    AppState,
    header::header_view,
    new_transaction::new_transaction_dialog,
    view::{TRANSACTIONS_CONTENT_ID, transactions_content_view},
};

fn search_form_view() -> Markup {
    html! {
        form
            role="search"
            hx-get=(endpoints::SEARCH_TRANSACTIONS)
            hx-target={ "#" (TRANSACTIONS_CONTENT_ID) }
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="flex w-full gap-4"
        {
            input
                name="query"
                type="search"
                aria-label="Search transactions"
                placeholder="Search transactions"
                class=(FORM_TEXT_INPUT_STYLE);

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Search" }
        }
    }
}

fn transactions_page_view(state: &StoreState, local_offset: UtcOffset) -> Markup {
    let content = html! {
        (header_view())

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-6"
            {
                (search_form_view())
                (transactions_content_view(state, local_offset))
            }
        }

        (new_transaction_dialog())
    };

    base("Transactions", &content)
}

fn local_offset(local_timezone: &str) -> Result<UtcOffset, Error> {
    get_local_offset(local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {local_timezone}");
        Error::InvalidTimezoneError(local_timezone.to_owned())
    })
}

/// Render the transactions currently held by the store.
///
/// This does not fetch anything, the list is whatever the initial fetch, the
/// last search and any creations since left behind.
pub async fn get_transactions_page<R: TransactionsRemote>(
    State(state): State<AppState<R>>,
) -> Result<Response, Error> {
    let local_offset = local_offset(&state.local_timezone)?;
    let snapshot = state.store.snapshot();

    Ok(transactions_page_view(&snapshot, local_offset).into_response())
}

/// The query parameters for searching transactions.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Text to filter the transactions by. Blank means no filter.
    #[serde(default)]
    pub query: Option<String>,
}

/// Re-fetch the transactions matching the query and return the refreshed list
/// as an HTML fragment.
pub async fn search_transactions_endpoint<R: TransactionsRemote>(
    State(state): State<AppState<R>>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let local_offset = match local_offset(&state.local_timezone) {
        Ok(local_offset) => local_offset,
        Err(error) => return error.into_alert_response(),
    };

    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|query| !query.is_empty());

    if let Err(error) = state.store.get_transactions(query).await {
        tracing::error!("could not search transactions for {query:?}: {error}");
        return error.into_alert_response();
    }

    transactions_content_view(&state.store.snapshot(), local_offset).into_response()
}
