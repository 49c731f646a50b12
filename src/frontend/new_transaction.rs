//! The dialog for creating a new transaction and the endpoint it submits to.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner,
    },
    remote::TransactionsRemote,
    transaction::{CreateTransactionInput, TransactionType},
};

use super::AppState;

/// The ID of the `<dialog>` element, used by the header button to open it.
pub(super) const NEW_TRANSACTION_DIALOG_ID: &str = "new-transaction-dialog";

/// Where alerts for failed submissions go. It has to live inside the dialog,
/// a modal dialog is drawn above everything outside it.
const NEW_TRANSACTION_ALERT_ID: &str = "new-transaction-alert";

/// Renders the creation dialog, closed.
pub(super) fn new_transaction_dialog() -> Markup {
    let spinner = loading_spinner();

    html! {
        dialog
            id=(NEW_TRANSACTION_DIALOG_ID)
            aria-labelledby="new-transaction-title"
            class="w-full max-w-md p-8 rounded-lg bg-white dark:bg-gray-800
                text-gray-900 dark:text-white backdrop:bg-black/75"
        {
            form
                hx-post=(endpoints::CREATE_TRANSACTION)
                hx-target-error={ "#" (NEW_TRANSACTION_ALERT_ID) }
                class="w-full space-y-4"
            {
                h2 id="new-transaction-title" class="text-xl font-bold" { "New transaction" }

                div id=(NEW_TRANSACTION_ALERT_ID) {}

                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                    input
                        name="description"
                        id="description"
                        type="text"
                        placeholder="What was it for?"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="price" class=(FORM_LABEL_STYLE) { "Price" }

                    input
                        name="price"
                        id="price"
                        type="number"
                        step="0.01"
                        min="0.01"
                        placeholder="0.00"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                    input
                        name="category"
                        id="category"
                        type="text"
                        placeholder="Category"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                fieldset class=(FORM_RADIO_GROUP_STYLE)
                {
                    legend class="sr-only" { "Type" }

                    (type_option(TransactionType::Income, "Income"))
                    (type_option(TransactionType::Outcome, "Outcome"))
                }

                div class="flex justify-end gap-2"
                {
                    button
                        type="button"
                        class=(BUTTON_SECONDARY_STYLE)
                        onclick="this.closest('dialog').close()"
                    {
                        "Cancel"
                    }

                    button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
                    {
                        span id="indicator" class="inline htmx-indicator" { (spinner) }
                        " Create"
                    }
                }
            }
        }
    }
}

fn type_option(transaction_type: TransactionType, label: &str) -> Markup {
    let id = format!("type-{transaction_type}");

    html! {
        label for=(id) class=(FORM_RADIO_LABEL_STYLE)
        {
            input
                type="radio"
                name="type"
                id=(id)
                value=(transaction_type)
                required
                class=(FORM_RADIO_INPUT_STYLE);

            " " (label)
        }
    }
}

/// The form data for creating a transaction.
///
/// Every field is kept as text so that bad input gets a helpful message
/// instead of a generic rejection.
#[derive(Debug, Deserialize)]
pub struct NewTransactionForm {
    /// Text detailing the transaction.
    pub description: String,
    /// The amount of money, must be greater than zero.
    pub price: String,
    /// A free text label for the transaction.
    pub category: String,
    /// Either "income" or "outcome".
    #[serde(rename = "type", default)]
    pub transaction_type: Option<String>,
}

impl TryFrom<NewTransactionForm> for CreateTransactionInput {
    type Error = Error;

    fn try_from(form: NewTransactionForm) -> Result<Self, Self::Error> {
        let description = form.description.trim();
        if description.is_empty() {
            return Err(Error::InvalidTransactionForm(
                "Description cannot be empty.".to_owned(),
            ));
        }

        let category = form.category.trim();
        if category.is_empty() {
            return Err(Error::InvalidTransactionForm(
                "Category cannot be empty.".to_owned(),
            ));
        }

        let price = match form.price.trim().parse::<f64>() {
            Ok(price) if price.is_finite() && price > 0.0 => price,
            _ => {
                return Err(Error::InvalidTransactionForm(format!(
                    "Price must be a number greater than zero, got \"{}\".",
                    form.price
                )));
            }
        };

        let transaction_type = form
            .transaction_type
            .as_deref()
            .ok_or_else(|| {
                Error::InvalidTransactionForm("Choose either income or outcome.".to_owned())
            })?
            .parse::<TransactionType>()
            .map_err(|error| Error::InvalidTransactionForm(error.to_string()))?;

        Ok(Self {
            description: description.to_owned(),
            price,
            category: category.to_owned(),
            transaction_type,
        })
    }
}

/// A route handler for creating a new transaction, redirects to the transactions page on success.
pub async fn create_transaction_endpoint<R: TransactionsRemote>(
    State(state): State<AppState<R>>,
    Form(form): Form<NewTransactionForm>,
) -> Response {
    let input = match CreateTransactionInput::try_from(form) {
        Ok(input) => input,
        Err(error) => {
            tracing::warn!("rejected new transaction: {error}");
            return error.into_alert_response();
        }
    };

    if let Err(error) = state.store.create_transaction(input).await {
        tracing::error!("could not create transaction: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::ROOT.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
