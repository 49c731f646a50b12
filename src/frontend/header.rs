//! The page header with the logo and the button that opens the creation dialog.

use maud::{Markup, html};

use crate::html::BUTTON_PRIMARY_STYLE;

use super::new_transaction::NEW_TRANSACTION_DIALOG_ID;

fn logo() -> Markup {
    html! {
        a href="/" class="flex items-center gap-3"
        {
            svg
                aria-hidden="true"
                class="w-8 h-8 text-green-500"
                viewBox="0 0 24 24"
                fill="none"
                stroke="currentColor"
                stroke-width="2"
                xmlns="http://www.w3.org/2000/svg"
            {
                circle cx="12" cy="12" r="10" {}
                path d="M15 9.5c0-1.4-1.3-2.5-3-2.5s-3 1.1-3 2.5 1.3 2 3 2.5 3 1.1 3 2.5-1.3 2.5-3 2.5-3-1.1-3-2.5M12 5v2m0 10v2" {}
            }

            span class="text-2xl font-semibold whitespace-nowrap" { "Money Tracker" }
        }
    }
}

/// Renders the header.
///
/// The button only opens the dialog, it never reads or submits any
/// transaction data itself.
pub(super) fn header_view() -> Markup {
    let open_dialog = format!("document.getElementById('{NEW_TRANSACTION_DIALOG_ID}').showModal()");

    html! {
        header class="w-full bg-gray-800 dark:bg-gray-950 text-white"
        {
            div class="max-w-5xl flex items-center justify-between mx-auto px-6 py-8"
            {
                (logo())

                button
                    type="button"
                    id="new-transaction-button"
                    aria-haspopup="dialog"
                    aria-controls=(NEW_TRANSACTION_DIALOG_ID)
                    onclick=(open_dialog)
                    class=(BUTTON_PRIMARY_STYLE)
                {
                    "New transaction"
                }
            }
        }
    }
}
