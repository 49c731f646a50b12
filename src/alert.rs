//! Error alerts that are swapped into the page by htmx.

use maud::{Markup, html};

/// An error message shown to the user in the alert container at the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// A short summary of what went wrong.
    pub message: String,
    /// What the user can do about it.
    pub details: String,
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        html! {
            div
                role="alert"
                class="flex items-start gap-3 p-4 mb-4 text-sm rounded-lg border \
                    text-red-800 border-red-300 bg-red-50 \
                    dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (self.message) }

                    @if !self.details.is_empty() {
                        p { (self.details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="font-bold"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }
}
