//! HTML rendering for the list of transactions.

use maud::{Markup, html};
use time::{
    OffsetDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros,
};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    html::{
        CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
    store::{LoadStatus, StoreState},
    transaction::{Transaction, TransactionType},
};

use super::summary::{Summary, summary_view};

/// The ID of the element that search results are swapped into.
pub(super) const TRANSACTIONS_CONTENT_ID: &str = "transactions-content";

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

fn price_class(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "text-green-700 dark:text-green-300",
        TransactionType::Outcome => "text-red-700 dark:text-red-300",
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        (truncated + "...", Some(description))
    }
}

const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] =
    macros::format_description!("[day]/[month]/[year]");

/// The creation date in the local timezone as "dd/mm/yyyy".
fn format_date(created_at: OffsetDateTime, local_offset: UtcOffset) -> String {
    let local = created_at.to_offset(local_offset);

    local
        .format(DISPLAY_DATE_FORMAT)
        .unwrap_or_else(|_| local.date().to_string())
}

fn transaction_row_view(transaction: &Transaction, local_offset: UtcOffset) -> Markup {
    let (description, tooltip) = format_description(&transaction.description);
    let datetime = transaction.created_at.to_offset(local_offset).format(&Rfc3339).ok();

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class={ "px-6 py-4 text-right " (price_class(transaction.transaction_type)) }
            {
                (format_currency(transaction.signed_price()))
            }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
            }
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=[datetime] { (format_date(transaction.created_at, local_offset)) }
            }
        }
    }
}

fn empty_message(status: LoadStatus) -> &'static str {
    match status {
        LoadStatus::Idle | LoadStatus::Loading => "Loading transactions...",
        LoadStatus::Failed => {
            "Could not load transactions. Check that the API server is running and refresh the page."
        }
        LoadStatus::Loaded => "No transactions found.",
    }
}

fn transactions_table_view(state: &StoreState, local_offset: UtcOffset) -> Markup {
    html! {
        div class="w-full overflow-x-auto rounded"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class="px-6 py-3 text-right" { "Price" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    }
                }

                tbody
                {
                    @for transaction in &state.transactions {
                        (transaction_row_view(transaction, local_offset))
                    }

                    @if state.transactions.is_empty() {
                        tr
                        {
                            td colspan="4" data-empty-state="true" class="px-6 py-4 text-center"
                            {
                                (empty_message(state.status))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the summary cards and the table, wrapped in the element that
/// search results replace.
pub(super) fn transactions_content_view(state: &StoreState, local_offset: UtcOffset) -> Markup {
    let summary = Summary::from_transactions(&state.transactions);
    let stale = state.status == LoadStatus::Failed && !state.transactions.is_empty();

    html! {
        section id=(TRANSACTIONS_CONTENT_ID) class="w-full space-y-4"
        {
            (summary_view(&summary))

            @if stale {
                p role="status" class="text-sm text-yellow-700 dark:text-yellow-300"
                {
                    "The last update failed, showing the previous results."
                }
            }

            (transactions_table_view(state, local_offset))
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::{UtcOffset, macros::datetime};

    use crate::{
        store::{LoadStatus, StoreState},
        test_utils::sample_transaction,
        transaction::TransactionType,
    };

    use super::{format_date, format_description, transactions_content_view};

    fn loaded(transactions: Vec<crate::transaction::Transaction>) -> StoreState {
        StoreState {
            transactions,
            status: LoadStatus::Loaded,
            ..Default::default()
        }
    }

    fn render(state: &StoreState) -> Html {
        Html::parse_fragment(&transactions_content_view(state, UtcOffset::UTC).into_string())
    }

    fn row_texts(html: &Html) -> Vec<Vec<String>> {
        let row_selector = Selector::parse("tr[data-transaction-id]").unwrap();
        let cell_selector = Selector::parse("td").unwrap();

        html.select(&row_selector)
            .map(|row| {
                row.select(&cell_selector)
                    .map(|cell| cell.text().collect::<String>().trim().to_owned())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn rows_follow_list_order() {
        let mut salary = sample_transaction(2, "Salary", datetime!(2024-01-01 00:00 UTC));
        salary.transaction_type = TransactionType::Income;
        salary.price = 500.0;
        salary.category = "Job".to_owned();
        let state = loaded(vec![
            sample_transaction(1, "Groceries", datetime!(2024-01-02 00:00 UTC)),
            salary,
        ]);

        let rows = row_texts(&render(&state));

        assert_eq!(
            rows,
            vec![
                vec!["Groceries", "-$10.00", "Food", "02/01/2024"],
                vec!["Salary", "$500.00", "Job", "01/01/2024"],
            ]
        );
    }

    #[test]
    fn shows_empty_state_for_each_status() {
        let cases = [
            (LoadStatus::Loading, "Loading transactions..."),
            (LoadStatus::Loaded, "No transactions found."),
        ];

        for (status, want) in cases {
            let state = StoreState {
                status,
                ..Default::default()
            };
            let html = render(&state);

            let cell = html
                .select(&Selector::parse("td[data-empty-state]").unwrap())
                .next()
                .expect("No empty state found");
            assert_eq!(cell.text().collect::<String>().trim(), want);
        }
    }

    #[test]
    fn failed_load_with_empty_list_says_so() {
        let state = StoreState {
            status: LoadStatus::Failed,
            ..Default::default()
        };

        let text = render(&state).root_element().text().collect::<String>();

        assert!(text.contains("Could not load transactions"), "got {text:?}");
    }

    #[test]
    fn truncates_long_descriptions() {
        let long = "🍕".repeat(40);

        let (description, tooltip) = format_description(&long);

        assert_eq!(description, format!("{}...", "🍕".repeat(29)));
        assert_eq!(tooltip, Some(long.as_str()));
        assert_eq!(format_description("Lunch"), ("Lunch".to_owned(), None));
    }

    #[test]
    fn formats_date_in_local_timezone() {
        let created_at = datetime!(2024-01-01 20:00 UTC);
        let auckland = UtcOffset::from_hms(13, 0, 0).unwrap();

        assert_eq!(format_date(created_at, UtcOffset::UTC), "01/01/2024");
        assert_eq!(format_date(created_at, auckland), "02/01/2024");
    }
}
