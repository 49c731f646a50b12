//! Totals of the listed transactions, shown as cards above the table.

use maud::{Markup, html};

use crate::{
    html::format_currency,
    transaction::{Transaction, TransactionType},
};

/// The income and outcome totals over a list of transactions.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Summary {
    /// The sum of the prices of the income transactions.
    pub income: f64,
    /// The sum of the prices of the outcome transactions, as a positive number.
    pub outcome: f64,
}

impl Summary {
    /// Add up `transactions`.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        transactions
            .iter()
            .fold(Self::default(), |mut summary, transaction| {
                match transaction.transaction_type {
                    TransactionType::Income => summary.income += transaction.price,
                    TransactionType::Outcome => summary.outcome += transaction.price,
                }

                summary
            })
    }

    /// Income minus outcome.
    pub fn total(&self) -> f64 {
        self.income - self.outcome
    }
}

fn summary_card(title: &str, amount: f64, amount_class: &str, id: &str) -> Markup {
    html! {
        div
            id=(id)
            class="bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-6 shadow-md"
        {
            header class="text-sm text-gray-600 dark:text-gray-400" { (title) }

            strong class={ "block mt-4 text-3xl font-bold " (amount_class) }
            {
                (format_currency(amount))
            }
        }
    }
}

pub(super) fn summary_view(summary: &Summary) -> Markup {
    let total = summary.total();
    let total_class = if total < 0.0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    };

    html! {
        section class="grid grid-cols-1 md:grid-cols-3 gap-4 w-full" aria-label="Summary"
        {
            (summary_card("Income", summary.income, "text-gray-900 dark:text-white", "summary-income"))
            (summary_card("Outcome", -summary.outcome, "text-gray-900 dark:text-white", "summary-outcome"))
            (summary_card("Total", total, total_class, "summary-total"))
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        test_utils::sample_transaction,
        transaction::{Transaction, TransactionType},
    };

    use super::{Summary, summary_view};

    fn transaction(transaction_type: TransactionType, price: f64) -> Transaction {
        Transaction {
            transaction_type,
            price,
            ..sample_transaction(1, "Test", datetime!(2024-01-01 00:00 UTC))
        }
    }

    #[test]
    fn sums_income_and_outcome_separately() {
        let transactions = [
            transaction(TransactionType::Income, 50.0),
            transaction(TransactionType::Outcome, 12.5),
            transaction(TransactionType::Income, 25.0),
            transaction(TransactionType::Outcome, 7.5),
        ];

        let summary = Summary::from_transactions(&transactions);

        assert_eq!(
            summary,
            Summary {
                income: 75.0,
                outcome: 20.0
            }
        );
        assert_eq!(summary.total(), 55.0);
    }

    #[test]
    fn empty_list_sums_to_zero() {
        let summary = Summary::from_transactions(&[]);

        assert_eq!(summary, Summary::default());
        assert_eq!(summary.total(), 0.0);
    }

    #[test]
    fn renders_formatted_totals() {
        let summary = Summary {
            income: 50.0,
            outcome: 62.5,
        };

        let html = Html::parse_fragment(&summary_view(&summary).into_string());

        let text_of = |id: &str| {
            let selector = Selector::parse(&format!("#{id} strong")).unwrap();
            html.select(&selector)
                .next()
                .unwrap_or_else(|| panic!("No card with id {id}"))
                .text()
                .collect::<String>()
                .trim()
                .to_owned()
        };
        assert_eq!(text_of("summary-income"), "$50.00");
        assert_eq!(text_of("summary-outcome"), "-$62.50");
        assert_eq!(text_of("summary-total"), "-$12.50");
    }
}
