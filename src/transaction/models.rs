//! Defines the transaction records exchanged with the transactions collection.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Alias for the integer type the backend uses for transaction IDs.
pub type TransactionId = i64;

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was earned.
    Income,
    /// Money that was spent.
    Outcome,
}

impl TransactionType {
    /// The lowercase name used on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Outcome => "outcome",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that is neither "income" nor "outcome".
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("\"{0}\" is not a valid transaction type, expected \"income\" or \"outcome\"")]
pub struct UnknownTransactionType(pub String);

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "outcome" => Ok(TransactionType::Outcome),
            other => Err(UnknownTransactionType(other.to_owned())),
        }
    }
}

/// An income or outcome as stored by the backend.
///
/// The client only ever holds a cached copy of these records; every field,
/// including `id`, comes from the server's response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID assigned by the backend.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Whether the transaction is an income or an outcome.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The amount of money, always recorded as a positive number.
    pub price: f64,
    /// A free text label, e.g. "Food" or "Salary".
    pub category: String,
    /// When the transaction was submitted.
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// The price with the sign implied by the transaction type: outcomes are negative.
    pub fn signed_price(&self) -> f64 {
        match self.transaction_type {
            TransactionType::Income => self.price,
            TransactionType::Outcome => -self.price,
        }
    }
}

/// The user supplied fields for a new transaction.
///
/// There is deliberately no creation time here, the store stamps it when the
/// transaction is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTransactionInput {
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money.
    pub price: f64,
    /// A free text label.
    pub category: String,
    /// Whether the transaction is an income or an outcome.
    pub transaction_type: TransactionType,
}

impl CreateTransactionInput {
    /// Build the payload that is sent to the backend, stamped with `created_at`.
    pub fn into_new_transaction(self, created_at: OffsetDateTime) -> NewTransaction {
        NewTransaction {
            description: self.description,
            price: self.price,
            category: self.category,
            transaction_type: self.transaction_type,
            created_at,
        }
    }
}

/// The body of a request to create a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money.
    pub price: f64,
    /// A free text label.
    pub category: String,
    /// Whether the transaction is an income or an outcome.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction was submitted.
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
}

/// (De)serializes timestamps as RFC 3339 strings.
///
/// Bare calendar dates such as "2024-01-02" are also accepted and read as
/// midnight UTC.
pub(crate) mod timestamp {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        Date, OffsetDateTime,
        format_description::{BorrowedFormatItem, well_known::Rfc3339},
        macros::format_description,
    };

    const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
        format_description!("[year]-[month]-[day]");

    pub fn serialize<S: Serializer>(
        value: &OffsetDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let text = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<OffsetDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).map_err(serde::de::Error::custom)
    }

    pub fn parse(text: &str) -> Result<OffsetDateTime, time::error::Parse> {
        match OffsetDateTime::parse(text, &Rfc3339) {
            Ok(timestamp) => Ok(timestamp),
            Err(rfc3339_error) => Date::parse(text, DATE_FORMAT)
                .map(|date| date.midnight().assume_utc())
                .map_err(|_| rfc3339_error),
        }
    }
}
