//! SQLite storage for the transactions collection.

use rusqlite::{Connection, Row, ToSql, types::Type};
use time::OffsetDateTime;

use crate::{
    Error,
    transaction::{ListTransactionsQuery, NewTransaction, SortField, Transaction},
};

/// Create the transaction table if it does not exist yet.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'outcome')),
                price REAL NOT NULL,
                category TEXT NOT NULL,
                created_at INTEGER NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_created_at ON \"transaction\"(created_at);",
        (),
    )?;

    Ok(())
}

/// Store `transaction` and return the stored record with its new ID.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidTransactionForm] if `created_at` cannot be stored as Unix nanoseconds,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_transaction(
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let created_at = i64::try_from(transaction.created_at.unix_timestamp_nanos()).map_err(|_| {
        Error::InvalidTransactionForm(format!(
            "createdAt {} is out of range",
            transaction.created_at
        ))
    })?;

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (description, type, price, category, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, description, type, price, category, created_at",
        )?
        .query_row(
            (
                &transaction.description,
                transaction.transaction_type.as_str(),
                transaction.price,
                &transaction.category,
                created_at,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transactions matching `query`.
///
/// `q` is matched case-insensitively against the description, category, type
/// and price. An unknown `_sort` field is ignored and the results are ordered
/// by ID. Ties are broken by ID in the same direction.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn list_transactions(
    query: &ListTransactionsQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let sort_column = query
        .sort
        .as_deref()
        .and_then(SortField::from_query_value)
        .unwrap_or(SortField::Id)
        .column();
    let order = query.order.unwrap_or_default().as_sql();

    let pattern = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(like_pattern);

    let where_clause = if pattern.is_some() {
        "WHERE description LIKE :pattern ESCAPE '\\'
            OR category LIKE :pattern ESCAPE '\\'
            OR type LIKE :pattern ESCAPE '\\'
            OR CAST(price AS TEXT) LIKE :pattern ESCAPE '\\'"
    } else {
        ""
    };

    let sql = format!(
        "SELECT id, description, type, price, category, created_at FROM \"transaction\"
         {where_clause}
         ORDER BY {sort_column} {order}, id {order}"
    );

    let params: Vec<(&str, &dyn ToSql)> = match &pattern {
        Some(pattern) => vec![(":pattern", pattern as &dyn ToSql)],
        None => Vec::new(),
    };

    connection
        .prepare(&sql)?
        .query_map(params.as_slice(), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Wrap `text` in wildcards, escaping the characters LIKE treats specially.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');

    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }

    pattern.push('%');
    pattern
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let raw_type: String = row.get(2)?;
    let price = row.get(3)?;
    let category = row.get(4)?;
    let raw_created_at: i64 = row.get(5)?;

    let transaction_type = raw_type.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(error))
    })?;
    let created_at = OffsetDateTime::from_unix_timestamp_nanos(i128::from(raw_created_at))
        .map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, Box::new(error))
        })?;

    Ok(Transaction {
        id,
        description,
        transaction_type,
        price,
        category,
        created_at,
    })
}
