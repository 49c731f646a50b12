use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use money_tracker::{
    backend::{count_transactions, initialize, insert_transaction},
    transaction::{NewTransaction, TransactionType},
};

/// A utility for creating a test database for the money_tracker API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const SEED_TRANSACTIONS: [(&str, TransactionType, f64, &str); 8] = [
    ("Salary", TransactionType::Income, 5000.0, "Job"),
    ("Rent", TransactionType::Outcome, 1800.0, "House"),
    ("Groceries", TransactionType::Outcome, 184.35, "Food"),
    ("Freelance website", TransactionType::Income, 1200.0, "Side projects"),
    ("Power bill", TransactionType::Outcome, 143.2, "House"),
    ("Pizza night", TransactionType::Outcome, 42.5, "Food"),
    ("Bus pass", TransactionType::Outcome, 60.0, "Transport"),
    ("Birthday gift from grandma", TransactionType::Income, 50.0, "Gifts"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize(&conn)?;

    println!("Creating test transactions...");

    // Oldest first, one day apart, so the last one is the newest.
    let now = OffsetDateTime::now_utc();
    let count = SEED_TRANSACTIONS.len() as i64;

    for (days_ago, (description, transaction_type, price, category)) in
        (1..=count).rev().zip(SEED_TRANSACTIONS)
    {
        let transaction = NewTransaction {
            description: description.to_owned(),
            price,
            category: category.to_owned(),
            transaction_type,
            created_at: now - Duration::days(days_ago),
        };

        insert_transaction(&transaction, &conn)?;
    }

    println!("Created {} transactions.", count_transactions(&conn)?);
    println!("Success!");

    Ok(())
}
