use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::OffsetDateTime;

use moneymanager::{generate_consistent_dummy_data, initialize_db, populate_database};

/// A utility for creating a database filled with consistent dummy data for Money Manager.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path
        .extension()
        .is_none_or(|extension| extension.is_empty())
    {
        eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Generating dummy data...");
    let data = generate_consistent_dummy_data(OffsetDateTime::now_utc().date());
    let summary = populate_database(&conn, &data)?;

    println!(
        "Saved {} transactions and {} budgets.",
        summary.transactions.count, summary.budgets.count
    );
    println!("Success!");

    Ok(())
}
