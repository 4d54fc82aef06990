// ABOUTME: Seeds the exercise reference store from a JSON catalog file
// ABOUTME: Upserts every record so re-running the seed is idempotent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Usage:
//!
//! ```text
//! seed-exercises --file data/exercises.json --database-url sqlite:./data/exercises.db
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use pierre_exercise_engine::{
    constants::server::DEFAULT_DATABASE_URL,
    database::SqliteExerciseStore,
    logging::{LogFormat, LoggingConfig},
    models::ExerciseRecord,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "seed-exercises")]
#[command(about = "Load a JSON exercise catalog into the SQLite reference store")]
pub struct Args {
    /// JSON file containing an array of exercise records
    #[arg(short, long)]
    file: PathBuf,

    /// Exercise reference store URL
    #[arg(long, default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    LoggingConfig::from_env()
        .with_format(LogFormat::Compact)
        .init()?;

    let raw = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let records: Vec<ExerciseRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid exercise catalog in {}", args.file.display()))?;

    let store = SqliteExerciseStore::connect(&args.database_url).await?;
    for record in &records {
        store.upsert(record).await?;
    }

    info!(
        seeded = records.len(),
        total = store.count().await?,
        database = %args.database_url,
        "Exercise catalog seeded"
    );
    Ok(())
}
