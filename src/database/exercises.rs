// ABOUTME: SQLite-backed exercise reference store with schema migration and upsert
// ABOUTME: JSON-encoded list columns, bulk id lookups, and body-part listings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::ExerciseStore;
use crate::errors::{AppError, AppResult};
use crate::models::{DifficultyLevel, ExerciseRecord};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use tracing::debug;

const SELECT_COLUMNS: &str = r"
    SELECT id, name, body_part, target_muscle, secondary_muscles, equipment,
           difficulty, instructions, gif_url, video_url,
           single_dumbbell_friendly, single_kettlebell_friendly
    FROM exercises
";

/// Exercise library persisted in `SQLite`
#[derive(Clone)]
pub struct SqliteExerciseStore {
    pool: SqlitePool,
}

impl SqliteExerciseStore {
    /// Wrap an existing pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url`, creating the file if needed, and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or migration fails
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let pool = if database_url.contains(":memory:") {
            // Every in-memory connection is its own database; keep exactly one
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect(database_url)
                .await
        } else {
            // Ensure SQLite creates the database file if it doesn't exist
            SqlitePool::connect(&format!("{database_url}?mode=rwc")).await
        }
        .map_err(|e| AppError::database(format!("Failed to connect to {database_url}: {e}")))?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the exercises table and its indexes
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS exercises (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                body_part TEXT NOT NULL,
                target_muscle TEXT NOT NULL DEFAULT '',
                secondary_muscles TEXT NOT NULL DEFAULT '[]',
                equipment TEXT,
                difficulty TEXT NOT NULL DEFAULT 'beginner',
                instructions TEXT NOT NULL DEFAULT '[]',
                gif_url TEXT,
                video_url TEXT,
                single_dumbbell_friendly INTEGER NOT NULL DEFAULT 0,
                single_kettlebell_friendly INTEGER NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create exercises table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_exercises_body_part ON exercises(body_part)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create body_part index: {e}")))?;

        Ok(())
    }

    /// Insert or replace one exercise
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub async fn upsert(&self, record: &ExerciseRecord) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO exercises (
                id, name, body_part, target_muscle, secondary_muscles, equipment,
                difficulty, instructions, gif_url, video_url,
                single_dumbbell_friendly, single_kettlebell_friendly
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                body_part = excluded.body_part,
                target_muscle = excluded.target_muscle,
                secondary_muscles = excluded.secondary_muscles,
                equipment = excluded.equipment,
                difficulty = excluded.difficulty,
                instructions = excluded.instructions,
                gif_url = excluded.gif_url,
                video_url = excluded.video_url,
                single_dumbbell_friendly = excluded.single_dumbbell_friendly,
                single_kettlebell_friendly = excluded.single_kettlebell_friendly
            ",
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.body_part)
        .bind(&record.target_muscle)
        .bind(serde_json::to_string(&record.secondary_muscles)?)
        .bind(record.declared_equipment())
        .bind(record.difficulty.as_str())
        .bind(serde_json::to_string(&record.instructions)?)
        .bind(&record.gif_url)
        .bind(&record.video_url)
        .bind(record.single_dumbbell_friendly)
        .bind(record.single_kettlebell_friendly)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert exercise {}: {e}", record.id)))?;

        Ok(())
    }

    /// Number of stored exercises
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count(&self) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM exercises")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count exercises: {e}")))?;
        Ok(row.get("n"))
    }
}

#[async_trait]
impl ExerciseStore for SqliteExerciseStore {
    async fn get_by_ids(&self, ids: &[String]) -> AppResult<Vec<ExerciseRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let query = format!("{SELECT_COLUMNS} WHERE id IN ({placeholders})");

        let mut sql_query = sqlx::query(&query);
        for id in ids {
            sql_query = sql_query.bind(id);
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load exercises by id: {e}")))?;

        let mut by_id: HashMap<String, ExerciseRecord> = rows
            .iter()
            .map(row_to_exercise)
            .map(|r| r.map(|rec| (rec.id.clone(), rec)))
            .collect::<AppResult<_>>()?;

        // SQL IN gives no ordering guarantee; restore the caller's order
        let ordered: Vec<ExerciseRecord> = ids.iter().filter_map(|id| by_id.remove(id)).collect();
        debug!(requested = ids.len(), found = ordered.len(), "Loaded exercises by id");
        Ok(ordered)
    }

    async fn list_by_body_parts(
        &self,
        body_parts: &[String],
        limit: usize,
    ) -> AppResult<Vec<ExerciseRecord>> {
        if body_parts.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; body_parts.len()].join(", ");
        let query = format!(
            "{SELECT_COLUMNS} WHERE LOWER(body_part) IN ({placeholders}) ORDER BY name LIMIT ?"
        );
        let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut sql_query = sqlx::query(&query);
        for part in body_parts {
            sql_query = sql_query.bind(part.trim().to_lowercase());
        }
        sql_query = sql_query.bind(limit_val);

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list exercises by body part: {e}")))?;

        rows.iter().map(row_to_exercise).collect()
    }

    async fn list_all(&self) -> AppResult<Vec<ExerciseRecord>> {
        let query = format!("{SELECT_COLUMNS} ORDER BY name");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list exercises: {e}")))?;

        rows.iter().map(row_to_exercise).collect()
    }
}

/// Convert a database row to an `ExerciseRecord`
fn row_to_exercise(row: &SqliteRow) -> AppResult<ExerciseRecord> {
    let secondary_json: String = row.get("secondary_muscles");
    let instructions_json: String = row.get("instructions");
    let difficulty: String = row.get("difficulty");

    Ok(ExerciseRecord {
        id: row.get("id"),
        name: row.get("name"),
        body_part: row.get("body_part"),
        target_muscle: row.get("target_muscle"),
        secondary_muscles: serde_json::from_str(&secondary_json)?,
        equipment: row.get("equipment"),
        difficulty: DifficultyLevel::parse(&difficulty),
        instructions: serde_json::from_str(&instructions_json)?,
        gif_url: row.get("gif_url"),
        video_url: row.get("video_url"),
        single_dumbbell_friendly: row.get("single_dumbbell_friendly"),
        single_kettlebell_friendly: row.get("single_kettlebell_friendly"),
    })
}
