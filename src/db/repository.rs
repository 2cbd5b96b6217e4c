//! Snapshot repository.
//!
//! Saves run in a single transaction so a crash never leaves a half-written
//! snapshot behind.

use std::collections::HashMap;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::Datastore;

const TRAINING_REQUESTS: &str = "trainingRequests";
const RENTAL_REQUESTS: &str = "rentalRequests";
const TRAININGS: &str = "trainings";
const FACILITIES: &str = "facilities";
const CAMPUSES: &str = "campuses";
const SCHOOLS: &str = "schools";
const USERS: &str = "users";
const SEQUENCES: &str = "sequences";

/// Reads and writes full store snapshots.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load the last saved snapshot, or `None` if nothing was ever saved.
    pub async fn load(&self) -> Result<Option<Datastore>, AppError> {
        let meta = sqlx::query(
            "SELECT schema_version, revision_id, generated_at, initialized FROM meta WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        let initialized: i32 = meta.get("initialized");
        if initialized == 0 {
            return Ok(None);
        }

        let rows = sqlx::query("SELECT name, payload FROM collections")
            .fetch_all(&self.pool)
            .await?;
        let payloads: HashMap<String, String> = rows
            .iter()
            .map(|row| (row.get("name"), row.get("payload")))
            .collect();

        Ok(Some(Datastore {
            schema_version: meta.get("schema_version"),
            revision_id: meta.get("revision_id"),
            generated_at: meta.get("generated_at"),
            sequences: decode(&payloads, SEQUENCES)?,
            training_requests: decode(&payloads, TRAINING_REQUESTS)?,
            rental_requests: decode(&payloads, RENTAL_REQUESTS)?,
            trainings: decode(&payloads, TRAININGS)?,
            facilities: decode(&payloads, FACILITIES)?,
            campuses: decode(&payloads, CAMPUSES)?,
            schools: decode(&payloads, SCHOOLS)?,
            users: decode(&payloads, USERS)?,
        }))
    }

    /// Replace the stored snapshot with `datastore`.
    pub async fn save(&self, datastore: &Datastore) -> Result<(), AppError> {
        let documents = [
            (SEQUENCES, encode(&datastore.sequences)?),
            (TRAINING_REQUESTS, encode(&datastore.training_requests)?),
            (RENTAL_REQUESTS, encode(&datastore.rental_requests)?),
            (TRAININGS, encode(&datastore.trainings)?),
            (FACILITIES, encode(&datastore.facilities)?),
            (CAMPUSES, encode(&datastore.campuses)?),
            (SCHOOLS, encode(&datastore.schools)?),
            (USERS, encode(&datastore.users)?),
        ];
        let now = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;

        for (name, payload) in &documents {
            sqlx::query(
                r#"INSERT INTO collections (name, payload, updated_at) VALUES (?, ?, ?)
                   ON CONFLICT(name) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at"#,
            )
            .bind(*name)
            .bind(payload)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "UPDATE meta SET schema_version = ?, revision_id = ?, generated_at = ?, initialized = 1 WHERE id = 1",
        )
        .bind(datastore.schema_version)
        .bind(datastore.revision_id)
        .bind(&datastore.generated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Saved snapshot at revision {}", datastore.revision_id);
        Ok(())
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string(value)?)
}

/// Missing collections decode as empty.
fn decode<T: DeserializeOwned + Default>(
    payloads: &HashMap<String, String>,
    name: &str,
) -> Result<T, AppError> {
    match payloads.get(name) {
        Some(payload) => Ok(serde_json::from_str(payload)?),
        None => Ok(T::default()),
    }
}
