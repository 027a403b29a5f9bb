use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;

use crewcall_ports::error::PortError;
use crewcall_ports::outbound::BaselineStore;

use super::SqliteDb;

#[async_trait]
impl BaselineStore for SqliteDb {
    async fn get(&self, identity: &str, key: &str) -> Result<Option<String>, PortError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT signature FROM seen_baselines WHERE identity = ? AND key = ?")
                .bind(identity)
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(row.map(|(signature,)| signature))
    }

    async fn put(&self, identity: &str, key: &str, signature: &str) -> Result<(), PortError> {
        let updated_at = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO seen_baselines (identity, key, signature, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(identity, key) DO UPDATE SET
                 signature = excluded.signature,
                 updated_at = excluded.updated_at",
        )
        .bind(identity)
        .bind(key)
        .bind(signature)
        .bind(&updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(())
    }

    async fn all_for(&self, identity: &str) -> Result<HashMap<String, String>, PortError> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT key, signature FROM seen_baselines WHERE identity = ?")
                .bind(identity)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(rows.into_iter().collect())
    }
}
