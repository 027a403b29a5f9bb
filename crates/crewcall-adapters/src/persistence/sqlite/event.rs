use async_trait::async_trait;

use crewcall_core::events::DomainEvent;
use crewcall_ports::error::PortError;
use crewcall_ports::outbound::EventPublisher;

use super::SqliteDb;

#[async_trait]
impl EventPublisher for SqliteDb {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), PortError> {
        for event in &events {
            let event_type = event.event_type();
            let data =
                serde_json::to_string(event).map_err(|e| PortError::Persistence(e.to_string()))?;
            let occurred_at = event.occurred_at().to_rfc3339();

            sqlx::query("INSERT INTO events (event_type, data, occurred_at) VALUES (?, ?, ?)")
                .bind(event_type)
                .bind(&data)
                .bind(&occurred_at)
                .execute(&self.pool)
                .await
                .map_err(|e| PortError::Persistence(e.to_string()))?;

            tracing::debug!(event_type, "domain event recorded");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewcall_core::events::{CandidateRevealed, ShiftEscalated};
    use crewcall_core::ids::{ShiftId, UserId};
    use crewcall_core::tier::Tier;

    async fn db() -> SqliteDb {
        SqliteDb::new("sqlite::memory:").await.unwrap()
    }

    fn ts(s: &str) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::parse_from_rfc3339(s)
            .unwrap()
            .with_timezone(&chrono::Utc)
    }

    #[tokio::test]
    async fn publish_stores_events() {
        let db = db().await;

        let events = vec![
            DomainEvent::ShiftEscalated(ShiftEscalated {
                shift_id: ShiftId::new(),
                from_tier: Tier::Chain,
                to_tier: Tier::Organization,
                occurred_at: ts("2025-01-15T10:00:00Z"),
            }),
            DomainEvent::CandidateRevealed(CandidateRevealed {
                shift_id: ShiftId::new(),
                user_id: UserId::new(),
                occurred_at: ts("2025-01-15T10:01:00Z"),
            }),
        ];

        db.publish(events).await.unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count.0, 2);

        let types: Vec<(String,)> = sqlx::query_as("SELECT event_type FROM events ORDER BY id")
            .fetch_all(db.pool())
            .await
            .unwrap();
        assert_eq!(types[0].0, "shift.escalated");
        assert_eq!(types[1].0, "candidate.revealed");
    }
}
