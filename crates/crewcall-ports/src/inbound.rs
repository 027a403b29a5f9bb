use async_trait::async_trait;

use crate::error::PortError;
use crate::types::SlotActivity;

/// Driven by the external notification channel: a hint that slots on a
/// shift may be dirty ahead of the next pool reload.
#[async_trait]
pub trait ActivitySink: Send + Sync {
    async fn slot_activity(&self, activity: SlotActivity) -> Result<(), PortError>;
}
