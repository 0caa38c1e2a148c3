use async_trait::async_trait;

use crate::model::{BookingRequest, Villa};

use super::EngineError;

/// The external data-access collaborator: a thin client over the remote
/// relational store. The engine only ever sees already-resolved collections;
/// network concerns (retries, timeouts) belong behind this trait, not in the
/// engine.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn list_villas(&self) -> Result<Vec<Villa>, EngineError>;
    async fn list_booking_requests(&self) -> Result<Vec<BookingRequest>, EngineError>;
}

/// Raw JSON payloads as the store client returns them, decoded lazily.
pub struct JsonSnapshot {
    pub villas: String,
    pub requests: String,
}

#[async_trait]
impl SnapshotSource for JsonSnapshot {
    async fn list_villas(&self) -> Result<Vec<Villa>, EngineError> {
        serde_json::from_str(&self.villas).map_err(|e| EngineError::Source(e.to_string()))
    }

    async fn list_booking_requests(&self) -> Result<Vec<BookingRequest>, EngineError> {
        serde_json::from_str(&self.requests).map_err(|e| EngineError::Source(e.to_string()))
    }
}

/// Already-materialized collections, for embedders and tests.
#[derive(Default)]
pub struct FixedSnapshot {
    pub villas: Vec<Villa>,
    pub requests: Vec<BookingRequest>,
}

#[async_trait]
impl SnapshotSource for FixedSnapshot {
    async fn list_villas(&self) -> Result<Vec<Villa>, EngineError> {
        Ok(self.villas.clone())
    }

    async fn list_booking_requests(&self) -> Result<Vec<BookingRequest>, EngineError> {
        Ok(self.requests.clone())
    }
}
