//! Data Transfer Objects for the HTTP API.
//!
//! The domain types already derive Serialize/Deserialize, so most of the
//! wire format is a re-export; only the response envelopes live here.

use serde::{Deserialize, Serialize};

pub use crate::api::{ScheduleRequest, ScheduledBlock};
pub use crate::services::summary::{ClientProgress, ScheduleSummary};

/// Response body for schedule generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateScheduleResponse {
    /// Placed blocks in engine order
    pub blocks: Vec<ScheduledBlock>,
    /// Per-client progress and run statistics
    pub summary: ScheduleSummary,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
}
