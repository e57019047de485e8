//! Run summary computation.
//!
//! Derives per-client progress and run-level statistics purely from the
//! output block list and the original client list, mirroring the engine's
//! own bookkeeping from the outside: `scheduled = sum(end - start)` per
//! client and `remaining = max(0, target - scheduled)`. At run end these
//! always agree with the engine's internal state.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::api::{ScheduleRequest, ScheduledBlock};

/// Per-client progress toward its target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProgress {
    /// Client identifier
    pub client_id: String,
    /// Target minutes for the range
    pub target_minutes: u32,
    /// Minutes actually placed
    pub scheduled_minutes: u32,
    /// Unmet target minutes, floored at zero
    pub remaining_minutes: u32,
}

/// Aggregate statistics for one allocation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Per-client progress, in request order
    pub clients: Vec<ClientProgress>,
    /// Number of placed blocks
    pub block_count: usize,
    /// Total placed minutes across all clients
    pub total_scheduled_minutes: u32,
    /// Number of clients in the request
    pub client_count: usize,
    /// Clients that reached their full target
    pub fully_scheduled_count: usize,
    /// Fraction of clients that reached their target (0.0 to 1.0)
    pub completion_rate: f64,
    /// SHA256 checksum of the canonical request JSON
    pub request_checksum: String,
}

/// Compute the run summary for a request and its placed blocks.
pub fn summarize(request: &ScheduleRequest, blocks: &[ScheduledBlock]) -> ScheduleSummary {
    let clients: Vec<ClientProgress> = request
        .clients
        .iter()
        .map(|client| {
            let scheduled: u32 = blocks
                .iter()
                .filter(|b| b.client_id == client.id)
                .map(|b| b.minutes())
                .sum();
            let target = client.target_minutes();
            ClientProgress {
                client_id: client.id.clone(),
                target_minutes: target,
                scheduled_minutes: scheduled,
                remaining_minutes: target.saturating_sub(scheduled),
            }
        })
        .collect();

    let fully_scheduled_count = clients
        .iter()
        .filter(|c| c.remaining_minutes == 0)
        .count();
    let client_count = clients.len();
    let completion_rate = if client_count == 0 {
        0.0
    } else {
        fully_scheduled_count as f64 / client_count as f64
    };

    ScheduleSummary {
        block_count: blocks.len(),
        total_scheduled_minutes: clients.iter().map(|c| c.scheduled_minutes).sum(),
        client_count,
        fully_scheduled_count,
        completion_rate,
        request_checksum: serde_json::to_string(request)
            .map(|json| compute_request_checksum(&json))
            .unwrap_or_default(),
        clients,
    }
}

/// Compute a checksum for the request JSON
pub fn compute_request_checksum(json_str: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(json_str.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}
