// ============================================================================
// Request Parsing & Normalization
// ============================================================================
//
// Boundary between input collection and the allocation core. Malformed
// time/date text never reaches the engine: parsing fails here, validation
// rejects inconsistent requests, and normalization puts every interval list
// and the closed-date list into the canonical form the engine assumes.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use thiserror::Error;

use crate::api::{ScheduleRequest, ROUNDING_FLOOR_MINS};
use crate::models::time;

/// Validation failures rejected at the request boundary.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequestError {
    /// The inclusive date range is inverted
    #[error("start_date {start} is after end_date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Two clients share an id
    #[error("duplicate client id '{0}'")]
    DuplicateClientId(String),

    /// A client has an empty id
    #[error("client with empty id")]
    EmptyClientId,
}

impl ScheduleRequest {
    /// Check the structural input contract.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.start_date > self.end_date {
            return Err(RequestError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        let mut seen = std::collections::HashSet::new();
        for client in &self.clients {
            if client.id.is_empty() {
                return Err(RequestError::EmptyClientId);
            }
            if !seen.insert(client.id.as_str()) {
                return Err(RequestError::DuplicateClientId(client.id.clone()));
            }
        }
        Ok(())
    }

    /// Normalize in place: every interval list sorted/merged with malformed
    /// blocks dropped, closed dates deduplicated, sorted, and clipped to the
    /// range, active days deduplicated, rounding floored.
    pub fn normalize(&mut self) {
        for client in &mut self.clients {
            for window in &mut client.windows {
                window.blocks = time::normalize(&window.blocks);
            }
        }
        for window in &mut self.supervisor.daily_avail {
            window.blocks = time::normalize(&window.blocks);
        }
        for blocks in self.supervisor.date_overrides.values_mut() {
            *blocks = time::normalize(blocks);
        }

        let (start, end) = (self.start_date, self.end_date);
        self.supervisor
            .unavailable_days
            .retain(|d| *d >= start && *d <= end);
        self.supervisor.unavailable_days.sort();
        self.supervisor.unavailable_days.dedup();

        self.supervisor.active_days.sort();
        self.supervisor.active_days.dedup();

        self.supervisor.rounding_minutes =
            self.supervisor.rounding_minutes.max(ROUNDING_FLOOR_MINS);
    }
}

/// Parse a schedule request from a JSON string.
///
/// This deserializes the request using Serde, rejects structurally invalid
/// input, and normalizes every interval list before the engine sees it.
///
/// # Arguments
///
/// * `request_json` - Request JSON (snake_case field names)
///
/// # Returns
///
/// A validated, normalized `ScheduleRequest` ready for allocation.
pub fn parse_request_json_str(request_json: &str) -> Result<ScheduleRequest> {
    let mut request: ScheduleRequest = serde_json::from_str(request_json)
        .context("Failed to deserialize schedule request JSON")?;
    request.validate()?;
    request.normalize();
    Ok(request)
}
