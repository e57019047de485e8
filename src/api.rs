//! Public API surface for the allocation engine.
//!
//! This file consolidates the domain types exchanged with collaborators:
//! the request model supplied by input collection and the placed-block
//! output consumed by export and progress displays. All types derive
//! Serialize/Deserialize for JSON serialization.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use crate::models::time::{TimeBlock, Weekday};

/// Minimum session length in minutes when a client does not set one.
pub const DEFAULT_MIN_SESSION_MINS: u32 = 60;

/// Hard floor for any client's minimum session length.
pub const MIN_SESSION_FLOOR_MINS: u32 = 15;

/// Hard floor for the quantization unit.
pub const ROUNDING_FLOOR_MINS: u32 = 5;

/// A client's recurring authorized hours on one weekday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayWindow {
    /// Weekday this window recurs on
    pub day: Weekday,
    /// Authorized blocks on that weekday
    pub blocks: Vec<TimeBlock>,
}

/// Per-client scheduling rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRule {
    /// Client identifier, unique within a request
    pub id: String,
    /// Target hours for the selected date range
    pub monthly_hours: f64,
    /// Minimum session length in minutes (default 60, floor 15)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_session_mins: Option<u32>,
    /// Recurring weekly authorized windows
    #[serde(default)]
    pub windows: Vec<DayWindow>,
    /// Optional cap on sessions placed per week
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sessions_per_week: Option<u32>,
    /// Ordered weekly placement goals; each slot is a set of candidate
    /// weekdays and is satisfied at most once per week
    #[serde(default)]
    pub preferred_day_slots: Vec<Vec<Weekday>>,
}

impl ClientRule {
    /// Effective minimum session length in minutes.
    pub fn min_session(&self) -> u32 {
        self.min_session_mins
            .unwrap_or(DEFAULT_MIN_SESSION_MINS)
            .max(MIN_SESSION_FLOOR_MINS)
    }

    /// Target minutes for the date range, floored at zero.
    pub fn target_minutes(&self) -> u32 {
        (self.monthly_hours * 60.0).round().max(0.0) as u32
    }
}

/// Supervisor calendar configuration shared by all clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Weekdays worked at all
    pub active_days: Vec<Weekday>,
    /// Full-day closed calendar dates
    #[serde(default)]
    pub unavailable_days: Vec<NaiveDate>,
    /// Recurring weekly availability per weekday
    pub daily_avail: Vec<DayWindow>,
    /// One-off exceptions: blocks subtracted from that exact date's
    /// availability only (partial-day closures)
    #[serde(default)]
    pub date_overrides: BTreeMap<NaiveDate, Vec<TimeBlock>>,
    /// Quantization unit in minutes (floor 5)
    #[serde(default = "default_rounding_minutes")]
    pub rounding_minutes: u32,
    /// Permit sessions shorter than a client's minimum when no longer
    /// block is obtainable
    #[serde(default)]
    pub allow_sub_hour_if_unavoidable: bool,
    /// Optional global per-week session cap applied to every client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sessions_per_week_per_client: Option<u32>,
}

fn default_rounding_minutes() -> u32 {
    15
}

impl SupervisorConfig {
    /// Effective quantization unit in minutes.
    pub fn rounding(&self) -> u32 {
        self.rounding_minutes.max(ROUNDING_FLOOR_MINS)
    }

    /// Whether the supervisor works this weekday at all.
    pub fn is_active_day(&self, day: Weekday) -> bool {
        self.active_days.contains(&day)
    }

    /// Whether the calendar date is a full-day closure.
    pub fn is_closed_date(&self, date: NaiveDate) -> bool {
        self.unavailable_days.contains(&date)
    }
}

/// Immutable input to one allocation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// First calendar date of the range, inclusive
    pub start_date: NaiveDate,
    /// Last calendar date of the range, inclusive
    pub end_date: NaiveDate,
    /// Clients competing for supervision time
    pub clients: Vec<ClientRule>,
    /// The supervisor's calendar
    pub supervisor: SupervisorConfig,
}

/// One placed supervision block.
///
/// Created only by the allocation engine; the top-up pass may extend `end`.
/// Blocks on the same date never overlap once a run completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledBlock {
    /// Calendar date of the session
    pub date: NaiveDate,
    /// Client receiving the session
    pub client_id: String,
    /// Minutes since midnight
    pub start: u16,
    /// Minutes since midnight, exclusive
    pub end: u16,
}

impl ScheduledBlock {
    /// Session length in minutes.
    pub fn minutes(&self) -> u32 {
        (self.end - self.start) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_session_defaults() {
        let client = ClientRule {
            id: "c1".to_string(),
            monthly_hours: 1.0,
            min_session_mins: None,
            windows: Vec::new(),
            max_sessions_per_week: None,
            preferred_day_slots: Vec::new(),
        };
        assert_eq!(client.min_session(), 60);
    }

    #[test]
    fn test_min_session_floor() {
        let client = ClientRule {
            id: "c1".to_string(),
            monthly_hours: 1.0,
            min_session_mins: Some(5),
            windows: Vec::new(),
            max_sessions_per_week: None,
            preferred_day_slots: Vec::new(),
        };
        assert_eq!(client.min_session(), 15);
    }

    #[test]
    fn test_target_minutes_rounding_and_floor() {
        let mut client = ClientRule {
            id: "c1".to_string(),
            monthly_hours: 1.5,
            min_session_mins: None,
            windows: Vec::new(),
            max_sessions_per_week: None,
            preferred_day_slots: Vec::new(),
        };
        assert_eq!(client.target_minutes(), 90);
        client.monthly_hours = -2.0;
        assert_eq!(client.target_minutes(), 0);
    }

    #[test]
    fn test_rounding_floor() {
        let supervisor = SupervisorConfig {
            active_days: vec![Weekday::Mon],
            unavailable_days: Vec::new(),
            daily_avail: Vec::new(),
            date_overrides: BTreeMap::new(),
            rounding_minutes: 1,
            allow_sub_hour_if_unavoidable: false,
            max_sessions_per_week_per_client: None,
        };
        assert_eq!(supervisor.rounding(), 5);
    }

    #[test]
    fn test_request_json_roundtrip() {
        let json = r#"{
            "start_date": "2026-01-05",
            "end_date": "2026-01-11",
            "clients": [
                {
                    "id": "alice",
                    "monthly_hours": 2.0,
                    "windows": [
                        { "day": "mon", "blocks": [{ "start": 540, "end": 720 }] }
                    ],
                    "preferred_day_slots": [["mon"], ["thu"]]
                }
            ],
            "supervisor": {
                "active_days": ["mon", "thu"],
                "daily_avail": [
                    { "day": "mon", "blocks": [{ "start": 480, "end": 1020 }] },
                    { "day": "thu", "blocks": [{ "start": 480, "end": 1020 }] }
                ],
                "date_overrides": { "2026-01-05": [{ "start": 480, "end": 540 }] }
            }
        }"#;

        let request: ScheduleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.clients.len(), 1);
        assert_eq!(request.clients[0].preferred_day_slots.len(), 2);
        assert_eq!(request.supervisor.rounding(), 15);
        assert!(request
            .supervisor
            .date_overrides
            .contains_key(&NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()));

        let back = serde_json::to_string(&request).unwrap();
        let reparsed: ScheduleRequest = serde_json::from_str(&back).unwrap();
        assert_eq!(reparsed.clients[0].id, "alice");
    }
}
