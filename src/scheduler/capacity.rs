//! Per-client capacity planning ahead of allocation.
//!
//! Precomputes, for every client, the remaining target minutes, the
//! effective minimum session length, the dates on which any placement is
//! geometrically possible, and an even-pacing weekly session cap derived
//! from the need spread over the eligible weeks. Eligibility is judged from
//! weekly-recurring availability only; one-off exceptions apply later,
//! during allocation.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::api::ScheduleRequest;
use crate::scheduler::availability;

/// Precomputed allocation inputs for one client.
#[derive(Debug, Clone)]
pub struct ClientCapacity {
    /// Target minutes for the range, floored at zero
    pub remaining: u32,
    /// Effective minimum session length in minutes
    pub min_session: u32,
    /// Sessions allowed per Monday-start week
    pub per_week_cap: u32,
    /// Dates on which any placement is geometrically possible, ascending
    pub eligible_dates: Vec<NaiveDate>,
}

impl ClientCapacity {
    /// Whether the client is geometrically eligible on this date.
    pub fn is_eligible_on(&self, date: NaiveDate) -> bool {
        self.eligible_dates.binary_search(&date).is_ok()
    }

    /// Count of eligible dates on or after `date`.
    pub fn eligible_on_or_after(&self, date: NaiveDate) -> usize {
        self.eligible_dates.len() - self.eligible_dates.partition_point(|d| *d < date)
    }
}

/// Monday of the week containing `date`; the key for all weekly bookkeeping.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(chrono::Weekday::Mon).first_day()
}

/// Compute capacities for every client, indexed like `request.clients`.
pub fn plan_capacity(request: &ScheduleRequest) -> Vec<ClientCapacity> {
    request
        .clients
        .iter()
        .map(|client| {
            let eligible_dates: Vec<NaiveDate> = request
                .start_date
                .iter_days()
                .take_while(|d| *d <= request.end_date)
                .filter(|d| availability::is_eligible(client, &request.supervisor, *d))
                .collect();

            let remaining = client.target_minutes();
            let min_session = client.min_session();

            // even pacing: sessions needed spread over the weeks that can host one
            let weeks: BTreeSet<NaiveDate> =
                eligible_dates.iter().map(|d| week_start(*d)).collect();
            let sessions_needed = ceil_div(remaining, min_session);
            let mut per_week_cap = ceil_div(sessions_needed, weeks.len().max(1) as u32).max(1);
            if let Some(cap) = client.max_sessions_per_week {
                per_week_cap = per_week_cap.min(cap);
            }
            if let Some(cap) = request.supervisor.max_sessions_per_week_per_client {
                per_week_cap = per_week_cap.min(cap);
            }

            ClientCapacity {
                remaining,
                min_session,
                per_week_cap,
                eligible_dates,
            }
        })
        .collect()
}

fn ceil_div(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        a.div_ceil(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClientRule, DayWindow, SupervisorConfig, TimeBlock, Weekday};
    use std::collections::BTreeMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn block(start: u16, end: u16) -> TimeBlock {
        TimeBlock { start, end }
    }

    fn test_request(client: ClientRule) -> ScheduleRequest {
        ScheduleRequest {
            start_date: date(2026, 1, 5),
            end_date: date(2026, 2, 1),
            clients: vec![client],
            supervisor: SupervisorConfig {
                active_days: vec![Weekday::Mon, Weekday::Thu],
                unavailable_days: Vec::new(),
                daily_avail: vec![
                    DayWindow {
                        day: Weekday::Mon,
                        blocks: vec![block(480, 1020)],
                    },
                    DayWindow {
                        day: Weekday::Thu,
                        blocks: vec![block(480, 1020)],
                    },
                ],
                date_overrides: BTreeMap::new(),
                rounding_minutes: 15,
                allow_sub_hour_if_unavoidable: false,
                max_sessions_per_week_per_client: None,
            },
        }
    }

    fn test_client() -> ClientRule {
        ClientRule {
            id: "alice".to_string(),
            monthly_hours: 8.0,
            min_session_mins: None,
            windows: vec![
                DayWindow {
                    day: Weekday::Mon,
                    blocks: vec![block(540, 720)],
                },
                DayWindow {
                    day: Weekday::Thu,
                    blocks: vec![block(540, 720)],
                },
            ],
            max_sessions_per_week: None,
            preferred_day_slots: Vec::new(),
        }
    }

    #[test]
    fn test_week_start_is_monday() {
        assert_eq!(week_start(date(2026, 1, 7)), date(2026, 1, 5));
        assert_eq!(week_start(date(2026, 1, 5)), date(2026, 1, 5));
        assert_eq!(week_start(date(2026, 1, 11)), date(2026, 1, 5));
    }

    #[test]
    fn test_eligible_dates_cover_both_weekdays() {
        let capacities = plan_capacity(&test_request(test_client()));
        let cap = &capacities[0];
        // Mondays and Thursdays between 2026-01-05 and 2026-02-01
        assert_eq!(cap.eligible_dates.len(), 8);
        assert!(cap.is_eligible_on(date(2026, 1, 5)));
        assert!(cap.is_eligible_on(date(2026, 1, 29)));
        assert!(!cap.is_eligible_on(date(2026, 1, 6)));
    }

    #[test]
    fn test_eligible_on_or_after() {
        let capacities = plan_capacity(&test_request(test_client()));
        let cap = &capacities[0];
        assert_eq!(cap.eligible_on_or_after(date(2026, 1, 5)), 8);
        assert_eq!(cap.eligible_on_or_after(date(2026, 1, 30)), 0);
        assert_eq!(cap.eligible_on_or_after(date(2026, 1, 29)), 1);
    }

    #[test]
    fn test_per_week_cap_even_pacing() {
        // 8 hours at 60-minute minimum over 4 eligible weeks: 2 per week
        let capacities = plan_capacity(&test_request(test_client()));
        assert_eq!(capacities[0].remaining, 480);
        assert_eq!(capacities[0].min_session, 60);
        assert_eq!(capacities[0].per_week_cap, 2);
    }

    #[test]
    fn test_per_week_cap_floor_one() {
        let mut client = test_client();
        client.monthly_hours = 0.5;
        let capacities = plan_capacity(&test_request(client));
        assert_eq!(capacities[0].per_week_cap, 1);
    }

    #[test]
    fn test_per_week_cap_client_clamp() {
        let mut client = test_client();
        client.max_sessions_per_week = Some(1);
        let capacities = plan_capacity(&test_request(client));
        assert_eq!(capacities[0].per_week_cap, 1);
    }

    #[test]
    fn test_per_week_cap_global_clamp() {
        let mut request = test_request(test_client());
        request.supervisor.max_sessions_per_week_per_client = Some(1);
        let capacities = plan_capacity(&request);
        assert_eq!(capacities[0].per_week_cap, 1);
    }

    #[test]
    fn test_no_eligible_dates() {
        let mut client = test_client();
        client.windows.clear();
        let capacities = plan_capacity(&test_request(client));
        assert!(capacities[0].eligible_dates.is_empty());
        assert_eq!(capacities[0].per_week_cap, 1);
    }
}
