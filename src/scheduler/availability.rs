//! Per-date availability resolution.
//!
//! Derives, for a client and calendar date, the usable time intervals after
//! intersecting client authorization, supervisor recurring availability,
//! closed dates, and one-off date exceptions. A date with no usable
//! supervisor interval is simply skipped by the engine; it is not an error.

use chrono::NaiveDate;

use crate::api::{ClientRule, DayWindow, SupervisorConfig};
use crate::models::time::{self, TimeBlock, Weekday};

/// The supervisor's usable intervals on a concrete date.
///
/// Empty when the weekday is not worked or the date is a full-day closure.
/// One-off exception blocks are subtracted from this date only; recurring
/// availability on other dates of the same weekday is unaffected.
pub fn supervisor_day_blocks(supervisor: &SupervisorConfig, date: NaiveDate) -> Vec<TimeBlock> {
    let day = Weekday::from_date(date);
    if !supervisor.is_active_day(day) || supervisor.is_closed_date(date) {
        return Vec::new();
    }
    let mut avail = supervisor_recurring_blocks(supervisor, day);
    if let Some(exceptions) = supervisor.date_overrides.get(&date) {
        for block in exceptions {
            avail = time::subtract(&avail, *block);
        }
    }
    avail
}

/// The supervisor's recurring availability for a weekday, normalized.
pub fn supervisor_recurring_blocks(supervisor: &SupervisorConfig, day: Weekday) -> Vec<TimeBlock> {
    collect_day_blocks(&supervisor.daily_avail, day)
}

/// A client's recurring authorized windows for a weekday, normalized.
pub fn client_day_blocks(client: &ClientRule, day: Weekday) -> Vec<TimeBlock> {
    collect_day_blocks(&client.windows, day)
}

fn collect_day_blocks(windows: &[DayWindow], day: Weekday) -> Vec<TimeBlock> {
    let blocks: Vec<TimeBlock> = windows
        .iter()
        .filter(|w| w.day == day)
        .flat_map(|w| w.blocks.iter().copied())
        .collect();
    time::normalize(&blocks)
}

/// Usable intervals for a (client, date) pair with exceptions applied.
pub fn resolve_client_day(
    client: &ClientRule,
    supervisor: &SupervisorConfig,
    date: NaiveDate,
) -> Vec<TimeBlock> {
    let day = Weekday::from_date(date);
    time::intersect(
        &client_day_blocks(client, day),
        &supervisor_day_blocks(supervisor, date),
    )
}

/// Whether any placement is geometrically possible for the client on this
/// date, judged from weekly-recurring data only. Closed dates and inactive
/// weekdays disqualify; one-off exceptions are ignored. This governs weekly
/// caps and per-day-need denominators, independent of how much time is
/// actually used later.
pub fn is_eligible(client: &ClientRule, supervisor: &SupervisorConfig, date: NaiveDate) -> bool {
    let day = Weekday::from_date(date);
    if !supervisor.is_active_day(day) || supervisor.is_closed_date(date) {
        return false;
    }
    !time::intersect(
        &client_day_blocks(client, day),
        &supervisor_recurring_blocks(supervisor, day),
    )
    .is_empty()
}
