//! Greedy allocation engine.
//!
//! Walks calendar dates in ascending order and, for each date with usable
//! supervisor time, runs bounded placement passes of a priority-scored
//! greedy choice of which client to place next and how much time to give
//! it. Strictly forward: no retries, no backtracking across dates, and an
//! infeasible target is not an error; the client simply ends the run with
//! remaining minutes unplaced.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use log::debug;

use crate::api::{ScheduleRequest, ScheduledBlock};
use crate::models::time::{self, TimeBlock, Weekday};
use crate::scheduler::availability;
use crate::scheduler::capacity::{self, ClientCapacity};
use crate::scheduler::topup;

/// Upper bound on placement passes per calendar date.
const MAX_PLACEMENT_PASSES: usize = 30;

/// Transient per-run allocation state, created for one `generate` call and
/// discarded on return. Clients are addressed by their index in the request.
pub(crate) struct AllocationContext {
    pub capacities: Vec<ClientCapacity>,
    pub remaining: Vec<u32>,
    pub sessions_this_week: HashMap<(usize, NaiveDate), u32>,
    pub last_scheduled: Vec<Option<NaiveDate>>,
    pub slot_satisfied: HashSet<(usize, usize, NaiveDate)>,
    pub blocks: Vec<ScheduledBlock>,
}

impl AllocationContext {
    pub(crate) fn new(capacities: Vec<ClientCapacity>) -> Self {
        let remaining = capacities.iter().map(|c| c.remaining).collect();
        let client_count = capacities.len();
        Self {
            capacities,
            remaining,
            sessions_this_week: HashMap::new(),
            last_scheduled: vec![None; client_count],
            slot_satisfied: HashSet::new(),
            blocks: Vec::new(),
        }
    }
}

/// A scored placement candidate for one pass.
struct Candidate {
    index: usize,
    under_cap: bool,
    /// First unsatisfied preferred slot matching today, if any
    slot: Option<usize>,
    back_to_back: bool,
    per_day_need: f64,
}

/// Allocate supervision blocks for the request.
///
/// The single entry point of the engine: pure, synchronous, and
/// deterministic; identical requests produce identical block lists. The
/// residual top-up pass runs after the date loop and may extend block ends.
pub fn generate(request: &ScheduleRequest) -> Vec<ScheduledBlock> {
    let mut ctx = AllocationContext::new(capacity::plan_capacity(request));
    for date in request
        .start_date
        .iter_days()
        .take_while(|d| *d <= request.end_date)
    {
        allocate_date(request, &mut ctx, date);
    }
    topup::absorb_residuals(request, &mut ctx);
    debug!(
        "allocation finished: {} blocks, {} clients under target",
        ctx.blocks.len(),
        ctx.remaining.iter().filter(|r| **r > 0).count()
    );
    ctx.blocks
}

fn allocate_date(request: &ScheduleRequest, ctx: &mut AllocationContext, date: NaiveDate) {
    let mut day_avail = availability::supervisor_day_blocks(&request.supervisor, date);
    if day_avail.is_empty() {
        return;
    }
    let day = Weekday::from_date(date);
    let week = capacity::week_start(date);
    let rounding = request.supervisor.rounding();
    let allow_sub = request.supervisor.allow_sub_hour_if_unavoidable;
    let mut placed_today: HashSet<usize> = HashSet::new();

    for _pass in 0..MAX_PLACEMENT_PASSES {
        let candidates = collect_candidates(request, ctx, date, day, week, &placed_today);
        if candidates.is_empty() {
            break;
        }

        let mut placed_any = false;
        for cand in &candidates {
            let index = cand.index;
            if placed_today.contains(&index) || ctx.remaining[index] == 0 {
                continue;
            }
            // over-cap candidates survive scoring but are skipped at placement time
            if !cand.under_cap {
                continue;
            }
            let client = &request.clients[index];

            // soft slot preference: a non-matching day is skipped only while a
            // better-matching candidate with remaining need is still in play
            if !client.preferred_day_slots.is_empty() && cand.slot.is_none() {
                let better_exists = candidates.iter().any(|other| {
                    other.index != index
                        && other.slot.is_some()
                        && other.under_cap
                        && ctx.remaining[other.index] > 0
                        && !placed_today.contains(&other.index)
                });
                if better_exists {
                    continue;
                }
            }

            let feasible =
                time::intersect(&availability::client_day_blocks(client, day), &day_avail);
            if feasible.is_empty() {
                continue;
            }

            let min_session = ctx.capacities[index].min_session;
            let required = if allow_sub {
                min_session.max(rounding)
            } else {
                min_session
            };
            let block = feasible
                .iter()
                .copied()
                .find(|b| b.minutes() as u32 >= required)
                .unwrap_or(feasible[0]);

            let Some(length) = session_length(
                ctx.remaining[index],
                block.minutes() as u32,
                cand.per_day_need,
                min_session,
                rounding,
                allow_sub,
            ) else {
                continue;
            };

            let placed = TimeBlock {
                start: block.start,
                end: block.start + length as u16,
            };
            ctx.blocks.push(ScheduledBlock {
                date,
                client_id: client.id.clone(),
                start: placed.start,
                end: placed.end,
            });
            ctx.remaining[index] -= length;
            day_avail = time::subtract(&day_avail, placed);
            placed_today.insert(index);
            *ctx.sessions_this_week.entry((index, week)).or_insert(0) += 1;
            ctx.last_scheduled[index] = Some(date);
            if let Some(slot) = cand.slot {
                ctx.slot_satisfied.insert((index, slot, week));
            }
            placed_any = true;
        }

        if !placed_any {
            break;
        }
    }
}

/// Score every placeable client for one pass and sort into placement order.
fn collect_candidates(
    request: &ScheduleRequest,
    ctx: &AllocationContext,
    date: NaiveDate,
    day: Weekday,
    week: NaiveDate,
    placed_today: &HashSet<usize>,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::new();
    for (index, client) in request.clients.iter().enumerate() {
        if placed_today.contains(&index) || ctx.remaining[index] == 0 {
            continue;
        }
        let cap = &ctx.capacities[index];
        if !cap.is_eligible_on(date) {
            continue;
        }
        let sessions = ctx
            .sessions_this_week
            .get(&(index, week))
            .copied()
            .unwrap_or(0);
        let slot = client
            .preferred_day_slots
            .iter()
            .enumerate()
            .find(|(slot_idx, days)| {
                days.contains(&day) && !ctx.slot_satisfied.contains(&(index, *slot_idx, week))
            })
            .map(|(slot_idx, _)| slot_idx);
        let back_to_back = match (ctx.last_scheduled[index], date.pred_opt()) {
            (Some(last), Some(prev)) => last == prev,
            _ => false,
        };
        let horizon = cap.eligible_on_or_after(date).max(1);
        candidates.push(Candidate {
            index,
            under_cap: sessions < cap.per_week_cap,
            slot,
            back_to_back,
            per_day_need: ctx.remaining[index] as f64 / horizon as f64,
        });
    }
    candidates.sort_by(compare_candidates);
    candidates
}

/// Placement priority: under-cap first, then slot-match, then not
/// back-to-back, then descending per-day need. The original client order
/// makes the ordering total, so equal scores cannot reorder between runs.
fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    b.under_cap
        .cmp(&a.under_cap)
        .then(b.slot.is_some().cmp(&a.slot.is_some()))
        .then(a.back_to_back.cmp(&b.back_to_back))
        .then(
            b.per_day_need
                .partial_cmp(&a.per_day_need)
                .unwrap_or(Ordering::Equal),
        )
        .then(a.index.cmp(&b.index))
}

/// Pick the session length for a chosen block.
///
/// Starts from `min(remaining, block, per-day need)`, tries to lift
/// below-unit or below-minimum targets to the client minimum (or to a
/// sub-minimum length when permitted), and floors the result to the
/// quantization unit. `None` means nothing placeable remains.
fn session_length(
    remaining: u32,
    block_len: u32,
    per_day_need: f64,
    min_session: u32,
    rounding: u32,
    allow_sub: bool,
) -> Option<u32> {
    let rounding_f = rounding as f64;
    let min_session_f = min_session as f64;
    let block_f = block_len as f64;
    let remaining_f = remaining as f64;

    let mut target = remaining_f.min(block_f).min(per_day_need);
    if target < rounding_f {
        if block_f >= min_session_f && remaining_f >= min_session_f {
            target = min_session_f;
        } else if allow_sub {
            target = rounding_f;
        }
    }
    target = (target / rounding_f).floor() * rounding_f;
    if target < min_session_f {
        if block_f >= min_session_f && remaining_f >= min_session_f {
            target = min_session_f;
        } else if allow_sub {
            target = (block_f / rounding_f).floor() * rounding_f;
        } else {
            return None;
        }
    }
    target = target.min(block_f).min(remaining_f);
    target = (target / rounding_f).floor() * rounding_f;
    if target <= 0.0 {
        return None;
    }
    Some(target as u32)
}
