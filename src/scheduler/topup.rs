//! Residual top-up pass.
//!
//! Absorbs leftover target minutes too small to form a new minimum-length
//! session. A client with `0 < remaining <= rounding unit` gets at most one
//! already-placed block extended by exactly one rounding unit, bounded by
//! the supervisor's containing recurring interval, the client's containing
//! authorized window, and the next block placed that day. The extension is
//! a full unit even when the residual is smaller, so a client can finish
//! slightly over target; residuals with no headroom anywhere stay
//! unscheduled.

use log::debug;

use crate::api::ScheduleRequest;
use crate::models::time::{TimeBlock, Weekday};
use crate::scheduler::allocator::AllocationContext;
use crate::scheduler::availability;

pub(crate) fn absorb_residuals(request: &ScheduleRequest, ctx: &mut AllocationContext) {
    let rounding = request.supervisor.rounding();
    for (index, client) in request.clients.iter().enumerate() {
        let remaining = ctx.remaining[index];
        if remaining == 0 || remaining > rounding {
            continue;
        }

        let mut owned: Vec<usize> = (0..ctx.blocks.len())
            .filter(|i| ctx.blocks[*i].client_id == client.id)
            .collect();
        owned.sort_by_key(|i| ctx.blocks[*i].date);

        for block_idx in owned {
            let Some(limit) = extension_limit(request, ctx, index, block_idx) else {
                continue;
            };
            let end = ctx.blocks[block_idx].end;
            if (limit - end) as u32 >= rounding {
                ctx.blocks[block_idx].end += rounding as u16;
                ctx.remaining[index] = ctx.remaining[index].saturating_sub(rounding);
                debug!(
                    "extended block for '{}' on {} by {} minutes",
                    client.id, ctx.blocks[block_idx].date, rounding
                );
                // one extension per client per run
                break;
            }
        }
    }
}

/// Furthest allowed end for a block: bounded by the supervisor's recurring
/// interval containing the block end, the client's containing window, and
/// the start of the next block placed the same date (any client). `None`
/// when no containing interval exists on either side.
fn extension_limit(
    request: &ScheduleRequest,
    ctx: &AllocationContext,
    client_index: usize,
    block_idx: usize,
) -> Option<u16> {
    let block = &ctx.blocks[block_idx];
    let day = Weekday::from_date(block.date);
    let client = &request.clients[client_index];

    let supervisor_blocks = availability::supervisor_recurring_blocks(&request.supervisor, day);
    let supervisor_end = containing_end(&supervisor_blocks, block.end)?;
    let client_blocks = availability::client_day_blocks(client, day);
    let client_end = containing_end(&client_blocks, block.end)?;

    let next_start = ctx
        .blocks
        .iter()
        .filter(|b| b.date == block.date && b.start >= block.end)
        .map(|b| b.start)
        .min();

    let mut limit = supervisor_end.min(client_end);
    if let Some(next) = next_start {
        limit = limit.min(next);
    }
    Some(limit)
}

/// End of the interval containing `end`, treating an exact interval end as
/// contained so a block filling its window reports zero headroom.
fn containing_end(blocks: &[TimeBlock], end: u16) -> Option<u16> {
    blocks
        .iter()
        .find(|b| b.start < end && end <= b.end)
        .map(|b| b.end)
}
