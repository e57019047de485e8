//! Minute-of-day time blocks and interval algebra.
//!
//! All allocation math happens on integer minutes since midnight (0..=1440).
//! An interval list is *normalized* when it is sorted ascending by start and
//! overlapping or adjacent blocks are fused. The functions here accept
//! arbitrary input lists and always return normalized output; malformed
//! blocks (`end <= start`) are dropped during normalization.

use serde::{Deserialize, Serialize};

/// Number of minutes in a calendar day.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Day-of-week tag used by recurring windows and availability.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    /// Weekday of a calendar date.
    pub fn from_date(date: chrono::NaiveDate) -> Self {
        use chrono::Datelike;
        date.weekday().into()
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
            chrono::Weekday::Sun => Weekday::Sun,
        }
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => chrono::Weekday::Mon,
            Weekday::Tue => chrono::Weekday::Tue,
            Weekday::Wed => chrono::Weekday::Wed,
            Weekday::Thu => chrono::Weekday::Thu,
            Weekday::Fri => chrono::Weekday::Fri,
            Weekday::Sat => chrono::Weekday::Sat,
            Weekday::Sun => chrono::Weekday::Sun,
        }
    }
}

/// A contiguous minute-of-day interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    /// Minutes since midnight
    pub start: u16,
    /// Minutes since midnight, exclusive
    pub end: u16,
}

impl TimeBlock {
    /// Create a block, or `None` when `end <= start` or the block leaves the day.
    pub fn new(start: u16, end: u16) -> Option<Self> {
        if end > start && end <= MINUTES_PER_DAY {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Length of the block in minutes.
    pub fn minutes(&self) -> u16 {
        self.end - self.start
    }

    /// Check if this block overlaps another.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check if a minute-of-day lies inside this block (inclusive start, exclusive end).
    pub fn contains(&self, minute: u16) -> bool {
        self.start <= minute && minute < self.end
    }
}

/// Sort a block list ascending by start and fuse overlapping or adjacent
/// blocks. Malformed blocks (`end <= start`) are dropped.
pub fn normalize(blocks: &[TimeBlock]) -> Vec<TimeBlock> {
    let mut sorted: Vec<TimeBlock> = blocks
        .iter()
        .copied()
        .filter(|b| b.end > b.start)
        .collect();
    sorted.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

    let mut merged: Vec<TimeBlock> = Vec::new();
    for block in sorted {
        if let Some(last) = merged.last_mut() {
            if block.start <= last.end {
                if block.end > last.end {
                    last.end = block.end;
                }
            } else {
                merged.push(block);
            }
        } else {
            merged.push(block);
        }
    }
    merged
}

/// Pairwise intersection of two interval lists, returned normalized.
pub fn intersect(a: &[TimeBlock], b: &[TimeBlock]) -> Vec<TimeBlock> {
    let a = normalize(a);
    let b = normalize(b);

    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let start = a[i].start.max(b[j].start);
        let end = a[i].end.min(b[j].end);
        if start < end {
            out.push(TimeBlock { start, end });
        }
        if a[i].end <= b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}

/// Remove `block` from every interval of `avail`, returned normalized.
pub fn subtract(avail: &[TimeBlock], block: TimeBlock) -> Vec<TimeBlock> {
    let avail = normalize(avail);
    if block.end <= block.start {
        return avail;
    }

    let mut out = Vec::new();
    for cur in avail {
        if block.end <= cur.start || cur.end <= block.start {
            out.push(cur);
            continue;
        }
        if cur.start < block.start {
            out.push(TimeBlock {
                start: cur.start,
                end: block.start,
            });
        }
        if block.end < cur.end {
            out.push(TimeBlock {
                start: block.end,
                end: cur.end,
            });
        }
    }
    out
}

/// Sum of block lengths in minutes, counted after normalization.
pub fn total_minutes(blocks: &[TimeBlock]) -> u32 {
    normalize(blocks).iter().map(|b| b.minutes() as u32).sum()
}
