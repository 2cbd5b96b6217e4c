//! Seat availability of a training.

use serde::Serialize;

/// Fill level bucket derived from `enrolled / capacity`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum Availability {
    /// Below 70% full.
    Available,
    /// 70% up to but excluding 90%.
    Limited,
    /// 90% or more, or no capacity at all.
    Full,
}

impl Availability {
    pub const ALL: [Availability; 3] = [
        Availability::Available,
        Availability::Limited,
        Availability::Full,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "Available",
            Availability::Limited => "Limited",
            Availability::Full => "Full",
        }
    }
}

/// Classify with integer arithmetic so the 70% and 90% boundaries are exact.
pub fn classify_availability(enrolled: u32, capacity: u32) -> Availability {
    let filled = u64::from(enrolled) * 100;
    let capacity = u64::from(capacity);

    if filled < 70 * capacity {
        Availability::Available
    } else if filled < 90 * capacity {
        Availability::Limited
    } else {
        Availability::Full
    }
}
