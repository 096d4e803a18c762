//! What each tick and sync did, including everything it skipped and why.
//!
//! Stages never abort a tick. Instead, per-pair and per-entity problems are
//! recorded here so the host can notice degraded ticks.

use std::fmt;

use crate::{
    error::SyncError,
    types::{CollisionPair, EntityId},
};

/// Why response left a confirmed pair untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Neither body can move.
    BothStatic,
    /// Centers coincide, so there is no contact normal.
    CoincidentCenters,
    /// Bodies are already moving apart along the normal.
    Separating,
    /// An earlier correction in the same tick pulled the bounds apart.
    BoundsNoLongerOverlap,
}

impl SkipReason {
    /// Normal outcomes that do not indicate a degraded tick.
    #[inline]
    pub fn is_expected(&self) -> bool {
        matches!(self, SkipReason::BothStatic | SkipReason::Separating)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::BothStatic => "both bodies static",
            SkipReason::CoincidentCenters => "coincident centers",
            SkipReason::Separating => "separating",
            SkipReason::BoundsNoLongerOverlap => "bounds no longer overlap",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkippedPair {
    pub pair: CollisionPair,
    pub reason: SkipReason,
}

/// Summary of one `tick`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Tick counter after this tick (1 for the first tick).
    pub tick: u64,
    pub integrated: usize,
    /// Broad-phase candidate pairs.
    pub candidates: usize,
    /// Pairs confirmed by narrow-phase.
    pub contacts: usize,
    /// Pairs that received an impulse.
    pub resolved: usize,
    pub skipped: Vec<SkippedPair>,
}

impl TickReport {
    /// True when a pair was skipped for a reason other than a normal outcome.
    pub fn is_degraded(&self) -> bool {
        self.skipped.iter().any(|s| !s.reason.is_expected())
    }

    pub fn skipped_for(&self, reason: SkipReason) -> impl Iterator<Item = &SkippedPair> {
        self.skipped.iter().filter(move |s| s.reason == reason)
    }
}

/// Summary of one `sync`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SyncReport {
    /// Transforms accepted by the scene.
    pub pushed: usize,
    /// Entities whose transform could not be delivered.
    pub skipped: Vec<(EntityId, SyncError)>,
}

impl SyncReport {
    pub fn is_degraded(&self) -> bool {
        !self.skipped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skipped(reason: SkipReason) -> SkippedPair {
        SkippedPair {
            pair: CollisionPair::new(EntityId(0), EntityId(1)),
            reason,
        }
    }

    #[test]
    fn separating_and_static_pairs_do_not_degrade_a_tick() {
        let report = TickReport {
            skipped: vec![
                skipped(SkipReason::Separating),
                skipped(SkipReason::BothStatic),
            ],
            ..TickReport::default()
        };
        assert!(!report.is_degraded());
    }

    #[test]
    fn coincident_centers_degrade_a_tick() {
        let report = TickReport {
            skipped: vec![
                skipped(SkipReason::Separating),
                skipped(SkipReason::CoincidentCenters),
            ],
            ..TickReport::default()
        };
        assert!(report.is_degraded());
        assert_eq!(report.skipped_for(SkipReason::CoincidentCenters).count(), 1);
    }
}
