//! Common Data Bus (CDB) arbitration.
//!
//! One result is broadcast per cycle. When several stations hold finished,
//! un-broadcast results, the one whose destination ROB tag is oldest in
//! program order wins; tags are unique, so there are no ties.

use crate::core::pipeline::rob::RobTag;
use crate::core::pipeline::station::{ExecPhase, StationFile};
use crate::core::pipeline::unit::UnitKind;

/// A broadcast on the common data bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CdbMessage {
    /// Destination ROB tag of the broadcasting station.
    pub tag: RobTag,
    /// Broadcast value, substituted into waiting operand slots.
    pub value: u16,
}

/// Selects the station that wins the CDB this cycle.
///
/// Returns the (unit kind, slot index) of the oldest finished station, or
/// `None` when nothing is waiting to broadcast.
pub fn arbitrate(stations: &StationFile) -> Option<(UnitKind, usize)> {
    let mut winner: Option<(UnitKind, usize, RobTag)> = None;
    for pool in &stations.pools {
        for (idx, slot) in pool.slots.iter().enumerate() {
            let Some(entry) = slot else { continue };
            if entry.retiring || !matches!(entry.phase, ExecPhase::Finished(_)) {
                continue;
            }
            let older = winner.is_none_or(|(_, _, best)| entry.dest_tag < best);
            if older {
                winner = Some((pool.kind, idx, entry.dest_tag));
            }
        }
    }
    winner.map(|(kind, idx, _)| (kind, idx))
}
