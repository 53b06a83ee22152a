//! Right-of-way arbitration between concurrently moving vehicles.
//!
//! A vehicle *blocks* another when it stands within the safety radius of a
//! point the other is about to sweep (its look-ahead trace).
//!
//! Every conflict, one-way or mutual, is settled by a single total order:
//! higher score first, equal scores by lower id.
//!
//! | Blocked by peer | Peer ranks higher | Outcome     |
//! |-----------------|-------------------|-------------|
//! | no              | any               | proceed     |
//! | yes             | no                | proceed     |
//! | yes             | yes               | brake       |
//!
//! A vehicle only ever brakes for a higher-ranked one, so the top-ranked
//! member of any group of conflicting vehicles always moves, cycles of
//! one-way blocks included.
//!
//! Scores come from [`PeerSnapshot::priority_score`]: committed maneuvers
//! score in `[2, 3]`, cruisers in `(0, 1]`, so a maneuver never yields to a
//! cruiser.

use std::cmp::Ordering;

use ps_core::Point2;

use crate::{AgentError, AgentResult, PeerSnapshot};

/// Outcome of arbitration for one vehicle on one tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Arbitration {
    /// `Some(score)` while in at least one conflict.
    pub priority: Option<f64>,
    pub braking:  bool,
}

/// Decide whether `me` must brake for any of `peers`.
///
/// `peers` may contain `me` itself and terminal vehicles; both are skipped.
///
/// # Errors
///
/// [`AgentError::UnresolvablePriority`] when a blocking peer's score does
/// not compare with ours (NaN).
pub fn arbitrate(
    me:            &PeerSnapshot,
    peers:         &[PeerSnapshot],
    safety_radius: f64,
) -> AgentResult<Arbitration> {
    let mut out = Arbitration::default();

    for peer in peers {
        if peer.id == me.id || peer.task.is_none() {
            continue;
        }

        let blocked = sweeps_near(&me.lookahead, peer.position, safety_radius);
        let blocking = sweeps_near(&peer.lookahead, me.position, safety_radius);
        if !blocked && !blocking {
            continue;
        }
        out.priority = Some(me.priority_score);

        if blocked && outranks(peer, me)? {
            log::trace!("{} yields to {}", me.id, peer.id);
            out.braking = true;
        }
    }

    Ok(out)
}

/// `true` when `peer` precedes `me`: higher score, or equal score and
/// lower id.
fn outranks(peer: &PeerSnapshot, me: &PeerSnapshot) -> AgentResult<bool> {
    let ord = peer
        .priority_score
        .partial_cmp(&me.priority_score)
        .ok_or(AgentError::UnresolvablePriority { a: me.id, b: peer.id })?;
    Ok(match ord {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => peer.id < me.id,
    })
}

fn sweeps_near(trace: &[Point2], p: Point2, radius: f64) -> bool {
    trace.iter().any(|q| q.distance(p) <= radius)
}
