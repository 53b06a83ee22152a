//! Vehicle tasks.

use std::fmt;

use ps_core::{Point2, SpotId};

/// Where a cruise ends.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CruiseTarget {
    /// The start pose of the park maneuver into this spot.
    Spot(SpotId),
    /// A plain point, approached from any direction.
    Coords(Point2),
}

/// One unit of work in a vehicle's task profile.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Task {
    /// Track a planned route at up to `v_cruise` m/s.
    Cruise { v_cruise: f64, target: CruiseTarget },
    /// Replay the park maneuver into `spot`.
    Park { spot: SpotId },
    /// Replay the unpark maneuver out of `spot`.
    Unpark { spot: SpotId },
}

impl Task {
    #[inline]
    pub fn kind(&self) -> TaskKind {
        match self {
            Task::Cruise { .. } => TaskKind::Cruise,
            Task::Park { .. } => TaskKind::Park,
            Task::Unpark { .. } => TaskKind::Unpark,
        }
    }

    /// The spot this task parks into, if any.
    #[inline]
    pub fn parks_into(&self) -> Option<SpotId> {
        match *self {
            Task::Park { spot } => Some(spot),
            _ => None,
        }
    }
}

/// Task discriminant without payload.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskKind {
    Cruise,
    Park,
    Unpark,
}

impl TaskKind {
    /// `true` for the offline maneuvers.
    #[inline]
    pub fn is_maneuver(self) -> bool {
        matches!(self, TaskKind::Park | TaskKind::Unpark)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskKind::Cruise => "CRUISE",
            TaskKind::Park => "PARK",
            TaskKind::Unpark => "UNPARK",
        })
    }
}
