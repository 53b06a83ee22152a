//! Typed identifiers for vehicles, parking spots and the aisle graph.
//!
//! `SpotId`, `NodeId` and `EdgeId` are plain indices into the lot's spot
//! list and the waypoint graph, so `.index()` addresses the matching `Vec`
//! directly.  `VehicleId` is the exception: it carries meaning through its
//! ordering, which breaks right-of-way ties between equal priority scores.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" (`u32::MAX`).
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Identifier of a spawned vehicle, assigned from 1 in spawn order.
    ///
    /// The derived `Ord` is the right-of-way tie-break: of two conflicting
    /// vehicles with equal priority scores, the lower id (the earlier spawn)
    /// proceeds.  `Display` prints `VehicleId(n)`, the form used in logs.
    pub struct VehicleId(u32);
}

typed_id! {
    /// Position of a parking spot in the lot's spot list, and equally its
    /// slot in the occupancy ledger.  Spot tables carry it in their `id`
    /// column, numbered from 0 without gaps.
    pub struct SpotId(u32);
}

typed_id! {
    /// Index of a waypoint-graph node.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed waypoint-graph edge.
    pub struct EdgeId(u32);
}
