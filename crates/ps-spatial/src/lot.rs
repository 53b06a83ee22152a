//! Parking-lot geometry: spots, entrance/exit and the synthetic layout.
//!
//! # Synthetic layout
//!
//! [`LotLayout`] generates a single east-west aisle with a row of nose-in
//! spots on each side:
//!
//! ```text
//!   y
//!   ^    [0][1][2] ... [n-1]          north row, heading +π/2
//!   |  ←──────────────────────┐       exit lane   (y = +lane_offset)
//!   |  ──────────────────────→┘       entry lane  (y = −lane_offset)
//!   |    [n][n+1]  ... [2n-1]         south row, heading −π/2
//!   +──────────────────────────> x
//! ```
//!
//! Vehicles enter at the west end of the entry lane, turn into a spot from
//! it, back out of a spot onto the exit lane and leave at its west end.

use std::f64::consts::{FRAC_PI_2, PI};

use ps_core::{Point2, Pose, SpotId};

use crate::network::{WaypointGraph, WaypointGraphBuilder};
use crate::{SpatialError, SpatialResult};

// ── ParkingSpot ───────────────────────────────────────────────────────────────

/// One parking spot.  `heading` is the direction a nose-in parked vehicle
/// faces.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParkingSpot {
    pub id:      SpotId,
    pub center:  Point2,
    pub heading: f64,
}

impl ParkingSpot {
    /// Pose of a vehicle parked in this spot.
    #[inline]
    pub fn pose(&self) -> Pose {
        Pose::new(self.center, self.heading)
    }
}

// ── Lane ──────────────────────────────────────────────────────────────────────

/// An infinite straight lane line with a travel direction.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lane {
    pub origin:  Point2,
    pub heading: f64,
}

impl Lane {
    #[inline]
    pub fn direction(&self) -> Point2 {
        Point2::from_heading(self.heading)
    }

    /// Signed distance from `p` to the lane line (positive on the left).
    #[inline]
    pub fn offset_of(&self, p: Point2) -> f64 {
        (p - self.origin).dot(self.direction().perp())
    }
}

// ── ParkingLot ────────────────────────────────────────────────────────────────

/// Static lot geometry established once at world setup.
#[derive(Clone, Debug)]
pub struct ParkingLot {
    spots: Vec<ParkingSpot>,
    initial_occupancy: Vec<bool>,
    /// Entering vehicles spawn behind this pose.
    pub entrance: Pose,
    /// Exiting vehicles drive here.
    pub exit: Point2,
}

impl ParkingLot {
    /// Build a lot.  Spot ids must equal their position in `spots`, and
    /// `initial_occupancy` must have one entry per spot.
    pub fn new(
        spots:             Vec<ParkingSpot>,
        initial_occupancy: Vec<bool>,
        entrance:          Pose,
        exit:              Point2,
    ) -> SpatialResult<Self> {
        if spots.len() != initial_occupancy.len() {
            return Err(SpatialError::Parse(format!(
                "{} spots but {} occupancy flags",
                spots.len(),
                initial_occupancy.len()
            )));
        }
        if let Some((i, s)) = spots.iter().enumerate().find(|(i, s)| s.id.index() != *i) {
            return Err(SpatialError::Parse(format!("spot at position {i} has id {}", s.id)));
        }
        Ok(Self { spots, initial_occupancy, entrance, exit })
    }

    pub fn spots(&self) -> &[ParkingSpot] {
        &self.spots
    }

    pub fn spot(&self, id: SpotId) -> SpatialResult<&ParkingSpot> {
        self.spots.get(id.index()).ok_or(SpatialError::SpotNotFound(id))
    }

    pub fn spot_count(&self) -> usize {
        self.spots.len()
    }

    /// Occupancy supplied by the dataset (static obstacles) at setup.
    pub fn initial_occupancy(&self) -> &[bool] {
        &self.initial_occupancy
    }
}

// ── LotLayout ─────────────────────────────────────────────────────────────────

/// Parameters of the synthetic single-aisle lot.  All lengths in metres.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LotLayout {
    /// Spots in each of the two rows.
    pub spots_per_row: usize,
    pub spot_width: f64,
    pub spot_depth: f64,
    /// Distance from the aisle centerline to the spot mouths.
    pub aisle_half_width: f64,
    /// Distance from the aisle centerline to each lane.
    pub lane_offset: f64,
    /// x of the first spot center (the entrance is at x = 0).
    pub first_spot_x: f64,
    /// How far the lanes extend past the last spot.
    pub lane_overrun: f64,
    /// Spacing between graph nodes along a lane.
    pub node_spacing: f64,
    /// Spots that hold a static obstacle at setup.
    pub occupied: Vec<u32>,
}

impl Default for LotLayout {
    fn default() -> Self {
        Self {
            spots_per_row:    12,
            spot_width:       2.6,
            spot_depth:       5.0,
            aisle_half_width: 4.0,
            lane_offset:      2.0,
            first_spot_x:     12.0,
            lane_overrun:     10.0,
            node_spacing:     4.0,
            occupied:         Vec::new(),
        }
    }
}

impl LotLayout {
    /// Distance from the aisle centerline to a spot center.
    fn row_offset(&self) -> f64 {
        self.aisle_half_width + self.spot_depth / 2.0
    }

    fn lane_end_x(&self) -> f64 {
        self.first_spot_x + self.spot_width * self.spots_per_row.saturating_sub(1) as f64 + self.lane_overrun
    }

    /// Spot center and nose-in heading for every spot: north row first.
    pub fn spots(&self) -> Vec<ParkingSpot> {
        let n = self.spots_per_row;
        (0..2 * n)
            .map(|i| {
                let (col, y, heading) = if i < n {
                    (i, self.row_offset(), FRAC_PI_2)
                } else {
                    (i - n, -self.row_offset(), -FRAC_PI_2)
                };
                ParkingSpot {
                    id:      SpotId(i as u32),
                    center:  Point2::new(self.first_spot_x + self.spot_width * col as f64, y),
                    heading,
                }
            })
            .collect()
    }

    /// The eastbound lane vehicles enter on.
    pub fn entry_lane(&self) -> Lane {
        Lane { origin: Point2::new(0.0, -self.lane_offset), heading: 0.0 }
    }

    /// The westbound lane vehicles leave on.
    pub fn exit_lane(&self) -> Lane {
        Lane { origin: Point2::new(0.0, self.lane_offset), heading: PI }
    }

    pub fn lot(&self) -> SpatialResult<ParkingLot> {
        let spots = self.spots();
        let mut occupancy = vec![false; spots.len()];
        for &i in &self.occupied {
            let slot = occupancy
                .get_mut(i as usize)
                .ok_or(SpatialError::SpotNotFound(SpotId(i)))?;
            *slot = true;
        }
        ParkingLot::new(
            spots,
            occupancy,
            Pose::new(self.entry_lane().origin, 0.0),
            self.exit_lane().origin,
        )
    }

    /// Two one-way lanes joined by a U-turn at the east end.
    pub fn graph(&self) -> WaypointGraph {
        let end = self.lane_end_x();
        let steps = (end / self.node_spacing).ceil().max(1.0) as usize;
        let xs: Vec<f64> = (0..=steps).map(|i| end * i as f64 / steps as f64).collect();

        let mut b = WaypointGraphBuilder::new();
        let east: Vec<_> = xs
            .iter()
            .map(|&x| b.add_node(Point2::new(x, -self.lane_offset)))
            .collect();
        let west: Vec<_> = xs
            .iter()
            .rev()
            .map(|&x| b.add_node(Point2::new(x, self.lane_offset)))
            .collect();

        b.add_lane(&east);
        b.add_directed_edge(east[east.len() - 1], west[0]);
        b.add_lane(&west);
        b.build()
    }
}

impl ParkingLot {
    /// Lot geometry generated from a synthetic layout.
    pub fn from_layout(layout: &LotLayout) -> SpatialResult<Self> {
        layout.lot()
    }
}
