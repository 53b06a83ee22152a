//! CSV parking-spot loader.
//!
//! # CSV format
//!
//! One row per spot.  Ids must cover `0..n` exactly once; row order does not
//! matter.  `heading` is the nose-in direction in radians and `occupied`
//! marks a spot holding a static obstacle at setup.
//!
//! ```csv
//! id,x,y,heading,occupied
//! 0,12.0,6.5,1.5708,false
//! 1,14.6,6.5,1.5708,true
//! 2,12.0,-6.5,-1.5708,false
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ps_core::{Point2, Pose, SpotId};

use crate::lot::{ParkingLot, ParkingSpot};
use crate::{SpatialError, SpatialResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SpotRecord {
    id:       u32,
    x:        f64,
    y:        f64,
    heading:  f64,
    occupied: bool,
}

// ── SpotTable ─────────────────────────────────────────────────────────────────

/// Spots and their initial occupancy, indexed by `SpotId`.
#[derive(Clone, Debug, Default)]
pub struct SpotTable {
    pub spots:    Vec<ParkingSpot>,
    pub occupied: Vec<bool>,
}

impl SpotTable {
    /// Attach an entrance and exit to form a complete lot.
    pub fn into_lot(self, entrance: Pose, exit: Point2) -> SpatialResult<ParkingLot> {
        ParkingLot::new(self.spots, self.occupied, entrance, exit)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load parking spots from a CSV file.
pub fn load_spots_csv(path: &Path) -> SpatialResult<SpotTable> {
    let file = std::fs::File::open(path)?;
    load_spots_reader(file)
}

/// Like [`load_spots_csv`] but accepts any `Read` source.
pub fn load_spots_reader<R: Read>(reader: R) -> SpatialResult<SpotTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut rows: Vec<SpotRecord> = Vec::new();
    for result in csv_reader.deserialize::<SpotRecord>() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        if !(row.x.is_finite() && row.y.is_finite() && row.heading.is_finite()) {
            return Err(SpatialError::Parse(format!("spot {} has non-finite geometry", row.id)));
        }
        rows.push(row);
    }
    rows.sort_by_key(|r| r.id);

    for (i, r) in rows.iter().enumerate() {
        if r.id as usize != i {
            return Err(SpatialError::Parse(format!(
                "spot ids must be 0..{} without gaps or duplicates, found {} at position {i}",
                rows.len(),
                r.id
            )));
        }
    }

    log::info!("loaded {} parking spots", rows.len());

    let occupied = rows.iter().map(|r| r.occupied).collect();
    let spots = rows
        .into_iter()
        .map(|r| ParkingSpot {
            id:      SpotId(r.id),
            center:  Point2::new(r.x, r.y),
            heading: r.heading,
        })
        .collect();

    Ok(SpotTable { spots, occupied })
}
