//! `ps-spatial` — lot geometry, waypoint graph routing, and parking maneuvers.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`lot`]      | `ParkingSpot`, `ParkingLot`, `Lane`, `LotLayout`           |
//! | [`loader`]   | `load_spots_csv`, `load_spots_reader`, `SpotTable`         |
//! | [`network`]  | `WaypointGraph` (CSR + R-tree), `WaypointGraphBuilder`     |
//! | [`router`]   | `RoutePlanner` trait, `RouteGoal`, `DijkstraPlanner`       |
//! | [`maneuver`] | `ManeuverLibrary` trait, `ManeuverKind`, `ArcManeuvers`    |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on lot geometry types.     |

pub mod error;
pub mod loader;
pub mod lot;
pub mod maneuver;
pub mod network;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use loader::{SpotTable, load_spots_csv, load_spots_reader};
pub use lot::{Lane, LotLayout, ParkingLot, ParkingSpot};
pub use maneuver::{ArcManeuvers, ManeuverKind, ManeuverLibrary};
pub use network::{WaypointGraph, WaypointGraphBuilder};
pub use router::{DijkstraPlanner, RouteGoal, RoutePlanner};
