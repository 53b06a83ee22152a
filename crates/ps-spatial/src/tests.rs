//! Unit tests for ps-spatial.
//!
//! All tests use hand-built graphs or the default synthetic layout, so no
//! data files are needed (except the loader test, which writes its own).

#[cfg(test)]
mod helpers {
    use ps_core::{NodeId, Point2};
    use crate::{WaypointGraph, WaypointGraphBuilder};

    /// Small two-way grid, coordinates in metres.
    ///
    /// ```text
    ///   3 (0,25)
    ///   |        \
    ///   0 (0,0) - 1 (10,0) - 2 (20,0) - 4 (20,10)
    /// ```
    ///
    /// 0→1→2→4 = 30 m; 0→3→4 = 25 + 25 = 50 m.
    pub fn grid_graph() -> (WaypointGraph, [NodeId; 5]) {
        let mut b = WaypointGraphBuilder::new();
        let n0 = b.add_node(Point2::new(0.0, 0.0));
        let n1 = b.add_node(Point2::new(10.0, 0.0));
        let n2 = b.add_node(Point2::new(20.0, 0.0));
        let n3 = b.add_node(Point2::new(0.0, 25.0));
        let n4 = b.add_node(Point2::new(20.0, 10.0));

        b.add_road(n0, n1);
        b.add_road(n1, n2);
        b.add_road(n2, n4);
        b.add_road(n0, n3);
        b.add_road(n3, n4);

        (b.build(), [n0, n1, n2, n3, n4])
    }

    pub fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }
}

// ── Graph structure ───────────────────────────────────────────────────────────

#[cfg(test)]
mod network_tests {
    use ps_core::{Point2, Pose};
    use crate::{LotLayout, WaypointGraph, WaypointGraphBuilder};

    #[test]
    fn empty_build() {
        let g = WaypointGraph::empty();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
        assert!(g.snap_to_node(Point2::ORIGIN).is_none());
        assert!(g.snap_ahead(Pose::new(Point2::ORIGIN, 0.0)).is_none());
    }

    #[test]
    fn csr_out_edges_have_correct_source() {
        let (g, [n0, n1, _, _, _]) = super::helpers::grid_graph();
        let out: Vec<_> = g.out_edges(n1).collect();
        assert_eq!(out.len(), 2);
        for e in g.out_edges(n0) {
            assert_eq!(g.edge_from[e.index()], n0);
        }
        assert!(g.out_edges(n0).any(|e| g.edge_to[e.index()] == n1));
    }

    #[test]
    fn edge_length_is_euclidean() {
        let (g, [n0, _, _, n3, _]) = super::helpers::grid_graph();
        let e = g.out_edges(n0).find(|e| g.edge_to[e.index()] == n3).unwrap();
        assert!(super::helpers::approx(g.edge_length[e.index()], 25.0));
    }

    #[test]
    fn lane_node_heading_follows_travel() {
        let mut b = WaypointGraphBuilder::new();
        let a = b.add_node(Point2::new(0.0, 0.0));
        let c = b.add_node(Point2::new(0.0, 5.0));
        b.add_directed_edge(a, c);
        let g = b.build();
        assert!(super::helpers::approx(g.node_heading[a.index()], std::f64::consts::FRAC_PI_2));
        assert!(super::helpers::approx(g.node_heading[c.index()], std::f64::consts::FRAC_PI_2));
        assert_eq!(g.out_edges(c).count(), 0);
    }

    #[test]
    fn layout_graph_shape() {
        let g = LotLayout::default().graph();
        // 14 nodes per lane, 13 edges per lane plus the U-turn.
        assert_eq!(g.node_count(), 28);
        assert_eq!(g.edge_count(), 27);
    }

    #[test]
    fn snap_nearest() {
        let (g, [n0, n1, ..]) = super::helpers::grid_graph();
        assert_eq!(g.snap_to_node(Point2::new(4.0, 0.0)), Some(n0));
        assert_eq!(g.snap_to_node(Point2::new(6.0, 0.0)), Some(n1));
    }

    #[test]
    fn snap_ahead_picks_lane_matching_heading() {
        let g = LotLayout::default().graph();

        let west = g.snap_ahead(Pose::new(Point2::new(30.0, 0.0), std::f64::consts::PI)).unwrap();
        let p = g.position(west);
        assert!(super::helpers::approx(p.y, 2.0));
        assert!(p.x < 30.0);

        let east = g.snap_ahead(Pose::new(Point2::new(30.0, 0.0), 0.0)).unwrap();
        let p = g.position(east);
        assert!(super::helpers::approx(p.y, -2.0));
        assert!(p.x > 30.0);
    }
}

// ── Route planning ────────────────────────────────────────────────────────────

#[cfg(test)]
mod router_tests {
    use ps_core::{Point2, Pose};
    use crate::{
        ArcManeuvers, DijkstraPlanner, LotLayout, ManeuverKind, ManeuverLibrary, ParkingLot,
        RouteGoal, RoutePlanner, SpatialError, WaypointGraph, WaypointGraphBuilder,
    };

    fn lot_fixture() -> (LotLayout, ParkingLot, DijkstraPlanner, ArcManeuvers) {
        let layout = LotLayout::default();
        let lot = ParkingLot::from_layout(&layout).unwrap();
        let planner = DijkstraPlanner::new(layout.graph(), 0.5);
        let maneuvers = ArcManeuvers::new(&lot, layout.entry_lane(), layout.exit_lane(), 4.5, 0.15);
        (layout, lot, planner, maneuvers)
    }

    #[test]
    fn shortest_node_route() {
        let (g, [n0, n1, n2, _, n4]) = super::helpers::grid_graph();
        let planner = DijkstraPlanner::new(g, 1.0);
        assert_eq!(planner.node_route(n0, n4).unwrap(), vec![n0, n1, n2, n4]);
    }

    #[test]
    fn same_node_route_is_trivial() {
        let (g, [n0, ..]) = super::helpers::grid_graph();
        let planner = DijkstraPlanner::new(g, 1.0);
        assert_eq!(planner.node_route(n0, n0).unwrap(), vec![n0]);
    }

    #[test]
    fn one_way_blocks_return() {
        let mut b = WaypointGraphBuilder::new();
        let a = b.add_node(Point2::new(0.0, 0.0));
        let c = b.add_node(Point2::new(5.0, 0.0));
        b.add_directed_edge(a, c);
        let planner = DijkstraPlanner::new(b.build(), 1.0);
        assert!(planner.node_route(a, c).is_ok());
        assert!(matches!(planner.node_route(c, a), Err(SpatialError::NoRoute { .. })));
    }

    #[test]
    fn empty_graph_fails() {
        let planner = DijkstraPlanner::new(WaypointGraph::empty(), 1.0);
        let r = planner.plan(Pose::new(Point2::ORIGIN, 0.0), RouteGoal::point(Point2::new(5.0, 0.0)));
        assert!(matches!(r, Err(SpatialError::EmptyNetwork)));
    }

    #[test]
    fn close_goal_ahead_is_reached_directly() {
        let (_, _, planner, _) = lot_fixture();
        let path = planner
            .plan(Pose::new(Point2::new(1.0, -2.0), 0.0), RouteGoal::point(Point2::new(2.0, -2.0)))
            .unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.point(0), Point2::new(1.0, -2.0));
        assert_eq!(path.point(2), Point2::new(2.0, -2.0));
    }

    #[test]
    fn entrance_to_park_start_stays_on_entry_lane() {
        let (_, lot, planner, maneuvers) = lot_fixture();
        let spot = lot.spots()[0];
        let start = maneuvers.maneuver(&spot, ManeuverKind::Park).unwrap().first_pose().unwrap();

        let path = planner
            .plan(Pose::new(Point2::new(-2.0, -2.0), 0.0), RouteGoal::pose(start))
            .unwrap();

        assert_eq!(path.point(0), Point2::new(-2.0, -2.0));
        assert_eq!(path.point(path.last_index()), start.position);
        for w in path.points().windows(2) {
            assert!(super::helpers::approx(w[0].y, -2.0));
            assert!(w[1].x >= w[0].x, "route doubles back at {}", w[1]);
            assert!(w[0].distance(w[1]) <= 0.5 + 1e-9);
        }
    }

    #[test]
    fn unpark_end_to_exit_follows_exit_lane() {
        let (_, lot, planner, maneuvers) = lot_fixture();
        let spot = lot.spots()[3];
        let start = maneuvers.maneuver(&spot, ManeuverKind::Unpark).unwrap().last_pose().unwrap();

        let path = planner.plan(start, RouteGoal::point(lot.exit)).unwrap();

        assert_eq!(path.point(path.last_index()), lot.exit);
        for w in path.points().windows(2) {
            assert!((w[0].y - 2.0).abs() < 1e-6);
            assert!(w[1].x <= w[0].x + 1e-9, "route doubles back at {}", w[1]);
        }
    }
}

// ── Lot geometry ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod lot_tests {
    use std::f64::consts::FRAC_PI_2;

    use ps_core::{Point2, Pose, SpotId};
    use crate::{LotLayout, ParkingLot, ParkingSpot, SpatialError};

    #[test]
    fn default_layout_rows() {
        let lot = ParkingLot::from_layout(&LotLayout::default()).unwrap();
        assert_eq!(lot.spot_count(), 24);

        let north = lot.spot(SpotId(0)).unwrap();
        assert_eq!(north.center, Point2::new(12.0, 6.5));
        assert_eq!(north.heading, FRAC_PI_2);

        let south = lot.spot(SpotId(12)).unwrap();
        assert_eq!(south.center, Point2::new(12.0, -6.5));
        assert_eq!(south.heading, -FRAC_PI_2);

        assert_eq!(lot.entrance.position, Point2::new(0.0, -2.0));
        assert_eq!(lot.exit, Point2::new(0.0, 2.0));
        assert!(lot.initial_occupancy().iter().all(|&o| !o));
    }

    #[test]
    fn layout_occupied_spots() {
        let layout = LotLayout { occupied: vec![3, 20], ..LotLayout::default() };
        let lot = ParkingLot::from_layout(&layout).unwrap();
        let occupied: Vec<usize> = lot
            .initial_occupancy()
            .iter()
            .enumerate()
            .filter(|(_, o)| **o)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(occupied, vec![3, 20]);
    }

    #[test]
    fn layout_occupied_out_of_range() {
        let layout = LotLayout { occupied: vec![99], ..LotLayout::default() };
        assert!(matches!(ParkingLot::from_layout(&layout), Err(SpatialError::SpotNotFound(SpotId(99)))));
    }

    #[test]
    fn spot_lookup_out_of_range() {
        let lot = ParkingLot::from_layout(&LotLayout::default()).unwrap();
        assert!(matches!(lot.spot(SpotId(24)), Err(SpatialError::SpotNotFound(_))));
    }

    #[test]
    fn ids_must_match_positions() {
        let spot = ParkingSpot { id: SpotId(1), center: Point2::ORIGIN, heading: 0.0 };
        let r = ParkingLot::new(vec![spot], vec![false], Pose::new(Point2::ORIGIN, 0.0), Point2::ORIGIN);
        assert!(matches!(r, Err(SpatialError::Parse(_))));

        let spot = ParkingSpot { id: SpotId(0), ..spot };
        let r = ParkingLot::new(vec![spot], vec![], Pose::new(Point2::ORIGIN, 0.0), Point2::ORIGIN);
        assert!(matches!(r, Err(SpatialError::Parse(_))));
    }
}

// ── Maneuvers ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod maneuver_tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use ps_core::{Point2, Pose, SpotId, normalize_angle};
    use crate::{
        ArcManeuvers, LotLayout, ManeuverKind, ManeuverLibrary, ParkingLot, ParkingSpot,
        SpatialError,
    };

    const STEP: f64 = 0.15;

    fn default_maneuvers() -> (ParkingLot, ArcManeuvers) {
        let layout = LotLayout::default();
        let lot = ParkingLot::from_layout(&layout).unwrap();
        let m = ArcManeuvers::new(&lot, layout.entry_lane(), layout.exit_lane(), 4.5, STEP);
        (lot, m)
    }

    fn near(a: Point2, b: Point2) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn every_default_spot_has_both_maneuvers() {
        let (lot, m) = default_maneuvers();
        for spot in lot.spots() {
            assert!(m.has(spot.id, ManeuverKind::Park), "no park for {}", spot.id);
            assert!(m.has(spot.id, ManeuverKind::Unpark), "no unpark for {}", spot.id);
        }
    }

    #[test]
    fn park_starts_on_entry_lane_and_ends_in_spot() {
        let (lot, m) = default_maneuvers();
        let spot = *lot.spot(SpotId(0)).unwrap();
        let path = m.maneuver(&spot, ManeuverKind::Park).unwrap();

        let first = path.first_pose().unwrap();
        assert!(near(first.position, Point2::new(7.5, -2.0)));
        assert!(normalize_angle(first.heading).abs() < 1e-9);

        let last = path.last_pose().unwrap();
        assert!(near(last.position, spot.center));
        assert!((last.heading - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn unpark_starts_in_spot_and_ends_on_exit_lane() {
        let (lot, m) = default_maneuvers();
        let spot = *lot.spot(SpotId(12)).unwrap();
        let path = m.maneuver(&spot, ManeuverKind::Unpark).unwrap();

        let first = path.first_pose().unwrap();
        assert_eq!(first.position, spot.center);
        assert_eq!(first.heading, spot.heading);

        let last = path.last_pose().unwrap();
        assert!(last.position.distance(Point2::new(16.5, 2.0)) < 1e-9);
        assert!(normalize_angle(last.heading - PI).abs() < 1e-9);
    }

    #[test]
    fn samples_are_at_most_one_step_apart() {
        let (lot, m) = default_maneuvers();
        for spot in lot.spots() {
            for kind in [ManeuverKind::Park, ManeuverKind::Unpark] {
                let path = m.maneuver(spot, kind).unwrap();
                for w in path.points().windows(2) {
                    assert!(w[0].distance(w[1]) <= STEP + 1e-9);
                }
            }
        }
    }

    #[test]
    fn spot_parallel_to_lane_is_unavailable() {
        let layout = LotLayout::default();
        let spot = ParkingSpot { id: SpotId(0), center: Point2::new(10.0, 6.5), heading: 0.0 };
        let lot = ParkingLot::new(vec![spot], vec![false], Pose::new(Point2::ORIGIN, 0.0), Point2::ORIGIN).unwrap();
        let m = ArcManeuvers::new(&lot, layout.entry_lane(), layout.exit_lane(), 4.5, STEP);

        let r = m.maneuver(&spot, ManeuverKind::Park);
        assert!(matches!(
            r,
            Err(SpatialError::ManeuverUnavailable { spot: SpotId(0), kind: ManeuverKind::Park })
        ));
    }

    #[test]
    fn spot_facing_the_lane_is_unavailable() {
        let layout = LotLayout::default();
        let spot = ParkingSpot { id: SpotId(0), center: Point2::new(10.0, 6.5), heading: -FRAC_PI_2 };
        let lot = ParkingLot::new(vec![spot], vec![false], Pose::new(Point2::ORIGIN, 0.0), Point2::ORIGIN).unwrap();
        let m = ArcManeuvers::new(&lot, layout.entry_lane(), layout.exit_lane(), 4.5, STEP);
        assert!(!m.has(SpotId(0), ManeuverKind::Park));
    }

    #[test]
    fn unknown_spot_is_not_found() {
        let (_, m) = default_maneuvers();
        let ghost = ParkingSpot { id: SpotId(40), center: Point2::ORIGIN, heading: 0.0 };
        assert!(matches!(m.maneuver(&ghost, ManeuverKind::Unpark), Err(SpatialError::SpotNotFound(_))));
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader_tests {
    use std::io::Cursor;

    use ps_core::{Point2, Pose, SpotId};
    use crate::{SpatialError, load_spots_csv, load_spots_reader};

    const CSV: &str = "\
id,x,y,heading,occupied
1,14.6,6.5,1.5708,true
0,12.0,6.5,1.5708,false
2,12.0,-6.5,-1.5708,false
";

    #[test]
    fn rows_are_ordered_by_id() {
        let table = load_spots_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(table.spots.len(), 3);
        assert_eq!(table.spots[0].id, SpotId(0));
        assert_eq!(table.spots[1].center, Point2::new(14.6, 6.5));
        assert_eq!(table.occupied, vec![false, true, false]);
    }

    #[test]
    fn gap_in_ids_is_rejected() {
        let csv = "id,x,y,heading,occupied\n0,0,0,0,false\n2,1,1,0,false\n";
        assert!(matches!(load_spots_reader(Cursor::new(csv)), Err(SpatialError::Parse(_))));
    }

    #[test]
    fn malformed_row_is_rejected() {
        let csv = "id,x,y,heading,occupied\n0,zero,0,0,false\n";
        assert!(matches!(load_spots_reader(Cursor::new(csv)), Err(SpatialError::Parse(_))));
    }

    #[test]
    fn load_from_file_into_lot() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("spots.csv");
        std::fs::write(&path, CSV).unwrap();

        let lot = load_spots_csv(&path)
            .unwrap()
            .into_lot(Pose::new(Point2::new(0.0, -2.0), 0.0), Point2::new(0.0, 2.0))
            .unwrap();
        assert_eq!(lot.spot_count(), 3);
        assert_eq!(lot.initial_occupancy(), &[false, true, false]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let r = load_spots_csv(&dir.path().join("absent.csv"));
        assert!(matches!(r, Err(SpatialError::Io(_))));
    }
}
