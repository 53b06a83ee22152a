//! Route planning trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Vehicles request paths through the [`RoutePlanner`] trait, so a different
//! search (A*, hybrid-A*, a precomputed route table) can be swapped in without
//! touching the agent.  The default [`DijkstraPlanner`] searches the directed
//! waypoint graph and densifies the result into a [`ReferencePath`] the
//! Stanley controller can track.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ps_core::{EdgeId, NodeId, Point2, Pose, ReferencePath};

use crate::network::WaypointGraph;
use crate::{SpatialError, SpatialResult};

// ── RouteGoal ─────────────────────────────────────────────────────────────────

/// Where a route should end.  With a heading, the route arrives travelling
/// that way (used for maneuver start poses); without, any approach is fine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RouteGoal {
    pub position: Point2,
    pub heading:  Option<f64>,
}

impl RouteGoal {
    pub fn pose(pose: Pose) -> Self {
        Self { position: pose.position, heading: Some(pose.heading) }
    }

    pub fn point(position: Point2) -> Self {
        Self { position, heading: None }
    }
}

// ── RoutePlanner trait ────────────────────────────────────────────────────────

/// Pluggable route search.
pub trait RoutePlanner {
    /// Plan a reference path from `start` to `goal`.
    ///
    /// The returned path is never empty: it begins at `start.position` and
    /// ends at `goal.position`.
    fn plan(&self, start: Pose, goal: RouteGoal) -> SpatialResult<ReferencePath>;
}

// ── DijkstraPlanner ───────────────────────────────────────────────────────────

/// Dijkstra over a [`WaypointGraph`] with edge length as cost.
///
/// The start pose snaps to the nearest lane node ahead of it, the goal to the
/// nearest lane node behind it (when it has a heading), so routes never
/// double back along a one-way lane.
pub struct DijkstraPlanner {
    pub graph: WaypointGraph,
    /// Maximum distance between consecutive waypoints in the output path.
    pub spacing: f64,
}

impl DijkstraPlanner {
    pub fn new(graph: WaypointGraph, spacing: f64) -> Self {
        Self { graph, spacing }
    }

    /// Node sequence of the cheapest route, including both ends.
    pub fn node_route(&self, from: NodeId, to: NodeId) -> SpatialResult<Vec<NodeId>> {
        for n in [from, to] {
            if n.index() >= self.graph.node_count() {
                return Err(SpatialError::NodeNotFound(n));
            }
        }
        let edges = dijkstra(&self.graph, from, to)?;
        let mut nodes = Vec::with_capacity(edges.len() + 1);
        nodes.push(from);
        nodes.extend(edges.iter().map(|e| self.graph.edge_to[e.index()]));
        Ok(nodes)
    }
}

impl RoutePlanner for DijkstraPlanner {
    fn plan(&self, start: Pose, goal: RouteGoal) -> SpatialResult<ReferencePath> {
        let start_node = self.graph.snap_ahead(start).ok_or(SpatialError::EmptyNetwork)?;
        let start_node_pos = self.graph.position(start_node);

        // A goal straight ahead and closer than the first lane node is reached
        // directly; routing through the lane would overshoot and loop around.
        let to_goal = goal.position - start.position;
        if to_goal.dot(start.direction()) > 0.0
            && start.position.distance(goal.position) <= start.position.distance(start_node_pos)
        {
            return Ok(ReferencePath::densified(&[start.position, goal.position], self.spacing));
        }

        let goal_node = match goal.heading {
            Some(h) => self.graph.snap_behind(Pose::new(goal.position, h)),
            None => self.graph.snap_to_node(goal.position),
        }
        .ok_or(SpatialError::EmptyNetwork)?;

        let nodes = self.node_route(start_node, goal_node)?;

        let mut points = Vec::with_capacity(nodes.len() + 2);
        points.push(start.position);
        points.extend(nodes.iter().map(|&n| self.graph.position(n)));
        points.push(goal.position);

        Ok(ReferencePath::densified(&points, self.spacing))
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Edge cost in millimetres, so the heap key is totally ordered.
#[inline]
fn edge_cost_mm(graph: &WaypointGraph, edge: EdgeId) -> u64 {
    (graph.edge_length[edge.index()] * 1000.0).round() as u64
}

fn dijkstra(graph: &WaypointGraph, from: NodeId, to: NodeId) -> SpatialResult<Vec<EdgeId>> {
    if from == to {
        return Ok(vec![]);
    }

    let n = graph.node_count();
    let mut dist      = vec![u64::MAX; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0;

    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(graph, &prev_edge, to));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            let new_cost = cost.saturating_add(edge_cost_mm(graph, edge));

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(graph: &WaypointGraph, prev_edge: &[EdgeId], to: NodeId) -> Vec<EdgeId> {
    let mut edges = Vec::new();
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();
    edges
}
