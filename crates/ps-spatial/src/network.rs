//! Waypoint graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Edges are directed: a parking aisle is modelled as two one-way lanes.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps lot coordinates to nearby nodes.  Route
//! queries use it to snap a vehicle pose onto a lane that runs the same way
//! the vehicle faces.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ps_core::{EdgeId, NodeId, Point2, Pose};

/// Nodes considered when snapping a pose before falling back to the nearest.
const SNAP_CANDIDATES: usize = 16;

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── WaypointGraph ─────────────────────────────────────────────────────────────

/// Directed waypoint graph in CSR format plus a spatial index for snapping.
///
/// Do not construct directly; use [`WaypointGraphBuilder`].
pub struct WaypointGraph {
    /// Position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Point2>,

    /// Travel direction through each node: the heading of its first incoming
    /// edge, or of its first outgoing edge for source nodes.
    pub node_heading: Vec<f64>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    pub edge_from: Vec<NodeId>,
    pub edge_to:   Vec<NodeId>,
    /// Edge length in metres (the Dijkstra cost).
    pub edge_length: Vec<f64>,

    spatial_idx: RTree<NodeEntry>,
}

impl WaypointGraph {
    /// A graph with no nodes or edges.  Every route query against it fails.
    pub fn empty() -> Self {
        WaypointGraphBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn position(&self, node: NodeId) -> Point2 {
        self.node_pos[node.index()]
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `pos`.  `None` only for an empty graph.
    pub fn snap_to_node(&self, pos: Point2) -> Option<NodeId> {
        self.spatial_idx.nearest_neighbor(&[pos.x, pos.y]).map(|e| e.id)
    }

    /// Nearest node in front of `pose` whose travel direction agrees with the
    /// pose heading.  Falls back to [`snap_to_node`](Self::snap_to_node).
    pub fn snap_ahead(&self, pose: Pose) -> Option<NodeId> {
        self.snap_directed(pose, |offset, dir| offset.dot(dir) >= 0.0)
    }

    /// Nearest node at or behind `pose` whose travel direction agrees with
    /// the pose heading.  Falls back to [`snap_to_node`](Self::snap_to_node).
    pub fn snap_behind(&self, pose: Pose) -> Option<NodeId> {
        self.snap_directed(pose, |offset, dir| offset.dot(dir) <= 0.0)
    }

    fn snap_directed(&self, pose: Pose, side: impl Fn(Point2, Point2) -> bool) -> Option<NodeId> {
        let dir = pose.direction();
        self.spatial_idx
            .nearest_neighbor_iter(&[pose.position.x, pose.position.y])
            .take(SNAP_CANDIDATES)
            .find(|e| {
                let offset = self.position(e.id) - pose.position;
                let aligned = Point2::from_heading(self.node_heading[e.id.index()]).dot(dir) > 0.0;
                aligned && side(offset, dir)
            })
            .map(|e| e.id)
            .or_else(|| self.snap_to_node(pose.position))
    }
}

// ── WaypointGraphBuilder ──────────────────────────────────────────────────────

/// Construct a [`WaypointGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use ps_core::Point2;
/// use ps_spatial::WaypointGraphBuilder;
///
/// let mut b = WaypointGraphBuilder::new();
/// let a = b.add_node(Point2::new(0.0, 0.0));
/// let c = b.add_node(Point2::new(10.0, 0.0));
/// b.add_road(a, c);
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// ```
#[derive(Default)]
pub struct WaypointGraphBuilder {
    nodes:     Vec<Point2>,
    raw_edges: Vec<(NodeId, NodeId)>,
}

impl WaypointGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Point2) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge; its length is the Euclidean node distance.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId) {
        self.raw_edges.push((from, to));
    }

    /// Add edges in both directions.
    pub fn add_road(&mut self, a: NodeId, b: NodeId) {
        self.add_directed_edge(a, b);
        self.add_directed_edge(b, a);
    }

    /// Chain `nodes` with directed edges in order, forming a one-way lane.
    pub fn add_lane(&mut self, nodes: &[NodeId]) {
        for w in nodes.windows(2) {
            self.add_directed_edge(w[0], w[1]);
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Consume the builder and produce a [`WaypointGraph`].
    pub fn build(self) -> WaypointGraph {
        let node_count = self.nodes.len();

        // Insertion order among a node's edges is preserved (stable sort).
        let mut raw = self.raw_edges;
        raw.sort_by_key(|(from, _)| from.0);

        let edge_from: Vec<NodeId> = raw.iter().map(|e| e.0).collect();
        let edge_to:   Vec<NodeId> = raw.iter().map(|e| e.1).collect();
        let edge_length: Vec<f64> = raw
            .iter()
            .map(|(f, t)| self.nodes[f.index()].distance(self.nodes[t.index()]))
            .collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for (from, _) in &raw {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }

        let edge_heading = |(f, t): &(NodeId, NodeId)| (self.nodes[t.index()] - self.nodes[f.index()]).heading();
        let mut incoming: Vec<Option<f64>> = vec![None; node_count];
        let mut outgoing: Vec<Option<f64>> = vec![None; node_count];
        for e in &raw {
            incoming[e.1.index()].get_or_insert(edge_heading(e));
            outgoing[e.0.index()].get_or_insert(edge_heading(e));
        }
        let node_heading = incoming
            .iter()
            .zip(&outgoing)
            .map(|(i, o)| i.or(*o).unwrap_or(0.0))
            .collect();

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry { point: [p.x, p.y], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        WaypointGraph {
            node_pos: self.nodes,
            node_heading,
            node_out_start,
            edge_from,
            edge_to,
            edge_length,
            spatial_idx,
        }
    }
}
