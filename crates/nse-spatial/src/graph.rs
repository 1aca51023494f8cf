//! `StreetGraph`: a read-only cloud of street-network nodes with an R-tree
//! index for bounding-box queries.
//!
//! Sampling only ever needs node coordinates, so edges are not stored.  The
//! graph is immutable once built and is shared between worker threads
//! through `Arc<StreetGraph>`; `RTree` queries take `&self`, so concurrent
//! reads need no locking.

use rstar::{AABB, RTree, RTreeObject};

use nse_core::{BBox, GeoPoint, NodeId};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// `[lat, lon]` point plus its `NodeId`.
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

// ── StreetGraph ───────────────────────────────────────────────────────────────

/// Street-network nodes for one region and network type.
///
/// Do not construct directly; use [`StreetGraphBuilder`].
pub struct StreetGraph {
    node_pos:    Vec<GeoPoint>,
    spatial_idx: RTree<NodeEntry>,
}

impl StreetGraph {
    pub fn empty() -> Self {
        StreetGraphBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.node_pos[id.index()]
    }

    /// Every node position, indexed by `NodeId`.
    pub fn positions(&self) -> &[GeoPoint] {
        &self.node_pos
    }

    /// Nodes whose position lies inside `bbox`, edges included, in ascending
    /// `NodeId` order.
    ///
    /// The sort makes the candidate list independent of R-tree layout, so a
    /// seeded sampler draws the same points for the same graph.
    pub fn nodes_in_bbox(&self, bbox: &BBox) -> Vec<NodeId> {
        let envelope = AABB::from_corners(
            [bbox.lat_min(), bbox.lon_min()],
            [bbox.lat_max(), bbox.lon_max()],
        );
        let mut ids: Vec<NodeId> = self
            .spatial_idx
            .locate_in_envelope(&envelope)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Positions of [`nodes_in_bbox`](Self::nodes_in_bbox), same order.
    pub fn positions_in_bbox(&self, bbox: &BBox) -> Vec<GeoPoint> {
        self.nodes_in_bbox(bbox)
            .into_iter()
            .map(|id| self.node_pos(id))
            .collect()
    }

    /// Smallest box covering every node, or `None` for an empty graph or a
    /// single-point graph (which has no area).
    pub fn extent(&self) -> Option<BBox> {
        if self.is_empty() {
            return None;
        }
        let env = self.spatial_idx.root().envelope();
        let (lo, hi) = (env.lower(), env.upper());
        BBox::new(lo[0], hi[0], lo[1], hi[1]).ok()
    }
}

// ── StreetGraphBuilder ────────────────────────────────────────────────────────

/// Collect nodes, then [`build`](Self::build) bulk-loads the R-tree.
///
/// ```
/// use nse_core::{BBox, GeoPoint};
/// use nse_spatial::StreetGraphBuilder;
///
/// let mut b = StreetGraphBuilder::new();
/// b.add_node(GeoPoint::new(-12.10, -77.04));
/// b.add_node(GeoPoint::new(-12.50, -77.04));
/// let g = b.build();
/// let bbox = BBox::new(-12.11, -12.09, -77.05, -77.03).unwrap();
/// assert_eq!(g.nodes_in_bbox(&bbox).len(), 1);
/// ```
#[derive(Default)]
pub struct StreetGraphBuilder {
    nodes: Vec<GeoPoint>,
}

impl StreetGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize) -> Self {
        Self { nodes: Vec::with_capacity(nodes) }
    }

    /// Add a node and return its `NodeId` (sequential from 0).  Non-finite
    /// positions, and any node past the `u32` id space, are dropped and
    /// yield [`NodeId::INVALID`].
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        if !(pos.lat.is_finite() && pos.lon.is_finite()) {
            return NodeId::INVALID;
        }
        match NodeId::try_from(self.nodes.len()) {
            Ok(id) if id.is_valid() => {
                self.nodes.push(pos);
                id
            }
            _ => NodeId::INVALID,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn build(self) -> StreetGraph {
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, &pos)| {
                let id = NodeId::try_from(i).ok()?;
                Some(NodeEntry { point: [pos.lat, pos.lon], id })
            })
            .collect();
        StreetGraph {
            node_pos:    self.nodes,
            spatial_idx: RTree::bulk_load(entries),
        }
    }
}
