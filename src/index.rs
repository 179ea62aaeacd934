//! Spherical ball tree for nearest-neighbour queries under the great-circle metric.
//!
//! # Construction
//!
//! The tree is built top-down, once, over a fixed point set:
//!
//! 1. A set no larger than the leaf capacity becomes a leaf.
//! 2. Otherwise its centroid is the renormalised mean of the points' unit vectors.
//! 3. Pivot `A` is the point farthest from the centroid and pivot `B` the point
//!    farthest from `A`. Points are ordered by `d(p, A) - d(p, B)` and split at
//!    the median, so both halves are the same size (±1).
//! 4. Each node records the largest distance from its centroid to any point
//!    below it. That covering radius is what lets a query skip the subtree.
//!
//! All nodes live in one arena and every node owns a contiguous range of a
//! shared permutation of point indices, so a leaf's bucket is just a slice.
//!
//! # Query
//!
//! [`SphericalIndex::nearest`] is a depth-first branch-and-bound search. By the
//! triangle inequality no point under a node can be closer than
//! `d(q, centroid) - radius`, so the node is skipped once that bound exceeds the
//! best distance found so far. The child with the nearer centroid is visited first.
//!
//! Candidates are ranked by `(distance, index)`, so equidistant points resolve
//! to the lowest original index. A subtree is pruned only when its bound beats
//! the best distance by more than [`TIE_EPSILON`], which leaves room for
//! rounding in the triangle inequality. The result is exactly what a linear
//! scan in index order would return.
//!
//! # Thread Safety
//!
//! The index is immutable after [`SphericalIndex::build`]. Queries take `&self`
//! and can run from any number of threads without locking.

use std::time::Instant;

use crate::error::{Error, Result};
use crate::metric;
use crate::store::PointStore;
use crate::types::Point;

/// Leaf bucket size used by [`IndexConfig::default`].
pub const DEFAULT_LEAF_CAPACITY: usize = 16;

/// Slack (in radians, ~6 µm on Earth) added to the best distance before a subtree is pruned.
pub const TIE_EPSILON: f64 = 1e-12;

/// Tunables for [`SphericalIndex::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    /// Largest number of points stored in a single leaf. Must be at least 1.
    pub leaf_capacity: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            leaf_capacity: DEFAULT_LEAF_CAPACITY,
        }
    }
}

/// Result of a nearest-neighbour query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the matching point in the input order.
    pub index: usize,
    /// Great-circle distance from the query, in radians.
    pub distance: f64,
}

impl Neighbor {
    /// Distance in kilometers on a spherical Earth.
    pub fn distance_km(&self) -> f64 {
        self.distance * metric::EARTH_RADIUS_KM
    }

    fn beaten_by(&self, index: usize, distance: f64) -> bool {
        distance < self.distance || (distance == self.distance && index < self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Leaf,
    Internal { left: usize, right: usize },
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    centroid: Point,
    radius: f64,
    // range into `SphericalIndex::order`
    start: usize,
    end: usize,
    kind: NodeKind,
}

/// Static ball tree over points on the unit sphere.
///
/// # Examples
///
/// ```
/// use revgeo::index::{IndexConfig, SphericalIndex};
/// use revgeo::Point;
///
/// let points = vec![
///     Point::from_degrees(40.7128, -74.0060), // New York
///     Point::from_degrees(51.5074, -0.1278),  // London
///     Point::from_degrees(35.6762, 139.6503), // Tokyo
/// ];
/// let index = SphericalIndex::build(&points, IndexConfig::default()).unwrap();
///
/// let hit = index.nearest(Point::from_degrees(51.50, -0.12)).unwrap();
/// assert_eq!(hit.index, 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SphericalIndex {
    points: Vec<Point>,
    order: Vec<usize>,
    nodes: Vec<Node>,
    root: Option<usize>,
    leaf_capacity: usize,
}

impl SphericalIndex {
    /// An index holding no points. Every query on it fails with [`Error::EmptyIndex`].
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            order: Vec::new(),
            nodes: Vec::new(),
            root: None,
            leaf_capacity: DEFAULT_LEAF_CAPACITY,
        }
    }

    /// Builds the tree over `points`. Point indices in query results refer to positions in this slice.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyIndex`] if `points` is empty
    /// - [`Error::InvalidConfig`] if the leaf capacity is zero
    /// - [`Error::InvalidCoordinate`] if any point is not finite
    pub fn build(points: &[Point], config: IndexConfig) -> Result<Self> {
        Self::from_points(points.to_vec(), config)
    }

    /// Like [`build`](Self::build), taking ownership of `points` instead of copying them.
    pub fn from_points(points: Vec<Point>, config: IndexConfig) -> Result<Self> {
        if config.leaf_capacity == 0 {
            return Err(Error::InvalidConfig(
                "leaf capacity must be at least 1".to_string(),
            ));
        }
        if points.is_empty() {
            return Err(Error::EmptyIndex);
        }
        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            let loc = bad.to_location();
            return Err(Error::InvalidCoordinate {
                latitude: loc.latitude,
                longitude: loc.longitude,
            });
        }

        let started = Instant::now();
        let mut order: Vec<usize> = (0..points.len()).collect();
        let mut builder = TreeBuilder {
            points: &points,
            nodes: Vec::with_capacity(2 * points.len() / config.leaf_capacity + 1),
            leaf_capacity: config.leaf_capacity,
        };
        let root = builder.build(&mut order, 0);
        let nodes = builder.nodes;

        let index = Self {
            points,
            order,
            nodes,
            root: Some(root),
            leaf_capacity: config.leaf_capacity,
        };

        tracing::info!(
            points = index.len(),
            nodes = index.node_count(),
            depth = index.depth(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Built spherical index"
        );

        Ok(index)
    }

    /// Builds the tree over every record in `store`, preserving record indices.
    pub fn from_store(store: &PointStore, config: IndexConfig) -> Result<Self> {
        Self::from_points(store.points(), config)
    }

    /// Finds the stored point closest to `query`.
    ///
    /// Equidistant candidates resolve to the lowest index.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyIndex`] if the index holds no points
    /// - [`Error::InvalidCoordinate`] if `query` is not finite
    pub fn nearest(&self, query: Point) -> Result<Neighbor> {
        let root = self.root.ok_or(Error::EmptyIndex)?;
        if !query.is_finite() {
            let loc = query.to_location();
            return Err(Error::InvalidCoordinate {
                latitude: loc.latitude,
                longitude: loc.longitude,
            });
        }

        let mut best = Neighbor {
            index: usize::MAX,
            distance: f64::INFINITY,
        };
        let to_root = metric::distance(query, self.nodes[root].centroid);
        self.search(root, query, to_root, &mut best);
        Ok(best)
    }

    fn search(&self, node_id: usize, query: Point, to_centroid: f64, best: &mut Neighbor) {
        let node = &self.nodes[node_id];
        if to_centroid - node.radius > best.distance + TIE_EPSILON {
            return;
        }

        match node.kind {
            NodeKind::Leaf => {
                for &idx in &self.order[node.start..node.end] {
                    let d = metric::distance(query, self.points[idx]);
                    if best.beaten_by(idx, d) {
                        *best = Neighbor {
                            index: idx,
                            distance: d,
                        };
                    }
                }
            }
            NodeKind::Internal { left, right } => {
                let to_left = metric::distance(query, self.nodes[left].centroid);
                let to_right = metric::distance(query, self.nodes[right].centroid);

                let ((near, to_near), (far, to_far)) = if to_right < to_left {
                    ((right, to_right), (left, to_left))
                } else {
                    ((left, to_left), (right, to_right))
                };

                self.search(near, query, to_near, best);
                self.search(far, query, to_far, best);
            }
        }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the index holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of tree nodes, leaves included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Leaf capacity the tree was built with.
    pub fn leaf_capacity(&self) -> usize {
        self.leaf_capacity
    }

    /// Number of levels in the tree; 0 when empty, 1 for a lone leaf.
    pub fn depth(&self) -> usize {
        self.root.map_or(0, |root| self.depth_of(root))
    }

    fn depth_of(&self, node_id: usize) -> usize {
        match self.nodes[node_id].kind {
            NodeKind::Leaf => 1,
            NodeKind::Internal { left, right } => 1 + self.depth_of(left).max(self.depth_of(right)),
        }
    }
}

impl Default for SphericalIndex {
    fn default() -> Self {
        Self::empty()
    }
}

struct TreeBuilder<'a> {
    points: &'a [Point],
    nodes: Vec<Node>,
    leaf_capacity: usize,
}

impl TreeBuilder<'_> {
    // `ids` is the slice of the permutation this node owns, starting at `offset`.
    fn build(&mut self, ids: &mut [usize], offset: usize) -> usize {
        let centroid = self.centroid(ids);
        let radius = ids
            .iter()
            .map(|&i| metric::distance(centroid, self.points[i]))
            .fold(0.0, f64::max);

        let mut node = Node {
            centroid,
            radius,
            start: offset,
            end: offset + ids.len(),
            kind: NodeKind::Leaf,
        };

        if ids.len() > self.leaf_capacity && self.partition(ids, centroid) {
            let mid = ids.len() / 2;
            let (left_ids, right_ids) = ids.split_at_mut(mid);
            let left = self.build(left_ids, offset);
            let right = self.build(right_ids, offset + mid);
            node.kind = NodeKind::Internal { left, right };
        }

        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn centroid(&self, ids: &[usize]) -> Point {
        metric::centroid(ids.iter().map(|&i| self.points[i])).unwrap_or_else(|| {
            // balanced antipodal sets have no mean direction
            let lowest = ids.iter().copied().min().unwrap_or(0);
            self.points[lowest]
        })
    }

    /// Reorders `ids` so the first half lies on pivot A's side.
    ///
    /// Returns false when every point coincides, in which case the set stays a leaf.
    fn partition(&self, ids: &mut [usize], centroid: Point) -> bool {
        let a = self.points[self.farthest_from(centroid, ids)];
        let b_idx = self.farthest_from(a, ids);
        let b = self.points[b_idx];

        if metric::distance(a, b) == 0.0 {
            return false;
        }

        let mut keyed: Vec<(f64, usize)> = ids
            .iter()
            .map(|&i| {
                let p = self.points[i];
                (metric::distance(p, a) - metric::distance(p, b), i)
            })
            .collect();
        keyed.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)));

        for (slot, (_, i)) in ids.iter_mut().zip(keyed) {
            *slot = i;
        }
        true
    }

    /// The point in `ids` farthest from `from`; ties go to the lowest index.
    fn farthest_from(&self, from: Point, ids: &[usize]) -> usize {
        let mut best = (f64::NEG_INFINITY, usize::MAX);
        for &i in ids {
            let d = metric::distance(from, self.points[i]);
            if d > best.0 || (d == best.0 && i < best.1) {
                best = (d, i);
            }
        }
        best.1
    }
}
