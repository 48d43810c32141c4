// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region quadtree over keyed bounding boxes.

use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt::{self, Debug};
use core::mem;

use smallvec::SmallVec;

use crate::types::Rect;

/// Arena index of the root node.
const ROOT: usize = 0;

/// Subdivision limits for a [`QuadTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexConfig {
    /// Direct object count at which a leaf splits.
    pub max_objects_per_node: usize,
    /// Nodes at this depth never split. The root is depth `0`.
    pub max_depth: u8,
    /// Nodes narrower or shorter than this never split.
    pub min_node_size: i32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_objects_per_node: 10,
            max_depth: 6,
            min_node_size: 4,
        }
    }
}

/// Aggregate diagnostics returned by [`QuadTree::stats`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct IndexStats {
    /// Number of nodes, including the root.
    pub node_count: usize,
    /// Deepest node depth present in the tree.
    pub max_depth: u8,
    /// Number of stored objects.
    pub total_objects: usize,
    /// Sum of per-node query counters.
    pub query_count: u64,
    /// `total_objects / node_count`.
    pub average_objects_per_node: f64,
}

/// Read-only view of one node, passed to [`QuadTree::visit_nodes`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    /// Area covered by the node.
    pub bounds: Rect,
    /// Distance from the root.
    pub depth: u8,
    /// Objects held directly by the node (straddlers or leaf contents).
    pub direct_objects: usize,
    /// Objects held anywhere in the node's subtree.
    pub subtree_objects: usize,
    /// Bounds of the parent node, `None` for the root.
    pub parent_bounds: Option<Rect>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Entry<K> {
    key: K,
    bounds: Rect,
}

#[derive(Debug)]
struct QuadNode<K> {
    bounds: Rect,
    depth: u8,
    parent: Option<usize>,
    /// Top-left, top-right, bottom-left, bottom-right.
    children: Option<[usize; 4]>,
    objects: SmallVec<[Entry<K>; 4]>,
    /// Objects stored in this node's subtree.
    object_count: usize,
    query_count: Cell<u64>,
}

impl<K> QuadNode<K> {
    fn new(bounds: Rect, depth: u8, parent: Option<usize>) -> Self {
        Self {
            bounds,
            depth,
            parent,
            children: None,
            objects: SmallVec::new(),
            object_count: 0,
            query_count: Cell::new(0),
        }
    }

    fn note_query(&self) {
        self.query_count.set(self.query_count.get().wrapping_add(1));
    }
}

/// Region quadtree mapping keys to bounding boxes.
///
/// Objects are never split across cells: an object is stored at the deepest
/// node whose bounds fully contain it, so an object straddling a quadrant
/// boundary stays at the lowest common ancestor. Leaves split once their
/// direct collection reaches [`IndexConfig::max_objects_per_node`], subject to
/// the depth and size limits. Nodes are never merged back; the tree only gets
/// denser until [`QuadTree::clear`].
///
/// Keys are compared with `==`, so the key type carries object identity. Use a
/// handle type (for example a generational id) rather than a value that two
/// distinct widgets could share.
///
/// Queries take `&self`; per-node query counters use interior mutability,
/// which makes the tree `!Sync`. Mutating the tree from inside a visitor is not
/// possible by construction.
///
/// # Example
///
/// ```
/// use tessera_index::{QuadTree, Rect};
///
/// let mut tree = QuadTree::new(Rect::new(0, 0, 100, 100));
/// assert!(tree.insert("ok", Rect::new(10, 10, 5, 5)));
///
/// assert_eq!(tree.query(12, 12), vec!["ok"]);
/// assert!(tree.query(50, 50).is_empty());
///
/// assert!(tree.remove(&"ok"));
/// assert!(tree.query(12, 12).is_empty());
/// ```
pub struct QuadTree<K> {
    nodes: Vec<QuadNode<K>>,
    config: IndexConfig,
}

impl<K: Copy + Eq> QuadTree<K> {
    /// Creates an empty tree covering `bounds` with the default [`IndexConfig`].
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self::with_config(bounds, IndexConfig::default())
    }

    /// Creates an empty tree covering `bounds`.
    #[must_use]
    pub fn with_config(bounds: Rect, config: IndexConfig) -> Self {
        let mut nodes = Vec::new();
        nodes.push(QuadNode::new(bounds, 0, None));
        Self { nodes, config }
    }

    /// Area covered by the root node.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.nodes[ROOT].bounds
    }

    /// Subdivision limits in use.
    #[must_use]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes[ROOT].object_count
    }

    /// Returns `true` if no objects are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `key` is stored anywhere in the tree.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.nodes
            .iter()
            .any(|node| node.objects.iter().any(|e| e.key == *key))
    }

    /// Inserts `key` with the given bounds.
    ///
    /// Returns `false` without storing anything if `bounds` is malformed or
    /// does not fit entirely inside the tree.
    pub fn insert(&mut self, key: K, bounds: Rect) -> bool {
        if !bounds.is_valid() {
            tracing::debug!(?bounds, "quadtree: ignoring malformed bounds");
            return false;
        }
        let inserted = self.insert_at(ROOT, Entry { key, bounds });
        if !inserted {
            tracing::debug!(?bounds, root = ?self.bounds(), "quadtree: bounds outside index");
        }
        inserted
    }

    /// Removes `key`.
    ///
    /// Returns `false` if the key was not stored. Emptied nodes stay in place.
    pub fn remove(&mut self, key: &K) -> bool {
        self.remove_at(ROOT, key)
    }

    /// Re-inserts `key` with new bounds: [`remove`](Self::remove) then
    /// [`insert`](Self::insert).
    ///
    /// Returns the result of the insertion. A key that was not stored is simply
    /// inserted; a key whose new bounds fall outside the tree ends up removed.
    pub fn update(&mut self, key: K, bounds: Rect) -> bool {
        self.remove(&key);
        self.insert(key, bounds)
    }

    /// Empties every node and resets all counters, keeping the tree's shape.
    pub fn clear(&mut self) {
        for node in &mut self.nodes {
            node.objects.clear();
            node.object_count = 0;
            node.query_count.set(0);
        }
    }

    /// All keys whose bounds contain the point, with half-open semantics.
    ///
    /// Results are ordered node-local objects first, then each child in
    /// quadrant order (top-left, top-right, bottom-left, bottom-right),
    /// recursively.
    #[must_use]
    pub fn query(&self, x: i32, y: i32) -> Vec<K> {
        let mut out = Vec::new();
        self.visit_point(x, y, |key| out.push(key));
        out
    }

    /// All keys whose bounds overlap or touch `region`, in the same order as
    /// [`query`](Self::query).
    #[must_use]
    pub fn query_region(&self, region: Rect) -> Vec<K> {
        let mut out = Vec::new();
        self.visit_region(region, |key| out.push(key));
        out
    }

    /// Visits keys whose bounds contain the point without collecting them.
    pub fn visit_point<F: FnMut(K)>(&self, x: i32, y: i32, mut f: F) {
        self.visit_point_at(ROOT, x, y, &mut f);
    }

    /// Visits keys whose bounds overlap or touch `region` without collecting them.
    pub fn visit_region<F: FnMut(K)>(&self, region: Rect, mut f: F) {
        self.visit_region_at(ROOT, region, &mut f);
    }

    /// Walks every node depth-first in query order.
    ///
    /// This is O(nodes) and meant for diagnostics and debug overlays.
    pub fn visit_nodes<F: FnMut(&NodeInfo)>(&self, mut f: F) {
        self.visit_nodes_at(ROOT, &mut f);
    }

    /// Aggregate diagnostics computed by a full walk.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats::default();
        self.visit_nodes(|info| {
            stats.node_count += 1;
            stats.max_depth = stats.max_depth.max(info.depth);
            stats.total_objects += info.direct_objects;
        });
        stats.query_count = self.nodes.iter().map(|n| n.query_count.get()).sum();
        if stats.node_count > 0 {
            stats.average_objects_per_node = stats.total_objects as f64 / stats.node_count as f64;
        }
        stats
    }

    fn insert_at(&mut self, idx: usize, entry: Entry<K>) -> bool {
        if !self.nodes[idx].bounds.contains_rect(&entry.bounds) {
            return false;
        }
        self.nodes[idx].object_count += 1;
        self.place(idx, entry);
        true
    }

    /// Stores an entry already known to fit `idx` and already counted there.
    fn place(&mut self, idx: usize, entry: Entry<K>) {
        if let Some(children) = self.nodes[idx].children {
            if !children.into_iter().any(|child| self.insert_at(child, entry)) {
                self.nodes[idx].objects.push(entry);
            }
            return;
        }
        self.nodes[idx].objects.push(entry);
        if self.should_split(idx) {
            self.split(idx);
        }
    }

    fn should_split(&self, idx: usize) -> bool {
        let node = &self.nodes[idx];
        node.children.is_none()
            && node.objects.len() >= self.config.max_objects_per_node
            && node.depth < self.config.max_depth
            && node.bounds.width >= self.config.min_node_size
            && node.bounds.height >= self.config.min_node_size
    }

    fn split(&mut self, idx: usize) {
        let (quadrants, depth) = {
            let node = &self.nodes[idx];
            (node.bounds.quadrants(), node.depth + 1)
        };
        let first = self.nodes.len();
        self.nodes.extend(
            quadrants
                .into_iter()
                .map(|bounds| QuadNode::new(bounds, depth, Some(idx))),
        );
        self.nodes[idx].children = Some([first, first + 1, first + 2, first + 3]);

        // Held objects are already counted at `idx`; re-placing them only
        // bumps the counters of the children that accept them.
        let held = mem::take(&mut self.nodes[idx].objects);
        for entry in held {
            self.place(idx, entry);
        }
        tracing::trace!(bounds = ?self.nodes[idx].bounds, depth, "quadtree: split");
    }

    fn remove_at(&mut self, idx: usize, key: &K) -> bool {
        let node = &mut self.nodes[idx];
        if node.object_count == 0 {
            return false;
        }
        if let Some(pos) = node.objects.iter().position(|e| e.key == *key) {
            node.objects.remove(pos);
            node.object_count -= 1;
            return true;
        }
        let Some(children) = node.children else {
            return false;
        };
        for child in children {
            if self.remove_at(child, key) {
                self.nodes[idx].object_count -= 1;
                return true;
            }
        }
        false
    }

    fn visit_point_at<F: FnMut(K)>(&self, idx: usize, x: i32, y: i32, f: &mut F) {
        let node = &self.nodes[idx];
        if !node.bounds.contains_point(x, y) {
            return;
        }
        node.note_query();
        if node.object_count == 0 {
            return;
        }
        for entry in &node.objects {
            if entry.bounds.contains_point(x, y) {
                f(entry.key);
            }
        }
        if let Some(children) = node.children {
            for child in children {
                self.visit_point_at(child, x, y, f);
            }
        }
    }

    fn visit_region_at<F: FnMut(K)>(&self, idx: usize, region: Rect, f: &mut F) {
        let node = &self.nodes[idx];
        if !node.bounds.touches(&region) {
            return;
        }
        node.note_query();
        if node.object_count == 0 {
            return;
        }
        for entry in &node.objects {
            if entry.bounds.touches(&region) {
                f(entry.key);
            }
        }
        if let Some(children) = node.children {
            for child in children {
                self.visit_region_at(child, region, f);
            }
        }
    }

    fn visit_nodes_at<F: FnMut(&NodeInfo)>(&self, idx: usize, f: &mut F) {
        let node = &self.nodes[idx];
        f(&NodeInfo {
            bounds: node.bounds,
            depth: node.depth,
            direct_objects: node.objects.len(),
            subtree_objects: node.object_count,
            parent_bounds: node.parent.map(|p| self.nodes[p].bounds),
        });
        if let Some(children) = node.children {
            for child in children {
                self.visit_nodes_at(child, f);
            }
        }
    }
}

impl<K: Copy + Eq> Debug for QuadTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadTree")
            .field("bounds", &self.nodes[ROOT].bounds)
            .field("nodes", &self.nodes.len())
            .field("objects", &self.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
