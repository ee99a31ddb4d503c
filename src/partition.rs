//! Binary space partition tree.
//!
//! Nodes live in an arena and refer to each other by index, so the tree can
//! be walked in level order or post order without shared ownership.

use crate::geometry::Rect;
use rand::Rng;
use std::collections::VecDeque;
use std::fmt::Write;

/// Index of a node in its [`PartitionTree`]
pub type NodeId = usize;

/// A region of the tree. Either a leaf or an internal node with two children.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionNode {
    /// The region this node covers
    pub rect: Rect,
    pub parent: Option<NodeId>,
    /// Left/top child and right/bottom child after a split
    pub children: Option<(NodeId, NodeId)>,
    /// Number of splits between the root and this node
    pub depth: u32,
}

impl PartitionNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Limits on recursive splitting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitLimits {
    /// Maximum number of splits from the root to any leaf
    pub depth: u32,
    pub min_width: i32,
    pub min_height: i32,
    /// A node wider than `height * max_horizontal_ratio` is always split vertically
    pub max_horizontal_ratio: f64,
    /// A node taller than `width * max_vertical_ratio` is always split horizontally
    pub max_vertical_ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
}

impl PartitionTree {
    /// A tree with only a root covering `rect`
    pub fn new(rect: Rect) -> Self {
        Self {
            nodes: vec![PartitionNode {
                rect,
                parent: None,
                children: None,
                depth: 0,
            }],
        }
    }

    /// Build a tree over `rect`, splitting recursively within `limits`.
    pub fn split_recursive(rect: Rect, limits: &SplitLimits, rng: &mut impl Rng) -> Self {
        let mut tree = Self::new(rect);
        tree.split(Self::ROOT, limits.depth, limits, rng);
        tree
    }

    pub const ROOT: NodeId = 0;

    pub fn node(&self, id: NodeId) -> &PartitionNode {
        &self.nodes[id]
    }

    /// Number of splits between the root and `id`
    pub fn depth(&self, id: NodeId) -> u32 {
        self.nodes[id].depth
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Split `id` once, then recurse into both children.
    fn split(&mut self, id: NodeId, remaining: u32, limits: &SplitLimits, rng: &mut impl Rng) {
        let region = self.nodes[id].rect;
        let (min_w, min_h) = (limits.min_width, limits.min_height);

        if remaining == 0 || (region.width < min_w * 2 && region.height < min_h * 2) {
            return;
        }

        let width = f64::from(region.width);
        let height = f64::from(region.height);

        // Prefer splitting the longer axis so nodes stay within the side ratios
        let split_horizontal = if region.height < min_h * 2 || width > height * limits.max_horizontal_ratio {
            false
        } else if region.width < min_w * 2 || height > width * limits.max_vertical_ratio {
            true
        } else {
            rng.gen_bool(0.5)
        };

        // The ratio rule can pick an axis that cannot hold two minimum children
        let split_horizontal = if split_horizontal {
            region.height >= min_h * 2
        } else {
            region.width < min_w * 2
        };

        let (first, second) = if split_horizontal {
            // Top/bottom children, both at least min_h tall
            let split_y = rng.gen_range(min_h..=region.height - min_h);
            (
                Rect::new(region.x, region.y, region.width, split_y),
                Rect::new(region.x, region.y + split_y, region.width, region.height - split_y),
            )
        } else {
            let split_x = rng.gen_range(min_w..=region.width - min_w);
            (
                Rect::new(region.x, region.y, split_x, region.height),
                Rect::new(region.x + split_x, region.y, region.width - split_x, region.height),
            )
        };

        let depth = self.nodes[id].depth + 1;
        let first_id = self.push(first, id, depth);
        let second_id = self.push(second, id, depth);
        self.nodes[id].children = Some((first_id, second_id));

        self.split(first_id, remaining - 1, limits, rng);
        self.split(second_id, remaining - 1, limits, rng);
    }

    fn push(&mut self, rect: Rect, parent: NodeId, depth: u32) -> NodeId {
        self.nodes.push(PartitionNode {
            rect,
            parent: Some(parent),
            children: None,
            depth,
        });
        self.nodes.len() - 1
    }

    /// Every node, shallower levels before deeper ones, left before right
    pub fn level_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([Self::ROOT]);
        while let Some(id) = queue.pop_front() {
            order.push(id);
            if let Some((left, right)) = self.nodes[id].children {
                queue.push_back(left);
                queue.push_back(right);
            }
        }
        order
    }

    /// Every node, children before their parent
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        self.collect_post_order(Self::ROOT, &mut order);
        order
    }

    fn collect_post_order(&self, id: NodeId, order: &mut Vec<NodeId>) {
        if let Some((left, right)) = self.nodes[id].children {
            self.collect_post_order(left, order);
            self.collect_post_order(right, order);
        }
        order.push(id);
    }

    /// Parent, grandparent, ... up to the root. Does not include `id`.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id].parent, move |&p| self.nodes[p].parent)
    }

    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter(move |&id| self.nodes[id].is_leaf())
    }

    /// Graphviz digraph of the tree, nodes numbered in post order
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph {\n");
        for (index, id) in self.post_order().into_iter().enumerate() {
            let r = self.nodes[id].rect;
            let _ = writeln!(
                dot,
                "  n{} [label=\"{}: ({}, {}, {}, {})\"]",
                id, index, r.x, r.y, r.width, r.height
            );
            if let Some((left, right)) = self.nodes[id].children {
                let _ = writeln!(dot, "  n{} -> n{}", id, left);
                let _ = writeln!(dot, "  n{} -> n{}", id, right);
            }
        }
        dot.push_str("}\n");
        dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::LevelRng;
    use proptest::prelude::*;

    fn limits(depth: u32, min: i32, ratio: f64) -> SplitLimits {
        SplitLimits {
            depth,
            min_width: min,
            min_height: min,
            max_horizontal_ratio: ratio,
            max_vertical_ratio: ratio,
        }
    }

    #[test]
    fn test_depth_counts_splits_from_root() {
        let mut rng = LevelRng::new(3);
        let tree = PartitionTree::split_recursive(Rect::new(0, 0, 100, 100), &limits(4, 7, 1.5), &mut rng);
        assert_eq!(tree.depth(PartitionTree::ROOT), 0);
        for id in 0..tree.len() {
            assert_eq!(tree.depth(id) as usize, tree.ancestors(id).count());
        }
    }

    #[test]
    fn test_new_tree_is_leaf() {
        let tree = PartitionTree::new(Rect::new(0, 0, 10, 10));
        assert_eq!(tree.len(), 1);
        assert!(tree.node(PartitionTree::ROOT).is_leaf());
    }

    #[test]
    fn test_split_creates_children() {
        let mut rng = LevelRng::new(3);
        let tree = PartitionTree::split_recursive(Rect::new(0, 0, 100, 100), &limits(4, 7, 1.5), &mut rng);
        assert!(!tree.node(PartitionTree::ROOT).is_leaf());
    }

    #[test]
    fn test_small_node_doesnt_split() {
        let mut rng = LevelRng::new(3);
        let tree = PartitionTree::split_recursive(Rect::new(0, 0, 5, 5), &limits(4, 5, 1.5), &mut rng);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_zero_depth_doesnt_split() {
        let mut rng = LevelRng::new(3);
        let tree = PartitionTree::split_recursive(Rect::new(0, 0, 80, 45), &limits(0, 5, 1.5), &mut rng);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_wide_node_splits_vertically() {
        let mut rng = LevelRng::new(11);
        let tree = PartitionTree::split_recursive(Rect::new(0, 0, 40, 10), &limits(1, 5, 1.5), &mut rng);
        let (left, right) = tree.node(PartitionTree::ROOT).children.unwrap();
        assert_eq!(tree.node(left).rect.height, 10);
        assert_eq!(tree.node(right).rect.height, 10);
        assert_eq!(tree.node(left).rect.width + tree.node(right).rect.width, 40);
    }

    #[test]
    fn test_level_order_is_shallow_first() {
        let mut rng = LevelRng::new(5);
        let tree = PartitionTree::split_recursive(Rect::new(0, 0, 80, 45), &limits(6, 7, 1.1), &mut rng);
        let order = tree.level_order();
        assert_eq!(order.len(), tree.len());
        assert_eq!(order[0], PartitionTree::ROOT);
        for pair in order.windows(2) {
            assert!(tree.depth(pair[0]) <= tree.depth(pair[1]));
        }
    }

    #[test]
    fn test_post_order_visits_children_first() {
        let mut rng = LevelRng::new(5);
        let tree = PartitionTree::split_recursive(Rect::new(0, 0, 60, 60), &limits(3, 7, 1.5), &mut rng);
        let order = tree.post_order();
        assert_eq!(order.last(), Some(&PartitionTree::ROOT));
        for (index, id) in order.iter().enumerate() {
            for ancestor in tree.ancestors(*id) {
                let ancestor_index = order.iter().position(|n| *n == ancestor).unwrap();
                assert!(ancestor_index > index);
            }
        }
    }

    #[test]
    fn test_dot_output_lists_every_node() {
        let mut rng = LevelRng::new(8);
        let tree = PartitionTree::split_recursive(Rect::new(0, 0, 40, 40), &limits(2, 5, 1.5), &mut rng);
        let dot = tree.to_dot();
        assert!(dot.starts_with("digraph {"));
        assert_eq!(dot.matches("[label=").count(), tree.len());
        assert_eq!(dot.matches(" -> ").count(), tree.len() - 1);
    }

    proptest! {
        #[test]
        fn prop_children_are_contained_and_minimal(
            width in 10i32..120,
            height in 10i32..120,
            min in 3i32..9,
            depth in 0u32..7,
            seed in any::<u64>(),
        ) {
            let mut rng = LevelRng::new(seed);
            let tree = PartitionTree::split_recursive(Rect::new(0, 0, width, height), &limits(depth, min, 1.5), &mut rng);
            for id in 0..tree.len() {
                let node = tree.node(id);
                prop_assert!(node.depth <= depth);
                if let Some(parent) = node.parent {
                    prop_assert!(tree.node(parent).rect.contains_rect(&node.rect));
                    prop_assert!(node.rect.width >= min && node.rect.height >= min);
                }
                if let Some((left, right)) = node.children {
                    let (l, r) = (tree.node(left).rect, tree.node(right).rect);
                    prop_assert!(!l.intersects(&r));
                    prop_assert_eq!(l.width * l.height + r.width * r.height, node.rect.width * node.rect.height);
                }
            }
        }
    }
}
