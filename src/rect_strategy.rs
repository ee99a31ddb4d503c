//! Strategies that propose rectangles to build rooms in.
//!
//! A strategy is configuration. [`RectangleStrategy::sequence`] starts a
//! fresh, finite sequence of candidates for one map; the sequence is pulled
//! one rectangle at a time and cannot be restarted.

use crate::constants::*;
use crate::error::ConfigError;
use crate::geometry::{Point, Rect, Size};
use crate::partition::{NodeId, PartitionTree, SplitLimits};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RectangleStrategy {
    OneBigRoom(OneBigRoomConfig),
    RandomPlacement(RandomPlacementConfig),
    SpacePartition(SpacePartitionConfig),
}

impl Default for RectangleStrategy {
    fn default() -> Self {
        RectangleStrategy::SpacePartition(SpacePartitionConfig::default())
    }
}

impl RectangleStrategy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            RectangleStrategy::OneBigRoom(config) => config.validate(),
            RectangleStrategy::RandomPlacement(config) => {
                validate_room_sizes(config.minimum_room_size, config.maximum_room_size)
            }
            RectangleStrategy::SpacePartition(config) => config.validate(),
        }
    }

    /// Start a new sequence of rectangles inside a map of `size`
    pub fn sequence(&self, size: Size) -> RectSequence {
        match self {
            RectangleStrategy::OneBigRoom(config) => RectSequence::OneBigRoom(Some(config.rect(size))),
            RectangleStrategy::RandomPlacement(config) => RectSequence::RandomPlacement(RandomPlacement {
                config: config.clone(),
                size,
                rects: Vec::new(),
                exhausted: false,
            }),
            RectangleStrategy::SpacePartition(config) => RectSequence::SpacePartition(SpacePartition {
                config: config.clone(),
                size,
                tree: None,
                order: Vec::new(),
                cursor: 0,
                rooms: Vec::new(),
                yielded: 0,
            }),
        }
    }
}

fn validate_room_sizes(min: Size, max: Size) -> Result<(), ConfigError> {
    if min.width < 1 || min.height < 1 || min.width > max.width || min.height > max.height {
        return Err(ConfigError::InvalidRoomSize {
            min_width: min.width,
            min_height: min.height,
            max_width: max.width,
            max_height: max.height,
        });
    }
    Ok(())
}

/// One room centered on the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OneBigRoomConfig {
    /// Fraction of the map width the room spans
    pub width_percentage: f64,
    /// Fraction of the map height the room spans
    pub height_percentage: f64,
}

impl Default for OneBigRoomConfig {
    fn default() -> Self {
        Self {
            width_percentage: ONE_BIG_ROOM_PERCENTAGE,
            height_percentage: ONE_BIG_ROOM_PERCENTAGE,
        }
    }
}

impl OneBigRoomConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("width", self.width_percentage), ("height", self.height_percentage)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::InvalidPercentage { name, value });
            }
        }
        Ok(())
    }

    pub fn rect(&self, size: Size) -> Rect {
        let width = (f64::from(size.width) * self.width_percentage).floor() as i32;
        let height = (f64::from(size.height) * self.height_percentage).floor() as i32;
        let origin = Point::new((size.width - width) / 2, (size.height - height) / 2);
        Rect::from_origin_size(origin, Size::new(width, height))
    }
}

/// Rooms dropped at random, rejecting any that overlap an earlier one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomPlacementConfig {
    pub number_of_rooms: usize,
    pub minimum_room_size: Size,
    pub maximum_room_size: Size,
}

impl Default for RandomPlacementConfig {
    fn default() -> Self {
        Self {
            number_of_rooms: DEFAULT_NUMBER_OF_ROOMS,
            minimum_room_size: Size::new(DEFAULT_MIN_ROOM_SIZE, DEFAULT_MIN_ROOM_SIZE),
            maximum_room_size: Size::new(DEFAULT_MAX_ROOM_SIZE, DEFAULT_MAX_ROOM_SIZE),
        }
    }
}

/// Rooms taken from the nodes of a binary space partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacePartitionConfig {
    /// The maximum number of rooms to produce
    pub number_of_rooms: usize,
    /// Minimum partition size; nodes are never split below it
    pub minimum_room_size: Size,
    /// Nodes larger than this on either side never become rooms
    pub maximum_room_size: Size,
    /// Maximum (horizontal, vertical) proportion between the sides of a node.
    /// The closer these are to 1.0, the more square the nodes.
    pub room_size_ratio: (f64, f64),
    /// Number of recursive splits
    pub depth: u32,
}

impl Default for SpacePartitionConfig {
    fn default() -> Self {
        Self {
            number_of_rooms: DEFAULT_NUMBER_OF_ROOMS,
            minimum_room_size: Size::new(DEFAULT_MIN_ROOM_SIZE, DEFAULT_MIN_ROOM_SIZE),
            maximum_room_size: Size::new(DEFAULT_MAX_ROOM_SIZE, DEFAULT_MAX_ROOM_SIZE),
            room_size_ratio: (BSP_DEFAULT_SIZE_RATIO, BSP_DEFAULT_SIZE_RATIO),
            depth: BSP_DEFAULT_DEPTH,
        }
    }
}

impl SpacePartitionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        validate_room_sizes(self.minimum_room_size, self.maximum_room_size)?;
        let (horizontal, vertical) = self.room_size_ratio;
        if !(horizontal >= 1.0 && vertical >= 1.0) {
            return Err(ConfigError::InvalidSizeRatio { horizontal, vertical });
        }
        Ok(())
    }

    fn split_limits(&self) -> SplitLimits {
        SplitLimits {
            depth: self.depth,
            min_width: self.minimum_room_size.width,
            min_height: self.minimum_room_size.height,
            max_horizontal_ratio: self.room_size_ratio.0,
            max_vertical_ratio: self.room_size_ratio.1,
        }
    }

    /// Chance that a node of `size` becomes a room. Nodes near the minimum
    /// size almost always do; large nodes rarely do.
    pub fn acceptance_probability(&self, size: Size) -> f64 {
        let excess = (size.width - self.minimum_room_size.width).max(size.height - self.minimum_room_size.height);
        if excess <= 0 {
            1.0
        } else {
            1.0 / f64::from(excess)
        }
    }
}

/// A running sequence of candidate rectangles
#[derive(Debug, Clone)]
pub enum RectSequence {
    OneBigRoom(Option<Rect>),
    RandomPlacement(RandomPlacement),
    SpacePartition(SpacePartition),
}

impl RectSequence {
    /// The next candidate, or `None` once the sequence is finished
    pub fn next_rect(&mut self, rng: &mut impl Rng) -> Option<Rect> {
        match self {
            RectSequence::OneBigRoom(rect) => rect.take(),
            RectSequence::RandomPlacement(placement) => placement.next_rect(rng),
            RectSequence::SpacePartition(partition) => partition.next_rect(rng),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomPlacement {
    config: RandomPlacementConfig,
    size: Size,
    rects: Vec<Rect>,
    exhausted: bool,
}

impl RandomPlacement {
    /// Rectangles accepted so far
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    fn next_rect(&mut self, rng: &mut impl Rng) -> Option<Rect> {
        if self.exhausted || self.rects.len() >= self.config.number_of_rooms {
            return None;
        }

        let min = self.config.minimum_room_size;
        let max = self.config.maximum_room_size;

        for attempt in 0..PLACEMENT_ATTEMPTS_PER_RECT {
            let width = rng.gen_range(min.width..=max.width);
            let height = rng.gen_range(min.height..=max.height);
            if width > self.size.width || height > self.size.height {
                continue;
            }

            let origin = Point::new(
                rng.gen_range(0..=self.size.width - width),
                rng.gen_range(0..=self.size.height - height),
            );
            let candidate = Rect::from_origin_size(origin, Size::new(width, height));

            if self.rects.iter().any(|r| candidate.intersects(r)) {
                continue;
            }

            debug!(
                target: "levelgen::placement",
                "Placed {} after {} attempt{}",
                candidate,
                attempt + 1,
                if attempt == 0 { "" } else { "s" }
            );
            self.rects.push(candidate);
            return Some(candidate);
        }

        info!(
            target: "levelgen::placement",
            "Gave up after {} attempts; placed {} of {} rooms",
            PLACEMENT_ATTEMPTS_PER_RECT,
            self.rects.len(),
            self.config.number_of_rooms
        );
        self.exhausted = true;
        None
    }
}

#[derive(Debug, Clone)]
pub struct SpacePartition {
    config: SpacePartitionConfig,
    size: Size,
    tree: Option<PartitionTree>,
    order: Vec<NodeId>,
    cursor: usize,
    /// Rectangle accepted for each node, indexed by node id
    rooms: Vec<Option<Rect>>,
    yielded: usize,
}

impl SpacePartition {
    /// The partition tree, once the first rectangle has been requested
    pub fn tree(&self) -> Option<&PartitionTree> {
        self.tree.as_ref()
    }

    /// The rectangle accepted for `node`, if any
    pub fn room_for(&self, node: NodeId) -> Option<Rect> {
        self.rooms.get(node).copied().flatten()
    }

    fn next_rect(&mut self, rng: &mut impl Rng) -> Option<Rect> {
        if self.tree.is_none() {
            let bounds = Rect::from_origin_size(Point::default(), self.size);
            let tree = PartitionTree::split_recursive(bounds, &self.config.split_limits(), rng);
            info!(
                target: "levelgen::bsp",
                "Generating room rects via BSP over {} ({} nodes)",
                bounds,
                tree.len()
            );
            self.order = tree.level_order();
            self.rooms = vec![None; tree.len()];
            self.tree = Some(tree);
        }
        let tree = self.tree.as_ref()?;
        let max = self.config.maximum_room_size;

        while self.cursor < self.order.len() {
            if self.yielded >= self.config.number_of_rooms {
                debug!(
                    target: "levelgen::bsp",
                    "Generated enough rooms ({}); we're done",
                    self.config.number_of_rooms
                );
                return None;
            }

            let id = self.order[self.cursor];
            self.cursor += 1;
            let rect = tree.node(id).rect;

            if rect.width > max.width || rect.height > max.height {
                debug!(
                    target: "levelgen::bsp",
                    "Node {} with size {} exceeds maximum size {}",
                    id,
                    rect.size(),
                    max
                );
                continue;
            }

            if tree.ancestors(id).any(|ancestor| self.rooms[ancestor].is_some()) {
                debug!(target: "levelgen::bsp", "Already made a room for a parent of node {}", id);
                continue;
            }

            let probability = self.config.acceptance_probability(rect.size());
            debug!(
                target: "levelgen::bsp",
                "Probability of generating room for node {} {}: {:.3}",
                id,
                rect,
                probability
            );

            if rng.gen::<f64>() <= probability {
                self.rooms[id] = Some(rect);
                self.yielded += 1;
                return Some(rect);
            }
        }

        info!(
            target: "levelgen::bsp",
            "Finished BSP room rect generation, yielded {} rooms",
            self.yielded
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::LevelRng;
    use proptest::prelude::*;

    fn drain(sequence: &mut RectSequence, rng: &mut LevelRng) -> Vec<Rect> {
        let mut rects = Vec::new();
        while let Some(rect) = sequence.next_rect(rng) {
            rects.push(rect);
        }
        rects
    }

    fn random_placement(number_of_rooms: usize) -> RectangleStrategy {
        RectangleStrategy::RandomPlacement(RandomPlacementConfig {
            number_of_rooms,
            minimum_room_size: Size::new(7, 7),
            maximum_room_size: Size::new(20, 20),
        })
    }

    #[test]
    fn test_one_big_room_is_centered() {
        let strategy = RectangleStrategy::OneBigRoom(OneBigRoomConfig::default());
        let mut sequence = strategy.sequence(Size::new(80, 45));
        let mut rng = LevelRng::new(1);
        assert_eq!(sequence.next_rect(&mut rng), Some(Rect::new(20, 11, 40, 22)));
        assert_eq!(sequence.next_rect(&mut rng), None);
    }

    #[test]
    fn test_one_big_room_rejects_zero_percentage() {
        let strategy = RectangleStrategy::OneBigRoom(OneBigRoomConfig {
            width_percentage: 0.0,
            height_percentage: 0.5,
        });
        assert!(matches!(strategy.validate(), Err(ConfigError::InvalidPercentage { name: "width", .. })));
    }

    #[test]
    fn test_random_placement_stops_at_room_count() {
        let mut rng = LevelRng::new(17);
        let mut sequence = random_placement(5).sequence(Size::new(50, 50));
        let rects = drain(&mut sequence, &mut rng);
        assert_eq!(rects.len(), 5);
    }

    #[test]
    fn test_random_placement_gives_up_when_full() {
        // Only one 10x10 room fits on a 12x12 map
        let strategy = RectangleStrategy::RandomPlacement(RandomPlacementConfig {
            number_of_rooms: 10,
            minimum_room_size: Size::new(10, 10),
            maximum_room_size: Size::new(10, 10),
        });
        let mut rng = LevelRng::new(4);
        let mut sequence = strategy.sequence(Size::new(12, 12));
        let rects = drain(&mut sequence, &mut rng);
        assert_eq!(rects.len(), 1);
        // Exhaustion is permanent
        assert_eq!(sequence.next_rect(&mut rng), None);
    }

    #[test]
    fn test_random_placement_rooms_larger_than_map() {
        let strategy = RectangleStrategy::RandomPlacement(RandomPlacementConfig {
            number_of_rooms: 3,
            minimum_room_size: Size::new(30, 30),
            maximum_room_size: Size::new(40, 40),
        });
        let mut rng = LevelRng::new(4);
        let mut sequence = strategy.sequence(Size::new(20, 20));
        assert_eq!(sequence.next_rect(&mut rng), None);
    }

    #[test]
    fn test_inverted_room_sizes_are_rejected() {
        let strategy = RectangleStrategy::RandomPlacement(RandomPlacementConfig {
            number_of_rooms: 3,
            minimum_room_size: Size::new(10, 10),
            maximum_room_size: Size::new(5, 20),
        });
        assert!(matches!(strategy.validate(), Err(ConfigError::InvalidRoomSize { .. })));
    }

    #[test]
    fn test_acceptance_probability() {
        let config = SpacePartitionConfig::default();
        assert_eq!(config.acceptance_probability(Size::new(7, 7)), 1.0);
        assert_eq!(config.acceptance_probability(Size::new(8, 7)), 1.0);
        assert_eq!(config.acceptance_probability(Size::new(9, 11)), 0.25);
        assert_eq!(config.acceptance_probability(Size::new(17, 8)), 0.1);
    }

    #[test]
    fn test_bad_ratio_is_rejected() {
        let strategy = RectangleStrategy::SpacePartition(SpacePartitionConfig {
            room_size_ratio: (0.5, 1.1),
            ..SpacePartitionConfig::default()
        });
        assert!(matches!(strategy.validate(), Err(ConfigError::InvalidSizeRatio { .. })));
    }

    #[test]
    fn test_space_partition_respects_room_count() {
        let strategy = RectangleStrategy::SpacePartition(SpacePartitionConfig {
            number_of_rooms: 2,
            ..SpacePartitionConfig::default()
        });
        for seed in 0..20 {
            let mut rng = LevelRng::new(seed);
            let mut sequence = strategy.sequence(Size::new(80, 45));
            assert!(drain(&mut sequence, &mut rng).len() <= 2);
        }
    }

    #[test]
    fn test_space_partition_never_nests_rooms() {
        let strategy = RectangleStrategy::default();
        for seed in 0..20 {
            let mut rng = LevelRng::new(seed);
            let mut sequence = strategy.sequence(Size::new(80, 45));
            drain(&mut sequence, &mut rng);

            let RectSequence::SpacePartition(partition) = &sequence else {
                panic!("expected a space partition sequence");
            };
            let tree = partition.tree().expect("tree is built on first pull");
            for id in 0..tree.len() {
                if partition.room_for(id).is_some() {
                    assert!(tree.ancestors(id).all(|a| partition.room_for(a).is_none()));
                }
            }
        }
    }

    #[test]
    fn test_space_partition_rooms_fit_limits() {
        let config = SpacePartitionConfig::default();
        let strategy = RectangleStrategy::SpacePartition(config.clone());
        let mut rng = LevelRng::new(21);
        let mut sequence = strategy.sequence(Size::new(80, 45));
        let rects = drain(&mut sequence, &mut rng);
        assert!(!rects.is_empty());
        for rect in &rects {
            assert!(rect.width <= config.maximum_room_size.width);
            assert!(rect.height <= config.maximum_room_size.height);
            assert!(rect.width >= config.minimum_room_size.width);
            assert!(rect.height >= config.minimum_room_size.height);
        }
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b));
            }
        }
    }

    proptest! {
        #[test]
        fn prop_random_placement_never_overlaps(seed in any::<u64>(), count in 1usize..40) {
            let mut rng = LevelRng::new(seed);
            let mut sequence = random_placement(count).sequence(Size::new(80, 45));
            let rects = drain(&mut sequence, &mut rng);
            prop_assert!(rects.len() <= count);
            let bounds = Rect::new(0, 0, 80, 45);
            for (i, a) in rects.iter().enumerate() {
                prop_assert!(bounds.contains_rect(a));
                for b in &rects[i + 1..] {
                    prop_assert!(!a.intersects(b));
                }
            }
        }
    }
}
