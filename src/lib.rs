//! Procedural dungeon level generation on a tile grid.
//!
//! Rectangles come from a [`RectangleStrategy`], become rooms through a
//! [`RoomCarver`], get joined up by a [`CorridorRouter`] and finally receive
//! stairs. [`Map`] wraps the whole pipeline for callers that just want a level.

pub mod automaton;
pub mod carver;
pub mod config;
pub mod constants;
pub mod corridor;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod grid;
pub mod line;
pub mod map;
pub mod partition;
pub mod rect_strategy;
pub mod rng;
pub mod room;
pub mod tile;

pub use automaton::{AutomatonConfig, CellularAutomaton};
pub use carver::{RoomCarver, WeightedChoice};
pub use config::{LayoutConfig, LevelConfig};
pub use corridor::{Corridor, CorridorRouter};
pub use error::{ConfigError, GenerationError};
pub use generator::{GenerationPhase, Level, LevelGenerator, MapGenerator};
pub use geometry::{Direction, Point, Rect, Size};
pub use grid::{Grid, TileGrid};
pub use map::Map;
pub use partition::PartitionTree;
pub use rect_strategy::RectangleStrategy;
pub use rng::LevelRng;
pub use room::Room;
pub use tile::{Tile, TileType};
