//! A generated map: the tile grid plus the rooms, corridors and stairs that
//! produced it. This is what the rest of a game reads once generation is done.

use crate::config::LevelConfig;
use crate::corridor::Corridor;
use crate::error::GenerationError;
use crate::generator::{Level, MapGenerator};
use crate::geometry::{Point, Size};
use crate::grid::{Grid, TileGrid};
use crate::room::Room;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Map {
    generator: MapGenerator,
    grid: Grid,
    level: Level,
    /// Every walkable point, rebuilt after each generation
    walkable: Vec<Point>,
}

impl Map {
    /// Generate a new map from `config`
    pub fn generate(config: &LevelConfig, rng: &mut impl Rng) -> Result<Self, GenerationError> {
        let generator = config.generator()?;
        let mut map = Self {
            generator,
            grid: Grid::new(config.size()),
            level: Level::default(),
            walkable: Vec::new(),
        };
        map.regenerate(rng)?;
        Ok(map)
    }

    /// Throw away the current level and generate a new one of the same size.
    /// On failure the current level is kept.
    pub fn regenerate(&mut self, rng: &mut impl Rng) -> Result<(), GenerationError> {
        puffin::profile_function!();
        let mut grid = Grid::new(self.grid.size());
        let level = self.generator.generate(&mut grid, rng)?;

        self.walkable = grid
            .points()
            .filter(|p| grid.tile_at(*p).is_some_and(|t| t.walkable))
            .collect();
        self.grid = grid;
        self.level = level;

        info!(
            target: "levelgen::generator",
            "Map {} ready with {} walkable tiles",
            self.grid.size(),
            self.walkable.len()
        );
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn size(&self) -> Size {
        self.grid.size()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn rooms(&self) -> &[Room] {
        &self.level.rooms
    }

    pub fn corridors(&self) -> &[Corridor] {
        &self.level.corridors
    }

    pub fn up_stairs(&self) -> &[Point] {
        &self.level.up_stairs
    }

    pub fn down_stairs(&self) -> &[Point] {
        &self.level.down_stairs
    }

    pub fn tile_is_in_bounds(&self, point: Point) -> bool {
        self.grid.in_bounds(point)
    }

    /// Whether an entity can stand on `point`. Asking about a point off the
    /// map is an error.
    pub fn tile_is_walkable(&self, point: Point) -> Result<bool, GenerationError> {
        self.grid
            .tile_at(point)
            .map(|tile| tile.walkable)
            .ok_or(GenerationError::OutOfBounds { x: point.x, y: point.y })
    }

    /// Every walkable point, row by row
    pub fn walkable_points(&self) -> &[Point] {
        &self.walkable
    }

    /// A uniformly random walkable point, or `None` on a map with no floor
    pub fn random_walkable_position(&self, rng: &mut impl Rng) -> Option<Point> {
        self.walkable.choose(rng).copied()
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.grid, f)
    }
}
