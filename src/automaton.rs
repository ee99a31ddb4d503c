//! Cellular automaton that grows organic floor shapes.
//!
//! The grid is seeded with random floor, then smoothed for a number of rounds.
//! A cell's neighbor count starts at 1 for the cell itself, whatever its
//! state, and adds every floor cell in its Moore neighborhood. Cells outside
//! the area are skipped. Birth and survival share one threshold: a count of
//! at least [`AUTOMATON_NEIGHBOR_THRESHOLD`] makes the cell floor.

use crate::constants::{AUTOMATON_DEFAULT_FILL, AUTOMATON_DEFAULT_ROUNDS, AUTOMATON_NEIGHBOR_THRESHOLD};
use crate::error::ConfigError;
use crate::geometry::{Point, Rect, Size};
use crate::grid::{Grid, TileGrid};
use crate::tile::{Tile, TileType};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Parameters of the automaton
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomatonConfig {
    /// Chance of seeding each cell as floor
    pub fill_percentage: f64,
    /// Smoothing rounds. More rounds give smoother output, fewer give jagged output.
    pub number_of_rounds: u32,
}

impl Default for AutomatonConfig {
    fn default() -> Self {
        Self {
            fill_percentage: AUTOMATON_DEFAULT_FILL,
            number_of_rounds: AUTOMATON_DEFAULT_ROUNDS,
        }
    }
}

impl AutomatonConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.number_of_rounds < 1 {
            return Err(ConfigError::InvalidRoundCount(self.number_of_rounds));
        }
        if !(0.0..=1.0).contains(&self.fill_percentage) {
            return Err(ConfigError::InvalidFillPercentage(self.fill_percentage));
        }
        Ok(())
    }
}

/// One automaton run over a bounded area.
///
/// `bounds` places the area on the map for logging and callers. Cells are
/// addressed locally from (0, 0).
#[derive(Debug, Clone)]
pub struct CellularAutomaton {
    bounds: Rect,
    config: AutomatonConfig,
    tiles: Grid,
}

impl CellularAutomaton {
    pub fn new(bounds: Rect, config: AutomatonConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            bounds,
            config,
            tiles: Grid::new(bounds.size()),
        })
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The current state: Floor and Empty tiles only
    pub fn tiles(&self) -> &Grid {
        &self.tiles
    }

    pub fn into_tiles(self) -> Grid {
        self.tiles
    }

    /// Seed the grid, then run every round
    pub fn generate(&mut self, rng: &mut impl Rng) {
        puffin::profile_function!();
        self.fill(rng);
        self.run();
    }

    fn fill(&mut self, rng: &mut impl Rng) {
        let fill_percentage = self.config.fill_percentage;
        let size = self.tiles.size();
        for y in 0..size.height {
            for x in 0..size.width {
                let tile = if rng.gen::<f64>() < fill_percentage {
                    Tile::FLOOR
                } else {
                    Tile::EMPTY
                };
                self.tiles.set(x, y, tile);
            }
        }
    }

    fn run(&mut self) {
        let rounds = self.config.number_of_rounds;
        info!(
            target: "levelgen::automaton",
            "Running cellular automaton over {} for {} round{}",
            self.bounds,
            rounds,
            if rounds == 1 { "" } else { "s" }
        );

        // Double buffer: read from `tiles`, write into `alternate`, then swap
        // so `tiles` always holds the latest round.
        let mut alternate = Grid::new(self.tiles.size());
        for _ in 0..rounds {
            Self::step(&self.tiles, &mut alternate);
            std::mem::swap(&mut self.tiles, &mut alternate);
        }

        debug!(
            target: "levelgen::automaton",
            "Automaton finished with {} floor cells",
            self.tiles.count(TileType::Floor)
        );
    }

    fn step(from: &Grid, to: &mut Grid) {
        for point in from.points() {
            let neighbors = Self::neighbor_count(from, point);
            let tile = if neighbors >= AUTOMATON_NEIGHBOR_THRESHOLD {
                Tile::FLOOR
            } else {
                Tile::EMPTY
            };
            to.set_tile(point, tile);
        }
    }

    fn neighbor_count(tiles: &Grid, point: Point) -> u32 {
        // The cell counts itself regardless of its state
        1 + point
            .neighbors()
            .filter(|n| tiles.tile_type_at(*n) == Some(TileType::Floor))
            .count() as u32
    }
}

/// Run the automaton over an area of `size` and return the resulting tiles.
pub fn generate(size: Size, config: AutomatonConfig, rng: &mut impl Rng) -> Result<Grid, ConfigError> {
    let mut automaton = CellularAutomaton::new(Rect::from_origin_size(Point::default(), size), config)?;
    automaton.generate(rng);
    Ok(automaton.into_tiles())
}
