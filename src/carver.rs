//! Room carvers turn a candidate rectangle into a concrete room.
//!
//! A carver returning `None` ends room placement for the whole level, not
//! just for that rectangle.

use crate::automaton::{AutomatonConfig, CellularAutomaton};
use crate::constants::PROBABILITY_SUM_TOLERANCE;
use crate::error::ConfigError;
use crate::geometry::Rect;
use crate::grid::{Grid, TileGrid};
use crate::room::{FreeformRoom, RectangularRoom, Room};
use crate::tile::{Tile, TileType};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomCarver {
    /// The room fills the rectangle: floor inside, walls on the border
    #[default]
    Rectangular,
    /// An organic blob grown by the cellular automaton inside the rectangle
    CellularAutomaton(AutomatonConfig),
    /// Picks one of several carvers at random on every call
    WeightedChoice(WeightedChoice),
}

impl RoomCarver {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            RoomCarver::Rectangular => Ok(()),
            RoomCarver::CellularAutomaton(config) => config.validate(),
            RoomCarver::WeightedChoice(choice) => choice.validate(),
        }
    }

    pub fn carve(&self, rect: Rect, rng: &mut impl Rng) -> Result<Option<Room>, ConfigError> {
        match self {
            RoomCarver::Rectangular => Ok(Some(Room::Rectangular(RectangularRoom::new(rect)))),
            RoomCarver::CellularAutomaton(config) => carve_automaton_room(rect, *config, rng).map(Some),
            RoomCarver::WeightedChoice(choice) => choice.carve(rect, rng),
        }
    }
}

/// Grow a freeform room in `rect`.
///
/// The automaton only knows floor and emptiness, so it runs over the
/// rectangle inset by one, leaving a border for the walls. Walls go on every
/// non-floor cell that touches a floor cell.
fn carve_automaton_room(rect: Rect, config: AutomatonConfig, rng: &mut impl Rng) -> Result<Room, ConfigError> {
    let mut automaton = CellularAutomaton::new(rect.inset(1, 1, 1, 1), config)?;
    automaton.generate(rng);

    let mut tiles = Grid::new(rect.size());
    for point in automaton.tiles().points() {
        if automaton.tiles().tile_type_at(point) == Some(TileType::Floor) {
            tiles.set(point.x + 1, point.y + 1, Tile::FLOOR);
        }
    }

    let walls: Vec<_> = tiles
        .points()
        .filter(|p| tiles.tile_type_at(*p) != Some(TileType::Floor))
        .filter(|p| p.neighbors().any(|n| tiles.tile_type_at(n) == Some(TileType::Floor)))
        .collect();
    for point in walls {
        tiles.set_tile(point, Tile::WALL);
    }

    Ok(Room::Freeform(FreeformRoom::new(rect, tiles)))
}

/// One entry of a weighted choice table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedCarver {
    pub probability: f64,
    pub carver: RoomCarver,
}

/// An ordered table of carvers whose probabilities sum to 1.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<WeightedCarver>", into = "Vec<WeightedCarver>")]
pub struct WeightedChoice {
    choices: Vec<WeightedCarver>,
}

impl WeightedChoice {
    pub fn new(choices: Vec<(f64, RoomCarver)>) -> Result<Self, ConfigError> {
        let choices: Vec<WeightedCarver> = choices
            .into_iter()
            .map(|(probability, carver)| WeightedCarver { probability, carver })
            .collect();
        Self::try_from(choices)
    }

    pub fn choices(&self) -> &[WeightedCarver] {
        &self.choices
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.choices.is_empty() {
            return Err(ConfigError::EmptyWeightedChoice);
        }
        if let Some(choice) = self.choices.iter().find(|c| !(0.0..=1.0).contains(&c.probability)) {
            return Err(ConfigError::InvalidProbability(choice.probability));
        }
        let total: f64 = self.choices.iter().map(|c| c.probability).sum();
        if (total - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(ConfigError::ProbabilitiesDoNotSumToOne(total));
        }
        self.choices.iter().try_for_each(|c| c.carver.validate())
    }

    fn carve(&self, rect: Rect, rng: &mut impl Rng) -> Result<Option<Room>, ConfigError> {
        let roll = rng.gen::<f64>();

        let mut threshold = 0.0;
        for (index, choice) in self.choices.iter().enumerate() {
            threshold += choice.probability;
            if roll <= threshold {
                debug!(
                    target: "levelgen::generator",
                    "Weighted choice rolled {:.3}, using carver {}",
                    roll,
                    index
                );
                return choice.carver.carve(rect, rng);
            }
        }

        // Rounding left the total a hair under the roll
        match self.choices.last() {
            Some(choice) => choice.carver.carve(rect, rng),
            None => Ok(None),
        }
    }
}

impl TryFrom<Vec<WeightedCarver>> for WeightedChoice {
    type Error = ConfigError;

    fn try_from(choices: Vec<WeightedCarver>) -> Result<Self, Self::Error> {
        let choice = Self { choices };
        choice.validate()?;
        Ok(choice)
    }
}

impl From<WeightedChoice> for Vec<WeightedCarver> {
    fn from(choice: WeightedChoice) -> Self {
        choice.choices
    }
}
