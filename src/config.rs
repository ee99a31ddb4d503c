//! Level configuration, loadable from JSON.
//!
//! Every field has a default, so a config file only names what it changes:
//!
//! ```json
//! {
//!   "width": 60,
//!   "seed": 7,
//!   "layout": {
//!     "rooms_and_corridors": {
//!       "rects": {"random_placement": {"number_of_rooms": 12}},
//!       "carver": {"cellular_automaton": {"fill_percentage": 0.55}}
//!     }
//!   }
//! }
//! ```

use crate::automaton::AutomatonConfig;
use crate::carver::RoomCarver;
use crate::constants::{MAP_DEFAULT_HEIGHT, MAP_DEFAULT_WIDTH};
use crate::corridor::CorridorRouter;
use crate::error::ConfigError;
use crate::generator::{LevelGenerator, MapGenerator};
use crate::geometry::Size;
use crate::rect_strategy::RectangleStrategy;
use crate::rng::LevelRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub width: i32,
    pub height: i32,
    /// Seed for the RNG built by [`LevelConfig::rng`]; a random one is drawn when absent
    pub seed: Option<u64>,
    pub layout: LayoutConfig,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: MAP_DEFAULT_WIDTH,
            height: MAP_DEFAULT_HEIGHT,
            seed: None,
            layout: LayoutConfig::default(),
        }
    }
}

/// How the map is filled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutConfig {
    RoomsAndCorridors {
        #[serde(default)]
        rects: RectangleStrategy,
        #[serde(default)]
        carver: RoomCarver,
        #[serde(default)]
        corridors: CorridorRouter,
    },
    /// One automaton run over the whole map
    CellularAutomaton(AutomatonConfig),
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig::RoomsAndCorridors {
            rects: RectangleStrategy::default(),
            carver: RoomCarver::default(),
            corridors: CorridorRouter::default(),
        }
    }
}

impl LevelConfig {
    /// Read a config from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: LevelConfig = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// The RNG for a run of this config, seeded from `seed` when it is set
    pub fn rng(&self) -> LevelRng {
        match self.seed {
            Some(seed) => LevelRng::new(seed),
            None => LevelRng::from_entropy(),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check everything that would make generation fail, before any randomness is drawn
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 1 || self.height < 1 {
            return Err(ConfigError::InvalidMapSize {
                width: self.width,
                height: self.height,
            });
        }
        match &self.layout {
            LayoutConfig::RoomsAndCorridors { rects, carver, .. } => {
                rects.validate()?;
                carver.validate()
            }
            LayoutConfig::CellularAutomaton(config) => config.validate(),
        }
    }

    /// Build the generator this config describes
    pub fn generator(&self) -> Result<MapGenerator, ConfigError> {
        self.validate()?;
        Ok(match &self.layout {
            LayoutConfig::RoomsAndCorridors {
                rects,
                carver,
                corridors,
            } => MapGenerator::RoomsAndCorridors(LevelGenerator::new(rects.clone(), carver.clone(), *corridors)?),
            LayoutConfig::CellularAutomaton(config) => MapGenerator::CellularAutomaton(*config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect_strategy::{RandomPlacementConfig, SpacePartitionConfig};

    #[test]
    fn test_empty_json_gives_defaults() {
        let config: LevelConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LevelConfig::default());
        assert_eq!(config.size(), Size::new(80, 45));
        let LayoutConfig::RoomsAndCorridors { rects, carver, corridors } = &config.layout else {
            panic!("expected rooms and corridors");
        };
        assert_eq!(*rects, RectangleStrategy::SpacePartition(SpacePartitionConfig::default()));
        assert_eq!(*carver, RoomCarver::Rectangular);
        assert_eq!(*corridors, CorridorRouter::Elbow);
    }

    #[test]
    fn test_partial_json_fills_in_defaults() {
        let json = r#"{
            "width": 50,
            "seed": 7,
            "layout": {"rooms_and_corridors": {
                "rects": {"random_placement": {"number_of_rooms": 5}},
                "carver": {"cellular_automaton": {"number_of_rounds": 3}}
            }}
        }"#;
        let config: LevelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.width, 50);
        assert_eq!(config.height, 45);
        assert_eq!(config.seed, Some(7));
        let LayoutConfig::RoomsAndCorridors { rects, carver, .. } = &config.layout else {
            panic!("expected rooms and corridors");
        };
        assert_eq!(
            *rects,
            RectangleStrategy::RandomPlacement(RandomPlacementConfig {
                number_of_rooms: 5,
                ..RandomPlacementConfig::default()
            })
        );
        assert_eq!(
            *carver,
            RoomCarver::CellularAutomaton(AutomatonConfig {
                fill_percentage: 0.5,
                number_of_rounds: 3,
            })
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rng_uses_configured_seed() {
        let config = LevelConfig {
            seed: Some(42),
            ..LevelConfig::default()
        };
        assert_eq!(config.rng().seed(), 42);

        let mut a = config.rng();
        let mut b = LevelRng::new(42);
        assert_eq!(rand::Rng::gen::<u64>(&mut a), rand::Rng::gen::<u64>(&mut b));
    }

    #[test]
    fn test_automaton_layout() {
        let json = r#"{"layout": {"cellular_automaton": {"fill_percentage": 0.45}}}"#;
        let config: LevelConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(config.generator(), Ok(MapGenerator::CellularAutomaton(_))));
    }

    #[test]
    fn test_zero_size_map_is_rejected() {
        let config = LevelConfig {
            width: 0,
            ..LevelConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMapSize { width: 0, height: 45 })
        ));
    }

    #[test]
    fn test_bad_rounds_are_rejected() {
        let config = LevelConfig {
            layout: LayoutConfig::CellularAutomaton(AutomatonConfig {
                fill_percentage: 0.5,
                number_of_rounds: 0,
            }),
            ..LevelConfig::default()
        };
        assert!(matches!(config.generator(), Err(ConfigError::InvalidRoundCount(0))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = LevelConfig::load(Path::new("/nonexistent/levelgen.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let path = std::env::temp_dir().join(format!("levelgen-malformed-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let result = LevelConfig::load(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = LevelConfig {
            seed: Some(3),
            ..LevelConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: LevelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
