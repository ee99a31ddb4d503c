//! Level generation constants organized by category.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.

// =============================================================================
// MAP
// =============================================================================

/// Default map width
pub const MAP_DEFAULT_WIDTH: i32 = 80;
/// Default map height
pub const MAP_DEFAULT_HEIGHT: i32 = 45;

// =============================================================================
// ROOM PLACEMENT
// =============================================================================

/// Default number of rooms requested from a placement strategy
pub const DEFAULT_NUMBER_OF_ROOMS: usize = 30;
/// Default minimum room size (walls included)
pub const DEFAULT_MIN_ROOM_SIZE: i32 = 7;
/// Default maximum room size (walls included)
pub const DEFAULT_MAX_ROOM_SIZE: i32 = 20;
/// Attempts at finding a non-overlapping spot before random placement gives up
pub const PLACEMENT_ATTEMPTS_PER_RECT: u32 = 30;
/// Default fraction of the map covered by the single big room
pub const ONE_BIG_ROOM_PERCENTAGE: f64 = 0.5;

// =============================================================================
// BINARY SPACE PARTITION
// =============================================================================

/// Default number of recursive splits
pub const BSP_DEFAULT_DEPTH: u32 = 6;
/// Default maximum ratio between the sides of a partition
pub const BSP_DEFAULT_SIZE_RATIO: f64 = 1.1;

// =============================================================================
// CELLULAR AUTOMATON
// =============================================================================

/// Default chance of seeding a cell as floor
pub const AUTOMATON_DEFAULT_FILL: f64 = 0.5;
/// Default number of simulation rounds
pub const AUTOMATON_DEFAULT_ROUNDS: u32 = 5;
/// Neighbor count (the cell itself included) at which a cell is floor next round
pub const AUTOMATON_NEIGHBOR_THRESHOLD: u32 = 5;

// =============================================================================
// WEIGHTED CHOICE
// =============================================================================

/// Slack allowed when checking that weighted choice probabilities sum to 1.0
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-9;
