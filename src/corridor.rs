//! Corridors between rooms.
//!
//! The elbow router sorts rooms by the origin of their bounds and joins each
//! consecutive pair with an L-shaped path between their midpoints. The result
//! is a chain over the sorted rooms, so it does not promise that every room
//! can reach every other.

use crate::geometry::Point;
use crate::grid::TileGrid;
use crate::line::BresenhamLineIter;
use crate::room::Room;
use crate::tile::{Tile, TileType};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Ordered path of points from one room's midpoint to another's.
/// The elbow point appears twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Corridor {
    pub points: Vec<Point>,
}

impl Corridor {
    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorridorRouter {
    /// One right-angle corner per pair of consecutive rooms
    #[default]
    Elbow,
}

impl CorridorRouter {
    /// Plan corridors for `rooms`. Fewer than two rooms gives no corridors.
    pub fn route(&self, rooms: &[Room], rng: &mut impl Rng) -> Vec<Corridor> {
        puffin::profile_function!();
        match self {
            CorridorRouter::Elbow => route_elbows(rooms, rng),
        }
    }

    /// Stamp corridors as floor and surround them with walls where the map is still empty.
    pub fn apply(&self, corridors: &[Corridor], grid: &mut impl TileGrid) {
        for corridor in corridors {
            for &point in &corridor.points {
                grid.set_tile(point, Tile::FLOOR);
                for neighbor in point.neighbors() {
                    if grid.tile_type_at(neighbor) == Some(TileType::Empty) {
                        grid.set_tile(neighbor, Tile::WALL);
                    }
                }
            }
        }
    }
}

fn route_elbows(rooms: &[Room], rng: &mut impl Rng) -> Vec<Corridor> {
    let mut sorted: Vec<&Room> = rooms.iter().collect();
    sorted.sort_by_key(|room| room.bounds().origin());

    let corridors: Vec<Corridor> = sorted
        .windows(2)
        .map(|pair| elbow_between(pair[0], pair[1], rng))
        .collect();

    info!(target: "levelgen::corridor", "Routed {} corridors between {} rooms", corridors.len(), rooms.len());
    corridors
}

fn elbow_between(from: &Room, to: &Room, rng: &mut impl Rng) -> Corridor {
    let start = from.bounds().midpoint();
    let end = to.bounds().midpoint();

    // Randomly go horizontal-then-vertical or vertical-then-horizontal
    let corner = if rng.gen_bool(0.5) {
        Point::new(end.x, start.y)
    } else {
        Point::new(start.x, end.y)
    };

    debug!(
        target: "levelgen::corridor",
        "Digging a tunnel between {} and {} with corner {}",
        start,
        end,
        corner
    );

    let points = BresenhamLineIter::between(start, corner)
        .chain(BresenhamLineIter::between(corner, end))
        .collect();
    Corridor { points }
}
