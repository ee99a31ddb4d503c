//! Level generation: placing rooms, connecting them and adding stairs.
//!
//! [`LevelGenerator`] pulls rectangles from a [`RectangleStrategy`], turns
//! each into a room with a [`RoomCarver`], stamps the rooms into the grid,
//! routes corridors between them and finally drops one up and one down
//! staircase. [`MapGenerator`] picks between that pipeline and filling the
//! whole map with the cellular automaton.

use crate::automaton::{self, AutomatonConfig};
use crate::carver::RoomCarver;
use crate::corridor::{Corridor, CorridorRouter};
use crate::error::{ConfigError, GenerationError};
use crate::geometry::{Point, Rect};
use crate::grid::TileGrid;
use crate::rect_strategy::{RectSequence, RectangleStrategy};
use crate::room::Room;
use crate::tile::{Tile, TileType};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

/// Where a generator is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    /// Pulling rectangles and carving rooms
    Placing,
    /// Routing and stamping corridors
    Connecting,
    /// Choosing the stair locations
    Staircasing,
    Done,
}

/// Everything a generation run produced besides the tiles themselves
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Level {
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
    pub up_stairs: Vec<Point>,
    pub down_stairs: Vec<Point>,
}

impl Level {
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty() && self.corridors.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct LevelGenerator {
    rects: RectangleStrategy,
    carver: RoomCarver,
    router: CorridorRouter,
    phase: GenerationPhase,
}

impl LevelGenerator {
    /// Build a generator, rejecting configurations that can never succeed
    pub fn new(rects: RectangleStrategy, carver: RoomCarver, router: CorridorRouter) -> Result<Self, ConfigError> {
        rects.validate()?;
        carver.validate()?;
        Ok(Self {
            rects,
            carver,
            router,
            phase: GenerationPhase::Done,
        })
    }

    pub fn rects(&self) -> &RectangleStrategy {
        &self.rects
    }

    pub fn carver(&self) -> &RoomCarver {
        &self.carver
    }

    pub fn router(&self) -> CorridorRouter {
        self.router
    }

    /// The phase of the current or most recent run
    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    /// Run the whole pipeline into `grid`.
    ///
    /// The grid is expected to start out empty. Running out of rectangles,
    /// or a carver giving up, just makes for a smaller level.
    pub fn generate(&mut self, grid: &mut impl TileGrid, rng: &mut impl Rng) -> Result<Level, GenerationError> {
        puffin::profile_function!();

        let bounds = grid.bounds();
        let mut level = Level::default();
        self.phase = GenerationPhase::Placing;

        loop {
            match self.phase {
                GenerationPhase::Placing => {
                    puffin::profile_scope!("placing");
                    let mut sequence = self.rects.sequence(bounds.size());
                    let carver = &self.carver;
                    level.rooms = place_rooms(&mut sequence, bounds, rng, |rect, rng| carver.carve(rect, rng))?;
                    info!(target: "levelgen::generator", "Placed {} rooms", level.rooms.len());

                    if level.rooms.is_empty() {
                        self.phase = GenerationPhase::Done;
                    } else {
                        stamp_rooms(&level.rooms, grid);
                        self.phase = GenerationPhase::Connecting;
                    }
                }
                GenerationPhase::Connecting => {
                    puffin::profile_scope!("connecting");
                    level.corridors = self.router.route(&level.rooms, rng);
                    self.router.apply(&level.corridors, grid);
                    self.phase = GenerationPhase::Staircasing;
                }
                GenerationPhase::Staircasing => {
                    puffin::profile_scope!("staircasing");
                    let (up, down) = place_stairs(&level.rooms, rng);
                    if let Some(point) = up {
                        grid.set_tile(point, Tile::STAIRS_UP);
                        level.up_stairs.push(point);
                    }
                    if let Some(point) = down {
                        grid.set_tile(point, Tile::STAIRS_DOWN);
                        level.down_stairs.push(point);
                    }
                    self.phase = GenerationPhase::Done;
                }
                GenerationPhase::Done => break,
            }
        }

        info!(
            target: "levelgen::generator",
            "Generated level with {} rooms, {} corridors, {} up stairs, {} down stairs",
            level.rooms.len(),
            level.corridors.len(),
            level.up_stairs.len(),
            level.down_stairs.len()
        );
        Ok(level)
    }
}

/// Pull rectangles and carve them until the sequence ends or the carver gives up.
fn place_rooms<R, F>(
    sequence: &mut RectSequence,
    bounds: Rect,
    rng: &mut R,
    mut carve: F,
) -> Result<Vec<Room>, ConfigError>
where
    R: Rng,
    F: FnMut(Rect, &mut R) -> Result<Option<Room>, ConfigError>,
{
    let mut rooms = Vec::new();
    while let Some(rect) = sequence.next_rect(rng) {
        // Strategies work in map-local coordinates
        let rect = Rect::new(rect.x + bounds.x, rect.y + bounds.y, rect.width, rect.height);
        match carve(rect, rng)? {
            Some(room) => {
                debug!(target: "levelgen::generator", "Carved {} room in {}", room.kind(), rect);
                rooms.push(room);
            }
            None => {
                info!(
                    target: "levelgen::generator",
                    "Carver produced no room for {}; stopping after {} rooms",
                    rect,
                    rooms.len()
                );
                break;
            }
        }
    }
    Ok(rooms)
}

/// Stamp every room's floor, then every room's walls onto cells still empty.
/// A wall never lands on another room's floor.
fn stamp_rooms(rooms: &[Room], grid: &mut impl TileGrid) {
    puffin::profile_function!();
    for room in rooms {
        for point in room.floor_points() {
            grid.set_tile(point, Tile::FLOOR);
        }
    }
    for room in rooms {
        for point in room.wall_points() {
            if grid.tile_type_at(point) == Some(TileType::Empty) {
                grid.set_tile(point, Tile::WALL);
            }
        }
    }
}

/// Choose the up and down stair points. The down stairs go in a different
/// room whenever there is more than one. A room without walkable points
/// gets no stairs.
fn place_stairs(rooms: &[Room], rng: &mut impl Rng) -> (Option<Point>, Option<Point>) {
    if rooms.is_empty() {
        return (None, None);
    }

    let up_room = rng.gen_range(0..rooms.len());
    let mut down_room = rng.gen_range(0..rooms.len());
    while rooms.len() >= 2 && down_room == up_room {
        down_room = rng.gen_range(0..rooms.len());
    }

    let up = rooms[up_room].walkable_points().choose(rng).copied();
    let down = rooms[down_room].walkable_points().choose(rng).copied();
    debug!(
        target: "levelgen::generator",
        "Up stairs in room {} at {:?}, down stairs in room {} at {:?}",
        up_room,
        up,
        down_room,
        down
    );
    (up, down)
}

/// Whole-map generation, either rooms and corridors or a single automaton run
#[derive(Debug, Clone)]
pub enum MapGenerator {
    RoomsAndCorridors(LevelGenerator),
    CellularAutomaton(AutomatonConfig),
}

impl MapGenerator {
    pub fn generate(&mut self, grid: &mut impl TileGrid, rng: &mut impl Rng) -> Result<Level, GenerationError> {
        match self {
            MapGenerator::RoomsAndCorridors(generator) => generator.generate(grid, rng),
            MapGenerator::CellularAutomaton(config) => {
                puffin::profile_scope!("cellular_automaton_map");
                let bounds = grid.bounds();
                let tiles = automaton::generate(bounds.size(), *config, rng)?;
                for point in tiles.points() {
                    if tiles.tile_type_at(point) == Some(TileType::Floor) {
                        grid.set_tile(Point::new(point.x + bounds.x, point.y + bounds.y), Tile::FLOOR);
                    }
                }
                Ok(Level::default())
            }
        }
    }
}
