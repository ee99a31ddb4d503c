//! Rooms placed on a level.
//!
//! A room's bounds include its walls. Rectangular rooms derive their points
//! from the bounds; freeform rooms own a local tile grid the size of their
//! bounds and derive their points by scanning it.

use crate::geometry::{Point, Rect};
use crate::grid::Grid;
use crate::tile::TileType;

#[derive(Debug, Clone, PartialEq)]
pub enum Room {
    Rectangular(RectangularRoom),
    Freeform(FreeformRoom),
}

impl Room {
    pub fn bounds(&self) -> Rect {
        match self {
            Room::Rectangular(room) => room.bounds,
            Room::Freeform(room) => room.bounds,
        }
    }

    /// The midpoint of the bounds, truncated by integer division
    pub fn center(&self) -> Point {
        self.bounds().midpoint()
    }

    pub fn floor_points(&self) -> Vec<Point> {
        match self {
            Room::Rectangular(room) => room.floor_points().collect(),
            Room::Freeform(room) => room.points_of(TileType::Floor),
        }
    }

    pub fn wall_points(&self) -> Vec<Point> {
        match self {
            Room::Rectangular(room) => room.wall_points(),
            Room::Freeform(room) => room.points_of(TileType::Wall),
        }
    }

    /// Points an entity could stand on
    pub fn walkable_points(&self) -> Vec<Point> {
        match self {
            Room::Rectangular(room) => room.floor_points().collect(),
            Room::Freeform(room) => room.walkable_points(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Room::Rectangular(_) => "rectangular",
            Room::Freeform(_) => "freeform",
        }
    }
}

/// A rectangular room. The floor is the bounds inset by one on every side,
/// the walls are the one-cell ring around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectangularRoom {
    pub bounds: Rect,
}

impl RectangularRoom {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    pub fn floor_rect(&self) -> Rect {
        self.bounds.inset(1, 1, 1, 1)
    }

    pub fn floor_points(&self) -> impl Iterator<Item = Point> {
        self.floor_rect().points()
    }

    pub fn wall_points(&self) -> Vec<Point> {
        let bounds = self.bounds;
        if bounds.is_empty() {
            return Vec::new();
        }

        let (min_x, max_x, min_y, max_y) = (bounds.min_x(), bounds.max_x(), bounds.min_y(), bounds.max_y());
        let mut points = Vec::new();

        for x in min_x..=max_x {
            points.push(Point::new(x, min_y));
            if max_y != min_y {
                points.push(Point::new(x, max_y));
            }
        }

        for y in min_y + 1..max_y {
            points.push(Point::new(min_x, y));
            if max_x != min_x {
                points.push(Point::new(max_x, y));
            }
        }

        points
    }
}

/// An irregular room backed by a room-local tile grid of Floor, Wall and Empty.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeformRoom {
    pub bounds: Rect,
    tiles: Grid,
}

impl FreeformRoom {
    /// `tiles` must be the size of `bounds`; cell (0, 0) maps to the bounds origin.
    pub fn new(bounds: Rect, tiles: Grid) -> Self {
        debug_assert_eq!(tiles.size(), bounds.size());
        Self { bounds, tiles }
    }

    pub fn tiles(&self) -> &Grid {
        &self.tiles
    }

    fn to_map(&self, local: Point) -> Point {
        Point::new(self.bounds.x + local.x, self.bounds.y + local.y)
    }

    fn points_of(&self, tile_type: TileType) -> Vec<Point> {
        self.tiles
            .points()
            .filter(|p| self.tiles.get(p.x, p.y).map(|t| t.tile_type) == Some(tile_type))
            .map(|p| self.to_map(p))
            .collect()
    }

    fn walkable_points(&self) -> Vec<Point> {
        self.tiles
            .points()
            .filter(|p| self.tiles.get(p.x, p.y).is_some_and(|t| t.walkable))
            .map(|p| self.to_map(p))
            .collect()
    }
}
