//! Integer grid geometry: points, sizes, rectangles and compass directions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A grid position. Ordering is by `x`, then `y`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The eight Moore neighbors, starting North and going clockwise.
    pub fn neighbors(self) -> impl Iterator<Item = Point> {
        Direction::ALL.into_iter().map(move |dir| self + dir)
    }

    /// True if `other` is one of the eight cells around this one.
    pub fn is_adjacent_to(&self, other: Point) -> bool {
        *self != other && (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }

    pub fn euclidean_distance_to(&self, other: Point) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::ops::Add<Direction> for Point {
    type Output = Point;

    fn add(self, dir: Direction) -> Point {
        let (dx, dy) = dir.delta();
        Point::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x:{}, y:{})", self.x, self.y)
    }
}

/// The eight compass directions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All directions, North first then clockwise
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Offset in grid coordinates (y grows downward)
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }
}

/// Width and height of an area
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(w:{}, h:{})", self.width, self.height)
    }
}

/// A rectangle representing a room, a partition or a whole map
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn min_x(&self) -> i32 {
        self.x
    }

    pub fn min_y(&self) -> i32 {
        self.y
    }

    /// Largest x still inside the rectangle
    pub fn max_x(&self) -> i32 {
        self.x + self.width - 1
    }

    /// Largest y still inside the rectangle
    pub fn max_y(&self) -> i32 {
        self.y + self.height - 1
    }

    pub fn mid_x(&self) -> i32 {
        self.x + self.width / 2
    }

    pub fn mid_y(&self) -> i32 {
        self.y + self.height / 2
    }

    /// Center of the rectangle, truncated by integer division
    pub fn midpoint(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// A new rectangle moved in from each side. The result is not normalized,
    /// so insetting a thin rectangle can give a negative size.
    pub fn inset(&self, top: i32, right: i32, bottom: i32, left: i32) -> Rect {
        Rect::new(
            self.x + left,
            self.y + top,
            self.width - left - right,
            self.height - top - bottom,
        )
    }

    /// Check if a point is inside this rectangle
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Check if `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x() >= self.min_x()
            && other.max_x() <= self.max_x()
            && other.min_y() >= self.min_y()
            && other.max_y() <= self.max_y()
    }

    /// True if the two rectangles share at least one cell
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min_x() <= other.max_x()
            && other.min_x() <= self.max_x()
            && self.min_y() <= other.max_y()
            && other.min_y() <= self.max_y()
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x(), self.min_y()),
            Point::new(self.max_x(), self.min_y()),
            Point::new(self.min_x(), self.max_y()),
            Point::new(self.max_x(), self.max_y()),
        ]
    }

    /// Every cell in the rectangle, row by row
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let (min_x, max_x) = (self.min_x(), self.max_x());
        (self.min_y()..=self.max_y()).flat_map(move |y| (min_x..=max_x).map(move |x| Point::new(x, y)))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.origin(), self.size())
    }
}
