use crate::geometry::{Point, Rect, Size};
use crate::tile::{Tile, TileType};
use std::fmt;

/// Read/write access to a tile grid, as needed by the generation pipeline.
pub trait TileGrid {
    fn bounds(&self) -> Rect;

    fn tile_at(&self, point: Point) -> Option<&Tile>;

    /// Write a tile. Returns false (and writes nothing) when out of bounds.
    fn set_tile(&mut self, point: Point, tile: Tile) -> bool;

    fn in_bounds(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    fn tile_type_at(&self, point: Point) -> Option<TileType> {
        self.tile_at(point).map(|tile| tile.tile_type)
    }
}

/// Dense row-major array of tiles. Dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    pub fn new(size: Size) -> Self {
        Self::filled(size, Tile::EMPTY)
    }

    pub fn filled(size: Size, tile: Tile) -> Self {
        let width = size.width.max(0) as usize;
        let height = size.height.max(0) as usize;
        Self {
            width,
            height,
            tiles: vec![tile; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as i32, self.height as i32)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    fn get_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        self.get_index(x, y).map(|idx| &self.tiles[idx])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        let idx = self.get_index(x, y)?;
        Some(&mut self.tiles[idx])
    }

    pub fn set(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        match self.get_index(x, y) {
            Some(idx) => {
                self.tiles[idx] = tile;
                true
            }
            None => false,
        }
    }

    /// Reset every cell to `tile`
    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    /// Every cell position, row by row
    pub fn points(&self) -> impl Iterator<Item = Point> {
        Rect::new(0, 0, self.width as i32, self.height as i32).points()
    }

    pub fn count(&self, tile_type: TileType) -> usize {
        self.tiles.iter().filter(|t| t.tile_type == tile_type).count()
    }
}

impl TileGrid for Grid {
    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    fn tile_at(&self, point: Point) -> Option<&Tile> {
        self.get(point.x, point.y)
    }

    fn set_tile(&mut self, point: Point, tile: Tile) -> bool {
        self.set(point.x, point.y, tile)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.width.max(1)) {
            let line: String = row.iter().map(|t| t.tile_type.symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
