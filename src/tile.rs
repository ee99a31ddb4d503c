use serde::Serialize;

/// RGB color triple
pub type Color = [u8; 3];

/// A character with foreground and background colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Glyph {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Glyph {
    pub const fn new(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }
}

/// Overlay drawn for cells that are neither visible nor explored
pub const SHROUD: Glyph = Glyph::new(' ', [255, 255, 255], [0, 0, 0]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TileType {
    Empty,
    Floor,
    Wall,
    StairsUp,
    StairsDown,
}

impl TileType {
    pub fn is_walkable(&self) -> bool {
        matches!(self, TileType::Floor | TileType::StairsUp | TileType::StairsDown)
    }

    pub fn blocks_vision(&self) -> bool {
        matches!(self, TileType::Wall | TileType::Empty)
    }

    /// Character used when dumping a map as text
    pub fn symbol(&self) -> char {
        match self {
            TileType::Empty => ' ',
            TileType::Floor => '.',
            TileType::Wall => '#',
            TileType::StairsUp => '<',
            TileType::StairsDown => '>',
        }
    }

    /// The shared tile value for this type
    pub fn tile(&self) -> Tile {
        match self {
            TileType::Empty => Tile::EMPTY,
            TileType::Floor => Tile::FLOOR,
            TileType::Wall => Tile::WALL,
            TileType::StairsUp => Tile::STAIRS_UP,
            TileType::StairsDown => Tile::STAIRS_DOWN,
        }
    }
}

/// A map cell. The named constants are copied into grid cells by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub tile_type: TileType,
    pub walkable: bool,
    pub transparent: bool,
    /// Appearance when explored but out of sight
    pub dark: Glyph,
    /// Appearance when in sight
    pub light: Glyph,
    /// Appearance when highlighted by targeting or path previews
    pub highlighted: Glyph,
}

impl Tile {
    pub const EMPTY: Tile = Tile {
        tile_type: TileType::Empty,
        walkable: false,
        transparent: false,
        dark: Glyph::new(' ', [255, 255, 255], [0, 0, 0]),
        light: Glyph::new(' ', [255, 255, 255], [0, 0, 0]),
        highlighted: Glyph::new(' ', [255, 255, 255], [0, 0, 0]),
    };

    pub const FLOOR: Tile = Tile {
        tile_type: TileType::Floor,
        walkable: true,
        transparent: true,
        dark: Glyph::new('·', [80, 80, 100], [50, 50, 50]),
        light: Glyph::new('·', [100, 100, 120], [80, 80, 100]),
        highlighted: Glyph::new('·', [100, 100, 120], [80, 80, 150]),
    };

    pub const WALL: Tile = Tile {
        tile_type: TileType::Wall,
        walkable: false,
        transparent: false,
        dark: Glyph::new(' ', [255, 255, 255], [0, 0, 150]),
        light: Glyph::new(' ', [255, 255, 255], [50, 50, 200]),
        highlighted: Glyph::new(' ', [255, 255, 255], [20, 100, 200]),
    };

    pub const STAIRS_UP: Tile = Tile {
        tile_type: TileType::StairsUp,
        walkable: true,
        transparent: true,
        dark: Glyph::new('<', [80, 80, 100], [50, 50, 50]),
        light: Glyph::new('<', [100, 100, 120], [80, 80, 100]),
        highlighted: Glyph::new('<', [100, 100, 120], [80, 80, 150]),
    };

    pub const STAIRS_DOWN: Tile = Tile {
        tile_type: TileType::StairsDown,
        walkable: true,
        transparent: true,
        dark: Glyph::new('>', [80, 80, 100], [50, 50, 50]),
        light: Glyph::new('>', [100, 100, 120], [80, 80, 100]),
        highlighted: Glyph::new('>', [100, 100, 120], [80, 80, 150]),
    };

    pub fn new(tile_type: TileType) -> Self {
        tile_type.tile()
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::EMPTY
    }
}
