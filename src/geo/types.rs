//! Tile coordinate and bounding box types.

use std::fmt;

/// Standard slippy-map tile edge in pixels.
pub const STANDARD_TILE_SIZE: u32 = 256;

/// Spherical Mercator sphere radius in metres (EPSG:3857).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// A tile address in the Web Mercator quad tree.
///
/// `x` and `y` must be below `2^zoom`; `y` is 0 at the north edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(zoom: u8, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }

    /// Whether `x` and `y` are within range for this zoom level.
    pub fn is_valid(&self) -> bool {
        self.zoom < 32 && {
            let n = 1u64 << self.zoom;
            (self.x as u64) < n && (self.y as u64) < n
        }
    }

    /// The four children of this node at `zoom + 1`, in row-major order.
    pub fn children(&self) -> [TileCoord; 4] {
        let (z, x, y) = (self.zoom + 1, self.x * 2, self.y * 2);
        [
            TileCoord::new(z, x, y),
            TileCoord::new(z, x + 1, y),
            TileCoord::new(z, x, y + 1),
            TileCoord::new(z, x + 1, y + 1),
        ]
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// A geographic bounding box in Mercator radians.
///
/// `west`/`east` are longitudes in radians; `south`/`north` are Mercator
/// ordinates `ln tan(π/4 + lat/2)`, increasing northwards. Both axes span
/// `(-π, π)` over the full map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Grows the box by `border` radians on every side.
    pub fn padded(&self, border: f64) -> Bounds {
        Bounds {
            south: self.south - border,
            west: self.west - border,
            north: self.north + border,
            east: self.east + border,
        }
    }

    /// Whether a geographic position (radians) falls inside the box.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        let y = super::mercator_y(lat);
        lon >= self.west && lon <= self.east && y >= self.south && y <= self.north
    }

    /// Whether another box (same coordinate space) intersects this one.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.west <= other.east
            && other.west <= self.east
            && self.south <= other.north
            && other.south <= self.north
    }

    /// The box in EPSG:3857 metres, for external spatial queries.
    pub fn to_epsg3857(&self) -> (f64, f64, f64, f64) {
        (
            self.south * EARTH_RADIUS,
            self.west * EARTH_RADIUS,
            self.north * EARTH_RADIUS,
            self.east * EARTH_RADIUS,
        )
    }
}
