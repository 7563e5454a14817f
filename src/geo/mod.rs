//! Projection and tile geometry.
//!
//! Converts between `(zoom, x, y)` tile addresses and Web Mercator
//! geographic bounds, and between geographic coordinates and canvas pixels
//! within one tile. Purely functional with no shared state, so every
//! function is safe to call concurrently for arbitrary tiles.

mod types;

pub use types::{Bounds, TileCoord, EARTH_RADIUS, STANDARD_TILE_SIZE};

use std::f64::consts::PI;

/// Full Mercator map width in radians.
const MERCATOR_WIDTH: f64 = 2.0 * PI;

/// Forward Mercator ordinate of a latitude in radians.
#[inline]
pub fn mercator_y(lat: f64) -> f64 {
    (PI / 4.0 + lat / 2.0).tan().ln()
}

/// Computes the bounding box of a tile in Mercator radians.
///
/// The left/top edges come directly from the tile index. The right/bottom
/// edges are offset by `tile_size / 256 / scale` tile units: a requested
/// tile is not assumed to be a single standard tile (a 2048 px tile at
/// scale 1 covers an 8×8 block of 256 px tiles).
pub fn tile_bounds(zoom: u8, x: u32, y: u32, tile_size: u32, scale: f64) -> Bounds {
    let pow = (1u64 << zoom) as f64;
    let span = tile_size as f64 / STANDARD_TILE_SIZE as f64 / scale;

    let left = x as f64;
    let top = pow - y as f64;
    let right = left + span;
    let bottom = top - span;

    Bounds::new(
        bottom / pow * MERCATOR_WIDTH - PI,
        left / pow * MERCATOR_WIDTH - PI,
        top / pow * MERCATOR_WIDTH - PI,
        right / pow * MERCATOR_WIDTH - PI,
    )
}

/// Padding in radians added around a tile's query bounds so features that
/// straddle a tile edge are still fetched.
///
/// A fixed pixel border is requested: halved per zoom step below 12, the
/// full tile size from 12 up.
pub fn mercator_border(zoom: u8, tile_size: u32) -> f64 {
    let pow = (1u64 << zoom) as f64;
    let border = if zoom < 12 {
        tile_size >> (11 - zoom as u32)
    } else {
        tile_size
    };

    MERCATOR_WIDTH / tile_size as f64 / pow * border as f64
}

/// Pixels across the whole map per radian at the given zoom.
#[inline]
fn pixels_per_radian(zoom: u8, tile_size: u32, scale: f64) -> f64 {
    tile_size as f64 * scale * (1u64 << zoom) as f64 / MERCATOR_WIDTH
}

/// Spherical Web Mercator forward projection to absolute map pixels.
///
/// Input coordinates are in radians. The result is in the global pixel
/// space of the given zoom level; a tile's origin sits at
/// `(x · tile_size · scale, y · tile_size · scale)`.
#[inline]
pub fn project(lon: f64, lat: f64, zoom: u8, tile_size: u32, scale: f64) -> (f64, f64) {
    let pixels = pixels_per_radian(zoom, tile_size, scale);
    ((lon + PI) * pixels, (PI - mercator_y(lat)) * pixels)
}

/// Length of one nautical mile in pixels at the given latitude.
///
/// Measures the projected span of the minute of latitude centred on
/// `lat`, so real-world-scale symbols stay consistent across zooms.
pub fn pixels_per_mile(lat: f64, zoom: u8, tile_size: u32, scale: f64) -> f64 {
    let half_nm = (0.5 / 60.0f64).to_radians();
    let y_south = PI - mercator_y(lat - half_nm);
    let y_north = PI - mercator_y(lat + half_nm);

    (y_south - y_north) * pixels_per_radian(zoom, tile_size, scale)
}
