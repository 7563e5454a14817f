//! Seatile - Nautical chart tile renderer
//!
//! This library rasterises a set of parsed chart features (IHO S-57 style
//! objects: buoys, beacons, lights, depth areas, traffic separation schemes
//! and so on) into a quad-tree of Web Mercator map tiles, one PNG per
//! `(zoom, x, y)`, and reports which tiles changed relative to a previous
//! publication so only deltas need shipping.
//!
//! # High-Level API
//!
//! ```ignore
//! use seatile::feature::ChartSnapshot;
//! use seatile::render::{RenderConfig, TileRenderer};
//!
//! let snapshot = ChartSnapshot::new(features);
//! let renderer = TileRenderer::new(snapshot, RenderConfig::default());
//!
//! // Ad hoc single tile
//! let png = renderer.render_tile(15, 16820, 10900)?;
//!
//! // Full pyramid with change tracking
//! let batch = renderer.render_pyramid(12, 2102, 1362, 18, "/var/tiles")?;
//! for line in batch.lines() {
//!     println!("{line}");
//! }
//! ```
//!
//! The symbol artwork and glyph library are a collaborator behind the
//! [`render::ChartCanvas`] trait; the built-in [`render::PixmapCanvas`]
//! draws simplified deterministic geometry so tile content detection and
//! diffing work without any external symbol set.

pub mod error;
pub mod feature;
pub mod geo;
pub mod render;
pub mod rules;

pub use error::RenderError;

/// Version of the seatile library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
