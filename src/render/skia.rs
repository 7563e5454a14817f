//! Raster canvas backed by `tiny-skia`.
//!
//! Owns the projection context for one tile (zoom, canvas size, scale,
//! pixel origin) and rasterises rule-engine draw calls with simplified
//! glyph geometry. Output is deterministic: identical inputs produce
//! byte-identical PNG tiles.

use super::canvas::{
    ChartCanvas, Delta, FontSpec, Handle, LabelFrame, LineStyle, Rgba, Scheme, SymbolId,
};
use crate::error::RenderError;
use crate::feature::{Feature, Position, Prim, UniHlu};
use crate::geo;
use std::f64::consts::PI;
use tiny_skia::{
    FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, StrokeDash, Transform,
};

/// Pixels per symbol unit at symbol scale 1.
const UNIT_PX: f64 = 0.1;

/// Rasterising canvas for one tile.
pub struct PixmapCanvas {
    pixmap: Pixmap,
    zoom: u8,
    tile_size: u32,
    scale: f64,
    origin: (f64, f64),
    /// Symbol scale factor, doubling per zoom step above 12.
    sscale: f64,
}

impl PixmapCanvas {
    /// Creates a transparent canvas for the given tile.
    pub fn new(zoom: u8, x: u32, y: u32, tile_size: u32, scale: f64) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(tile_size, tile_size)
            .ok_or_else(|| RenderError::Encode(format!("cannot allocate {tile_size} px canvas")))?;
        let span = tile_size as f64 * scale;
        Ok(Self {
            pixmap,
            zoom,
            tile_size,
            scale,
            origin: (x as f64 * span, y as f64 * span),
            sscale: scale * 2f64.powi(zoom as i32 - 12),
        })
    }

    /// Encodes the canvas as a PNG tile.
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }

    /// Pixels per symbol unit at the canvas's zoom.
    fn unit(&self) -> f64 {
        UNIT_PX * self.sscale
    }

    /// Canvas pixel position of a geographic point.
    fn px(&self, pos: Position) -> (f32, f32) {
        let (gx, gy) = geo::project(pos.lon, pos.lat, self.zoom, self.tile_size, self.scale);
        ((gx - self.origin.0) as f32, (gy - self.origin.1) as f32)
    }

    fn pixels_per_radian(&self) -> f64 {
        self.tile_size as f64 * self.scale * (1u64 << self.zoom) as f64 / (2.0 * PI)
    }

    /// The feature's path in canvas pixels, closed for areas.
    fn feature_path(&self, feature: &Feature) -> Option<Path> {
        let mut pb = PathBuilder::new();
        let mut points = feature.geom.points.iter();
        let first = points.next()?;
        let (x, y) = self.px(*first);
        pb.move_to(x, y);
        for p in points {
            let (x, y) = self.px(*p);
            pb.line_to(x, y);
        }
        if feature.geom.prim == Prim::Area {
            pb.close();
        }
        pb.finish()
    }

    fn paint(colour: Rgba) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(colour.r, colour.g, colour.b, colour.a);
        paint.anti_alias = true;
        paint
    }

    fn stroke_for(&self, width: f32, dash: Option<&[f32]>) -> Stroke {
        let px = (width as f64 * self.unit()).max(0.5) as f32;
        let dash = dash.and_then(|d| {
            let scaled: Vec<f32> = d.iter().map(|v| (*v as f64 * self.unit()).max(1.0) as f32).collect();
            StrokeDash::new(scaled, 0.0)
        });
        Stroke {
            width: px,
            dash,
            ..Stroke::default()
        }
    }

    fn fill(&mut self, path: &Path, colour: Rgba) {
        self.pixmap.fill_path(
            path,
            &Self::paint(colour),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    fn stroke(&mut self, path: &Path, colour: Rgba, stroke: &Stroke) {
        self.pixmap
            .stroke_path(path, &Self::paint(colour), stroke, Transform::identity(), None);
    }

    /// Anchor pixel of a symbol or label: feature centre shifted by the
    /// delta offset, corrected for the anchor handle.
    fn anchor(&self, feature: &Feature, delta: Option<Delta>, w: f64, h: f64) -> (f32, f32) {
        let (mut x, mut y) = self.px(feature.geom.centre);
        let d = delta.unwrap_or_default();
        x += (d.dx * self.unit()) as f32;
        y += (d.dy * self.unit()) as f32;
        let (hx, hy) = match d.handle {
            Handle::CC => (0.0, 0.0),
            Handle::TC => (0.0, h / 2.0),
            Handle::BC => (0.0, -h / 2.0),
            Handle::LC => (w / 2.0, 0.0),
            Handle::RC => (-w / 2.0, 0.0),
            Handle::TL => (w / 2.0, h / 2.0),
            Handle::TR => (-w / 2.0, h / 2.0),
            Handle::BL => (w / 2.0, -h / 2.0),
            Handle::BR => (-w / 2.0, -h / 2.0),
        };
        (x + hx as f32, y + hy as f32)
    }

    /// Simplified glyph: the symbol family picks the outline shape, the
    /// scheme picks the body colour.
    fn draw_glyph(&mut self, symbol: SymbolId, scheme: &Scheme, cx: f32, cy: f32, size: f32) {
        let body = match scheme.body() {
            Rgba::TRANSPARENT => super::canvas::palette::MSYMB,
            c => c,
        };
        let half = size / 2.0;
        let path = match glyph_shape(symbol) {
            GlyphShape::Disc => PathBuilder::from_circle(cx, cy, half),
            GlyphShape::Triangle => {
                let mut pb = PathBuilder::new();
                pb.move_to(cx, cy - half);
                pb.line_to(cx + half, cy + half);
                pb.line_to(cx - half, cy + half);
                pb.close();
                pb.finish()
            }
            GlyphShape::Square => {
                Rect::from_xywh(cx - half, cy - half, size, size).map(PathBuilder::from_rect)
            }
            GlyphShape::Diamond => {
                let mut pb = PathBuilder::new();
                pb.move_to(cx, cy - half);
                pb.line_to(cx + half, cy);
                pb.line_to(cx, cy + half);
                pb.line_to(cx - half, cy);
                pb.close();
                pb.finish()
            }
        };
        if let Some(path) = path {
            self.fill(&path, body);
            let outline = Stroke {
                width: 1.0,
                ..Stroke::default()
            };
            self.stroke(&path, Rgba::BLACK, &outline);
        }
    }
}

enum GlyphShape {
    Disc,
    Triangle,
    Square,
    Diamond,
}

fn glyph_shape(symbol: SymbolId) -> GlyphShape {
    use SymbolId::*;
    match symbol {
        BuoyShape(_) | SuperBuoy | LightFloat | LightMajor | LightMinor | Floodlight => {
            GlyphShape::Disc
        }
        BeaconShape(_) | WithyPort | WithyStarboard | PerchPort | PerchStarboard | Stake
        | LaneArrow | Seaplane => GlyphShape::Triangle,
        Topmark(_) | MooringTopmark | TopNorth | TopSouth | TopEast | TopWest | TopCan
        | TopCone | TopIsol | TopSphere | TopX | TopCross | Notice(_) | NoticeBoard => {
            GlyphShape::Square
        }
        Rock | RockCovers | RockAwash | Foul | WreckDangerous | WreckShowing
        | WreckNonDangerous => GlyphShape::Diamond,
        _ => GlyphShape::Disc,
    }
}

/// Radius conversion to nautical miles.
fn radius_nm(radius: f64, units: UniHlu) -> f64 {
    match units {
        UniHlu::Metres => radius / 1852.0,
        UniHlu::Feet => radius * 0.3048 / 1852.0,
        UniHlu::Kilometres => radius * 1000.0 / 1852.0,
        UniHlu::Hectometres => radius * 100.0 / 1852.0,
        UniHlu::StatuteMiles => radius * 1609.344 / 1852.0,
        UniHlu::NauticalMiles | UniHlu::Unknown => radius,
    }
}

impl ChartCanvas for PixmapCanvas {
    fn line_vector(&mut self, feature: &Feature, style: &LineStyle) {
        let Some(path) = self.feature_path(feature) else {
            return;
        };
        if let Some(fill) = style.fill {
            self.fill(&path, fill);
        }
        if let Some(line) = style.line {
            let stroke = self.stroke_for(style.width, style.dash.as_deref());
            self.stroke(&path, line, &stroke);
        }
    }

    fn line_symbols(
        &mut self,
        feature: &Feature,
        _chain: SymbolId,
        space: f64,
        _cap: Option<SymbolId>,
        _alternate: Option<SymbolId>,
        _ratio: u32,
        colour: Rgba,
    ) {
        // Simplified: the symbol chain renders as a dashed stroke with the
        // chain's spacing.
        let Some(path) = self.feature_path(feature) else {
            return;
        };
        let gap = space.max(1.0) as f32;
        let stroke = self.stroke_for(4.0, Some(&[gap, gap]));
        self.stroke(&path, colour, &stroke);
    }

    fn fill_pattern(&mut self, feature: &Feature, pattern: SymbolId) {
        let Some(path) = self.feature_path(feature) else {
            return;
        };
        // Simplified: translucent wash plus one pattern glyph at the
        // centroid.
        self.fill(&path, Rgba::argb(0x30808080));
        let (cx, cy) = self.px(feature.geom.centre);
        let size = (40.0 * self.unit()) as f32;
        self.draw_glyph(pattern, &Scheme::default(), cx, cy, size);
    }

    fn symbol(
        &mut self,
        feature: &Feature,
        symbol: SymbolId,
        scheme: &Scheme,
        delta: Option<Delta>,
        scale: f64,
    ) {
        let size = 60.0 * self.unit() * scale;
        let (cx, cy) = self.anchor(feature, delta, size, size);
        self.draw_glyph(symbol, scheme, cx, cy, size as f32);
    }

    fn cluster(&mut self, feature: &Feature, symbols: &[SymbolId]) {
        let size = 50.0 * self.unit();
        let step = 70.0 * self.unit();
        let width = step * symbols.len().saturating_sub(1) as f64;
        let (cx, cy) = self.px(feature.geom.centre);
        for (i, sym) in symbols.iter().enumerate() {
            let x = cx as f64 - width / 2.0 + i as f64 * step;
            self.draw_glyph(*sym, &Scheme::default(), x as f32, cy, size as f32);
        }
    }

    fn label_text(
        &mut self,
        feature: &Feature,
        text: &str,
        font: FontSpec,
        colour: Rgba,
        frame: Option<LabelFrame>,
        delta: Delta,
    ) {
        if text.is_empty() {
            return;
        }
        // Simplified: an anchored box sized to the text extent stands in
        // for glyph rendering.
        let h = font.size as f64 * self.unit();
        let w = h * 0.6 * text.chars().count() as f64;
        let (cx, cy) = self.anchor(feature, Some(delta), w, h);
        let Some(rect) = Rect::from_xywh(
            cx - (w / 2.0) as f32,
            cy - (h / 2.0) as f32,
            w.max(1.0) as f32,
            h.max(1.0) as f32,
        ) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        if let Some(frame) = frame {
            if let Some(bg) = frame.background {
                self.fill(&path, bg);
            }
            let stroke = Stroke {
                width: 1.0,
                ..Stroke::default()
            };
            self.stroke(&path, frame.colour, &stroke);
        }
        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };
        self.stroke(&path, colour, &stroke);
    }

    fn line_text(&mut self, feature: &Feature, text: &str, font: FontSpec, colour: Rgba, offset: f64) {
        if text.is_empty() || feature.geom.points.len() < 2 {
            return;
        }
        // Simplified: the along-path text renders as a box at the path
        // midpoint, shifted by the perpendicular offset.
        let h = font.size as f64 * self.unit();
        let w = h * 0.6 * text.chars().count() as f64;
        let (cx, cy) = self.px(feature.geom.centre);
        let cy = cy - (offset * self.unit()) as f32;
        if let Some(rect) = Rect::from_xywh(
            cx - (w / 2.0) as f32,
            cy - (h / 2.0) as f32,
            w.max(1.0) as f32,
            h.max(1.0) as f32,
        ) {
            let path = PathBuilder::from_rect(rect);
            let stroke = Stroke {
                width: 1.0,
                ..Stroke::default()
            };
            self.stroke(&path, colour, &stroke);
        }
    }

    fn line_circle(&mut self, feature: &Feature, style: &LineStyle, radius: f64, units: UniHlu) {
        let centre = feature.geom.centre;
        let r = radius_nm(radius, units)
            * geo::pixels_per_mile(centre.lat, self.zoom, self.tile_size, self.scale);
        if r <= 0.0 {
            return;
        }
        let (cx, cy) = self.px(centre);
        if let Some(path) = PathBuilder::from_circle(cx, cy, r as f32) {
            if let Some(fill) = style.fill {
                self.fill(&path, fill);
            }
            if let Some(line) = style.line {
                let stroke = self.stroke_for(style.width, style.dash.as_deref());
                self.stroke(&path, line, &stroke);
            }
        }
    }

    fn raster_pixel(&mut self, feature: &Feature, size: f64, colour: Rgba) {
        let px = (size * self.pixels_per_radian()).max(1.0) as f32;
        let (cx, cy) = self.px(feature.geom.centre);
        if let Some(rect) = Rect::from_xywh(cx - px / 2.0, cy - px / 2.0, px, px) {
            let path = PathBuilder::from_rect(rect);
            self.fill(&path, colour);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{Feature, Geometry, Obj, Reln};

    fn pos(lat_deg: f64, lon_deg: f64) -> Position {
        Position::new(lat_deg.to_radians(), lon_deg.to_radians())
    }

    #[test]
    fn test_blank_canvas_encodes() {
        let canvas = PixmapCanvas::new(12, 2048, 1362, 256, 1.0).unwrap();
        let png = canvas.encode_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_symbol_changes_encoded_bytes() {
        let blank = PixmapCanvas::new(15, 17000, 10000, 256, 1.0)
            .unwrap()
            .encode_png()
            .unwrap();

        let mut canvas = PixmapCanvas::new(15, 17000, 10000, 256, 1.0).unwrap();
        // Tile 15/17000/10000 covers lon ~ 6.7E, lat ~ 53.5N.
        let b = geo::tile_bounds(15, 17000, 10000, 256, 1.0);
        let lat = 2.0 * (((b.north + b.south) / 2.0).exp().atan()) - PI / 2.0;
        let lon = (b.west + b.east) / 2.0;
        let f = Feature::new(
            Obj::Boylat,
            Reln::Master,
            Geometry::point(Position::new(lat, lon)),
        );
        canvas.symbol(
            &f,
            SymbolId::BuoyShape(crate::feature::BoyShp::Can),
            &Scheme::plain(Rgba::rgb(0xd40000)),
            None,
            1.0,
        );
        let drawn = canvas.encode_png().unwrap();
        assert!(drawn.len() > blank.len());
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let mut pngs = Vec::new();
        for _ in 0..2 {
            let mut canvas = PixmapCanvas::new(14, 8500, 5000, 256, 1.0).unwrap();
            let b = geo::tile_bounds(14, 8500, 5000, 256, 1.0);
            let lat = 2.0 * (((b.north + b.south) / 2.0).exp().atan()) - PI / 2.0;
            let f = Feature::new(
                Obj::Lndare,
                Reln::Master,
                Geometry::area(vec![
                    Position::new(lat, b.west),
                    Position::new(lat, (b.west + b.east) / 2.0),
                    Position::new(lat - 0.0001, (b.west + b.east) / 2.0),
                ]),
            );
            canvas.line_vector(
                &f,
                &LineStyle::stroke(Rgba::BLACK, 4.0).filled(super::super::canvas::palette::YLAND),
            );
            pngs.push(canvas.encode_png().unwrap());
        }
        assert_eq!(pngs[0], pngs[1]);
    }

    #[test]
    fn test_radius_units() {
        assert!((radius_nm(1852.0, UniHlu::Metres) - 1.0).abs() < 1e-9);
        assert!((radius_nm(2.0, UniHlu::NauticalMiles) - 2.0).abs() < 1e-9);
        assert!((radius_nm(1.0, UniHlu::Unknown) - 1.0).abs() < 1e-9);
    }
}
