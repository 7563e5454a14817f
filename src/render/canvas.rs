//! The canvas / symbol-library collaborator seam.
//!
//! The rule engine never paints pixels itself: it emits draw calls through
//! [`ChartCanvas`]. The built-in [`super::PixmapCanvas`] rasterises them
//! with simplified glyph geometry; a full chart symbol set (artwork,
//! fonts, swatches) plugs in by implementing this trait instead.

use crate::feature::{BcnShp, BoyShp, CatLmk, CatNmk, CatScf, FncFnc, TopShp, UniHlu};

/// A straight RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque colour from a `0xRRGGBB` word.
    pub const fn rgb(word: u32) -> Self {
        Self {
            r: (word >> 16) as u8,
            g: (word >> 8) as u8,
            b: word as u8,
            a: 0xff,
        }
    }

    /// Colour with alpha from a `0xAARRGGBB` word.
    pub const fn argb(word: u32) -> Self {
        Self {
            r: (word >> 16) as u8,
            g: (word >> 8) as u8,
            b: word as u8,
            a: (word >> 24) as u8,
        }
    }

    pub const TRANSPARENT: Rgba = Rgba::argb(0x00000000);
    pub const BLACK: Rgba = Rgba::rgb(0x000000);
    pub const WHITE: Rgba = Rgba::rgb(0xffffff);
    pub const GRAY: Rgba = Rgba::rgb(0x808080);
    pub const BLUE: Rgba = Rgba::rgb(0x0000ff);
    pub const ORANGE: Rgba = Rgba::rgb(0xffc800);
    pub const PINK: Rgba = Rgba::rgb(0xffafaf);
}

/// Chart palette shared by the rule tables.
pub mod palette {
    use super::Rgba;

    /// Magenta line work (restricted limits, anchorage borders).
    pub const MLINE: Rgba = Rgba::rgb(0xc480ff);
    /// Magenta symbol ink.
    pub const MSYMB: Rgba = Rgba::rgb(0xa30075);
    /// Land tint.
    pub const YLAND: Rgba = Rgba::rgb(0xedbc64);
    /// Inland water tint.
    pub const BWATER: Rgba = Rgba::rgb(0x78acd2);
    /// Drying area tint.
    pub const GDRIES: Rgba = Rgba::rgb(0x689868);
    /// Traffic separation tint (translucent magenta).
    pub const MTSS: Rgba = Rgba::argb(0x40c000c0);
}

/// Stroke/fill styling for feature line work.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineStyle {
    pub line: Option<Rgba>,
    pub width: f32,
    pub dash: Option<Vec<f32>>,
    pub fill: Option<Rgba>,
}

impl LineStyle {
    pub fn stroke(colour: Rgba, width: f32) -> Self {
        Self {
            line: Some(colour),
            width,
            ..Default::default()
        }
    }

    pub fn fill_only(colour: Rgba) -> Self {
        Self {
            fill: Some(colour),
            ..Default::default()
        }
    }

    pub fn dashed(mut self, pattern: &[f32]) -> Self {
        self.dash = Some(pattern.to_vec());
        self
    }

    pub fn filled(mut self, colour: Rgba) -> Self {
        self.fill = Some(colour);
        self
    }
}

/// Anchor handle of a symbol or label relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    CC,
    TC,
    BC,
    LC,
    RC,
    TL,
    TR,
    BL,
    BR,
}

/// Placement delta for a symbol or label: anchor handle plus an offset
/// (symbol units) and rotation (degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    pub handle: Handle,
    pub dx: f64,
    pub dy: f64,
    pub rotate: f64,
}

impl Delta {
    pub const fn at(handle: Handle) -> Self {
        Self {
            handle,
            dx: 0.0,
            dy: 0.0,
            rotate: 0.0,
        }
    }

    pub const fn shift(handle: Handle, dx: f64, dy: f64) -> Self {
        Self {
            handle,
            dx,
            dy,
            rotate: 0.0,
        }
    }

    pub const fn rotated(handle: Handle, degrees: f64) -> Self {
        Self {
            handle,
            dx: 0.0,
            dy: 0.0,
            rotate: degrees,
        }
    }
}

impl Default for Delta {
    fn default() -> Self {
        Delta::at(Handle::CC)
    }
}

/// Label font request (family is the symbol library's choice).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub style: FontStyle,
    pub size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Plain,
    Bold,
    Italic,
}

impl FontSpec {
    pub const fn plain(size: f32) -> Self {
        Self {
            style: FontStyle::Plain,
            size,
        }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            style: FontStyle::Bold,
            size,
        }
    }

    pub const fn italic(size: f32) -> Self {
        Self {
            style: FontStyle::Italic,
            size,
        }
    }
}

/// Decorative frame drawn around a label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelFrame {
    pub kind: FrameKind,
    pub colour: Rgba,
    pub background: Option<Rgba>,
}

/// Frame shapes for clearance and berth labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Vertical clearance bracket.
    VerticalClearance,
    /// Horizontal clearance bracket.
    HorizontalClearance,
    /// Overhead (power) clearance bracket.
    OverheadClearance,
    /// Rounded rectangle box.
    RoundedRect,
}

/// Fill pattern code derived from COLPAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternCode {
    Plain,
    Horizontal,
    Vertical,
    Diagonal,
    Border,
    Squares,
    Cross,
    Saltire,
}

/// Colour scheme applied to a symbol: parallel pattern and colour lists
/// (a red/white vertically striped buoy carries two colours and one
/// pattern code).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scheme {
    pub patterns: Vec<PatternCode>,
    pub colours: Vec<Rgba>,
}

impl Scheme {
    /// Single plain colour.
    pub fn plain(colour: Rgba) -> Self {
        Self {
            patterns: Vec::new(),
            colours: vec![colour],
        }
    }

    pub fn new(patterns: Vec<PatternCode>, colours: Vec<Rgba>) -> Self {
        Self { patterns, colours }
    }

    /// The primary body colour, transparent when unset.
    pub fn body(&self) -> Rgba {
        self.colours.first().copied().unwrap_or(Rgba::TRANSPARENT)
    }
}

/// Identifier of a registered symbol in the glyph library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolId {
    // Area ornaments and line chains
    LimitDash,
    LimitCc,
    Restricted,
    NoWake,
    Sandwaves,
    KelpArea,
    KelpSymbol,
    Spring,
    Seaplane,
    SeaplaneLine,
    WindFarm,
    MarineFarm,
    Cable,
    CableDash,
    CableDot,
    CableFlash,
    Pipeline,
    Rock,
    RockCovers,
    RockAwash,
    Foul,
    Dash,
    FoulLine,
    AnchorLine,
    LaneArrow,
    WreckDangerous,
    WreckShowing,
    WreckNonDangerous,
    // Beacons and lights
    Floodlight,
    WithyPort,
    WithyStarboard,
    PerchPort,
    PerchStarboard,
    Stake,
    LightMajor,
    LightMinor,
    RadarStation,
    RadarReflector,
    // Harbour symbols
    Anchor,
    Anchorage,
    Explosives,
    Hospital,
    Marina,
    MarinaNoFacilities,
    Fishing,
    Harbour,
    DistanceInstalled,
    DistanceUninstalled,
    CallPointTwoWay,
    CallPointOneWay,
    Bollard,
    Dolphin,
    DeviationDolphin,
    TideGauge,
    SignalStation,
    Rescue,
    Pilot,
    Post,
    PortCrane,
    ContainerCrane,
    // Landmarks
    ChurchTower,
    RadioTv,
    WaterTower,
    Platform,
    StorageVessel,
    // Floating bodies
    BuoyShape(BoyShp),
    SuperBuoy,
    LightFloat,
    BeaconShape(BcnShp),
    // Topmarks and daymarks
    Topmark(TopShp),
    MooringTopmark,
    TopNorth,
    TopSouth,
    TopEast,
    TopWest,
    TopCan,
    TopCone,
    TopIsol,
    TopSphere,
    TopX,
    TopCross,
    // Landmark shape/function glyphs
    Landmark(CatLmk),
    LandmarkFn(FncFnc),
    Facility(CatScf),
    // Notice marks, keyed by board category so the artwork library can
    // pick the right board glyph
    Notice(CatNmk),
    NoticeBoard,
}

/// The drawing surface the rule engine paints onto.
///
/// All geometry arguments are features; implementations project feature
/// coordinates themselves so the rules stay projection-free. Offsets and
/// sizes in [`Delta`], [`FontSpec`] and `space` arguments are in symbol
/// units, scaled by the implementation's zoom-dependent symbol factor.
pub trait ChartCanvas {
    /// Strokes (and optionally fills) the feature's path.
    fn line_vector(&mut self, feature: &crate::feature::Feature, style: &LineStyle);

    /// Repeats a symbol chain along the feature's path: `chain` every
    /// `space` path units, interleaving one `cap` symbol per `ratio`
    /// chain symbols, with an optional `alternate` replacing every other
    /// cap.
    #[allow(clippy::too_many_arguments)]
    fn line_symbols(
        &mut self,
        feature: &crate::feature::Feature,
        chain: SymbolId,
        space: f64,
        cap: Option<SymbolId>,
        alternate: Option<SymbolId>,
        ratio: u32,
        colour: Rgba,
    );

    /// Fills the feature's area with a repeating pattern symbol.
    fn fill_pattern(&mut self, feature: &crate::feature::Feature, pattern: SymbolId);

    /// Draws a registered symbol at the feature position.
    fn symbol(
        &mut self,
        feature: &crate::feature::Feature,
        symbol: SymbolId,
        scheme: &Scheme,
        delta: Option<Delta>,
        scale: f64,
    );

    /// Draws a row of symbols clustered around the feature position.
    fn cluster(&mut self, feature: &crate::feature::Feature, symbols: &[SymbolId]);

    /// Draws an anchored text label.
    fn label_text(
        &mut self,
        feature: &crate::feature::Feature,
        text: &str,
        font: FontSpec,
        colour: Rgba,
        frame: Option<LabelFrame>,
        delta: Delta,
    );

    /// Draws text following the feature's path at a perpendicular offset.
    fn line_text(
        &mut self,
        feature: &crate::feature::Feature,
        text: &str,
        font: FontSpec,
        colour: Rgba,
        offset: f64,
    );

    /// Strokes a circle of a real-world radius around the feature.
    fn line_circle(
        &mut self,
        feature: &crate::feature::Feature,
        style: &LineStyle,
        radius: f64,
        units: UniHlu,
    );

    /// Paints a single raster cell of the given angular size (radians).
    fn raster_pixel(&mut self, feature: &crate::feature::Feature, size: f64, colour: Rgba);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_word_unpacking() {
        let c = Rgba::rgb(0xd40000);
        assert_eq!((c.r, c.g, c.b, c.a), (0xd4, 0, 0, 0xff));
        let t = Rgba::argb(0x20ffffff);
        assert_eq!(t.a, 0x20);
    }

    #[test]
    fn test_line_style_builders() {
        let s = LineStyle::stroke(Rgba::BLACK, 8.0)
            .dashed(&[25.0, 25.0])
            .filled(Rgba::argb(0x40ffffff));
        assert_eq!(s.line, Some(Rgba::BLACK));
        assert_eq!(s.dash.as_deref(), Some(&[25.0, 25.0][..]));
        assert!(s.fill.is_some());
    }

    #[test]
    fn test_scheme_body_colour() {
        assert_eq!(Scheme::plain(Rgba::BLUE).body(), Rgba::BLUE);
        assert_eq!(Scheme::default().body(), Rgba::TRANSPARENT);
    }
}
