//! Static lookup tables shared by the rule handlers.

use crate::feature::{BnkWtw, BoyShp, ColPat, Colour, MarSys, NatQua, NatSur};
use crate::render::{palette, Delta, Handle, PatternCode, Rgba, Scheme};

/// Paint colour of a body colour token.
pub fn body_colour(colour: Colour) -> Rgba {
    match colour {
        Colour::Unknown => Rgba::TRANSPARENT,
        Colour::White => Rgba::WHITE,
        Colour::Black => Rgba::BLACK,
        Colour::Red => Rgba::rgb(0xd40000),
        Colour::Green => Rgba::rgb(0x00d400),
        Colour::Blue => Rgba::BLUE,
        Colour::Yellow => Rgba::rgb(0xffd400),
        Colour::Grey => Rgba::GRAY,
        Colour::Brown => Rgba::rgb(0x8b4513),
        Colour::Amber => Rgba::rgb(0xfbf00f),
        Colour::Violet => Rgba::rgb(0xee82ee),
        Colour::Orange => Rgba::ORANGE,
        Colour::Magenta => Rgba::rgb(0xf000f0),
        Colour::Pink => Rgba::PINK,
    }
}

/// Chart letter abbreviation of a colour token.
pub fn colour_letter(colour: Colour) -> &'static str {
    match colour {
        Colour::Unknown => "",
        Colour::White => "W",
        Colour::Black => "B",
        Colour::Red => "R",
        Colour::Green => "G",
        Colour::Blue => "Bu",
        Colour::Yellow => "Y",
        Colour::Grey => "Gr",
        Colour::Brown => "Bn",
        Colour::Amber => "Am",
        Colour::Violet => "Vi",
        Colour::Orange => "Or",
        Colour::Magenta => "Mg",
        Colour::Pink => "Pk",
    }
}

/// Fill pattern of a colour pattern token. Stripes render as horizontal
/// bands.
pub fn pattern_code(pattern: ColPat) -> PatternCode {
    match pattern {
        ColPat::Unknown => PatternCode::Plain,
        ColPat::Horizontal | ColPat::Stripes => PatternCode::Horizontal,
        ColPat::Vertical => PatternCode::Vertical,
        ColPat::Diagonal => PatternCode::Diagonal,
        ColPat::Border => PatternCode::Border,
        ColPat::Squared => PatternCode::Squares,
        ColPat::Cross => PatternCode::Cross,
        ColPat::Saltire => PatternCode::Saltire,
    }
}

/// Depth tint ramp. `None` for drying heights (zero and above the
/// chart datum); deeper water fades towards white.
pub fn depth_colour(depth: f64) -> Option<Rgba> {
    if depth <= 0.0 {
        None
    } else if depth <= 2.0 {
        Some(Rgba::rgb(0x2090ff))
    } else if depth <= 5.0 {
        Some(Rgba::rgb(0x40a0ff))
    } else if depth <= 10.0 {
        Some(Rgba::rgb(0x60b0ff))
    } else if depth <= 15.0 {
        Some(Rgba::rgb(0x80c0ff))
    } else if depth <= 20.0 {
        Some(Rgba::rgb(0xa0d0ff))
    } else if depth <= 50.0 {
        Some(Rgba::rgb(0xc0e0ff))
    } else {
        Some(Rgba::rgb(0xe0f0ff))
    }
}

/// Topmark offset above a beacon body.
pub const BEACON_TOPMARK_DELTA: Delta = Delta::shift(Handle::BC, 0.0, -70.0);
/// Topmark offset above a light float body.
pub const FLOAT_TOPMARK_DELTA: Delta = Delta::shift(Handle::BC, 0.0, -42.0);
/// Topmark offset above a minor light symbol.
pub const LIGHT_TOPMARK_DELTA: Delta = Delta::shift(Handle::BC, 0.0, -20.0);

/// Topmark offset above a buoy body, which varies with the hull shape.
pub fn buoy_topmark_delta(shape: BoyShp) -> Delta {
    let dy = match shape {
        BoyShp::Conical => -31.0,
        BoyShp::Can => -33.0,
        BoyShp::Spherical => -30.0,
        BoyShp::Barrel => -32.0,
        BoyShp::Pillar => -60.0,
        BoyShp::Spar => -70.0,
        BoyShp::Super | BoyShp::Ice | BoyShp::Unknown => -25.0,
    };
    Delta::shift(Handle::BC, 0.0, dy)
}

/// Seabed quality prefix abbreviation.
pub fn quality_abbrev(quality: NatQua) -> &'static str {
    match quality {
        NatQua::Fine => "f",
        NatQua::Medium => "m",
        NatQua::Coarse => "c",
        NatQua::Broken => "bk",
        NatQua::Sticky => "sy",
        NatQua::Soft => "so",
        NatQua::Stiff => "sf",
        NatQua::Volcanic => "v",
        NatQua::Calcareous => "ca",
        NatQua::Hard => "h",
        NatQua::Unknown => "",
    }
}

/// Seabed material abbreviation; `None` for an unknown material.
pub fn material_abbrev(material: NatSur) -> Option<&'static str> {
    match material {
        NatSur::Mud => Some("M"),
        NatSur::Clay => Some("Cy"),
        NatSur::Silt => Some("Si"),
        NatSur::Sand => Some("S"),
        NatSur::Stone => Some("St"),
        NatSur::Gravel => Some("G"),
        NatSur::Pebbles => Some("P"),
        NatSur::Cobbles => Some("Cb"),
        NatSur::Rock => Some("R"),
        NatSur::Lava => Some("Lv"),
        NatSur::Coral => Some("Co"),
        NatSur::Shells => Some("Sh"),
        NatSur::Boulders => Some("Bo"),
        NatSur::Unknown => None,
    }
}

/// Board colours of an inland notice mark: white board, bank-coloured
/// border under CEVN, black border elsewhere.
pub fn notice_scheme(sys: MarSys, bank: BnkWtw) -> Scheme {
    let border = match (sys, bank) {
        (MarSys::Cevn, BnkWtw::Left) => Rgba::rgb(0xd40000),
        (MarSys::Cevn, BnkWtw::Right) => Rgba::rgb(0x00d400),
        (MarSys::Cevn, BnkWtw::Unknown) => palette::MSYMB,
        _ => Rgba::BLACK,
    };
    Scheme::new(Vec::new(), vec![Rgba::WHITE, border])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_ramp_boundaries() {
        assert_eq!(depth_colour(0.0), None);
        assert_eq!(depth_colour(1.9), Some(Rgba::rgb(0x2090ff)));
        assert_eq!(depth_colour(2.0), Some(Rgba::rgb(0x2090ff)));
        assert_eq!(depth_colour(2.1), Some(Rgba::rgb(0x40a0ff)));
        assert_eq!(depth_colour(50.0), Some(Rgba::rgb(0xc0e0ff)));
        assert_eq!(depth_colour(50.1), Some(Rgba::rgb(0xe0f0ff)));
    }

    #[test]
    fn test_unknown_colour_is_transparent() {
        assert_eq!(body_colour(Colour::Unknown), Rgba::TRANSPARENT);
        assert_eq!(colour_letter(Colour::Unknown), "");
    }

    #[test]
    fn test_spar_buoys_carry_topmarks_higher_than_cans() {
        let spar = buoy_topmark_delta(BoyShp::Spar);
        let can = buoy_topmark_delta(BoyShp::Can);
        assert!(spar.dy < can.dy);
    }
}
