//! Handlers for navigation marks: buoys, beacons, floating marks,
//! lights, point marks, virtual AIS aids, notice boards, wrecks and
//! obstructions.

use super::{tables, RulePass};
use crate::feature::{
    AddMrk, Att, AttMap, AttVal, AttrEnum, BcnShp, BnkWtw, BoyShp, CatLam, CatLit, CatNmk,
    CatObs, CatVan, CatWrk, Feature, MarSys, Obj, Prim, StsSts, TopShp, WatLev,
};
use crate::render::{palette, Delta, FontSpec, Handle, LineStyle, Rgba, Scheme, SymbolId};

/// First enumerated token of an attribute in a raw occurrence map.
fn enum_in<T: AttrEnum>(atts: &AttMap, att: Att) -> Option<T> {
    atts.get(&att)
        .and_then(AttVal::as_enums)
        .and_then(|vs| vs.first())
        .and_then(|&v| T::try_from(v).ok())
}

impl RulePass<'_> {
    pub(crate) fn buoys(&mut self, f: &Feature) {
        let visible = self.zoom >= 14
            || (self.zoom >= 12 && matches!(f.obj, Obj::Boylat | Obj::Boycar))
            || (self.zoom >= 11 && (f.obj == Obj::Boysaw || f.has_object(Obj::Rtpbcn)));
        if !visible {
            return;
        }

        let mut shape = f.attribute_enum::<BoyShp>(f.obj, Att::BoyShp);
        if shape == BoyShp::Unknown {
            shape = BoyShp::Pillar;
        }
        let scheme = self.scheme(f, f.obj);
        self.symbol_scheme(f, SymbolId::BuoyShape(shape), &scheme);
        self.draw_topmark(f, Some(tables::buoy_topmark_delta(shape)));
        self.add_name_at(
            f,
            15,
            FontSpec::bold(40.0),
            Rgba::BLACK,
            Delta::shift(Handle::BL, 60.0, -50.0),
        );
    }

    pub(crate) fn beacons(&mut self, f: &Feature) {
        let visible = self.zoom >= 14
            || (self.zoom >= 12 && matches!(f.obj, Obj::Bcnlat | Obj::Bcncar))
            || (self.zoom >= 11 && (f.obj == Obj::Bcnsaw || f.has_object(Obj::Rtpbcn)));
        if !visible {
            return;
        }

        if f.attribute_includes(f.obj, Att::Status, StsSts::Illuminated) {
            self.symbol(f, SymbolId::Floodlight);
        }
        let mut shape = f.attribute_enum::<BcnShp>(f.obj, Att::BcnShp);
        if shape == BcnShp::Unknown {
            shape = BcnShp::Pile;
        }

        if shape == BcnShp::Withy && f.obj == Obj::Bcnlat {
            match f.attribute_enum::<CatLam>(f.obj, Att::CatLam) {
                CatLam::Port => self.symbol(f, SymbolId::WithyPort),
                CatLam::Starboard => self.symbol(f, SymbolId::WithyStarboard),
                _ => {
                    let scheme = self.scheme(f, f.obj);
                    self.symbol_scheme(f, SymbolId::Stake, &scheme);
                }
            }
        } else if shape == BcnShp::Perch && f.obj == Obj::Bcnlat && !f.has_object(Obj::Topmar) {
            match f.attribute_enum::<CatLam>(f.obj, Att::CatLam) {
                CatLam::Port => self.symbol(f, SymbolId::PerchPort),
                CatLam::Starboard => self.symbol(f, SymbolId::PerchStarboard),
                _ => {
                    let scheme = self.scheme(f, f.obj);
                    self.symbol_scheme(f, SymbolId::Stake, &scheme);
                }
            }
        } else {
            let scheme = self.scheme(f, f.obj);
            self.symbol_scheme(f, SymbolId::BeaconShape(shape), &scheme);
            if f.has_object(Obj::Topmar)
                && f.attribute_includes(Obj::Topmar, Att::Status, StsSts::Illuminated)
            {
                self.symbol(f, SymbolId::Floodlight);
            }
            self.draw_topmark(f, Some(tables::BEACON_TOPMARK_DELTA));
        }

        if f.has_object(Obj::Notmrk) {
            self.notices(f);
        }
        self.add_name_at(
            f,
            15,
            FontSpec::bold(40.0),
            Rgba::BLACK,
            Delta::shift(Handle::BL, 60.0, -50.0),
        );
    }

    pub(crate) fn floats(&mut self, f: &Feature) {
        let visible = self.zoom >= 12
            || (self.zoom >= 11
                && (matches!(f.obj, Obj::Litves | Obj::Boyinb) || f.has_object(Obj::Rtpbcn)));
        if !visible {
            return;
        }

        let scheme = self.scheme(f, f.obj);
        match f.obj {
            Obj::Litves | Obj::Boyinb => self.symbol_scheme(f, SymbolId::SuperBuoy, &scheme),
            Obj::Litflt => self.symbol_scheme(f, SymbolId::LightFloat, &scheme),
            _ => {}
        }
        self.draw_topmark(f, Some(tables::FLOAT_TOPMARK_DELTA));
        self.add_name_at(
            f,
            15,
            FontSpec::bold(40.0),
            Rgba::BLACK,
            Delta::shift(Handle::BL, 20.0, -50.0),
        );
    }

    pub(crate) fn lights(&mut self, f: &Feature) {
        let mut drawn = false;
        match f.obj {
            Obj::Litmaj | Obj::Lndmrk => {
                self.symbol(f, SymbolId::LightMajor);
                if self.zoom >= 12 {
                    drawn = true;
                }
            }
            Obj::Litmin | Obj::Lights | Obj::Pilpnt => {
                if self.zoom >= 14 {
                    if f.attribute_includes(Obj::Lights, Att::CatLit, CatLit::Floodlight) {
                        self.symbol_delta(
                            f,
                            SymbolId::Floodlight,
                            Delta::rotated(Handle::CC, 90.0),
                        );
                        self.symbol(f, SymbolId::SignalStation);
                    } else {
                        self.symbol(f, SymbolId::LightMinor);
                    }
                    drawn = true;
                }
            }
            _ => {}
        }
        if drawn {
            if f.has_object(Obj::Topmar)
                && f.attribute_includes(Obj::Topmar, Att::Status, StsSts::Illuminated)
            {
                self.symbol(f, SymbolId::Floodlight);
            }
            self.draw_topmark(f, Some(tables::LIGHT_TOPMARK_DELTA));
            self.add_name_at(
                f,
                15,
                FontSpec::bold(40.0),
                Rgba::BLACK,
                Delta::shift(Handle::BL, 0.0, -50.0),
            );
        }
    }

    pub(crate) fn points(&mut self, f: &Feature) {
        let mut drawn = false;
        if f.obj == Obj::Fogsig {
            if self.zoom >= 12 {
                if f.has_object(Obj::Lights) {
                    self.lights(f);
                } else {
                    self.symbol(f, SymbolId::Post);
                }
                drawn = true;
            }
        } else if self.zoom >= 14 {
            if f.attribute_includes(f.obj, Att::Status, StsSts::Illuminated) {
                self.symbol(f, SymbolId::Floodlight);
            }
            if f.has_object(Obj::Lights) {
                self.lights(f);
            } else {
                self.symbol(f, SymbolId::Post);
            }
            drawn = true;
        }
        if drawn {
            self.draw_topmark(f, None);
        }
    }

    pub(crate) fn virtual_aids(&mut self, f: &Feature) {
        if self.zoom >= 12 {
            let magenta = Scheme::plain(palette::MSYMB);
            self.symbol_scheme(f, SymbolId::SignalStation, &magenta);
            self.symbol_scheme(f, SymbolId::RadarStation, &magenta);
            let top_delta = Delta::shift(Handle::BC, 0.0, -25.0);
            for van in f.attribute_list::<CatVan>(f.obj, Att::CatVan) {
                let top = match van {
                    CatVan::NorthCardinal => Some(SymbolId::TopNorth),
                    CatVan::SouthCardinal => Some(SymbolId::TopSouth),
                    CatVan::EastCardinal => Some(SymbolId::TopEast),
                    CatVan::WestCardinal => Some(SymbolId::TopWest),
                    CatVan::PortLateral | CatVan::PreferredStarboard => Some(SymbolId::TopCan),
                    CatVan::StarboardLateral | CatVan::PreferredPort => Some(SymbolId::TopCone),
                    CatVan::IsolatedDanger => Some(SymbolId::TopIsol),
                    CatVan::SafeWater => Some(SymbolId::TopSphere),
                    CatVan::SpecialPurpose => Some(SymbolId::TopX),
                    CatVan::Wreck => Some(SymbolId::TopCross),
                    CatVan::Unknown => None,
                };
                if let Some(top) = top {
                    self.symbol_at(f, top, &magenta, top_delta);
                }
            }
        }
        self.add_name_at(
            f,
            15,
            FontSpec::bold(40.0),
            Rgba::BLACK,
            Delta::shift(Handle::BL, 50.0, 0.0),
        );
        if self.zoom >= 15 {
            self.label(
                f,
                "V-AIS",
                FontSpec::plain(40.0),
                palette::MSYMB,
                Delta::shift(Handle::BC, 0.0, 70.0),
            );
        }
    }

    /// Inland notice marks: up to five boards laid out around the mark,
    /// more collapse into a single generic notice symbol.
    pub(crate) fn notices(&mut self, f: &Feature) {
        if self.zoom < 14 {
            return;
        }
        let dy = match f.obj {
            Obj::Bcncar | Obj::Bcnisd | Obj::Bcnlat | Obj::Bcnsaw | Obj::Bcnspp => {
                if f.attribute_equals(Obj::Topmar, Att::TopShp, &AttVal::one(TopShp::Board))
                    || f.attribute_equals(Obj::Daymar, Att::TopShp, &AttVal::one(TopShp::Board))
                {
                    -100.0
                } else {
                    -45.0
                }
            }
            Obj::Notmrk => 0.0,
            _ => return,
        };

        let mut sys = MarSys::Cevn;
        let mut bank = BnkWtw::Unknown;
        if let Some(v) = f.atts.get(&Att::MarSys).and_then(AttVal::as_enums) {
            if let Some(&first) = v.first() {
                sys = MarSys::try_from(first).unwrap_or(sys);
            }
        }
        if let Some(v) = f.atts.get(&Att::BnkWtw).and_then(AttVal::as_enums) {
            if let Some(&first) = v.first() {
                bank = BnkWtw::try_from(first).unwrap_or(bank);
            }
        }

        let Some(boards) = f.objs.get(&Obj::Notmrk) else {
            return;
        };
        let n = boards.len();
        if n > 5 {
            self.symbol_delta(
                f,
                SymbolId::Notice(CatNmk::Unknown),
                Delta::shift(Handle::CC, 0.0, dy),
            );
            return;
        }

        for (i, atts) in boards.values().enumerate() {
            if let Some(s) = enum_in::<MarSys>(atts, Att::MarSys) {
                sys = s;
            }
            if let Some(b) = enum_in::<BnkWtw>(atts, Att::BnkWtw) {
                bank = b;
            }
            let scheme = tables::notice_scheme(sys, bank);
            let additions = atts
                .get(&Att::AddMrk)
                .and_then(AttVal::as_enums)
                .map(|vs| {
                    vs.iter()
                        .filter_map(|&v| AddMrk::try_from(v).ok())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();

            let mut ax = 0.0;
            let mut ay = 0.0;
            let handle = match i {
                0 => (n == 1).then_some(Handle::CC),
                1 => {
                    if n <= 3 {
                        ax = -30.0;
                        ay = dy;
                        Some(Handle::RC)
                    } else {
                        Some(Handle::BR)
                    }
                }
                2 => Some(if n <= 3 { Handle::LC } else { Handle::BL }),
                3 => Some(if n == 4 { Handle::TC } else { Handle::TR }),
                _ => Some(Handle::TL),
            };
            if let Some(handle) = handle {
                let cat = enum_in::<CatNmk>(atts, Att::CatNmk).unwrap_or(CatNmk::Unknown);
                self.symbol_at(f, SymbolId::Notice(cat), &scheme, Delta::shift(handle, 0.0, dy));
                if !additions.is_empty() {
                    self.symbol_delta(
                        f,
                        SymbolId::NoticeBoard,
                        Delta::shift(Handle::BC, ax, ay - 30.0),
                    );
                }
            }
        }
    }

    pub(crate) fn wrecks(&mut self, f: &Feature) {
        if self.zoom >= 14 {
            let sym = match f.attribute_enum::<CatWrk>(f.obj, Att::CatWrk) {
                CatWrk::Dangerous | CatWrk::MastsShowing => SymbolId::WreckDangerous,
                CatWrk::HullShowing => SymbolId::WreckShowing,
                _ => SymbolId::WreckNonDangerous,
            };
            self.symbol(f, sym);
            self.add_name_at(
                f,
                15,
                FontSpec::bold(40.0),
                Rgba::BLACK,
                Delta::shift(Handle::BC, 0.0, -60.0),
            );
        }
    }

    pub(crate) fn obstructions(&mut self, f: &Feature) {
        if self.zoom >= 12 && f.obj == Obj::Obstrn {
            let cat = f.attribute_enum::<CatObs>(f.obj, Att::CatObs);
            if cat == CatObs::Boom {
                self.canvas
                    .line_vector(f, &LineStyle::stroke(Rgba::BLACK, 5.0).dashed(&[20.0, 20.0]));
                if self.zoom >= 15 {
                    self.canvas
                        .line_text(f, "Boom", FontSpec::plain(40.0), Rgba::BLACK, -20.0);
                }
            }
            if cat == CatObs::FoulGround {
                self.symbol_scheme(f, SymbolId::Foul, &Scheme::plain(Rgba::BLACK));
                if f.geom.prim == Prim::Area {
                    self.canvas.line_symbols(
                        f,
                        SymbolId::Dash,
                        1.0,
                        Some(SymbolId::FoulLine),
                        None,
                        10,
                        Rgba::BLACK,
                    );
                }
            }
        }
        if self.zoom >= 14 && f.obj == Obj::Uwtroc {
            let sym = match f.attribute_enum::<WatLev>(f.obj, Att::WatLev) {
                WatLev::CoversUncovers => SymbolId::RockCovers,
                WatLev::Awash => SymbolId::RockAwash,
                _ => SymbolId::Rock,
            };
            self.symbol(f, sym);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{run_pass, RuleSet};
    use super::*;
    use crate::feature::{ChartSnapshot, Colour, Geometry, Position, Reln};
    use crate::render::RecordingCanvas;

    fn point() -> Geometry {
        Geometry::point(Position::new(54.0f64.to_radians(), 10.0f64.to_radians()))
    }

    #[test]
    fn test_buoy_unknown_shape_defaults_to_pillar() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Boylat, Reln::Master, point())
            .attribute(Att::Colour, AttVal::list([Colour::Red]))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        assert!(canvas.contains_symbol(SymbolId::BuoyShape(BoyShp::Pillar)));
    }

    #[test]
    fn test_named_buoy_draws_one_symbol_and_one_label() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Boylat, Reln::Master, point())
            .attribute(Att::ObjNam, AttVal::Str("Kiel A".into()))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 15, RuleSet::All).unwrap();
        assert_eq!(canvas.symbols(), vec![SymbolId::BuoyShape(BoyShp::Pillar)]);
        assert_eq!(canvas.labels(), vec!["Kiel A"]);
    }

    #[test]
    fn test_buoy_without_topmark_draws_no_topmark() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Boylat, Reln::Master, point())]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        assert!(!canvas
            .symbols()
            .iter()
            .any(|s| matches!(s, SymbolId::Topmark(_))));
    }

    #[test]
    fn test_buoy_topmark_uses_shape_delta() {
        let mut top = AttMap::new();
        top.insert(Att::TopShp, AttVal::one(TopShp::Cone));
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Boylat, Reln::Master, point())
            .attribute(Att::BoyShp, AttVal::one(BoyShp::Spar))
            .sub_object(Obj::Topmar, top)]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();

        let delta = canvas.ops.iter().find_map(|op| match op {
            crate::render::DrawOp::Symbol {
                symbol: SymbolId::Topmark(TopShp::Cone),
                delta,
                ..
            } => *delta,
            _ => None,
        });
        assert_eq!(delta, Some(tables::buoy_topmark_delta(BoyShp::Spar)));
    }

    #[test]
    fn test_lateral_buoy_zoom_gate() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Boylat, Reln::Master, point())]);

        let mut z11 = RecordingCanvas::new();
        run_pass(&snap, &mut z11, 11, RuleSet::All).unwrap();
        assert!(z11.ops.is_empty());

        let mut z12 = RecordingCanvas::new();
        run_pass(&snap, &mut z12, 12, RuleSet::All).unwrap();
        assert!(z12.contains_symbol(SymbolId::BuoyShape(BoyShp::Pillar)));
    }

    #[test]
    fn test_safe_water_buoy_visible_from_zoom_11() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Boysaw, Reln::Master, point())]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 11, RuleSet::All).unwrap();
        assert!(canvas.contains_symbol(SymbolId::BuoyShape(BoyShp::Pillar)));
    }

    #[test]
    fn test_withy_port_beacon() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Bcnlat, Reln::Master, point())
            .attribute(Att::BcnShp, AttVal::one(BcnShp::Withy))
            .attribute(Att::CatLam, AttVal::one(CatLam::Port))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        assert!(canvas.contains_symbol(SymbolId::WithyPort));
    }

    #[test]
    fn test_beacon_unknown_shape_defaults_to_pile() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Bcnspp, Reln::Master, point())]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        assert!(canvas.contains_symbol(SymbolId::BeaconShape(BcnShp::Pile)));
    }

    #[test]
    fn test_illuminated_beacon_gets_floodlight() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Bcnisd, Reln::Master, point())
            .attribute(Att::Status, AttVal::list([StsSts::Illuminated]))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        assert!(canvas.contains_symbol(SymbolId::Floodlight));
    }

    #[test]
    fn test_dangerous_wreck_symbol() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Wrecks, Reln::Master, point())
            .attribute(Att::CatWrk, AttVal::one(CatWrk::Dangerous))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        assert!(canvas.contains_symbol(SymbolId::WreckDangerous));
    }

    #[test]
    fn test_virtual_aid_topmark_and_label() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Vaaton, Reln::Master, point())
            .attribute(Att::CatVan, AttVal::list([CatVan::WestCardinal]))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 15, RuleSet::All).unwrap();
        assert!(canvas.contains_symbol(SymbolId::TopWest));
        assert!(canvas.labels().contains(&"V-AIS"));
    }

    #[test]
    fn test_six_notices_collapse_to_generic_symbol() {
        let mut f = Feature::new(Obj::Notmrk, Reln::Master, point());
        for _ in 0..5 {
            f = f.sub_object(Obj::Notmrk, AttMap::new());
        }
        let snap = ChartSnapshot::new(vec![f]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        assert_eq!(
            canvas
                .symbols()
                .iter()
                .filter(|s| matches!(s, SymbolId::Notice(_)))
                .count(),
            1
        );
    }

    #[test]
    fn test_notice_symbol_carries_board_category() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Notmrk, Reln::Master, point())
            .attribute(Att::CatNmk, AttVal::one(CatNmk::NoEntry))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 15, RuleSet::All).unwrap();
        assert!(canvas.contains_symbol(SymbolId::Notice(CatNmk::NoEntry)));
        assert!(!canvas.contains_symbol(SymbolId::Notice(CatNmk::Stop)));
    }
}
