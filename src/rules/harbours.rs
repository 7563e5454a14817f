//! Handlers for harbour infrastructure, stations and landmarks.

use super::{format_decimal, tables, RulePass};
use crate::feature::{
    Att, AttVal, BoyShp, CatAch, CatCrn, CatDis, CatHaf, CatLmk, CatMor, CatOfp, CatPil, CatScf,
    CatSil, CatSit, CatSiw, FncFnc, Feature, Obj, Prim, StsSts, TrfTrf, UniHlu,
};
use crate::render::{
    palette, Delta, FontSpec, FrameKind, Handle, LabelFrame, LineStyle, Rgba, Scheme, SymbolId,
};

impl RulePass<'_> {
    pub(crate) fn harbours(&mut self, f: &Feature) {
        match f.obj {
            Obj::Achbrt => self.anchor_berth(f),
            Obj::Achare => self.anchorage(f),
            Obj::Berths => {
                if self.zoom >= 14 {
                    self.canvas.line_vector(
                        f,
                        &LineStyle::stroke(palette::MLINE, 6.0).dashed(&[20.0, 20.0]),
                    );
                    let name = f.name();
                    self.label_framed(
                        f,
                        name.as_deref().unwrap_or(" "),
                        FontSpec::plain(40.0),
                        palette::MSYMB,
                        LabelFrame {
                            kind: FrameKind::RoundedRect,
                            colour: palette::MLINE,
                            background: Some(Rgba::WHITE),
                        },
                        Delta::at(Handle::CC),
                    );
                }
            }
            Obj::Buisgl => self.building(f),
            Obj::Hrbfac => {
                if self.zoom >= 12 {
                    let cats = f.attribute_list::<CatHaf>(f.obj, Att::CatHaf);
                    let sym = if cats.len() == 1 {
                        match cats[0] {
                            CatHaf::Marina => SymbolId::Marina,
                            CatHaf::MarinaNoFacilities => SymbolId::MarinaNoFacilities,
                            CatHaf::Fishing => SymbolId::Fishing,
                            _ => SymbolId::Harbour,
                        }
                    } else {
                        SymbolId::Harbour
                    };
                    self.symbol(f, sym);
                    self.add_name_at(
                        f,
                        15,
                        FontSpec::bold(40.0),
                        Rgba::BLACK,
                        Delta::shift(Handle::CC, 0.0, -80.0),
                    );
                }
            }
            _ => {}
        }
    }

    fn anchor_berth(&mut self, f: &Feature) {
        if self.zoom >= 14 {
            self.symbol_scheme(f, SymbolId::Anchor, &Scheme::plain(palette::MSYMB));
            if self.zoom >= 15 {
                let name = f.name();
                self.label_framed(
                    f,
                    name.as_deref().unwrap_or(""),
                    FontSpec::plain(30.0),
                    palette::MSYMB,
                    LabelFrame {
                        kind: FrameKind::RoundedRect,
                        colour: palette::MSYMB,
                        background: Some(Rgba::WHITE),
                    },
                    Delta::at(Handle::BC),
                );
            }
        }
        if let Some(radius) = f.attribute_num(Obj::Achbrt, Att::Radius) {
            if radius != 0.0 {
                let mut units = f.attribute_enum::<UniHlu>(Obj::Achbrt, Att::Hunits);
                if units == UniHlu::Unknown {
                    units = UniHlu::Metres;
                }
                self.canvas.line_circle(
                    f,
                    &LineStyle::stroke(palette::MLINE, 4.0).dashed(&[10.0, 10.0]),
                    radius,
                    units,
                );
            }
        }
    }

    fn anchorage(&mut self, f: &Feature) {
        if self.zoom < 12 {
            return;
        }
        let cats = f.attribute_list::<CatAch>(Obj::Achare, Att::CatAch);
        if f.geom.prim != Prim::Area {
            self.symbol_scheme(f, SymbolId::Anchorage, &Scheme::plain(Rgba::BLACK));
        } else {
            if cats.contains(&CatAch::SmallCraftMooring) {
                self.symbol_scheme(
                    f,
                    SymbolId::BuoyShape(BoyShp::Spherical),
                    &Scheme::plain(palette::MSYMB),
                );
                self.symbol_delta(
                    f,
                    SymbolId::MooringTopmark,
                    tables::buoy_topmark_delta(BoyShp::Spherical),
                );
            } else {
                self.symbol_scheme(f, SymbolId::Anchorage, &Scheme::plain(palette::MLINE));
            }
            self.canvas.line_symbols(
                f,
                SymbolId::Restricted,
                1.0,
                Some(SymbolId::AnchorLine),
                None,
                10,
                palette::MLINE,
            );
        }
        self.add_name_at(
            f,
            15,
            FontSpec::bold(60.0),
            palette::MLINE,
            Delta::shift(Handle::LC, 70.0, 0.0),
        );
        if self.zoom >= 15
            && f.attribute_includes(Obj::Achare, Att::Status, StsSts::Reserved)
        {
            self.label(
                f,
                "Reserved",
                FontSpec::plain(50.0),
                palette::MLINE,
                Delta::shift(Handle::TC, 0.0, 60.0),
            );
        }

        let mut dy = (cats.len() as f64 - 1.0) * -30.0;
        for cat in cats {
            match cat {
                CatAch::DeepWater => {
                    self.label(
                        f,
                        "DW",
                        FontSpec::bold(50.0),
                        palette::MSYMB,
                        Delta::shift(Handle::RC, -60.0, dy),
                    );
                    dy += 60.0;
                }
                CatAch::Tanker => {
                    self.label(
                        f,
                        "Tanker",
                        FontSpec::bold(50.0),
                        palette::MSYMB,
                        Delta::shift(Handle::RC, -60.0, dy),
                    );
                    dy += 60.0;
                }
                CatAch::H24 => {
                    self.label(
                        f,
                        "24h",
                        FontSpec::bold(50.0),
                        palette::MSYMB,
                        Delta::shift(Handle::RC, -60.0, dy),
                    );
                    dy += 60.0;
                }
                CatAch::Explosives => {
                    self.symbol_at(
                        f,
                        SymbolId::Explosives,
                        &Scheme::plain(palette::MSYMB),
                        Delta::shift(Handle::RC, -60.0, dy),
                    );
                    dy += 60.0;
                }
                CatAch::Quarantine => {
                    self.symbol_at(
                        f,
                        SymbolId::Hospital,
                        &Scheme::plain(palette::MSYMB),
                        Delta::shift(Handle::RC, -60.0, dy),
                    );
                    dy += 60.0;
                }
                CatAch::Seaplane => {
                    self.symbol_at(
                        f,
                        SymbolId::Seaplane,
                        &Scheme::plain(palette::MSYMB),
                        Delta::shift(Handle::RC, -60.0, dy),
                    );
                    dy += 60.0;
                }
                CatAch::SmallCraft | CatAch::SmallCraftMooring => {
                    self.label(
                        f,
                        "Small",
                        FontSpec::plain(40.0),
                        palette::MSYMB,
                        Delta::shift(Handle::RC, -60.0, dy),
                    );
                    self.label(
                        f,
                        "Craft",
                        FontSpec::plain(40.0),
                        palette::MSYMB,
                        Delta::shift(Handle::LC, 60.0, dy),
                    );
                    dy += 60.0;
                }
                CatAch::Unknown => {}
            }
        }
    }

    /// A single building of navigational interest.
    fn building(&mut self, f: &Feature) {
        if self.zoom < 15 {
            return;
        }
        self.canvas
            .line_vector(f, &LineStyle::stroke(Rgba::BLACK, 8.0).filled(Rgba::argb(0xffc0c0c0)));
        if f.attribute_includes(Obj::Buisgl, Att::Functn, FncFnc::Lookout) {
            self.label(
                f,
                "Lookout",
                FontSpec::plain(40.0),
                Rgba::BLACK,
                Delta::shift(Handle::CC, 0.0, 50.0),
            );
            self.add_name_at(
                f,
                15,
                FontSpec::bold(40.0),
                Rgba::BLACK,
                Delta::shift(Handle::CC, 0.0, -50.0),
            );
        }
        if self.zoom >= 16 {
            if f.attribute_includes(Obj::Buisgl, Att::Status, StsSts::Illuminated) {
                self.symbol(f, SymbolId::Floodlight);
            }
            let mut symbols: Vec<SymbolId> = f
                .attribute_list::<FncFnc>(Obj::Buisgl, Att::Functn)
                .into_iter()
                .filter(|fnc| *fnc != FncFnc::Unknown)
                .map(SymbolId::LandmarkFn)
                .collect();
            if f.has_object(Obj::Smcfac) {
                symbols.extend(
                    f.attribute_list::<CatScf>(Obj::Smcfac, Att::CatScf)
                        .into_iter()
                        .filter(|scf| *scf != CatScf::Unknown)
                        .map(SymbolId::Facility),
                );
            }
            self.canvas.cluster(f, &symbols);
        }
    }

    pub(crate) fn distances(&mut self, f: &Feature) {
        if self.zoom < 14 {
            return;
        }
        if f.attribute_includes(Obj::Dismar, Att::CatDis, CatDis::NotInstalled) {
            self.symbol(f, SymbolId::DistanceUninstalled);
        } else {
            self.symbol(f, SymbolId::DistanceInstalled);
        }
        if self.zoom >= 15 {
            if let Some(dist) = f.attribute_num(Obj::Dismar, Att::WtwDis) {
                let prefix = match f.attribute_enum::<UniHlu>(Obj::Dismar, Att::Hunits) {
                    UniHlu::Metres => "m ",
                    UniHlu::Feet => "ft ",
                    UniHlu::Hectometres => "hm ",
                    UniHlu::Kilometres => "km ",
                    UniHlu::StatuteMiles => "M ",
                    UniHlu::NauticalMiles => "NM ",
                    UniHlu::Unknown => "",
                };
                let text = format!("{prefix}{dist:3.1}");
                self.label(
                    f,
                    &text,
                    FontSpec::plain(40.0),
                    Rgba::BLACK,
                    Delta::shift(Handle::CC, 0.0, 45.0),
                );
            }
        }
    }

    pub(crate) fn moorings(&mut self, f: &Feature) {
        if self.zoom < 14 {
            return;
        }
        match f.attribute_enum::<CatMor>(f.obj, Att::CatMor) {
            CatMor::Dolphin => {
                if f.geom.prim == Prim::Area {
                    self.canvas
                        .line_vector(f, &LineStyle::stroke(Rgba::BLACK, 4.0).filled(palette::YLAND));
                } else {
                    self.symbol(f, SymbolId::Dolphin);
                }
            }
            CatMor::DeviationDolphin => self.symbol(f, SymbolId::DeviationDolphin),
            CatMor::Bollard | CatMor::Post => self.symbol(f, SymbolId::Bollard),
            CatMor::Buoy => {
                if self.zoom >= 16 {
                    let mut shape = f.attribute_enum::<BoyShp>(f.obj, Att::BoyShp);
                    if shape == BoyShp::Unknown {
                        shape = BoyShp::Spherical;
                    }
                    // Mooring buoys shrink towards lower zooms instead of
                    // disappearing outright.
                    let scale = 1.0 / (1.0 + 0.25 * (18.0 - self.zoom as f64));
                    let scheme = self.scheme(f, f.obj);
                    self.canvas
                        .symbol(f, SymbolId::BuoyShape(shape), &scheme, None, scale);
                    self.canvas.symbol(
                        f,
                        SymbolId::MooringTopmark,
                        &Scheme::default(),
                        Some(tables::buoy_topmark_delta(shape)),
                        scale,
                    );
                    self.add_name_at(
                        f,
                        15,
                        FontSpec::bold(40.0),
                        Rgba::BLACK,
                        Delta::shift(Handle::BL, 60.0, -50.0),
                    );
                }
            }
            CatMor::Unknown => {}
        }
    }

    pub(crate) fn marinas(&mut self, f: &Feature) {
        if self.zoom >= 16 {
            self.facility_cluster(f);
        }
    }

    /// Cluster of small craft facility glyphs.
    pub(crate) fn facility_cluster(&mut self, f: &Feature) {
        let symbols: Vec<SymbolId> = f
            .attribute_list::<CatScf>(Obj::Smcfac, Att::CatScf)
            .into_iter()
            .filter(|scf| *scf != CatScf::Unknown)
            .map(SymbolId::Facility)
            .collect();
        self.canvas.cluster(f, &symbols);
    }

    pub(crate) fn ports(&mut self, f: &Feature) {
        if self.zoom < 14 {
            return;
        }
        match f.obj {
            Obj::Cranes => {
                if f.attribute_enum::<CatCrn>(f.obj, Att::CatCrn) == CatCrn::Container {
                    self.symbol(f, SymbolId::ContainerCrane);
                } else {
                    self.symbol(f, SymbolId::PortCrane);
                }
            }
            Obj::Hulkes => {
                self.canvas.line_vector(
                    f,
                    &LineStyle::stroke(Rgba::BLACK, 4.0).filled(Rgba::rgb(0xffe000)),
                );
                self.add_name(f, 15, FontSpec::bold(40.0));
            }
            _ => {}
        }
    }

    pub(crate) fn gauges(&mut self, f: &Feature) {
        if self.zoom >= 14 {
            self.symbol(f, SymbolId::TideGauge);
            self.add_name_at(
                f,
                15,
                FontSpec::bold(40.0),
                Rgba::BLACK,
                Delta::shift(Handle::BL, 20.0, -50.0),
            );
        }
    }

    pub(crate) fn stations(&mut self, f: &Feature) {
        if self.zoom < 14 {
            return;
        }
        let mut text = String::new();
        match f.obj {
            Obj::Sistat => {
                self.symbol(f, SymbolId::SignalStation);
                text.push_str("SS");
                match f.attribute_enum::<CatSit>(Obj::Sistat, Att::CatSit) {
                    CatSit::International => text.push_str("(INT)"),
                    CatSit::Traffic => text.push_str("(Traffic)"),
                    CatSit::PortControl => text.push_str("(Port Control)"),
                    CatSit::Lock => text.push_str("(Lock)"),
                    CatSit::Bridge => text.push_str("(Bridge)"),
                    CatSit::Unknown => {}
                }
            }
            Obj::Sistaw => {
                self.symbol(f, SymbolId::SignalStation);
                text.push_str("SS");
                match f.attribute_enum::<CatSiw>(Obj::Sistaw, Att::CatSiw) {
                    CatSiw::Storm => text.push_str("(Storm)"),
                    CatSiw::Weather => text.push_str("(Weather)"),
                    CatSiw::Ice => text.push_str("(Ice)"),
                    CatSiw::TideGauge => text = "Tide gauge".into(),
                    CatSiw::TideScale => text = "Tide scale".into(),
                    CatSiw::Tide => text.push_str("(Tide)"),
                    CatSiw::Stream => text.push_str("(Stream)"),
                    CatSiw::Danger => text.push_str("(Danger)"),
                    CatSiw::Military => text.push_str("(Firing)"),
                    CatSiw::Time => text.push_str("(Time)"),
                    CatSiw::Unknown => {}
                }
            }
            Obj::Rdosta | Obj::Rtpbcn | Obj::Radsta => {
                self.symbol(f, SymbolId::SignalStation);
                self.symbol(f, SymbolId::RadarStation);
            }
            Obj::Radrfl => self.symbol(f, SymbolId::RadarReflector),
            Obj::Pilbop => {
                self.symbol(f, SymbolId::Pilot);
                self.add_name_at(
                    f,
                    15,
                    FontSpec::bold(40.0),
                    palette::MSYMB,
                    Delta::shift(Handle::LC, 70.0, -40.0),
                );
                if f.attribute_enum::<CatPil>(f.obj, Att::CatPil) == CatPil::Helicopter {
                    self.label(
                        f,
                        "H",
                        FontSpec::plain(40.0),
                        palette::MSYMB,
                        Delta::shift(Handle::LC, 70.0, 0.0),
                    );
                }
            }
            Obj::Cgusta => {
                self.symbol(f, SymbolId::SignalStation);
                text.push_str("CG");
                if f.has_object(Obj::Rscsta) {
                    self.symbol_delta(f, SymbolId::Rescue, Delta::shift(Handle::CC, 130.0, 0.0));
                }
            }
            Obj::Rscsta => self.symbol(f, SymbolId::Rescue),
            _ => {}
        }
        if self.zoom >= 15 && !text.is_empty() {
            self.label(
                f,
                &text,
                FontSpec::plain(40.0),
                Rgba::BLACK,
                Delta::shift(Handle::CC, 0.0, -50.0),
            );
        }
    }

    pub(crate) fn callpoint(&mut self, f: &Feature) {
        if self.zoom < 14 {
            return;
        }
        let sym = if f.attribute_enum::<TrfTrf>(f.obj, Att::Trafic) == TrfTrf::TwoWay {
            SymbolId::CallPointTwoWay
        } else {
            SymbolId::CallPointOneWay
        };
        let orient = f.attribute_num(f.obj, Att::Orient).unwrap_or(0.0);
        self.symbol_delta(f, sym, Delta::rotated(Handle::CC, orient));
        let channel = f.attribute_str(f.obj, Att::ComCha);
        if !channel.is_empty() {
            let text = format!("Ch.{channel}");
            self.label(
                f,
                &text,
                FontSpec::plain(50.0),
                Rgba::BLACK,
                Delta::shift(Handle::TC, 0.0, 50.0),
            );
        }
    }

    pub(crate) fn platforms(&mut self, f: &Feature) {
        let cats = f.attribute_list::<CatOfp>(Obj::Ofsplf, Att::CatOfp);
        if cats[0] == CatOfp::Fpso {
            self.symbol(f, SymbolId::StorageVessel);
        } else {
            self.symbol(f, SymbolId::Platform);
        }
        if f.attribute_includes(f.obj, Att::Status, StsSts::Illuminated) {
            self.symbol(f, SymbolId::Floodlight);
        }
        self.add_name_at(
            f,
            15,
            FontSpec::bold(40.0),
            Rgba::BLACK,
            Delta::shift(Handle::BL, 20.0, -50.0),
        );
    }

    /// Bridge clearance labels: vertical clearance in a bracket, and the
    /// horizontal clearance below it when both are charted.
    pub(crate) fn bridges(&mut self, f: &Feature) {
        if self.zoom < 16 {
            return;
        }
        let Some(atts) = f.object_atts(Obj::Bridge, 0) else {
            return;
        };
        let num = |att: Att| atts.get(&att).and_then(AttVal::as_num);

        let hstr = num(Att::HorClr).map(format_decimal).unwrap_or_default();
        let verclr = num(Att::VerClr)
            .or_else(|| num(Att::VerCsa))
            .unwrap_or(0.0);
        let verccl = num(Att::VerCcl).unwrap_or(0.0);
        let vercop = num(Att::VerCop).unwrap_or(0.0);

        let mut vstr = String::new();
        if verclr > 0.0 {
            vstr = format_decimal(verclr);
        } else if verccl > 0.0 {
            if vercop == 0.0 {
                vstr = format!("{}/-", format_decimal(verccl));
            } else {
                vstr = format!("{}/{}", format_decimal(verccl), format_decimal(vercop));
            }
        }

        let vframe = LabelFrame {
            kind: FrameKind::VerticalClearance,
            colour: Rgba::BLACK,
            background: Some(Rgba::WHITE),
        };
        let hframe = LabelFrame {
            kind: FrameKind::HorizontalClearance,
            colour: Rgba::BLACK,
            background: Some(Rgba::WHITE),
        };
        let font = FontSpec::plain(30.0);
        match (hstr.is_empty(), vstr.is_empty()) {
            (true, false) => {
                self.label_framed(f, &vstr, font, Rgba::BLACK, vframe, Delta::at(Handle::CC));
            }
            (false, false) => {
                self.label_framed(f, &vstr, font, Rgba::BLACK, vframe, Delta::at(Handle::BC));
                self.label_framed(f, &hstr, font, Rgba::BLACK, hframe, Delta::at(Handle::TC));
            }
            (false, true) => {
                self.label_framed(f, &hstr, font, Rgba::BLACK, hframe, Delta::at(Handle::CC));
            }
            (true, true) => {}
        }
    }

    pub(crate) fn landmarks(&mut self, f: &Feature) {
        // A bare light structure renders as its light, not as a landmark.
        let light_only = !f.has_attribute(Obj::Lndmrk, Att::CatLmk)
            && (!f.has_attribute(Obj::Lndmrk, Att::Functn)
                || f.attribute_includes(Obj::Lndmrk, Att::Functn, FncFnc::Light));
        if light_only && f.has_object(Obj::Lights) {
            self.lights(f);
            return;
        }
        if self.zoom < 12 {
            return;
        }
        match f.obj {
            Obj::Lndmrk => {
                if f.attribute_includes(Obj::Lndmrk, Att::Status, StsSts::Illuminated) {
                    self.symbol(f, SymbolId::Floodlight);
                }
                let cat = f.attribute_list::<CatLmk>(f.obj, Att::CatLmk)[0];
                let fnc = f.attribute_list::<FncFnc>(f.obj, Att::Functn)[0];
                let mut cat_sym =
                    (cat != CatLmk::Unknown).then_some(SymbolId::Landmark(cat));
                let mut fnc_sym =
                    (fnc != FncFnc::Unknown).then_some(SymbolId::LandmarkFn(fnc));
                if fnc == FncFnc::Church && cat == CatLmk::Tower {
                    cat_sym = Some(SymbolId::ChurchTower);
                }
                if cat == CatLmk::Radar {
                    fnc_sym = Some(SymbolId::RadioTv);
                }
                if let Some(sym) = cat_sym {
                    self.symbol(f, sym);
                }
                if let Some(sym) = fnc_sym {
                    self.symbol(f, sym);
                }
            }
            Obj::Siltnk => {
                if f.attribute_includes(f.obj, Att::CatSil, CatSil::WaterTower) {
                    self.symbol(f, SymbolId::WaterTower);
                }
            }
            _ => {}
        }
        if self.zoom >= 15 {
            self.colour_letters(f);
        }
        self.add_name_at(
            f,
            15,
            FontSpec::bold(40.0),
            Rgba::BLACK,
            Delta::shift(Handle::BL, 60.0, -50.0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::super::{run_pass, RuleSet};
    use super::*;
    use crate::feature::{ChartSnapshot, Colour, Geometry, Position, Reln};
    use crate::render::{DrawOp, RecordingCanvas};

    fn point() -> Geometry {
        Geometry::point(Position::new(54.0f64.to_radians(), 10.0f64.to_radians()))
    }

    #[test]
    fn test_anchor_berth_swing_circle() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Achbrt, Reln::Master, point())
            .attribute(Att::Radius, AttVal::Num(50.0))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        assert!(canvas
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::LineCircle { radius, .. } if *radius == 50.0)));
    }

    #[test]
    fn test_marina_harbour_symbol() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Hrbfac, Reln::Master, point())
            .attribute(Att::CatHaf, AttVal::list([CatHaf::Marina]))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 12, RuleSet::All).unwrap();
        assert!(canvas.contains_symbol(SymbolId::Marina));
    }

    #[test]
    fn test_multi_purpose_harbour_uses_generic_symbol() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Hrbfac, Reln::Master, point())
            .attribute(
                Att::CatHaf,
                AttVal::list([CatHaf::Marina, CatHaf::Fishing]),
            )]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 12, RuleSet::All).unwrap();
        assert!(canvas.contains_symbol(SymbolId::Harbour));
        assert!(!canvas.contains_symbol(SymbolId::Marina));
    }

    #[test]
    fn test_distance_mark_with_units() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Dismar, Reln::Master, point())
            .attribute(Att::WtwDis, AttVal::Num(23.4))
            .attribute(Att::Hunits, AttVal::one(UniHlu::Kilometres))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 15, RuleSet::All).unwrap();
        assert!(canvas.contains_symbol(SymbolId::DistanceInstalled));
        assert_eq!(canvas.labels(), vec!["km 23.4"]);
    }

    #[test]
    fn test_mooring_buoy_shrinks_below_zoom_18() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Morfac, Reln::Master, point())
            .attribute(Att::CatMor, AttVal::one(CatMor::Buoy))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 16, RuleSet::All).unwrap();

        let scale = canvas.ops.iter().find_map(|op| match op {
            DrawOp::Symbol {
                symbol: SymbolId::BuoyShape(BoyShp::Spherical),
                scale,
                ..
            } => Some(*scale),
            _ => None,
        });
        assert_eq!(scale, Some(1.0 / 1.5));
    }

    #[test]
    fn test_signal_station_label_above_zoom_15() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Sistat, Reln::Master, point())
            .attribute(Att::CatSit, AttVal::list([CatSit::Lock]))]);

        let mut z14 = RecordingCanvas::new();
        run_pass(&snap, &mut z14, 14, RuleSet::All).unwrap();
        assert!(z14.labels().is_empty());

        let mut z15 = RecordingCanvas::new();
        run_pass(&snap, &mut z15, 15, RuleSet::All).unwrap();
        assert_eq!(z15.labels(), vec!["SS(Lock)"]);
    }

    #[test]
    fn test_callpoint_channel_label() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Rdocal, Reln::Master, point())
            .attribute(Att::Trafic, AttVal::one(TrfTrf::TwoWay))
            .attribute(Att::ComCha, AttVal::Str("73".into()))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        assert!(canvas.contains_symbol(SymbolId::CallPointTwoWay));
        assert_eq!(canvas.labels(), vec!["Ch.73"]);
    }

    #[test]
    fn test_church_tower_combination() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Lndmrk, Reln::Master, point())
            .attribute(Att::CatLmk, AttVal::list([CatLmk::Tower]))
            .attribute(Att::Functn, AttVal::list([FncFnc::Church]))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 12, RuleSet::All).unwrap();
        assert!(canvas.contains_symbol(SymbolId::ChurchTower));
    }

    #[test]
    fn test_landmark_colour_letters_at_high_zoom() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Lndmrk, Reln::Master, point())
            .attribute(Att::CatLmk, AttVal::list([CatLmk::Chimney]))
            .attribute(Att::Colour, AttVal::list([Colour::Red, Colour::White]))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 15, RuleSet::All).unwrap();
        assert!(canvas.labels().contains(&"RW"));
    }

    #[test]
    fn test_bridge_clearance_labels() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Bridge, Reln::Master, point())
            .attribute(Att::VerClr, AttVal::Num(12.0))
            .attribute(Att::HorClr, AttVal::Num(24.0))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 16, RuleSet::All).unwrap();
        assert_eq!(canvas.labels(), vec!["12", "24"]);
        assert!(canvas.ops.iter().all(|op| match op {
            DrawOp::LabelText { framed, .. } => *framed,
            _ => true,
        }));
    }
}
