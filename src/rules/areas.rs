//! Handlers for area features: land, water bodies, regulated zones,
//! seabed annotation and traffic separation schemes.

use super::tables;
use super::RulePass;
use crate::feature::{
    Att, CatOpa, CatRea, CatSea, CatSlc, CatWed, Colour, Feature, NatQua, NatSur, Obj, Prim,
    WatLev,
};
use crate::render::{palette, Delta, FontSpec, Handle, LineStyle, Rgba, Scheme, SymbolId};

impl RulePass<'_> {
    pub(crate) fn areas(&mut self, f: &Feature) {
        let name = f.name();
        match f.obj {
            Obj::Tesare => {
                self.canvas.line_symbols(
                    f,
                    SymbolId::LimitDash,
                    0.0,
                    Some(SymbolId::LimitCc),
                    None,
                    30,
                    palette::MLINE,
                );
            }
            Obj::Buaare => {
                self.canvas
                    .line_vector(f, &LineStyle::fill_only(Rgba::argb(0x20000000)));
            }
            Obj::Coalne => {
                if self.zoom >= 12 {
                    self.canvas.line_vector(f, &LineStyle::stroke(Rgba::BLACK, 10.0));
                }
            }
            Obj::Depare => {
                if let Some(depmax) = f.attribute_num(Obj::Depare, Att::Drval2) {
                    let style = match tables::depth_colour(depmax) {
                        None => LineStyle::fill_only(palette::GDRIES),
                        Some(tint) => LineStyle::stroke(Rgba::BLUE, 2.0).filled(tint),
                    };
                    self.canvas.line_vector(f, &style);
                }
            }
            Obj::Canals | Obj::Lakare | Obj::Rivers => {
                if self.zoom >= 12 || f.geom.area > 10.0 {
                    self.canvas.line_vector(
                        f,
                        &LineStyle::stroke(palette::BWATER, 11.0).filled(palette::BWATER),
                    );
                }
            }
            Obj::Drgare => {
                let style = LineStyle::stroke(Rgba::BLACK, 8.0).dashed(&[25.0, 25.0]);
                if self.zoom < 16 {
                    self.canvas
                        .line_vector(f, &style.filled(Rgba::argb(0x40ffffff)));
                } else {
                    self.canvas.line_vector(f, &style);
                }
                self.add_name(f, 12, FontSpec::plain(100.0));
            }
            Obj::Fairwy => {
                if self.zoom >= 12 {
                    if f.geom.area > 1.0 {
                        if self.zoom < 16 {
                            self.canvas
                                .line_vector(f, &LineStyle::fill_only(Rgba::argb(0x20ffffff)));
                        } else {
                            self.canvas.line_vector(
                                f,
                                &LineStyle::stroke(palette::MLINE, 8.0).dashed(&[50.0, 50.0]),
                            );
                        }
                    } else if self.zoom >= 14 {
                        self.canvas
                            .line_vector(f, &LineStyle::fill_only(Rgba::argb(0x20ffffff)));
                    }
                }
            }
            Obj::Lkbspt | Obj::Lokbsn | Obj::Hrbbsn => self.basin(f),
            Obj::Hrbfac => {
                if f.has_object(Obj::Hrbbsn) {
                    self.basin(f);
                }
            }
            Obj::Lndare => {
                self.canvas.line_vector(f, &LineStyle::fill_only(palette::YLAND));
            }
            Obj::Marcul => {
                if self.zoom >= 12 {
                    if self.zoom >= 14 {
                        self.symbol(f, SymbolId::MarineFarm);
                    }
                    let a = f.geom.area;
                    if a > 0.2
                        || (a > 0.05 && self.zoom >= 14)
                        || (a > 0.005 && self.zoom >= 16)
                    {
                        self.canvas.line_vector(
                            f,
                            &LineStyle::stroke(Rgba::BLACK, 4.0).dashed(&[10.0, 10.0]),
                        );
                    }
                }
            }
            Obj::Ospare => {
                if f.attribute_includes(f.obj, Att::CatOpa, CatOpa::WindFarm) {
                    self.symbol(f, SymbolId::WindFarm);
                    self.canvas.line_vector(
                        f,
                        &LineStyle::stroke(Rgba::BLACK, 12.0).dashed(&[40.0, 40.0]),
                    );
                    self.add_name_at(
                        f,
                        15,
                        FontSpec::bold(80.0),
                        Rgba::BLACK,
                        Delta::shift(Handle::TC, 0.0, 120.0),
                    );
                }
            }
            Obj::Resare | Obj::Mipare | Obj::Dmpgrd => {
                if self.zoom >= 12 {
                    self.canvas.line_symbols(
                        f,
                        SymbolId::Restricted,
                        1.0,
                        None,
                        None,
                        0,
                        palette::MLINE,
                    );
                    if f.attribute_includes(f.obj, Att::CatRea, CatRea::NoWake) {
                        self.symbol(f, SymbolId::NoWake);
                    }
                }
            }
            Obj::Prcare => {
                if self.zoom >= 12 {
                    self.canvas.line_vector(
                        f,
                        &LineStyle::stroke(palette::MLINE, 10.0).dashed(&[40.0, 40.0]),
                    );
                }
            }
            Obj::Seaare => self.sea_area(f, name.as_deref()),
            Obj::Sndwav => {
                if self.zoom >= 12 {
                    self.canvas.fill_pattern(f, SymbolId::Sandwaves);
                }
            }
            Obj::Sbdare => {
                if self.zoom >= 14 {
                    self.seabed(f);
                }
            }
            Obj::Wedklp => {
                if self.zoom >= 14 {
                    match f.attribute_enum::<CatWed>(f.obj, Att::CatWed) {
                        CatWed::Kelp => {
                            if f.geom.prim == Prim::Area {
                                self.canvas.fill_pattern(f, SymbolId::KelpArea);
                            } else {
                                self.symbol(f, SymbolId::KelpSymbol);
                            }
                        }
                        CatWed::Seaweed => {
                            self.label(
                                f,
                                "Wd",
                                FontSpec::italic(40.0),
                                Rgba::BLACK,
                                Delta::at(Handle::CC),
                            );
                        }
                        CatWed::SeaGrass => {
                            self.label(
                                f,
                                "Sg",
                                FontSpec::italic(40.0),
                                Rgba::BLACK,
                                Delta::at(Handle::CC),
                            );
                        }
                        CatWed::Sargasso | CatWed::Unknown => {}
                    }
                }
            }
            Obj::Segras => {
                self.label(
                    f,
                    "Sg",
                    FontSpec::italic(40.0),
                    Rgba::BLACK,
                    Delta::at(Handle::CC),
                );
            }
            Obj::Spring => self.symbol(f, SymbolId::Spring),
            Obj::Splare => {
                if self.zoom >= 12 {
                    self.symbol_scheme(f, SymbolId::Seaplane, &Scheme::plain(palette::MSYMB));
                    self.canvas.line_symbols(
                        f,
                        SymbolId::Restricted,
                        0.5,
                        Some(SymbolId::SeaplaneLine),
                        None,
                        10,
                        palette::MLINE,
                    );
                    self.add_name_at(
                        f,
                        15,
                        FontSpec::bold(80.0),
                        Rgba::BLACK,
                        Delta::shift(Handle::BC, 0.0, -90.0),
                    );
                }
            }
            Obj::Cblare => {
                if self.zoom >= 12 {
                    self.canvas.line_symbols(
                        f,
                        SymbolId::Restricted,
                        1.0,
                        Some(SymbolId::Cable),
                        None,
                        4,
                        palette::MLINE,
                    );
                }
            }
            Obj::Pipare => {
                if self.zoom >= 12 {
                    self.canvas.line_symbols(
                        f,
                        SymbolId::Restricted,
                        1.0,
                        Some(SymbolId::Pipeline),
                        None,
                        4,
                        palette::MLINE,
                    );
                }
            }
            _ => {}
        }
    }

    /// Enclosed harbour or lock basin.
    fn basin(&mut self, f: &Feature) {
        if self.zoom >= 12 {
            self.canvas
                .line_vector(f, &LineStyle::stroke(Rgba::BLACK, 10.0).filled(palette::BWATER));
        } else {
            self.canvas.line_vector(f, &LineStyle::fill_only(palette::BWATER));
        }
    }

    fn sea_area(&mut self, f: &Feature, name: Option<&str>) {
        match f.attribute_enum::<CatSea>(f.obj, Att::CatSea) {
            CatSea::Reach | CatSea::Bay => {
                if self.zoom >= 15 {
                    if let Some(name) = name {
                        if f.geom.prim == Prim::Line {
                            self.canvas.line_text(
                                f,
                                name,
                                FontSpec::plain(60.0),
                                Rgba::BLACK,
                                -40.0,
                            );
                        } else {
                            self.label(
                                f,
                                name,
                                FontSpec::plain(60.0),
                                Rgba::BLACK,
                                Delta::at(Handle::BC),
                            );
                        }
                    }
                }
            }
            CatSea::Shoal => {
                if self.zoom >= 14 {
                    if f.geom.prim == Prim::Area {
                        self.canvas.line_vector(
                            f,
                            &LineStyle::stroke(Rgba::rgb(0xc480ff), 4.0).dashed(&[25.0, 25.0]),
                        );
                    }
                    if let Some(name) = name {
                        if f.geom.prim == Prim::Line {
                            self.canvas.line_text(
                                f,
                                name,
                                FontSpec::italic(75.0),
                                Rgba::BLACK,
                                -40.0,
                            );
                            self.canvas.line_text(
                                f,
                                "(Shoal)",
                                FontSpec::plain(60.0),
                                Rgba::BLACK,
                                20.0,
                            );
                        } else {
                            self.label(
                                f,
                                name,
                                FontSpec::italic(75.0),
                                Rgba::BLACK,
                                Delta::shift(Handle::BC, 0.0, -40.0),
                            );
                            self.label(
                                f,
                                "(Shoal)",
                                FontSpec::plain(60.0),
                                Rgba::BLACK,
                                Delta::shift(Handle::BC, 0.0, 20.0),
                            );
                        }
                    }
                }
            }
            CatSea::Gat | CatSea::Narrows => {
                self.add_name(f, 12, FontSpec::plain(100.0));
            }
            CatSea::Unknown => {}
        }
    }

    /// Seabed nature label, e.g. "fS.M" for fine sand over mud. An
    /// unknown material folds into the preceding token as "/".
    fn seabed(&mut self, f: &Feature) {
        if !f.has_attribute(f.obj, Att::NatSur) {
            return;
        }
        let materials: Vec<NatSur> = f.attribute_list(f.obj, Att::NatSur);
        let qualities: Vec<NatQua> = if f.has_attribute(f.obj, Att::NatQua) {
            f.attribute_list(f.obj, Att::NatQua)
        } else {
            Vec::new()
        };

        let mut text = String::new();
        let mut sep = ".";
        for (i, material) in materials.iter().enumerate() {
            if !text.is_empty() {
                text.push_str(sep);
                sep = ".";
            }
            if let Some(quality) = qualities.get(i) {
                text.push_str(tables::quality_abbrev(*quality));
            }
            match tables::material_abbrev(*material) {
                Some(abbrev) => text.push_str(abbrev),
                None => {
                    text.pop();
                    text.push('/');
                    sep = "";
                }
            }
        }
        if !text.is_empty() {
            self.label(
                f,
                &text,
                FontSpec::italic(40.0),
                Rgba::BLACK,
                Delta::at(Handle::CC),
            );
        }
    }

    pub(crate) fn waterways(&mut self, f: &Feature) {
        let style = LineStyle::stroke(palette::BWATER, 20.0);
        let style = if f.geom.prim == Prim::Area {
            style.filled(palette::BWATER)
        } else {
            style
        };
        self.canvas.line_vector(f, &style);
    }

    pub(crate) fn highways(&mut self, f: &Feature) {
        match f.obj {
            Obj::Roadwy => {
                use crate::feature::CatRod;
                let width = match f.attribute_enum::<CatRod>(f.obj, Att::CatRod) {
                    CatRod::Motorway => 20.0,
                    CatRod::Major => 15.0,
                    CatRod::Minor => 10.0,
                    CatRod::Track | CatRod::Unknown => 5.0,
                };
                self.canvas.line_vector(f, &LineStyle::stroke(Rgba::BLACK, width));
            }
            Obj::Railwy => {
                self.canvas.line_vector(f, &LineStyle::stroke(Rgba::GRAY, 10.0));
                self.canvas.line_vector(
                    f,
                    &LineStyle::stroke(Rgba::BLACK, 10.0).dashed(&[30.0, 30.0]),
                );
            }
            _ => {}
        }
    }

    /// Shoreline construction straddles both rule groups: the solid land
    /// outline belongs to the base map, training walls and slipways to
    /// the seamark overlay.
    pub(crate) fn shoreline(&mut self, f: &Feature) {
        let cat = f.attribute_enum::<CatSlc>(f.obj, Att::CatSlc);
        if self.ruleset.base() && cat != CatSlc::Slipway && cat != CatSlc::TrainingWall {
            if self.zoom >= 12 {
                self.canvas
                    .line_vector(f, &LineStyle::stroke(Rgba::BLACK, 10.0).filled(palette::YLAND));
            } else {
                self.canvas.line_vector(f, &LineStyle::fill_only(palette::YLAND));
            }
        }
        if self.ruleset.seamark() && self.zoom >= 12 {
            match cat {
                CatSlc::TrainingWall => {
                    if f.attribute_enum::<WatLev>(f.obj, Att::WatLev) == WatLev::CoversUncovers {
                        self.canvas.line_vector(
                            f,
                            &LineStyle::stroke(Rgba::BLACK, 10.0).dashed(&[40.0, 40.0]),
                        );
                        if self.zoom >= 15 {
                            self.canvas.line_text(
                                f,
                                "(covers)",
                                FontSpec::plain(40.0),
                                Rgba::BLACK,
                                80.0,
                            );
                        }
                    } else {
                        self.canvas.line_vector(f, &LineStyle::stroke(Rgba::BLACK, 10.0));
                    }
                    if self.zoom >= 15 {
                        self.canvas.line_text(
                            f,
                            "Training Wall",
                            FontSpec::plain(40.0),
                            Rgba::BLACK,
                            -30.0,
                        );
                    }
                }
                CatSlc::Slipway => {
                    self.canvas.line_vector(
                        f,
                        &LineStyle::stroke(Rgba::BLACK, 2.0).filled(Rgba::rgb(0xffe000)),
                    );
                    if self.zoom >= 16 && f.has_object(Obj::Smcfac) {
                        self.facility_cluster(f);
                    }
                }
                _ => {}
            }
        }
    }

    pub(crate) fn separation(&mut self, f: &Feature) {
        match f.obj {
            Obj::Tsezne | Obj::Tsscrs | Obj::Tssron => {
                if self.zoom <= 15 {
                    self.canvas.line_vector(f, &LineStyle::fill_only(palette::MTSS));
                } else {
                    self.canvas.line_vector(f, &LineStyle::stroke(palette::MTSS, 20.0));
                }
                self.add_name_at(
                    f,
                    10,
                    FontSpec::bold(150.0),
                    palette::MLINE,
                    Delta::at(Handle::CC),
                );
            }
            Obj::Tselne => {
                self.canvas.line_vector(f, &LineStyle::stroke(palette::MTSS, 20.0));
            }
            Obj::Tsslpt => {
                self.canvas.line_symbols(
                    f,
                    SymbolId::LaneArrow,
                    0.5,
                    None,
                    None,
                    0,
                    palette::MTSS,
                );
            }
            Obj::Tssbnd => {
                self.canvas.line_vector(
                    f,
                    &LineStyle::stroke(palette::MTSS, 20.0).dashed(&[40.0, 40.0]),
                );
            }
            Obj::Istzne => {
                self.canvas.line_symbols(
                    f,
                    SymbolId::Restricted,
                    1.0,
                    None,
                    None,
                    0,
                    palette::MTSS,
                );
            }
            _ => {}
        }
    }

    /// Draws the landmark colour letters, e.g. "RW" for a red and white
    /// tower.
    pub(crate) fn colour_letters(&mut self, f: &Feature) {
        let letters: String = f
            .attribute_list::<Colour>(f.obj, Att::Colour)
            .into_iter()
            .map(tables::colour_letter)
            .collect();
        if !letters.is_empty() {
            self.label(
                f,
                &letters,
                FontSpec::plain(40.0),
                Rgba::BLACK,
                Delta::shift(Handle::TC, 0.0, 80.0),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{run_pass, RuleSet};
    use crate::feature::{
        Att, AttVal, ChartSnapshot, Feature, Geometry, NatQua, NatSur, Obj, Position, Reln,
    };
    use crate::render::{palette, DrawOp, RecordingCanvas, Rgba};

    fn pos(lat_deg: f64, lon_deg: f64) -> Position {
        Position::new(lat_deg.to_radians(), lon_deg.to_radians())
    }

    fn square() -> Geometry {
        Geometry::area(vec![
            pos(54.0, 10.0),
            pos(54.0, 10.1),
            pos(54.1, 10.1),
            pos(54.1, 10.0),
        ])
    }

    #[test]
    fn test_drying_depth_area_fills_green() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Depare, Reln::Master, square())
            .attribute(Att::Drval2, AttVal::Num(0.0))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();

        assert!(matches!(
            &canvas.ops[0],
            DrawOp::LineVector { obj: Obj::Depare, style }
                if style.fill == Some(palette::GDRIES) && style.line.is_none()
        ));
    }

    #[test]
    fn test_shallow_depth_area_uses_first_band() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Depare, Reln::Master, square())
            .attribute(Att::Drval2, AttVal::Num(1.5))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();

        assert!(matches!(
            &canvas.ops[0],
            DrawOp::LineVector { style, .. }
                if style.fill == Some(Rgba::rgb(0x2090ff)) && style.line == Some(Rgba::BLUE)
        ));
    }

    #[test]
    fn test_depth_area_without_depth_draws_nothing() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Depare, Reln::Master, square())]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn test_seabed_label_joins_tokens() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Sbdare, Reln::Master, square())
            .attribute(Att::NatSur, AttVal::list([NatSur::Sand, NatSur::Mud]))
            .attribute(Att::NatQua, AttVal::list([NatQua::Fine]))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        assert_eq!(canvas.labels(), vec!["fS.M"]);
    }

    #[test]
    fn test_seabed_unknown_material_becomes_slash() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Sbdare, Reln::Master, square())
            .attribute(
                Att::NatSur,
                AttVal::list([NatSur::Sand, NatSur::Unknown, NatSur::Mud]),
            )]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        // "S" + "." then the dot retracts into "/" and the next token
        // follows with no separator.
        assert_eq!(canvas.labels(), vec!["S/M"]);
    }

    #[test]
    fn test_seabed_hidden_below_zoom_14() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Sbdare, Reln::Master, square())
            .attribute(Att::NatSur, AttVal::list([NatSur::Sand]))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 13, RuleSet::All).unwrap();
        assert!(canvas.labels().is_empty());
    }

    #[test]
    fn test_land_area_always_fills() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Lndare, Reln::Master, square())]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 8, RuleSet::All).unwrap();
        assert!(matches!(
            &canvas.ops[0],
            DrawOp::LineVector { style, .. } if style.fill == Some(palette::YLAND)
        ));
    }

    #[test]
    fn test_base_group_skipped_for_seamark_ruleset() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Lndare, Reln::Master, square())]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::Seamark).unwrap();
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn test_separation_zone_switches_to_outline_above_15() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Tsezne, Reln::Master, square())]);

        let mut low = RecordingCanvas::new();
        run_pass(&snap, &mut low, 15, RuleSet::All).unwrap();
        assert!(matches!(
            &low.ops[0],
            DrawOp::LineVector { style, .. } if style.fill == Some(palette::MTSS)
        ));

        let mut high = RecordingCanvas::new();
        run_pass(&snap, &mut high, 16, RuleSet::All).unwrap();
        assert!(matches!(
            &high.ops[0],
            DrawOp::LineVector { style, .. } if style.line == Some(palette::MTSS)
        ));
    }
}
