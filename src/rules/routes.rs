//! Handlers for leading lines, submarine pipelines and cables.

use super::{format_decimal, RulePass};
use crate::feature::{Att, CatCbl, CatPip, Feature, Obj};
use crate::render::{palette, Delta, FontSpec, FrameKind, Handle, LabelFrame, LineStyle, Rgba, SymbolId};

impl RulePass<'_> {
    pub(crate) fn transits(&mut self, f: &Feature) {
        if self.zoom >= 14 {
            match f.obj {
                Obj::Rectrc => {
                    self.canvas.line_vector(f, &LineStyle::stroke(Rgba::BLACK, 5.0));
                }
                Obj::Navlne => {
                    self.canvas.line_vector(
                        f,
                        &LineStyle::stroke(Rgba::BLACK, 5.0).dashed(&[25.0, 25.0]),
                    );
                }
                _ => {}
            }
        }
        if self.zoom >= 15 {
            // The bearing label only appears when an orientation is charted.
            if let Some(orient) = f.attribute_num(f.obj, Att::Orient) {
                let mut text = String::new();
                if let Some(name) = f.name() {
                    text.push_str(&name);
                    text.push(' ');
                }
                text.push_str(&format_decimal(orient));
                text.push('º');
                self.canvas
                    .line_text(f, &text, FontSpec::plain(40.0), Rgba::BLACK, -20.0);
            }
        }
    }

    pub(crate) fn pipelines(&mut self, f: &Feature) {
        if self.zoom < 14 || f.geom.length >= 20.0 {
            return;
        }
        match f.obj {
            Obj::Pipsol => {
                let colour = match f.attribute_enum::<CatPip>(f.obj, Att::CatPip) {
                    CatPip::Intake | CatPip::Outfall | CatPip::Sewer => Rgba::BLACK,
                    _ => palette::MSYMB,
                };
                self.canvas
                    .line_symbols(f, SymbolId::Pipeline, 0.33, None, None, 0, colour);
            }
            Obj::Pipohd => {
                self.canvas.line_vector(f, &LineStyle::stroke(Rgba::BLACK, 8.0));
                let verclr = f
                    .attribute_num(f.obj, Att::VerClr)
                    .or_else(|| f.attribute_num(f.obj, Att::VerCsa))
                    .unwrap_or(0.0);
                if verclr > 0.0 {
                    self.label_framed(
                        f,
                        &format_decimal(verclr),
                        FontSpec::plain(50.0),
                        Rgba::BLACK,
                        LabelFrame {
                            kind: FrameKind::VerticalClearance,
                            colour: Rgba::BLACK,
                            background: Some(Rgba::WHITE),
                        },
                        Delta::shift(Handle::TC, 0.0, 25.0),
                    );
                }
            }
            _ => {}
        }
    }

    pub(crate) fn cables(&mut self, f: &Feature) {
        let long = self.zoom >= 14 && f.geom.length > 2.0 && f.geom.length < 20.0;
        let short = self.zoom >= 16 && f.geom.length <= 2.0;
        if !long && !short {
            return;
        }
        match f.obj {
            Obj::Cblsub => {
                self.canvas
                    .line_symbols(f, SymbolId::Cable, 0.0, None, None, 0, palette::MLINE);
            }
            Obj::Cblohd => {
                if f.attribute_enum::<CatCbl>(f.obj, Att::CatCbl) == CatCbl::Power {
                    self.canvas.line_symbols(
                        f,
                        SymbolId::CableDash,
                        0.0,
                        Some(SymbolId::CableDot),
                        Some(SymbolId::CableFlash),
                        2,
                        Rgba::BLACK,
                    );
                } else {
                    self.canvas.line_symbols(
                        f,
                        SymbolId::CableDash,
                        0.0,
                        Some(SymbolId::CableDot),
                        None,
                        2,
                        Rgba::BLACK,
                    );
                }
                let clearance = f.attribute_num(f.obj, Att::VerClr);
                let safe = f.attribute_num(f.obj, Att::VerCsa);
                let (value, kind) = match (clearance, safe) {
                    (Some(v), _) => (Some(v), FrameKind::VerticalClearance),
                    (None, Some(v)) => (Some(v), FrameKind::OverheadClearance),
                    (None, None) => (None, FrameKind::VerticalClearance),
                };
                if let Some(v) = value {
                    self.label_framed(
                        f,
                        &format_decimal(v),
                        FontSpec::plain(50.0),
                        Rgba::BLACK,
                        LabelFrame {
                            kind,
                            colour: Rgba::BLACK,
                            background: Some(Rgba::WHITE),
                        },
                        Delta::shift(Handle::TC, 0.0, 25.0),
                    );
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{run_pass, RuleSet};
    use super::*;
    use crate::feature::{AttVal, ChartSnapshot, Feature, Geometry, Position, Reln};
    use crate::render::{DrawOp, RecordingCanvas};

    fn leg(length: f64) -> Geometry {
        let mut geom = Geometry::line(vec![
            Position::new(54.0f64.to_radians(), 10.0f64.to_radians()),
            Position::new(54.0f64.to_radians(), 10.1f64.to_radians()),
        ]);
        geom.length = length;
        geom
    }

    #[test]
    fn test_leading_line_bearing_label() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Rectrc, Reln::Master, leg(1.0))
            .attribute(Att::ObjNam, AttVal::Str("Leading line".into()))
            .attribute(Att::Orient, AttVal::Num(92.5))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 15, RuleSet::All).unwrap();
        assert!(canvas.ops.iter().any(|op| matches!(
            op,
            DrawOp::LineText { text, .. } if text == "Leading line 92.5º"
        )));
    }

    #[test]
    fn test_unoriented_track_has_no_label() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Rectrc, Reln::Master, leg(1.0))
            .attribute(Att::ObjNam, AttVal::Str("Track".into()))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 15, RuleSet::All).unwrap();
        assert!(!canvas
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::LineText { .. })));
    }

    #[test]
    fn test_sewer_pipeline_is_black() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Pipsol, Reln::Master, leg(3.0))
            .attribute(Att::CatPip, AttVal::one(CatPip::Sewer))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        assert!(matches!(
            &canvas.ops[0],
            DrawOp::LineSymbols { chain: SymbolId::Pipeline, .. }
        ));
    }

    #[test]
    fn test_long_pipeline_not_charted() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Pipsol, Reln::Master, leg(25.0))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn test_short_cable_needs_zoom_16() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Cblsub, Reln::Master, leg(1.5))]);

        let mut z14 = RecordingCanvas::new();
        run_pass(&snap, &mut z14, 14, RuleSet::All).unwrap();
        assert!(z14.ops.is_empty());

        let mut z16 = RecordingCanvas::new();
        run_pass(&snap, &mut z16, 16, RuleSet::All).unwrap();
        assert!(matches!(
            &z16.ops[0],
            DrawOp::LineSymbols { chain: SymbolId::Cable, .. }
        ));
    }

    #[test]
    fn test_overhead_cable_clearance_label() {
        let snap = ChartSnapshot::new(vec![Feature::new(Obj::Cblohd, Reln::Master, leg(5.0))
            .attribute(Att::CatCbl, AttVal::one(CatCbl::Power))
            .attribute(Att::VerClr, AttVal::Num(18.0))]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        assert_eq!(canvas.labels(), vec!["18"]);
    }
}
