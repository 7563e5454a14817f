//! Sounding and depth contour handlers.

use super::{format_decimal, tables, RulePass};
use crate::feature::{Att, Feature, Obj, TecSou};
use crate::render::{Delta, FontSpec, Handle, LineStyle, Rgba};

impl RulePass<'_> {
    pub(crate) fn depths(&mut self, f: &Feature) {
        match f.obj {
            Obj::Soundg => self.sounding(f),
            Obj::Depcnt => {
                self.canvas.line_vector(f, &LineStyle::stroke(Rgba::BLUE, 2.0));
            }
            _ => {}
        }
    }

    /// Computed soundings render as raster depth cells; surveyed ones as
    /// the conventional split-decimal depth figure.
    fn sounding(&mut self, f: &Feature) {
        let computed = f.attribute_includes(Obj::Soundg, Att::TecSou, TecSou::Computed);
        let Some(depth) = f.attribute_num(Obj::Soundg, Att::ValSou) else {
            return;
        };

        if computed {
            let tint = tables::depth_colour(depth).unwrap_or(Rgba::argb(0x00ffffff));
            // One cell spans 1/16 of a minute of arc.
            self.canvas
                .raster_pixel(f, (1.0f64 / 60.0 / 16.0).to_radians(), tint);
        } else if self.zoom >= 14 {
            let (underline, integral, decimal) = split_sounding(depth);
            self.label(
                f,
                &underline,
                FontSpec::plain(30.0),
                Rgba::BLACK,
                Delta::shift(Handle::RC, 10.0, 15.0),
            );
            self.label(
                f,
                &integral,
                FontSpec::plain(30.0),
                Rgba::BLACK,
                Delta::shift(Handle::RC, 10.0, 0.0),
            );
            self.label(
                f,
                &decimal,
                FontSpec::plain(20.0),
                Rgba::BLACK,
                Delta::shift(Handle::LC, 15.0, 10.0),
            );
        }
    }
}

/// Splits a depth into the conventional chart figure parts: underline,
/// integral digits and subscript decimal digit. Drying heights
/// (negative depths) and sub-metre depths underline the main figure.
fn split_sounding(depth: f64) -> (String, String, String) {
    let formatted = format_decimal(depth);
    let drying = formatted.starts_with('-');
    let unsigned = formatted.trim_start_matches('-');
    let tokens: Vec<&str> = unsigned.split('.').collect();
    let (main, decimal) = if tokens[0].is_empty() {
        (tokens[1], tokens.get(2).copied().unwrap_or(""))
    } else {
        (tokens[0], tokens.get(1).copied().unwrap_or(""))
    };
    let underline = if drying || tokens[0].is_empty() {
        "_".repeat(main.len())
    } else {
        String::new()
    };
    (underline, main.to_string(), decimal.to_string())
}

#[cfg(test)]
mod tests {
    use super::super::{run_pass, RuleSet};
    use super::*;
    use crate::feature::{AttVal, ChartSnapshot, Geometry, Position, Reln};
    use crate::render::{DrawOp, RecordingCanvas};

    #[test]
    fn test_split_whole_metres() {
        assert_eq!(
            split_sounding(12.0),
            (String::new(), "12".into(), String::new())
        );
    }

    #[test]
    fn test_split_with_decimal() {
        assert_eq!(
            split_sounding(12.5),
            (String::new(), "12".into(), "5".into())
        );
    }

    #[test]
    fn test_split_sub_metre_underlines() {
        // ".3" has an empty integral token, so "3" is underlined.
        assert_eq!(split_sounding(0.3), ("_".into(), "3".into(), String::new()));
    }

    #[test]
    fn test_split_negative_drying_height() {
        assert_eq!(split_sounding(-0.3), ("_".into(), "3".into(), String::new()));
    }

    #[test]
    fn test_split_drying_height_above_one_metre() {
        assert_eq!(split_sounding(-1.5), ("_".into(), "1".into(), "5".into()));
    }

    fn sounding_at(depth: f64) -> Feature {
        Feature::new(
            Obj::Soundg,
            Reln::Master,
            Geometry::point(Position::new(54.0f64.to_radians(), 10.0f64.to_radians())),
        )
        .attribute(Att::ValSou, AttVal::Num(depth))
    }

    #[test]
    fn test_surveyed_sounding_labels() {
        let snap = ChartSnapshot::new(vec![sounding_at(12.5)]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        assert_eq!(canvas.labels(), vec!["", "12", "5"]);
    }

    #[test]
    fn test_computed_sounding_renders_raster_cell() {
        let snap = ChartSnapshot::new(vec![
            sounding_at(7.0).attribute(Att::TecSou, AttVal::one(TecSou::Computed))
        ]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 10, RuleSet::All).unwrap();
        assert!(matches!(
            &canvas.ops[0],
            DrawOp::RasterPixel { obj: Obj::Soundg, colour } if *colour == Rgba::rgb(0x60b0ff)
        ));
    }

    #[test]
    fn test_sounding_hidden_below_zoom_14() {
        let snap = ChartSnapshot::new(vec![sounding_at(5.0)]);
        let mut canvas = RecordingCanvas::new();
        run_pass(&snap, &mut canvas, 13, RuleSet::All).unwrap();
        assert!(canvas.ops.is_empty());
    }
}
