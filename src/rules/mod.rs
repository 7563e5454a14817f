//! The symbolization rule engine.
//!
//! One render pass walks a closed dispatch table of object types in
//! drawing order (areas under lines under point symbols) and hands each
//! master feature to its handler. Handlers read attributes through the
//! typed accessors and emit draw calls on the [`ChartCanvas`]; zoom
//! gates inside each handler control progressive disclosure of detail.

mod areas;
mod depths;
mod harbours;
mod marks;
mod routes;
pub(crate) mod tables;

use crate::error::RenderError;
use crate::feature::{Att, Feature, FeatureSource, Obj, SourceConflict};
use crate::render::{
    ChartCanvas, Delta, FontSpec, Handle, LabelFrame, Rgba, Scheme, SymbolId,
};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::error;

/// Which rule groups a pass draws: base topography, the seamark
/// overlay, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSet {
    Base,
    Seamark,
    All,
}

impl RuleSet {
    fn base(self) -> bool {
        matches!(self, RuleSet::Base | RuleSet::All)
    }

    fn seamark(self) -> bool {
        matches!(self, RuleSet::Seamark | RuleSet::All)
    }
}

/// A contained failure inside a rule handler: the pass finished, but
/// one feature's drawing was abandoned mid-way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolizationFault(pub String);

impl fmt::Display for SymbolizationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a completed render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    Clean,
    /// The pass produced a tile, but a handler failed partway; the tile
    /// is usable and the fault has been logged.
    Degraded(SymbolizationFault),
}

/// Runs one full symbolization pass over the source.
///
/// A [`SourceConflict`] from the source aborts the pass and surfaces as
/// the retryable [`RenderError::TransientConflict`]. A panic inside a
/// rule handler is caught and reported as [`PassOutcome::Degraded`]:
/// bad data for one feature must not take down the whole tile.
pub fn run_pass(
    source: &dyn FeatureSource,
    canvas: &mut dyn ChartCanvas,
    zoom: u8,
    ruleset: RuleSet,
) -> Result<PassOutcome, RenderError> {
    let mut pass = RulePass {
        canvas,
        zoom,
        ruleset,
    };
    match panic::catch_unwind(AssertUnwindSafe(|| pass.dispatch(source))) {
        Ok(Ok(())) => Ok(PassOutcome::Clean),
        Ok(Err(SourceConflict)) => Err(RenderError::TransientConflict),
        Err(payload) => {
            let msg = panic_message(payload);
            error!(fault = %msg, "rule handler failed, tile degraded");
            Ok(PassOutcome::Degraded(SymbolizationFault(msg)))
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// State for one symbolization pass.
pub(crate) struct RulePass<'a> {
    pub canvas: &'a mut dyn ChartCanvas,
    pub zoom: u8,
    pub ruleset: RuleSet,
}

type Handler = fn(&mut RulePass<'_>, &Feature);

impl RulePass<'_> {
    /// Drawing order: base areas first, then the seamark overlay from
    /// lines up to point symbols and labels.
    fn dispatch(&mut self, source: &dyn FeatureSource) -> Result<(), SourceConflict> {
        use Obj::*;

        if self.ruleset.base() {
            const BASE: &[(Obj, Handler)] = &[
                (Lndare, |p, f| p.areas(f)),
                (Soundg, |p, f| p.depths(f)),
                (Depcnt, |p, f| p.depths(f)),
                (Tesare, |p, f| p.areas(f)),
                (Buaare, |p, f| p.areas(f)),
                (Hrbfac, |p, f| p.areas(f)),
                (Hrbbsn, |p, f| p.areas(f)),
                (Lokbsn, |p, f| p.areas(f)),
                (Lkbspt, |p, f| p.areas(f)),
                (Coalne, |p, f| p.areas(f)),
                (Lakare, |p, f| p.areas(f)),
                (Rivers, |p, f| p.waterways(f)),
                (Canals, |p, f| p.waterways(f)),
                (Depare, |p, f| p.areas(f)),
                (Roadwy, |p, f| p.highways(f)),
                (Railwy, |p, f| p.highways(f)),
            ];
            self.run_group(source, BASE)?;
        }

        source.for_each_master(Slcons, &mut |f| self.shoreline(f))?;

        if self.ruleset.seamark() {
            const SEAMARK: &[(Obj, Handler)] = &[
                (Pipsol, |p, f| p.pipelines(f)),
                (Cblsub, |p, f| p.cables(f)),
                (Pipohd, |p, f| p.pipelines(f)),
                (Cblohd, |p, f| p.cables(f)),
                (Tsezne, |p, f| p.separation(f)),
                (Tsscrs, |p, f| p.separation(f)),
                (Tssron, |p, f| p.separation(f)),
                (Tselne, |p, f| p.separation(f)),
                (Tsslpt, |p, f| p.separation(f)),
                (Tssbnd, |p, f| p.separation(f)),
                (Istzne, |p, f| p.separation(f)),
                (Sbdare, |p, f| p.areas(f)),
                (Spring, |p, f| p.areas(f)),
                (Sndwav, |p, f| p.areas(f)),
                (Wedklp, |p, f| p.areas(f)),
                (Segras, |p, f| p.areas(f)),
                (Ospare, |p, f| p.areas(f)),
                (Fairwy, |p, f| p.areas(f)),
                (Drgare, |p, f| p.areas(f)),
                (Resare, |p, f| p.areas(f)),
                (Mipare, |p, f| p.areas(f)),
                (Prcare, |p, f| p.areas(f)),
                (Splare, |p, f| p.areas(f)),
                (Seaare, |p, f| p.areas(f)),
                (Cblare, |p, f| p.areas(f)),
                (Pipare, |p, f| p.areas(f)),
                (Dmpgrd, |p, f| p.areas(f)),
                (Obstrn, |p, f| p.obstructions(f)),
                (Uwtroc, |p, f| p.obstructions(f)),
                (Marcul, |p, f| p.areas(f)),
                (Rectrc, |p, f| p.transits(f)),
                (Navlne, |p, f| p.transits(f)),
                (Hrbfac, |p, f| p.harbours(f)),
                (Achare, |p, f| p.harbours(f)),
                (Achbrt, |p, f| p.harbours(f)),
                (Berths, |p, f| p.harbours(f)),
                (Dismar, |p, f| p.distances(f)),
                (Hulkes, |p, f| p.ports(f)),
                (Cranes, |p, f| p.ports(f)),
                (Lndmrk, |p, f| p.landmarks(f)),
                (Siltnk, |p, f| p.landmarks(f)),
                (Buisgl, |p, f| p.harbours(f)),
                (Morfac, |p, f| p.moorings(f)),
                (Notmrk, |p, f| p.notices(f)),
                (Smcfac, |p, f| p.marinas(f)),
                (Bridge, |p, f| p.bridges(f)),
                (Pilpnt, |p, f| p.points(f)),
                (Topmar, |p, f| p.points(f)),
                (Daymar, |p, f| p.points(f)),
                (Fogsig, |p, f| p.points(f)),
                (Rdocal, |p, f| p.callpoint(f)),
                (Litmin, |p, f| p.lights(f)),
                (Litmaj, |p, f| p.lights(f)),
                (Lights, |p, f| p.lights(f)),
                (Sistat, |p, f| p.stations(f)),
                (Sistaw, |p, f| p.stations(f)),
                (Cgusta, |p, f| p.stations(f)),
                (Rdosta, |p, f| p.stations(f)),
                (Radrfl, |p, f| p.stations(f)),
                (Radsta, |p, f| p.stations(f)),
                (Rtpbcn, |p, f| p.stations(f)),
                (Rscsta, |p, f| p.stations(f)),
                (Pilbop, |p, f| p.stations(f)),
                (Wtwgag, |p, f| p.gauges(f)),
                (Ofsplf, |p, f| p.platforms(f)),
                (Wrecks, |p, f| p.wrecks(f)),
                (Litves, |p, f| p.floats(f)),
                (Litflt, |p, f| p.floats(f)),
                (Boyinb, |p, f| p.floats(f)),
                (Boylat, |p, f| p.buoys(f)),
                (Boycar, |p, f| p.buoys(f)),
                (Boyisd, |p, f| p.buoys(f)),
                (Boysaw, |p, f| p.buoys(f)),
                (Boyspp, |p, f| p.buoys(f)),
                (Bcnlat, |p, f| p.beacons(f)),
                (Bcncar, |p, f| p.beacons(f)),
                (Bcnisd, |p, f| p.beacons(f)),
                (Bcnsaw, |p, f| p.beacons(f)),
                (Bcnspp, |p, f| p.beacons(f)),
                (Vaaton, |p, f| p.virtual_aids(f)),
            ];
            self.run_group(source, SEAMARK)?;
        }
        Ok(())
    }

    fn run_group(
        &mut self,
        source: &dyn FeatureSource,
        group: &[(Obj, Handler)],
    ) -> Result<(), SourceConflict> {
        for &(obj, handler) in group {
            source.for_each_master(obj, &mut |f| handler(self, f))?;
        }
        Ok(())
    }

    /// The feature's colour scheme from the COLOUR/COLPAT attributes of
    /// the given associated object.
    pub(crate) fn scheme(&self, feature: &Feature, obj: Obj) -> Scheme {
        let colours = feature
            .attribute_list(obj, Att::Colour)
            .into_iter()
            .map(tables::body_colour)
            .collect();
        let patterns = feature
            .attribute_list(obj, Att::ColPat)
            .into_iter()
            .map(tables::pattern_code)
            .collect();
        Scheme::new(patterns, colours)
    }

    // Canvas shorthands, keeping handler bodies close to draw intent.

    pub(crate) fn symbol(&mut self, f: &Feature, sym: SymbolId) {
        self.canvas.symbol(f, sym, &Scheme::default(), None, 1.0);
    }

    pub(crate) fn symbol_scheme(&mut self, f: &Feature, sym: SymbolId, scheme: &Scheme) {
        self.canvas.symbol(f, sym, scheme, None, 1.0);
    }

    pub(crate) fn symbol_delta(&mut self, f: &Feature, sym: SymbolId, delta: Delta) {
        self.canvas.symbol(f, sym, &Scheme::default(), Some(delta), 1.0);
    }

    pub(crate) fn symbol_at(&mut self, f: &Feature, sym: SymbolId, scheme: &Scheme, delta: Delta) {
        self.canvas.symbol(f, sym, scheme, Some(delta), 1.0);
    }

    pub(crate) fn label(
        &mut self,
        f: &Feature,
        text: &str,
        font: FontSpec,
        colour: Rgba,
        delta: Delta,
    ) {
        self.canvas.label_text(f, text, font, colour, None, delta);
    }

    pub(crate) fn label_framed(
        &mut self,
        f: &Feature,
        text: &str,
        font: FontSpec,
        colour: Rgba,
        frame: LabelFrame,
        delta: Delta,
    ) {
        self.canvas.label_text(f, text, font, colour, Some(frame), delta);
    }

    /// Draws the feature's name in black, centred, from the given zoom.
    pub(crate) fn add_name(&mut self, f: &Feature, z: u8, font: FontSpec) {
        self.add_name_at(f, z, font, Rgba::BLACK, Delta::at(Handle::CC));
    }

    pub(crate) fn add_name_at(
        &mut self,
        f: &Feature,
        z: u8,
        font: FontSpec,
        colour: Rgba,
        delta: Delta,
    ) {
        if self.zoom >= z {
            if let Some(name) = f.name() {
                self.canvas.label_text(f, &name, font, colour, None, delta);
            }
        }
    }

    /// The feature's topmark or daymark attribute map, topmark first.
    pub(crate) fn topmark_source(&self, f: &Feature) -> Option<Obj> {
        if f.has_object(Obj::Topmar) {
            Some(Obj::Topmar)
        } else if f.has_object(Obj::Daymar) {
            Some(Obj::Daymar)
        } else {
            None
        }
    }

    /// Draws the feature's topmark (or daymark) shape at the given body
    /// delta, if one is attached and carries a shape.
    pub(crate) fn draw_topmark(&mut self, f: &Feature, delta: Option<Delta>) {
        if let Some(src) = self.topmark_source(f) {
            if f.has_attribute(src, Att::TopShp) {
                let shape = f.attribute_enum::<crate::feature::TopShp>(src, Att::TopShp);
                let scheme = self.scheme(f, src);
                self.canvas
                    .symbol(f, SymbolId::Topmark(shape), &scheme, delta, 1.0);
            }
        }
    }
}

/// Decimal formatting matching nautical chart labels: one fractional
/// digit, trailing zeros dropped, no leading zero before the point.
pub(crate) fn format_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded.trunc() as i64)
    } else {
        let s = format!("{rounded:.1}");
        if let Some(stripped) = s.strip_prefix("0.") {
            format!(".{stripped}")
        } else if let Some(stripped) = s.strip_prefix("-0.") {
            format!("-.{stripped}")
        } else {
            s
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{ChartSnapshot, Geometry, Position, Reln};
    use crate::render::RecordingCanvas;

    struct ConflictingSource;

    impl FeatureSource for ConflictingSource {
        fn for_each_master(
            &self,
            _obj: Obj,
            _visit: &mut dyn FnMut(&Feature),
        ) -> Result<(), SourceConflict> {
            Err(SourceConflict)
        }
    }

    struct PanickingSource;

    impl FeatureSource for PanickingSource {
        fn for_each_master(
            &self,
            obj: Obj,
            visit: &mut dyn FnMut(&Feature),
        ) -> Result<(), SourceConflict> {
            if obj == Obj::Wrecks {
                let f = Feature::new(obj, Reln::Master, Geometry::point(Position::new(0.9, 0.2)));
                visit(&f);
                panic!("corrupt geometry record");
            }
            Ok(())
        }
    }

    #[test]
    fn test_empty_source_pass_is_clean() {
        let snap = ChartSnapshot::default();
        let mut canvas = RecordingCanvas::new();
        let outcome = run_pass(&snap, &mut canvas, 14, RuleSet::All).unwrap();
        assert_eq!(outcome, PassOutcome::Clean);
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn test_source_conflict_surfaces_as_retryable() {
        let mut canvas = RecordingCanvas::new();
        let err = run_pass(&ConflictingSource, &mut canvas, 14, RuleSet::All).unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_handler_panic_is_contained() {
        let mut canvas = RecordingCanvas::new();
        let outcome = run_pass(&PanickingSource, &mut canvas, 14, RuleSet::All).unwrap();
        match outcome {
            PassOutcome::Degraded(fault) => {
                assert!(fault.to_string().contains("corrupt geometry"))
            }
            other => panic!("expected degraded outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(12.0), "12");
        assert_eq!(format_decimal(12.5), "12.5");
        assert_eq!(format_decimal(0.3), ".3");
        assert_eq!(format_decimal(-0.3), "-.3");
        assert_eq!(format_decimal(12.34), "12.3");
    }
}
