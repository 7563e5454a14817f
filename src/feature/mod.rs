//! Chart feature data model.
//!
//! A [`Feature`] is one chart object instance: an object type, a geometry
//! primitive, a relation role, its own attribute map, and "object maps"
//! carrying attribute sets borrowed from associated sub-objects (a beacon
//! borrowing its topmark's shape, a signal station carrying its rescue
//! sub-record). Features are loaded once per render invocation and treated
//! as read-only for the duration of a pass; [`ChartSnapshot`] guarantees
//! that immutability by owning the set outright.

mod atts;
mod values;

pub use values::{
    AddMrk, Att, AttVal, AttrEnum, BcnShp, BnkWtw, BoyShp, CatAch, CatCbl, CatCrn, CatDis,
    CatHaf, CatLam, CatLit, CatLmk, CatMor, CatNmk, CatObs, CatOfp, CatOpa, CatPil, CatPip,
    CatRea, CatRod, CatScf, CatSea, CatSil, CatSit, CatSiw, CatSlc, CatVan, CatWed, CatWrk,
    ColPat, Colour, EnumVal, FncFnc, MarSys, NatQua, NatSur, StsSts, TecSou, TopShp, TrfTrf,
    UniHlu, WatLev,
};

use crate::geo::{self, Bounds};
use std::collections::{BTreeMap, HashMap};
use std::f64::consts::PI;

/// Chart object types (S-57 object class acronyms).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Obj {
    // Base topography
    Lndare, Buaare, Coalne, Lakare, Rivers, Canals, Roadwy, Railwy,
    // Depths
    Depare, Depcnt, Soundg, Drgare,
    // Sea and seabed areas
    Seaare, Sbdare, Sndwav, Wedklp, Segras, Spring, Tesare, Ospare,
    Fairwy, Resare, Mipare, Prcare, Splare, Cblare, Pipare, Dmpgrd,
    Marcul,
    // Obstructions and wrecks
    Obstrn, Uwtroc, Wrecks,
    // Cables and pipelines
    Cblsub, Cblohd, Pipsol, Pipohd,
    // Traffic separation
    Tsezne, Tsscrs, Tssron, Tselne, Tsslpt, Tssbnd, Istzne,
    // Routes
    Rectrc, Navlne,
    // Harbours and shoreline
    Hrbfac, Hrbbsn, Lokbsn, Lkbspt, Achare, Achbrt, Berths, Dismar,
    Hulkes, Cranes, Slcons, Morfac, Smcfac, Buisgl, Bridge,
    // Landmarks and stations
    Lndmrk, Siltnk, Sistat, Sistaw, Cgusta, Rdosta, Radrfl, Radsta,
    Rtpbcn, Rscsta, Pilbop, Rdocal, Wtwgag, Ofsplf,
    // Lights and small points
    Lights, Litmaj, Litmin, Pilpnt, Fogsig,
    // Floating marks
    Litves, Litflt, Boyinb,
    Boylat, Boycar, Boyisd, Boysaw, Boyspp,
    Bcnlat, Bcncar, Bcnisd, Bcnsaw, Bcnspp,
    // Auxiliary sub-objects
    Topmar, Daymar, Notmrk, Vaaton,
}

/// Relation role: whether this record is the primary drawn entity or a
/// satellite supplying extra attributes to a master.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reln {
    Master,
    Slave,
}

/// Geometry primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prim {
    Point,
    Line,
    Area,
}

/// A geographic position in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Feature geometry: primitive kind, centroid, extents and the raw
/// point sequence (outer ring for areas).
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub prim: Prim,
    pub centre: Position,
    /// Path length in nautical miles (lines and area perimeters).
    pub length: f64,
    /// Enclosed area in square nautical miles (areas only).
    pub area: f64,
    pub points: Vec<Position>,
    bbox: Bounds,
}

impl Geometry {
    pub fn point(pos: Position) -> Self {
        Self {
            prim: Prim::Point,
            centre: pos,
            length: 0.0,
            area: 0.0,
            points: vec![pos],
            bbox: point_bounds(pos),
        }
    }

    pub fn line(points: Vec<Position>) -> Self {
        let centre = midpoint(&points);
        let length = path_length_nm(&points);
        let bbox = ring_bounds(&points);
        Self {
            prim: Prim::Line,
            centre,
            length,
            area: 0.0,
            points,
            bbox,
        }
    }

    pub fn area(ring: Vec<Position>) -> Self {
        let centre = midpoint(&ring);
        let length = path_length_nm(&ring);
        let area = ring_area_nm2(&ring);
        let bbox = ring_bounds(&ring);
        Self {
            prim: Prim::Area,
            centre,
            length,
            area,
            points: ring,
            bbox,
        }
    }

    /// Bounding box in Mercator radians, for tile pre-filtering.
    pub fn bounds(&self) -> Bounds {
        self.bbox
    }
}

fn point_bounds(p: Position) -> Bounds {
    let y = geo::mercator_y(p.lat);
    Bounds::new(y, p.lon, y, p.lon)
}

fn ring_bounds(points: &[Position]) -> Bounds {
    let mut b = Bounds::new(PI, PI, -PI, -PI);
    for p in points {
        let y = geo::mercator_y(p.lat);
        b.south = b.south.min(y);
        b.north = b.north.max(y);
        b.west = b.west.min(p.lon);
        b.east = b.east.max(p.lon);
    }
    b
}

fn midpoint(points: &[Position]) -> Position {
    if points.is_empty() {
        return Position::new(0.0, 0.0);
    }
    let n = points.len() as f64;
    let lat = points.iter().map(|p| p.lat).sum::<f64>() / n;
    let lon = points.iter().map(|p| p.lon).sum::<f64>() / n;
    Position::new(lat, lon)
}

/// Path length in nautical miles (one NM = one minute of arc).
fn path_length_nm(points: &[Position]) -> f64 {
    points
        .windows(2)
        .map(|w| {
            let dlat = w[1].lat - w[0].lat;
            let dlon = (w[1].lon - w[0].lon) * w[0].lat.cos();
            (dlat * dlat + dlon * dlon).sqrt()
        })
        .sum::<f64>()
        .to_degrees()
        * 60.0
}

/// Shoelace area of the ring, in square nautical miles.
fn ring_area_nm2(ring: &[Position]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let cos_mid = midpoint(ring).lat.cos();
    let mut sum = 0.0;
    for w in ring.windows(2) {
        sum += w[0].lon * w[1].lat - w[1].lon * w[0].lat;
    }
    let (first, last) = (ring[0], ring[ring.len() - 1]);
    sum += last.lon * first.lat - first.lon * last.lat;
    let nm_per_rad = 60.0 * 180.0 / PI;
    (sum.abs() / 2.0) * cos_mid * nm_per_rad * nm_per_rad
}

/// Attribute map for one object occurrence.
pub type AttMap = BTreeMap<Att, AttVal>;

/// Object map: occurrence index to attribute map, ordered so multi-notice
/// layout is deterministic.
pub type ObjTab = BTreeMap<u32, AttMap>;

/// One chart object instance.
#[derive(Debug, Clone)]
pub struct Feature {
    pub obj: Obj,
    pub reln: Reln,
    pub geom: Geometry,
    /// The feature's own attributes.
    pub atts: AttMap,
    /// Attribute sets borrowed from associated sub-objects, keyed by
    /// object type then occurrence index. The feature's own type is
    /// present at index 0 mirroring `atts`.
    pub objs: HashMap<Obj, ObjTab>,
}

impl Feature {
    pub fn new(obj: Obj, reln: Reln, geom: Geometry) -> Self {
        let mut objs = HashMap::new();
        objs.insert(obj, ObjTab::from([(0, AttMap::new())]));
        Self {
            obj,
            reln,
            geom,
            atts: AttMap::new(),
            objs,
        }
    }

    /// Sets one of the feature's own attributes (builder style). Also
    /// mirrored into the primary object map so scoped lookups find it.
    pub fn attribute(mut self, att: Att, val: AttVal) -> Self {
        self.atts.insert(att, val.clone());
        self.objs
            .entry(self.obj)
            .or_default()
            .entry(0)
            .or_default()
            .insert(att, val);
        self
    }

    /// Attaches an associated sub-object occurrence (builder style).
    pub fn sub_object(mut self, obj: Obj, atts: AttMap) -> Self {
        let tab = self.objs.entry(obj).or_default();
        let idx = tab.keys().next_back().map_or(0, |k| k + 1);
        tab.insert(idx, atts);
        self
    }
}

/// Raised when the underlying feature index was mutated while a render
/// pass was iterating it; the pass must be abandoned and retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceConflict;

/// Provider of master features by object type.
///
/// Implementations back the rule engine; [`ChartSnapshot`] is the owned,
/// immutable implementation that can never conflict.
pub trait FeatureSource {
    /// Visits every MASTER feature of the given object type. Subordinate
    /// records are never yielded; they reach the rules only as attribute
    /// sources on their masters.
    fn for_each_master(
        &self,
        obj: Obj,
        visit: &mut dyn FnMut(&Feature),
    ) -> Result<(), SourceConflict>;
}

/// An immutable, indexed snapshot of the loaded feature set.
#[derive(Debug, Default)]
pub struct ChartSnapshot {
    features: Vec<Feature>,
    index: HashMap<Obj, Vec<usize>>,
}

impl ChartSnapshot {
    pub fn new(features: Vec<Feature>) -> Self {
        let mut index: HashMap<Obj, Vec<usize>> = HashMap::new();
        for (i, f) in features.iter().enumerate() {
            index.entry(f.obj).or_default().push(i);
        }
        Self { features, index }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// A borrowed view restricted to features whose bounding box
    /// intersects `bounds` (tile bounds padded by the mercator border).
    pub fn clipped(&self, bounds: Bounds) -> Clipped<'_> {
        Clipped {
            snapshot: self,
            bounds,
        }
    }
}

impl FeatureSource for ChartSnapshot {
    fn for_each_master(
        &self,
        obj: Obj,
        visit: &mut dyn FnMut(&Feature),
    ) -> Result<(), SourceConflict> {
        if let Some(ids) = self.index.get(&obj) {
            for &i in ids {
                let f = &self.features[i];
                if f.reln == Reln::Master {
                    visit(f);
                }
            }
        }
        Ok(())
    }
}

/// Bounds-filtered view over a [`ChartSnapshot`].
pub struct Clipped<'a> {
    snapshot: &'a ChartSnapshot,
    bounds: Bounds,
}

impl FeatureSource for Clipped<'_> {
    fn for_each_master(
        &self,
        obj: Obj,
        visit: &mut dyn FnMut(&Feature),
    ) -> Result<(), SourceConflict> {
        self.snapshot.for_each_master(obj, &mut |f| {
            if f.geom.bounds().intersects(&self.bounds) {
                visit(f);
            }
        })
    }
}
