//! A canvas that records draw calls instead of painting.
//!
//! Used by rule-engine tests to assert which symbols, labels and line
//! styles a feature produces without decoding pixels.

use super::canvas::{
    ChartCanvas, Delta, FontSpec, LabelFrame, LineStyle, Rgba, Scheme, SymbolId,
};
use crate::feature::{Feature, Obj, UniHlu};

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    LineVector {
        obj: Obj,
        style: LineStyle,
    },
    LineSymbols {
        obj: Obj,
        chain: SymbolId,
    },
    FillPattern {
        obj: Obj,
        pattern: SymbolId,
    },
    Symbol {
        obj: Obj,
        symbol: SymbolId,
        scheme: Scheme,
        delta: Option<Delta>,
        scale: f64,
    },
    Cluster {
        obj: Obj,
        symbols: Vec<SymbolId>,
    },
    LabelText {
        obj: Obj,
        text: String,
        colour: Rgba,
        framed: bool,
    },
    LineText {
        obj: Obj,
        text: String,
    },
    LineCircle {
        obj: Obj,
        radius: f64,
    },
    RasterPixel {
        obj: Obj,
        colour: Rgba,
    },
}

/// Canvas double collecting [`DrawOp`]s in call order.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded symbols, in draw order.
    pub fn symbols(&self) -> Vec<SymbolId> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Symbol { symbol, .. } => Some(*symbol),
                _ => None,
            })
            .collect()
    }

    /// All recorded label strings, in draw order.
    pub fn labels(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::LabelText { text, .. } => Some(text.as_str()),
                DrawOp::LineText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains_symbol(&self, symbol: SymbolId) -> bool {
        self.symbols().contains(&symbol)
    }
}

impl ChartCanvas for RecordingCanvas {
    fn line_vector(&mut self, feature: &Feature, style: &LineStyle) {
        self.ops.push(DrawOp::LineVector {
            obj: feature.obj,
            style: style.clone(),
        });
    }

    fn line_symbols(
        &mut self,
        feature: &Feature,
        chain: SymbolId,
        _space: f64,
        _cap: Option<SymbolId>,
        _alternate: Option<SymbolId>,
        _ratio: u32,
        _colour: Rgba,
    ) {
        self.ops.push(DrawOp::LineSymbols {
            obj: feature.obj,
            chain,
        });
    }

    fn fill_pattern(&mut self, feature: &Feature, pattern: SymbolId) {
        self.ops.push(DrawOp::FillPattern {
            obj: feature.obj,
            pattern,
        });
    }

    fn symbol(
        &mut self,
        feature: &Feature,
        symbol: SymbolId,
        scheme: &Scheme,
        delta: Option<Delta>,
        scale: f64,
    ) {
        self.ops.push(DrawOp::Symbol {
            obj: feature.obj,
            symbol,
            scheme: scheme.clone(),
            delta,
            scale,
        });
    }

    fn cluster(&mut self, feature: &Feature, symbols: &[SymbolId]) {
        self.ops.push(DrawOp::Cluster {
            obj: feature.obj,
            symbols: symbols.to_vec(),
        });
    }

    fn label_text(
        &mut self,
        feature: &Feature,
        text: &str,
        _font: FontSpec,
        colour: Rgba,
        frame: Option<LabelFrame>,
        _delta: Delta,
    ) {
        self.ops.push(DrawOp::LabelText {
            obj: feature.obj,
            text: text.to_string(),
            colour,
            framed: frame.is_some(),
        });
    }

    fn line_text(
        &mut self,
        feature: &Feature,
        text: &str,
        _font: FontSpec,
        _colour: Rgba,
        _offset: f64,
    ) {
        self.ops.push(DrawOp::LineText {
            obj: feature.obj,
            text: text.to_string(),
        });
    }

    fn line_circle(&mut self, feature: &Feature, _style: &LineStyle, radius: f64, _units: UniHlu) {
        self.ops.push(DrawOp::LineCircle {
            obj: feature.obj,
            radius,
        });
    }

    fn raster_pixel(&mut self, feature: &Feature, _size: f64, colour: Rgba) {
        self.ops.push(DrawOp::RasterPixel {
            obj: feature.obj,
            colour,
        });
    }
}
