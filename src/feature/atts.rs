//! Typed attribute accessors.
//!
//! A thin pure-function layer over a feature's attribute maps, invoked on
//! every rule decision. Lookups are scoped to an associated object type
//! (supporting the "look at my topmark's attributes" pattern) and never
//! fail: absent attributes fall back to the domain's `Unknown` sentinel.

use super::values::{Att, AttVal, AttrEnum};
use super::{AttMap, Feature, Obj};

impl Feature {
    /// The attribute map of occurrence `idx` of the given associated
    /// object type, if present.
    pub fn object_atts(&self, obj: Obj, idx: u32) -> Option<&AttMap> {
        self.objs.get(&obj).and_then(|tab| tab.get(&idx))
    }

    /// Raw attribute value scoped to an associated object type (first
    /// occurrence).
    pub fn attribute_value(&self, obj: Obj, att: Att) -> Option<&AttVal> {
        self.object_atts(obj, 0).and_then(|atts| atts.get(&att))
    }

    /// String attribute, empty when absent or not a string.
    pub fn attribute_str(&self, obj: Obj, att: Att) -> &str {
        self.attribute_value(obj, att)
            .and_then(AttVal::as_str)
            .unwrap_or("")
    }

    /// Numeric attribute, `None` when absent or not numeric.
    pub fn attribute_num(&self, obj: Obj, att: Att) -> Option<f64> {
        self.attribute_value(obj, att).and_then(AttVal::as_num)
    }

    /// First enumerated token of a multi-valued attribute, narrowed to
    /// the domain `T`; the `Unknown` sentinel when absent or mistyped.
    pub fn attribute_enum<T: AttrEnum>(&self, obj: Obj, att: Att) -> T {
        self.attribute_value(obj, att)
            .and_then(AttVal::as_enums)
            .and_then(|vs| vs.first())
            .and_then(|&v| T::try_from(v).ok())
            .unwrap_or(T::UNKNOWN)
    }

    /// All enumerated tokens of a multi-valued attribute narrowed to `T`;
    /// a one-element `Unknown` list when absent so callers can always
    /// index the head.
    pub fn attribute_list<T: AttrEnum>(&self, obj: Obj, att: Att) -> Vec<T> {
        let vals: Vec<T> = self
            .attribute_value(obj, att)
            .and_then(AttVal::as_enums)
            .map(|vs| vs.iter().filter_map(|&v| T::try_from(v).ok()).collect())
            .unwrap_or_default();
        if vals.is_empty() {
            vec![T::UNKNOWN]
        } else {
            vals
        }
    }

    /// Whether the attribute is present on the first occurrence of the
    /// associated object type.
    pub fn has_attribute(&self, obj: Obj, att: Att) -> bool {
        self.attribute_value(obj, att).is_some()
    }

    /// Equality/containment test tolerant of the three value shapes.
    pub fn attribute_equals(&self, obj: Obj, att: Att, probe: &AttVal) -> bool {
        self.attribute_value(obj, att)
            .is_some_and(|v| v.matches(probe))
    }

    /// Whether the multi-valued attribute contains the given token.
    pub fn attribute_includes<T: AttrEnum>(&self, obj: Obj, att: Att, v: T) -> bool {
        self.attribute_value(obj, att)
            .and_then(AttVal::as_enums)
            .is_some_and(|vs| vs.contains(&v.into()))
    }

    /// Whether an associated object of the given type is attached.
    pub fn has_object(&self, obj: Obj) -> bool {
        self.objs.contains_key(&obj)
    }

    /// The feature's display name, from its own attributes or the primary
    /// object map. XML entity escapes from the source data are undone.
    pub fn name(&self) -> Option<String> {
        self.atts
            .get(&Att::ObjNam)
            .or_else(|| {
                self.object_atts(self.obj, 0)
                    .and_then(|atts| atts.get(&Att::ObjNam))
            })
            .and_then(AttVal::as_str)
            .map(|s| s.replace("&quot;", "\""))
    }
}
