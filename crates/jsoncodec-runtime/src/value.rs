//! The dynamic value used by [`crate::Writer::write_map`] and
//! [`crate::Scanner::read_map`].
//!
//! This mirrors the teacher's own `Value`/`Map` split (a `BTreeMap`-backed
//! object type plus a small closed sum type of JSON scalar kinds), trimmed to
//! the variants `spec.md` §4.1/§4.2.5 actually calls for: no array variant,
//! since array values are explicitly unsupported in the dynamic map paths.

use std::collections::BTreeMap;

/// An object value for the dynamic (non-generated) map read/write paths.
pub type DynMap = BTreeMap<String, DynValue>;

/// A JSON scalar or nested object, as produced/consumed by the dynamic map
/// paths (`write_map`/`read_map`).
///
/// Field order on encode is the map's iteration order (a `BTreeMap` iterates
/// in key order, which satisfies `spec.md`'s "iteration order of `m`"
/// without requiring insertion order to be tracked).
#[derive(Debug, Clone, PartialEq)]
pub enum DynValue {
    /// `null`.
    Null,
    /// `true`/`false`.
    Bool(bool),
    /// Any JSON number, decoded as 64-bit float per `spec.md` §4.2.5
    /// ("integer-typed numbers upcast").
    F64(f64),
    /// A JSON string.
    Str(String),
    /// A nested object.
    Map(DynMap),
}

impl From<bool> for DynValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for DynValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<String> for DynValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<DynMap> for DynValue {
    fn from(v: DynMap) -> Self {
        Self::Map(v)
    }
}
