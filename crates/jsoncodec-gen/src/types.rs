//! Lowering from the schema [`Shape`] model to generated Rust types.

use std::collections::HashSet;

use jsoncodec_schema::{Primitive, Shape};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Whether `shape` (recursively) is generatable: every [`Shape::Nested`]
/// name must resolve to a record declared in the same file, and no
/// sub-shape may be [`Shape::Unsupported`]. `SPEC_FULL.md` §3.1: an
/// unresolvable or otherwise unsupported shape is omitted silently, not a
/// hard error.
pub(crate) fn is_supported(shape: &Shape, known_records: &HashSet<&str>) -> bool {
    match shape {
        Shape::Primitive(_) => true,
        Shape::Nested(name) => known_records.contains(name.as_str()),
        Shape::Array(elem) => is_supported(elem, known_records),
        Shape::Unsupported => false,
    }
}

fn primitive_type(p: Primitive) -> TokenStream {
    match p {
        Primitive::String => quote!(String),
        Primitive::Int32 => quote!(i32),
        Primitive::Int64 => quote!(i64),
        Primitive::Uint32 => quote!(u32),
        Primitive::Uint64 => quote!(u64),
        Primitive::Float32 => quote!(f32),
        Primitive::Float64 => quote!(f64),
        Primitive::Bool => quote!(bool),
    }
}

/// The Rust type a shape lowers to. `box_nested` controls whether a
/// [`Shape::Nested`] lowers to `Option<Box<Name>>` (struct field position,
/// where a missing key or a JSON `null` both mean "absent") or bare `Name`
/// (array element position, where `Vec` already provides the indirection
/// and array elements are never individually nullable) — `SPEC_FULL.md`
/// §4.3.
pub(crate) fn rust_type(shape: &Shape, box_nested: bool) -> TokenStream {
    match shape {
        Shape::Primitive(p) => primitive_type(*p),
        Shape::Nested(name) => {
            let ident = format_ident!("{name}");
            if box_nested {
                quote!(Option<Box<#ident>>)
            } else {
                quote!(#ident)
            }
        }
        Shape::Array(elem) => {
            let inner = rust_type(elem, false);
            quote!(Vec<#inner>)
        }
        Shape::Unsupported => unreachable!("unsupported shapes are filtered out before codegen"),
    }
}
