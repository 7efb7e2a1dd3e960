//! Emits the `<Name>Decoder` for one record.

use jsoncodec_schema::{Primitive, Record, Shape};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::encode::GenField;
use crate::types::rust_type;

pub(crate) fn generate_decoder(record: &Record, fields: &[GenField<'_>]) -> TokenStream {
    let name = format_ident!("{}", record.name);
    let decoder_name = format_ident!("{}Decoder", record.name);

    // Nested fields lower to `Option<Box<Name>>` directly: a missing key and
    // an explicit JSON `null` both collapse to `None`, so the local needs no
    // extra `Option` wrapper layered on top (that would force a spurious
    // `Some(None)` vs `None` distinction the field never observes).
    let locals = fields.iter().map(|f| {
        let ident = &f.ident;
        if let Shape::Nested(nested) = &f.field.shape {
            let nested_ident = format_ident!("{nested}");
            quote! { let mut #ident: Option<Box<#nested_ident>> = None; }
        } else {
            let ty = rust_type(&f.field.shape, true);
            quote! { let mut #ident: Option<#ty> = None; }
        }
    });

    let arms = fields.iter().map(|f| {
        let key = &f.field.wire_key;
        let ident = &f.ident;
        if let Shape::Nested(nested) = &f.field.shape {
            let nested_decoder = format_ident!("{nested}Decoder");
            quote! {
                #key => {
                    #ident = s.decode_nested(#nested_decoder::decode_raw)?.map(Box::new);
                }
            }
        } else {
            let decode_value = emit_decode_value(&f.field.shape);
            quote! {
                #key => { #ident = Some(#decode_value); }
            }
        }
    });

    let assigns = fields.iter().map(|f| {
        let ident = &f.ident;
        if matches!(f.field.shape, Shape::Nested(_)) {
            // A missing key and an explicit `null` both leave `#ident` as
            // `None` already; no `unwrap_or_default` needed (and none
            // wanted — that would recurse into the nested type's `Default`).
            quote! { #ident: #ident }
        } else {
            quote! { #ident: #ident.unwrap_or_default() }
        }
    });

    quote! {
        pub struct #decoder_name<R: ::jsoncodec_runtime::Source> {
            scanner: ::jsoncodec_runtime::Scanner<R>,
        }

        impl<R: ::jsoncodec_runtime::Source> #decoder_name<R> {
            /// Owns a new `Scanner` wrapping `source` (`spec.md` §4.3,
            /// "Constructors from a byte source").
            pub fn new(source: R) -> Self {
                Self {
                    scanner: ::jsoncodec_runtime::Scanner::new(source),
                }
            }

            /// Decodes one value off the owned scanner.
            pub fn decode(&mut self) -> Result<#name, ::jsoncodec_runtime::ScanError<R::Error>> {
                Self::decode_raw(&mut self.scanner)
            }

            /// Decodes one value off a caller-owned, possibly shared
            /// scanner. Nested decoders call this so they don't consume
            /// more than their own value (`spec.md` §9 "Ownership
            /// patterns").
            pub fn decode_raw(
                s: &mut ::jsoncodec_runtime::Scanner<R>,
            ) -> Result<#name, ::jsoncodec_runtime::ScanError<R::Error>> {
                #(#locals)*
                s.decode_object(|s, key| {
                    match key {
                        #(#arms)*
                        _ => s.skip_value()?,
                    }
                    Ok(())
                })?;
                Ok(#name {
                    #(#assigns,)*
                })
            }
        }
    }
}

/// Emits the expression that decodes one value (a field, or an array
/// element) of the given shape off `s`. [`Shape::Nested`] at field
/// position is handled directly in [`generate_decoder`] (its
/// `Option<Box<Name>>` lowering needs [`Scanner::decode_nested`]'s
/// null-check, which this helper has no way to express); this function
/// only ever sees a [`Shape::Nested`] as an array element, where the
/// element type is bare `Name` per [`rust_type`]'s `box_nested = false`.
///
/// [`Scanner::decode_nested`]: jsoncodec_runtime::Scanner::decode_nested
fn emit_decode_value(shape: &Shape) -> TokenStream {
    match shape {
        Shape::Primitive(Primitive::String) => quote! { s.read_string()? },
        Shape::Primitive(Primitive::Int32) => quote! { s.read_int()? },
        Shape::Primitive(Primitive::Int64) => quote! { s.read_int64()? },
        Shape::Primitive(Primitive::Uint32) => quote! { s.read_uint()? },
        Shape::Primitive(Primitive::Uint64) => quote! { s.read_uint64()? },
        Shape::Primitive(Primitive::Float32) => quote! { s.read_float32()? },
        Shape::Primitive(Primitive::Float64) => quote! { s.read_float64()? },
        Shape::Primitive(Primitive::Bool) => quote! { s.read_bool()? },
        Shape::Nested(name) => {
            let decoder_name = format_ident!("{name}Decoder");
            quote! { #decoder_name::decode_raw(s)? }
        }
        Shape::Array(elem) => {
            let elem_ty = rust_type(elem, false);
            let elem_decode = emit_decode_value(elem);
            quote! {
                s.decode_array::<#elem_ty>(|s| Ok(#elem_decode))?
            }
        }
        Shape::Unsupported => unreachable!("unsupported shapes are filtered out before codegen"),
    }
}
