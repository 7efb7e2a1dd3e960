//! Emits the plain data struct and the `<Name>Encoder` for one record.

use std::collections::HashSet;

use jsoncodec_schema::{Field, Primitive, Record, Shape};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::types::{is_supported, rust_type};

/// A field that survived filtering: has a generatable shape and is not
/// `@key("ignore")`d.
pub(crate) struct GenField<'a> {
    pub field: &'a Field,
    pub ident: proc_macro2::Ident,
}

pub(crate) fn included_fields<'a>(
    record: &'a Record,
    known_records: &HashSet<&str>,
) -> Vec<GenField<'a>> {
    record
        .fields
        .iter()
        .filter(|f| !f.ignored && is_supported(&f.shape, known_records))
        .map(|f| GenField {
            field: f,
            ident: format_ident!("{}", f.declared_name),
        })
        .collect()
}

pub(crate) fn generate_struct(record: &Record, fields: &[GenField<'_>]) -> TokenStream {
    let name = format_ident!("{}", record.name);
    let field_defs = fields.iter().map(|f| {
        let ident = &f.ident;
        let ty = rust_type(&f.field.shape, true);
        quote! { pub #ident: #ty }
    });
    quote! {
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct #name {
            #(#field_defs,)*
        }
    }
}

pub(crate) fn generate_encoder(record: &Record, fields: &[GenField<'_>]) -> TokenStream {
    let name = format_ident!("{}", record.name);
    let encoder_name = format_ident!("{}Encoder", record.name);

    let mut body = Vec::new();
    for (i, f) in fields.iter().enumerate() {
        if i > 0 {
            body.push(quote! { w.write_byte(b',')?; });
        }
        let key = &f.field.wire_key;
        let ident = &f.ident;
        let value_expr = quote! { &value.#ident };
        let encode_value = emit_encode_value(&f.field.shape, value_expr, true);
        body.push(quote! {
            w.write_str(#key)?;
            w.write_byte(b':')?;
            #encode_value
        });
    }

    quote! {
        pub struct #encoder_name<S: ::jsoncodec_runtime::Sink> {
            writer: ::jsoncodec_runtime::Writer<S>,
        }

        impl<S: ::jsoncodec_runtime::Sink> #encoder_name<S> {
            /// Owns a new `Writer` wrapping `sink`; `encode` flushes it once
            /// the value is written (`spec.md` §4.3, "Constructors from a
            /// sink").
            pub fn new(sink: S) -> Self {
                Self {
                    writer: ::jsoncodec_runtime::Writer::new(sink),
                }
            }

            /// Encodes `value` and flushes the owned writer.
            pub fn encode(
                &mut self,
                value: &#name,
            ) -> Result<(), ::jsoncodec_runtime::WriterError<S::Error>> {
                Self::encode_raw(value, &mut self.writer)?;
                self.writer.flush()
            }

            /// Consumes self, returning the underlying sink.
            pub fn into_inner(self) -> Result<S, ::jsoncodec_runtime::WriterError<S::Error>> {
                self.writer.into_inner()
            }

            /// Encodes `value` into a caller-owned, possibly shared writer
            /// without flushing it. Nested encoders call this so a parent's
            /// flush isn't preempted (`spec.md` §9 "Ownership patterns").
            pub fn encode_raw(
                value: &#name,
                w: &mut ::jsoncodec_runtime::Writer<S>,
            ) -> Result<(), ::jsoncodec_runtime::WriterError<S::Error>> {
                w.write_byte(b'{')?;
                #(#body)*
                w.write_byte(b'}')?;
                Ok(())
            }
        }
    }
}

/// Emits the statement(s) that encode one value (a field, or an array
/// element) of the given shape. `value_expr` must evaluate to a reference
/// of the shape's lowered type. `boxed` mirrors [`rust_type`]'s
/// `box_nested`: `true` at field position, where [`Shape::Nested`] lowers
/// to `Option<Box<Name>>` and an absent value must emit `null`; `false`
/// inside an array, where elements are never individually nullable.
fn emit_encode_value(shape: &Shape, value_expr: TokenStream, boxed: bool) -> TokenStream {
    match shape {
        Shape::Primitive(Primitive::String) => quote! { w.write_str(#value_expr)?; },
        Shape::Primitive(Primitive::Int32) => quote! { w.write_int(*#value_expr)?; },
        Shape::Primitive(Primitive::Int64) => quote! { w.write_int64(*#value_expr)?; },
        Shape::Primitive(Primitive::Uint32) => quote! { w.write_uint(*#value_expr)?; },
        Shape::Primitive(Primitive::Uint64) => quote! { w.write_uint64(*#value_expr)?; },
        Shape::Primitive(Primitive::Float32) => quote! { w.write_float32(*#value_expr)?; },
        Shape::Primitive(Primitive::Float64) => quote! { w.write_float64(*#value_expr)?; },
        Shape::Primitive(Primitive::Bool) => quote! { w.write_bool(*#value_expr)?; },
        Shape::Nested(name) => {
            let encoder_name = format_ident!("{name}Encoder");
            if boxed {
                quote! {
                    match #value_expr {
                        Some(nested) => #encoder_name::encode_raw(nested, w)?,
                        None => w.write_null()?,
                    }
                }
            } else {
                quote! { #encoder_name::encode_raw(#value_expr, w)?; }
            }
        }
        Shape::Array(elem) => {
            let elem_encode = emit_encode_value(elem, quote! { elem }, false);
            quote! {
                w.write_byte(b'[')?;
                for (i, elem) in #value_expr.iter().enumerate() {
                    if i > 0 {
                        w.write_byte(b',')?;
                    }
                    #elem_encode
                }
                w.write_byte(b']')?;
            }
        }
        Shape::Unsupported => unreachable!("unsupported shapes are filtered out before codegen"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use jsoncodec_schema::{Field, Primitive, Record, Shape};

    use super::*;

    fn field(name: &str, shape: Shape) -> Field {
        Field {
            declared_name: name.to_string(),
            wire_key: name.to_string(),
            shape,
            ignored: false,
        }
    }

    /// Snapshots the plain struct the generator emits for a record with two
    /// primitive fields, formatted through `syn`/`prettyplease` exactly as
    /// [`crate::generate`] does. Primitive-only fields need no
    /// `known_records` set, so this is independent of nested-shape
    /// resolution.
    #[test]
    fn struct_generation_matches_expected_shape() {
        let record = Record {
            name: "Person".to_string(),
            fields: vec![
                field("name", Shape::Primitive(Primitive::String)),
                field("age", Shape::Primitive(Primitive::Int32)),
            ],
        };
        let known = HashSet::new();
        let fields = included_fields(&record, &known);
        let tokens = generate_struct(&record, &fields);
        let ast: syn::File = syn::parse2(tokens).unwrap();
        let formatted = prettyplease::unparse(&ast);
        insta::assert_snapshot!(formatted, @r###"
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct Person {
            pub name: String,
            pub age: i32,
        }
        "###);
    }
}
