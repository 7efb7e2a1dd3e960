//! Type-directed generator: turns a parsed schema [`jsoncodec_schema::File`]
//! into formatted Rust source for a per-record encoder and decoder.
//!
//! [`generate`] (or [`generate_from_source`], which also runs the
//! `.jsonrec` parser) is the only entry point
//! [`jsoncodec_cli`](https://docs.rs/jsoncodec-cli) calls; everything else in
//! this crate is generation machinery private to the crate.
//!
//! Per `spec.md` §6.1 a source file `foo.<ext>` becomes sibling files
//! `foo_encoder.<ext>` and `foo_decoder.<ext>`. `spec.md` assumes the record
//! struct itself is external, pre-existing code; this workspace's
//! `.jsonrec` front end has no such externally-declared type, so the
//! generator emits one plain data struct per record (`SPEC_FULL.md` §4.3).
//! That struct is emitted once, in the encoder file, and the decoder file
//! imports it with `use super::<module_stem>_encoder::{...};` — the
//! convention this generator expects of its caller is that the two sibling
//! files are declared as submodules of a common parent (e.g. `#[path =
//! "foo_encoder.rs"] mod foo_encoder;` and `#[path = "foo_decoder.rs"] mod
//! foo_decoder;` side by side), so `super` from inside the decoder module
//! reaches that shared parent and finds the sibling encoder module.

mod decode;
mod encode;
mod error;
mod types;

use std::collections::HashSet;

use jsoncodec_schema::{parse_file, File};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

pub use error::GenError;

/// The generated Rust source for one input file.
///
/// `encoder_source` holds one plain struct plus one `<Name>Encoder` per
/// record; `decoder_source` imports those structs from the encoder module
/// and holds one `<Name>Decoder` per record. Both are already passed
/// through the canonicalizing formatter (`spec.md` §4.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub encoder_source: String,
    pub decoder_source: String,
    /// Number of records the file declared that produced generated code.
    pub record_count: usize,
}

/// Parses `src` (a `.jsonrec` file notionally named `module_stem.jsonrec`,
/// used only to tag parse errors) and generates its encoder/decoder source.
/// `module_stem` is the output file stem the caller intends to write to
/// (`foo` for `foo_encoder.rs`/`foo_decoder.rs`) and is threaded into the
/// decoder's `use super::<module_stem>_encoder::...;` import.
///
/// Returns `Ok(None)` if the file declares zero record types, matching
/// `spec.md` §6.1 ("Files containing zero record types produce no output
/// files").
pub fn generate_from_source(
    path: &str,
    module_stem: &str,
    src: &str,
) -> Result<Option<GeneratedFile>, GenError> {
    let file = parse_file(path, src)?;
    generate(&file, module_stem)
}

/// As [`generate_from_source`], starting from an already-parsed [`File`].
pub fn generate(file: &File, module_stem: &str) -> Result<Option<GeneratedFile>, GenError> {
    if file.records.is_empty() {
        return Ok(None);
    }

    let known_records: HashSet<&str> = file.records.iter().map(|r| r.name.as_str()).collect();

    let mut struct_defs = Vec::with_capacity(file.records.len());
    let mut encoder_impls = Vec::with_capacity(file.records.len());
    let mut decoder_impls = Vec::with_capacity(file.records.len());
    let mut record_idents = Vec::with_capacity(file.records.len());

    for record in &file.records {
        let fields = encode::included_fields(record, &known_records);
        struct_defs.push(encode::generate_struct(record, &fields));
        encoder_impls.push(encode::generate_encoder(record, &fields));
        decoder_impls.push(decode::generate_decoder(record, &fields));
        record_idents.push(format_ident!("{}", record.name));
    }

    let encoder_mod = format_ident!("{module_stem}_encoder");

    let encoder_source = format_tokens(quote! {
        #(#struct_defs)*
        #(#encoder_impls)*
    })?;
    let decoder_source = format_tokens(quote! {
        use super::#encoder_mod::{#(#record_idents),*};
        #(#decoder_impls)*
    })?;

    Ok(Some(GeneratedFile {
        encoder_source,
        decoder_source,
        record_count: file.records.len(),
    }))
}

/// Runs the generator's output through `syn`/`prettyplease` — `spec.md`
/// §4.3's "canonicalizing formatter". A `syn::parse2` failure here means the
/// token stream this crate assembled is not valid Rust: always a generator
/// bug, surfaced as [`GenError::Format`], never a caller-input problem.
fn format_tokens(tokens: TokenStream) -> Result<String, GenError> {
    let ast: syn::File = syn::parse2(tokens)?;
    Ok(prettyplease::unparse(&ast))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> File {
        parse_file("test.jsonrec", src).unwrap()
    }

    #[test]
    fn empty_file_generates_nothing() {
        let file = parse("");
        assert_eq!(generate(&file, "empty").unwrap(), None);
    }

    #[test]
    fn single_record_generates_struct_and_codec() {
        let file = parse("record Person { name: string, age: int32 }");
        let out = generate(&file, "person").unwrap().unwrap();
        assert_eq!(out.record_count, 1);
        assert!(out.encoder_source.contains("pub struct Person"));
        assert!(out.encoder_source.contains("pub struct PersonEncoder"));
        assert!(out.encoder_source.contains("impl<S"));
        assert!(out.encoder_source.contains("PersonEncoder<S>"));
        assert!(out.encoder_source.contains("fn encode_raw"));
        assert!(out.decoder_source.contains("super::person_encoder"));
        assert!(out.decoder_source.contains("Person"));
        assert!(out.decoder_source.contains("pub struct PersonDecoder"));
        assert!(out.decoder_source.contains("fn decode_raw"));
        assert!(!out.decoder_source.contains("pub struct Person {"));
    }

    #[test]
    fn nested_and_ignored_fields_round_trip_through_generation() {
        let file = parse(
            r#"
            record Address { city: string, zip: string }
            record Person {
                name: string,
                address: Address @key("addr"),
                secret: string @key("ignore"),
                tags: [string],
            }
            "#,
        );
        let out = generate(&file, "person").unwrap().unwrap();
        assert_eq!(out.record_count, 2);
        // The ignored field is dropped from both sides.
        assert!(!out.encoder_source.contains("secret"));
        assert!(!out.decoder_source.contains("secret"));
        // The overridden wire key is used, not the declared field name.
        assert!(out.encoder_source.contains("\"addr\""));
        assert!(out.decoder_source.contains("\"addr\""));
        // Nested encode/decode delegates to the nested record's raw codec,
        // and the field itself is optional (a null-check guards it both
        // ways).
        assert!(out.encoder_source.contains("AddressEncoder::encode_raw"));
        assert!(out.decoder_source.contains("AddressDecoder::decode_raw"));
        assert!(out.encoder_source.contains("Option<Box<Address>>"));
        assert!(out.decoder_source.contains("decode_nested"));
    }

    #[test]
    fn unsupported_and_unresolved_shapes_are_omitted_silently() {
        let file = parse("record A { x: string, y: NotDeclared }");
        let out = generate(&file, "a").unwrap().unwrap();
        assert!(out.encoder_source.contains("pub x:"));
        assert!(!out.encoder_source.contains("NotDeclared"));
        assert!(!out.encoder_source.contains("pub y:"));
    }
}
