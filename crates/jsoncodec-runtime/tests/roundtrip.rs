//! End-to-end writer/scanner round-trip tests, mirroring the scenarios in
//! `spec.md` §8.

use std::collections::BTreeMap;
use std::io::Cursor;

use jsoncodec_runtime::{DynValue, Scanner, TokenKind, Writer};

fn write_to_string(f: impl FnOnce(&mut Writer<Vec<u8>>)) -> String {
    let mut w = Writer::new(Vec::<u8>::new());
    f(&mut w);
    w.flush().unwrap();
    String::from_utf8(w.into_inner().unwrap()).unwrap()
}

#[test]
fn scenario_escaped_string_with_control_and_unicode() {
    let out = write_to_string(|w| w.write_str("foo\t\n\r\"大").unwrap());
    assert_eq!(out, "\"foo\\u0009\\n\\r\\\"大\"");
}

#[test]
fn scenario_unquoted_number_coerces_string_read_to_empty() {
    let mut scanner = Scanner::new(Cursor::new(b"12".to_vec()));
    let s = scanner.read_string().unwrap();
    assert_eq!(s, "");
}

#[test]
fn empty_string_round_trips() {
    let out = write_to_string(|w| w.write_str("").unwrap());
    let mut scanner = Scanner::new(Cursor::new(out.into_bytes()));
    assert_eq!(scanner.read_string().unwrap(), "");
}

#[test]
fn empty_array_encodes_to_brackets() {
    let out = write_to_string(|w| {
        w.write_byte(b'[').unwrap();
        w.write_byte(b']').unwrap();
    });
    assert_eq!(out, "[]");
    let mut scanner = Scanner::new(Cursor::new(out.into_bytes()));
    let elems: Vec<i64> = scanner.decode_array(|s| s.read_int64()).unwrap();
    assert!(elems.is_empty());
}

#[test]
fn array_of_ints_round_trips() {
    let out = write_to_string(|w| {
        w.write_byte(b'[').unwrap();
        w.write_int64(1).unwrap();
        w.write_byte(b',').unwrap();
        w.write_int64(2).unwrap();
        w.write_byte(b',').unwrap();
        w.write_int64(3).unwrap();
        w.write_byte(b']').unwrap();
    });
    let mut scanner = Scanner::new(Cursor::new(out.into_bytes()));
    let elems: Vec<i64> = scanner.decode_array(|s| s.read_int64()).unwrap();
    assert_eq!(elems, vec![1, 2, 3]);
}

#[test]
fn large_unicode_string_round_trips_across_flush_boundaries() {
    let s = "大".repeat(10_000);
    let out = write_to_string(|w| w.write_str(&s).unwrap());
    let mut scanner = Scanner::new(Cursor::new(out.into_bytes()));
    assert_eq!(scanner.read_string().unwrap(), s);
}

#[test]
fn unscan_then_scan_yields_same_token() {
    let mut scanner = Scanner::new(Cursor::new(b"{}".to_vec()));
    let tok = scanner.scan().unwrap();
    assert_eq!(tok.kind, TokenKind::LBrace);
    scanner.unscan(tok.clone());
    let replayed = scanner.scan().unwrap();
    assert_eq!(replayed, tok);
}

#[test]
fn unknown_keys_are_skipped_not_errors() {
    let input = br#"{"known":1,"unknown":{"nested":[1,2,3]},"known2":2}"#;
    let mut scanner = Scanner::new(Cursor::new(input.to_vec()));
    scanner.scan().unwrap(); // '{'
    let mut seen = Vec::new();
    loop {
        let tok = scanner.scan().unwrap();
        if tok.kind == TokenKind::RBrace {
            break;
        }
        if tok.kind == TokenKind::Comma {
            continue;
        }
        let key = tok.text;
        scanner.scan().unwrap(); // ':'
        if key == "unknown" {
            scanner.skip_value().unwrap();
        } else {
            let v = scanner.read_int64().unwrap();
            seen.push((key, v));
        }
    }
    assert_eq!(seen, vec![("known".to_string(), 1), ("known2".to_string(), 2)]);
}

#[test]
fn dynamic_map_round_trip() {
    let mut inner = BTreeMap::new();
    inner.insert("Name".to_string(), DynValue::Str("Jane".to_string()));
    inner.insert("Age".to_string(), DynValue::F64(60.0));
    let mut m = BTreeMap::new();
    m.insert("child".to_string(), DynValue::Map(inner));
    m.insert("flag".to_string(), DynValue::Bool(true));
    m.insert("nil".to_string(), DynValue::Null);

    let out = write_to_string(|w| w.write_map(&m).unwrap());
    let mut scanner = Scanner::new(Cursor::new(out.into_bytes()));
    let decoded = scanner.read_map().unwrap().unwrap();
    assert_eq!(decoded, m);
}

#[test]
fn null_map_decodes_to_none() {
    let mut scanner = Scanner::new(Cursor::new(b"null".to_vec()));
    assert_eq!(scanner.read_map().unwrap(), None);
}

#[test]
fn every_control_byte_round_trips() {
    let s: String = (0x00u8..0x20).map(|b| b as char).collect();
    let out = write_to_string(|w| w.write_str(&s).unwrap());
    let mut scanner = Scanner::new(Cursor::new(out.into_bytes()));
    assert_eq!(scanner.read_string().unwrap(), s);
}

#[test]
fn number_with_exponent_lexes_as_single_token() {
    let mut scanner = Scanner::new(Cursor::new(b"1.5e10".to_vec()));
    let tok = scanner.scan().unwrap();
    assert_eq!(tok.kind, TokenKind::Number);
    assert_eq!(tok.text, "1.5e10");
    assert_eq!(tok.text.parse::<f64>().unwrap(), 1.5e10);
}

#[test]
fn float_round_trips_shortest_form() {
    let out = write_to_string(|w| w.write_float64(19380.1312).unwrap());
    let mut scanner = Scanner::new(Cursor::new(out.into_bytes()));
    assert_eq!(scanner.read_float64().unwrap(), 19380.1312);
}
