//! `%g`-style shortest-round-trip float formatting.
//!
//! `ryu` already computes the shortest decimal digit string that round-trips
//! to the original `f64`/`f32`; it only ever lays that string out in fixed
//! notation (no exponent), matching `f64::to_string()`. This module takes
//! that fixed-notation string and re-lays it out either as fixed-point or as
//! `d.ddde±XX` scientific notation, matching
//! `strconv.FormatFloat(v, 'g', -1, 64)`'s shortest-mode layout rule: always
//! scientific outside the `-4..21` exponent band, and inside that band,
//! scientific whenever the number of significant digits (`nd`) exceeds
//! twice the integer-digit count (`dp`) — the point past which fixed
//! notation is longer than scientific (`SPEC_FULL.md` §8.3; see
//! `DESIGN.md` for the worked example, `write_float64(2319123.1921918273)`,
//! that pins this rule down).

/// Formats `v` as shortest-round-trip, `%g`-style text, or returns `None`
/// for non-finite values (callers write `null` for those, the same
/// convention `toctoc`'s JSON serializer uses).
pub fn format_f64(v: f64) -> Option<String> {
    if !v.is_finite() {
        return None;
    }
    let mut buf = ryu::Buffer::new();
    Some(layout(buf.format_finite(v)))
}

/// As [`format_f64`], for `f32`.
pub fn format_f32(v: f32) -> Option<String> {
    if !v.is_finite() {
        return None;
    }
    let mut buf = ryu::Buffer::new();
    Some(layout(buf.format_finite(v)))
}

/// Re-lays out a fixed-notation decimal string (as `ryu` emits) into
/// `%g`-style text.
fn layout(fixed: &str) -> String {
    let (neg, fixed) = match fixed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, fixed),
    };
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed, ""));

    // Significant digits, with leading/trailing zeros stripped, plus the
    // decimal exponent of the first significant digit (`dp` = digits before
    // the point in normal form, i.e. value = 0.d1d2... * 10^dp).
    let mut digits = String::with_capacity(int_part.len() + frac_part.len());
    digits.push_str(int_part);
    digits.push_str(frac_part);
    let first_nonzero = digits.find(|c: char| c != '0');
    let Some(first_nonzero) = first_nonzero else {
        return "0".to_string();
    };
    let last_nonzero = digits.rfind(|c: char| c != '0').unwrap_or(first_nonzero);
    let dp = int_part.len() as i64 - first_nonzero as i64;
    let sig = &digits[first_nonzero..=last_nonzero];

    let exp = dp - 1;
    let nd = sig.len() as i64;
    let mut out = String::new();
    if neg {
        out.push('-');
    }
    if exp < -4 || exp >= 21 || (dp > 0 && nd > 2 * dp) {
        out.push_str(&sig[..1]);
        if sig.len() > 1 {
            out.push('.');
            out.push_str(&sig[1..]);
        }
        out.push('e');
        out.push(if exp < 0 { '-' } else { '+' });
        let mag = exp.unsigned_abs();
        if mag < 10 {
            out.push('0');
        }
        out.push_str(&mag.to_string());
    } else if dp <= 0 {
        out.push_str("0.");
        for _ in 0..(-dp) {
            out.push('0');
        }
        out.push_str(sig);
    } else {
        let dp = dp as usize;
        if dp >= sig.len() {
            out.push_str(sig);
            for _ in 0..(dp - sig.len()) {
                out.push('0');
            }
            out.push_str(".0");
        } else {
            out.push_str(&sig[..dp]);
            out.push('.');
            out.push_str(&sig[dp..]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_integer() {
        assert_eq!(format_f64(0.0).unwrap(), "0");
        assert_eq!(format_f64(1.0).unwrap(), "1.0");
        assert_eq!(format_f64(-1.0).unwrap(), "-1.0");
    }

    #[test]
    fn fixed_point_fraction() {
        assert_eq!(format_f64(19380.1312).unwrap(), "19380.1312");
    }

    /// `SPEC_FULL.md` §8.3's worked example: a mid-sized exponent (6, well
    /// inside `-4..21`) still goes scientific because the shortest
    /// round-trip representation needs 16 significant digits against only
    /// 7 integer digits. Matches Go's `strconv.FormatFloat(v, 'g', -1, 64)`
    /// for this exact input (`examples/original_source/writer/writer_test.go`,
    /// `encoder/encoder_test.go`, `encoding/encoding_test.go`).
    #[test]
    fn scientific_for_digit_heavy_mid_range_exponent() {
        assert_eq!(
            format_f64(2319123.1921918273).unwrap(),
            "2.319123192191827e+06"
        );
    }

    /// Companion to `scientific_for_digit_heavy_mid_range_exponent`: the
    /// same original-source tests assert the `f32` counterpart stays fixed
    /// (8 significant digits against 4 integer digits, under the `2*dp`
    /// bound).
    #[test]
    fn fixed_for_f32_digit_count_under_threshold() {
        assert_eq!(format_f32(2319.1921).unwrap(), "2319.1921");
    }

    #[test]
    fn scientific_for_large_exponent() {
        let out = format_f64(1.234e30).unwrap();
        assert!(out.contains('e'));
        assert!(out.parse::<f64>().unwrap() == 1.234e30);
    }

    #[test]
    fn scientific_for_small_exponent() {
        let out = format_f64(1.234e-10).unwrap();
        assert!(out.contains('e'));
        assert!((out.parse::<f64>().unwrap() - 1.234e-10).abs() < 1e-20);
    }

    #[test]
    fn non_finite_is_none() {
        assert!(format_f64(f64::NAN).is_none());
        assert!(format_f64(f64::INFINITY).is_none());
    }

    #[quickcheck_macros::quickcheck]
    fn round_trips(v: f64) -> bool {
        match format_f64(v) {
            None => !v.is_finite(),
            Some(s) => s.parse::<f64>().map(|p| p == v || (p == 0.0 && v == 0.0)).unwrap_or(false),
        }
    }
}
