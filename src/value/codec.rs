// Canonical string forms and percent-encoding for scalar values

use chrono::Timelike;

use super::Scalar;

/// RFC 3986 gen-delims and sub-delims
const RESERVED: &str = ":/?#[]@!$&'()*+,;=";

/// Marks that form encoding leaves alone besides the RFC unreserved set
const FORM_SAFE: &str = "!*()";

/// Magnitudes outside [1e-5, 1e15) are written in exponent form
const EXPONENT_UPPER: f64 = 1e15;
const EXPONENT_LOWER: f64 = 1e-5;

pub struct ScalarCodec;

impl ScalarCodec {
    /// Render a scalar the same way regardless of where it came from
    ///
    /// Floats use the shortest digits that round-trip. Magnitudes of at least
    /// `1e15` or below `1e-5` switch to Rust's exponent form (`1e15`,
    /// `1.5e-7`), so `1e-5` itself prints as `0.00001`. Zero of either sign
    /// prints `0` and non-finite values print `NaN`, `inf` or `-inf`.
    pub fn to_canonical_string(value: &Scalar) -> String {
        match value {
            Scalar::String(s) => s.clone(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::UInt(u) => u.to_string(),
            Scalar::Float(f) => format_float(*f, f.abs(), |v| v.to_string(), |v| format!("{:e}", v)),
            Scalar::Float32(f) => format_float(
                f64::from(*f),
                f64::from(f.abs()),
                |_| f.to_string(),
                |_| format!("{:e}", f),
            ),
            Scalar::Decimal(d) => d.normalize().to_string(),
            Scalar::Uuid(u) => u.hyphenated().to_string(),
            Scalar::DateTime(dt) => format!(
                "{}.{:07}",
                dt.format("%Y-%m-%dT%H:%M:%S"),
                ticks(dt.nanosecond())
            ),
            Scalar::DateTimeOffset(dt) => format!(
                "{}.{:07}{}",
                dt.format("%Y-%m-%dT%H:%M:%S"),
                ticks(dt.nanosecond()),
                dt.format("%:z")
            ),
        }
    }

    /// Percent-encode `text` for inclusion in a URI
    ///
    /// Spaces always become `+`. With `allow_reserved`, RFC 3986 reserved
    /// characters and existing `%XX` triplets pass through untouched.
    pub fn encode(text: &str, allow_reserved: bool) -> String {
        let mut result = String::with_capacity(text.len());
        let mut buf = [0u8; 4];

        for (i, ch) in text.char_indices() {
            if ch == ' ' {
                result.push('+');
            } else if is_unreserved(ch)
                || (allow_reserved && (RESERVED.contains(ch) || is_pct_triplet(&text[i..])))
            {
                result.push(ch);
            } else {
                result.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
            }
        }

        result
    }

    /// Leading `max_chars` characters of `text`
    ///
    /// With `allow_reserved` an existing `%XX` triplet counts as a single
    /// character and is never split.
    pub(crate) fn prefix(text: &str, max_chars: usize, allow_reserved: bool) -> &str {
        let mut end = 0;
        for _ in 0..max_chars {
            let rest = &text[end..];
            match rest.chars().next() {
                None => break,
                Some(_) if allow_reserved && is_pct_triplet(rest) => end += 3,
                Some(ch) => end += ch.len_utf8(),
            }
        }
        &text[..end]
    }
}

fn is_unreserved(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '~') || FORM_SAFE.contains(ch)
}

fn is_pct_triplet(rest: &str) -> bool {
    let bytes = rest.as_bytes();
    bytes.len() >= 3
        && bytes[0] == b'%'
        && bytes[1].is_ascii_hexdigit()
        && bytes[2].is_ascii_hexdigit()
}

/// Sub-second part in 100ns units, leap seconds folded into the last tick
fn ticks(nanos: u32) -> u32 {
    nanos.min(999_999_999) / 100
}

fn format_float(
    value: f64,
    magnitude: f64,
    plain: impl Fn(f64) -> String,
    exponent: impl Fn(f64) -> String,
) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.is_finite() && (magnitude >= EXPONENT_UPPER || magnitude < EXPONENT_LOWER) {
        exponent(value)
    } else {
        plain(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, TimeZone};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use uuid::Uuid;

    fn canonical(value: Scalar) -> String {
        ScalarCodec::to_canonical_string(&value)
    }

    #[test]
    fn test_canonical_integers_and_booleans() {
        assert_eq!(canonical(Scalar::Int(1024)), "1024");
        assert_eq!(canonical(Scalar::Int(-7)), "-7");
        assert_eq!(canonical(Scalar::UInt(u64::MAX)), "18446744073709551615");
        assert_eq!(canonical(Scalar::Bool(true)), "true");
        assert_eq!(canonical(Scalar::Bool(false)), "false");
    }

    #[test]
    fn test_canonical_floats() {
        assert_eq!(canonical(Scalar::Float(1.5)), "1.5");
        assert_eq!(canonical(Scalar::Float(2.0)), "2");
        assert_eq!(canonical(Scalar::Float(0.1)), "0.1");
        assert_eq!(canonical(Scalar::Float(-0.0)), "0");
        assert_eq!(canonical(Scalar::Float(1e15)), "1e15");
        assert_eq!(canonical(Scalar::Float(1.5e-7)), "1.5e-7");
        assert_eq!(canonical(Scalar::Float(123456.789)), "123456.789");
        assert_eq!(canonical(Scalar::Float32(0.1)), "0.1");
        assert_eq!(canonical(Scalar::Float(f64::NAN)), "NaN");
        assert_eq!(canonical(Scalar::Float(f64::INFINITY)), "inf");
        assert_eq!(canonical(Scalar::Float(f64::NEG_INFINITY)), "-inf");
        assert_eq!(canonical(Scalar::Float32(f32::NEG_INFINITY)), "-inf");
    }

    #[test]
    fn test_canonical_float_exponent_boundaries() {
        assert_eq!(canonical(Scalar::Float(1e-5)), "0.00001");
        assert_eq!(canonical(Scalar::Float(9.5e-6)), "9.5e-6");
        assert_eq!(canonical(Scalar::Float(999999999999999.0)), "999999999999999");
        assert_eq!(canonical(Scalar::Float(-2.5e20)), "-2.5e20");
    }

    #[test]
    fn test_canonical_decimal_drops_trailing_zeros() {
        assert_eq!(canonical(Scalar::Decimal(Decimal::from_str("1.500").unwrap())), "1.5");
        assert_eq!(canonical(Scalar::Decimal(Decimal::from_str("42.00").unwrap())), "42");
    }

    #[test]
    fn test_canonical_uuid_is_lowercase_hyphenated() {
        let id = Uuid::parse_str("936DA01F-9ABD-4D9D-80C7-02AF85C822A8").unwrap();
        assert_eq!(canonical(Scalar::Uuid(id)), "936da01f-9abd-4d9d-80c7-02af85c822a8");
    }

    #[test]
    fn test_canonical_date_times() {
        let naive = NaiveDate::from_ymd_opt(2009, 6, 15)
            .unwrap()
            .and_hms_nano_opt(13, 45, 30, 500_000_000)
            .unwrap();
        assert_eq!(canonical(Scalar::DateTime(naive)), "2009-06-15T13:45:30.5000000");

        let offset = FixedOffset::west_opt(7 * 3600).unwrap();
        let local = offset
            .from_local_datetime(&naive.with_nanosecond(0).unwrap())
            .unwrap();
        assert_eq!(
            canonical(Scalar::DateTimeOffset(local)),
            "2009-06-15T13:45:30.0000000-07:00"
        );

        let utc = FixedOffset::east_opt(0).unwrap().from_utc_datetime(&naive);
        assert_eq!(
            canonical(Scalar::DateTimeOffset(utc)),
            "2009-06-15T13:45:30.5000000+00:00"
        );
    }

    #[test]
    fn test_encode_unreserved_passes_through() {
        assert_eq!(ScalarCodec::encode("AZaz09-._~", false), "AZaz09-._~");
        assert_eq!(ScalarCodec::encode("Hello World!", false), "Hello+World!");
    }

    #[test]
    fn test_encode_reserved_characters() {
        assert_eq!(ScalarCodec::encode("/foo/bar", false), "%2Ffoo%2Fbar");
        assert_eq!(ScalarCodec::encode("/foo/bar", true), "/foo/bar");
        assert_eq!(ScalarCodec::encode(";,=", false), "%3B%2C%3D");
        assert_eq!(ScalarCodec::encode(":/?#[]@$&'+,;=", true), ":/?#[]@$&'+,;=");
    }

    #[test]
    fn test_encode_utf8_and_percent() {
        assert_eq!(ScalarCodec::encode("caf\u{e9}", false), "caf%C3%A9");
        assert_eq!(ScalarCodec::encode("50%", false), "50%25");
        assert_eq!(ScalarCodec::encode("50%", true), "50%25");
        assert_eq!(ScalarCodec::encode("%2F", false), "%252F");
        assert_eq!(ScalarCodec::encode("%2F", true), "%2F");
    }

    #[test]
    fn test_prefix_counts_characters() {
        assert_eq!(ScalarCodec::prefix("value", 3, false), "val");
        assert_eq!(ScalarCodec::prefix("value", 30, false), "value");
        assert_eq!(ScalarCodec::prefix("\u{e9}t\u{e9}", 2, false), "\u{e9}t");
    }

    #[test]
    fn test_prefix_keeps_pct_triplets_whole_in_reserved_mode() {
        assert_eq!(ScalarCodec::prefix("%2Fa", 1, true), "%2F");
        assert_eq!(ScalarCodec::prefix("%2Fa", 2, true), "%2Fa");
        assert_eq!(ScalarCodec::prefix("%2Fa", 2, false), "%2");
        assert_eq!(ScalarCodec::prefix("%zz", 1, true), "%");
    }

    #[test]
    fn test_encode_space_is_plus_in_both_modes() {
        assert_eq!(ScalarCodec::encode("Hello, World!", true), "Hello,+World!");
        assert_eq!(ScalarCodec::encode("a b", false), "a+b");
    }
}
