//! Typed per-digitizer settings records.
//!
//! One configuration-file section maps to two records: [`connection`]
//! parameters needed to open the device, and [`register`] settings to be
//! programmed into it. Both follow the same lifecycle: `parse` consumes the
//! keys it recognizes from the section (whatever is left over is reported as
//! unknown), `verify` checks semantic completeness, and `fill` marshals the
//! record back into an output document.

pub mod connection;
pub mod register;

use ini::Properties;

/// Remove and return a key from a section, if present.
///
/// Lookup is case-insensitive (property of the document type); removal is
/// what makes leftover keys detectable as unknown settings.
pub(crate) fn take(props: &mut Properties, key: &str) -> Option<String> {
    props.remove(key)
}

/// Parse a configuration boolean. Accepts the spellings humans actually use.
pub(crate) fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        other => Err(format!("'{other}' is not a boolean")),
    }
}

/// Parse an unsigned integer with optional `0x` (hex) or `0b` (binary) prefix.
pub(crate) fn parse_unsigned(raw: &str) -> Result<u32, String> {
    let s = raw.trim();
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        u32::from_str_radix(bin, 2)
    } else {
        s.parse()
    };
    parsed.map_err(|_| format!("'{s}' is not an unsigned integer"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flag_spellings() {
        for raw in ["true", "TRUE", "1", "on", "yes"] {
            assert_eq!(parse_flag(raw), Ok(true), "{raw}");
        }
        for raw in ["false", "0", "off", "No"] {
            assert_eq!(parse_flag(raw), Ok(false), "{raw}");
        }
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn parses_unsigned_radices() {
        assert_eq!(parse_unsigned("42"), Ok(42));
        assert_eq!(parse_unsigned("0x32100000"), Ok(0x3210_0000));
        assert_eq!(parse_unsigned("0b1010"), Ok(0b1010));
        assert!(parse_unsigned("0xzz").is_err());
        assert!(parse_unsigned("-1").is_err());
    }
}
