//! JSON rendering of ASN.1 primitive values.
//!
//! Every renderer writes a `"key":value` pair (no surrounding braces or
//! commas) to a caller-supplied sink. Output is always valid UTF-8 JSON:
//! content that cannot be rendered in its declared type falls back to a hex
//! string rather than failing the record.

use std::io::{self, Write};

use super::{tags, TagClass, Tlv};
use crate::oid;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Write `data` as lowercase hex with no prefix.
pub fn write_hex<W: Write>(w: &mut W, data: &[u8]) -> io::Result<()> {
    for &b in data {
        w.write_all(&[
            HEX_DIGITS[(b >> 4) as usize],
            HEX_DIGITS[(b & 0x0F) as usize],
        ])?;
    }
    Ok(())
}

/// Write `data` as the contents of a JSON string (no surrounding quotes).
/// Control characters, `"` and `\` are escaped; invalid UTF-8 sequences are
/// replaced with U+FFFD.
pub fn write_json_escaped<W: Write>(w: &mut W, data: &[u8]) -> io::Result<()> {
    let mut rest = data;
    loop {
        match core::str::from_utf8(rest) {
            Ok(s) => {
                write_escaped_str(w, s)?;
                return Ok(());
            }
            Err(e) => {
                let valid = core::str::from_utf8(&rest[..e.valid_up_to()]).unwrap_or("");
                write_escaped_str(w, valid)?;
                w.write_all("\u{FFFD}".as_bytes())?;
                match e.error_len() {
                    Some(n) => rest = &rest[e.valid_up_to() + n..],
                    // Truncated sequence at the end of input
                    None => return Ok(()),
                }
            }
        }
    }
}

fn write_escaped_str<W: Write>(w: &mut W, s: &str) -> io::Result<()> {
    for c in s.chars() {
        match c {
            '"' => w.write_all(b"\\\"")?,
            '\\' => w.write_all(b"\\\\")?,
            c if (c as u32) < 0x20 => write!(w, "\\u{:04x}", c as u32)?,
            c => write!(w, "{c}")?,
        }
    }
    Ok(())
}

/// Write the digits of a validated time as ISO-8601 `YYYY-MM-DDTHH:MM:SSZ`.
/// `century` is empty for GeneralizedTime (whose digits already carry the
/// four-digit year) and "19"/"20" for UTCTime.
fn write_iso8601<W: Write>(w: &mut W, century: &str, digits: &[u8]) -> io::Result<()> {
    w.write_all(century.as_bytes())?;
    w.write_all(&digits[0..digits.len() - 10])?;
    w.write_all(b"-")?;
    let d = &digits[digits.len() - 10..];
    w.write_all(&d[0..2])?;
    w.write_all(b"-")?;
    w.write_all(&d[2..4])?;
    w.write_all(b"T")?;
    w.write_all(&d[4..6])?;
    w.write_all(b":")?;
    w.write_all(&d[6..8])?;
    w.write_all(b":")?;
    w.write_all(&d[8..10])?;
    w.write_all(b"Z")
}

impl<'a> Tlv<'a> {
    /// `"key":"<hex of value>"`
    pub fn write_json_hex<W: Write>(&self, w: &mut W, key: &str) -> io::Result<()> {
        write!(w, "\"{key}\":\"")?;
        write_hex(w, self.value)?;
        w.write_all(b"\"")
    }

    /// `"key":"<escaped string value>"`
    pub fn write_json_escaped_string<W: Write>(&self, w: &mut W, key: &str) -> io::Result<()> {
        write!(w, "\"{key}\":\"")?;
        write_json_escaped(w, self.value)?;
        w.write_all(b"\"")
    }

    /// `"key":"<symbolic oid name>"`, or the hex of the OID bytes when the
    /// dictionary does not know them.
    pub fn write_json_oid<W: Write>(&self, w: &mut W, key: &str) -> io::Result<()> {
        let name = oid::oid_string(self.value);
        if oid::is_known(name) {
            write!(w, "\"{key}\":\"{name}\"")
        } else {
            self.write_json_hex(w, key)
        }
    }

    /// `"key":true` / `"key":false`. Any non-zero content byte is true.
    pub fn write_json_boolean<W: Write>(&self, w: &mut W, key: &str) -> io::Result<()> {
        let val = self.value.iter().any(|&b| b != 0);
        write!(w, "\"{key}\":{val}")
    }

    /// UTCTime `YYMMDDHHMMSSZ` as `"key":"YYYY-MM-DDTHH:MM:SSZ"`.
    /// Two-digit years of 50 and above are 19YY, below 50 are 20YY.
    /// Falls back to hex when the content is not a well-formed timestamp.
    pub fn write_json_utc_time<W: Write>(&self, w: &mut W, key: &str) -> io::Result<()> {
        let digits = match self.value.get(..12) {
            Some(d) if d.iter().all(u8::is_ascii_digit) => d,
            _ => return self.write_json_hex(w, key),
        };
        let yy = (digits[0] - b'0') * 10 + (digits[1] - b'0');
        let century = if yy >= 50 { "19" } else { "20" };
        write!(w, "\"{key}\":\"")?;
        write_iso8601(w, century, digits)?;
        w.write_all(b"\"")
    }

    /// GeneralizedTime `YYYYMMDDHHMMSSZ` as `"key":"YYYY-MM-DDTHH:MM:SSZ"`.
    pub fn write_json_generalized_time<W: Write>(&self, w: &mut W, key: &str) -> io::Result<()> {
        let digits = match self.value.get(..14) {
            Some(d) if d.iter().all(u8::is_ascii_digit) => d,
            _ => return self.write_json_hex(w, key),
        };
        write!(w, "\"{key}\":\"")?;
        write_iso8601(w, "", digits)?;
        w.write_all(b"\"")
    }

    /// BIT STRING rendered as an object of booleans, one per content bit,
    /// keyed by `flags` in bit order. Bits beyond the flag list and flags
    /// beyond the bit count are dropped. Non-BIT-STRING content falls back
    /// to hex.
    pub fn write_json_bitstring_flags<W: Write>(
        &self,
        w: &mut W,
        key: &str,
        flags: &[&str],
    ) -> io::Result<()> {
        if !self.is_universal(tags::BIT_STRING) || self.value.is_empty() {
            return self.write_json_hex(w, key);
        }
        let unused = (self.value[0] & 0x07) as usize;
        let content = &self.value[1..];
        let nbits = (content.len() * 8).saturating_sub(unused);

        write!(w, "\"{key}\":{{")?;
        let mut comma = "";
        for (i, name) in flags.iter().enumerate() {
            if i >= nbits {
                break;
            }
            let bit = (content[i / 8] >> (7 - (i % 8))) & 1;
            let val = if bit == 1 { "true" } else { "false" };
            write!(w, "{comma}\"{name}\":{val}")?;
            comma = ",";
        }
        w.write_all(b"}")
    }

    /// OCTET STRING holding an IPv4 (4 bytes) or IPv6 (16 bytes) address,
    /// rendered in its canonical text form; other lengths render as hex.
    pub fn write_json_ip_address<W: Write>(&self, w: &mut W, key: &str) -> io::Result<()> {
        match self.value.len() {
            4 => {
                let v = self.value;
                write!(w, "\"{key}\":\"{}.{}.{}.{}\"", v[0], v[1], v[2], v[3])
            }
            16 => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(self.value);
                let addr = std::net::Ipv6Addr::from(octets);
                write!(w, "\"{key}\":\"{addr}\"")
            }
            _ => self.write_json_hex(w, key),
        }
    }

    /// Render by declared type: strings escape, times normalize, OIDs
    /// resolve, booleans print bare, everything else is hex.
    pub fn write_json<W: Write>(&self, w: &mut W, key: &str) -> io::Result<()> {
        if self.tag.class != TagClass::Universal || self.tag.constructed {
            return self.write_json_hex(w, key);
        }
        match self.tag.number as u8 {
            tags::BOOLEAN => self.write_json_boolean(w, key),
            tags::OID => self.write_json_oid(w, key),
            tags::UTF8_STRING
            | tags::PRINTABLE_STRING
            | tags::IA5_STRING
            | tags::TELETEX_STRING
            | tags::UNIVERSAL_STRING
            | tags::BMP_STRING => self.write_json_escaped_string(w, key),
            tags::UTC_TIME => self.write_json_utc_time(w, key),
            tags::GENERALIZED_TIME => self.write_json_generalized_time(w, key),
            _ => self.write_json_hex(w, key),
        }
    }
}
