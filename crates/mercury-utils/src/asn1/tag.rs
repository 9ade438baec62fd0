//! ASN.1 tag parsing and encoding.

use super::{Tag, TagClass};
use mercury_types::DecodeError;

impl Tag {
    /// Parse a tag from the first bytes of `input`.
    /// Returns the tag and number of bytes consumed.
    pub fn from_bytes(input: &[u8]) -> Result<(Self, usize), DecodeError> {
        if input.is_empty() {
            return Err(DecodeError::Truncated);
        }

        let first = input[0];
        let class = match (first >> 6) & 0x03 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            3 => TagClass::Private,
            _ => unreachable!(),
        };
        let constructed = (first & 0x20) != 0;

        let low_bits = first & 0x1F;
        if low_bits < 0x1F {
            // Short form tag number
            Ok((
                Tag {
                    class,
                    constructed,
                    number: low_bits as u32,
                },
                1,
            ))
        } else {
            // Long form tag number
            let mut number: u32 = 0;
            let mut i = 1;
            loop {
                if i >= input.len() {
                    return Err(DecodeError::Truncated);
                }
                let byte = input[i];
                number = number.checked_shl(7).ok_or(DecodeError::BadLength)? | (byte & 0x7F) as u32;
                i += 1;
                if (byte & 0x80) == 0 {
                    break;
                }
            }
            Ok((
                Tag {
                    class,
                    constructed,
                    number,
                },
                i,
            ))
        }
    }

    /// Encode this tag to its identifier octet, for low tag numbers only.
    pub fn to_byte(&self) -> u8 {
        let class_bits = match self.class {
            TagClass::Universal => 0x00,
            TagClass::Application => 0x40,
            TagClass::ContextSpecific => 0x80,
            TagClass::Private => 0xC0,
        };
        let constructed_bit = if self.constructed { 0x20 } else { 0x00 };
        class_bits | constructed_bit | (self.number as u8 & 0x1F)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_tag() {
        let (tag, len) = Tag::from_bytes(&[0x30]).unwrap();
        assert_eq!(tag.class, TagClass::Universal);
        assert!(tag.constructed);
        assert_eq!(tag.number, 0x10);
        assert_eq!(len, 1);
    }

    #[test]
    fn test_parse_integer_tag() {
        let (tag, len) = Tag::from_bytes(&[0x02]).unwrap();
        assert_eq!(tag.class, TagClass::Universal);
        assert!(!tag.constructed);
        assert_eq!(tag.number, 0x02);
        assert_eq!(len, 1);
    }

    #[test]
    fn test_parse_context_tags() {
        // [0] EXPLICIT (constructed)
        let (tag, _) = Tag::from_bytes(&[0xA0]).unwrap();
        assert_eq!(tag.class, TagClass::ContextSpecific);
        assert!(tag.constructed);
        assert_eq!(tag.number, 0);

        // [2] IMPLICIT (primitive) — dNSName in a SAN
        let (tag, _) = Tag::from_bytes(&[0x82]).unwrap();
        assert_eq!(tag.class, TagClass::ContextSpecific);
        assert!(!tag.constructed);
        assert_eq!(tag.number, 2);
    }

    #[test]
    fn test_to_byte_roundtrip() {
        let tag = Tag {
            class: TagClass::ContextSpecific,
            constructed: true,
            number: 3,
        };
        let byte = tag.to_byte();
        let (parsed, _) = Tag::from_bytes(&[byte]).unwrap();
        assert_eq!(tag, parsed);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(Tag::from_bytes(&[]), Err(DecodeError::Truncated));
    }

    #[test]
    fn test_truncated_long_form() {
        // 0x1F marks a long-form tag number but no continuation bytes follow
        assert_eq!(Tag::from_bytes(&[0x1F]), Err(DecodeError::Truncated));
    }
}
