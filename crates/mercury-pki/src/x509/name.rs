//! X.509 Name (RDNSequence) decoding and rendering.

use std::io::{self, Write};

use mercury_types::DecodeError;
use mercury_utils::asn1::{tags, Decoder, Tlv};
use mercury_utils::oid;

/// One AttributeTypeAndValue from a relative distinguished name.
#[derive(Debug, Clone, Copy, Default)]
pub struct Attribute<'a> {
    pub attribute_type: Option<Tlv<'a>>,
    pub attribute_value: Option<Tlv<'a>>,
}

impl<'a> Attribute<'a> {
    /// `{"<attr name>":"<value>"}`, `{"unknown_oid":"<hex>"}` for OIDs the
    /// dictionary does not know, `{}` when either half is missing or empty.
    pub fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let (Some(attr_type), Some(attr_value)) = (self.attribute_type, self.attribute_value)
        else {
            return w.write_all(b"{}");
        };
        if attr_type.value.is_empty() || attr_value.value.is_empty() {
            return w.write_all(b"{}");
        }
        let name = oid::oid_string(attr_type.value);
        w.write_all(b"{")?;
        if oid::is_known(name) {
            attr_value.write_json_escaped_string(w, name)?;
        } else {
            attr_value.write_json_hex(w, oid::UNKNOWN_OID)?;
        }
        w.write_all(b"}")
    }
}

/// An ordered list of name attributes decoded from an RDNSequence:
/// `SEQUENCE OF SET OF SEQUENCE { type OID, value ANY }`.
#[derive(Debug, Clone, Default)]
pub struct Name<'a> {
    pub attributes: Vec<Attribute<'a>>,
}

impl<'a> Name<'a> {
    /// Decode an RDNSequence. A malformed inner element ends the walk;
    /// attributes already collected are kept.
    pub fn parse(dec: &mut Decoder<'a>) -> Result<Name<'a>, DecodeError> {
        let mut rdn_seq = dec.read_sequence()?;
        let mut attributes = Vec::new();
        'outer: while !rdn_seq.is_empty() {
            let Ok(mut rdn) = rdn_seq.read_set() else {
                break;
            };
            while !rdn.is_empty() {
                let Ok(mut atav) = rdn.read_sequence() else {
                    break 'outer;
                };
                let mut attr = Attribute::default();
                if let Ok(t) = atav.read_tlv() {
                    if t.is_universal(tags::OID) {
                        attr.attribute_type = Some(t);
                        attr.attribute_value = atav.read_tlv().ok();
                    }
                }
                attributes.push(attr);
            }
        }
        Ok(Name { attributes })
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// `"key":[{...},{...}]` with attributes in input order.
    pub fn write_json<W: Write>(&self, w: &mut W, key: &str) -> io::Result<()> {
        write!(w, "\"{key}\":[")?;
        let mut comma = "";
        for attr in &self.attributes {
            w.write_all(comma.as_bytes())?;
            attr.write_json(w)?;
            comma = ",";
        }
        w.write_all(b"]")
    }
}
