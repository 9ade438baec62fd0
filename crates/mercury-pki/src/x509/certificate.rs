//! Core X.509 certificate decoding and JSON emission.
//!
//! Every structure is a tree of borrowed TLV views over one DER input
//! buffer. Parsing is tolerant: a structural error stops population at that
//! point and everything already decoded stays renderable, so the JSON
//! record for a truncated or malformed certificate is still well-formed.

use std::io::{self, Write};

use mercury_types::DecodeError;
use mercury_utils::asn1::{tags, write_hex, Decoder, Tlv};
use mercury_utils::oid;

use super::extensions::Extension;
use super::name::Name;

/// AlgorithmIdentifier ::= SEQUENCE { algorithm OID, parameters ANY OPTIONAL }
#[derive(Debug, Clone, Copy, Default)]
pub struct AlgorithmIdentifier<'a> {
    pub algorithm: Option<Tlv<'a>>,
    pub parameters: Option<Tlv<'a>>,
}

impl<'a> AlgorithmIdentifier<'a> {
    pub fn parse(dec: &mut Decoder<'a>) -> Result<Self, DecodeError> {
        let mut seq = dec.read_sequence()?;
        let algorithm = Some(seq.read_oid()?);
        let parameters = if seq.is_empty() {
            None
        } else {
            seq.read_tlv().ok()
        };
        Ok(Self {
            algorithm,
            parameters,
        })
    }

    /// Symbolic name of the algorithm OID, or the unknown sentinel.
    pub fn type_name(&self) -> &'static str {
        self.algorithm
            .map(|a| oid::oid_string(a.value))
            .unwrap_or(oid::UNKNOWN_OID)
    }

    /// Symbolic name of the parameters when they are an OID (e.g. a named
    /// curve), or the unknown sentinel.
    pub fn parameters_name(&self) -> &'static str {
        self.parameters
            .filter(|p| p.is_universal(tags::OID))
            .map(|p| oid::oid_string(p.value))
            .unwrap_or(oid::UNKNOWN_OID)
    }

    /// `{"algorithm":"...","parameters":...}` — parameters render as an OID
    /// name when tagged as one, hex otherwise.
    pub fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"{")?;
        if let Some(algorithm) = self.algorithm {
            algorithm.write_json_oid(w, "algorithm")?;
            if let Some(parameters) = self.parameters {
                w.write_all(b",")?;
                if parameters.is_universal(tags::OID) {
                    parameters.write_json_oid(w, "parameters")?;
                } else {
                    parameters.write_json_hex(w, "parameters")?;
                }
            }
        }
        w.write_all(b"}")
    }
}

/// Validity ::= SEQUENCE { notBefore Time, notAfter Time }
///
/// Each Time is a UTCTime or GeneralizedTime TLV, distinguished by tag at
/// rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validity<'a> {
    pub not_before: Option<Tlv<'a>>,
    pub not_after: Option<Tlv<'a>>,
}

impl<'a> Validity<'a> {
    pub fn parse(dec: &mut Decoder<'a>) -> Result<Self, DecodeError> {
        let mut seq = dec.read_sequence()?;
        let not_before = Some(seq.read_tlv()?);
        let not_after = seq.read_tlv().ok();
        Ok(Self {
            not_before,
            not_after,
        })
    }

    fn is_empty(&self) -> bool {
        self.not_before.is_none() && self.not_after.is_none()
    }

    /// `"validity":[{"notBefore":"..."},{"notAfter":"..."}]`
    pub fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"\"validity\":[")?;
        let mut comma = "";
        if let Some(not_before) = self.not_before {
            w.write_all(b"{")?;
            not_before.write_json(w, "notBefore")?;
            w.write_all(b"}")?;
            comma = ",";
        }
        if let Some(not_after) = self.not_after {
            w.write_all(comma.as_bytes())?;
            w.write_all(b"{")?;
            not_after.write_json(w, "notAfter")?;
            w.write_all(b"}")?;
        }
        w.write_all(b"]")
    }
}

/// SubjectPublicKeyInfo ::= SEQUENCE { algorithm AlgorithmIdentifier,
/// subjectPublicKey BIT STRING }
#[derive(Debug, Clone, Copy, Default)]
pub struct SubjectPublicKeyInfo<'a> {
    pub algorithm: AlgorithmIdentifier<'a>,
    pub subject_public_key: Option<Tlv<'a>>,
}

impl<'a> SubjectPublicKeyInfo<'a> {
    pub fn parse(dec: &mut Decoder<'a>) -> Result<Self, DecodeError> {
        let mut seq = dec.read_sequence()?;
        let algorithm = AlgorithmIdentifier::parse(&mut seq)?;
        let subject_public_key = seq
            .read_tlv()
            .ok()
            .filter(|t| t.is_universal(tags::BIT_STRING));
        Ok(Self {
            algorithm,
            subject_public_key,
        })
    }

    pub fn write_json<W: Write>(&self, w: &mut W, key: &str) -> io::Result<()> {
        write!(w, "\"{key}\":{{\"algorithm\":")?;
        self.algorithm.write_json(w)?;
        if let Some(spk) = self.subject_public_key {
            w.write_all(b",")?;
            let contents = spk.bit_string_contents();
            if self.algorithm.type_name() == "rsaEncryption" {
                write_rsa_public_key(w, contents)?;
            } else {
                // EC points and unrecognized key types both render as the
                // raw key bytes.
                w.write_all(b"\"subject_public_key\":\"")?;
                write_hex(w, contents)?;
                w.write_all(b"\"")?;
            }
        }
        w.write_all(b"}")
    }
}

/// RSAPublicKey ::= SEQUENCE { modulus INTEGER, publicExponent INTEGER }
fn write_rsa_public_key<W: Write>(w: &mut W, contents: &[u8]) -> io::Result<()> {
    w.write_all(b"\"subject_public_key\":{")?;
    let mut dec = Decoder::new(contents);
    if let Ok(mut seq) = dec.read_sequence() {
        if let (Ok(modulus), Ok(exponent)) = (seq.read_integer(), seq.read_integer()) {
            modulus.write_json_hex(w, "modulus")?;
            w.write_all(b",")?;
            exponent.write_json_hex(w, "exponent")?;
        }
    }
    w.write_all(b"}")
}

/// EC curves considered too small for current practice. prime192v1 is the
/// X9.62 name for the curve SEC 2 calls secp192r1; both names stay on the
/// list so either dictionary spelling is caught.
const WEAK_EC_PARAMETERS: &[&str] = &[
    "secp192r1",
    "secp224r1",
    "prime192v1",
    "prime192v2",
    "prime192v3",
    "prime239v1",
    "prime239v2",
    "prime239v3",
];

/// A decoded X.509 certificate.
#[derive(Debug, Clone, Default)]
pub struct X509Cert<'a> {
    pub version: Option<Tlv<'a>>,
    pub serial_number: Option<Tlv<'a>>,
    pub tbs_signature_algorithm: AlgorithmIdentifier<'a>,
    pub issuer: Name<'a>,
    pub validity: Validity<'a>,
    pub subject: Name<'a>,
    pub subject_public_key_info: SubjectPublicKeyInfo<'a>,
    pub extensions: Vec<Extension<'a>>,
    pub signature_algorithm: AlgorithmIdentifier<'a>,
    pub signature: Option<Tlv<'a>>,
}

impl<'a> X509Cert<'a> {
    /// Decode a certificate from DER bytes. Never fails outright: a field
    /// that does not decode is left unpopulated and parsing moves on, so a
    /// tag mismatch (which does not consume input) lets later fields still
    /// line up, and a truncation simply stops population where the data
    /// ends.
    pub fn from_der(data: &'a [u8]) -> Self {
        let mut cert = Self::default();
        cert.parse(data);
        cert
    }

    fn parse(&mut self, data: &'a [u8]) {
        let mut dec = Decoder::new(data);
        let Ok(mut cert_seq) = dec.read_sequence() else {
            return;
        };
        let Ok(mut tbs) = cert_seq.read_sequence() else {
            return;
        };

        // version [0] EXPLICIT Version DEFAULT v1. Many certificates omit
        // the tag; a bare INTEGER of length 1 and value < 3 is taken as the
        // version, anything else as the serialNumber. A real serial of 0,
        // 1 or 2 is indistinguishable from a version here; that ambiguity
        // is inherent to the tolerant grammar.
        if let Ok(Some(tagged)) = tbs.try_read_context_specific(0, true) {
            self.version = Decoder::new(tagged.value).read_integer().ok();
        } else if let Ok(first) = tbs.read_integer() {
            if first.value.len() == 1 && first.value[0] < 3 {
                self.version = Some(first);
            } else {
                self.serial_number = Some(first);
            }
        }
        if self.serial_number.is_none() {
            self.serial_number = tbs.read_integer().ok();
        }

        self.tbs_signature_algorithm = AlgorithmIdentifier::parse(&mut tbs).unwrap_or_default();
        self.issuer = Name::parse(&mut tbs).unwrap_or_default();
        self.validity = Validity::parse(&mut tbs).unwrap_or_default();
        self.subject = Name::parse(&mut tbs).unwrap_or_default();
        self.subject_public_key_info = SubjectPublicKeyInfo::parse(&mut tbs).unwrap_or_default();

        // issuerUniqueID [1] / subjectUniqueID [2] IMPLICIT OPTIONAL
        let _ = tbs.try_read_context_specific(1, false);
        let _ = tbs.try_read_context_specific(2, false);

        if !tbs.is_empty() {
            // extensions [3] EXPLICIT SEQUENCE OF Extension; some
            // certificates in the wild omit the explicit tag, so fall back
            // to the bare SEQUENCE.
            let ext_seq = match tbs.try_read_context_specific(3, true) {
                Ok(Some(tagged)) => Decoder::new(tagged.value).read_sequence().ok(),
                _ => tbs.read_sequence().ok(),
            };
            if let Some(mut ext_seq) = ext_seq {
                self.extensions = Extension::parse_list(&mut ext_seq);
            }
        }

        self.signature_algorithm = AlgorithmIdentifier::parse(&mut cert_seq).unwrap_or_default();
        self.signature = cert_seq
            .read_tlv()
            .ok()
            .filter(|t| t.is_universal(tags::BIT_STRING));
    }

    /// Emit the certificate as one JSON object followed by a newline.
    /// Fields are written in certificate order and only when populated; the
    /// output is well-formed JSON for any input.
    pub fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"{")?;
        let mut comma = false;
        if let Some(serial) = self.serial_number {
            serial.write_json_hex(w, "serial_number")?;
            comma = true;
        }
        if !self.issuer.is_empty() {
            sep(w, &mut comma)?;
            self.issuer.write_json(w, "issuer")?;
        }
        if !self.validity.is_empty() {
            sep(w, &mut comma)?;
            self.validity.write_json(w)?;
        }
        if !self.subject.is_empty() {
            sep(w, &mut comma)?;
            self.subject.write_json(w, "subject")?;
        }
        if self.subject_public_key_info.algorithm.algorithm.is_some() {
            sep(w, &mut comma)?;
            self.subject_public_key_info
                .write_json(w, "subject_public_key_info")?;
        }
        if !self.extensions.is_empty() {
            sep(w, &mut comma)?;
            w.write_all(b"\"extensions\":[")?;
            let mut inner = "";
            for extension in &self.extensions {
                w.write_all(inner.as_bytes())?;
                extension.write_json(w)?;
                inner = ",";
            }
            w.write_all(b"]")?;
        }
        if self.signature_algorithm.algorithm.is_some() {
            sep(w, &mut comma)?;
            w.write_all(b"\"signature_algorithm\":")?;
            self.signature_algorithm.write_json(w)?;
        }
        if let Some(signature) = self.signature {
            sep(w, &mut comma)?;
            w.write_all(b"\"signature\":\"")?;
            write_hex(w, signature.bit_string_contents())?;
            w.write_all(b"\"")?;
        }
        w.write_all(b"}\n")
    }

    /// True when the subject key is an EC key on a curve too small for
    /// current practice. Advisory only.
    pub fn is_weak(&self) -> bool {
        self.subject_public_key_info.algorithm.type_name() == "id-ecPublicKey"
            && WEAK_EC_PARAMETERS
                .contains(&self.subject_public_key_info.algorithm.parameters_name())
    }
}

fn sep<W: Write>(w: &mut W, comma: &mut bool) -> io::Result<()> {
    if *comma {
        w.write_all(b",")?;
    }
    *comma = true;
    Ok(())
}

/// The serial number and issuer of a certificate, parsed from a possibly
/// truncated buffer. Used upstream as a compact certificate cache key.
#[derive(Debug, Clone, Default)]
pub struct X509CertPrefix<'a> {
    pub serial_number: Option<Tlv<'a>>,
    pub issuer: Option<Tlv<'a>>,
    prefix: Option<&'a [u8]>,
}

impl<'a> X509CertPrefix<'a> {
    pub fn from_der(data: &'a [u8]) -> Self {
        let mut prefix = Self::default();
        prefix.parse(data);
        prefix
    }

    fn parse(&mut self, data: &'a [u8]) {
        let mut dec = Decoder::new(data);
        let Ok(mut cert_seq) = dec.read_sequence() else {
            return;
        };
        let outer_tail = dec.remaining().len();
        let Ok(mut tbs) = cert_seq.read_sequence() else {
            return;
        };
        let cert_tail = cert_seq.remaining().len();

        // Same version/serialNumber disambiguation as the full parser.
        if let Ok(None) = tbs.try_read_context_specific(0, true) {
            if let Ok(first) = tbs.read_integer() {
                if !(first.value.len() == 1 && first.value[0] < 3) {
                    self.serial_number = Some(first);
                }
            }
        }
        if self.serial_number.is_none() {
            self.serial_number = tbs.read_integer().ok();
        }

        // signature AlgorithmIdentifier, skipped
        let _ = tbs.read_tlv();

        self.issuer = tbs.read_tlv().ok();
        if self.issuer.is_some() {
            let consumed = data.len() - (tbs.remaining().len() + cert_tail + outer_tail);
            self.prefix = Some(&data[..consumed]);
        }
    }

    /// Byte length of the parsed prefix; 0 when the issuer was not reached.
    pub fn prefix_len(&self) -> usize {
        self.prefix.map_or(0, |p| p.len())
    }

    /// `{"serial_number":"...","issuer":"..."}` in hex, plus a newline.
    pub fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"{")?;
        let mut comma = false;
        if let Some(serial) = self.serial_number {
            serial.write_json_hex(w, "serial_number")?;
            comma = true;
        }
        if let Some(issuer) = self.issuer {
            sep(w, &mut comma)?;
            issuer.write_json_hex(w, "issuer")?;
        }
        w.write_all(b"}\n")
    }

    /// `{"cert_prefix":"<hex of the raw prefix bytes>"}` plus a newline.
    pub fn write_json_hex<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"{\"cert_prefix\":\"")?;
        if let Some(prefix) = self.prefix {
            write_hex(w, prefix)?;
        }
        w.write_all(b"\"}\n")
    }
}
