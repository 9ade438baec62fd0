//! X.509 extension decoding and JSON rendering.
//!
//! Each recognized extension gets a typed view over the extnValue content
//! and a renderer; unrecognized extensions still appear in the output as
//! hex with their criticality. Malformed extension bodies drop the typed
//! rendering, never the record.

use std::io::{self, Write};

use mercury_utils::asn1::{tags, write_hex, Decoder, TagClass, Tlv};
use mercury_utils::oid;

use super::name::{Attribute, Name};

/// Extension ::= SEQUENCE { extnID OID, critical BOOLEAN DEFAULT FALSE,
/// extnValue OCTET STRING }
#[derive(Debug, Clone, Copy, Default)]
pub struct Extension<'a> {
    pub extn_id: Option<Tlv<'a>>,
    pub critical: bool,
    pub extn_value: Option<Tlv<'a>>,
}

impl<'a> Extension<'a> {
    /// Decode the body of a `SEQUENCE OF Extension`. A malformed entry ends
    /// the walk; entries already decoded are kept, in input order.
    pub fn parse_list(seq: &mut Decoder<'a>) -> Vec<Extension<'a>> {
        let mut extensions = Vec::new();
        while !seq.is_empty() {
            let Ok(mut ext) = seq.read_sequence() else {
                break;
            };
            let mut extension = Extension::default();
            if let Ok(id) = ext.read_tlv() {
                if id.is_universal(tags::OID) {
                    extension.extn_id = Some(id);
                }
            }
            if let Ok(next) = ext.read_tlv() {
                if next.is_universal(tags::BOOLEAN) {
                    extension.critical = next.value.iter().any(|&b| b != 0);
                    extension.extn_value = ext.read_tlv().ok();
                } else {
                    extension.extn_value = Some(next);
                }
            }
            extensions.push(extension);
        }
        extensions
    }

    /// Symbolic name of the extnID, or the unknown sentinel.
    pub fn id_name(&self) -> &'static str {
        self.extn_id
            .map(|t| oid::oid_string(t.value))
            .unwrap_or(oid::UNKNOWN_OID)
    }

    /// One JSON object per extension: the raw extnValue hex keyed by the OID
    /// name, the criticality, and a typed rendering when the OID is known.
    pub fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let name = self.id_name();
        write!(w, "{{\"{name}\":\"")?;
        if let Some(v) = self.extn_value {
            write_hex(w, v.value)?;
        }
        write!(w, "\",\"critical\":{}", self.critical)?;
        if let Some(v) = self.extn_value {
            write_typed_body(w, name, v.value)?;
        }
        w.write_all(b"}")
    }
}

/// The extnID names this module decodes beyond the hex duplicate.
pub const DECODED_EXTENSIONS: &[&str] = &[
    "id-ce-basicConstraints",
    "id-ce-keyUsage",
    "id-ce-extKeyUsage",
    "id-ce-subjectAltName",
    "id-ce-issuerAltName",
    "id-ce-cRLDistributionPoints",
    "id-ce-certificatePolicies",
    "id-ce-privateKeyUsagePeriod",
    "id-ce-authorityKeyIdentifier",
    "id-ce-nameConstraints",
    "id-ce-SignedCertificateTimestampList",
    "id-ce-subjectKeyIdentifier",
];

fn write_typed_body<W: Write>(w: &mut W, name: &str, body: &[u8]) -> io::Result<()> {
    let mut dec = Decoder::new(body);
    match name {
        "id-ce-basicConstraints" => {
            if let Some(bc) = BasicConstraints::parse(&mut dec) {
                w.write_all(b",")?;
                bc.write_json(w)?;
            }
        }
        "id-ce-keyUsage" => {
            if let Some(ku) = KeyUsage::parse(&mut dec) {
                w.write_all(b",")?;
                ku.write_json(w)?;
            }
        }
        "id-ce-extKeyUsage" => {
            if let Some(eku) = ExtKeyUsage::parse(&mut dec) {
                w.write_all(b",")?;
                eku.write_json(w)?;
            }
        }
        "id-ce-subjectAltName" => {
            if let Some(san) = AltNames::parse(&mut dec) {
                w.write_all(b",")?;
                san.write_json(w, "subject_alt_name")?;
            }
        }
        "id-ce-issuerAltName" => {
            if let Some(ian) = AltNames::parse(&mut dec) {
                w.write_all(b",")?;
                ian.write_json(w, "issuer_alt_name")?;
            }
        }
        "id-ce-cRLDistributionPoints" => {
            if let Some(cdp) = CrlDistributionPoints::parse(&mut dec) {
                w.write_all(b",")?;
                cdp.write_json(w)?;
            }
        }
        "id-ce-certificatePolicies" => {
            if let Some(cp) = CertificatePolicies::parse(&mut dec) {
                w.write_all(b",")?;
                cp.write_json(w)?;
            }
        }
        "id-ce-privateKeyUsagePeriod" => {
            if let Some(period) = PrivateKeyUsagePeriod::parse(&mut dec) {
                w.write_all(b",")?;
                period.write_json(w)?;
            }
        }
        "id-ce-authorityKeyIdentifier" => {
            if let Some(aki) = AuthorityKeyIdentifier::parse(&mut dec) {
                w.write_all(b",")?;
                aki.write_json(w)?;
            }
        }
        "id-ce-nameConstraints" => {
            if let Some(nc) = NameConstraints::parse(&mut dec) {
                w.write_all(b",")?;
                nc.write_json(w)?;
            }
        }
        "id-ce-SignedCertificateTimestampList" => {
            if let Ok(sct) = dec.read_tlv() {
                w.write_all(b",")?;
                sct.write_json_hex(w, "signed_certificate_timestamp_list")?;
            }
        }
        "id-ce-subjectKeyIdentifier" => {
            if let Ok(ski) = dec.read_tlv() {
                w.write_all(b",")?;
                ski.write_json_hex(w, "subject_key_identifier")?;
            }
        }
        _ => {}
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// GeneralName
// ---------------------------------------------------------------------------

/// GeneralName ::= CHOICE {
///   otherName [0], rfc822Name [1] IA5String, dNSName [2] IA5String,
///   x400Address [3], directoryName [4] Name, ediPartyName [5],
///   uniformResourceIdentifier [6] IA5String, iPAddress [7] OCTET STRING,
///   registeredID [8] OID }
#[derive(Debug, Clone, Copy)]
pub struct GeneralName<'a> {
    pub tlv: Tlv<'a>,
}

impl<'a> GeneralName<'a> {
    /// Render one GeneralName as a single-key JSON object chosen by the
    /// context tag. Unrecognized tags report the raw tag byte.
    pub fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let tag = self.tlv.tag;
        if tag.class != TagClass::ContextSpecific {
            return write!(w, "{{\"SAN explicit tag\": \"{:02x}\"}}", tag.to_byte());
        }
        match (tag.number, tag.constructed) {
            (0, true) => {
                // OtherName ::= SEQUENCE { type-id OID, value [0] EXPLICIT ANY }
                let mut inner = Decoder::new(self.tlv.value);
                w.write_all(b"{\"other_name\":{")?;
                let mut comma = "";
                if let Ok(type_id) = inner.read_oid() {
                    type_id.write_json_oid(w, "type_id")?;
                    comma = ",";
                }
                if let Ok(value) = inner.read_tlv() {
                    w.write_all(comma.as_bytes())?;
                    value.write_json_hex(w, "value")?;
                }
                w.write_all(b"}}")
            }
            (1, false) => {
                w.write_all(b"{")?;
                self.tlv.write_json_escaped_string(w, "rfc822_name")?;
                w.write_all(b"}")
            }
            (2, false) => {
                w.write_all(b"{")?;
                self.tlv.write_json_escaped_string(w, "dns_name")?;
                w.write_all(b"}")
            }
            (4, true) => {
                // [4] EXPLICIT wraps the Name SEQUENCE
                let mut inner = Decoder::new(self.tlv.value);
                match Name::parse(&mut inner) {
                    Ok(name) => {
                        w.write_all(b"{")?;
                        name.write_json(w, "directory_name")?;
                        w.write_all(b"}")
                    }
                    Err(_) => {
                        w.write_all(b"{")?;
                        self.tlv.write_json_hex(w, "directory_name")?;
                        w.write_all(b"}")
                    }
                }
            }
            (5, _) => {
                w.write_all(b"{")?;
                self.tlv.write_json_hex(w, "edi_party_name")?;
                w.write_all(b"}")
            }
            (6, false) => {
                w.write_all(b"{")?;
                self.tlv.write_json_escaped_string(w, "uri")?;
                w.write_all(b"}")
            }
            (7, false) => {
                w.write_all(b"{")?;
                self.tlv.write_json_ip_address(w, "ip_address")?;
                w.write_all(b"}")
            }
            (8, false) => {
                w.write_all(b"{")?;
                self.tlv.write_json_oid(w, "registered_id")?;
                w.write_all(b"}")
            }
            _ => write!(w, "{{\"SAN explicit tag\": \"{:02x}\"}}", tag.to_byte()),
        }
    }
}

/// GeneralNames ::= SEQUENCE OF GeneralName, as used by SubjectAltName and
/// IssuerAltName.
#[derive(Debug, Clone, Default)]
pub struct AltNames<'a> {
    pub names: Vec<GeneralName<'a>>,
}

impl<'a> AltNames<'a> {
    pub fn parse(dec: &mut Decoder<'a>) -> Option<Self> {
        let mut seq = dec.read_sequence().ok()?;
        let mut names = Vec::new();
        while !seq.is_empty() {
            let Ok(tlv) = seq.read_tlv() else {
                break;
            };
            names.push(GeneralName { tlv });
        }
        Some(Self { names })
    }

    /// `"key":[{...},{...}]` in input order.
    pub fn write_json<W: Write>(&self, w: &mut W, key: &str) -> io::Result<()> {
        write!(w, "\"{key}\":[")?;
        let mut comma = "";
        for name in &self.names {
            w.write_all(comma.as_bytes())?;
            name.write_json(w)?;
            comma = ",";
        }
        w.write_all(b"]")
    }
}

// ---------------------------------------------------------------------------
// BasicConstraints
// ---------------------------------------------------------------------------

/// BasicConstraints ::= SEQUENCE { cA BOOLEAN DEFAULT FALSE,
/// pathLenConstraint INTEGER OPTIONAL }
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicConstraints {
    pub ca: bool,
    pub path_len_constraint: u64,
}

impl BasicConstraints {
    pub fn parse(dec: &mut Decoder<'_>) -> Option<Self> {
        let mut seq = dec.read_sequence().ok()?;
        let mut bc = BasicConstraints::default();
        if let Ok(tag) = seq.peek_tag() {
            if tag.class == TagClass::Universal && tag.number == tags::BOOLEAN as u32 {
                bc.ca = seq.read_boolean().ok()?;
            }
        }
        if !seq.is_empty() {
            let path_len = seq.read_integer().ok()?;
            bc.path_len_constraint = path_len
                .value
                .iter()
                .fold(0u64, |acc, &b| (acc << 8) | b as u64);
        }
        Some(bc)
    }

    pub fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write!(
            w,
            "\"BasicConstraints\":{{\"ca\":{},\"pathLenConstraint\":{}}}",
            self.ca, self.path_len_constraint
        )
    }
}

// ---------------------------------------------------------------------------
// KeyUsage
// ---------------------------------------------------------------------------

const KEY_USAGE_FLAGS: &[&str] = &[
    "digital_signature",
    "non_repudiation",
    "key_encipherment",
    "data_encipherment",
    "key_agreement",
    "key_cert_sign",
    "crl_sign",
    "encipher_only",
    "decipher_only",
];

/// KeyUsage ::= BIT STRING with nine named bits.
#[derive(Debug, Clone, Copy)]
pub struct KeyUsage<'a> {
    pub bit_string: Tlv<'a>,
}

impl<'a> KeyUsage<'a> {
    pub fn parse(dec: &mut Decoder<'a>) -> Option<Self> {
        let tlv = dec.read_tlv().ok()?;
        if !tlv.is_universal(tags::BIT_STRING) {
            return None;
        }
        Some(Self { bit_string: tlv })
    }

    pub fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.bit_string
            .write_json_bitstring_flags(w, "key_usage", KEY_USAGE_FLAGS)
    }
}

// ---------------------------------------------------------------------------
// ExtKeyUsage
// ---------------------------------------------------------------------------

/// ExtKeyUsageSyntax ::= SEQUENCE OF KeyPurposeId (OID)
#[derive(Debug, Clone, Default)]
pub struct ExtKeyUsage<'a> {
    pub purposes: Vec<Tlv<'a>>,
}

impl<'a> ExtKeyUsage<'a> {
    pub fn parse(dec: &mut Decoder<'a>) -> Option<Self> {
        let mut seq = dec.read_sequence().ok()?;
        let mut purposes = Vec::new();
        while !seq.is_empty() {
            let Ok(purpose) = seq.read_oid() else {
                break;
            };
            purposes.push(purpose);
        }
        Some(Self { purposes })
    }

    /// `"ext_key_usage":["id-kp-serverAuth",...]`; unknown purposes appear
    /// as hex strings.
    pub fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"\"ext_key_usage\":[")?;
        let mut comma = "";
        for purpose in &self.purposes {
            let name = oid::oid_string(purpose.value);
            w.write_all(comma.as_bytes())?;
            if oid::is_known(name) {
                write!(w, "\"{name}\"")?;
            } else {
                w.write_all(b"\"")?;
                write_hex(w, purpose.value)?;
                w.write_all(b"\"")?;
            }
            comma = ",";
        }
        w.write_all(b"]")
    }
}

// ---------------------------------------------------------------------------
// CRLDistributionPoints
// ---------------------------------------------------------------------------

/// DistributionPointName ::= CHOICE { fullName [0] GeneralNames,
/// nameRelativeToCRLIssuer [1] RelativeDistinguishedName }
#[derive(Debug, Clone, Copy)]
pub enum DistributionPointName<'a> {
    FullName(GeneralName<'a>),
    RelativeName(Attribute<'a>),
}

impl<'a> DistributionPointName<'a> {
    fn parse(content: &'a [u8], tag_number: u32) -> Option<Self> {
        let mut inner = Decoder::new(content);
        match tag_number {
            0 => {
                let tlv = inner.read_tlv().ok()?;
                Some(Self::FullName(GeneralName { tlv }))
            }
            1 => {
                // RelativeDistinguishedName content: AttributeTypeAndValue
                // sequences. Only the first is reported.
                let mut atav = inner.read_sequence().ok()?;
                let attr = Attribute {
                    attribute_type: atav.read_oid().ok(),
                    attribute_value: atav.read_tlv().ok(),
                };
                Some(Self::RelativeName(attr))
            }
            _ => None,
        }
    }

    fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"\"distribution_point_name\":{")?;
        match self {
            Self::FullName(gn) => {
                w.write_all(b"\"full_name\":")?;
                gn.write_json(w)?;
            }
            Self::RelativeName(attr) => {
                w.write_all(b"\"name_relative_to_crl_issuer\":")?;
                attr.write_json(w)?;
            }
        }
        w.write_all(b"}")
    }
}

/// DistributionPoint ::= SEQUENCE { distributionPoint [0] OPTIONAL,
/// reasons [1] OPTIONAL, cRLIssuer [2] OPTIONAL }. Reasons and cRLIssuer
/// are parsed past but not rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistributionPoint<'a> {
    pub name: Option<DistributionPointName<'a>>,
}

impl<'a> DistributionPoint<'a> {
    fn parse(seq: &mut Decoder<'a>) -> Self {
        let mut dp = DistributionPoint::default();
        while !seq.is_empty() {
            let Ok(tlv) = seq.read_tlv() else {
                break;
            };
            if tlv.is_context(0) && tlv.tag.constructed && dp.name.is_none() {
                // The [0] wraps the DistributionPointName CHOICE, itself
                // context-tagged.
                let mut inner = Decoder::new(tlv.value);
                if let Ok(choice) = inner.read_tlv() {
                    if choice.tag.class == TagClass::ContextSpecific {
                        dp.name = DistributionPointName::parse(choice.value, choice.tag.number);
                    }
                }
            }
        }
        dp
    }
}

/// CRLDistributionPoints ::= SEQUENCE OF DistributionPoint
#[derive(Debug, Clone, Default)]
pub struct CrlDistributionPoints<'a> {
    pub points: Vec<DistributionPoint<'a>>,
}

impl<'a> CrlDistributionPoints<'a> {
    pub fn parse(dec: &mut Decoder<'a>) -> Option<Self> {
        let mut seq = dec.read_sequence().ok()?;
        let mut points = Vec::new();
        while !seq.is_empty() {
            let Ok(mut dp_seq) = seq.read_sequence() else {
                break;
            };
            points.push(DistributionPoint::parse(&mut dp_seq));
        }
        Some(Self { points })
    }

    pub fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"\"crl_distribution_points\":[")?;
        let mut comma = "";
        for point in &self.points {
            write!(w, "{comma}{{\"crl_distribution_point\":[")?;
            if let Some(name) = &point.name {
                w.write_all(b"{")?;
                name.write_json(w)?;
                w.write_all(b"}")?;
            }
            w.write_all(b"]}")?;
            comma = ",";
        }
        w.write_all(b"]")
    }
}

// ---------------------------------------------------------------------------
// CertificatePolicies
// ---------------------------------------------------------------------------

/// PolicyQualifierInfo ::= SEQUENCE { policyQualifierId OID, qualifier ANY }
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyQualifierInfo<'a> {
    pub qualifier_id: Option<Tlv<'a>>,
    pub qualifier: Option<Tlv<'a>>,
}

impl<'a> PolicyQualifierInfo<'a> {
    fn parse(dec: &mut Decoder<'a>) -> Option<Self> {
        let mut seq = dec.read_sequence().ok()?;
        let qualifier_id = seq.read_oid().ok();
        let qualifier = if seq.is_empty() {
            None
        } else {
            seq.read_tlv().ok()
        };
        Some(Self {
            qualifier_id,
            qualifier,
        })
    }

    fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"\"policy_qualifier_info\":{")?;
        let mut comma = "";
        if let Some(id) = self.qualifier_id {
            id.write_json_hex(w, "qualifier_id")?;
            comma = ",";
        }
        if let Some(q) = self.qualifier {
            w.write_all(comma.as_bytes())?;
            q.write_json_escaped_string(w, "qualifier")?;
        }
        w.write_all(b"}")
    }
}

/// PolicyInformation ::= SEQUENCE { policyIdentifier OID,
/// policyQualifiers SEQUENCE OF PolicyQualifierInfo OPTIONAL }.
/// Only the first qualifier is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyInformation<'a> {
    pub policy_identifier: Option<Tlv<'a>>,
    pub qualifier: Option<PolicyQualifierInfo<'a>>,
}

impl<'a> PolicyInformation<'a> {
    fn parse(dec: &mut Decoder<'a>) -> Option<Self> {
        let mut seq = dec.read_sequence().ok()?;
        let policy_identifier = seq.read_oid().ok();
        let mut qualifier = None;
        if !seq.is_empty() {
            if let Ok(mut quals) = seq.read_sequence() {
                qualifier = PolicyQualifierInfo::parse(&mut quals);
            }
        }
        Some(Self {
            policy_identifier,
            qualifier,
        })
    }

    fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"\"policy_information\":[{")?;
        let mut comma = "";
        if let Some(id) = self.policy_identifier {
            id.write_json_hex(w, "policy_identifier")?;
            comma = ",";
        }
        if let Some(qualifier) = &self.qualifier {
            w.write_all(comma.as_bytes())?;
            qualifier.write_json(w)?;
        }
        w.write_all(b"}]")
    }
}

/// certificatePolicies ::= SEQUENCE OF PolicyInformation
#[derive(Debug, Clone, Default)]
pub struct CertificatePolicies<'a> {
    pub policies: Vec<PolicyInformation<'a>>,
}

impl<'a> CertificatePolicies<'a> {
    pub fn parse(dec: &mut Decoder<'a>) -> Option<Self> {
        let mut seq = dec.read_sequence().ok()?;
        let mut policies = Vec::new();
        while !seq.is_empty() {
            let Some(pi) = PolicyInformation::parse(&mut seq) else {
                break;
            };
            policies.push(pi);
        }
        Some(Self { policies })
    }

    pub fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"\"certificate_policies\":[")?;
        let mut comma = "";
        for policy in &self.policies {
            write!(w, "{comma}{{")?;
            policy.write_json(w)?;
            w.write_all(b"}")?;
            comma = ",";
        }
        w.write_all(b"]")
    }
}

// ---------------------------------------------------------------------------
// PrivateKeyUsagePeriod
// ---------------------------------------------------------------------------

/// PrivateKeyUsagePeriod ::= SEQUENCE { notBefore [0] GeneralizedTime
/// OPTIONAL, notAfter [1] GeneralizedTime OPTIONAL }
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivateKeyUsagePeriod<'a> {
    pub not_before: Option<Tlv<'a>>,
    pub not_after: Option<Tlv<'a>>,
}

impl<'a> PrivateKeyUsagePeriod<'a> {
    pub fn parse(dec: &mut Decoder<'a>) -> Option<Self> {
        let mut seq = dec.read_sequence().ok()?;
        let mut period = PrivateKeyUsagePeriod::default();
        while !seq.is_empty() {
            let Ok(tlv) = seq.read_tlv() else {
                break;
            };
            if tlv.is_context(0) && !tlv.tag.constructed {
                period.not_before = Some(tlv);
            } else if tlv.is_context(1) && !tlv.tag.constructed {
                period.not_after = Some(tlv);
            }
        }
        Some(period)
    }

    pub fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"\"private_key_usage_period\":[")?;
        let mut comma = "";
        if let Some(nb) = self.not_before {
            w.write_all(b"{")?;
            nb.write_json_generalized_time(w, "not_before")?;
            w.write_all(b"}")?;
            comma = ",";
        }
        if let Some(na) = self.not_after {
            w.write_all(comma.as_bytes())?;
            w.write_all(b"{")?;
            na.write_json_generalized_time(w, "not_after")?;
            w.write_all(b"}")?;
        }
        w.write_all(b"]")
    }
}

// ---------------------------------------------------------------------------
// AuthorityKeyIdentifier
// ---------------------------------------------------------------------------

/// AuthorityKeyIdentifier ::= SEQUENCE { keyIdentifier [0] OPTIONAL,
/// authorityCertIssuer [1] GeneralNames OPTIONAL,
/// authorityCertSerialNumber [2] OPTIONAL }
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorityKeyIdentifier<'a> {
    pub key_identifier: Option<Tlv<'a>>,
    pub cert_issuer: Option<GeneralName<'a>>,
    pub cert_serial_number: Option<Tlv<'a>>,
}

impl<'a> AuthorityKeyIdentifier<'a> {
    pub fn parse(dec: &mut Decoder<'a>) -> Option<Self> {
        let mut seq = dec.read_sequence().ok()?;
        let mut aki = AuthorityKeyIdentifier::default();
        while !seq.is_empty() {
            let Ok(tlv) = seq.read_tlv() else {
                break;
            };
            if tlv.is_context(0) && !tlv.tag.constructed {
                aki.key_identifier = Some(tlv);
            } else if tlv.is_context(1) && tlv.tag.constructed {
                aki.cert_issuer = Some(GeneralName { tlv });
            } else if tlv.is_context(2) && !tlv.tag.constructed {
                aki.cert_serial_number = Some(tlv);
            }
        }
        Some(aki)
    }

    pub fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"\"authority_key_identifier\":{")?;
        let mut comma = "";
        if let Some(ki) = self.key_identifier {
            ki.write_json_hex(w, "key_identifier")?;
            comma = ",";
        }
        if let Some(issuer) = &self.cert_issuer {
            write!(w, "{comma}\"cert_issuer\":")?;
            issuer.write_json(w)?;
            comma = ",";
        }
        if let Some(serial) = self.cert_serial_number {
            w.write_all(comma.as_bytes())?;
            serial.write_json_hex(w, "cert_serial_number")?;
        }
        w.write_all(b"}")
    }
}

// ---------------------------------------------------------------------------
// NameConstraints
// ---------------------------------------------------------------------------

/// GeneralSubtree ::= SEQUENCE { base GeneralName, minimum [0] DEFAULT 0,
/// maximum [1] OPTIONAL }
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralSubtree<'a> {
    pub base: Option<GeneralName<'a>>,
    pub minimum: Option<Tlv<'a>>,
    pub maximum: Option<Tlv<'a>>,
}

impl<'a> GeneralSubtree<'a> {
    fn parse(dec: &mut Decoder<'a>) -> Option<Self> {
        let mut seq = dec.read_sequence().ok()?;
        let mut subtree = GeneralSubtree {
            base: seq.read_tlv().ok().map(|tlv| GeneralName { tlv }),
            ..Default::default()
        };
        while !seq.is_empty() {
            let Ok(tlv) = seq.read_tlv() else {
                break;
            };
            if tlv.is_context(0) && !tlv.tag.constructed {
                subtree.minimum = Some(tlv);
            } else if tlv.is_context(1) && !tlv.tag.constructed {
                subtree.maximum = Some(tlv);
            }
        }
        Some(subtree)
    }

    fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"\"permitted_subtree\":")?;
        match &self.base {
            Some(base) => base.write_json(w)?,
            None => w.write_all(b"{}")?,
        }
        if self.minimum.is_none() {
            w.write_all(b",\"minimum\":0")?;
        }
        Ok(())
    }
}

/// NameConstraints ::= SEQUENCE { permittedSubtrees [0] OPTIONAL,
/// excludedSubtrees [1] OPTIONAL }. Excluded subtrees are parsed past but
/// not rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameConstraints<'a> {
    pub permitted_subtrees: Option<Tlv<'a>>,
    pub excluded_subtrees: Option<Tlv<'a>>,
}

impl<'a> NameConstraints<'a> {
    pub fn parse(dec: &mut Decoder<'a>) -> Option<Self> {
        let mut seq = dec.read_sequence().ok()?;
        let mut nc = NameConstraints::default();
        while !seq.is_empty() {
            let Ok(tlv) = seq.read_tlv() else {
                break;
            };
            if tlv.is_context(0) && tlv.tag.constructed {
                nc.permitted_subtrees = Some(tlv);
            } else if tlv.is_context(1) && tlv.tag.constructed {
                nc.excluded_subtrees = Some(tlv);
            }
        }
        Some(nc)
    }

    pub fn write_json<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"\"name_constraints\":{")?;
        if let Some(permitted) = self.permitted_subtrees {
            let mut inner = Decoder::new(permitted.value);
            if let Some(subtree) = GeneralSubtree::parse(&mut inner) {
                subtree.write_json(w)?;
            }
        }
        w.write_all(b"}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mercury_utils::asn1::Encoder;

    fn general_name(tag_num: u8, constructed: bool, content: &[u8]) -> Vec<u8> {
        let mut enc = Encoder::new();
        enc.write_context_specific(tag_num, constructed, content);
        enc.finish()
    }

    fn render_general_name(der: &[u8]) -> String {
        let tlv = Decoder::new(der).read_tlv().unwrap();
        let mut out = Vec::new();
        GeneralName { tlv }.write_json(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_general_name_strings() {
        let der = general_name(1, false, b"a@example.com");
        assert_eq!(render_general_name(&der), "{\"rfc822_name\":\"a@example.com\"}");

        let der = general_name(2, false, b"example.com");
        assert_eq!(render_general_name(&der), "{\"dns_name\":\"example.com\"}");

        let der = general_name(6, false, b"https://example.com/");
        assert_eq!(render_general_name(&der), "{\"uri\":\"https://example.com/\"}");
    }

    #[test]
    fn test_general_name_ip_address() {
        let der = general_name(7, false, &[10, 0, 0, 1]);
        assert_eq!(render_general_name(&der), "{\"ip_address\":\"10.0.0.1\"}");
    }

    #[test]
    fn test_general_name_registered_id() {
        let der = general_name(8, false, oid::der_for("id-kp-serverAuth").unwrap());
        assert_eq!(
            render_general_name(&der),
            "{\"registered_id\":\"id-kp-serverAuth\"}"
        );
    }

    #[test]
    fn test_general_name_other_name() {
        let mut inner = Encoder::new();
        inner.write_oid(oid::der_for("id-kp-serverAuth").unwrap());
        inner.write_context_specific(0, true, &[0xAA]);
        let der = general_name(0, true, &inner.finish());
        let json = render_general_name(&der);
        assert!(json.starts_with("{\"other_name\":{"), "got: {json}");
        assert!(json.contains("\"type_id\":\"id-kp-serverAuth\""), "got: {json}");
    }

    #[test]
    fn test_general_name_unknown_tag_reports_tag_byte() {
        // x400Address [3] is not rendered by name
        let der = general_name(3, true, &[0x01, 0x02]);
        assert_eq!(render_general_name(&der), "{\"SAN explicit tag\": \"a3\"}");
    }

    #[test]
    fn test_key_usage_flags_render() {
        // 1 unused bit, 0x06: keyCertSign + cRLSign
        let mut enc = Encoder::new();
        enc.write_tlv(0x03, &[0x01, 0x06]);
        let der = enc.finish();
        let ku = KeyUsage::parse(&mut Decoder::new(&der)).unwrap();
        let mut out = Vec::new();
        ku.write_json(&mut out).unwrap();
        let json = String::from_utf8(out).unwrap();
        assert!(json.contains("\"key_cert_sign\":true"), "got: {json}");
        assert!(json.contains("\"crl_sign\":true"), "got: {json}");
        assert!(json.contains("\"digital_signature\":false"), "got: {json}");
    }

    #[test]
    fn test_ext_key_usage_renders_names_and_hex() {
        let mut inner = Encoder::new();
        inner.write_oid(oid::der_for("id-kp-serverAuth").unwrap());
        inner.write_oid(&[0x2A, 0x03, 0x04]);
        let mut enc = Encoder::new();
        enc.write_sequence(&inner.finish());
        let der = enc.finish();

        let eku = ExtKeyUsage::parse(&mut Decoder::new(&der)).unwrap();
        let mut out = Vec::new();
        eku.write_json(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\"ext_key_usage\":[\"id-kp-serverAuth\",\"2a0304\"]"
        );
    }

    #[test]
    fn test_authority_key_identifier_fields() {
        let mut inner = Encoder::new();
        inner.write_context_specific(0, false, &[0xAB, 0xCD]);
        inner.write_context_specific(2, false, &[0x05]);
        let mut enc = Encoder::new();
        enc.write_sequence(&inner.finish());
        let der = enc.finish();

        let aki = AuthorityKeyIdentifier::parse(&mut Decoder::new(&der)).unwrap();
        let mut out = Vec::new();
        aki.write_json(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\"authority_key_identifier\":{\"key_identifier\":\"abcd\",\
             \"cert_serial_number\":\"05\"}"
        );
    }

    #[test]
    fn test_name_constraints_renders_first_permitted_subtree() {
        let mut base = Encoder::new();
        base.write_context_specific(2, false, b"example.com");
        let mut subtree = Encoder::new();
        subtree.write_sequence(&base.finish());
        let mut inner = Encoder::new();
        inner.write_context_specific(0, true, &subtree.finish());
        let mut enc = Encoder::new();
        enc.write_sequence(&inner.finish());
        let der = enc.finish();

        let nc = NameConstraints::parse(&mut Decoder::new(&der)).unwrap();
        let mut out = Vec::new();
        nc.write_json(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\"name_constraints\":{\"permitted_subtree\":{\"dns_name\":\"example.com\"},\
             \"minimum\":0}"
        );
    }

    #[test]
    fn test_private_key_usage_period() {
        let mut inner = Encoder::new();
        inner.write_context_specific(0, false, b"20200101000000Z");
        inner.write_context_specific(1, false, b"20300101000000Z");
        let mut enc = Encoder::new();
        enc.write_sequence(&inner.finish());
        let der = enc.finish();

        let period = PrivateKeyUsagePeriod::parse(&mut Decoder::new(&der)).unwrap();
        let mut out = Vec::new();
        period.write_json(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\"private_key_usage_period\":[{\"not_before\":\"2020-01-01T00:00:00Z\"},\
             {\"not_after\":\"2030-01-01T00:00:00Z\"}]"
        );
    }

    #[test]
    fn test_malformed_extension_body_drops_typed_rendering() {
        let ext = Extension {
            extn_id: Some(Decoder::new(&[0x06, 0x03, 0x55, 0x1D, 0x13]).read_tlv().unwrap()),
            critical: false,
            extn_value: Some(Decoder::new(&[0x04, 0x02, 0xFF, 0xFF]).read_tlv().unwrap()),
        };
        let mut out = Vec::new();
        ext.write_json(&mut out).unwrap();
        // Hex duplicate and criticality survive; no BasicConstraints body
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"id-ce-basicConstraints\":\"ffff\",\"critical\":false}"
        );
    }
}
