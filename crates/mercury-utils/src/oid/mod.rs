//! OID (Object Identifier) management.
//!
//! The dictionary maps DER-encoded OID content bytes to stable symbolic
//! names. Lookup is by exact byte equality; a miss returns [`UNKNOWN_OID`].
//! Callers dispatch on the returned name, so the names are part of the
//! output format and must not change.

use mercury_types::DecodeError;

/// Sentinel name returned for OIDs the dictionary does not know.
pub const UNKNOWN_OID: &str = "unknown_oid";

/// True if `name` came from the dictionary rather than the unknown sentinel.
pub fn is_known(name: &str) -> bool {
    name != UNKNOWN_OID
}

/// Resolve DER-encoded OID content bytes to a symbolic name.
pub fn oid_string(der: &[u8]) -> &'static str {
    KNOWN_OIDS
        .iter()
        .find(|(bytes, _)| *bytes == der)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_OID)
}

/// DER content bytes for a dictionary name, for tests and dispatch checks.
pub fn der_for(name: &str) -> Option<&'static [u8]> {
    KNOWN_OIDS
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(bytes, _)| *bytes)
}

/// The full dictionary, in (DER content bytes, name) form.
pub fn entries() -> &'static [(&'static [u8], &'static str)] {
    KNOWN_OIDS
}

static KNOWN_OIDS: &[(&[u8], &str)] = &[
    // X.520 name attributes (2.5.4.*)
    (&[0x55, 0x04, 0x03], "commonName"),
    (&[0x55, 0x04, 0x04], "surname"),
    (&[0x55, 0x04, 0x05], "serialNumber"),
    (&[0x55, 0x04, 0x06], "countryName"),
    (&[0x55, 0x04, 0x07], "localityName"),
    (&[0x55, 0x04, 0x08], "stateOrProvinceName"),
    (&[0x55, 0x04, 0x09], "streetAddress"),
    (&[0x55, 0x04, 0x0A], "organizationName"),
    (&[0x55, 0x04, 0x0B], "organizationalUnitName"),
    (&[0x55, 0x04, 0x0C], "title"),
    (&[0x55, 0x04, 0x0F], "businessCategory"),
    (&[0x55, 0x04, 0x11], "postalCode"),
    (&[0x55, 0x04, 0x2A], "givenName"),
    (
        &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x09, 0x01],
        "emailAddress",
    ),
    (
        &[0x09, 0x92, 0x26, 0x89, 0x93, 0xF2, 0x2C, 0x64, 0x01, 0x19],
        "domainComponent",
    ),
    // Certificate extensions (2.5.29.*)
    (&[0x55, 0x1D, 0x0E], "id-ce-subjectKeyIdentifier"),
    (&[0x55, 0x1D, 0x0F], "id-ce-keyUsage"),
    (&[0x55, 0x1D, 0x10], "id-ce-privateKeyUsagePeriod"),
    (&[0x55, 0x1D, 0x11], "id-ce-subjectAltName"),
    (&[0x55, 0x1D, 0x12], "id-ce-issuerAltName"),
    (&[0x55, 0x1D, 0x13], "id-ce-basicConstraints"),
    (&[0x55, 0x1D, 0x1E], "id-ce-nameConstraints"),
    (&[0x55, 0x1D, 0x1F], "id-ce-cRLDistributionPoints"),
    (&[0x55, 0x1D, 0x20], "id-ce-certificatePolicies"),
    (&[0x55, 0x1D, 0x23], "id-ce-authorityKeyIdentifier"),
    (&[0x55, 0x1D, 0x25], "id-ce-extKeyUsage"),
    (
        &[0x2B, 0x06, 0x01, 0x04, 0x01, 0xD6, 0x79, 0x02, 0x04, 0x02],
        "id-ce-SignedCertificateTimestampList",
    ),
    (
        &[0x2B, 0x06, 0x01, 0x05, 0x05, 0x07, 0x01, 0x01],
        "id-pe-authorityInfoAccess",
    ),
    // RSA signature and key algorithms (1.2.840.113549.1.1.*)
    (
        &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01],
        "rsaEncryption",
    ),
    (
        &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x04],
        "md5WithRSAEncryption",
    ),
    (
        &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x05],
        "sha1WithRSAEncryption",
    ),
    (
        &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x0B],
        "sha256WithRSAEncryption",
    ),
    (
        &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x0C],
        "sha384WithRSAEncryption",
    ),
    (
        &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x0D],
        "sha512WithRSAEncryption",
    ),
    (
        &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x0E],
        "sha224WithRSAEncryption",
    ),
    // EC algorithms (1.2.840.10045.*)
    (&[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x02, 0x01], "id-ecPublicKey"),
    (
        &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x04, 0x01],
        "ecdsa-with-SHA1",
    ),
    (
        &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x04, 0x03, 0x01],
        "ecdsa-with-SHA224",
    ),
    (
        &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x04, 0x03, 0x02],
        "ecdsa-with-SHA256",
    ),
    (
        &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x04, 0x03, 0x03],
        "ecdsa-with-SHA384",
    ),
    (
        &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x04, 0x03, 0x04],
        "ecdsa-with-SHA512",
    ),
    // Named curves. secp192r1 shares prime192v1's OID, so the byte table
    // resolves it to the X9.62 name.
    (&[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x01], "prime192v1"),
    (&[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x02], "prime192v2"),
    (&[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x03], "prime192v3"),
    (&[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x04], "prime239v1"),
    (&[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x05], "prime239v2"),
    (&[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x06], "prime239v3"),
    (&[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x07], "prime256v1"),
    (&[0x2B, 0x81, 0x04, 0x00, 0x21], "secp224r1"),
    (&[0x2B, 0x81, 0x04, 0x00, 0x22], "secp384r1"),
    (&[0x2B, 0x81, 0x04, 0x00, 0x23], "secp521r1"),
    // Edwards-curve algorithms
    (&[0x2B, 0x65, 0x70], "Ed25519"),
    (&[0x2B, 0x65, 0x71], "Ed448"),
    // Extended key usage purposes (1.3.6.1.5.5.7.3.*)
    (
        &[0x2B, 0x06, 0x01, 0x05, 0x05, 0x07, 0x03, 0x01],
        "id-kp-serverAuth",
    ),
    (
        &[0x2B, 0x06, 0x01, 0x05, 0x05, 0x07, 0x03, 0x02],
        "id-kp-clientAuth",
    ),
    (
        &[0x2B, 0x06, 0x01, 0x05, 0x05, 0x07, 0x03, 0x03],
        "id-kp-codeSigning",
    ),
    (
        &[0x2B, 0x06, 0x01, 0x05, 0x05, 0x07, 0x03, 0x04],
        "id-kp-emailProtection",
    ),
    (
        &[0x2B, 0x06, 0x01, 0x05, 0x05, 0x07, 0x03, 0x08],
        "id-kp-timeStamping",
    ),
    (
        &[0x2B, 0x06, 0x01, 0x05, 0x05, 0x07, 0x03, 0x09],
        "id-kp-OCSPSigning",
    ),
    // Hash algorithms
    (&[0x2B, 0x0E, 0x03, 0x02, 0x1A], "id-sha1"),
    (
        &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01],
        "id-sha256",
    ),
    (
        &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x02],
        "id-sha384",
    ),
    (
        &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x03],
        "id-sha512",
    ),
];

/// A parsed OID represented as a sequence of arc values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    arcs: Vec<u32>,
}

impl Oid {
    /// Create an OID from a slice of arc values.
    pub fn new(arcs: &[u32]) -> Self {
        Self {
            arcs: arcs.to_vec(),
        }
    }

    /// Return the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Encode this OID to DER bytes (just the value, no tag/length).
    pub fn to_der_value(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        if self.arcs.len() >= 2 {
            buf.push((self.arcs[0] * 40 + self.arcs[1]) as u8);
            for &arc in &self.arcs[2..] {
                encode_arc(&mut buf, arc);
            }
        }
        buf
    }

    /// Parse an OID from DER value bytes.
    pub fn from_der_value(data: &[u8]) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::Truncated);
        }
        let mut arcs = Vec::new();
        let first = data[0] as u32;
        arcs.push(first / 40);
        arcs.push(first % 40);

        let mut i = 1;
        while i < data.len() {
            let (arc, consumed) = decode_arc(&data[i..])?;
            arcs.push(arc);
            i += consumed;
        }

        Ok(Self { arcs })
    }

    /// Return the dotted-string representation (e.g., "1.2.840.113549.1.1.1").
    pub fn to_dot_string(&self) -> String {
        self.arcs
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_dot_string())
    }
}

fn encode_arc(buf: &mut Vec<u8>, mut value: u32) {
    if value < 0x80 {
        buf.push(value as u8);
        return;
    }
    let mut bytes = Vec::new();
    while value > 0 {
        bytes.push((value & 0x7F) as u8);
        value >>= 7;
    }
    bytes.reverse();
    for (i, b) in bytes.iter().enumerate() {
        if i < bytes.len() - 1 {
            buf.push(b | 0x80);
        } else {
            buf.push(*b);
        }
    }
}

fn decode_arc(data: &[u8]) -> Result<(u32, usize), DecodeError> {
    let mut value: u32 = 0;
    for (i, &byte) in data.iter().enumerate() {
        value = value.checked_shl(7).ok_or(DecodeError::BadLength)? | (byte & 0x7F) as u32;
        if (byte & 0x80) == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(DecodeError::Truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oid_roundtrip() {
        let oid = Oid::new(&[1, 2, 840, 113549, 1, 1, 1]);
        let der = oid.to_der_value();
        let parsed = Oid::from_der_value(&der).unwrap();
        assert_eq!(oid, parsed);
    }

    #[test]
    fn test_dot_string() {
        let oid = Oid::new(&[1, 2, 840, 113549, 1, 1, 1]);
        assert_eq!(oid.to_dot_string(), "1.2.840.113549.1.1.1");
    }

    #[test]
    fn test_rsa_encryption_lookup() {
        let der = [0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01];
        assert_eq!(oid_string(&der), "rsaEncryption");
    }

    #[test]
    fn test_unknown_oid_sentinel() {
        let name = oid_string(&[0x2A, 0x03, 0x04]);
        assert_eq!(name, UNKNOWN_OID);
        assert!(!is_known(name));
        assert!(is_known("id-ce-basicConstraints"));
    }

    #[test]
    fn test_every_dictionary_entry_roundtrips() {
        // Arc-decode then re-encode must reproduce the table bytes exactly:
        // the table holds canonical DER.
        for (der, name) in entries() {
            let oid = Oid::from_der_value(der).unwrap_or_else(|_| panic!("decode {name}"));
            assert_eq!(&oid.to_der_value(), der, "re-encode mismatch for {name}");
            assert_eq!(oid_string(der), *name);
        }
    }

    #[test]
    fn test_dictionary_names_are_unique() {
        for (i, (_, name)) in entries().iter().enumerate() {
            for (_, other) in &entries()[i + 1..] {
                assert_ne!(name, other);
            }
        }
    }

    #[test]
    fn test_der_for_inverts_oid_string() {
        for (der, name) in entries() {
            assert_eq!(der_for(name), Some(*der));
        }
        assert_eq!(der_for("no-such-name"), None);
    }

    #[test]
    fn test_known_extension_oids() {
        assert_eq!(oid_string(&[0x55, 0x1D, 0x13]), "id-ce-basicConstraints");
        assert_eq!(oid_string(&[0x55, 0x1D, 0x0F]), "id-ce-keyUsage");
        assert_eq!(oid_string(&[0x55, 0x1D, 0x11]), "id-ce-subjectAltName");
        assert_eq!(
            oid_string(&[0x2B, 0x06, 0x01, 0x04, 0x01, 0xD6, 0x79, 0x02, 0x04, 0x02]),
            "id-ce-SignedCertificateTimestampList"
        );
    }

    #[test]
    fn test_curve_oids() {
        // prime256v1 = 1.2.840.10045.3.1.7
        let p256 = Oid::new(&[1, 2, 840, 10045, 3, 1, 7]).to_der_value();
        assert_eq!(oid_string(&p256), "prime256v1");
        // secp224r1 = 1.3.132.0.33
        let p224 = Oid::new(&[1, 3, 132, 0, 33]).to_der_value();
        assert_eq!(oid_string(&p224), "secp224r1");
    }

    #[test]
    fn test_domain_component_encoding() {
        let dc = Oid::new(&[0, 9, 2342, 19200300, 100, 1, 25]).to_der_value();
        assert_eq!(oid_string(&dc), "domainComponent");
    }
}
