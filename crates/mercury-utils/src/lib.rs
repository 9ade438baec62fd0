#![forbid(unsafe_code)]
#![doc = "Utility modules for mercury: ASN.1 DER, OID dictionary, PEM."]

#[cfg(feature = "asn1")]
pub mod asn1;

#[cfg(feature = "oid")]
pub mod oid;

#[cfg(feature = "pem")]
pub mod pem;
