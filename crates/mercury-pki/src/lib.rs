#![forbid(unsafe_code)]
#![doc = "X.509 certificate metadata extraction for mercury."]

#[cfg(feature = "x509")]
pub mod x509;
