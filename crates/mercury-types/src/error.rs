/// DER decoding errors.
///
/// These are deliberately coarse: the certificate layer treats every decode
/// error as "stop populating fields here" rather than a fatal condition, so
/// the variants only need to distinguish the failure classes that tests and
/// callers care about.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("read past end of input")]
    Truncated,
    #[error("malformed length octets")]
    BadLength,
    #[error("indefinite length is not valid in DER")]
    IndefiniteLength,
    #[error("unexpected tag")]
    UnexpectedTag,
    #[error("invalid base64 input")]
    InvalidBase64,
}

/// Certificate-file handling errors (CLI input path).
#[derive(Debug, thiserror::Error)]
pub enum CertError {
    #[error("no CERTIFICATE block found in PEM input")]
    NoCertificateBlock,
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
