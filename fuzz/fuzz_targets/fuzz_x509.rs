#![no_main]
use libfuzzer_sys::fuzz_target;

use mercury_pki::x509::{X509Cert, X509CertPrefix};

fuzz_target!(|data: &[u8]| {
    // Rendering must never panic and must always produce valid UTF-8 for
    // arbitrary input.
    let cert = X509Cert::from_der(data);
    let _ = cert.is_weak();
    let mut out = Vec::new();
    if cert.write_json(&mut out).is_ok() {
        assert!(std::str::from_utf8(&out).is_ok());
    }

    let prefix = X509CertPrefix::from_der(data);
    let mut out = Vec::new();
    let _ = prefix.write_json(&mut out);
    let mut out = Vec::new();
    let _ = prefix.write_json_hex(&mut out);
});
