use anyhow::Result;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::x509::{X509NameEntries, X509Ref};

// Attributes shown in labels, in display order.
const NAME_ORDER: [(Nid, &str); 4] = [
    (Nid::COMMONNAME, "CN"),
    (Nid::ORGANIZATIONNAME, "O"),
    (Nid::ORGANIZATIONALUNITNAME, "OU"),
    (Nid::COUNTRYNAME, "C"),
];

/// Render a compact single-line subject/issuer snippet; used when a
/// certificate has no Common Name.
pub fn format_name_human(entries: X509NameEntries<'_>) -> String {
    let mut parts: Vec<(Nid, String)> = Vec::new();
    for e in entries {
        if let Ok(val) = e.data().as_utf8() {
            parts.push((e.object().nid(), val.to_string()));
        }
    }
    let mut out: Vec<String> = Vec::new();
    for (nid, label) in NAME_ORDER {
        for (n, v) in parts.iter() {
            if *n == nid {
                out.push(format!("{}={}", label, v));
            }
        }
    }
    out.join(", ")
}

/// Return a colon-separated SHA-256 fingerprint (uppercase hex).
pub fn fingerprint_sha256(cert: &X509Ref) -> Result<String> {
    let d = cert.digest(MessageDigest::sha256())?;
    Ok(d.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":"))
}

/// Convenience: extract Subject Common Name (CN) if present.
pub fn subject_cn(cert: &X509Ref) -> Option<String> {
    for e in cert.subject_name().entries() {
        if e.object().nid() == Nid::COMMONNAME {
            if let Ok(s) = e.data().as_utf8() { return Some(s.to_string()); }
        }
    }
    None
}

/// Convenience: extract Issuer Common Name (CN) if present.
pub fn issuer_cn(cert: &X509Ref) -> Option<String> {
    for e in cert.issuer_name().entries() {
        if e.object().nid() == Nid::COMMONNAME {
            if let Ok(s) = e.data().as_utf8() { return Some(s.to_string()); }
        }
    }
    None
}
