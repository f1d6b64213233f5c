use openssl::error::ErrorStack;

use crate::cert::Certificate;

pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Raw text of one `-----BEGIN <label>-----` section of a bundle, split out
/// before its payload is decoded.
#[derive(Debug, Clone)]
pub struct PemSection {
    pub label: String,
    text: String,
    terminated: bool,
}

impl PemSection {
    fn start(label: &str, begin_line: &str) -> Self {
        PemSection { label: label.to_string(), text: format!("{}\n", begin_line), terminated: false }
    }

    /// Decode the payload, honouring RFC 1421 headers such as `Proc-Type`.
    pub fn decode(&self) -> Result<Vec<u8>, String> {
        if !self.terminated {
            return Err(format!("missing -----END {}----- line", self.label));
        }
        ::pem::parse(&self.text)
            .map(|p| p.contents().to_vec())
            .map_err(|e| e.to_string())
    }
}

// `-----BEGIN FOO-----` -> Some("FOO") for kind "BEGIN".
fn marker<'a>(line: &'a str, kind: &str) -> Option<&'a str> {
    line.strip_prefix("-----")?
        .strip_suffix("-----")?
        .strip_prefix(kind)?
        .strip_prefix(' ')
}

/// Split `data` into PEM sections in order. A section that is never closed
/// ends where the next `BEGIN` line starts, so one damaged block does not
/// hide the blocks after it. Text outside sections is ignored.
pub fn sections(data: &[u8]) -> Vec<PemSection> {
    let text = String::from_utf8_lossy(data);
    let mut out = Vec::new();
    let mut open: Option<PemSection> = None;

    for line in text.lines().map(str::trim) {
        if let Some(label) = marker(line, "BEGIN") {
            out.extend(open.take());
            open = Some(PemSection::start(label, line));
        } else if let Some(section) = open.as_mut() {
            section.text.push_str(line);
            section.text.push('\n');
            if marker(line, "END") == Some(section.label.as_str()) {
                section.terminated = true;
                out.extend(open.take());
            }
        }
    }
    out.extend(open);
    out
}

/// Encode `cert` as a single `CERTIFICATE` block.
pub fn encode_certificate(cert: &Certificate) -> Result<Vec<u8>, ErrorStack> {
    cert.x509().to_pem()
}
