use openssl::x509::{X509Ref, X509};
use std::fmt;
use x509_parser::prelude::*;

use crate::error::ChainError;
use crate::util::{format_name_human, subject_cn};

// 1.3.6.1.5.5.7.48.2 = id-ad-caIssuers
const CA_ISSUERS_OID: &str = "1.3.6.1.5.5.7.48.2";

/// Parsed, immutable certificate. Two certificates are equal when their DER
/// encodings are byte-identical.
#[derive(Clone)]
pub struct Certificate {
    x509: X509,
    der: Vec<u8>,
    is_ca: bool,
    issuer_urls: Vec<String>,
}

impl Certificate {
    /// Parse a DER-encoded certificate. `origin` names where the bytes came
    /// from (a PEM block index or an issuer URL) for error context.
    pub fn from_der(der: &[u8], origin: &str) -> Result<Self, ChainError> {
        let x509 = X509::from_der(der).map_err(|e| ChainError::parse(origin, e))?;
        Self::from_x509(x509, origin)
    }

    pub fn from_x509(x509: X509, origin: &str) -> Result<Self, ChainError> {
        let der = x509.to_der().map_err(|e| ChainError::parse(origin, e))?;
        let (is_ca, issuer_urls) = {
            let (_, parsed) =
                X509Certificate::from_der(&der).map_err(|e| ChainError::parse(origin, e))?;
            inspect_extensions(&parsed)
        };
        Ok(Certificate { x509, der, is_ca, issuer_urls })
    }

    /// Accept the body of an issuer download: DER first, then PEM (the first
    /// certificate of the bundle wins).
    pub fn from_issuer_body(body: &[u8], url: &str) -> Result<Self, ChainError> {
        if let Ok(x509) = X509::from_der(body) {
            return Self::from_x509(x509, url);
        }
        if let Ok(stack) = X509::stack_from_pem(body) {
            if let Some(x509) = stack.into_iter().next() {
                return Self::from_x509(x509, url);
            }
        }
        Err(ChainError::parse(url, "unrecognized certificate format"))
    }

    pub fn x509(&self) -> &X509Ref {
        &self.x509
    }

    pub fn is_ca(&self) -> bool {
        self.is_ca
    }

    /// AIA caIssuers URIs in extension order.
    pub fn issuer_urls(&self) -> &[String] {
        &self.issuer_urls
    }

    /// Short human label for logs and reports.
    pub fn label(&self) -> String {
        if let Some(cn) = subject_cn(&self.x509) {
            return format!("CN={}", cn);
        }
        let name = format_name_human(self.x509.subject_name().entries());
        if name.is_empty() { "<unknown subject>".to_string() } else { name }
    }
}

fn inspect_extensions(parsed: &X509Certificate<'_>) -> (bool, Vec<String>) {
    let mut is_ca = false;
    let mut urls = Vec::new();
    for ext in parsed.extensions() {
        match ext.parsed_extension() {
            ParsedExtension::BasicConstraints(bc) => is_ca = bc.ca,
            ParsedExtension::AuthorityInfoAccess(aia) => {
                for ad in &aia.accessdescs {
                    if ad.access_method.to_id_string() == CA_ISSUERS_OID {
                        if let GeneralName::URI(uri) = &ad.access_location {
                            urls.push(uri.to_string());
                        }
                    }
                }
            }
            _ => {}
        }
    }
    (is_ca, urls)
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Certificate) -> bool {
        self.der == other.der
    }
}

impl Eq for Certificate {}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("subject", &self.label())
            .field("is_ca", &self.is_ca)
            .field("issuer_urls", &self.issuer_urls)
            .finish()
    }
}
