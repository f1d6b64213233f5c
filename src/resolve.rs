use std::collections::VecDeque;

use crate::cert::Certificate;
use crate::error::{ChainError, RunErrors};
use crate::fetch::FetchIssuer;
use crate::registry::{CertificatePool, CertificateRegistry};

/// Follows issuer URLs breadth-first, registering every certificate it can
/// download.
pub struct IntermediateResolver<F> {
    fetcher: F,
}

impl<F: FetchIssuer> IntermediateResolver<F> {
    pub fn new(fetcher: F) -> Self {
        IntermediateResolver { fetcher }
    }

    /// Expand `urls` into `registry` and return a pool of everything the
    /// registry now holds, including certificates registered for earlier
    /// leaves. Download and parse failures land in `errors`; the branch
    /// below a failed URL is not explored.
    pub fn resolve(
        &self,
        urls: &[String],
        registry: &mut CertificateRegistry,
        errors: &mut RunErrors,
    ) -> CertificatePool {
        let mut queue: VecDeque<String> = urls.iter().cloned().collect();

        while let Some(url) = queue.pop_front() {
            if registry.is_settled(&url) {
                tracing::debug!(url = %url, "issuer already resolved");
                continue;
            }
            match self.fetch_certificate(&url) {
                Ok(cert) => {
                    tracing::debug!(url = %url, subject = %cert.label(), "registered issuer");
                    queue.extend(cert.issuer_urls().iter().cloned());
                    registry.insert(url, cert);
                }
                Err(e) => {
                    registry.mark_failed(url);
                    errors.push(e);
                }
            }
        }

        registry.pool()
    }

    fn fetch_certificate(&self, url: &str) -> Result<Certificate, ChainError> {
        let body = self.fetcher.fetch(url)?;
        Certificate::from_issuer_body(&body, url)
    }
}
