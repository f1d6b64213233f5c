use openssl::error::ErrorStack;
use openssl::stack::Stack;
use openssl::x509::X509;
use std::collections::{HashMap, HashSet};

use crate::cert::Certificate;

/// Issuer URL -> fetched certificate, shared by every leaf of one run.
///
/// The registry only grows. URLs whose download failed are remembered too,
/// so a URL is requested at most once per run. Not synchronised: callers
/// sharing one registry across threads must wrap it in a mutex.
#[derive(Debug, Default)]
pub struct CertificateRegistry {
    by_url: HashMap<String, Certificate>,
    failed: HashSet<String>,
}

impl CertificateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, url: &str) -> Option<&Certificate> {
        self.by_url.get(url)
    }

    pub fn insert(&mut self, url: impl Into<String>, cert: Certificate) {
        self.by_url.insert(url.into(), cert);
    }

    pub fn mark_failed(&mut self, url: impl Into<String>) {
        self.failed.insert(url.into());
    }

    pub fn has_failed(&self, url: &str) -> bool {
        self.failed.contains(url)
    }

    /// True when `url` needs no further download attempt.
    pub fn is_settled(&self, url: &str) -> bool {
        self.lookup(url).is_some() || self.has_failed(url)
    }

    pub fn len(&self) -> usize {
        self.by_url.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }

    /// Fresh pool holding every certificate registered so far. A certificate
    /// reachable under several URLs appears once.
    pub fn pool(&self) -> CertificatePool {
        let mut pool = CertificatePool::default();
        for cert in self.by_url.values() {
            pool.add(cert.clone());
        }
        pool
    }
}

/// Unordered set of candidate intermediates handed to the verifier.
#[derive(Debug, Default, Clone)]
pub struct CertificatePool {
    certs: Vec<Certificate>,
}

impl CertificatePool {
    pub fn add(&mut self, cert: Certificate) {
        if !self.certs.contains(&cert) {
            self.certs.push(cert);
        }
    }

    #[cfg(test)]
    pub fn contains(&self, cert: &Certificate) -> bool {
        self.certs.contains(cert)
    }

    pub fn len(&self) -> usize {
        self.certs.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Certificate> {
        self.certs.iter()
    }

    /// OpenSSL untrusted stack for `X509StoreContext::init`.
    pub fn to_stack(&self) -> Result<Stack<X509>, ErrorStack> {
        let mut stack: Stack<X509> = Stack::new()?;
        for c in self.iter() {
            stack.push(c.x509().to_owned())?;
        }
        Ok(stack)
    }
}
