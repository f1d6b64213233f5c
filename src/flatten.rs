use crate::cert::Certificate;
use crate::verify::Chain;

/// Insertion-ordered set of certificates destined for the output bundle.
#[derive(Debug, Default)]
pub struct OutputSet {
    certs: Vec<Certificate>,
    ca_only: bool,
}

impl OutputSet {
    pub fn new(ca_only: bool) -> Self {
        OutputSet { certs: Vec::new(), ca_only }
    }

    /// Add `cert` unless it is filtered out by the CA-only policy or an
    /// equal certificate is already present. Returns whether it was added.
    pub fn add(&mut self, cert: &Certificate) -> bool {
        if !(cert.is_ca() || !self.ca_only) || self.contains(cert) {
            return false;
        }
        self.certs.push(cert.clone());
        true
    }

    /// Flatten verified chains in chain order, leaf first.
    pub fn add_chains(&mut self, chains: &[Chain]) -> usize {
        let mut added = 0;
        for chain in chains {
            for cert in chain {
                if self.add(cert) {
                    added += 1;
                }
            }
        }
        added
    }

    pub fn contains(&self, cert: &Certificate) -> bool {
        self.certs.iter().any(|c| c == cert)
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

    pub fn into_vec(self) -> Vec<Certificate> {
        self.certs
    }
}
