use openssl::error::ErrorStack;
use openssl::x509::store::{X509Store, X509StoreBuilder};
use openssl::x509::{X509StoreContext, X509StoreContextRef, X509};

use crate::cert::Certificate;
use crate::error::ChainError;
use crate::registry::CertificatePool;
use crate::util::format_name_human;

/// Leaf-to-anchor sequence produced by a successful verification.
pub type Chain = Vec<Certificate>;

/// Verification capability: zero or more valid chains for `leaf`, using
/// `pool` as untrusted intermediates.
pub trait VerifyChain {
    fn verify(&self, leaf: &Certificate, pool: &CertificatePool) -> Result<Vec<Chain>, ChainError>;
}

/// OpenSSL path validation against the system trust store, optionally
/// extended with extra anchors.
pub struct SystemVerifier {
    store: X509Store,
}

impl SystemVerifier {
    pub fn new(extra_anchors: &[Certificate]) -> Result<Self, ErrorStack> {
        Self::build(true, extra_anchors)
    }

    /// Anchors only from `anchors`; the system store is not consulted.
    #[cfg(test)]
    pub fn with_anchors(anchors: &[Certificate]) -> Result<Self, ErrorStack> {
        Self::build(false, anchors)
    }

    fn build(system: bool, anchors: &[Certificate]) -> Result<Self, ErrorStack> {
        let mut builder = X509StoreBuilder::new()?;
        if system {
            // Use OpenSSL's default CA locations (system trust store)
            builder.set_default_paths()?;
        }
        for anchor in anchors {
            builder.add_cert(anchor.x509().to_owned())?;
        }
        Ok(SystemVerifier { store: builder.build() })
    }

    fn run(&self, leaf: &Certificate, pool: &CertificatePool) -> Result<Result<Vec<X509>, String>, ErrorStack> {
        let untrusted = pool.to_stack()?;
        let mut ctx = X509StoreContext::new()?;
        // The closure runs while the context is initialised, so the built
        // chain and any error details must be read inside it.
        ctx.init(&self.store, leaf.x509(), &untrusted, |c| {
            if c.verify_cert()? {
                let chain: Vec<X509> = c
                    .chain()
                    .map(|stack| stack.iter().map(|x| x.to_owned()).collect())
                    .unwrap_or_default();
                Ok(Ok(chain))
            } else {
                Ok(Err(describe_failure(c)))
            }
        })
    }
}

fn describe_failure(ctx: &X509StoreContextRef) -> String {
    let cert_snippet = ctx
        .current_cert()
        .map(|cc| {
            let subj = format_name_human(cc.subject_name().entries());
            if subj.is_empty() { "<unknown subject>".to_string() } else { subj }
        })
        .unwrap_or_else(|| "<unknown certificate>".to_string());
    format!("{} (depth {} on {})", ctx.error(), ctx.error_depth(), cert_snippet)
}

impl VerifyChain for SystemVerifier {
    fn verify(&self, leaf: &Certificate, pool: &CertificatePool) -> Result<Vec<Chain>, ChainError> {
        let failed = |reason: String| ChainError::Verification { subject: leaf.label(), reason };
        match self.run(leaf, pool) {
            Ok(Ok(x509s)) => {
                let mut chain = Chain::with_capacity(x509s.len());
                for (depth, x509) in x509s.into_iter().enumerate() {
                    let cert = Certificate::from_x509(x509, &format!("chain depth {}", depth))?;
                    chain.push(cert);
                }
                Ok(vec![chain])
            }
            Ok(Err(msg)) => Err(failed(msg)),
            Err(e) => Err(failed(format!("validation error: {}", e))),
        }
    }
}
