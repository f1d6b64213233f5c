use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cert::Certificate;
use crate::error::{ChainError, RunErrors};
use crate::fetch::FetchIssuer;
use crate::flatten::OutputSet;
use crate::bundle::{self, CERTIFICATE_LABEL};
use crate::registry::CertificateRegistry;
use crate::resolve::IntermediateResolver;
use crate::verify::VerifyChain;

/// Outcome of a run that got as far as writing the output bundle.
#[derive(Debug)]
pub struct Report {
    /// Certificates written, in bundle order.
    pub certificates: Vec<Certificate>,
    /// `CERTIFICATE` blocks successfully parsed from the input.
    pub leaves: usize,
    /// Distinct issuer URLs resolved during the run.
    pub issuers: usize,
    /// Recoverable errors collected along the way.
    pub errors: RunErrors,
}

/// Result of decoding and flattening an in-memory bundle.
#[derive(Debug)]
pub struct Flattened {
    pub output: OutputSet,
    pub leaves: usize,
}

/// Drives resolve -> verify -> flatten for every certificate of a bundle.
pub struct Pipeline<F, V> {
    resolver: IntermediateResolver<F>,
    verifier: V,
    ca_only: bool,
}

impl<F: FetchIssuer, V: VerifyChain> Pipeline<F, V> {
    pub fn new(fetcher: F, verifier: V, ca_only: bool) -> Self {
        Pipeline { resolver: IntermediateResolver::new(fetcher), verifier, ca_only }
    }

    /// Read `input`, flatten it, write `output`. Failing to read the input or
    /// to create the output aborts the run; the returned `RunErrors` then
    /// holds everything collected up to that point.
    pub fn run(&self, input: &Path, output: &Path) -> Result<Report, RunErrors> {
        let data = fs::read(input)
            .map_err(|source| ChainError::Read { path: input.to_path_buf(), source })?;

        let mut registry = CertificateRegistry::new();
        let mut errors = RunErrors::new();
        let flattened = self.process(&data, &mut registry, &mut errors);

        if let Err(e) = write_bundle(output, &flattened.output, &mut errors) {
            errors.push(e);
            return Err(errors);
        }
        tracing::info!(
            leaves = flattened.leaves,
            issuers = registry.len(),
            written = flattened.output.len(),
            errors = errors.len(),
            "bundle written to {}",
            output.display()
        );

        Ok(Report {
            certificates: flattened.output.into_vec(),
            leaves: flattened.leaves,
            issuers: registry.len(),
            errors,
        })
    }

    /// Decode every PEM block of `data` and flatten the verified chains of
    /// each certificate. `registry` is shared by all certificates of the
    /// bundle.
    pub fn process(
        &self,
        data: &[u8],
        registry: &mut CertificateRegistry,
        errors: &mut RunErrors,
    ) -> Flattened {
        let mut output = OutputSet::new(self.ca_only);
        let mut leaves = 0;

        for (index, section) in bundle::sections(data).into_iter().enumerate() {
            if section.label != CERTIFICATE_LABEL {
                errors.push(ChainError::UnsupportedBlockType(section.label));
                continue;
            }
            let origin = format!("PEM block #{}", index + 1);
            let parsed = section
                .decode()
                .map_err(|reason| ChainError::parse(origin.as_str(), reason))
                .and_then(|der| Certificate::from_der(&der, &origin));
            match parsed {
                Ok(leaf) => {
                    leaves += 1;
                    self.flatten_leaf(&leaf, registry, &mut output, errors);
                }
                Err(e) => errors.push(e),
            }
        }

        Flattened { output, leaves }
    }

    fn flatten_leaf(
        &self,
        leaf: &Certificate,
        registry: &mut CertificateRegistry,
        output: &mut OutputSet,
        errors: &mut RunErrors,
    ) {
        tracing::info!(subject = %leaf.label(), issuers = leaf.issuer_urls().len(), "resolving");
        let pool = self.resolver.resolve(leaf.issuer_urls(), registry, errors);
        match self.verifier.verify(leaf, &pool) {
            Ok(chains) => {
                let added = output.add_chains(&chains);
                tracing::debug!(subject = %leaf.label(), pool = pool.len(), chains = chains.len(), added, "flattened");
            }
            Err(e) => errors.push(e),
        }
    }
}

/// Write `set` as a fresh PEM bundle. Failing to create the file is returned
/// as an error; a certificate that cannot be encoded is recorded and skipped;
/// an I/O failure while writing is recorded and stops the write loop.
/// Returns how many blocks were written.
pub fn write_bundle(path: &Path, set: &OutputSet, errors: &mut RunErrors) -> Result<usize, ChainError> {
    let write_err = |reason: String| ChainError::Write { path: path.to_path_buf(), reason };

    let file = File::create(path).map_err(|e| write_err(e.to_string()))?;
    let mut out = BufWriter::new(file);
    let mut written = 0;

    for cert in set.iter() {
        let block = match bundle::encode_certificate(cert) {
            Ok(b) => b,
            Err(e) => {
                errors.push(write_err(format!("cannot encode {}: {}", cert.label(), e)));
                continue;
            }
        };
        if let Err(e) = out.write_all(&block) {
            errors.push(write_err(e.to_string()));
            return Ok(written);
        }
        written += 1;
    }
    if let Err(e) = out.flush() {
        errors.push(write_err(e.to_string()));
    }
    Ok(written)
}
