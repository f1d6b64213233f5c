use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A single failure recorded while resolving and flattening a bundle.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("failed to read PEM bundle from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse certificate from {origin}: {reason}")]
    Parse { origin: String, reason: String },

    #[error("pem type {0} not supported")]
    UnsupportedBlockType(String),

    #[error("failed to fetch issuer {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("no valid chain for {subject}: {reason}")]
    Verification { subject: String, reason: String },

    #[error("failed to write bundle to {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

impl ChainError {
    pub fn parse(origin: impl Into<String>, reason: impl fmt::Display) -> Self {
        ChainError::Parse { origin: origin.into(), reason: reason.to_string() }
    }

    pub fn fetch(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        ChainError::Fetch { url: url.into(), reason: reason.to_string() }
    }
}

/// Ordered collection of every error recorded during one run.
#[derive(Debug, Default)]
pub struct RunErrors {
    errors: Vec<ChainError>,
}

impl RunErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: ChainError) {
        tracing::debug!("{}", err);
        self.errors.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChainError> {
        self.errors.iter()
    }
}

impl From<ChainError> for RunErrors {
    fn from(err: ChainError) -> Self {
        RunErrors { errors: vec![err] }
    }
}

impl<'a> IntoIterator for &'a RunErrors {
    type Item = &'a ChainError;
    type IntoIter = std::slice::Iter<'a, ChainError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

// One error per line, in the order they were recorded.
impl fmt::Display for RunErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for RunErrors {}
