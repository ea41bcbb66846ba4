//! Identifier to accession resolution against a remote sample registry.
//!
//! Resolution is split into two seams:
//!
//! - [`RecordSource`]: fetches the text record for one identifier
//!   ([`client::EntrezClient`] talks to NCBI E-utilities)
//! - [`RecordParser`](crate::parsing::biosample::RecordParser): pulls the
//!   accession out of that text
//!
//! [`Resolver`] drives both, one identifier at a time, in input order.

use thiserror::Error;
use tracing::debug;

use crate::core::types::{Identifier, Resolution};
use crate::parsing::biosample::RecordParser;

pub mod client;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Network error fetching '{identifier}': {message}")]
    Network {
        identifier: Identifier,
        message: String,
    },

    #[error("Registry returned HTTP {status} for '{identifier}'")]
    Status { identifier: Identifier, status: u16 },

    #[error("Malformed registry response for '{identifier}': {reason}\n--- response ---\n{raw}")]
    MalformedResponse {
        identifier: Identifier,
        reason: String,
        raw: String,
    },

    #[error("Failed to set up registry client: {0}")]
    Client(String),
}

impl RegistryError {
    /// Whether retrying the same request could succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

/// Anything that can produce the registry's text record for an identifier
pub trait RecordSource {
    /// # Errors
    ///
    /// Returns `RegistryError::Network` for transient failures and
    /// `RegistryError::Status` for requests the registry refused.
    fn fetch(&self, identifier: &Identifier) -> Result<String, RegistryError>;
}

impl<S: RecordSource + ?Sized> RecordSource for &S {
    fn fetch(&self, identifier: &Identifier) -> Result<String, RegistryError> {
        (**self).fetch(identifier)
    }
}

/// Resolves identifiers to accessions, sequentially and in order
pub struct Resolver<S, P> {
    source: S,
    parser: P,
}

impl<S: RecordSource, P: RecordParser> Resolver<S, P> {
    pub fn new(source: S, parser: P) -> Self {
        Self { source, parser }
    }

    /// Resolve a single identifier
    ///
    /// # Errors
    ///
    /// Propagates fetch errors and `RegistryError::MalformedResponse`.
    pub fn resolve(&self, identifier: &Identifier) -> Result<Resolution, RegistryError> {
        let record = self.source.fetch(identifier)?;
        let accession = self.parser.parse(identifier, &record)?;
        debug!("Resolved {identifier} -> {accession}");
        Ok(Resolution {
            identifier: identifier.clone(),
            accession,
        })
    }

    /// Resolve every identifier, stopping at the first failure
    ///
    /// The output has one entry per input identifier, in the same order.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; no partial result is returned.
    pub fn resolve_all(&self, identifiers: &[Identifier]) -> Result<Vec<Resolution>, RegistryError> {
        identifiers.iter().map(|id| self.resolve(id)).collect()
    }
}
