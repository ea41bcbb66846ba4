//! Accession extraction from plain-text BioSample records.
//!
//! A record as returned by `efetch` with `retmode=text` looks like:
//!
//! ```text
//! 1: Pathogen.cl; Salmonella enterica
//! Identifiers: BioSample: SAMN00039977; Sample name: PNUSAS000001; SRA: SRS000001
//! Organism: Salmonella enterica
//! ```
//!
//! The layout is positional. Parsers implement [`RecordParser`] so a changed
//! layout can get a new parser without touching the resolver.

use crate::core::types::{Accession, Identifier};
use crate::registry::RegistryError;

/// Turns one registry record into an accession
pub trait RecordParser {
    /// # Errors
    ///
    /// Returns `RegistryError::MalformedResponse` if the record does not
    /// have the expected layout.
    fn parse(&self, identifier: &Identifier, record: &str) -> Result<Accession, RegistryError>;
}

/// Picks a whitespace-separated token from a fixed line and drops its last character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionalRecordParser {
    /// 0-based line holding the accession
    pub line: usize,
    /// 0-based token within that line
    pub token: usize,
}

impl PositionalRecordParser {
    /// Layout of `biosample` text records: second line, third token, `;` terminated
    #[must_use]
    pub const fn biosample_v1() -> Self {
        Self { line: 1, token: 2 }
    }
}

impl Default for PositionalRecordParser {
    fn default() -> Self {
        Self::biosample_v1()
    }
}

impl RecordParser for PositionalRecordParser {
    fn parse(&self, identifier: &Identifier, record: &str) -> Result<Accession, RegistryError> {
        let malformed = |reason: String| RegistryError::MalformedResponse {
            identifier: identifier.clone(),
            reason,
            raw: record.to_string(),
        };

        let line = record
            .lines()
            .nth(self.line)
            .ok_or_else(|| malformed(format!("record has no line {}", self.line + 1)))?;

        let token = line.split_whitespace().nth(self.token).ok_or_else(|| {
            malformed(format!(
                "line {} has fewer than {} fields",
                self.line + 1,
                self.token + 1
            ))
        })?;

        // Exactly one trailing separator is dropped, whatever it is
        let cut = token.char_indices().last().map_or(0, |(i, _)| i);
        let accession = Accession::new(&token[..cut]);
        if accession.is_empty() {
            return Err(malformed(format!("accession field '{token}' is empty")));
        }

        Ok(accession)
    }
}
