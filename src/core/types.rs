use serde::{Deserialize, Serialize};

use crate::utils::validation::normalize_accession;

/// A sample identifier taken from a line list (e.g. `PNUSAS000123`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registry-issued sample accession (e.g. `SAMN00039977`)
///
/// Constructed through [`Accession::new`], which applies the same
/// normalization to accessions coming from the registry and from the
/// distance table so that equality between the two is well-defined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Accession(String);

impl Accession {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(normalize_accession(s.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Accession {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Accession> for String {
    fn from(accession: Accession) -> Self {
        accession.0
    }
}

impl std::fmt::Display for Accession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An identifier together with the accession the registry returned for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub identifier: Identifier,
    pub accession: Accession,
}

/// One row of a pairwise distance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistancePair {
    pub acc_1: Accession,
    pub acc_2: Accession,
    pub distance: f64,
    /// 1-based line number in the source file
    pub line: u64,
}

/// The rows of a distance table that survived loading
#[derive(Debug, Clone, Default)]
pub struct DistanceTable {
    pub pairs: Vec<DistancePair>,
    /// Number of malformed rows dropped while loading
    pub skipped_rows: usize,
}

impl DistanceTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First accession column, in row order
    pub fn acc1_list(&self) -> impl Iterator<Item = &Accession> {
        self.pairs.iter().map(|p| &p.acc_1)
    }

    /// Second accession column, in row order
    pub fn acc2_list(&self) -> impl Iterator<Item = &Accession> {
        self.pairs.iter().map(|p| &p.acc_2)
    }

    /// Distance column, in row order
    pub fn dist_list(&self) -> impl Iterator<Item = f64> + '_ {
        self.pairs.iter().map(|p| p.distance)
    }
}
