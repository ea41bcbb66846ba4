use std::collections::HashSet;

use serde::Serialize;

use crate::core::types::{Accession, DistancePair, DistanceTable};
use crate::matching::MatchMode;

/// A resolved accession and the sample it is paired with in the distance table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    /// The side of the row that came from the line list
    pub accession: Accession,
    /// The other side of the same row
    pub linked_accession: Accession,
    pub distance: f64,
    /// Source line of the distance row
    pub line: u64,
}

impl Link {
    fn new(hit: &Accession, other: &Accession, pair: &DistancePair) -> Self {
        Self {
            accession: hit.clone(),
            linked_accession: other.clone(),
            distance: pair.distance,
            line: pair.line,
        }
    }
}

/// Matches distance rows against a fixed set of resolved accessions
pub struct Reconciler {
    resolved: HashSet<Accession>,
    mode: MatchMode,
}

impl Reconciler {
    /// Index the resolved accessions; duplicates collapse into one entry
    #[must_use]
    pub fn new(accessions: &[Accession], mode: MatchMode) -> Self {
        Self {
            resolved: accessions.iter().cloned().collect(),
            mode,
        }
    }

    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    #[must_use]
    pub fn contains(&self, accession: &Accession) -> bool {
        self.resolved.contains(accession)
    }

    /// Links for one row, in `acc_1`-then-`acc_2` order
    #[must_use]
    pub fn match_pair(&self, pair: &DistancePair) -> Vec<Link> {
        let first = self.contains(&pair.acc_1);
        let second = self.contains(&pair.acc_2);

        let mut links = Vec::new();
        if first {
            links.push(Link::new(&pair.acc_1, &pair.acc_2, pair));
        }
        if second && (!first || self.mode == MatchMode::Symmetric) {
            links.push(Link::new(&pair.acc_2, &pair.acc_1, pair));
        }
        links
    }

    /// Links for every row, in table order; no deduplication
    #[must_use]
    pub fn reconcile(&self, table: &DistanceTable) -> Vec<Link> {
        table
            .pairs
            .iter()
            .flat_map(|pair| self.match_pair(pair))
            .collect()
    }
}
