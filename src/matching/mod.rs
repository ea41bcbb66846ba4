//! Matching resolved accessions against a distance table.
//!
//! For each distance row, a side whose accession was resolved from the line
//! list is reported together with the accession on the other side of the
//! row. Two modes decide what happens when both sides match:
//!
//! - [`MatchMode::FirstSide`] (default): the `acc_1` side is checked first and,
//!   if it matches, the `acc_2` side is not looked at. A row therefore yields
//!   at most one link, even when both samples of a pair are in the line list.
//! - [`MatchMode::Symmetric`]: both sides are checked independently, so a row
//!   whose two accessions were both resolved yields two links.
//!
//! ## Example
//!
//! ```rust
//! use linelist_linker::core::types::{Accession, DistancePair, DistanceTable};
//! use linelist_linker::matching::{MatchMode, Reconciler};
//!
//! let table = DistanceTable {
//!     pairs: vec![DistancePair {
//!         acc_1: Accession::new("SAMN1"),
//!         acc_2: Accession::new("SAMN2"),
//!         distance: 3.0,
//!         line: 2,
//!     }],
//!     skipped_rows: 0,
//! };
//!
//! let reconciler = Reconciler::new(&[Accession::new("SAMN2")], MatchMode::FirstSide);
//! let links = reconciler.reconcile(&table);
//! assert_eq!(links[0].accession.as_str(), "SAMN2");
//! assert_eq!(links[0].linked_accession.as_str(), "SAMN1");
//! ```

use serde::{Deserialize, Serialize};

pub mod reconciler;

pub use reconciler::{Link, Reconciler};

/// Which sides of a distance row are checked against resolved accessions
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Check `acc_1`, and only if it misses, `acc_2`
    #[default]
    FirstSide,
    /// Check both sides; a row can produce two links
    Symmetric,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstSide => write!(f, "first-side"),
            Self::Symmetric => write!(f, "symmetric"),
        }
    }
}
