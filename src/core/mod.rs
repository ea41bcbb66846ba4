//! Core data types for line-list linking.
//!
//! - [`Identifier`](types::Identifier): a line-list sample identifier
//! - [`Accession`](types::Accession): a registry accession, normalized on construction
//! - [`Resolution`](types::Resolution): an identifier paired with its accession
//! - [`DistancePair`](types::DistancePair), [`DistanceTable`](types::DistanceTable):
//!   rows of a pairwise distance table
//!
//! ## Accession Equality
//!
//! Accessions reach the matcher from two sources: registry text records and
//! distance-table cells. Both go through the same normalization, so equality
//! is exact and case-sensitive on the normalized form.

pub mod types;
