//! # linelist-linker
//!
//! A library for linking outbreak line lists to pairwise genomic-distance data.
//!
//! Outbreak investigations track cases in a line list keyed by lab-assigned
//! sample identifiers (e.g. `PNUSAS000123`), while SNP-distance tables from
//! the NCBI Pathogen Detection project are keyed by BioSample accessions
//! (e.g. `SAMN00039977`). Putting the two side by side means translating one
//! key into the other.
//!
//! `linelist-linker` does that in four sequential steps:
//!
//! - **Load** the identifier column of the line list, keeping identifiers
//!   with a configured prefix
//! - **Resolve** each identifier to its accession through NCBI E-utilities
//! - **Load** the distance table's two accession columns and distance column
//! - **Reconcile** resolved accessions against both accession columns and
//!   report the linked pairs
//!
//! ## Example
//!
//! ```rust,no_run
//! use linelist_linker::config::Config;
//! use linelist_linker::matching::Reconciler;
//! use linelist_linker::parsing::biosample::PositionalRecordParser;
//! use linelist_linker::parsing::{distance, linelist};
//! use linelist_linker::registry::{client::EntrezClient, Resolver};
//! use std::path::Path;
//!
//! let config = Config::default();
//! let ids = linelist::load_identifiers(Path::new("cases.xlsx"), &config.line_list).unwrap();
//!
//! let client = EntrezClient::new(&config.registry, "someone@example.org").unwrap();
//! let resolver = Resolver::new(client, PositionalRecordParser::biosample_v1());
//! let resolved = resolver.resolve_all(&ids).unwrap();
//!
//! let table =
//!     distance::load_distance_table(Path::new("distances.tsv"), &config.distance_table).unwrap();
//! let accessions: Vec<_> = resolved.iter().map(|r| r.accession.clone()).collect();
//! for link in Reconciler::new(&accessions, config.matching.mode).reconcile(&table) {
//!     println!("{} {}", link.accession, link.linked_accession);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Layered run configuration
//! - [`core`]: Identifier, accession, and distance-table types
//! - [`parsing`]: Line-list, distance-table, and registry-record parsers
//! - [`registry`]: Remote lookup client and resolver
//! - [`matching`]: Reconciliation of accessions against distance rows
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod config;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod registry;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::config::Config;
pub use crate::core::types::*;
pub use crate::matching::{Link, MatchMode, Reconciler};
pub use crate::registry::{RecordSource, RegistryError, Resolver};
