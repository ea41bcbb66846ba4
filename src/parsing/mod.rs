//! Loaders for the two tabular inputs and the registry's text records.
//!
//! - **Line lists** ([`linelist`]): spreadsheets (xlsx, xls, xlsb, ods) or
//!   CSV/TSV files with one identifier column
//! - **Distance tables** ([`distance`]): tab-separated pairwise distance
//!   files, optionally gzip-compressed
//! - **Accession lists** ([`accessions`]): one accession per line, or a
//!   table with an `accession` column
//! - **Registry records** ([`biosample`]): the plain-text record the
//!   registry returns for one identifier
//!
//! ## Example
//!
//! ```rust,no_run
//! use linelist_linker::config::Config;
//! use linelist_linker::parsing::{distance, linelist};
//! use std::path::Path;
//!
//! let config = Config::default();
//! let ids = linelist::load_identifiers(Path::new("cases.xlsx"), &config.line_list).unwrap();
//! let table =
//!     distance::load_distance_table(Path::new("distances.tsv"), &config.distance_table).unwrap();
//! println!("{} identifiers, {} distance rows", ids.len(), table.len());
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod accessions;
pub mod biosample;
pub mod distance;
pub mod linelist;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Column '{column}' not found (available: {available})")]
    ColumnNotFound { column: String, available: String },

    #[error("Sheet '{sheet}' not found (available: {available})")]
    SheetNotFound { sheet: String, available: String },

    #[error("Malformed row on line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("File has no header row")]
    EmptyFile,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Delimited text error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),
}

/// Fail early with a clear error instead of an opaque open() failure
pub(crate) fn ensure_exists(path: &Path) -> Result<(), LoadError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(LoadError::FileNotFound(path.to_path_buf()))
    }
}

/// Locate a header by exact name
pub(crate) fn find_column<'a>(
    headers: impl IntoIterator<Item = &'a str> + Clone,
    column: &str,
) -> Result<usize, LoadError> {
    headers
        .clone()
        .into_iter()
        .position(|h| h == column)
        .ok_or_else(|| LoadError::ColumnNotFound {
            column: column.to_string(),
            available: headers.into_iter().collect::<Vec<_>>().join(", "),
        })
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}
