//! Plain accession lists, as used by the offline `match` command.
//!
//! Accepts either one accession per line or a delimited table with an
//! `accession` header column (such as `resolve --format tsv` output). Blank
//! lines and `#` comments are ignored.

use std::path::Path;

use crate::core::types::Accession;
use crate::parsing::{ensure_exists, LoadError};

/// Read an accession list from disk
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the path does not exist,
/// `LoadError::Io` if it cannot be read, or `LoadError::Csv` for a
/// delimited list with broken quoting.
pub fn load_accessions(path: &Path) -> Result<Vec<Accession>, LoadError> {
    ensure_exists(path)?;
    let text = std::fs::read_to_string(path)?;
    parse_accession_text(&text)
}

/// Parse an accession list
///
/// # Errors
///
/// Returns `LoadError::Csv` if a delimited list cannot be read.
pub fn parse_accession_text(text: &str) -> Result<Vec<Accession>, LoadError> {
    let Some(first) = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#'))
    else {
        return Ok(Vec::new());
    };

    let delimiter = if first.contains('\t') {
        b'\t'
    } else if first.contains(',') {
        b','
    } else {
        return Ok(text
            .lines()
            .map(str::trim)
            .filter(|l| !l.starts_with('#'))
            .map(Accession::new)
            .filter(|a| !a.is_empty())
            .collect());
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let Some(header) = records.next().transpose()? else {
        return Ok(Vec::new());
    };

    // A header naming an accession column selects that column; otherwise the
    // first column is used and the first line is data
    let column = header
        .iter()
        .position(|f| f.eq_ignore_ascii_case("accession"));

    let mut accessions = Vec::new();
    if column.is_none() {
        accessions.extend(header.get(0).map(Accession::new));
    }
    let column = column.unwrap_or(0);

    for record in records {
        let record = record?;
        if let Some(field) = record.get(column) {
            accessions.push(Accession::new(field));
        }
    }
    accessions.retain(|a| !a.is_empty());
    Ok(accessions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(accessions: &[Accession]) -> Vec<&str> {
        accessions.iter().map(Accession::as_str).collect()
    }

    #[test]
    fn test_one_per_line() {
        let text = "# resolved by hand\nSAMN1\n\n  SAMN2  \nSAMN1\n";
        assert_eq!(strs(&parse_accession_text(text).unwrap()), vec!["SAMN1", "SAMN2", "SAMN1"]);
    }

    #[test]
    fn test_resolve_tsv_output() {
        let text = "identifier\taccession\nPNUSAS1\tSAMN1\nPNUSAS2\tSAMN2\n";
        assert_eq!(strs(&parse_accession_text(text).unwrap()), vec!["SAMN1", "SAMN2"]);
    }

    #[test]
    fn test_headerless_csv_uses_first_column() {
        let text = "SAMN1,note\nSAMN2,other\n";
        assert_eq!(strs(&parse_accession_text(text).unwrap()), vec!["SAMN1", "SAMN2"]);
    }

    #[test]
    fn test_quoted_field_with_comma() {
        let text = "identifier,accession\n\"PNUSAS1,a\",SAMN1\nPNUSAS2,SAMN2\n";
        assert_eq!(strs(&parse_accession_text(text).unwrap()), vec!["SAMN1", "SAMN2"]);
    }

    #[test]
    fn test_comments_and_blank_lines_in_table() {
        let text = "# from resolve\nidentifier\taccession\n\nPNUSAS1\t\"SAMN1\"\n# PNUSAS2\tSAMN2\n";
        assert_eq!(strs(&parse_accession_text(text).unwrap()), vec!["SAMN1"]);
    }

    #[test]
    fn test_empty() {
        assert!(parse_accession_text("\n# nothing\n").unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_accessions(Path::new("/no/such/accessions.txt")),
            Err(LoadError::FileNotFound(_))
        ));
    }
}
