//! Line-list loading: one identifier column from a spreadsheet or delimited file.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use crate::config::LineListConfig;
use crate::core::types::Identifier;
use crate::parsing::{ensure_exists, find_column, lowercase_extension, LoadError};
use crate::utils::validation::has_identifier_prefix;

/// Load identifiers from a line list, keeping only those with the configured prefix
///
/// Order and duplicates are preserved from the source file.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the path does not exist,
/// `LoadError::ColumnNotFound` if the identifier column is missing,
/// `LoadError::SheetNotFound` for an unknown sheet, or a read error.
pub fn load_identifiers(path: &Path, config: &LineListConfig) -> Result<Vec<Identifier>, LoadError> {
    let values = read_column(path, &config.column, config.sheet.as_deref())?;
    let total = values.len();
    let identifiers = filter_identifiers(values, &config.prefix);
    debug!(
        "Kept {} of {} '{}' values with prefix '{}'",
        identifiers.len(),
        total,
        config.column,
        config.prefix
    );
    Ok(identifiers)
}

/// Keep values starting with `prefix`, in order
pub fn filter_identifiers<I>(values: I, prefix: &str) -> Vec<Identifier>
where
    I: IntoIterator<Item = String>,
{
    values
        .into_iter()
        .filter(|v| has_identifier_prefix(v, prefix))
        .map(Identifier::new)
        .collect()
}

/// Read every non-empty value of a named column
///
/// # Errors
///
/// See [`load_identifiers`].
pub fn read_column(
    path: &Path,
    column: &str,
    sheet: Option<&str>,
) -> Result<Vec<String>, LoadError> {
    ensure_exists(path)?;

    match lowercase_extension(path).as_deref() {
        Some("csv") => read_delimited_column(path, b',', column),
        Some("tsv" | "txt" | "tab") => read_delimited_column(path, b'\t', column),
        _ => read_spreadsheet_column(path, column, sheet),
    }
}

fn read_delimited_column(path: &Path, delimiter: u8, column: &str) -> Result<Vec<String>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let idx = find_column(headers.iter().map(String::as_str), column)?;

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(idx).filter(|v| !v.is_empty()) {
            values.push(value.to_string());
        }
    }
    Ok(values)
}

fn read_spreadsheet_column(
    path: &Path,
    column: &str,
    sheet: Option<&str>,
) -> Result<Vec<String>, LoadError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| LoadError::Spreadsheet(format!("Failed to open workbook: {e}")))?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(name) if sheet_names.iter().any(|n| n == name) => name.to_string(),
        Some(name) => {
            return Err(LoadError::SheetNotFound {
                sheet: name.to_string(),
                available: sheet_names.join(", "),
            })
        }
        None => sheet_names.first().cloned().ok_or(LoadError::EmptyFile)?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::Spreadsheet(format!("Failed to read sheet '{sheet_name}': {e}")))?;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or(LoadError::EmptyFile)?;
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell_to_string(cell).unwrap_or_default())
        .collect();
    let idx = find_column(headers.iter().map(String::as_str), column)?;

    Ok(rows
        .filter_map(|row| row.get(idx).and_then(cell_to_string))
        .collect())
}

/// String form of a cell, or `None` for cells that hold no value
fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            if s.is_empty() {
                None
            } else {
                Some(s.clone())
            }
        }
        // Integral floats come from numeric cells; render them without ".0"
        #[allow(clippy::cast_possible_truncation)]
        Data::Float(n) => Some(if n.fract() == 0.0 && n.abs() < 1e15 {
            format!("{}", *n as i64)
        } else {
            format!("{n}")
        }),
        Data::Int(n) => Some(n.to_string()),
        Data::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        Data::DateTime(dt) => Some(dt.as_f64().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LineListConfig {
        LineListConfig::default()
    }

    #[test]
    fn test_filter_is_stable_and_total() {
        let values = vec![
            "PNUSAS000002".to_string(),
            "CFSAN001".to_string(),
            "PNUSAS000001".to_string(),
            "pnusas000003".to_string(),
            "PNUSAS000002".to_string(),
            "12345".to_string(),
        ];
        let ids = filter_identifiers(values.clone(), "PNU");

        assert!(ids.len() <= values.len());
        assert!(ids.iter().all(|id| id.as_str().starts_with("PNU")));
        let kept: Vec<&str> = ids.iter().map(Identifier::as_str).collect();
        assert_eq!(kept, vec!["PNUSAS000002", "PNUSAS000001", "PNUSAS000002"]);
    }

    #[test]
    fn test_cell_rendering() {
        assert_eq!(cell_to_string(&Data::Empty), None);
        assert_eq!(cell_to_string(&Data::String(String::new())), None);
        assert_eq!(
            cell_to_string(&Data::String("PNUSAS1".to_string())).as_deref(),
            Some("PNUSAS1")
        );
        assert_eq!(cell_to_string(&Data::Float(1804.0)).as_deref(), Some("1804"));
        assert_eq!(cell_to_string(&Data::Float(1.5)).as_deref(), Some("1.5"));
        assert_eq!(cell_to_string(&Data::Int(7)).as_deref(), Some("7"));
    }

    #[test]
    fn test_load_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.csv");
        std::fs::write(
            &path,
            "case,WGS_id,state\n1,PNUSAS000010,GA\n2,,TN\n3,CFSAN0001,GA\n4,PNUSAS000011,FL\n",
        )
        .unwrap();

        let ids = load_identifiers(&path, &config()).unwrap();
        let ids: Vec<&str> = ids.iter().map(Identifier::as_str).collect();
        assert_eq!(ids, vec!["PNUSAS000010", "PNUSAS000011"]);
    }

    #[test]
    fn test_load_from_tsv_with_renamed_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.tsv");
        std::fs::write(&path, "Isolate\tnotes\nPNUSAS9\tx\nPNUSAS8\ty\n").unwrap();

        let err = load_identifiers(&path, &config()).unwrap_err();
        assert!(matches!(err, LoadError::ColumnNotFound { ref column, .. } if column == "WGS_id"));

        let renamed = LineListConfig {
            column: "Isolate".to_string(),
            ..config()
        };
        let ids = load_identifiers(&path, &renamed).unwrap();
        assert_eq!(ids, vec![Identifier::new("PNUSAS9"), Identifier::new("PNUSAS8")]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_identifiers(Path::new("/no/such/linelist.xlsx"), &config()).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(_)));
    }

    #[test]
    fn test_load_from_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Cases").unwrap();
        sheet.write_string(0, 0, "Outbreak").unwrap();
        sheet.write_string(0, 1, "WGS_id").unwrap();
        sheet.write_string(1, 0, "1804MLJMP-1").unwrap();
        sheet.write_string(1, 1, "PNUSAS000001").unwrap();
        sheet.write_string(2, 0, "1804MLJMP-1").unwrap();
        sheet.write_number(2, 1, 42.0).unwrap();
        sheet.write_string(3, 0, "1804MLJMP-1").unwrap();
        sheet.write_string(4, 0, "1804MLJMP-1").unwrap();
        sheet.write_string(4, 1, "PNUSAS000002").unwrap();
        workbook.save(&path).unwrap();

        let ids = load_identifiers(&path, &config()).unwrap();
        assert_eq!(
            ids,
            vec![Identifier::new("PNUSAS000001"), Identifier::new("PNUSAS000002")]
        );

        let raw = read_column(&path, "WGS_id", Some("Cases")).unwrap();
        assert_eq!(raw, vec!["PNUSAS000001", "42", "PNUSAS000002"]);

        let err = read_column(&path, "WGS_id", Some("Sheet9")).unwrap_err();
        assert!(matches!(err, LoadError::SheetNotFound { .. }));
    }
}
