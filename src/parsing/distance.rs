//! Pairwise distance table loading.
//!
//! Tables are delimited text with a header row, as published by the NCBI
//! Pathogen Detection project (`*.SNP_distances.tsv`). Only three columns
//! are used; others are ignored. Files ending in `.gz` are decompressed on
//! the fly.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::{debug, info, warn};

use crate::config::DistanceTableConfig;
use crate::core::types::{Accession, DistancePair, DistanceTable};
use crate::parsing::{ensure_exists, find_column, lowercase_extension, LoadError};

/// Load a distance table from disk
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the path does not exist,
/// `LoadError::ColumnNotFound` if a configured column is missing, or
/// `LoadError::MalformedRow` for a bad row when `skip_bad_rows` is off.
pub fn load_distance_table(
    path: &Path,
    config: &DistanceTableConfig,
) -> Result<DistanceTable, LoadError> {
    ensure_exists(path)?;
    let file = File::open(path)?;

    let table = if lowercase_extension(path).as_deref() == Some("gz") {
        parse_distance_reader(MultiGzDecoder::new(file), config)?
    } else {
        parse_distance_reader(file, config)?
    };

    debug!(
        "Loaded {} distance rows from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

/// Parse a distance table held in memory
///
/// # Errors
///
/// See [`load_distance_table`].
pub fn parse_distance_text(
    text: &str,
    config: &DistanceTableConfig,
) -> Result<DistanceTable, LoadError> {
    parse_distance_reader(text.as_bytes(), config)
}

/// Parse a distance table from any reader
///
/// # Errors
///
/// See [`load_distance_table`]. IO failures always abort, regardless of
/// `skip_bad_rows`.
pub fn parse_distance_reader<R: Read>(
    reader: R,
    config: &DistanceTableConfig,
) -> Result<DistanceTable, LoadError> {
    // Validated by Config::validate; a non-ASCII delimiter can't be a byte
    let delimiter = u8::try_from(config.delimiter).unwrap_or(b'\t');

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(LoadError::EmptyFile);
    }
    let names = || headers.iter().map(String::as_str);
    let acc1_idx = find_column(names(), &config.acc1_column)?;
    let acc2_idx = find_column(names(), &config.acc2_column)?;
    let dist_idx = find_column(names(), &config.distance_column)?;

    let mut table = DistanceTable::default();
    let mut record = csv::ByteRecord::new();
    let mut fallback_line: u64 = 1;

    loop {
        fallback_line += 1;
        let read = match reader.read_byte_record(&mut record) {
            Ok(read) => read,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                let line = e
                    .position()
                    .map_or(fallback_line, csv::Position::line);
                reject_row(&mut table, config, line, e.to_string())?;
                continue;
            }
        };
        if !read {
            break;
        }

        let line = record.position().map_or(fallback_line, csv::Position::line);

        if record.len() != headers.len() {
            let reason = format!(
                "expected {} fields, found {}",
                headers.len(),
                record.len()
            );
            reject_row(&mut table, config, line, reason)?;
            continue;
        }

        match parse_row(&record, acc1_idx, acc2_idx, dist_idx) {
            Ok((acc_1, acc_2, distance)) => table.pairs.push(DistancePair {
                acc_1,
                acc_2,
                distance,
                line,
            }),
            Err(reason) => reject_row(&mut table, config, line, reason)?,
        }
    }

    if table.skipped_rows > 0 {
        info!(
            "Skipped {} malformed distance row(s); {} rows loaded",
            table.skipped_rows,
            table.len()
        );
    }

    Ok(table)
}

fn parse_row(
    record: &csv::ByteRecord,
    acc1_idx: usize,
    acc2_idx: usize,
    dist_idx: usize,
) -> Result<(Accession, Accession, f64), String> {
    let acc_1 = Accession::new(utf8_field(record, acc1_idx)?);
    let acc_2 = Accession::new(utf8_field(record, acc2_idx)?);
    let raw_distance = utf8_field(record, dist_idx)?.trim();
    let distance: f64 = raw_distance
        .parse()
        .map_err(|_| format!("invalid distance '{raw_distance}'"))?;

    Ok((acc_1, acc_2, distance))
}

fn utf8_field(record: &csv::ByteRecord, idx: usize) -> Result<&str, String> {
    let bytes = record.get(idx).unwrap_or_default();
    std::str::from_utf8(bytes).map_err(|e| format!("field {} is not valid UTF-8: {e}", idx + 1))
}

/// Count a bad row, or turn it into an error when skipping is disabled
fn reject_row(
    table: &mut DistanceTable,
    config: &DistanceTableConfig,
    line: u64,
    reason: String,
) -> Result<(), LoadError> {
    if !config.skip_bad_rows {
        return Err(LoadError::MalformedRow { line, reason });
    }
    warn!("Skipping line {line}: {reason}");
    table.skipped_rows += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "biosample_acc_1\tbiosample_acc_2\ttarget_acc_1\tcompatible_distance\n";

    fn strict() -> DistanceTableConfig {
        DistanceTableConfig {
            skip_bad_rows: false,
            ..DistanceTableConfig::default()
        }
    }

    #[test]
    fn test_parse_distance_text() {
        let text = format!(
            "{HEADER}SAMN1\tSAMN2\tPDT1\t5\nSAMN3\tSAMN4\tPDT2\t7\n"
        );
        let table = parse_distance_text(&text, &DistanceTableConfig::default()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.skipped_rows, 0);
        assert_eq!(table.pairs[0].acc_1.as_str(), "SAMN1");
        assert_eq!(table.pairs[0].acc_2.as_str(), "SAMN2");
        assert!((table.pairs[0].distance - 5.0).abs() < f64::EPSILON);
        assert_eq!(table.pairs[0].line, 2);
        assert_eq!(table.pairs[1].line, 3);
    }

    #[test]
    fn test_bad_rows_skipped_and_counted() {
        let text = format!(
            "{HEADER}SAMN1\tSAMN2\tPDT1\t5\nSAMN3\tSAMN4\tPDT2\t7\textra\nSAMN5\tSAMN6\nSAMN7\tSAMN8\tPDT4\tn/a\nSAMN9\tSAMN10\tPDT5\t0\n"
        );
        let table = parse_distance_text(&text, &DistanceTableConfig::default()).unwrap();

        assert_eq!(table.skipped_rows, 3);
        let acc1: Vec<&str> = table.acc1_list().map(Accession::as_str).collect();
        assert_eq!(acc1, vec!["SAMN1", "SAMN9"]);
        assert_eq!(table.pairs[1].line, 6);
    }

    #[test]
    fn test_bad_row_aborts_when_strict() {
        let text = format!("{HEADER}SAMN1\tSAMN2\tPDT1\t5\nSAMN3\tSAMN4\tPDT2\t7\textra\n");
        let err = parse_distance_text(&text, &strict()).unwrap_err();
        match err {
            LoadError::MalformedRow { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("expected 4 fields, found 5"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_a_bad_row() {
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"SAMN\xff\tSAMN2\tPDT1\t5\nSAMN3\tSAMN4\tPDT2\t7\n");

        let table = parse_distance_reader(bytes.as_slice(), &DistanceTableConfig::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.skipped_rows, 1);

        assert!(parse_distance_reader(bytes.as_slice(), &strict()).is_err());
    }

    #[test]
    fn test_missing_column() {
        let text = "acc_a\tbiosample_acc_2\tcompatible_distance\nA\tB\t1\n";
        let err = parse_distance_text(text, &DistanceTableConfig::default()).unwrap_err();
        match err {
            LoadError::ColumnNotFound { column, available } => {
                assert_eq!(column, "biosample_acc_1");
                assert!(available.contains("acc_a"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_accessions_are_normalized() {
        let text = format!("{HEADER} SAMN1 \t\"SAMN2\"\tPDT1\t5\n");
        let table = parse_distance_text(&text, &DistanceTableConfig::default()).unwrap();
        assert_eq!(table.pairs[0].acc_1, Accession::new("SAMN1"));
        assert_eq!(table.pairs[0].acc_2.as_str(), "SAMN2");
    }

    #[test]
    fn test_load_plain_and_gzipped_files() {
        let dir = tempfile::tempdir().unwrap();
        let text = format!("{HEADER}SAMN1\tSAMN2\tPDT1\t5\n");

        let plain = dir.path().join("d.tsv");
        std::fs::write(&plain, &text).unwrap();
        let table = load_distance_table(&plain, &DistanceTableConfig::default()).unwrap();
        assert_eq!(table.len(), 1);

        let gz = dir.path().join("d.tsv.gz");
        let mut encoder = flate2::write::GzEncoder::new(
            File::create(&gz).unwrap(),
            flate2::Compression::default(),
        );
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap();
        let table = load_distance_table(&gz, &DistanceTableConfig::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.pairs[0].acc_2.as_str(), "SAMN2");
    }

    #[test]
    fn test_missing_file() {
        let err = load_distance_table(Path::new("/no/such/table.tsv"), &DistanceTableConfig::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(_)));
    }

    #[test]
    fn test_custom_delimiter() {
        let config = DistanceTableConfig {
            delimiter: ',',
            ..DistanceTableConfig::default()
        };
        let text = "biosample_acc_1,biosample_acc_2,compatible_distance\nA,B,3\n";
        let table = parse_distance_text(text, &config).unwrap();
        assert_eq!(table.len(), 1);
    }
}
