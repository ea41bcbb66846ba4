//! Report rendering for all subcommands.
//!
//! Text output prints two headed sections of space-separated pairs. TSV and
//! CSV output write the same sections as tables separated by a blank line;
//! JSON writes one document.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::core::types::Resolution;
use crate::matching::{Link, MatchMode};

pub const RESOLUTION_HEADING: &str = "Printing WGS_id with their corresponding SAMN accession - ";
pub const LINK_HEADING: &str = "Printing matches between linelist and metadata file - ";

/// Counts describing one run, reported on stderr and in JSON output
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifiers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_mode: Option<MatchMode>,
}

impl RunSummary {
    /// One-line run summary, e.g. `Summary: 2 identifiers, 2 accessions`
    #[must_use]
    pub fn line(&self) -> String {
        let parts: Vec<String> = [
            (self.identifiers, "identifiers"),
            (self.accessions, "accessions"),
            (self.distance_rows, "distance rows"),
            (self.skipped_rows, "skipped rows"),
            (self.links, "links"),
        ]
        .into_iter()
        .filter_map(|(n, what)| n.map(|n| format!("{n} {what}")))
        .collect();
        format!("Summary: {}", parts.join(", "))
    }

    /// Print the summary to stderr, and call out skipped rows
    pub fn emit(&self) {
        eprintln!("{}", self.line());

        if let Some(skipped) = self.skipped_rows.filter(|&n| n > 0) {
            eprintln!("Warning: skipped {skipped} malformed distance-table row(s)");
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    resolutions: Option<&'a [Resolution]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    links: Option<&'a [Link]>,
    summary: &'a RunSummary,
}

/// Write whichever sections are present, in the requested format
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_report<W: Write>(
    out: &mut W,
    format: OutputFormat,
    resolutions: Option<&[Resolution]>,
    links: Option<&[Link]>,
    summary: &RunSummary,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => write_text(out, resolutions, links)?,
        OutputFormat::Tsv => write_delimited(out, b'\t', resolutions, links)?,
        OutputFormat::Csv => write_delimited(out, b',', resolutions, links)?,
        OutputFormat::Json => {
            let report = JsonReport {
                resolutions,
                links,
                summary,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn write_text<W: Write>(
    out: &mut W,
    resolutions: Option<&[Resolution]>,
    links: Option<&[Link]>,
) -> std::io::Result<()> {
    if let Some(resolutions) = resolutions {
        writeln!(out, "{RESOLUTION_HEADING}\n")?;
        for r in resolutions {
            writeln!(out, "{} {}", r.identifier, r.accession)?;
        }
    }
    if let Some(links) = links {
        if resolutions.is_some() {
            writeln!(out)?;
        }
        writeln!(out, "{LINK_HEADING}\n")?;
        for l in links {
            writeln!(out, "{} {}", l.accession, l.linked_accession)?;
        }
    }
    Ok(())
}

fn write_delimited<W: Write>(
    out: &mut W,
    delimiter: u8,
    resolutions: Option<&[Resolution]>,
    links: Option<&[Link]>,
) -> anyhow::Result<()> {
    if let Some(resolutions) = resolutions {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(&mut *out);
        writer.write_record(["identifier", "accession"])?;
        for r in resolutions {
            writer.write_record([r.identifier.as_str(), r.accession.as_str()])?;
        }
        writer.flush()?;
    }
    if let Some(links) = links {
        if resolutions.is_some() {
            writeln!(out)?;
        }
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(&mut *out);
        writer.write_record(["accession", "linked_accession", "distance", "line"])?;
        for l in links {
            let distance = l.distance.to_string();
            let line = l.line.to_string();
            writer.write_record([
                l.accession.as_str(),
                l.linked_accession.as_str(),
                distance.as_str(),
                line.as_str(),
            ])?;
        }
        writer.flush()?;
    }
    Ok(())
}
