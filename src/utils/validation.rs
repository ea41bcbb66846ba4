//! Centralized validation and normalization helpers.

/// Byte-order mark that spreadsheet exports sometimes leave on the first field
const BOM: char = '\u{feff}';

/// Normalize an accession string so values from different sources compare equal.
///
/// Strips a leading byte-order mark, surrounding whitespace, and one layer of
/// matching single or double quotes. Case is preserved: matching is
/// case-sensitive.
///
/// # Examples
///
/// ```
/// use linelist_linker::utils::validation::normalize_accession;
///
/// assert_eq!(normalize_accession(" SAMN00039977 "), "SAMN00039977");
/// assert_eq!(normalize_accession("\u{feff}\"SAMN1\""), "SAMN1");
/// assert_eq!(normalize_accession("samn1"), "samn1");
/// ```
#[must_use]
pub fn normalize_accession(s: &str) -> String {
    let s = s.trim_start_matches(BOM).trim();
    let unquoted = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')))
        .unwrap_or(s);
    unquoted.trim().to_string()
}

/// Check whether a line-list value carries the identifier prefix.
///
/// # Examples
///
/// ```
/// use linelist_linker::utils::validation::has_identifier_prefix;
///
/// assert!(has_identifier_prefix("PNUSAS000123", "PNU"));
/// assert!(!has_identifier_prefix("pnusas000123", "PNU"));
/// assert!(!has_identifier_prefix("", "PNU"));
/// ```
#[must_use]
pub fn has_identifier_prefix(value: &str, prefix: &str) -> bool {
    !prefix.is_empty() && value.starts_with(prefix)
}

/// Loose sanity check for the contact address sent with registry requests.
///
/// The registry only needs something it can reach a human at, so this
/// rejects obvious mistakes (empty, no `@`, whitespace) and nothing more.
#[must_use]
pub fn is_plausible_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !s.chars().any(char::is_whitespace)
}
