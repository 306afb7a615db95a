//! Reading domain lists.

use std::io::{self, BufRead};

/// Reads one domain per line.
///
/// Lines are trimmed; blank lines and lines starting with `#` are skipped.
/// Nothing else is filtered, so malformed entries still reach the prober.
pub fn domains_from_reader<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut domains = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let entry = line.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }
        domains.push(entry.to_string());
    }
    Ok(domains)
}
