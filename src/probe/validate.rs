//! Optional host name sanity checks.
//!
//! These are deliberately loose: they catch strings no resolver could ever
//! answer for, not every RFC 1035 violation.

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Checks that `host` could plausibly be a DNS name or an IP literal.
pub fn validate_host(host: &str) -> Result<(), &'static str> {
    if host.is_empty() {
        return Err("empty host name");
    }
    if host.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err("host name contains whitespace or control characters");
    }

    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() {
        return Err("host name is only a root label");
    }
    if host.len() > MAX_NAME_LEN {
        return Err("host name longer than 253 bytes");
    }

    for label in host.split('.') {
        if label.is_empty() {
            return Err("host name has an empty label");
        }
        if label.len() > MAX_LABEL_LEN {
            return Err("host name label longer than 63 bytes");
        }
    }

    Ok(())
}
