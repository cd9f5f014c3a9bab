//! Domain classification and DNS syntax validation

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CoreError, CoreResult};
use crate::types::DomainDescriptor;

const MAX_LABEL_LENGTH: usize = 63;

static DOMAIN_SHAPE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,}$").ok()
});

/// Classify a user-supplied domain.
///
/// `is_dns` is decided here once: forced by the caller, or any `.` in the name.
#[must_use]
pub fn classify(raw: &str, force_dns: bool) -> DomainDescriptor {
    let raw = raw.trim();
    DomainDescriptor {
        raw: raw.to_string(),
        is_dns: force_dns || raw.contains('.'),
        display_name: display_name(raw),
    }
}

/// Strip an optional `http://`/`https://` scheme and one trailing `/`.
#[must_use]
pub fn display_name(raw: &str) -> String {
    let raw = raw.trim();
    let without_scheme = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
        .unwrap_or(raw);
    without_scheme
        .strip_suffix('/')
        .unwrap_or(without_scheme)
        .to_string()
}

/// Validate DNS syntax; the first violated rule is reported.
pub fn validate_dns(domain: &str) -> CoreResult<()> {
    let name = display_name(domain);
    let labels: Vec<&str> = name.split('.').collect();

    if labels.len() < 2 {
        return Err(invalid(&name, "must contain at least two labels"));
    }
    if labels.iter().any(|l| l.is_empty()) {
        return Err(invalid(&name, "contains an empty label"));
    }
    if let Some(label) = labels.iter().find(|l| l.len() > MAX_LABEL_LENGTH) {
        return Err(invalid(
            &name,
            &format!("label '{label}' exceeds {MAX_LABEL_LENGTH} characters"),
        ));
    }
    if let Some(label) = labels
        .iter()
        .find(|l| !l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
    {
        return Err(invalid(
            &name,
            &format!("label '{label}' may only contain letters, digits and '-'"),
        ));
    }
    if let Some(label) = labels
        .iter()
        .find(|l| l.starts_with('-') || l.ends_with('-'))
    {
        return Err(invalid(
            &name,
            &format!("label '{label}' must not start or end with '-'"),
        ));
    }

    match DOMAIN_SHAPE.as_ref() {
        Some(re) if !re.is_match(&name) => Err(invalid(&name, "is not a valid domain name")),
        _ => Ok(()),
    }
}

fn invalid(name: &str, reason: &str) -> CoreError {
    CoreError::ValidationError(format!("Domain '{name}' {reason}"))
}
