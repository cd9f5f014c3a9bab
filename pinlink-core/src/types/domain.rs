use serde::Serialize;

/// A user-supplied domain after classification.
///
/// Built once by [`crate::domain::classify`]; validation, entitlement, availability
/// and bind dispatch all read `is_dns` from the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDescriptor {
    /// Trimmed input as typed
    pub raw: String,
    /// Custom DNS domain (true) or service subdomain label (false)
    pub is_dns: bool,
    /// Input without scheme and trailing slash
    pub display_name: String,
}

/// Result of a successful bind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindResult {
    pub success: bool,
    pub visit_url: String,
}

impl BindResult {
    /// Visit URL for a bound domain: `https://<name>.<suffix>` or `https://<dns-name>`.
    #[must_use]
    pub fn for_domain(domain: &DomainDescriptor, subdomain_suffix: &str) -> Self {
        let visit_url = if domain.is_dns {
            format!("https://{}", domain.display_name)
        } else {
            format!(
                "https://{}.{}",
                domain.display_name,
                subdomain_suffix.trim_start_matches('.')
            )
        };
        Self {
            success: true,
            visit_url,
        }
    }
}
