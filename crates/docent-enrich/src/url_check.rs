//! Outbound URL validation
//!
//! Guards against Server-Side Request Forgery: external API URLs must not
//! point at loopback, private, link-local, or cloud-metadata addresses
//! unless the operator explicitly allows internal services.

use crate::error::EnrichError;
use url::{Host, Url};

/// Hostnames serving cloud instance metadata
const METADATA_ENDPOINTS: &[&str] = &[
    "169.254.169.254",
    "metadata.google.internal",
    "metadata.goog",
];

/// Validation options
#[derive(Debug, Clone)]
pub struct UrlOptions {
    /// Allow private and loopback addresses (for internal services)
    pub allow_private_ips: bool,

    /// Accepted URL schemes
    pub allowed_schemes: Vec<String>,
}

impl Default for UrlOptions {
    fn default() -> Self {
        Self {
            allow_private_ips: false,
            allowed_schemes: vec!["http".to_string(), "https".to_string()],
        }
    }
}

/// Validate a URL string for outbound requests.
///
/// Returns the parsed URL on success. Blocks non-http(s) schemes,
/// loopback and localhost, RFC 1918 and link-local ranges, private IPv6
/// ranges, and cloud metadata endpoints unless `allow_private_ips` is set.
pub fn validate_url(url_str: &str, options: &UrlOptions) -> Result<Url, EnrichError> {
    if url_str.is_empty() {
        return Err(EnrichError::UrlValidation(
            "URL must be a non-empty string".to_string(),
        ));
    }

    let parsed = Url::parse(url_str)
        .map_err(|_| EnrichError::UrlValidation("Invalid URL format".to_string()))?;

    if !options
        .allowed_schemes
        .iter()
        .any(|scheme| scheme == parsed.scheme())
    {
        return Err(EnrichError::UrlValidation(format!(
            "Protocol {} is not allowed",
            parsed.scheme()
        )));
    }

    if !options.allow_private_ips {
        check_host(&parsed)?;
    }

    Ok(parsed)
}

fn check_host(url: &Url) -> Result<(), EnrichError> {
    let host = url
        .host()
        .ok_or_else(|| EnrichError::UrlValidation("URL has no host".to_string()))?;

    match host {
        Host::Domain(domain) => {
            let domain = domain.to_lowercase();
            if domain == "localhost" {
                return Err(EnrichError::UrlValidation(
                    "Localhost addresses are not allowed".to_string(),
                ));
            }
            if METADATA_ENDPOINTS
                .iter()
                .any(|ep| domain == *ep || domain.ends_with(&format!(".{ep}")))
            {
                return Err(EnrichError::UrlValidation(
                    "Cloud metadata endpoints are not allowed".to_string(),
                ));
            }
        }
        Host::Ipv4(addr) => {
            if addr.is_loopback() || addr.is_unspecified() {
                return Err(EnrichError::UrlValidation(
                    "Localhost addresses are not allowed".to_string(),
                ));
            }
            if addr.is_private() || addr.is_link_local() {
                return Err(EnrichError::UrlValidation(
                    "Private IP addresses are not allowed".to_string(),
                ));
            }
        }
        Host::Ipv6(addr) => {
            let segments = addr.segments();
            let link_local = (segments[0] & 0xffc0) == 0xfe80;
            let unique_local = (segments[0] & 0xfe00) == 0xfc00;
            if addr.is_loopback() || addr.is_unspecified() || link_local || unique_local {
                return Err(EnrichError::UrlValidation(
                    "Private IPv6 addresses are not allowed".to_string(),
                ));
            }
        }
    }

    Ok(())
}

/// Validate an API URL for external service communication.
///
/// A wrapper around [`validate_url`] with defaults appropriate for API
/// calls; `allow_private_ips` lets administrators target internal APIs.
pub fn validate_api_url(url_str: &str, allow_private_ips: bool) -> Result<Url, EnrichError> {
    validate_url(
        url_str,
        &UrlOptions {
            allow_private_ips,
            ..Default::default()
        },
    )
}

/// Validate that a URL belongs to a known base URL and extract the
/// relative path.
///
/// Used when following URLs returned by an API response (e.g. pagination
/// links) so a hostile response cannot redirect requests elsewhere.
pub fn validate_url_against_base(
    url_str: &str,
    expected_base: &str,
) -> Result<String, EnrichError> {
    if url_str.is_empty() || expected_base.is_empty() {
        return Err(EnrichError::UrlValidation(
            "URL must be a non-empty string".to_string(),
        ));
    }

    let parsed = Url::parse(url_str)
        .map_err(|_| EnrichError::UrlValidation("Invalid URL format".to_string()))?;
    let base = Url::parse(expected_base)
        .map_err(|_| EnrichError::UrlValidation("Invalid URL format".to_string()))?;

    if parsed.origin() != base.origin() {
        return Err(EnrichError::UrlValidation(
            "URL origin does not match expected base URL".to_string(),
        ));
    }

    let mut relative = parsed.path().to_string();
    let base_path = base.path();
    if base_path != "/" && relative.starts_with(base_path) {
        relative = relative[base_path.len()..].to_string();
    }
    if !relative.starts_with('/') {
        relative.insert(0, '/');
    }

    if let Some(query) = parsed.query() {
        relative.push('?');
        relative.push_str(query);
    }

    Ok(relative)
}
