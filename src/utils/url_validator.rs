//! Syntactic URL checks.
//!
//! URLs are stored exactly as submitted. No normalization is applied, so
//! `https://a.com` and `https://a.com/` are different originals.

use url::Url;

/// Reasons a submitted URL is rejected.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL is empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Checks that `input` parses as an absolute `http` or `https` URL with a host.
///
/// # Errors
///
/// Returns a [`UrlValidationError`] describing the first failed check.
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com/path?q=1#frag").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(validate_url("   "), Err(UrlValidationError::Empty)));
    }

    #[test]
    fn test_rejects_relative() {
        assert!(matches!(
            validate_url("not-a-url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_other_schemes() {
        for input in ["ftp://example.com", "javascript:alert(1)", "mailto:a@b.c"] {
            assert!(
                matches!(validate_url(input), Err(UrlValidationError::UnsupportedProtocol)),
                "{input} should be rejected"
            );
        }
    }
}
