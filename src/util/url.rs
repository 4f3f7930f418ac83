use anyhow::{bail, Context, Result};
use url::Url;

/// Validate a configured endpoint (CMS API or public site URL).
///
/// Requires an absolute http(s) URL with a host. HTTPS is enforced except
/// for loopback hosts, which are allowed so tests and local previews can
/// point at a mock server.
pub fn validate_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("Invalid URL: {}", raw))?;

    match url.scheme() {
        "https" => {}
        "http" => {
            if !is_loopback(&url) {
                bail!("Insecure URL '{}': HTTPS required (except localhost)", raw);
            }
        }
        other => bail!("Unsupported URL scheme '{}' in '{}'", other, raw),
    }

    if url.host_str().is_none() {
        bail!("URL '{}' has no host", raw);
    }

    Ok(url)
}

fn is_loopback(url: &Url) -> bool {
    matches!(url.host_str(), Some("localhost") | Some("127.0.0.1") | Some("[::1]"))
}
