use tracing::debug;
use url::Url;

/// The domain bucket name a submission is filed under.
///
/// Link posts use the url's host as written, lowercased with a leading
/// `www.` removed. Internationalised names stay in Unicode and an explicit
/// non-default port is kept as `host:port`. Text posts use the
/// pseudo-domain `self.<topic>`. Returns an empty string when a url has no
/// parsable host.
pub fn domain_bucket(url: Option<&str>, topic: &str) -> String {
    match url {
        Some(url) => {
            let host = match Url::parse(url) {
                Ok(parsed) => host_with_port(&parsed),
                Err(e) => {
                    debug!(url, error = %e, "unparsable submission url");
                    String::new()
                }
            };
            host.strip_prefix("www.").unwrap_or(&host).to_string()
        }
        None => format!("self.{topic}").to_lowercase(),
    }
}

fn host_with_port(url: &Url) -> String {
    let host = match url.domain() {
        // The parser stores names in punycode.
        Some(domain) => idna::domain_to_unicode(domain).0,
        None => url.host_str().unwrap_or_default().to_string(),
    };
    if host.is_empty() {
        return host;
    }
    match url.port() {
        Some(port) => format!("{host}:{port}").to_lowercase(),
        None => host.to_lowercase(),
    }
}
