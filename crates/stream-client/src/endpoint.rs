//! Stream endpoint resolution

use crate::error::StreamError;
use url::Url;

/// Derive the stream endpoint from the URL of the hosting page
///
/// The stream lives on the page's host and port at `/`. The secure `wss`
/// scheme is used iff the page itself was loaded over `https`.
pub fn stream_endpoint(page: &Url) -> Result<Url, StreamError> {
    let scheme = match page.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => return Err(StreamError::UnsupportedScheme(other.to_string())),
    };
    let host = page.host_str().ok_or(StreamError::MissingHost)?;

    let endpoint = match page.port() {
        Some(port) => format!("{}://{}:{}/", scheme, host, port),
        None => format!("{}://{}/", scheme, host),
    };
    Ok(Url::parse(&endpoint)?)
}
