//! Single-shot HTTP helpers for the upstream portal.
//!
//! The portal is queried once per load: there is no retry. A non-success
//! status, a timeout, or an undecodable body surfaces as a
//! [`SourceError`] immediately.

use crate::SourceError;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Query parameter names whose values never appear in logs or errors.
const SECRET_PARAMS: &[&str] = &["servicekey"];

/// Sends a request and parses the response body as JSON.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the request or body read fails,
/// [`SourceError::Status`] for a non-success status, or
/// [`SourceError::Json`] if the body is not valid JSON.
pub async fn send_json(request: reqwest::RequestBuilder) -> Result<serde_json::Value, SourceError> {
    let response = request.send().await?;

    let url = redacted_url(response.url());
    let status = response.status();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    if !status.is_success() {
        log::error!("HTTP {status} from {url}");
        return Err(SourceError::Status {
            status: status.as_u16(),
            url,
        });
    }

    // Read the raw body as text first so a parse failure can be logged
    // with the actual content.
    let text = response.text().await?;
    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(e) => {
            log::error!(
                "JSON parse failed.\n  \
                 url: {url}\n  \
                 status: {status}\n  \
                 content-type: {content_type:?}\n  \
                 received: {} bytes\n  \
                 parse error: {e}\n  \
                 body preview: {}",
                text.len(),
                preview(&text),
            );
            Err(SourceError::Json(e))
        }
    }
}

/// Renders `url` with secret query parameter values replaced by `***`.
#[must_use]
pub fn redacted_url(url: &reqwest::Url) -> String {
    let mut redacted = url.clone();
    if url.query().is_some() {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                let value = if SECRET_PARAMS.contains(&k.to_ascii_lowercase().as_str()) {
                    "***".to_string()
                } else {
                    v.into_owned()
                };
                (k.into_owned(), value)
            })
            .collect();
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted.to_string()
}

/// Truncates `text` to at most [`BODY_PREVIEW_LEN`] bytes on a char
/// boundary.
fn preview(text: &str) -> String {
    if text.len() <= BODY_PREVIEW_LEN {
        return text.to_string();
    }
    let mut end = BODY_PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_service_key() {
        let url = reqwest::Url::parse(
            "http://apis.example/zones?serviceKey=abc%2B123&searchYearCd=2023&type=json",
        )
        .unwrap();
        let redacted = redacted_url(&url);
        assert!(!redacted.contains("abc"));
        assert!(redacted.contains("serviceKey=***") || redacted.contains("serviceKey=%2A%2A%2A"));
        assert!(redacted.contains("searchYearCd=2023"));
    }

    #[test]
    fn leaves_urls_without_query_alone() {
        let url = reqwest::Url::parse("http://apis.example/zones").unwrap();
        assert_eq!(redacted_url(&url), "http://apis.example/zones");
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let text = "결".repeat(400);
        let p = preview(&text);
        assert!(p.ends_with("..."));
        assert!(p.len() <= BODY_PREVIEW_LEN + 3);
    }
}
