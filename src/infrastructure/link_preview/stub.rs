//! Offline link previewer
//!
//! Derives the preview from the URL itself; nothing is fetched.

use async_trait::async_trait;
use reqwest::Url;

use crate::application::ports::{LinkPreviewError, LinkPreviewer};
use crate::domain::media::LinkPreview;

/// Parse user input as a URL, assuming https for bare hosts
pub fn normalize_url(input: &str) -> Result<Url, LinkPreviewError> {
    let trimmed = input.trim();
    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|_| LinkPreviewError::InvalidUrl(input.to_string()))?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(LinkPreviewError::InvalidUrl(input.to_string())),
    }
}

/// Host without a leading `www.`
fn display_domain(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// Link previewer that never touches the network
#[derive(Debug, Default, Clone, Copy)]
pub struct StubLinkPreviewer;

impl StubLinkPreviewer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LinkPreviewer for StubLinkPreviewer {
    async fn preview(&self, url: &str) -> Result<LinkPreview, LinkPreviewError> {
        let parsed = normalize_url(url)?;
        let domain = display_domain(&parsed);

        Ok(LinkPreview {
            title: format!("Link to {}", domain),
            description: Some(format!("Shared link from {}", domain)),
            favicon: Some(format!(
                "https://www.google.com/s2/favicons?domain={}&sz=32",
                domain
            )),
            url: parsed.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn preview_strips_www() {
        let preview = StubLinkPreviewer::new()
            .preview("https://www.rust-lang.org/learn")
            .await
            .unwrap();

        assert_eq!(preview.title, "Link to rust-lang.org");
        assert_eq!(
            preview.description.as_deref(),
            Some("Shared link from rust-lang.org")
        );
        assert_eq!(
            preview.favicon.as_deref(),
            Some("https://www.google.com/s2/favicons?domain=rust-lang.org&sz=32")
        );
        assert_eq!(preview.url, "https://www.rust-lang.org/learn");
    }

    #[tokio::test]
    async fn bare_host_gets_https() {
        let preview = StubLinkPreviewer::new().preview("example.com").await.unwrap();
        assert_eq!(preview.title, "Link to example.com");
        assert_eq!(preview.url, "https://example.com/");
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert!(normalize_url("not a url").is_err());
        assert!(normalize_url("https://").is_err());
        assert!(normalize_url("").is_err());
    }

    #[test]
    fn http_is_kept() {
        assert_eq!(normalize_url("http://a.io").unwrap().scheme(), "http");
    }
}
