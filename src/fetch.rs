//! HTTP access to the blog's static resources.
//!
//! All network I/O goes through one [`Fetcher`]: a blocking reqwest
//! client with a hard per-request deadline, bound to the site base URL.
//! Workers clone the fetcher onto their threads; results come back as
//! `Result<_, FetchError>` so the UI can show a precise error panel.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use thiserror::Error;

/// Hard deadline for any single request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure modes surfaced to the UI.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {}s", REQUEST_TIMEOUT.as_secs())]
    Timeout,
    #[error("malformed or empty payload: {0}")]
    Data(String),
    #[error("markdown could not be parsed: {0}")]
    Parse(String),
    #[error("missing required argument: {0}")]
    InvalidInput(&'static str),
    #[error("not found: {0}")]
    NotFound(String),
}

impl FetchError {
    /// Short label used in error panels.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Network(_) => "Network error",
            Self::Timeout => "Timeout",
            Self::Data(_) => "Data error",
            Self::Parse(_) => "Parse error",
            Self::InvalidInput(_) => "Invalid input",
            Self::NotFound(_) => "Not found",
        }
    }
}

/// Blocking HTTP client bound to the site base URL.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    base: Url,
}

impl Fetcher {
    /// Build a fetcher for the given site root.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be constructed.
    pub fn new(base: Url) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("blogless/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base })
    }

    /// Host name of the site, for the terminal title.
    pub fn site_name(&self) -> String {
        self.base
            .host_str()
            .map_or_else(|| self.base.to_string(), ToString::to_string)
    }

    /// Resolve a manifest-relative path against the site base.
    ///
    /// Manifests written for pages nested under `posts/` use `../`
    /// prefixes; `Url::join` normalizes those against the base.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidInput`] when the path does not
    /// resolve to a URL.
    pub fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path)
            .map_err(|_| FetchError::InvalidInput("path"))
    }

    /// Fetch a resource as text.
    ///
    /// # Errors
    ///
    /// [`FetchError::Timeout`] past the deadline, [`FetchError::NotFound`]
    /// on 404, [`FetchError::Network`] on other failures or non-2xx
    /// statuses, [`FetchError::Data`] when the body is empty.
    pub fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let url = self.resolve(path)?;
        let response = self.client.get(url.clone()).send().map_err(|err| {
            if err.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(err.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Network(format!("HTTP {status} for {url}")));
        }

        let body = response.text().map_err(|err| {
            if err.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(err.to_string())
            }
        })?;
        if body.trim().is_empty() {
            return Err(FetchError::Data(format!("empty body for {path}")));
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> Fetcher {
        Fetcher::new(Url::parse("https://blog.example.net/").unwrap()).unwrap()
    }

    #[test]
    fn test_resolve_plain_relative_path() {
        let url = fetcher().resolve("posts/kerberoasting.md").unwrap();
        assert_eq!(
            url.as_str(),
            "https://blog.example.net/posts/kerberoasting.md"
        );
    }

    #[test]
    fn test_resolve_normalizes_parent_segments() {
        let url = fetcher().resolve("posts/../assets/posts.json").unwrap();
        assert_eq!(url.as_str(), "https://blog.example.net/assets/posts.json");
    }

    #[test]
    fn test_site_name_is_host() {
        assert_eq!(fetcher().site_name(), "blog.example.net");
    }

    #[test]
    fn test_error_labels_are_stable() {
        assert_eq!(FetchError::Timeout.label(), "Timeout");
        assert_eq!(
            FetchError::Network("boom".to_string()).label(),
            "Network error"
        );
        assert_eq!(FetchError::InvalidInput("path").label(), "Invalid input");
    }
}
