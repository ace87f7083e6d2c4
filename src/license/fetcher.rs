//! License file retrieval from GitHub repositories
//!
//! Tries the raw-content host for common license file names across the
//! default branches. Absence is a normal outcome (`Ok(None)`); transport
//! failures on one candidate URL only skip that candidate.

use async_trait::async_trait;
use std::time::Duration;

use super::truncate_chars;
use crate::{CovalentError, CovalentResult};

/// File names checked at the repository root, in priority order.
const LICENSE_FILE_NAMES: &[&str] = &[
    "LICENSE",
    "LICENSE.txt",
    "LICENSE.md",
    "COPYING",
    "COPYING.txt",
];

/// Default branches checked for each file name.
const BRANCHES: &[&str] = &["main", "master"];

/// Fetched texts are capped to keep classification input bounded.
const MAX_LICENSE_CHARS: usize = 2000;

/// Source of raw license text for a repository URL.
///
/// `Ok(None)` means no license file was found; errors are reserved for
/// failures worth surfacing to the caller.
#[async_trait]
pub trait LicenseSource: Send + Sync {
    async fn fetch_license_text(&self, repository_url: &str) -> CovalentResult<Option<String>>;
}

/// [`LicenseSource`] backed by raw.githubusercontent.com.
pub struct HttpLicenseSource {
    client: reqwest::Client,
}

impl HttpLicenseSource {
    pub fn new(timeout: Duration) -> CovalentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("covalent/0.2.0 (compatibility analysis)")
            .build()
            .map_err(|e| CovalentError::FetchError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl LicenseSource for HttpLicenseSource {
    async fn fetch_license_text(&self, repository_url: &str) -> CovalentResult<Option<String>> {
        let (owner, repo) = match parse_github_repo(repository_url) {
            Some(parts) => parts,
            None => return Ok(None),
        };

        for file_name in LICENSE_FILE_NAMES {
            for branch in BRANCHES {
                let url = format!(
                    "https://raw.githubusercontent.com/{}/{}/{}/{}",
                    owner, repo, branch, file_name
                );

                match self.client.get(&url).send().await {
                    Ok(response) if response.status().is_success() => {
                        match response.text().await {
                            Ok(text) => {
                                tracing::debug!("Fetched license file from {}", url);
                                return Ok(Some(truncate_chars(&text, MAX_LICENSE_CHARS)));
                            }
                            Err(e) => {
                                tracing::debug!("Failed to read body from {}: {}", url, e);
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!("Request to {} failed: {}", url, e);
                    }
                }
            }
        }

        Ok(None)
    }
}

/// Extracts `(owner, repo)` from a GitHub repository URL, tolerating
/// scheme variants, trailing paths, and a `.git` suffix.
fn parse_github_repo(url: &str) -> Option<(String, String)> {
    let after_host = url.split("github.com/").nth(1)?;
    let mut segments = after_host.split('/');

    let owner = segments.next()?.trim();
    let repo = segments.next()?.trim().trim_end_matches(".git");

    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

/// [`LicenseSource`] that never finds anything. Used when remote fetching
/// is disabled and as a deterministic stand-in for tests.
pub struct NullLicenseSource;

#[async_trait]
impl LicenseSource for NullLicenseSource {
    async fn fetch_license_text(&self, _repository_url: &str) -> CovalentResult<Option<String>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_https_url() {
        assert_eq!(
            parse_github_repo("https://github.com/pallets/flask"),
            Some(("pallets".to_string(), "flask".to_string()))
        );
    }

    #[test]
    fn test_parses_git_suffix_and_trailing_path() {
        assert_eq!(
            parse_github_repo("https://github.com/django/django.git"),
            Some(("django".to_string(), "django".to_string()))
        );
        assert_eq!(
            parse_github_repo("https://github.com/encode/fastapi/tree/main/docs"),
            Some(("encode".to_string(), "fastapi".to_string()))
        );
    }

    #[test]
    fn test_rejects_non_github_urls() {
        assert_eq!(parse_github_repo("https://gitlab.com/owner/repo"), None);
        assert_eq!(parse_github_repo("https://example.com/"), None);
        assert_eq!(parse_github_repo(""), None);
    }

    #[test]
    fn test_rejects_incomplete_paths() {
        assert_eq!(parse_github_repo("https://github.com/onlyowner"), None);
        assert_eq!(parse_github_repo("https://github.com/owner/"), None);
    }

    #[tokio::test]
    async fn test_null_source_finds_nothing() {
        let source = NullLicenseSource;
        let fetched = source
            .fetch_license_text("https://github.com/pallets/flask")
            .await
            .unwrap();
        assert_eq!(fetched, None);
    }
}
