//! Utility functions for GitHub operations

use anyhow::{Result, anyhow};

/// Split an `owner/repo` slug, as found in `GITHUB_REPOSITORY`
///
/// # Errors
/// Returns an error unless the slug has exactly two non-empty segments
pub fn split_repository(slug: &str) -> Result<(&str, &str)> {
    let slug = slug.trim().trim_end_matches('/');
    match slug.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => Err(anyhow!("Invalid repository slug, expected owner/repo: {}", slug)),
    }
}
