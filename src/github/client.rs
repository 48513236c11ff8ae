use anyhow::{Context, Result};
use octocrab::Octocrab;

/// Create an authenticated GitHub client using a personal access token
pub fn create_client(token: &str) -> Result<Octocrab> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .context("Failed to create GitHub client")
}

/// Create an authenticated client that talks to `base_uri` instead of
/// api.github.com (GitHub Enterprise, or a mock server in tests)
pub fn create_client_with_base(token: &str, base_uri: &str) -> Result<Octocrab> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .base_uri(base_uri)
        .with_context(|| format!("Invalid GitHub API base URI: {}", base_uri))?
        .build()
        .context("Failed to create GitHub client")
}
