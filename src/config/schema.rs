use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw contents of the config file. Every key is optional here so that a
/// missing key can be reported by name instead of as a parse error.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RawConfig {
    pub token: Option<String>,
    pub username: Option<String>,
    /// Limit the search to one organisation
    pub org: Option<String>,
    /// Limit the search to one repository ("owner/name")
    pub repo: Option<String>,
    /// How far back to look for open PRs, e.g. "30days"
    pub lookback: Option<String>,
    /// How long a closed PR stays in the menu, e.g. "5m"
    pub closed_window: Option<String>,
    /// Deadline for the search request, e.g. "5s"
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

/// Validated configuration used by the rest of the program
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub username: String,
    pub org: Option<String>,
    pub repo: Option<RepoRef>,
    pub lookback: Duration,
    pub closed_window: Duration,
    pub timeout: Duration,
}
