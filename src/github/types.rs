use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a pull request as reported by the search API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    Open,
    Closed,
}

impl PrState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrState::Open => "open",
            PrState::Closed => "closed",
        }
    }
}

impl fmt::Display for PrState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub reviewer: String,
    pub state: String, // "APPROVED", "CHANGES_REQUESTED", "COMMENTED", ...
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub pull_number: u64,
    pub number_of_comments: u64,
    pub title: String,
    pub body: String,
    pub url: String,
    pub state: PrState,
    #[serde(default)]
    pub draft: bool,
    pub updated_at_ago_seconds: f64,
    pub updated_at: DateTime<Utc>,
    pub updated_at_human: String, // display only, never diffed
    pub org: String,
    pub repo: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl PullRequest {
    /// Return a short reference in the format "org/repo#123"
    pub fn short_ref(&self) -> String {
        format!("{}/{}#{}", self.org, self.repo, self.pull_number)
    }
}

/// One run's fetched state: open PRs plus the ones that closed very recently.
///
/// Both lists are ordered most-recently-updated first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrInfoGroups {
    pub open: Vec<PullRequest>,
    pub closed: Vec<PullRequest>,
}

impl PrInfoGroups {
    pub fn group(&self, status: PrState) -> &[PullRequest] {
        match status {
            PrState::Open => &self.open,
            PrState::Closed => &self.closed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty() && self.closed.is_empty()
    }
}
