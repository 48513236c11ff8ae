use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, warn};

use crate::config::RepoRef;
use crate::github::error::FetchError;
use crate::github::types::{Label, PrState, PullRequest};

/// What to search for
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub author: String,
    /// Limit search to an org
    pub org: Option<String>,
    /// Limit search to a single repository
    pub repo: Option<RepoRef>,
    /// Only PRs in this state; both when None
    pub state: Option<PrState>,
    /// Omit PRs not updated within this window
    pub max_age: Option<Duration>,
}

#[derive(Serialize)]
struct SearchParams<'a> {
    q: &'a str,
    sort: &'static str,
    order: &'static str,
    per_page: u8,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    incomplete_results: bool,
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    number: u64,
    title: String,
    body: Option<String>,
    state: PrState,
    html_url: String,
    draft: Option<bool>,
    #[serde(default)]
    comments: u64,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    labels: Vec<Label>,
}

/// Build the search query string from options
///
/// Format: "is:pr [is:<state>] author:<user> [org:<org>] [repo:<o>/<n>] [updated:>=YYYY-MM-DD]"
pub fn build_query(options: &SearchOptions, now: DateTime<Utc>) -> String {
    let mut qualifiers = vec!["is:pr".to_string()];

    if let Some(state) = options.state {
        qualifiers.push(format!("is:{}", state));
    }
    qualifiers.push(format!("author:{}", options.author));
    if let Some(org) = &options.org {
        qualifiers.push(format!("org:{}", org));
    }
    if let Some(repo) = &options.repo {
        qualifiers.push(format!("repo:{}/{}", repo.owner, repo.name));
    }
    if let Some(max_age) = options.max_age {
        let since = chrono::Duration::from_std(max_age)
            .ok()
            .and_then(|age| now.checked_sub_signed(age))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        qualifiers.push(format!("updated:>={}", since.format("%Y-%m-%d")));
    }

    qualifiers.join(" ")
}

/// Search GitHub for pull requests authored by `options.author`.
///
/// The whole search, retries included, must finish within `timeout`;
/// otherwise a [`FetchError::Timeout`] is returned. Results are sorted most
/// recently updated first.
pub async fn search_prs(
    client: &Octocrab,
    options: &SearchOptions,
    timeout: Duration,
) -> Result<Vec<PullRequest>> {
    let now = Utc::now();
    let query = build_query(options, now);
    let params = SearchParams {
        q: &query,
        sort: "updated",
        order: "desc",
        per_page: 100,
    };
    debug!(query = %query, "searching pull requests");

    // Retry strategy: exponential backoff with 3 attempts
    let retry_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .take(3);

    let params = &params;
    let search = Retry::spawn(retry_strategy, move || {
        client.get::<SearchResponse, _, _>("/search/issues", Some(params))
    });

    let response = match tokio::time::timeout(timeout, search).await {
        Ok(result) => result.map_err(describe_api_error)?,
        Err(_) => return Err(FetchError::Timeout(timeout).into()),
    };

    if response.incomplete_results {
        warn!(query = %query, "search results may be incomplete");
    }

    let mut prs = response
        .items
        .into_iter()
        .map(|item| into_pull_request(item, now))
        .collect::<Result<Vec<_>, FetchError>>()?;

    if let Some(max_age) = options.max_age {
        let max_secs = max_age.as_secs_f64();
        prs.retain(|pr| pr.updated_at_ago_seconds < max_secs);
    }
    prs.sort_by(|a, b| a.updated_at_ago_seconds.total_cmp(&b.updated_at_ago_seconds));

    debug!(count = prs.len(), "search returned pull requests");
    Ok(prs)
}

/// Extract useful error info from an octocrab error
fn describe_api_error(e: octocrab::Error) -> anyhow::Error {
    let error_str = format!("{:?}", e);
    if error_str.contains("401") || error_str.contains("Bad credentials") {
        anyhow!("Authentication failed. Your GitHub token may be invalid or expired.")
    } else if error_str.contains("rate limit") || error_str.contains("403") {
        anyhow!("GitHub API rate limit exceeded. Wait a few minutes and try again.")
    } else {
        anyhow!("GitHub API error: {}", e)
    }
}

fn into_pull_request(item: SearchItem, now: DateTime<Utc>) -> Result<PullRequest, FetchError> {
    let (org, repo) = parse_org_repo(&item.html_url)
        .ok_or_else(|| FetchError::MalformedUrl(item.html_url.clone()))?;

    let ago = now.signed_duration_since(item.updated_at);

    Ok(PullRequest {
        pull_number: item.number,
        number_of_comments: item.comments,
        title: item.title,
        body: item.body.unwrap_or_default(),
        url: item.html_url,
        state: item.state,
        draft: item.draft.unwrap_or(false),
        updated_at_ago_seconds: ago.num_milliseconds() as f64 / 1000.0,
        updated_at: item.updated_at,
        updated_at_human: crate::output::format_distance(item.updated_at, now),
        org,
        repo,
        labels: item.labels,
        reviews: Vec::new(),
    })
}

/// Extract owner and repo from an html_url
/// Format: "https://github.com/owner/repo/pull/123"
pub fn parse_org_repo(html_url: &str) -> Option<(String, String)> {
    let without_scheme = html_url.split_once("://").map_or(html_url, |(_, rest)| rest);
    let mut parts = without_scheme.split('/').skip(1).filter(|s| !s.is_empty());
    let org = parts.next()?;
    let repo = parts.next()?;
    Some((org.to_string(), repo.to_string()))
}
