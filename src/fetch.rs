use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use octocrab::Octocrab;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::github::types::{PrInfoGroups, PrState, PullRequest};
use crate::github::{fetch_reviews, search_prs, SearchOptions};

const MAX_CONCURRENT_REVIEW_FETCHES: usize = 10;

/// Fetch the current snapshot: open PRs with their reviews, plus PRs that
/// closed within the configured window.
///
/// Fails as a whole if the search or any review fetch fails, so callers
/// never see a partially populated snapshot.
pub async fn fetch_snapshot(client: &Octocrab, config: &Config) -> Result<PrInfoGroups> {
    let options = SearchOptions {
        author: config.username.clone(),
        org: config.org.clone(),
        repo: config.repo.clone(),
        state: None,
        max_age: Some(config.lookback),
    };

    let prs = search_prs(client, &options, config.timeout).await?;
    let mut groups = split_groups(prs, config.closed_window);
    attach_reviews(client, &mut groups.open).await?;

    debug!(
        open = groups.open.len(),
        closed = groups.closed.len(),
        "fetched snapshot"
    );
    Ok(groups)
}

/// Split search results into open PRs and recently closed PRs, keeping
/// their order. Closed PRs updated longer ago than `closed_window` are
/// dropped.
pub fn split_groups(prs: Vec<PullRequest>, closed_window: Duration) -> PrInfoGroups {
    let window_secs = closed_window.as_secs_f64();
    let (open, closed): (Vec<_>, Vec<_>) = prs.into_iter().partition(|pr| pr.state == PrState::Open);

    PrInfoGroups {
        open,
        closed: closed
            .into_iter()
            .filter(|pr| pr.updated_at_ago_seconds < window_secs)
            .collect(),
    }
}

/// Fetch reviews for every PR with bounded concurrency, one request per PR
async fn attach_reviews(client: &Octocrab, prs: &mut [PullRequest]) -> Result<()> {
    let mut targets = prs
        .iter()
        .enumerate()
        .map(|(index, pr)| (index, pr.org.clone(), pr.repo.clone(), pr.pull_number))
        .collect::<Vec<_>>()
        .into_iter();

    let fetch = move |(index, org, repo, number): (usize, String, String, u64)| async move {
        let result = fetch_reviews(client, &org, &repo, number).await;
        (index, result)
    };

    let mut futures = FuturesUnordered::new();
    for target in targets.by_ref().take(MAX_CONCURRENT_REVIEW_FETCHES) {
        futures.push(fetch(target));
    }

    // Process results and feed new tasks
    while let Some((index, result)) = futures.next().await {
        let reviews = result?;
        if let Some(pr) = prs.get_mut(index) {
            debug!(pr = %pr.short_ref(), count = reviews.len(), "fetched reviews");
            pr.reviews = reviews;
        }
        if let Some(next) = targets.next() {
            futures.push(fetch(next));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::test_support::{closed_pr, pr};

    fn aged(mut pr: PullRequest, seconds: f64) -> PullRequest {
        pr.updated_at_ago_seconds = seconds;
        pr
    }

    #[test]
    fn test_split_groups_keeps_recent_closed_only() {
        let prs = vec![
            aged(closed_pr(1, "Just merged"), 30.0),
            aged(pr(2, "Open one"), 40.0),
            aged(closed_pr(3, "Merged an hour ago"), 3600.0),
            aged(pr(4, "Open two"), 5000.0),
        ];

        let groups = split_groups(prs, Duration::from_secs(300));

        let open: Vec<u64> = groups.open.iter().map(|p| p.pull_number).collect();
        let closed: Vec<u64> = groups.closed.iter().map(|p| p.pull_number).collect();
        assert_eq!(open, vec![2, 4]);
        assert_eq!(closed, vec![1]);
    }

    #[test]
    fn test_split_groups_window_is_exclusive() {
        let prs = vec![aged(closed_pr(1, "Edge"), 300.0)];
        let groups = split_groups(prs, Duration::from_secs(300));
        assert!(groups.closed.is_empty());
    }
}
