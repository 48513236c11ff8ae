use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

use crate::github::types::Review;

/// Reviewer name used when GitHub returns a review without a user
/// (deleted accounts)
pub const UNKNOWN_REVIEWER: &str = "unknown";

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
}

#[derive(Deserialize)]
struct ReviewItem {
    user: Option<ReviewUser>,
    state: String,
    submitted_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct ReviewUser {
    login: String,
}

/// Fetch the reviews of one pull request, in the order GitHub returns them
pub async fn fetch_reviews(
    client: &Octocrab,
    org: &str,
    repo: &str,
    pull_number: u64,
) -> Result<Vec<Review>> {
    let route = format!("/repos/{}/{}/pulls/{}/reviews", org, repo, pull_number);
    let items: Vec<ReviewItem> = client
        .get(route, Some(&PageParams { per_page: 100 }))
        .await
        .with_context(|| format!("Failed to fetch reviews for {}/{}#{}", org, repo, pull_number))?;

    Ok(items
        .into_iter()
        .map(|item| Review {
            reviewer: item
                .user
                .map(|user| user.login)
                .unwrap_or_else(|| UNKNOWN_REVIEWER.to_string()),
            state: item.state,
            submitted_at: item.submitted_at,
        })
        .collect())
}
