use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::github::types::{Label, PrState, PullRequest, Review};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

pub fn pr(number: u64, title: &str) -> PullRequest {
    PullRequest {
        pull_number: number,
        number_of_comments: 0,
        title: title.to_string(),
        body: String::new(),
        url: format!("https://github.com/acme/widgets/pull/{}", number),
        state: PrState::Open,
        draft: false,
        updated_at_ago_seconds: 60.0,
        updated_at: base_time(),
        updated_at_human: "1 minute ago".to_string(),
        org: "acme".to_string(),
        repo: "widgets".to_string(),
        labels: vec![],
        reviews: vec![],
    }
}

pub fn closed_pr(number: u64, title: &str) -> PullRequest {
    PullRequest {
        state: PrState::Closed,
        ..pr(number, title)
    }
}

pub fn review(reviewer: &str, state: &str, minutes: i64) -> Review {
    Review {
        reviewer: reviewer.to_string(),
        state: state.to_string(),
        submitted_at: Some(base_time() + Duration::minutes(minutes)),
    }
}

pub fn label(name: &str) -> Label {
    Label {
        name: name.to_string(),
    }
}
