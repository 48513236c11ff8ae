use std::borrow::Cow;
use std::collections::HashSet;

use super::title::short_title;
use crate::github::types::{PullRequest, Review};

/// How a scalar field change is worded in an alert
#[derive(Debug, Clone, Copy)]
enum ScalarAlert {
    /// `PR "<title>" updated`
    Updated,
    /// `PR "<title>" description changed`
    DescriptionChanged,
    /// `PR "<title>" changed <field> from "<old>" to "<new>"`
    ValueChanged,
}

#[derive(Clone, Copy)]
enum Comparator {
    Reviews,
    Labels,
    Scalar {
        read: fn(&PullRequest) -> Cow<'_, str>,
        alert: ScalarAlert,
    },
}

struct FieldRule {
    name: &'static str,
    comparator: Comparator,
}

/// Fields compared between two paired PRs, in alert order.
///
/// `updated_at_human` is derived from the clock and is not listed. Neither
/// are the numeric and boolean fields.
const FIELD_RULES: &[FieldRule] = &[
    FieldRule { name: "reviews", comparator: Comparator::Reviews },
    FieldRule { name: "labels", comparator: Comparator::Labels },
    FieldRule {
        name: "title",
        comparator: Comparator::Scalar { read: read_title, alert: ScalarAlert::ValueChanged },
    },
    FieldRule {
        name: "body",
        comparator: Comparator::Scalar { read: read_body, alert: ScalarAlert::DescriptionChanged },
    },
    FieldRule {
        name: "url",
        comparator: Comparator::Scalar { read: read_url, alert: ScalarAlert::ValueChanged },
    },
    FieldRule {
        name: "state",
        comparator: Comparator::Scalar { read: read_state, alert: ScalarAlert::ValueChanged },
    },
    FieldRule {
        name: "updated_at",
        comparator: Comparator::Scalar { read: read_updated_at, alert: ScalarAlert::Updated },
    },
    FieldRule {
        name: "org",
        comparator: Comparator::Scalar { read: read_org, alert: ScalarAlert::ValueChanged },
    },
    FieldRule {
        name: "repo",
        comparator: Comparator::Scalar { read: read_repo, alert: ScalarAlert::ValueChanged },
    },
];

fn read_title(pr: &PullRequest) -> Cow<'_, str> {
    Cow::Borrowed(&pr.title)
}

fn read_body(pr: &PullRequest) -> Cow<'_, str> {
    Cow::Borrowed(&pr.body)
}

fn read_url(pr: &PullRequest) -> Cow<'_, str> {
    Cow::Borrowed(&pr.url)
}

fn read_state(pr: &PullRequest) -> Cow<'_, str> {
    Cow::Borrowed(pr.state.as_str())
}

fn read_updated_at(pr: &PullRequest) -> Cow<'_, str> {
    Cow::Owned(pr.updated_at.to_rfc3339())
}

fn read_org(pr: &PullRequest) -> Cow<'_, str> {
    Cow::Borrowed(&pr.org)
}

fn read_repo(pr: &PullRequest) -> Cow<'_, str> {
    Cow::Borrowed(&pr.repo)
}

/// Compare two PRs that occupy the same position in their snapshots.
pub fn compare_pr(pr: &PullRequest, pr_before: &PullRequest) -> Vec<String> {
    let title = short_title(&pr.title);
    let mut alerts = Vec::new();

    for rule in FIELD_RULES {
        match rule.comparator {
            Comparator::Reviews => {
                alerts.extend(compare_reviews(&title, &pr.reviews, &pr_before.reviews));
            }
            Comparator::Labels => {
                alerts.extend(compare_labels(&title, pr, pr_before));
            }
            Comparator::Scalar { read, alert } => {
                let value = read(pr);
                let value_before = read(pr_before);
                if value == value_before {
                    continue;
                }
                alerts.push(match alert {
                    ScalarAlert::Updated => format!("PR \"{}\" updated", title),
                    ScalarAlert::DescriptionChanged => {
                        format!("PR \"{}\" description changed", title)
                    }
                    ScalarAlert::ValueChanged => format!(
                        "PR \"{}\" changed {} from \"{}\" to \"{}\"",
                        title, rule.name, value_before, value
                    ),
                });
            }
        }
    }

    alerts
}

/// Pair reviews by index. Reviews that vanished from the current list are
/// not reported.
pub fn compare_reviews(title: &str, reviews: &[Review], reviews_before: &[Review]) -> Vec<String> {
    reviews
        .iter()
        .enumerate()
        .filter(|(index, review)| reviews_before.get(*index) != Some(*review))
        .map(|(_, review)| format!("{} {} on \"{}\"", review.reviewer, review.state, title))
        .collect()
}

fn compare_labels(title: &str, pr: &PullRequest, pr_before: &PullRequest) -> Option<String> {
    let names = unique_names(pr);
    let names_before = unique_names(pr_before);

    let current: HashSet<&str> = names.iter().copied().collect();
    let before: HashSet<&str> = names_before.iter().copied().collect();

    let added: Vec<&str> = names.iter().copied().filter(|n| !before.contains(n)).collect();
    let removed: Vec<&str> = names_before
        .iter()
        .copied()
        .filter(|n| !current.contains(n))
        .collect();

    match (added.is_empty(), removed.is_empty()) {
        (true, true) => None,
        (false, true) => Some(format!("PR \"{}\" {}", title, label_phrase("new", &added))),
        (true, false) => Some(format!("PR \"{}\" {}", title, label_phrase("removed", &removed))),
        (false, false) => Some(format!(
            "PR \"{}\" {} and {}",
            title,
            label_phrase("new", &added),
            label_phrase("removed", &removed)
        )),
    }
}

/// Label names in first-seen order, duplicates dropped
fn unique_names(pr: &PullRequest) -> Vec<&str> {
    let mut seen = HashSet::new();
    pr.labels
        .iter()
        .map(|label| label.name.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

fn label_phrase(kind: &str, names: &[&str]) -> String {
    let plural = if names.len() > 1 { "s" } else { "" };
    format!("{} label{}: {}", kind, plural, names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::test_support::{label, pr, review};
    use crate::github::types::PrState;

    #[test]
    fn test_identical_prs_produce_nothing() {
        let a = pr(1, "Fix X");
        assert!(compare_pr(&a, &a.clone()).is_empty());
    }

    #[test]
    fn test_human_and_ago_fields_ignored() {
        let before = pr(1, "Fix X");
        let mut now = before.clone();
        now.updated_at_human = "2 minutes ago".to_string();
        now.updated_at_ago_seconds += 120.0;
        now.number_of_comments += 3;
        now.draft = true;
        assert!(compare_pr(&now, &before).is_empty());
    }

    #[test]
    fn test_title_change_reports_old_and_new() {
        let before = pr(1, "Fix X");
        let now = pr(1, "Fix X properly");
        assert_eq!(
            compare_pr(&now, &before),
            vec!["PR \"Fix X properly\" changed title from \"Fix X\" to \"Fix X properly\""]
        );
    }

    #[test]
    fn test_body_change_hides_content() {
        let before = pr(1, "Fix X");
        let mut now = before.clone();
        now.body = "Now with tests".to_string();
        assert_eq!(compare_pr(&now, &before), vec!["PR \"Fix X\" description changed"]);
    }

    #[test]
    fn test_state_change() {
        let before = pr(1, "Fix X");
        let mut now = before.clone();
        now.state = PrState::Closed;
        assert_eq!(
            compare_pr(&now, &before),
            vec!["PR \"Fix X\" changed state from \"open\" to \"closed\""]
        );
    }

    #[test]
    fn test_reviews_reported_before_scalar_fields() {
        let before = pr(1, "Fix X");
        let mut now = before.clone();
        now.updated_at = before.updated_at + chrono::Duration::hours(1);
        now.reviews.push(review("alice", "APPROVED", 10));
        assert_eq!(
            compare_pr(&now, &before),
            vec!["alice APPROVED on \"Fix X\"", "PR \"Fix X\" updated"]
        );
    }

    #[test]
    fn test_changed_review_at_same_index() {
        let before = vec![review("alice", "COMMENTED", 1)];
        let now = vec![review("alice", "APPROVED", 2)];
        assert_eq!(compare_reviews("T", &now, &before), vec!["alice APPROVED on \"T\""]);
    }

    #[test]
    fn test_removed_reviews_ignored() {
        let before = vec![review("alice", "APPROVED", 1), review("bob", "COMMENTED", 2)];
        let now = vec![review("alice", "APPROVED", 1)];
        assert!(compare_reviews("T", &now, &before).is_empty());
    }

    #[test]
    fn test_shifted_reviews_are_attributed_by_position() {
        let before = vec![review("alice", "APPROVED", 1), review("bob", "COMMENTED", 2)];
        let now = vec![review("bob", "COMMENTED", 2)];
        assert_eq!(compare_reviews("T", &now, &before), vec!["bob COMMENTED on \"T\""]);
    }

    #[test]
    fn test_label_added_singular() {
        let mut before = pr(1, "Fix X");
        before.labels = vec![label("bug")];
        let mut now = before.clone();
        now.labels.push(label("urgent"));
        assert_eq!(compare_pr(&now, &before), vec!["PR \"Fix X\" new label: urgent"]);
    }

    #[test]
    fn test_labels_removed_plural() {
        let mut before = pr(1, "Fix X");
        before.labels = vec![label("bug"), label("wip"), label("blocked")];
        let mut now = before.clone();
        now.labels = vec![label("bug")];
        assert_eq!(
            compare_pr(&now, &before),
            vec!["PR \"Fix X\" removed labels: wip, blocked"]
        );
    }

    #[test]
    fn test_labels_added_and_removed() {
        let mut before = pr(1, "Fix X");
        before.labels = vec![label("wip")];
        let mut now = before.clone();
        now.labels = vec![label("ready"), label("urgent")];
        assert_eq!(
            compare_pr(&now, &before),
            vec!["PR \"Fix X\" new labels: ready, urgent and removed label: wip"]
        );
    }

    #[test]
    fn test_label_order_and_duplicates_irrelevant() {
        let mut before = pr(1, "Fix X");
        before.labels = vec![label("a"), label("b")];
        let mut now = before.clone();
        now.labels = vec![label("b"), label("a"), label("a")];
        assert!(compare_pr(&now, &before).is_empty());
    }

    #[test]
    fn test_alert_uses_short_title() {
        let long = "x".repeat(60);
        let before = pr(1, &long);
        let mut now = before.clone();
        now.body = "changed".to_string();
        let expected = format!("PR \"{}...\" description changed", "x".repeat(47));
        assert_eq!(compare_pr(&now, &before), vec![expected]);
    }
}
