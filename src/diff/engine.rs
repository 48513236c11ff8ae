use tracing::debug;

use super::fields::compare_pr;
use crate::github::types::{PrInfoGroups, PrState, PullRequest};

/// Status groups in the order their alerts are emitted
const STATUS_ORDER: [PrState; 2] = [PrState::Open, PrState::Closed];

/// Compute the change alerts between the current snapshot and the prior one.
///
/// Returns nothing when there is no prior snapshot to compare against.
///
/// For each group, growth wins: if the group has more entries than before,
/// the only alert for that group names the PRs whose number is new, and no
/// field comparison happens. Otherwise PRs are paired by list position and
/// compared field by field.
pub fn diff(current: &PrInfoGroups, prior: Option<&PrInfoGroups>) -> Vec<String> {
    let Some(prior) = prior else {
        return Vec::new();
    };

    let mut alerts = Vec::new();
    for status in STATUS_ORDER {
        let prs = current.group(status);
        let prs_before = prior.group(status);

        if prs.len() > prs_before.len() {
            debug!(
                status = %status,
                before = prs_before.len(),
                after = prs.len(),
                "group grew, skipping field comparison"
            );
            alerts.push(appeared_alert(status, prs, prs_before));
            continue;
        }

        // count did not grow, so every current PR has a partner at its index
        for (pr, pr_before) in prs.iter().zip(prs_before) {
            alerts.extend(compare_pr(pr, pr_before));
        }
    }

    alerts
}

fn appeared_alert(status: PrState, prs: &[PullRequest], prs_before: &[PullRequest]) -> String {
    let titles = prs
        .iter()
        .filter(|pr| !prs_before.iter().any(|before| before.pull_number == pr.pull_number))
        .map(|pr| format!("\"{}\"", pr.title))
        .collect::<Vec<_>>()
        .join(", ");

    let verb = match status {
        PrState::Open => "Opened",
        PrState::Closed => "Closed",
    };
    format!("{}: {}", verb, titles)
}
