use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use std::collections::HashMap;
use std::io::IsTerminal;

use crate::github::types::{PrInfoGroups, PullRequest};

/// Longest PR line shown in the menu, ellipsis included
const MAX_LINE_LENGTH: usize = 80;

/// Prefix xbar shows in front of each alert line
const ALERT_PREFIX: &str = "🎵 ";

const SEPARATOR: &str = "---";

/// GitHub search for all of the user's open PRs
const ALL_PRS_SEARCH_URL: &str =
    "https://github.com/search?q=is%3Apr+is%3Aopen+author%3A%40me+sort%3Aupdated&type=pullrequests";

/// Colors xbar understands for the error line
#[derive(Debug, Clone, Copy)]
pub enum MenuColor {
    Green,
    Orange,
}

impl MenuColor {
    fn xbar_name(self) -> &'static str {
        match self {
            MenuColor::Green => "green",
            MenuColor::Orange => "orange",
        }
    }
}

/// Check if stdout is a TTY (running by hand rather than under xbar)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Build the menu bar title, e.g. "3 Open PRs, 1 Recently Closed"
pub fn menu_title(groups: &PrInfoGroups) -> String {
    let has_drafts = groups.open.iter().any(|pr| pr.draft);
    let mut title = match (groups.open.len(), has_drafts) {
        (0, _) => "No PRs".to_string(),
        (1, true) => "1 PR".to_string(),
        (1, false) => "1 Open PR".to_string(),
        (n, true) => format!("{} PRs", n),
        (n, false) => format!("{} Open PRs", n),
    };
    if !groups.closed.is_empty() {
        title.push_str(&format!(", {} Recently Closed", groups.closed.len()));
    }
    title
}

/// Render the full xbar report: alerts, title, PR sections and footer
pub fn format_report(groups: &PrInfoGroups, alerts: &[String]) -> String {
    let mut lines: Vec<String> = alerts
        .iter()
        .map(|alert| format!("{}{}", ALERT_PREFIX, alert))
        .collect();

    lines.push(menu_title(groups));
    if !groups.is_empty() {
        lines.push(SEPARATOR.to_string());
    }

    if !groups.closed.is_empty() {
        lines.push(format!("Recently Closed PRs ({})", groups.closed.len()));
        lines.extend(groups.closed.iter().map(format_pr_line));
        lines.push(SEPARATOR.to_string());
        if !groups.open.is_empty() {
            lines.push(format!("Open PRs ({})", groups.open.len()));
            lines.push(SEPARATOR.to_string());
        }
    }
    lines.extend(groups.open.iter().map(format_pr_line));

    lines.push(SEPARATOR.to_string());
    lines.push(format!("All Your Pull Requests | href={}", ALL_PRS_SEARCH_URL));

    lines.join("\n")
}

/// Render the one-line degraded status shown when the run fails softly
pub fn format_error(msg: &str, use_colors: bool) -> String {
    colorize(&format!("My PRs failed ({})", msg), MenuColor::Orange, use_colors)
}

/// Color for a terminal, or attach an xbar color parameter
pub fn colorize(msg: &str, color: MenuColor, use_colors: bool) -> String {
    if use_colors {
        match color {
            MenuColor::Green => msg.green().to_string(),
            MenuColor::Orange => msg.yellow().to_string(),
        }
    } else {
        format!("{} | color={}", msg, color.xbar_name())
    }
}

/// Format one PR as a clickable menu line
/// Format: "{age} > [(Draft) ]{title}[  {review marks}] | href={url}"
pub fn format_pr_line(pr: &PullRequest) -> String {
    let mut text = pr.updated_at_human.replacen("about ", "", 1);
    text.push_str(" > ");
    if pr.draft {
        text.push_str("(Draft) ");
    }
    text.push_str(&pr.title);
    let mut line = truncate_line(&text, MAX_LINE_LENGTH);

    let marks = review_marks(pr);
    if !marks.is_empty() {
        line.push_str("  ");
        line.push_str(&marks);
    }

    format!("{} | href={}", line, pr.url)
}

/// One mark per reviewer, based on their latest approving or blocking review
fn review_marks(pr: &PullRequest) -> String {
    let mut order: Vec<&str> = Vec::new();
    let mut latest: HashMap<&str, &str> = HashMap::new();
    for review in &pr.reviews {
        if review.state != "APPROVED" && review.state != "CHANGES_REQUESTED" {
            continue;
        }
        if latest.insert(&review.reviewer, &review.state).is_none() {
            order.push(&review.reviewer);
        }
    }

    order
        .iter()
        .filter_map(|reviewer| match latest.get(reviewer).copied() {
            Some("APPROVED") => Some("✅"),
            Some("CHANGES_REQUESTED") => Some("❌"),
            _ => None,
        })
        .collect()
}

/// Truncate to `max_width` characters with a single-character ellipsis
fn truncate_line(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_width.saturating_sub(1)).collect();
    short.push('…');
    short
}

/// Describe how long ago `then` was, relative to `now`
/// ("less than a minute ago", "about 2 hours ago", "3 days ago", ...)
pub fn format_distance(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let future = delta.num_seconds() < 0;
    let seconds = delta.num_seconds().abs();
    let minutes = (seconds + 30) / 60;

    let phrase = if seconds < 30 {
        "less than a minute".to_string()
    } else if minutes < 2 {
        "1 minute".to_string()
    } else if minutes < 45 {
        format!("{} minutes", minutes)
    } else if minutes < 90 {
        "about 1 hour".to_string()
    } else if minutes < 24 * 60 {
        format!("about {} hours", (minutes + 30) / 60)
    } else if minutes < 42 * 60 {
        "1 day".to_string()
    } else if minutes < 30 * 24 * 60 {
        format!("{} days", (minutes + 12 * 60) / (24 * 60))
    } else if minutes < 45 * 24 * 60 {
        "about 1 month".to_string()
    } else if minutes < 60 * 24 * 60 {
        "about 2 months".to_string()
    } else if minutes < 365 * 24 * 60 {
        format!("{} months", (minutes + 15 * 24 * 60) / (30 * 24 * 60))
    } else {
        let years = minutes / (365 * 24 * 60);
        let remainder = minutes % (365 * 24 * 60);
        if remainder < 91 * 24 * 60 {
            format!("about {} {}", years, plural(years, "year"))
        } else if remainder < 274 * 24 * 60 {
            format!("over {} {}", years, plural(years, "year"))
        } else {
            format!("almost {} years", years + 1)
        }
    };

    if future {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

fn plural(n: i64, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
