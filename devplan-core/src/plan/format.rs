//! Rendering parsed issues into what gets filed

use serde::{Deserialize, Serialize};

use super::IssueRecord;

/// Plan name used in the attribution footer when none is given
pub const DEFAULT_SOURCE_NAME: &str = "DEV_PLAN.md";

/// Title, body and labels ready for submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedIssue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// Build the `[id] title` heading
pub fn format_title(issue: &IssueRecord) -> String {
    format!("[{}] {}", issue.identifier, issue.title)
}

/// Build the issue body: the plan text, the estimate (if any), then a footer
/// naming the plan it came from
pub fn format_body(issue: &IssueRecord, source_name: &str) -> String {
    let mut parts: Vec<String> = issue.body_lines.clone();

    if let Some(ref estimate) = issue.estimate {
        parts.push(format!("\n**Estimated Time**: {}", estimate));
    }

    parts.push(format!(
        "\n---\n*This issue was generated from {}*",
        source_name
    ));

    parts.join("\n")
}

/// Format a parsed issue for submission
pub fn format_issue(issue: &IssueRecord, source_name: &str) -> FormattedIssue {
    FormattedIssue {
        title: format_title(issue),
        body: format_body(issue, source_name),
        labels: issue.labels.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(body: &[&str], estimate: Option<&str>, labels: &[&str]) -> IssueRecord {
        IssueRecord {
            identifier: "2.3".to_string(),
            title: "Fix bug".to_string(),
            body_lines: body.iter().map(|s| s.to_string()).collect(),
            labels: labels.iter().map(|s| s.to_string()).collect(),
            estimate: estimate.map(String::from),
        }
    }

    #[test]
    fn test_format_title() {
        assert_eq!(format_title(&record(&[], None, &[])), "[2.3] Fix bug");
    }

    #[test]
    fn test_body_with_estimate() {
        let body = format_body(&record(&["X", "Y"], Some("2h"), &[]), DEFAULT_SOURCE_NAME);
        assert_eq!(
            body,
            "X\nY\n\n**Estimated Time**: 2h\n\n---\n*This issue was generated from DEV_PLAN.md*"
        );
    }

    #[test]
    fn test_body_order_blank_estimate_footer() {
        let body = format_body(&record(&["X", "Y"], Some("2h"), &[]), DEFAULT_SOURCE_NAME);
        let lines: Vec<&str> = body.lines().collect();
        let estimate_at = lines
            .iter()
            .position(|l| l.contains("Estimated Time") && l.contains("2h"))
            .unwrap();
        let footer_at = lines
            .iter()
            .position(|l| l.contains("generated from"))
            .unwrap();

        assert_eq!(&lines[..2], &["X", "Y"]);
        assert_eq!(lines[estimate_at - 1], "");
        assert!(estimate_at < footer_at);
        assert_eq!(footer_at, lines.len() - 1);
    }

    #[test]
    fn test_body_without_estimate() {
        let body = format_body(&record(&["only line"], None, &[]), DEFAULT_SOURCE_NAME);
        assert!(!body.contains("Estimated Time"));
        assert_eq!(
            body,
            "only line\n\n---\n*This issue was generated from DEV_PLAN.md*"
        );
    }

    #[test]
    fn test_footer_names_source() {
        let body = format_body(&record(&[], None, &[]), "ROADMAP.md");
        assert!(body.ends_with("*This issue was generated from ROADMAP.md*"));
    }

    #[test]
    fn test_format_issue_passes_labels_through() {
        let issue = format_issue(
            &record(&["a"], Some("3h"), &["bug", "urgent"]),
            DEFAULT_SOURCE_NAME,
        );
        assert_eq!(issue.title, "[2.3] Fix bug");
        assert_eq!(issue.labels, vec!["bug", "urgent"]);
        assert!(issue.body.starts_with("a\n"));
    }

    #[test]
    fn test_format_does_not_mutate_record() {
        let rec = record(&["a"], Some("1h"), &[]);
        let _ = format_issue(&rec, DEFAULT_SOURCE_NAME);
        let _ = format_issue(&rec, DEFAULT_SOURCE_NAME);
        assert_eq!(rec.body_lines, vec!["a"]);
    }
}
