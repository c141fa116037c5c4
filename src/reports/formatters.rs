use crate::lineage::sink::format_path;
use crate::reports::generator::PathReport;
use crate::types::LineageNode;
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;

/// Trait for report formatters
pub trait ReportFormatter<N> {
    fn format(&self, report: &PathReport<N>) -> Result<String>;
}

/// Plain text formatter: one arrow-joined line per path, the same lines the
/// path log receives.
pub struct TextFormatter;

impl<N: LineageNode> ReportFormatter<N> for TextFormatter {
    fn format(&self, report: &PathReport<N>) -> Result<String> {
        let mut out = String::new();
        for path in &report.paths {
            writeln!(out, "{}", format_path(path))?;
        }
        Ok(out)
    }
}

/// JSON formatter
pub struct JsonFormatter;

impl<N: Serialize> ReportFormatter<N> for JsonFormatter {
    fn format(&self, report: &PathReport<N>) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

/// Markdown formatter
pub struct MarkdownFormatter;

impl<N: LineageNode> ReportFormatter<N> for MarkdownFormatter {
    fn format(&self, report: &PathReport<N>) -> Result<String> {
        let stats = &report.statistics;
        let mut out = String::new();

        writeln!(out, "# Lineage Report")?;
        writeln!(out)?;
        writeln!(out, "**Root**: {}", report.root)?;
        writeln!(out)?;
        writeln!(out, "## Graph")?;
        writeln!(out, "- **Nodes**: {}", stats.total_nodes)?;
        writeln!(out, "- **Edges**: {}", stats.total_edges)?;
        writeln!(out, "- **Roots**: {}", stats.root_nodes)?;
        writeln!(out, "- **Leaves**: {}", stats.leaf_nodes)?;
        writeln!(out, "- **Average Degree**: {:.2}", stats.average_degree)?;
        writeln!(out)?;

        writeln!(out, "## Paths ({})", report.leaf_count())?;
        for (i, path) in report.paths.iter().enumerate() {
            writeln!(out, "{}. `{}`", i + 1, format_path(path))?;
        }

        if !report.interventions.is_empty() {
            writeln!(out)?;
            writeln!(out, "## Interventions")?;
            for intervention in &report.interventions {
                writeln!(out, "- {}", intervention)?;
            }
        }

        if !report.unmatched.is_empty() {
            writeln!(out)?;
            writeln!(out, "## Unmatched Observations")?;
            for node in &report.unmatched {
                writeln!(out, "- {}", node)?;
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GraphStatistics, Intervention};

    fn create_test_report() -> PathReport<String> {
        PathReport {
            root: "A".to_string(),
            paths: vec![
                vec!["A".to_string(), "m3".to_string()],
                vec!["A".to_string(), "B".to_string(), "m1".to_string()],
            ],
            statistics: GraphStatistics {
                total_nodes: 4,
                total_edges: 3,
                leaf_nodes: 2,
                root_nodes: 1,
                average_degree: 1.5,
            },
            interventions: vec![Intervention {
                ancestor: "A".to_string(),
                parent: "B".to_string(),
                children: vec!["m1".to_string()],
            }],
            unmatched: Vec::new(),
        }
    }

    #[test]
    fn test_text_matches_path_log_lines() {
        let text = TextFormatter.format(&create_test_report()).unwrap();
        assert_eq!(text, "A→m3\nA→B→m1\n");
    }

    #[test]
    fn test_json_round_trips_through_value() {
        let json = JsonFormatter.format(&create_test_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["root"], "A");
        assert_eq!(value["paths"][1][1], "B");
        assert_eq!(value["interventions"][0]["ancestor"], "A");
        assert_eq!(value["statistics"]["total_edges"], 3);
    }

    #[test]
    fn test_markdown_lists_paths_and_interventions() {
        let markdown = MarkdownFormatter.format(&create_test_report()).unwrap();

        assert!(markdown.contains("## Paths (2)"));
        assert!(markdown.contains("2. `A→B→m1`"));
        assert!(markdown.contains("- rewired ancestor=A, parent=B, children=[m1]"));
        assert!(!markdown.contains("Unmatched"));
    }
}
