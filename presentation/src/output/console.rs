//! Console output formatter for council results

use colored::Colorize;
use council_domain::{NO_RESPONSES_REQUIRED, ReviewResult, Role, Stage, StageRecord};

/// Formats council results for console display and for the saved synthesis file
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete result, all four stages
    pub fn format(title: &str, result: &ReviewResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("CxO Council Results"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Document:".cyan().bold(), title));
        output.push_str(&format!(
            "{} {}\n",
            "Reviewers:".cyan().bold(),
            result
                .stage1
                .iter()
                .map(|r| r.role.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));

        output.push_str(&Self::stage_section(Stage::IndependentReview, &result.stage1));
        output.push_str(&Self::stage_section(Stage::CrossDomainQuestions, &result.stage2));
        if result.stage3.is_empty() {
            output.push_str(&Self::section_header(&Stage::TargetedResponses.to_string()));
            output.push_str(&format!("\n{}\n", NO_RESPONSES_REQUIRED.dimmed()));
        } else {
            output.push_str(&Self::stage_section(Stage::TargetedResponses, &result.stage3));
        }

        output.push_str(&Self::section_header(&Stage::Synthesis.to_string()));
        output.push_str(&format!("\n{}\n", result.synthesis));

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(result: &ReviewResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format synthesis only (concise output)
    pub fn format_synthesis_only(title: &str, result: &ReviewResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== CxO Council Decision ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n", "Document:".bold(), title));

        let responders: Vec<&str> = result.responding_roles().map(Role::as_str).collect();
        if !responders.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Answered directed questions:".dimmed(),
                responders.join(", ")
            ));
        }
        output.push('\n');

        output.push_str(&result.synthesis);
        output.push('\n');

        output
    }

    /// Contents of the `<stem>-synthesis.md` file (no colour codes)
    pub fn synthesis_markdown(document_name: &str, result: &ReviewResult) -> String {
        format!(
            "# Council Synthesis - {}\n\n{}",
            document_name, result.synthesis
        )
    }

    fn stage_section(stage: Stage, records: &[StageRecord]) -> String {
        let mut output = Self::section_header(&stage.to_string());
        for record in records {
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ──", record.role).yellow().bold(),
                record.response
            ));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
