//! Stage aggregation - turns a stage's records into prompt text for later stages.

use super::stage::Stage;
use super::value_objects::StageRecord;

/// Text used for stage 3 when no role was addressed
pub const NO_RESPONSES_REQUIRED: &str = "No responses required.";

/// Format a stage's records as `### ROLE` blocks joined by the stage separator.
///
/// Record order is preserved as given; callers pass records in issuance order.
pub fn format_stage(stage: Stage, records: &[StageRecord]) -> String {
    records
        .iter()
        .map(|r| format!("### {}\n{}\n", r.role, r.response))
        .collect::<Vec<_>>()
        .join(stage.separator())
}

/// Format stage 3, substituting [`NO_RESPONSES_REQUIRED`] when it produced nothing
pub fn format_responses(records: &[StageRecord]) -> String {
    if records.is_empty() {
        NO_RESPONSES_REQUIRED.to_string()
    } else {
        format_stage(Stage::TargetedResponses, records)
    }
}
