//! Review subdomain
//!
//! Everything a council review is made of: its configuration, the four
//! stages, the per-role records they produce, and how a stage is folded
//! back into text for the next one.

pub mod aggregate;
pub mod config;
pub mod stage;
pub mod value_objects;

pub use aggregate::{NO_RESPONSES_REQUIRED, format_responses, format_stage};
pub use config::ReviewConfig;
pub use stage::{Stage, StageProgress, StageTemperatures};
pub use value_objects::{ReviewResult, StageRecord};
