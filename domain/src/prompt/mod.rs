//! Prompt domain
//!
//! Templates for generating prompts at each stage of a council review.

mod template;

pub use template::{PromptContext, PromptTemplate};
