//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod job_service;
pub mod process_job;
pub mod run_review;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;
