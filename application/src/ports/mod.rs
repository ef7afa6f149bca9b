//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod generation;
pub mod job_queue;
pub mod object_store;
pub mod progress;
pub mod status_store;
pub mod webhook;
