//! Core domain concepts shared across all subdomains.
//!
//! - [`role::Role`]: a council seat (reviewer or synthesizer)
//! - [`model_id::ModelId`]: namespaced generation model identifier
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model_id;
pub mod role;
pub mod string;
