//! Application-level configuration.
//!
//! - [`DispatchParams`]: retry bound, stage temperatures, result URL base

pub mod dispatch_params;

pub use dispatch_params::DispatchParams;
