//! Terminal progress reporters

pub mod reporter;
