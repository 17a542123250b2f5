//! Output formatting for measurement reports.

pub mod json;
pub mod terminal;
