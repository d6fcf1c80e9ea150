//! Working tree status
//!
//! - `file_change`: kinds of unstaged modifications
//! - `status_info`: collection and rendering of the status report

pub mod file_change;
pub mod status_info;
