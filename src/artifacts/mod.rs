//! Data structures and algorithms
//!
//! - `branch`: branch records and name validation
//! - `checkout`: working directory migrations and untracked-file checks
//! - `core`: output helpers (pager adapter)
//! - `history`: the commit registry and its file format
//! - `log`: commit log entries
//! - `merge`: merge base search and three-way reconciliation
//! - `objects`: blob, tree and commit objects
//! - `remote`: remote links and object transfer
//! - `stage`: per-branch staging areas
//! - `status`: working tree status

pub mod branch;
pub mod checkout;
pub mod core;
pub mod history;
pub mod log;
pub mod merge;
pub mod objects;
pub mod remote;
pub mod stage;
pub mod status;
