//! Content-addressed objects
//!
//! - **Blob**: file content (raw bytes)
//! - **Tree**: a snapshot mapping filenames to blob ids
//! - **Commit**: snapshot, message, timestamp, parents and ancestor set
//!
//! All objects share the on-disk framing `<type> <size>\0<content>`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
