//! Plumbing commands
//!
//! - `hash_object`: compute a file's blob id, optionally storing the blob
//! - `cat_file`: print a stored object

pub mod cat_file;
pub mod hash_object;
