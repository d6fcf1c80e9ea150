//! Per-branch staging areas
//!
//! Each branch owns one staging area: the snapshot of its head commit plus
//! whatever `add` and `rm` have queued for the next commit.

pub mod staging_area;
