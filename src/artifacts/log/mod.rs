//! Commit log entries
//!
//! Shared by `log` and `global-log`:
//!
//! ```text
//! ===
//! commit <id>
//! Merge: <first parent short id> <second parent short id>
//! Date: <timestamp>
//! <message>
//!
//! ```
//!
//! The `Merge:` line only appears for two-parent commits.

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::fmt;

#[derive(Debug, new)]
pub struct LogEntry<'c> {
    oid: &'c ObjectId,
    commit: &'c Commit,
}

impl fmt::Display for LogEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===")?;
        writeln!(f, "commit {}", self.oid)?;
        if let (true, Some(first), Some(second)) = (
            self.commit.is_merge(),
            self.commit.parent(),
            self.commit.second_parent(),
        ) {
            writeln!(
                f,
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }
        writeln!(f, "Date: {}", self.commit.readable_timestamp())?;
        writeln!(f, "{}", self.commit.message())
    }
}
