//! Output plumbing shared by the binary and the commands

use derive_new::new;
use minus::Pager;
use std::io::{self, Write};

/// `Write` adapter feeding the `minus` pager
///
/// Long `log`/`global-log` output is pushed into the pager while the command
/// runs, then shown at once with [`PagerWriter::page`].
#[derive(new, Clone)]
pub struct PagerWriter {
    pager: Pager,
}

impl PagerWriter {
    /// Display everything written so far. Blocks until the user quits.
    pub fn page(self) -> anyhow::Result<()> {
        minus::page_all(self.pager)?;
        Ok(())
    }
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(text).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
