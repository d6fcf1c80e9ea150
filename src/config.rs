//! Runtime configuration read from the environment
//!
//! - `BITLET_DATE`: fixed timestamp for new commits (`%Y-%m-%d %H:%M:%S %z` or RFC 2822)
//! - `BITLET_MERGE_BASE`: split point strategy, `log` (default) or `bca`
//! - `BITLET_LOG`: tracing filter directives, consumed by the binary
//! - `NO_PAGER`: never page `log`/`global-log` output

use crate::artifacts::merge::MergeBaseStrategy;
use anyhow::Context;
use chrono::{DateTime, FixedOffset};

pub const DATE_ENV: &str = "BITLET_DATE";
pub const MERGE_BASE_ENV: &str = "BITLET_MERGE_BASE";
pub const LOG_ENV: &str = "BITLET_LOG";
pub const NO_PAGER_ENV: &str = "NO_PAGER";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    fixed_date: Option<DateTime<FixedOffset>>,
    merge_base: MergeBaseStrategy,
    no_pager: bool,
}

impl Config {
    pub fn new(
        fixed_date: Option<DateTime<FixedOffset>>,
        merge_base: MergeBaseStrategy,
        no_pager: bool,
    ) -> Self {
        Config {
            fixed_date,
            merge_base,
            no_pager,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let fixed_date = match std::env::var(DATE_ENV) {
            Ok(raw) => Some(Self::parse_date(&raw)?),
            Err(_) => None,
        };

        let merge_base = match std::env::var(MERGE_BASE_ENV) {
            Ok(raw) => raw
                .parse::<MergeBaseStrategy>()
                .with_context(|| format!("Invalid {MERGE_BASE_ENV} value"))?,
            Err(_) => MergeBaseStrategy::default(),
        };

        let no_pager = std::env::var_os(NO_PAGER_ENV).is_some();

        Ok(Config::new(fixed_date, merge_base, no_pager))
    }

    fn parse_date(raw: &str) -> anyhow::Result<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc2822(raw)
            .or_else(|_| DateTime::parse_from_str(raw, DATE_FORMAT))
            .with_context(|| format!("Invalid {DATE_ENV} value: {raw}"))
    }

    /// Timestamp to stamp on a commit created now.
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.fixed_date
            .unwrap_or_else(|| chrono::Local::now().fixed_offset())
    }

    pub fn merge_base(&self) -> MergeBaseStrategy {
        self.merge_base
    }

    pub fn no_pager(&self) -> bool {
        self.no_pager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_the_plain_date_format() {
        let date = Config::parse_date("2023-01-01 12:00:00 +0200").unwrap();

        assert_eq!(date.timestamp(), 1672567200);
        assert_eq!(date.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn parses_rfc2822_dates() {
        let date = Config::parse_date("Sun, 01 Jan 2023 12:00:00 +0000").unwrap();

        assert_eq!(date.timestamp(), 1672574400);
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(Config::parse_date("yesterday").is_err());
    }

    #[test]
    fn fixed_date_wins_over_the_clock() {
        let date = Config::parse_date("2023-01-01 12:00:00 +0000").unwrap();
        let config = Config::new(Some(date), MergeBaseStrategy::default(), true);

        assert_eq!(config.timestamp(), date);
    }
}
