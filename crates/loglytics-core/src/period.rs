//! Absolute query windows and previous-period resolution.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};

const DAY_MS: i64 = 86_400_000;

/// An absolute `[from, to]` query window. `from <= to` is enforced at parse
/// time. Realtime endpoints use relative expressions (`now-15m`) instead and
/// never go through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    /// Parse a window from raw query parameters. Accepts `YYYY-MM-DD`
    /// (midnight UTC) or RFC 3339 timestamps.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        let from = parse_bound(from)?;
        let to = parse_bound(to)?;
        if to < from {
            return Err(anyhow!("to must be on or after from"));
        }
        Ok(Self { from, to })
    }

    /// The comparable window of equal whole-day length immediately preceding
    /// this one: both bounds shift back by `ceil(span / 1 day)` days.
    ///
    /// A zero-length window shifts by zero days; the degenerate previous
    /// window it produces decodes to empty metrics downstream.
    pub fn previous(&self) -> TimeWindow {
        let span_ms = (self.to - self.from).num_milliseconds();
        let diff_days = (span_ms + DAY_MS - 1).div_euclid(DAY_MS);
        let shift = Duration::days(diff_days);
        TimeWindow {
            from: self.from - shift,
            to: self.to - shift,
        }
    }

    pub fn iso_from(&self) -> String {
        self.from.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn iso_to(&self) -> String {
        self.to.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

fn parse_bound(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| anyhow!("invalid date: {raw}"))?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| anyhow!("invalid date: {raw}"))
}
