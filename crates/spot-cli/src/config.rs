//! Settings shared by every subcommand.

use anyhow::{Context, Result};
use availability_engine::day::parse_day;
use availability_engine::DayClock;
use chrono::NaiveDate;

pub struct Settings {
    pub clock: DayClock,
    pub today: NaiveDate,
    pub pretty: bool,
}

impl Settings {
    /// Resolve the global flags. `today` defaults to the current day in `tz`.
    pub fn resolve(today: Option<&str>, tz: &str, pretty: bool) -> Result<Self> {
        let clock =
            DayClock::from_name(tz).with_context(|| format!("Unknown timezone: {}", tz))?;
        let today = match today {
            Some(raw) => parse_day(raw)
                .with_context(|| format!("--today must be YYYY-MM-DD, got '{}'", raw))?,
            None => clock.today(),
        };
        log::debug!("today is {} in {}", today, clock.tz());
        Ok(Self { clock, today, pretty })
    }

    pub fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}
