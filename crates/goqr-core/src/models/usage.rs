use std::fmt;

use chrono::{Local, TimeZone};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::utils::format_clock_time;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Rate-limit quota reported by GitHub on every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageInfo {
    pub limit: u64,
    pub remaining: u64,
    pub reset_epoch_seconds: i64,
}

impl UsageInfo {
    /// Read the three rate-limit headers. Returns `None` unless all three are
    /// present and integral.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        Some(Self {
            limit: header_int(headers, LIMIT_HEADER)?,
            remaining: header_int(headers, REMAINING_HEADER)?,
            reset_epoch_seconds: header_int(headers, RESET_HEADER)?,
        })
    }

    /// Human-readable summary with the reset time in local wall-clock time.
    pub fn summary(&self) -> String {
        self.summary_in(&Local)
    }

    /// Summary with the reset time rendered in an explicit time zone.
    pub fn summary_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        format!(
            "Remaining requests: {} of {} (Resets at {})",
            self.remaining,
            self.limit,
            format_clock_time(self.reset_epoch_seconds, tz)
        )
    }
}

impl fmt::Display for UsageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

fn header_int<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
