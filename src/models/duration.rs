//! Conversions between the minutes shown in quiz forms and the backend's
//! duration representations.
//!
//! The backend accepts whole seconds on write and renders durations as
//! `[D ]HH:MM:SS[.ffffff]` on read. Its plain JSON encoder may also emit the
//! total seconds as a decimal string (`"1800.0"`).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AppError, AppResult};

static DURATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?P<days>\d+) (?:days?, )?)?(?P<hours>\d{1,2}):(?P<minutes>\d{2}):(?P<seconds>\d{2})(?:\.(?P<micros>\d{1,6}))?$",
    )
    .expect("DURATION_REGEX is a valid regex pattern")
});

pub fn minutes_to_seconds(minutes: f64) -> u64 {
    (minutes * 60.0).round().max(0.0) as u64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationParts {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: f64,
}

impl DurationParts {
    pub fn total_minutes(&self) -> f64 {
        (self.days * 24 * 60 + self.hours * 60 + self.minutes) as f64 + self.seconds / 60.0
    }
}

pub fn parse_parts(value: &str) -> AppResult<DurationParts> {
    let trimmed = value.trim();

    if let Some(caps) = DURATION_REGEX.captures(trimmed) {
        let field = |name: &str| -> u64 {
            caps.name(name)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0)
        };
        let micros = caps
            .name("micros")
            .map(|m| format!("0.{}", m.as_str()).parse::<f64>().unwrap_or(0.0))
            .unwrap_or(0.0);

        return Ok(DurationParts {
            days: field("days"),
            hours: field("hours"),
            minutes: field("minutes"),
            seconds: field("seconds") as f64 + micros,
        });
    }

    let total_seconds = trimmed
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)
        .ok_or_else(|| AppError::Decode(format!("Unrecognised duration '{}'", value)))?;

    let whole = total_seconds.trunc() as u64;
    Ok(DurationParts {
        days: whole / 86_400,
        hours: (whole % 86_400) / 3_600,
        minutes: (whole % 3_600) / 60,
        seconds: (whole % 60) as f64 + total_seconds.fract(),
    })
}

/// `"01:30:30"` becomes `90.5`.
pub fn parse_minutes(value: &str) -> AppResult<f64> {
    parse_parts(value).map(|parts| parts.total_minutes())
}

/// Short label such as `"1H 30M"`; zero parts are omitted.
pub fn format_label(value: &str) -> AppResult<String> {
    let parts = parse_parts(value)?;
    let hours = parts.days * 24 + parts.hours;

    let mut label = Vec::new();
    if hours > 0 {
        label.push(format!("{}H", hours));
    }
    if parts.minutes > 0 {
        label.push(format!("{}M", parts.minutes));
    }
    if label.is_empty() {
        label.push(format!("{}S", parts.seconds.round() as u64));
    }
    Ok(label.join(" "))
}
