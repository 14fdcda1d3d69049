//! Utility functions for time and byte formatting.
//!
//! The clock format here is the "M:SS" form used by the cut feature: no
//! hour component, so an hour-long input formats as "60:00" rather than
//! rolling over.

use crate::error::{CoreError, CoreResult};

/// Formats seconds as "M:SS" (e.g. 65.0 -> "1:05"). Fractional seconds are
/// truncated. Values of an hour or more widen the minutes field ("60:00").
#[must_use]
pub fn format_time(total_seconds: f64) -> String {
    let mins = (total_seconds / 60.0).floor() as i64;
    let secs = (total_seconds % 60.0).floor() as i64;
    format!("{mins}:{secs:02}")
}

/// Parses a clock string back into seconds.
///
/// A single ":" separator means "minutes:seconds", with each part truncated
/// to a whole number ("1:05.7" -> 65). Anything else is parsed as a plain
/// floating-point seconds value ("12.5" -> 12.5). Negative values and
/// seconds >= 60 are passed through without validation.
pub fn parse_time(text: &str) -> CoreResult<f64> {
    let trimmed = text.trim();
    if let Some((mins, secs)) = trimmed.split_once(':') {
        if secs.contains(':') {
            return Err(CoreError::InvalidRequest(format!(
                "unrecognized time \"{text}\" (expected M:SS or seconds)"
            )));
        }
        Ok(parse_whole(mins, text)? * 60.0 + parse_whole(secs, text)?)
    } else {
        trimmed.parse::<f64>().map_err(|_| {
            CoreError::InvalidRequest(format!(
                "unrecognized time \"{text}\" (expected M:SS or seconds)"
            ))
        })
    }
}

fn parse_whole(part: &str, original: &str) -> CoreResult<f64> {
    part.trim()
        .parse::<f64>()
        .map(f64::trunc)
        .map_err(|_| {
            CoreError::InvalidRequest(format!(
                "unrecognized time \"{original}\" (expected M:SS or seconds)"
            ))
        })
}

/// Parses the engine's progress clock (HH:MM:SS.MS) to seconds. Returns
/// None if the string is not in that form.
#[must_use]
pub fn parse_engine_time(time: &str) -> Option<f64> {
    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() == 3 {
        let hours = parts[0].parse::<f64>().ok()?;
        let minutes = parts[1].parse::<f64>().ok()?;
        let seconds = parts[2].parse::<f64>().ok()?;
        Some(hours * 3600.0 + minutes * 60.0 + seconds)
    } else {
        None
    }
}

/// Formats bytes with appropriate binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}
