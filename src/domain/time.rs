// Timestamp normalization from broker UTC strings to the dashboard timezone
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Lisbon;

const WITH_FRACTION: &str = "%Y-%m-%d %H:%M:%S%.f";
const WITHOUT_FRACTION: &str = "%Y-%m-%d %H:%M:%S";

/// Instant localized to the dashboard timezone
pub type ZonedInstant = DateTime<Tz>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unparseable timestamp: {raw:?}")]
pub struct TimeParseError {
    pub raw: String,
}

/// Convert a broker `recvTime` (e.g. `2024-03-10T14:22:05.123Z`) into `tz`.
pub fn normalize(raw: &str, tz: Tz) -> Result<ZonedInstant, TimeParseError> {
    let cleaned = raw.trim().replace('T', " ");
    let cleaned = cleaned.trim_end_matches('Z');

    let naive = NaiveDateTime::parse_from_str(cleaned, WITH_FRACTION)
        .or_else(|_| NaiveDateTime::parse_from_str(cleaned, WITHOUT_FRACTION))
        .map_err(|_| TimeParseError { raw: raw.to_string() })?;

    Ok(Utc.from_utc_datetime(&naive).with_timezone(&tz))
}
