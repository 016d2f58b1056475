use chrono::prelude::*;
use chrono::Duration;
use chrono_tz::Tz;

const ACCEPTED_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parses a wall-clock date-time string without any zone information,
/// e.g. "2024-06-01T09:00:00" or "2024-06-01T09:00".
pub fn parse_wall_clock(date_time: &str) -> anyhow::Result<NaiveDateTime> {
    for format in &ACCEPTED_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(date_time, format) {
            return Ok(naive);
        }
    }
    Err(anyhow::anyhow!(
        "Date-time: {} is not on an accepted format",
        date_time
    ))
}

pub fn parse_timezone(timezone: &str) -> anyhow::Result<Tz> {
    timezone
        .parse::<Tz>()
        .map_err(|_| anyhow::anyhow!("Timezone: {} is not a valid IANA zone name", timezone))
}

/// Interprets `date_time` as wall-clock time in `timezone` and returns the
/// absolute instant it corresponds to, directly comparable against server
/// "now" regardless of what zone the server itself runs in.
///
/// DST resolution is deterministic:
/// - a wall time that occurs twice ("fall back") resolves to the earliest
///   offset, so the reminder fires at the first occurrence
/// - a wall time that never occurs ("spring forward" gap) is shifted one
///   hour forward before resolving
pub fn to_utc_instant(date_time: &str, timezone: &str) -> anyhow::Result<DateTime<Utc>> {
    let naive = parse_wall_clock(date_time)?;
    let tz = parse_timezone(timezone)?;

    let local = match tz.from_local_datetime(&naive) {
        chrono::LocalResult::Single(local) => local,
        chrono::LocalResult::Ambiguous(earliest, _) => earliest,
        chrono::LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .ok_or_else(|| {
                anyhow::anyhow!("Date-time: {} does not exist in timezone: {}", date_time, timezone)
            })?,
    };

    Ok(local.with_timezone(&Utc))
}
