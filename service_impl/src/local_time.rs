use time::PrimitiveDateTime;
use time_tz::{timezones, OffsetDateTimeExt};
use tracing::warn;

/// Converts a UTC instant into the wall clock time of the given IANA zone.
///
/// Unknown zones fall back to `fallback_timezone`, and to UTC if that one is
/// unknown as well.
pub fn local_now(
    utc_now: PrimitiveDateTime,
    timezone: &str,
    fallback_timezone: &str,
) -> PrimitiveDateTime {
    let tz = timezones::get_by_name(timezone).or_else(|| {
        warn!("Unknown timezone {}, using {}", timezone, fallback_timezone);
        timezones::get_by_name(fallback_timezone)
    });
    match tz {
        Some(tz) => {
            let local = utc_now.assume_utc().to_timezone(tz);
            PrimitiveDateTime::new(local.date(), local.time())
        }
        None => utc_now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_local_now_applies_offset() {
        let utc = datetime!(2024-01-15 09:00);
        assert_eq!(
            local_now(utc, "Europe/Berlin", "UTC"),
            datetime!(2024-01-15 10:00)
        );
        assert_eq!(
            local_now(datetime!(2024-07-15 09:00), "Europe/Berlin", "UTC"),
            datetime!(2024-07-15 11:00)
        );
    }

    #[test]
    fn test_unknown_timezone_uses_fallback() {
        let utc = datetime!(2024-01-15 09:00);
        assert_eq!(
            local_now(utc, "Mars/Olympus", "Europe/Berlin"),
            datetime!(2024-01-15 10:00)
        );
        assert_eq!(local_now(utc, "Mars/Olympus", "Moon/Base"), utc);
    }
}
