/// ISO-8601 duration parsing for YouTube `contentDetails.duration` values.
///
/// YouTube reports durations such as `PT4M13S`, `PT1H2M`, `P1DT3H` and `P0D` (live streams).
/// Only week/day/time components are supported; year and month designators never appear.
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CommonError;

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
        .expect("valid regex")
});

const SECONDS_PER_UNIT: [u64; 5] = [7 * 86_400, 86_400, 3_600, 60, 1];

/// Parse an ISO-8601 duration into whole seconds.
pub fn parse_iso8601_duration(value: &str) -> Result<u64, CommonError> {
    let invalid = || CommonError::InvalidDuration(value.to_string());

    // "P" and "PT" match the pattern but carry no component.
    if value.ends_with('P') || value.ends_with('T') {
        return Err(invalid());
    }
    let caps = ISO_DURATION.captures(value).ok_or_else(invalid)?;

    let mut total: u64 = 0;
    for (group, unit) in SECONDS_PER_UNIT.iter().enumerate() {
        if let Some(m) = caps.get(group + 1) {
            let amount: u64 = m.as_str().parse().map_err(|_| invalid())?;
            total = amount
                .checked_mul(*unit)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(invalid)?;
        }
    }
    Ok(total)
}

/// Like [`parse_iso8601_duration`], but treats a missing or malformed value as zero.
pub fn duration_seconds_or_zero(value: Option<&str>) -> u64 {
    value
        .and_then(|v| {
            parse_iso8601_duration(v)
                .inspect_err(|e| tracing::debug!(error = %e, "unparseable video duration"))
                .ok()
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_time_components() {
        assert_eq!(parse_iso8601_duration("PT1H2M3S").unwrap(), 3723);
        assert_eq!(parse_iso8601_duration("PT4M13S").unwrap(), 253);
        assert_eq!(parse_iso8601_duration("PT45S").unwrap(), 45);
        assert_eq!(parse_iso8601_duration("PT2H").unwrap(), 7200);
    }

    #[test]
    fn parses_day_and_week_components() {
        assert_eq!(parse_iso8601_duration("P1DT1S").unwrap(), 86_401);
        assert_eq!(parse_iso8601_duration("P0D").unwrap(), 0);
        assert_eq!(parse_iso8601_duration("P1W").unwrap(), 604_800);
    }

    #[test]
    fn rejects_malformed_values() {
        for bad in ["", "P", "PT", "1H", "PT1.5S", "PT1S2M", "P1Y", "PTXS"] {
            assert!(
                matches!(parse_iso8601_duration(bad), Err(CommonError::InvalidDuration(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn missing_or_bad_duration_is_zero() {
        assert_eq!(duration_seconds_or_zero(None), 0);
        assert_eq!(duration_seconds_or_zero(Some("garbage")), 0);
        assert_eq!(duration_seconds_or_zero(Some("PT10M")), 600);
    }
}
