//! ISO-8601 duration strings as produced by the scheduling engine.
//!
//! The engine serializes elapsed times such as station utilization in the
//! `P[nD][T[nH][nM][n[.fffffffff]S]]` form. Fractional seconds are read in
//! three groups of up to three digits (milli, micro, nano); each group is
//! right-padded with zeros, so `.5S` is 500 milliseconds.

use chrono::TimeDelta;
use regex::Regex;
use std::sync::LazyLock;

use crate::{Error, Result};

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^
        (?P<sign>-)?
        P
        (?:(?P<days>-?[0-9]*)D)?
        (?:T
          (?:(?P<hours>[0-9]{1,2})H)?
          (?:(?P<minutes>[0-9]{1,2})M)?
          (?:
            (?P<seconds>[0-9]{0,2})
            (?:\.
              (?P<millis>[0-9]{1,3})
              (?P<micros>[0-9]{0,3})
              (?P<nanos>[0-9]{0,3})
            )?
          S)?
        )?$",
    )
    .unwrap()
});

/// Parse an ISO-8601 duration string into a `TimeDelta`.
pub fn parse_iso_duration(s: &str) -> Result<TimeDelta> {
    let caps = ISO_DURATION
        .captures(s.trim())
        .ok_or_else(|| Error::InvalidDuration(s.to_string()))?;

    let int = |name: &str| -> Result<i64> {
        match caps.name(name).map(|m| m.as_str()) {
            None | Some("") | Some("-") => Ok(0),
            Some(v) => v
                .parse::<i64>()
                .map_err(|_| Error::InvalidDuration(s.to_string())),
        }
    };
    // sub-second groups are padded on the right: "5" is 500
    let frac = |name: &str| -> Result<i64> {
        match caps.name(name).map(|m| m.as_str()) {
            None | Some("") => Ok(0),
            Some(v) => format!("{:0<3}", v)
                .parse::<i64>()
                .map_err(|_| Error::InvalidDuration(s.to_string())),
        }
    };

    let out_of_range = || Error::InvalidDuration(s.to_string());
    let parts = [
        TimeDelta::try_days(int("days")?),
        TimeDelta::try_hours(int("hours")?),
        TimeDelta::try_minutes(int("minutes")?),
        TimeDelta::try_seconds(int("seconds")?),
        TimeDelta::try_milliseconds(frac("millis")?),
        Some(TimeDelta::microseconds(frac("micros")?)),
        Some(TimeDelta::nanoseconds(frac("nanos")?)),
    ];
    let total = parts
        .into_iter()
        .try_fold(TimeDelta::zero(), |acc, part| acc.checked_add(&part?))
        .ok_or_else(out_of_range)?;

    if caps.name("sign").is_some() {
        Ok(-total)
    } else {
        Ok(total)
    }
}

/// Format a `TimeDelta` as an ISO-8601 duration, omitting zero components.
pub fn format_iso_duration(d: TimeDelta) -> String {
    let mut out = String::new();
    let d = if d < TimeDelta::zero() {
        out.push('-');
        -d
    } else {
        d
    };
    out.push('P');

    let days = d.num_days();
    let hours = d.num_hours() % 24;
    let minutes = d.num_minutes() % 60;
    let seconds = d.num_seconds() % 60;
    let nanos = d.subsec_nanos();

    if days > 0 {
        out.push_str(&format!("{}D", days));
    }
    if hours == 0 && minutes == 0 && seconds == 0 && nanos == 0 {
        if days == 0 {
            out.push_str("T0S");
        }
        return out;
    }
    out.push('T');
    if hours > 0 {
        out.push_str(&format!("{}H", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}M", minutes));
    }
    if seconds > 0 || nanos > 0 {
        if nanos > 0 {
            let frac = format!("{:09}", nanos);
            out.push_str(&format!("{}.{}S", seconds, frac.trim_end_matches('0')));
        } else {
            out.push_str(&format!("{}S", seconds));
        }
    }
    out
}

/// Serde adapter for `TimeDelta` fields stored as ISO-8601 strings.
pub mod serde_iso {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &TimeDelta, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_iso_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TimeDelta, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_iso_duration(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_and_minutes() {
        assert_eq!(
            parse_iso_duration("PT1H30M").unwrap(),
            TimeDelta::minutes(90)
        );
    }

    #[test]
    fn test_days() {
        assert_eq!(
            parse_iso_duration("P1DT2H").unwrap(),
            TimeDelta::hours(26)
        );
        assert_eq!(parse_iso_duration("P2D").unwrap(), TimeDelta::days(2));
    }

    #[test]
    fn test_fraction_is_right_padded() {
        assert_eq!(
            parse_iso_duration("PT0.5S").unwrap(),
            TimeDelta::milliseconds(500)
        );
        assert_eq!(
            parse_iso_duration("PT2M3.25S").unwrap(),
            TimeDelta::seconds(123) + TimeDelta::milliseconds(250)
        );
        assert_eq!(
            parse_iso_duration("PT.0123S").unwrap(),
            TimeDelta::milliseconds(12) + TimeDelta::microseconds(300)
        );
        assert_eq!(
            parse_iso_duration("PT1.000000001S").unwrap(),
            TimeDelta::seconds(1) + TimeDelta::nanoseconds(1)
        );
    }

    #[test]
    fn test_empty_components_are_zero() {
        assert_eq!(parse_iso_duration("PT").unwrap(), TimeDelta::zero());
        assert_eq!(parse_iso_duration("PT0S").unwrap(), TimeDelta::zero());
    }

    #[test]
    fn test_negative() {
        assert_eq!(parse_iso_duration("P-1DT").unwrap(), TimeDelta::days(-1));
        assert_eq!(
            parse_iso_duration("-PT15M").unwrap(),
            TimeDelta::minutes(-15)
        );
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            parse_iso_duration("01:30:00"),
            Err(Error::InvalidDuration(_))
        ));
        assert!(parse_iso_duration("PT123H").is_err());
        assert!(parse_iso_duration("").is_err());
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            parse_iso_duration("P200000000000000D"),
            Err(Error::InvalidDuration(_))
        ));
        assert!(matches!(
            parse_iso_duration("P99999999999999999999D"),
            Err(Error::InvalidDuration(_))
        ));
        assert!(parse_iso_duration("P106751991167DT99H").is_err());
    }

    #[test]
    fn test_format() {
        assert_eq!(format_iso_duration(TimeDelta::zero()), "PT0S");
        assert_eq!(format_iso_duration(TimeDelta::minutes(90)), "PT1H30M");
        assert_eq!(format_iso_duration(TimeDelta::hours(48)), "P2D");
        assert_eq!(
            format_iso_duration(TimeDelta::seconds(3) + TimeDelta::milliseconds(250)),
            "PT3.25S"
        );
        assert_eq!(format_iso_duration(TimeDelta::minutes(-5)), "-PT5M");
    }

    #[test]
    fn test_format_parses_back() {
        let d = TimeDelta::days(1) + TimeDelta::hours(3) + TimeDelta::milliseconds(7);
        assert_eq!(parse_iso_duration(&format_iso_duration(d)).unwrap(), d);
    }
}
