//! Command-line inputs: part tokens and timestamps.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{ConfigError, ConfigResult};

/// Format of `--start`/`--end` values, e.g. `20161105 070000`.
pub const CLI_TIMESTAMP_FORMAT: &str = "%Y%m%d %H%M%S";

/// Parse a `part[,quantity]` token.
pub fn parse_part_token(token: &str) -> ConfigResult<(String, Option<u32>)> {
    let (part, quantity) = match token.split_once(',') {
        Some((part, qty)) => {
            let qty = qty.trim();
            let quantity = qty.parse::<u32>().map_err(|_| {
                ConfigError::invalid("part quantity", format!("'{}' in '{}'", qty, token))
            })?;
            if quantity == 0 {
                return Err(ConfigError::invalid(
                    "part quantity",
                    format!("must be positive in '{}'", token),
                ));
            }
            (part.trim(), Some(quantity))
        }
        None => (token.trim(), None),
    };

    if part.is_empty() {
        return Err(ConfigError::invalid(
            "part",
            format!("empty part name in '{}'", token),
        ));
    }
    Ok((part.to_string(), quantity))
}

/// Parse a `YYYYMMDD HHMMSS` timestamp, taken as UTC.
pub fn parse_cli_timestamp(s: &str) -> ConfigResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s.trim(), CLI_TIMESTAMP_FORMAT)
        .map(|n| n.and_utc())
        .map_err(|e| ConfigError::invalid("timestamp", format!("'{}': {}", s, e)))
}

/// Parse either a `YYYYMMDD HHMMSS` or an RFC 3339 timestamp.
pub fn parse_timestamp(s: &str) -> ConfigResult<DateTime<Utc>> {
    parse_cli_timestamp(s).or_else(|_| {
        allocate_core::response::parse_utc(s.trim())
            .map_err(|e| ConfigError::invalid("timestamp", e.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_part_without_quantity() {
        assert_eq!(parse_part_token("aaa").unwrap(), ("aaa".to_string(), None));
    }

    #[test]
    fn test_part_with_quantity() {
        assert_eq!(
            parse_part_token("bbb,12").unwrap(),
            ("bbb".to_string(), Some(12))
        );
    }

    #[test]
    fn test_bad_part_tokens() {
        assert!(parse_part_token("bbb,x").is_err());
        assert!(parse_part_token("bbb,0").is_err());
        assert!(parse_part_token(",5").is_err());
        assert!(parse_part_token("a,1,2").is_err());
        assert!(matches!(
            parse_part_token("").unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_cli_timestamp() {
        assert_eq!(
            parse_cli_timestamp("20161105 070000").unwrap(),
            Utc.with_ymd_and_hms(2016, 11, 5, 7, 0, 0).unwrap()
        );
        assert!(parse_cli_timestamp("2016-11-05 07:00").is_err());
    }

    #[test]
    fn test_either_timestamp_form() {
        let expected = Utc.with_ymd_and_hms(2016, 11, 5, 7, 0, 0).unwrap();
        assert_eq!(parse_timestamp("20161105 070000").unwrap(), expected);
        assert_eq!(parse_timestamp("2016-11-05T07:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2016-11-05T09:00:00+02:00").unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }
}
