//! Parsing helpers for docker CLI output.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;

use crate::domain::Labels;
use crate::error::Result;

/// Parse a docker timestamp.
///
/// `inspect` reports RFC 3339 while `ls` reports
/// `2024-01-02 15:04:05.123 +0000 UTC`.
pub(super) fn timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    // Drop a trailing zone abbreviation such as "UTC" or "CEST".
    let trimmed = match raw.rsplit_once(' ') {
        Some((head, tail)) if tail.chars().all(|c| c.is_ascii_alphabetic()) => head,
        _ => raw,
    };
    DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f %z")
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Split a `k=v,k2=v2` label string as printed by `ls`.
pub(super) fn label_string(raw: &str) -> Labels {
    raw.split(',')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            Some((key.trim().to_string(), value.to_string()))
        })
        .collect()
}

/// Parse one JSON document per non-empty line.
pub(super) fn json_lines<T: DeserializeOwned>(stdout: &str) -> Result<Vec<T>> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).map_err(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};
    use serde::Deserialize;

    use super::*;

    #[test]
    fn parses_inspect_and_ls_timestamps() {
        let inspect = timestamp("2024-03-05T10:11:12.123456789Z").unwrap();
        assert_eq!((inspect.year(), inspect.hour()), (2024, 10));

        let ls = timestamp("2024-03-05 12:11:12 +0200 CEST").unwrap();
        assert_eq!(ls.hour(), 10);

        let ls_fraction = timestamp("2024-03-05 10:11:12.5 +0000 UTC").unwrap();
        assert_eq!(ls_fraction.minute(), 11);

        assert!(timestamp("").is_none());
        assert!(timestamp("yesterday").is_none());
    }

    #[test]
    fn splits_label_strings() {
        let labels = label_string("hind.cluster=demo,hind.version=0.4.0,empty=");
        assert_eq!(labels["hind.cluster"], "demo");
        assert_eq!(labels["hind.version"], "0.4.0");
        assert_eq!(labels["empty"], "");
        assert!(label_string("").is_empty());
    }

    #[test]
    fn json_lines_skips_blank_lines() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(rename = "Name")]
            name: String,
        }

        let rows: Vec<Row> = json_lines("{\"Name\":\"a\"}\n\n{\"Name\":\"b\"}\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "b");

        assert!(json_lines::<Row>("not json").is_err());
    }
}
