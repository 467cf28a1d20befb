// Timestamp Filter
// Modification-time window for excluding directory entries

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Comparison operator of a modification-time window.
///
/// The operator states which entries to KEEP relative to the threshold;
/// the filter reports the opposite set as exclusions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOperator {
    Lt,
    Le,
    Eq,
    Gt,
    Ge,
}

impl CmpOperator {
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            "=" => Some(Self::Eq),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            _ => None,
        }
    }
}

/// Excludes directory entries based on their last-modified time.
///
/// Built from an optional comparator symbol and an optional ISO-8601
/// timestamp; if either is missing the filter excludes nothing.
#[derive(Debug, Clone)]
pub struct TimeFilter {
    window: Option<(CmpOperator, f64)>,
}

impl TimeFilter {
    pub fn new(operator: Option<&str>, iso_timestamp: Option<&str>) -> Result<Self> {
        let window = match (operator, iso_timestamp) {
            (Some(symbol), Some(timestamp)) => {
                let operator = match CmpOperator::parse(symbol) {
                    Some(op) => op,
                    None => bail!("Unsupported comparison operator: '{symbol}'"),
                };
                Some((operator, parse_iso_timestamp(timestamp)?))
            }
            _ => None,
        };
        Ok(Self { window })
    }

    /// A filter that excludes nothing.
    pub fn none() -> Self {
        Self { window: None }
    }

    /// Whether the entry at `path` falls outside the configured window.
    /// Unreadable mtimes never exclude.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let Some((operator, threshold)) = self.window else {
            return false;
        };
        let Some(mtime) = mtime_seconds(path) else {
            return false;
        };
        match operator {
            CmpOperator::Lt => mtime > threshold,
            CmpOperator::Le => mtime >= threshold,
            CmpOperator::Eq => mtime == threshold,
            CmpOperator::Gt => mtime < threshold,
            CmpOperator::Ge => mtime <= threshold,
        }
    }

    /// The subset of `contents` (entry names of `directory`) to exclude
    /// from further processing.
    pub fn exclude(&self, directory: &Path, contents: &[String]) -> Vec<String> {
        if self.window.is_none() {
            return Vec::new();
        }
        contents
            .iter()
            .filter(|name| self.is_excluded(&directory.join(name.as_str())))
            .cloned()
            .collect()
    }
}

fn parse_iso_timestamp(timestamp: &str) -> Result<f64> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return Ok(parsed.timestamp_micros() as f64 / 1_000_000.0);
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S") {
        return Ok(parsed.and_utc().timestamp_micros() as f64 / 1_000_000.0);
    }
    let parsed = NaiveDate::parse_from_str(timestamp, "%Y-%m-%d")
        .with_context(|| format!("Invalid ISO-8601 timestamp: '{timestamp}'"))?;
    Ok(parsed.and_time(NaiveTime::MIN).and_utc().timestamp_micros() as f64 / 1_000_000.0)
}

fn mtime_seconds(path: &Path) -> Option<f64> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    let elapsed = modified.duration_since(UNIX_EPOCH).ok()?;
    Some(elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, names: &[&str]) -> Vec<String> {
        for name in names {
            File::create(dir.path().join(name)).unwrap();
        }
        names.iter().map(|n| n.to_string()).collect()
    }

    fn iso(offset: Duration) -> String {
        (Utc::now() + offset).to_rfc3339()
    }

    #[test]
    fn test_absent_operator_or_timestamp_excludes_nothing() {
        let dir = TempDir::new().unwrap();
        let contents = touch(&dir, &["a.shp", "b.shp"]);

        for filter in [
            TimeFilter::new(None, None).unwrap(),
            TimeFilter::new(Some("<"), None).unwrap(),
            TimeFilter::new(None, Some("2020-01-01T00:00:00Z")).unwrap(),
            TimeFilter::none(),
        ] {
            assert!(filter.exclude(dir.path(), &contents).is_empty());
        }
    }

    #[test]
    fn test_greater_than_keeps_entries_after_threshold() {
        let dir = TempDir::new().unwrap();
        let contents = touch(&dir, &["a.shp", "b.shp"]);

        // Fresh files are after a past threshold: `>` keeps them all.
        let filter = TimeFilter::new(Some(">"), Some(&iso(Duration::hours(-1)))).unwrap();
        assert!(filter.exclude(dir.path(), &contents).is_empty());

        // Against a future threshold every entry is strictly older.
        let filter = TimeFilter::new(Some(">"), Some(&iso(Duration::hours(1)))).unwrap();
        assert_eq!(filter.exclude(dir.path(), &contents), contents);
    }

    #[test]
    fn test_less_than_excludes_entries_after_threshold() {
        let dir = TempDir::new().unwrap();
        let contents = touch(&dir, &["a.shp"]);

        let filter = TimeFilter::new(Some("<"), Some(&iso(Duration::hours(-1)))).unwrap();
        assert_eq!(filter.exclude(dir.path(), &contents), contents);

        let filter = TimeFilter::new(Some("<"), Some(&iso(Duration::hours(1)))).unwrap();
        assert!(filter.exclude(dir.path(), &contents).is_empty());
    }

    #[test]
    fn test_missing_entries_are_not_excluded() {
        let dir = TempDir::new().unwrap();
        let contents = vec!["does-not-exist".to_string()];

        let filter = TimeFilter::new(Some("<"), Some(&iso(Duration::hours(-1)))).unwrap();
        assert!(filter.exclude(dir.path(), &contents).is_empty());
    }

    #[test]
    fn test_invalid_timestamp_is_an_error() {
        assert!(TimeFilter::new(Some("<"), Some("not-a-date")).is_err());
        assert!(TimeFilter::new(Some("<"), Some("2020-13-45")).is_err());
    }

    #[test]
    fn test_unknown_operator_is_an_error() {
        assert!(TimeFilter::new(Some("<>"), Some("2020-01-01T00:00:00Z")).is_err());
    }

    #[test]
    fn test_date_only_timestamps_parse() {
        assert!(TimeFilter::new(Some(">="), Some("2020-01-01")).is_ok());
        assert!(TimeFilter::new(Some(">="), Some("2020-01-01T12:30:00")).is_ok());
    }
}
