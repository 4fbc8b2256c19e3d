use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error};
use serde_json::Value;

use crate::record::PriorRecord;

/// Reads the history of a previous `rates.json`.
///
/// Entries are returned as they were stored, without checking their shape.
/// A missing file, unreadable file, malformed JSON or absent `history` field all
/// yield an empty history. Everything except a missing file is logged.
pub fn load_history(path: &Path) -> Vec<Value> {
    match read_prior(path) {
        Ok(Some(prior)) => prior.history.unwrap_or_default(),
        Ok(None) => {
            debug!("No previous history at {}", path.display());
            Vec::new()
        }
        Err(err) => {
            error!("Error reading history: {err:#}");
            Vec::new()
        }
    }
}

fn read_prior(path: &Path) -> Result<Option<PriorRecord>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let prior: PriorRecord = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(Some(prior))
}

/// Keeps the newest `limit - 1` entries of `history` and appends `entry`.
pub fn push_capped<T>(mut history: Vec<T>, entry: T, limit: usize) -> Vec<T> {
    let keep = limit.saturating_sub(1);
    if history.len() > keep {
        history.drain(..history.len() - keep);
    }
    history.push(entry);
    history
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn entry(day: u32) -> Value {
        json!({
            "date": format!("2026-01-{day:02}"),
            "bcv": day,
            "timestamp": format!("2026-01-{day:02}T12:00:00.000Z"),
        })
    }

    fn history(len: u32) -> Vec<Value> {
        (1..=len).map(entry).collect()
    }

    #[test]
    fn cap_keeps_min_of_prior_and_29_plus_one() {
        for prior_len in [0, 1, 28, 29, 30, 31, 75] {
            let merged = push_capped(history(prior_len), entry(99), 30);
            assert_eq!(merged.len(), prior_len.min(29) as usize + 1, "prior length {prior_len}");
            assert_eq!(merged.last(), Some(&entry(99)));
        }
    }

    #[test]
    fn cap_drops_oldest_entries() {
        let merged = push_capped(history(31), entry(99), 30);
        assert_eq!(merged.first(), Some(&entry(3)));
        assert_eq!(merged[28], entry(31));
    }

    #[test]
    fn missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_history(&dir.path().join("rates.json")).is_empty());
    }

    #[test]
    fn broken_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.json");

        fs::write(&path, "{ not json").unwrap();
        assert!(load_history(&path).is_empty());

        fs::write(&path, r#"{"timestamp":"2026-01-01T00:00:00.000Z"}"#).unwrap();
        assert!(load_history(&path).is_empty());

        fs::write(&path, r#"{"history":null}"#).unwrap();
        assert!(load_history(&path).is_empty());

        fs::write(&path, r#"{"history":"not a list"}"#).unwrap();
        assert!(load_history(&path).is_empty());
    }

    #[test]
    fn keeps_entries_of_any_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.json");
        fs::write(
            &path,
            r#"{
  "rates": {"bcv": 36.5, "source": "BCV Official"},
  "history": [
    {"date": "2026-01-01", "bcv": 36.5, "timestamp": "2026-01-01T09:00:00.000Z"},
    {"date": "2026-01-02", "bcv": "36.6", "timestamp": "2026-01-02T09:00:00", "note": "manual"},
    {"date": "2026-01-03", "bcv": 36.7},
    {"date": "2026-01-04", "bcv": null, "timestamp": "2026-01-04T09:00:00.000Z"}
  ]
}"#,
        )
        .unwrap();

        let history = load_history(&path);
        assert_eq!(history.len(), 4);
        assert_eq!(history[1]["bcv"], "36.6");
        assert_eq!(history[1]["note"], "manual");
        assert_eq!(history[2].get("timestamp"), None);
        assert_eq!(history[3]["bcv"], Value::Null);

        let merged = push_capped(history, entry(5), 30);
        assert_eq!(merged.len(), 5);
    }
}
