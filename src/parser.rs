use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use serde_json::Value;

/// How a rate is extracted from a downloaded body.
#[derive(Debug, Clone, Copy)]
pub enum RateParser {
    /// JSON document, rate found by walking object keys.
    JsonPath(&'static [&'static str]),
    /// HTML page, tried against each pattern in order. Every pattern captures
    /// the integer part in group 1 and the fractional part in group 2.
    HtmlPatterns(&'static [Regex]),
}

impl RateParser {
    pub fn parse(&self, body: &str) -> Result<f64> {
        match self {
            Self::JsonPath(path) => parse_json_path(body, path),
            Self::HtmlPatterns(patterns) => parse_html_patterns(body, patterns),
        }
    }
}

fn parse_json_path(body: &str, path: &[&str]) -> Result<f64> {
    let root: Value = serde_json::from_str(body).context("Malformed JSON body")?;
    let value = walk_json_path(&root, path)?;
    let rate = value_to_f64(value)
        .ok_or_else(|| anyhow!("Field `{}` is not a number: {value}", path.join(".")))?;

    // A zero rate is treated the same as a missing one.
    if rate == 0.0 {
        bail!("Field `{}` is zero", path.join("."));
    }

    Ok(rate)
}

pub fn walk_json_path<'a>(root: &'a Value, path: &[&str]) -> Result<&'a Value> {
    let mut cursor = root;
    for key in path {
        cursor = cursor
            .get(key)
            .filter(|value| !value.is_null())
            .ok_or_else(|| anyhow!("Missing key `{key}` while navigating JSON path"))?;
    }
    Ok(cursor)
}

fn value_to_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
}

fn parse_html_patterns(body: &str, patterns: &[Regex]) -> Result<f64> {
    for pattern in patterns {
        let Some(caps) = pattern.captures(body) else {
            continue;
        };
        let (Some(integer), Some(fraction)) = (caps.get(1), caps.get(2)) else {
            continue;
        };

        let joined = format!("{}.{}", integer.as_str(), fraction.as_str());
        return joined
            .parse::<f64>()
            .with_context(|| format!("Can't parse `{joined}` as a rate"));
    }

    bail!("None of {} rate patterns matched the page", patterns.len())
}
