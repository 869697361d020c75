use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// Reads a count from free text. Blank, non-numeric, negative and non-finite input is 0;
/// fractions are truncated.
pub fn count_from_text(raw: &str) -> u32 {
    raw.trim()
        .parse::<f64>()
        .map(count_from_f64)
        .unwrap_or(0)
}

pub fn count_from_f64(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    if value >= f64::from(u32::MAX) {
        return u32::MAX;
    }
    value.trunc() as u32
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Numeric>::deserialize(deserializer).map(numeric_to_f64)
}

pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_f64(deserializer).map(count_from_f64)
}

fn numeric_to_f64(value: Option<Numeric>) -> f64 {
    match value {
        Some(Numeric::Number(value)) if value.is_finite() => value,
        Some(Numeric::Text(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Map of counts keyed by name, e.g. labels per customer. Each value is read like
/// [`lenient_u32`].
pub(crate) fn lenient_u32_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Option<Numeric>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, count_from_f64(numeric_to_f64(value))))
        .collect())
}
