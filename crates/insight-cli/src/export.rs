//! Tabular CSV export for flat record lists.
//!
//! Headers come from the first record's fields. Every field is
//! double-quoted with embedded quotes doubled; nested structures are
//! JSON-stringified before quoting.

use std::path::Path;

use insight_core::AnalysisResult;
use serde::Serialize;
use serde_json::Value;

/// Serializes `rows` to CSV text. An empty slice yields an empty string.
///
/// # Errors
///
/// Returns a `serde_json::Error` if a record cannot be serialized.
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<String, serde_json::Error> {
    let values: Vec<Value> = rows
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()?;

    let Some(first) = values.first().and_then(Value::as_object) else {
        return Ok(String::new());
    };
    let headers: Vec<&String> = first.keys().collect();

    let mut out = headers
        .iter()
        .map(|header| header.as_str())
        .collect::<Vec<_>>()
        .join(",");
    for row in &values {
        out.push('\n');
        let line: Vec<String> = headers
            .iter()
            .map(|header| quote_field(row.get(header.as_str())))
            .collect();
        out.push_str(&line.join(","));
    }
    Ok(out)
}

fn quote_field(value: Option<&Value>) -> String {
    let cell = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Writes the tabular sections of a cached analysis into `dir`, one CSV per
/// list. Empty lists produce no file.
///
/// # Errors
///
/// Returns an error if serialization or any file write fails.
pub fn write_analysis_csv(result: &AnalysisResult, dir: &Path) -> anyhow::Result<Vec<String>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let mut emit = |name: &str, csv: String| -> anyhow::Result<()> {
        if csv.is_empty() {
            return Ok(());
        }
        std::fs::write(dir.join(name), csv)?;
        written.push(name.to_string());
        Ok(())
    };

    emit("topics.csv", to_csv(&result.topics)?)?;
    emit("subreddits.csv", to_csv(&result.subreddits)?)?;
    emit("brands.csv", to_csv(&result.brands)?)?;
    emit("pain_points.csv", to_csv(&result.pain_points)?)?;

    Ok(written)
}
