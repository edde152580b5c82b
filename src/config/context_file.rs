// Loading expansion contexts from YAML or JSON files

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::value::Value;

/// On-disk formats a context file can use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextFormat {
    Json,
    Yaml,
}

impl ContextFormat {
    /// Pick a format from the file extension; YAML also reads plain JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ContextFormat::Json,
            _ => ContextFormat::Yaml,
        }
    }
}

/// Read a context file. The top level must be a mapping of variable names.
pub fn load_context(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read context file {}", path.display()))?;
    parse_context(&text, ContextFormat::from_path(path))
        .with_context(|| format!("Invalid context file {}", path.display()))
}

pub fn parse_context(text: &str, format: ContextFormat) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Map(Vec::new()));
    }

    // Both formats go through serde_json::Value so mapping order is kept
    let raw: serde_json::Value = match format {
        ContextFormat::Json => serde_json::from_str(text)?,
        ContextFormat::Yaml => serde_yaml::from_str(text)?,
    };

    match raw {
        serde_json::Value::Object(_) => Ok(Value::from(raw)),
        serde_json::Value::Null => Ok(Value::Map(Vec::new())),
        other => bail!("Context must be a mapping of variable names, found {}", other),
    }
}

/// Parse a `NAME=VALUE` command-line assignment
pub fn parse_assignment(assignment: &str) -> Result<(String, String)> {
    match assignment.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => bail!("Expected NAME=VALUE, got '{}'", assignment),
    }
}

/// Overlay string assignments on a map context, replacing existing keys
pub fn apply_overrides(context: Value, overrides: Vec<(String, String)>) -> Value {
    let mut pairs = match context {
        Value::Map(pairs) => pairs,
        _ => Vec::new(),
    };

    for (name, value) in overrides {
        match pairs.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = Value::from(value),
            None => pairs.push((name, Value::from(value))),
        }
    }

    Value::Map(pairs)
}
