use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use super::{LoadError, normalize_report};
use crate::models::Report;

// Bareword NaN in a value position, e.g. `"x": NaN` or `[1, nan]`. String
// literals are matched first so their contents are never rewritten.
static NAN_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:[^"\\]|\\.)*"|(?P<lead>[:,\[]\s*)-?(?:NaN|nan)\b"#)
        .expect("NaN token pattern is valid")
});

fn has_nan_token(text: &str) -> bool {
    NAN_TOKEN.captures_iter(text).any(|caps| caps.name("lead").is_some())
}

fn replace_nan_tokens(text: &str) -> Cow<'_, str> {
    NAN_TOKEN.replace_all(text, |caps: &Captures| match caps.name("lead") {
        Some(lead) => format!("{}null", lead.as_str()),
        None => caps[0].to_string(),
    })
}

/// Read and normalize a report from disk.
pub fn load_report(path: &Path) -> Result<Report, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io { path: path.to_path_buf(), source },
    })?;

    let raw = parse_document(&text).map_err(|source| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    if !raw.is_object() {
        return Err(LoadError::NotAnObject(path.to_path_buf()));
    }

    Ok(normalize_report(raw))
}

/// Parse JSON text, retrying once with NaN tokens replaced by `null`.
pub(crate) fn parse_document(text: &str) -> Result<Value, serde_json::Error> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(err) if has_nan_token(text) => {
            tracing::warn!("report contains NaN tokens, retrying with nulls: {}", err);
            let patched = replace_nan_tokens(text);
            serde_json::from_str(&patched)
        }
        Err(err) => Err(err),
    }
}
