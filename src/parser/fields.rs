//! Field decoder for one entry's raw text.
//!
//! Tokenizes on whitespace while respecting double-quote pairs, then applies
//! per-key unwrapping so the stored values are the bare literals the rest of
//! the resolver keys on.

use std::collections::HashMap;
use std::path::Path;

use crate::report::{Diagnostic, Report};

/// Decoded key/value mapping of one entry.
///
/// Bare tokens (the section name, type markers like `ext_resource`) are
/// stored with an empty value. Duplicate keys overwrite silently.
#[derive(Debug, Default)]
pub struct EntryFields {
    fields: HashMap<String, String>,
}

impl EntryFields {
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Get a field only if it is present and non-empty, the shape every
    /// "required field" check takes.
    pub fn get_nonempty(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }
}

/// Decode one entry's raw text into a field mapping.
///
/// Unwrapping rules: `uid` and quoted string fields lose their quote pair
/// (`uid` keeps its `uid://` scheme), `path` loses the `"res://...\"` wrapper
/// leaving the root-relative literal, `instance` loses the
/// `ExtResource("...")` wrapper leaving the local id. A value that does not
/// match its key's expected wrapper is dropped with a warning; the entry
/// itself survives.
pub fn decode_entry(raw: &str, file: &Path, report: &mut Report) -> EntryFields {
    let mut fields = HashMap::new();

    for token in tokenize(raw) {
        let Some((key, value)) = token.split_once('=') else {
            fields.insert(token, String::new());
            continue;
        };

        let decoded = match key {
            "uid" | "id" | "type" | "parent" | "name" => strip_wrapped(value, "\"", "\""),
            "path" => strip_wrapped(value, "\"res://", "\""),
            "instance" => strip_wrapped(value, "ExtResource(\"", "\")"),
            _ => Some(value),
        };

        match decoded {
            Some(v) => {
                fields.insert(key.to_string(), v.to_string());
            }
            None => {
                report.push(
                    Diagnostic::warning(
                        "scenedoc::field",
                        format!("malformed value for field `{}`", key),
                    )
                    .with_path(file)
                    .with_detail(value),
                );
            }
        }
    }

    EntryFields { fields }
}

/// Split on whitespace outside double-quote pairs; quoted spans are atomic.
fn tokenize(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut token = String::new();
    let mut in_quotes = false;

    for c in raw.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        }
        if c.is_whitespace() && !in_quotes {
            if !token.is_empty() {
                tokens.push(std::mem::take(&mut token));
            }
        } else {
            token.push(c);
        }
    }
    if !token.is_empty() {
        tokens.push(token);
    }

    tokens
}

fn strip_wrapped<'a>(value: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    value.strip_prefix(prefix)?.strip_suffix(suffix)
}

/// Extract the local id from an `ExtResource("...")`-shaped property value.
pub fn strip_ext_resource(value: &str) -> Option<&str> {
    strip_wrapped(value.trim(), "ExtResource(\"", "\")")
}

/// Extract the local id from a `SubResource("...")`-shaped property value.
pub fn strip_sub_resource(value: &str) -> Option<&str> {
    strip_wrapped(value.trim(), "SubResource(\"", "\")")
}
