//! Per-file directive parser
//!
//! Extracts compilation option overrides from a leading comment line of the
//! form `// key1: value1, key2: value2`. Parsing never fails: malformed or
//! unknown content is ignored so a stray comment can never block
//! compilation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::options::{CompileOptions, OutSetting};

/// Keys accepted in a directive line. Anything else is dropped.
pub const SUPPORTED_KEYS: &[&str] = &[
    "main",
    "out",
    "outExt",
    "sourceDir",
    "outputDir",
    "sourceMap",
    "sourceMapFileInline",
    "compress",
    "relativeUrls",
    "ieCompat",
    "autoprefixer",
    "javascriptEnabled",
    "math",
];

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*//\s*(.+)").expect("valid regex"));

/// A coerced directive value
#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Int(i64),
    Bool(bool),
    Null,
    /// Literal `undefined`: unsets the inherited default
    Undefined,
    Str(String),
}

impl Value {
    fn truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Bool(b) => *b,
            Value::Null | Value::Undefined => false,
            Value::Str(s) => !s.is_empty(),
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Parse the leading directive comment of `content`, merging overrides onto
/// `defaults`. Only the first line is ever considered; if it is not a `//`
/// comment the defaults are returned unchanged.
pub fn parse(content: &str, defaults: &CompileOptions) -> CompileOptions {
    let first_line = content.lines().next().unwrap_or("");
    let Some(captures) = COMMENT_RE.captures(first_line) else {
        return defaults.clone();
    };

    let mut options = defaults.clone();
    let mut main_seen = false;

    for item in captures[1].split(',') {
        let (key, raw_value) = split_option(item);
        if !SUPPORTED_KEYS.contains(&key) || raw_value.is_empty() {
            continue;
        }

        apply(&mut options, key, coerce(raw_value), &mut main_seen);
    }

    options
}

/// Split an item on the first `:` into (key, value), both trimmed.
/// Items without a `:` yield an empty value and are skipped by the caller.
fn split_option(item: &str) -> (&str, &str) {
    match item.split_once(':') {
        Some((key, value)) => (key.trim(), value.trim()),
        None => (item.trim(), ""),
    }
}

/// Coercion table, in priority order: integer, boolean, null, undefined,
/// quoted string, raw string.
fn coerce(raw: &str) -> Value {
    if raw.bytes().all(|b| b.is_ascii_digit()) && !raw.is_empty() {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Int(n);
        }
    }

    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        "undefined" => return Value::Undefined,
        _ => {}
    }

    if let Some(inner) = unquote(raw) {
        return Value::Str(inner);
    }

    Value::Str(raw.to_string())
}

/// Strip matching single or double quotes and resolve backslash escapes.
/// Any escaped character collapses to the character itself.
fn unquote(raw: &str) -> Option<String> {
    if raw.len() < 2 {
        return None;
    }

    let first = raw.chars().next()?;
    if (first != '"' && first != '\'') || !raw.ends_with(first) {
        return None;
    }

    let inner = &raw[1..raw.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => result.push(escaped),
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }

    Some(result)
}

fn apply(options: &mut CompileOptions, key: &str, value: Value, main_seen: &mut bool) {
    match key {
        // `main` accumulates: the first occurrence replaces the inherited
        // default, later occurrences append in encounter order.
        "main" => match value {
            Value::Str(path) => {
                if *main_seen {
                    options.main.push(path);
                } else {
                    options.main = vec![path];
                    *main_seen = true;
                }
            }
            // Non-string values disable redirection entirely
            _ => options.main = Vec::new(),
        },
        "out" => {
            options.out = match value {
                Value::Bool(false) | Value::Null => OutSetting::Suppressed,
                Value::Str(path) => OutSetting::Path(path),
                Value::Bool(true) | Value::Int(_) | Value::Undefined => OutSetting::Default,
            }
        }
        "outExt" => options.out_ext = value.as_str().map(str::to_string),
        "sourceDir" => options.source_dir = value.as_str().map(str::to_string),
        "outputDir" => options.output_dir = value.as_str().map(str::to_string),
        "sourceMap" => options.source_map = value.truthy(),
        "sourceMapFileInline" => options.source_map_file_inline = value.truthy(),
        "compress" => options.compress = value.truthy(),
        "relativeUrls" => options.relative_urls = value.truthy(),
        "ieCompat" => options.ie_compat = value.truthy(),
        "autoprefixer" => {
            options.autoprefixer = match value {
                Value::Str(spec) => Some(spec),
                _ => None,
            }
        }
        "javascriptEnabled" => options.javascript_enabled = value.truthy(),
        "math" => options.math = value.as_str().map(str::to_string),
        _ => unreachable!("key checked against SUPPORTED_KEYS"),
    }
}
