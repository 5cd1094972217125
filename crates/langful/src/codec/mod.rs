//! Catalog file formats.
//!
//! Every locale lives in a single file whose extension picks the codec:
//! - `.json`: a flat object of string/integer values
//! - `.lang`: one `key = value` entry per line, `#` comments

mod json;
mod lang;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use thiserror::Error;

use crate::value::Value;

/// Entries of one locale, in file order.
pub type Entries = IndexMap<String, Value>;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("json catalog error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog is not valid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("json catalog must be an object")]
    NotAnObject,

    #[error("lang catalog syntax error at line {line}: {msg}")]
    Syntax { line: usize, msg: String },

    #[error("unsupported value type {found} for key `{key}` (expected string or integer)")]
    UnsupportedValueType { key: String, found: &'static str },

    #[error("unsupported catalog format `{0}` (expected json or lang)")]
    UnsupportedFormat(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Format {
    #[default]
    Json,
    /// `key = value` lines.
    ///
    /// Values are read verbatim after the `=` while the writer emits
    /// `key = value`, so every load/save cycle of a `.lang` file adds one
    /// leading space to each value. Rewrite only the locales you changed
    /// (`LocaleStore::save`), or convert to JSON, to avoid the drift.
    Lang,
}

impl Format {
    pub const ALL: [Format; 2] = [Format::Json, Format::Lang];

    /// File extension, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Lang => "lang",
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, CodecError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| CodecError::UnsupportedFormat(path.display().to_string()))?;
        ext.parse()
    }

    pub fn decode(self, bytes: &[u8]) -> Result<Entries, CodecError> {
        match self {
            Self::Json => json::decode(bytes),
            Self::Lang => lang::decode(std::str::from_utf8(bytes)?),
        }
    }

    pub fn encode(self, entries: &Entries) -> Result<String, CodecError> {
        match self {
            Self::Json => json::encode(entries),
            Self::Lang => Ok(lang::encode(entries)),
        }
    }
}

impl FromStr for Format {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ext = s.strip_prefix('.').unwrap_or(s);
        if ext.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else if ext.eq_ignore_ascii_case("lang") {
            Ok(Self::Lang)
        } else {
            Err(CodecError::UnsupportedFormat(s.to_string()))
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
