use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

#[derive(Debug, Error)]
pub enum LangfulError {
    #[error("locale `{0}` is not loaded")]
    UnknownLocale(String),

    #[error("no locale is available (tried {tried:?})")]
    NoLocale { tried: Vec<String> },

    #[error("key `{key}` not found in locale `{locale}`")]
    MissingKey { locale: String, key: String },

    #[error("at least one substitution argument is required")]
    MissingArgument,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(String),
}

impl LangfulError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// A missing locale, an unresolvable fallback chain, or a missing key.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownLocale(_) | Self::NoLocale { .. } | Self::MissingKey { .. }
        )
    }

    /// Malformed file content (invalid JSON or a bad `.lang` line).
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::Codec(
                CodecError::Json(_)
                    | CodecError::Utf8(_)
                    | CodecError::Syntax { .. }
                    | CodecError::NotAnObject
            )
        )
    }

    /// The `io::ErrorKind` of an I/O failure, if this is one.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}
