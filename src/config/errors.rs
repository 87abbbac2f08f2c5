//! Error taxonomy for configuration parsing
// (c) 2024 Ross Younger

use std::{io::ErrorKind, path::PathBuf};

/// The root cause of a configuration parsing failure.
///
/// Parsing functions return `anyhow::Error`, with location context
/// (`Error on line N`, `Error in FILE`) layered on top of one of these.
/// Use [`anyhow::Error::root_cause`] or [`anyhow::Error::downcast_ref`] to get at it.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Malformed line, malformed quoting, or a bad `Match` criterion
    #[error("{0}")]
    Syntax(String),
    /// A keyword was given the wrong number of arguments
    #[error("Keyword {keyword} requires exactly {expected} argument")]
    Arity {
        /// The offending keyword, as it is conventionally spelled
        keyword: &'static str,
        /// How many arguments it takes
        expected: usize,
    },
    /// A keyword argument could not be interpreted
    #[error("Keyword {keyword} expects {expected} as argument")]
    Value {
        /// The offending keyword
        keyword: &'static str,
        /// What we wanted instead
        expected: &'static str,
    },
    /// A keyword that only makes sense inside a `Host` or `Match` block appeared outside one
    #[error("Keyword {keyword} used outside a config")]
    Context {
        /// The offending keyword
        keyword: &'static str,
    },
    /// A file could not be read
    #[error("Couldn't read {what}: {path}{} ({kind})", resolved_suffix(.resolved.as_ref()))]
    Io {
        /// What we were trying to read ("file" or "Include file")
        what: &'static str,
        /// The path as written
        path: String,
        /// The path we actually tried, if different
        resolved: Option<PathBuf>,
        /// Why it failed
        kind: ErrorKind,
    },
    /// Include directives nested too deeply (probably a loop)
    #[error("too many nested includes (limit {0})")]
    IncludeDepth(u8),
}

fn resolved_suffix(resolved: Option<&PathBuf>) -> String {
    resolved
        .map(|p| format!(" (resolved to {})", p.display()))
        .unwrap_or_default()
}

impl ConfigError {
    pub(crate) fn syntax<S: Into<String>>(msg: S) -> Self {
        Self::Syntax(msg.into())
    }
}
