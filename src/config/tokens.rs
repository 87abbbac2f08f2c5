//! `%` token expansion
// (c) 2024 Ross Younger

use std::collections::BTreeMap;

use tracing::warn;

use super::ConfigFilter;
use crate::os::{AbstractPlatform as _, Platform};

/// Facts about the local machine and the account running this program,
/// used by `%` tokens and `Match localuser`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalContext {
    /// Account name
    pub username: String,
    /// Numeric user id
    pub uid: u32,
    /// Home directory
    pub home_dir: String,
    /// Fully qualified local hostname
    pub hostname: String,
}

impl LocalContext {
    /// Gathers the local context from the running system.
    ///
    /// Anything that cannot be determined is left empty (with a warning);
    /// resolution carries on regardless.
    #[must_use]
    pub fn detect() -> Self {
        let username = Platform::username().unwrap_or_else(|e| {
            warn!("could not determine local username: {e}");
            String::new()
        });
        let home_dir = Platform::home_dir().map_or_else(
            || {
                warn!("could not determine home directory");
                String::new()
            },
            |p| p.to_string_lossy().into_owned(),
        );
        Self {
            username,
            uid: Platform::uid(),
            home_dir,
            hostname: Platform::hostname(),
        }
    }

    /// The local hostname up to the first dot
    #[must_use]
    pub fn short_hostname(&self) -> &str {
        self.hostname
            .split_once('.')
            .map_or(self.hostname.as_str(), |(short, _)| short)
    }
}

/// Builds the token table for a connection
pub(super) fn token_table(filter: &ConfigFilter, local: &LocalContext) -> BTreeMap<char, String> {
    let mut tokens = BTreeMap::new();
    for (k, v) in [
        ('h', filter.hostname.clone()),
        ('n', filter.hostname.clone()),
        ('d', local.home_dir.clone()),
        ('u', local.username.clone()),
        ('i', local.uid.to_string()),
        ('L', local.short_hostname().to_owned()),
        ('l', local.hostname.clone()),
    ] {
        let _ = tokens.insert(k, v);
    }
    if let Some(user) = &filter.username {
        let _ = tokens.insert('r', user.clone());
    }
    tokens
}

/// Replaces each `%x` in `input` with the value of token `x`.
///
/// Unknown tokens (and a trailing lone `%`) are left as they are.
pub(super) fn expand_tokens(input: &str, tokens: &BTreeMap<char, String>) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            output.push(ch);
            continue;
        }
        match chars.next() {
            Some(key) => match tokens.get(&key) {
                Some(value) => output.push_str(value),
                None => {
                    output.push('%');
                    output.push(key);
                }
            },
            None => output.push('%'),
        }
    }
    output
}

///////////////////////////////////////////////////////////////////////////////////////
