//! Host and Match evaluation
// (c) 2024 Ross Younger

use tracing::debug;
use wildmatch::WildMatch;

use super::{model::Criterion, ConfigFilter, HostPattern, LocalContext, Match};

/// Case-insensitive glob match against the whole of `input`.
///
/// `*` matches any sequence and `?` any single character; everything else is literal.
pub(super) fn fits_pattern(input: &str, pattern: &str) -> bool {
    WildMatch::new(&pattern.to_lowercase()).matches(&input.to_lowercase())
}

/// Evaluates a `Host` pattern list.
///
/// A negated pattern that matches disqualifies the list wherever it appears;
/// otherwise the list fits if any positive pattern matches.
pub(super) fn fits_patterns(input: &str, patterns: &[HostPattern]) -> bool {
    let mut fits = false;
    for p in patterns {
        if fits_pattern(input, &p.pattern) {
            if p.negated {
                return false;
            }
            fits = true;
        }
    }
    fits
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Evaluates a `Match` condition list. Every condition must hold.
pub(super) fn fits_matches(filter: &ConfigFilter, matches: &[Match], local: &LocalContext) -> bool {
    for m in matches {
        let value = m.value.as_deref().unwrap_or_default();
        let result = match m.kind.criterion() {
            Criterion::Always => true,
            Criterion::Unsupported => {
                debug!("Match {} is not supported, treating it as false", m.kind);
                false
            }
            Criterion::TargetHost => same_name(&filter.hostname, value),
            Criterion::LocalUser => same_name(&local.username, value),
            Criterion::RemoteUser => filter
                .username
                .as_deref()
                .is_some_and(|u| same_name(u, value)),
        };
        if result == m.negated {
            return false;
        }
    }
    true
}

///////////////////////////////////////////////////////////////////////////////////////
