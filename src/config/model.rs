//! The parsed configuration model
// (c) 2024 Ross Younger

use std::fmt::Display;

use serde::Serialize;
use strum::EnumString;

/// Options that may be set both at global scope and within a `Host` or `Match` block.
///
/// Every scalar here follows first-wins semantics: once set, later sources do not replace it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommonConfig {
    /// Which authentication agent to use, if specified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_agent: Option<IdentityAgent>,
    /// Private keys to try, in the order they should be tried
    pub identity_files: Vec<String>,
    /// Real hostname to connect to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Username to log in as
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Port to connect to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Stores `value` in `slot` unless it already holds a non-empty string.
/// An empty value counts as unset, so a later one may replace it.
pub(super) fn fill_text(slot: &mut Option<String>, value: Option<&String>) {
    if slot.as_deref().map_or(true, str::is_empty) {
        if let Some(v) = value {
            *slot = Some(v.clone());
        }
    }
}

impl CommonConfig {
    /// Fills in any unset scalar from `other` and appends its identity files.
    pub(super) fn absorb(&mut self, other: &CommonConfig) {
        if self.identity_agent.is_none() {
            self.identity_agent.clone_from(&other.identity_agent);
        }
        fill_text(&mut self.hostname, other.hostname.as_ref());
        fill_text(&mut self.user, other.user.as_ref());
        if self.port.is_none() {
            self.port = other.port;
        }
        self.identity_files.extend(other.identity_files.iter().cloned());
    }
}

/// The value of an `IdentityAgent` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityAgent {
    /// `IdentityAgent none`: agent use is explicitly disabled
    Disabled,
    /// Socket path taken from the named environment variable
    Environment(String),
    /// Socket path, verbatim (it may itself contain environment references)
    Socket(String),
}

impl Display for IdentityAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityAgent::Disabled => f.write_str("none"),
            IdentityAgent::Environment(var) => write!(f, "${var}"),
            IdentityAgent::Socket(path) => f.write_str(path),
        }
    }
}

impl Serialize for IdentityAgent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Where a block was declared
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Origin {
    /// File the block came from (or `<string>`)
    pub source: String,
    /// Line of the opening `Host` or `Match` keyword (1-based)
    pub line_number: usize,
}

impl Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (line {})", self.source, self.line_number)
    }
}

/// One hostname pattern from a `Host` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPattern {
    /// The glob pattern, without any `!` prefix
    pub pattern: String,
    /// Whether a match disqualifies the block
    pub negated: bool,
}

impl From<&str> for HostPattern {
    fn from(s: &str) -> Self {
        match s.strip_prefix('!') {
            Some(pattern) => Self {
                pattern: pattern.into(),
                negated: true,
            },
            None => Self {
                pattern: s.into(),
                negated: false,
            },
        }
    }
}

impl Display for HostPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        f.write_str(&self.pattern)
    }
}

/// A section opened by the `Host` keyword
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostConfig {
    /// Options set in this block
    pub common: CommonConfig,
    /// Which connection hostnames this block applies to
    pub hosts: Vec<HostPattern>,
    /// Where the block was declared
    pub origin: Origin,
}

/// The criteria understood by `Match`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MatchKind {
    /// Always true
    All,
    /// Canonicalization pass (unsupported)
    Canonical,
    /// Final pass (unsupported)
    Final,
    /// Run a command (unsupported)
    Exec,
    /// Target hostname
    Host,
    /// Hostname as originally given
    OriginalHost,
    /// Remote username
    User,
    /// Account running this program
    LocalUser,
}

/// How a [`MatchKind`] is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Criterion {
    Always,
    /// Recognised but not implemented; never satisfied
    Unsupported,
    TargetHost,
    RemoteUser,
    LocalUser,
}

impl MatchKind {
    /// Whether this criterion consumes a following argument
    #[must_use]
    pub fn takes_value(self) -> bool {
        !matches!(self, Self::All | Self::Canonical | Self::Final)
    }

    pub(super) fn criterion(self) -> Criterion {
        match self {
            Self::All => Criterion::Always,
            Self::Canonical | Self::Final | Self::Exec => Criterion::Unsupported,
            Self::Host | Self::OriginalHost => Criterion::TargetHost,
            Self::User => Criterion::RemoteUser,
            Self::LocalUser => Criterion::LocalUser,
        }
    }
}

/// One condition from a `Match` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// What to test
    pub kind: MatchKind,
    /// Whether the result is inverted (`!user foo`)
    pub negated: bool,
    /// The argument, for kinds that take one
    pub value: Option<String>,
}

impl Display for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        write!(f, "{}", self.kind)?;
        if let Some(v) = &self.value {
            write!(f, " {v}")?;
        }
        Ok(())
    }
}

/// A section opened by the `Match` keyword
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchConfig {
    /// Options set in this block
    pub common: CommonConfig,
    /// Conditions, all of which must hold
    pub matches: Vec<Match>,
    /// Where the block was declared
    pub origin: Origin,
}

/// A `Host` or `Match` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `Host ...`
    Host(HostConfig),
    /// `Match ...`
    Match(MatchConfig),
}

impl Block {
    /// Options set in this block
    #[must_use]
    pub fn common(&self) -> &CommonConfig {
        match self {
            Block::Host(h) => &h.common,
            Block::Match(m) => &m.common,
        }
    }

    pub(super) fn common_mut(&mut self) -> &mut CommonConfig {
        match self {
            Block::Host(h) => &mut h.common,
            Block::Match(m) => &mut m.common,
        }
    }

    /// Where this block was declared
    #[must_use]
    pub fn origin(&self) -> &Origin {
        match self {
            Block::Host(h) => &h.origin,
            Block::Match(m) => &m.origin,
        }
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn join<T: Display>(items: &[T]) -> String {
            items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        }
        match self {
            Block::Host(h) => write!(f, "Host {}", join(&h.hosts)),
            Block::Match(m) => write!(f, "Match {}", join(&m.matches)),
        }
    }
}

/// The result of parsing a configuration file and everything it includes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlobalConfig {
    /// Options set before the first block
    pub common: CommonConfig,
    /// Every block, in declaration order (included files spliced in place)
    pub configs: Vec<Block>,
    /// The top-level file we parsed
    pub source: String,
}

/// The query a resolution is evaluated against
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigFilter {
    /// Hostname as given by the user
    pub hostname: String,
    /// Remote username, if known
    pub username: Option<String>,
}

impl ConfigFilter {
    /// Constructor
    #[must_use]
    pub fn new(hostname: &str, username: Option<&str>) -> Self {
        Self {
            hostname: hostname.into(),
            username: username.map(Into::into),
        }
    }
}

/// Effective options for one connection, with the blocks that contributed to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatedConfig<'a> {
    /// Merged options
    pub common: CommonConfig,
    /// Blocks that matched, in resolution order
    pub matched: Vec<&'a Block>,
    /// The top-level file the configuration came from
    pub source: &'a str,
}
