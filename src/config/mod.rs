// (c) 2024 Ross Younger
//! # OpenSSH client configuration
//!
//! This module reads OpenSSH client configuration files (`~/.ssh/config`,
//! `/etc/ssh/ssh_config`) and works out which options apply to a given connection.
//!
//! ## File format
//!
//! Each line holds a keyword followed by its arguments, separated by whitespace
//! or a single `=`. Keywords are case-insensitive. Arguments containing whitespace
//! may be double-quoted. Blank lines and lines beginning with `#` are ignored.
//!
//! Options before the first `Host` or `Match` line apply to every connection.
//! Thereafter, options belong to the most recent `Host` or `Match` block.
//!
//! ```text
//! IdentityFile ~/.ssh/id_default
//!
//! Host build-* !build-legacy
//! User ci
//! Port 2222
//!
//! Match host github.com user git
//! IdentityFile ~/.ssh/github
//!
//! Include conf.d/extra
//!
//! Host *
//! IdentityAgent $SSH_AUTH_SOCK
//! ```
//!
//! ## Supported keywords
//!
//! `Host`, `Match`, `Hostname`, `IdentityAgent`, `IdentityFile`, `Include`, `Port`, `User`.
//! All other keywords are silently ignored.
//!
//! `Match` understands `all`, `host`, `originalhost`, `user` and `localuser`.
//! `canonical`, `final` and `exec` are recognised but never satisfied.
//!
//! ## Resolution
//!
//! Options set at global scope are taken first, followed by every applicable block
//! in the order they appear. For each option the first value found wins, except
//! for `IdentityFile` which accumulates.
//!
//! Parsing is asynchronous; see [`parse_config_file`] and [`parse_config_str`].
//! Resolution is not; see [`GlobalConfig::host_config`] and [`resolve`].

mod errors;
pub use errors::ConfigError;

mod model;
pub use model::{
    Block, CalculatedConfig, CommonConfig, ConfigFilter, GlobalConfig, HostConfig, HostPattern,
    IdentityAgent, Match, MatchConfig, MatchKind, Origin,
};

mod files;
pub use files::{parse_config_file, parse_config_file_with, parse_config_str, FileReader, LocalFiles};

mod includes;
mod keywords;
use keywords::Keyword;
mod lines;
mod matching;

mod tokens;
pub use tokens::LocalContext;

mod resolve;
pub use resolve::resolve;

mod values;
pub use values::MatchedBlocks;
