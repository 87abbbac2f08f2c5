//! OpenSSH client configuration interpreter
// (c) 2024 Ross Younger

//! This crate reads OpenSSH client configuration files and works out which
//! options apply to a given connection, following ssh's own precedence rules.
//!
//! ```no_run
//! # async fn example() -> anyhow::Result<()> {
//! use sshcfg::config::{parse_config_file, ConfigFilter};
//!
//! let global = parse_config_file("/home/me/.ssh/config").await?;
//! let calc = global.host_config(&ConfigFilter::new("github.com", Some("git")));
//! println!("{:?}", calc.common.identity_files);
//! # Ok(())
//! # }
//! ```
//!
//! The `sshcfg` binary prints the result as a table; see `sshcfg --help`.

mod cli;
pub use cli::cli;
pub mod config;
/// OS abstraction layer
pub mod os;
/// Utilities
pub mod util;
