// (c) 2024 Ross Younger
//! Command Line Interface for sshcfg
mod args;
mod cli_main;
pub(crate) mod styles;
pub use cli_main::cli;
