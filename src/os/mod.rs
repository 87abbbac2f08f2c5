//! OS abstraction layer
// (c) 2024 Ross Younger

use std::path::PathBuf;

use anyhow::Result;

/// General platform abstraction trait.
/// The active implementation should be pulled into this crate
/// and exported as `Platform`.
///
/// Usage:
/// ```
///    use sshcfg::os::Platform;
///    use sshcfg::os::AbstractPlatform as _;
///    println!("{}", Platform::system_ssh_config());
/// ```
pub trait AbstractPlatform {
    /// Path to the system ssh config file.
    /// On most platforms this will be `/etc/ssh/ssh_config`
    fn system_ssh_config() -> &'static str;

    /// Path to the user ssh config file.
    /// On most platforms this will be `${HOME}/.ssh/config`
    /// # Note
    /// This is a _theoretical_ path construction; it does not guarantee that the path actually exists.
    /// That is up to the caller to determine and reason about.
    /// # Errors
    /// If the current user's home directory could not be determined
    fn user_ssh_config() -> Result<PathBuf>;

    /// The current user's home directory, if it can be determined
    fn home_dir() -> Option<PathBuf>;

    /// Login name of the account running this program
    /// # Errors
    /// If the account could not be looked up
    fn username() -> Result<String>;

    /// Numeric user id of the account running this program
    fn uid() -> u32;

    /// Name of this machine, as the system reports it
    fn hostname() -> String;
}

#[cfg(any(unix, doc))]
mod unix;

#[cfg(any(unix, doc))]
pub use unix::*;

static_assertions::assert_cfg!(unix, "This OS is not yet supported");
