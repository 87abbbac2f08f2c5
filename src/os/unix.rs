// OS abstraction layer for sshcfg - Unix implementation
// (c) 2024 Ross Younger

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use nix::unistd::{getuid, User};

use super::AbstractPlatform;

#[derive(Debug, Clone, Copy)]
/// OS abstraction layer for Unix-like platforms
pub struct Unix {}

/// The platform we are running on
pub type Platform = Unix;

impl AbstractPlatform for Unix {
    fn system_ssh_config() -> &'static str {
        "/etc/ssh/ssh_config"
    }

    fn user_ssh_config() -> Result<PathBuf> {
        let mut pb = Self::home_dir().context("could not determine home directory")?;
        pb.push(".ssh");
        pb.push("config");
        Ok(pb)
    }

    fn home_dir() -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn username() -> Result<String> {
        let uid = getuid();
        let user = User::from_uid(uid)
            .with_context(|| format!("looking up uid {uid}"))?
            .with_context(|| format!("uid {uid} has no passwd entry"))?;
        Ok(user.name)
    }

    fn uid() -> u32 {
        getuid().as_raw()
    }

    fn hostname() -> String {
        gethostname::gethostname().to_string_lossy().into_owned()
    }
}
