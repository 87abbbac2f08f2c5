// sshcfg command-line arguments
// (c) 2024 Ross Younger

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser, Clone)]
#[command(
    author,
    version,
    about,
    before_help = "e.g.   sshcfg git@github.com",
    infer_long_args(true)
)]
#[command(help_template(
    "\
{name} version {version}
{about-with-newline}
{usage-heading} {usage}
{before-help}
{all-args}{after-help}
"
))]
#[command(styles=super::styles::CLAP_STYLES)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CliArgs {
    /// Reads the given configuration file instead of the user's `~/.ssh/config`
    /// (or `/etc/ssh/ssh_config` when the user has none)
    #[arg(short = 'F', long, value_name("FILE"))]
    pub config: Option<PathBuf>,

    /// Remote username, overriding any given in DESTINATION
    #[arg(short = 'l', long, value_name("USER"))]
    pub login: Option<String>,

    /// Also lists the Host and Match blocks that contributed to the result
    #[arg(short, long, action)]
    pub matched: bool,

    /// Lists every block in the configuration instead of resolving a destination
    #[arg(long, action, conflicts_with_all(["matched", "login"]))]
    pub dump: bool,

    // DEBUG ----------------------------
    /// Enable detailed debug output
    ///
    /// This has the same effect as setting `RUST_LOG=sshcfg=trace` in the environment.
    /// If present, `RUST_LOG` overrides this option.
    #[arg(short, long, action, help_heading("Debug"))]
    pub debug: bool,

    /// Quiet mode: reports only errors
    #[arg(short, long, action, conflicts_with("debug"), help_heading("Debug"))]
    pub quiet: bool,

    /// Log to a file
    ///
    /// By default the log receives everything printed to stderr.
    /// To override this behaviour, set the environment variable `RUST_LOG_FILE_DETAIL` (same semantics as `RUST_LOG`).
    #[arg(long, action, help_heading("Debug"), value_name("FILE"))]
    pub log_file: Option<PathBuf>,

    // POSITIONAL ARGUMENTS ================================================================
    /// The host to look up, optionally with a remote username: HOST or USER@HOST.
    #[arg(required_unless_present("dump"), value_name = "DESTINATION")]
    pub destination: Option<String>,
}

impl CliArgs {
    pub(crate) fn trace_level(&self) -> &'static str {
        if self.debug {
            "trace"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }

    /// Splits the destination into (user, host). `--login` takes precedence over any user part.
    pub(crate) fn user_host(&self) -> anyhow::Result<(Option<&str>, &str)> {
        let dest = self
            .destination
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("no destination specified"))?;
        // It might be user@host, or it might be just the hostname or IP.
        let (user, host) = match dest.split_once('@') {
            Some((user, host)) => (Some(user), host),
            None => (None, dest),
        };
        anyhow::ensure!(!host.is_empty(), "destination has no hostname");
        Ok((self.login.as_deref().or(user), host))
    }
}
