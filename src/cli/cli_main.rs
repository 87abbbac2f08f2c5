// Main CLI entrypoint
// (c) 2024 Ross Younger

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anstream::{eprintln, println};
use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize as _;
use tracing::{debug, trace, warn};

use super::{
    args::CliArgs,
    styles::{error_s, warning_s},
};
use crate::{
    config::{parse_config_file, ConfigFilter, GlobalConfig, MatchedBlocks},
    os::{AbstractPlatform as _, Platform},
    util::setup_tracing,
};

/// Main CLI entrypoint
pub fn cli() -> Result<ExitCode> {
    let args = CliArgs::parse();
    run(&args)
}

#[tokio::main(flavor = "current_thread")]
async fn run(args: &CliArgs) -> Result<ExitCode> {
    setup_tracing(args.trace_level(), args.log_file.as_deref())
        .inspect_err(|e| eprintln!("{e:?}"))?;

    match show(args).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            debug!("{e:?}");
            eprintln!("{} {e:#}", "ERROR".style(error_s()));
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Configuration files to try when none was given, in order of preference
fn default_config_files() -> Vec<PathBuf> {
    let mut files = Vec::new();
    match Platform::user_ssh_config() {
        Ok(p) => files.push(p),
        Err(e) => warn!("could not determine user configuration file path: {e}"),
    }
    files.push(PathBuf::from(Platform::system_ssh_config()));
    files
}

/// The first of `candidates` that exists
fn first_existing(candidates: &[PathBuf]) -> Option<&Path> {
    candidates.iter().map(PathBuf::as_path).find(|p| {
        let exists = p.exists();
        if !exists {
            trace!("configuration file {p:?} not present");
        }
        exists
    })
}

async fn load(args: &CliArgs) -> Result<GlobalConfig> {
    if let Some(path) = &args.config {
        return parse_config_file(path).await;
    }
    let candidates = default_config_files();
    if let Some(path) = first_existing(&candidates) {
        return parse_config_file(path).await;
    }
    // ssh carries on without any config file, so we do too
    if !args.quiet {
        eprintln!(
            "{}: no configuration file found; nothing is configured",
            "WARNING".style(warning_s()),
        );
    }
    Ok(GlobalConfig::default())
}

async fn show(args: &CliArgs) -> Result<()> {
    let global = load(args).await?;
    debug!(
        "{} blocks read from {}",
        global.configs.len(),
        global.source
    );
    if args.dump {
        println!("{global}");
        return Ok(());
    }

    let (user, host) = args.user_host()?;
    let calc = global.host_config(&ConfigFilter::new(host, user));
    println!("{calc}");
    if args.matched {
        println!("{}", MatchedBlocks(&calc));
    }
    Ok(())
}
