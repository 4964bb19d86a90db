// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! we-api-finder CLI entry point.

use std::io;

use clap::{Parser, error::ErrorKind};
use tracing_subscriber::{EnvFilter, fmt};

use we_api_finder::cli::{self, Cli, Command};
use we_api_finder::driver::{Driver, DriverConfig};
use we_api_finder::error::ExitCode;
use we_api_finder::extension::Resolver;
use we_api_finder::filters::{
    ApiFilter, Filter, ManifestFilter, PermissionsFilter, UserCountFilter,
};
use we_api_finder::metadata::AmoMetadata;

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("WE_API_FINDER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("we-api-finder: {e:#}");
            ExitCode::Fatal
        }
    };

    std::process::exit(exit_code as i32);
}

fn run() -> anyhow::Result<ExitCode> {
    // try_parse so argument errors map to this tool's exit codes.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    e.print()?;
                    Ok(ExitCode::Success)
                }
                _ => {
                    e.print()?;
                    Ok(ExitCode::Fatal)
                }
            };
        }
    };

    let pool_size = cli::pool_size(cli.jobs);
    let ignore_missing = std::env::var("IGNORE_MISSING_ADDON")
        .map(|v| cli::is_truthy(&v))
        .unwrap_or(false);

    let (filter, metadata): (Box<dyn Filter>, Option<AmoMetadata>) = match &cli.command {
        Command::Api(args) => (
            Box::new(ApiFilter::new(&args.queries, pool_size)?),
            optional_metadata(),
        ),
        Command::Permissions(args) => (
            Box::new(PermissionsFilter::new(&args.permissions)),
            optional_metadata(),
        ),
        Command::Manifest(args) => {
            (Box::new(ManifestFilter::new(&args.keys)), optional_metadata())
        }
        Command::UserCount(args) => (
            Box::new(UserCountFilter::new(args.min_users)),
            // Fatal without metadata: the filter has nothing to count.
            Some(AmoMetadata::require_from_env()?),
        ),
    };

    let resolver = Resolver::new(cli.root.clone(), metadata);
    let driver = Driver::new(
        filter,
        resolver,
        DriverConfig {
            ignore_missing,
            ..Default::default()
        },
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    driver.run(&mut stdin.lock(), &mut stdout.lock())?;

    Ok(ExitCode::Success)
}

/// Metadata for filters that can run without it: load errors degrade to a
/// warning instead of aborting the batch.
fn optional_metadata() -> Option<AmoMetadata> {
    match AmoMetadata::from_env() {
        Ok(metadata) => metadata,
        Err(err) => {
            tracing::warn!(%err, "ignoring unusable AMO metadata");
            None
        }
    }
}
