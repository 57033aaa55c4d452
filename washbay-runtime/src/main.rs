// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, ValueHint};
use washbay::core::Identity;

#[derive(Parser)]
#[command(author = "Copyright (C) 2024 Laixer Equipment B.V.")]
#[command(version, propagate_version = true)]
#[command(about = "Automated car wash daemon", long_about = None)]
struct Args {
    /// Configuration file.
    #[arg(
        short = 'c',
        long = "config",
        alias = "conf",
        value_name = "FILE",
        value_hint = ValueHint::FilePath
    )]
    config: Option<PathBuf>,
    /// Test configuration and exit.
    #[arg(short, long)]
    test: bool,
    /// Report status to the log only.
    #[arg(long)]
    no_telemetry: bool,
    /// Run as systemd service.
    #[arg(long)]
    systemd: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Log level for the number of verbosity flags.
///
/// The journal always receives at least informational messages.
fn log_level(verbose: u8, systemd: bool) -> log::LevelFilter {
    use log::LevelFilter;

    let level = match verbose {
        0 => LevelFilter::Error,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    if systemd {
        level.max(LevelFilter::Info)
    } else {
        level
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    use log::LevelFilter;

    let args = Args::parse();

    let log_level = log_level(args.verbose, args.systemd);

    if args.systemd {
        washbay::logger::SystemdLogger::init(log_level)?;
    } else {
        let mut log_config = simplelog::ConfigBuilder::new();
        log_config.set_target_level(LevelFilter::Off);
        log_config.set_location_level(LevelFilter::Off);
        log_config.add_filter_ignore_str("reqwest");
        log_config.add_filter_ignore_str("hyper");
        log_config.add_filter_ignore_str("mio");

        simplelog::TermLogger::init(
            log_level,
            log_config.build(),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )?;
    }

    let config = match args.config {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("configuration file {} does not exist", path.display());
            }
            washbay::Config::try_from_file(vec![path])?
        }
        // Try read configuration from global system location first, then from local directory.
        None => washbay::Config::try_from_file(vec![
            PathBuf::from(washbay::consts::DEFAULT_CONFIG_PATH),
            std::env::current_dir()?.join(washbay::consts::LOCAL_CONFIG_FILE),
        ])?,
    };

    config.validate()?;

    log::trace!("{}", config);

    if args.test {
        log::info!("Configuration is valid");
        return Ok(ExitCode::SUCCESS);
    }

    log::info!("{}", washbay::Washbay::intro());
    log::info!("Version: {}", washbay::consts::VERSION);

    let mut builder = washbay::runtime::Builder::from_config(&config)?;
    if args.no_telemetry {
        builder = builder.disable_telemetry();
    }

    let result = builder.enable_term_shutdown().spawn().await?;

    if result.is_success() {
        log::info!("Wash cycle completed");
    } else {
        log::error!("Wash cycle ended: {}", result);
    }

    Ok(ExitCode::from(result.exit_code()))
}
