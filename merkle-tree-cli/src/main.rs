//! `merkle`: build a tree from items, print it, prove and verify leaves.

mod cli;
mod commands;

use std::{io, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            cli.log_level,
        ))
        .init();

    let mut out = io::stdout().lock();
    if commands::run(&cli, &mut out)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
