// File: cli.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::config::{ProbeConfig, DEFAULT_OUTPUT, DEFAULT_PORT, DEFAULT_TIMEOUT_MS};
use crate::sink::SinkFormat;

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    #[arg(
        short = 't',
        long = "target",
        help = "Host name or IP of the intermediary under test",
        required_unless_present = "list"
    )]
    pub target: Option<String>,

    #[arg(short = 'p', long = "port", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(
        long = "timeout-ms",
        default_value_t = DEFAULT_TIMEOUT_MS,
        help = "Connect timeout and per-read timeout in milliseconds"
    )]
    pub timeout_ms: u64,

    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    #[arg(long = "format", default_value = "csv", help = "Output format: csv or jsonl")]
    pub format: String,

    #[arg(
        short = 'b',
        long = "batch",
        help = "Only run the named batch (repeatable)"
    )]
    pub batches: Vec<String>,

    #[arg(
        long = "delay-ms",
        default_value_t = 0,
        help = "Pause between cases in milliseconds"
    )]
    pub delay_ms: u64,

    #[arg(long = "list", help = "List the test catalog and exit")]
    pub list: bool,

    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short = 'q', long = "quiet", help = "Reduce output verbosity")]
    pub quiet: bool,

    #[arg(long = "no-color", help = "Disable colored output")]
    pub no_color: bool,

    #[arg(
        long = "i-have-authorization",
        help = "Skip authorization prompt (requires explicit written permission)"
    )]
    pub i_have_authorization: bool,
}

impl Cli {
    pub fn to_config(&self) -> Result<ProbeConfig> {
        let mut config = ProbeConfig::new(self.target.as_deref().unwrap_or_default());
        config.set_port(self.port);
        config.set_timeout_ms(self.timeout_ms);
        config.set_delay_ms(self.delay_ms);
        config.set_output_path(self.output.clone());
        config.set_format(self.format.parse::<SinkFormat>()?);
        config.set_batches(self.batches.clone());
        config.set_quiet(self.quiet);
        config.validate()?;
        Ok(config)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            return log::LevelFilter::Debug;
        }
        self.log_level
            .parse()
            .unwrap_or(log::LevelFilter::Warn)
    }
}
