// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::sink::SinkFormat;

pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_OUTPUT: &str = "results/rfc7230_results.csv";

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    target: String,
    port: u16,
    timeout_ms: u64,
    delay_ms: u64,
    output_path: PathBuf,
    format: SinkFormat,
    batches: Vec<String>,
    quiet: bool,
}

impl ProbeConfig {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            port: DEFAULT_PORT,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            delay_ms: 0,
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            format: SinkFormat::Csv,
            batches: Vec::new(),
            quiet: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.target.is_empty() || self.target.len() > 253 {
            bail!("Invalid target length");
        }
        if self
            .target
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            bail!("Target contains whitespace or control characters");
        }
        if self.port == 0 {
            bail!("Port must be between 1 and 65535");
        }
        if self.timeout_ms == 0 {
            bail!("Timeout must be a positive number of milliseconds");
        }
        Ok(())
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn set_timeout_ms(&mut self, timeout_ms: u64) {
        self.timeout_ms = timeout_ms;
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn set_delay_ms(&mut self, delay_ms: u64) {
        self.delay_ms = delay_ms;
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn set_output_path(&mut self, output_path: impl Into<PathBuf>) {
        self.output_path = output_path.into();
    }

    pub fn format(&self) -> SinkFormat {
        self.format
    }

    pub fn set_format(&mut self, format: SinkFormat) {
        self.format = format;
    }

    pub fn batches(&self) -> &[String] {
        &self.batches
    }

    pub fn set_batches(&mut self, batches: Vec<String>) {
        self.batches = batches;
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub fn set_quiet(&mut self, quiet: bool) {
        self.quiet = quiet;
    }
}
