// File: runner.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{Context, Result};
use chrono::Local;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::catalog::{total_cases, Batch, TestCase};
use crate::config::ProbeConfig;
use crate::getstate::GetState;
use crate::record::LogRecord;
use crate::sink::RecordSink;
use crate::transactor::{RawTransactor, ERROR_MARKER};

/// Runs batches strictly in sequence against one target; one record per case.
pub struct SuiteRunner {
    config: ProbeConfig,
    transactor: RawTransactor,
}

impl SuiteRunner {
    pub fn new(config: ProbeConfig) -> Self {
        let transactor = RawTransactor::new(config.timeout());
        Self { config, transactor }
    }

    /// Only a sink write failure ends the run early.
    pub async fn run<S>(&self, batches: &[Batch], sink: &mut S) -> Result<GetState>
    where
        S: RecordSink + ?Sized,
    {
        let mut state = GetState::new();
        state.set_start_time(Local::now());

        let total = total_cases(batches);
        info!(
            "Running {} cases in {} batches against {}:{}",
            total,
            batches.len(),
            self.config.target(),
            self.config.port()
        );

        let pb = self.progress_bar(total as u64);
        let mut first = true;
        let mut recorded = 0usize;

        for batch in batches {
            debug!("Batch {} ({} cases)", batch.name, batch.len());
            for case in &batch.cases {
                if !first && !self.config.delay().is_zero() {
                    tokio::time::sleep(self.config.delay()).await;
                }
                first = false;

                pb.set_message(case.name.clone());
                let record = self.run_case(case, &mut state).await;
                if !self.config.quiet() {
                    let line = self.progress_line(&batch.name, &record);
                    pb.suspend(|| println!("{}", line));
                }

                if let Err(e) = sink.append(&record) {
                    pb.abandon();
                    return Err(e).with_context(|| {
                        format!(
                            "Failed to record result of {}; {} of {} cases left unrecorded",
                            case.name,
                            total - recorded,
                            total
                        )
                    });
                }
                recorded += 1;
                pb.inc(1);
            }
        }

        pb.finish_and_clear();
        state.set_end_time(Local::now());
        Ok(state)
    }

    async fn run_case(&self, case: &TestCase, state: &mut GetState) -> LogRecord {
        debug!(
            "Sending {} ({} bytes) to {}:{}",
            case.name,
            case.raw_payload.len(),
            self.config.target(),
            self.config.port()
        );

        let result = self
            .transactor
            .transact(self.config.target(), self.config.port(), &case.raw_payload)
            .await;

        let failed = result.is_failure();
        let record = LogRecord::new(
            self.config.target(),
            &case.name,
            &case.expected_outcome,
            &result.into_text(),
        );

        if failed {
            state.add_failure();
        } else if record.full_response_escaped.is_empty() {
            state.add_silent();
        } else {
            state.add_response(record.status_code().is_some());
        }
        record
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if self.config.quiet() {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>4}/{len:4} {msg}",
        ) {
            pb.set_style(style.progress_chars("##-"));
        }
        pb
    }

    fn progress_line(&self, batch: &str, record: &LogRecord) -> String {
        let first_line = if record.first_line.is_empty() {
            "(no response)".dimmed().to_string()
        } else if record.first_line.starts_with(ERROR_MARKER) {
            record.first_line.red().to_string()
        } else {
            match record.status_code() {
                Some(code) if code < 400 => record.first_line.green().to_string(),
                Some(_) => record.first_line.yellow().to_string(),
                None => record.first_line.clone(),
            }
        };
        format!(
            "[{}] {} -> {}",
            batch.cyan(),
            record.test_name.bold(),
            first_line
        )
    }
}
