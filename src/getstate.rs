// File: getstate.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::{DateTime, Local};

/// Counters for one suite run. Nothing here is a pass/fail verdict.
#[derive(Debug, Clone, Copy)]
pub struct GetState {
    total_cases: usize,
    responded: usize,
    silent: usize,
    failed: usize,
    status_lines: usize,
    start_time: Option<DateTime<Local>>,
    end_time: Option<DateTime<Local>>,
}

impl GetState {
    pub fn new() -> GetState {
        GetState {
            total_cases: 0,
            responded: 0,
            silent: 0,
            failed: 0,
            status_lines: 0,
            start_time: None,
            end_time: None,
        }
    }

    pub fn add_response(&mut self, has_status_line: bool) {
        self.total_cases += 1;
        self.responded += 1;
        if has_status_line {
            self.status_lines += 1;
        }
    }

    pub fn add_silent(&mut self) {
        self.total_cases += 1;
        self.silent += 1;
    }

    pub fn add_failure(&mut self) {
        self.total_cases += 1;
        self.failed += 1;
    }

    pub fn total_cases(&self) -> usize {
        self.total_cases
    }

    pub fn responded(&self) -> usize {
        self.responded
    }

    pub fn silent(&self) -> usize {
        self.silent
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn status_lines(&self) -> usize {
        self.status_lines
    }

    pub fn set_start_time(&mut self, start_time: DateTime<Local>) {
        self.start_time = Some(start_time);
    }

    pub fn start_time(&self) -> Option<DateTime<Local>> {
        self.start_time
    }

    pub fn set_end_time(&mut self, end_time: DateTime<Local>) {
        self.end_time = Some(end_time);
    }

    pub fn end_time(&self) -> Option<DateTime<Local>> {
        self.end_time
    }

    pub fn elapsed_ms(&self) -> u64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => (end - start).num_milliseconds().max(0) as u64,
            _ => 0,
        }
    }
}

impl Default for GetState {
    fn default() -> Self {
        Self::new()
    }
}
