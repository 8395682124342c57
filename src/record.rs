// File: record.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const CR_GLYPH: char = '\u{240D}';
pub const LF_GLYPH: char = '\u{240A}';

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

static STATUS_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^HTTP/\d\.\d (\d{3})(?: .*)?$").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub target_host: String,
    pub test_name: String,
    pub expected_outcome: String,
    pub first_line: String,
    pub full_response_escaped: String,
}

impl LogRecord {
    pub fn new(
        target_host: &str,
        test_name: &str,
        expected_outcome: &str,
        response_text: &str,
    ) -> Self {
        Self::at(
            Local::now(),
            target_host,
            test_name,
            expected_outcome,
            response_text,
        )
    }

    pub fn at(
        timestamp: DateTime<Local>,
        target_host: &str,
        test_name: &str,
        expected_outcome: &str,
        response_text: &str,
    ) -> Self {
        Self {
            timestamp,
            target_host: target_host.to_string(),
            test_name: test_name.to_string(),
            expected_outcome: expected_outcome.to_string(),
            first_line: first_line(response_text).to_string(),
            full_response_escaped: escape_line_endings(response_text),
        }
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Status code when the first line has the shape of an HTTP status line.
    pub fn status_code(&self) -> Option<u16> {
        status_code(&self.first_line)
    }
}

/// First `\n`-delimited segment, trimmed. Empty input yields "".
pub fn first_line(text: &str) -> &str {
    text.split('\n').next().unwrap_or("").trim()
}

pub fn escape_line_endings(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\r' => CR_GLYPH,
            '\n' => LF_GLYPH,
            other => other,
        })
        .collect()
}

pub fn status_code(line: &str) -> Option<u16> {
    STATUS_LINE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
