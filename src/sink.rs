// File: sink.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

//! Append-only record sinks. Opening a sink creates the containing directory
//! and acquires the append handle once; the handle is released on drop.

use anyhow::{Context, Result};
use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::record::LogRecord;

pub const CSV_HEADER: &str =
    "timestamp,target_host,test_name,expected_outcome,first_line,full_response_escaped";

pub trait RecordSink {
    fn append(&mut self, record: &LogRecord) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkFormat {
    Csv,
    JsonLines,
}

impl SinkFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::JsonLines => "jsonl",
        }
    }
}

impl FromStr for SinkFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "jsonl" | "json-lines" | "ndjson" => Ok(Self::JsonLines),
            _ => Err(anyhow::anyhow!("Unsupported output format: {}", s)),
        }
    }
}

pub fn open_sink(path: &Path, format: SinkFormat) -> Result<Box<dyn RecordSink>> {
    match format {
        SinkFormat::Csv => Ok(Box::new(CsvSink::open(path)?)),
        SinkFormat::JsonLines => Ok(Box::new(JsonLinesSink::open(path)?)),
    }
}

fn open_append(path: &Path) -> Result<(File, bool)> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            debug!("Created output directory {}", parent.display());
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {} for appending", path.display()))?;
    let is_empty = file
        .metadata()
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len()
        == 0;
    Ok((file, is_empty))
}

pub fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub struct CsvSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl CsvSink {
    pub fn open(path: &Path) -> Result<Self> {
        let (file, is_empty) = open_append(path)?;
        let mut writer = BufWriter::new(file);
        if is_empty {
            writeln!(writer, "{}", CSV_HEADER)?;
            writer.flush()?;
        }
        Ok(Self {
            path: path.to_path_buf(),
            writer,
        })
    }

    pub fn format_row(record: &LogRecord) -> String {
        format!(
            "{},{},{},{},{},{}",
            record.formatted_timestamp(),
            escape_csv(&record.target_host),
            escape_csv(&record.test_name),
            escape_csv(&record.expected_outcome),
            escape_csv(&record.first_line),
            escape_csv(&record.full_response_escaped),
        )
    }
}

impl RecordSink for CsvSink {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        writeln!(self.writer, "{}", Self::format_row(record))
            .with_context(|| format!("Failed to write record to {}", self.path.display()))?;
        self.writer.flush()?;
        Ok(())
    }
}

pub struct JsonLinesSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl JsonLinesSink {
    pub fn open(path: &Path) -> Result<Self> {
        let (file, _) = open_append(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }
}

impl RecordSink for JsonLinesSink {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        let line = serde_json::to_string(record)
            .map_err(|e| anyhow::anyhow!("Failed to serialize record: {}", e))?;
        writeln!(self.writer, "{}", line)
            .with_context(|| format!("Failed to write record to {}", self.path.display()))?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps records in memory, in append order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<LogRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<LogRecord> {
        self.records
    }
}

impl RecordSink for MemorySink {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        (**self).append(record)
    }
}
