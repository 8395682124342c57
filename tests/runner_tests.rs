// File: runner_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

mod common;

use anyhow::Result;
use common::*;
use rfcprobe::catalog::{total_cases, Batch};
use rfcprobe::record::LogRecord;
use rfcprobe::runner::SuiteRunner;
use rfcprobe::sink::{open_sink, MemorySink, RecordSink, SinkFormat, CSV_HEADER};
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_one_record_per_case_in_order() {
    let addr = spawn_responder(BAD_REQUEST.as_bytes(), 3).await;
    let batches = two_batches();

    let runner = SuiteRunner::new(local_config(addr.port(), 1000));
    let mut sink = MemorySink::new();
    let state = runner.run(&batches, &mut sink).await.unwrap();

    let records = sink.records();
    assert_eq!(records.len(), total_cases(&batches));
    assert_eq!(state.total_cases(), 3);

    let names: Vec<&str> = records.iter().map(|r| r.test_name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);

    let expected: Vec<&str> = records.iter().map(|r| r.expected_outcome.as_str()).collect();
    assert_eq!(
        expected,
        vec!["400", "not blocked per vendor policy", "200 (baseline)"]
    );

    for record in records {
        assert_eq!(record.target_host, "127.0.0.1");
        assert_eq!(record.first_line, "HTTP/1.1 400 Bad Request");
        assert!(!record.full_response_escaped.contains('\r'));
        assert!(!record.full_response_escaped.contains('\n'));
    }
    assert_eq!(state.responded(), 3);
    assert_eq!(state.status_lines(), 3);
}

#[tokio::test]
async fn test_unreachable_target_still_records_every_case() {
    let port = closed_port().await;
    let batches = two_batches();

    let runner = SuiteRunner::new(local_config(port, 500));
    let mut sink = MemorySink::new();
    let state = runner.run(&batches, &mut sink).await.unwrap();

    let records = sink.into_records();
    assert_eq!(records.len(), 3);
    for record in &records {
        assert!(record.first_line.starts_with("ERROR: "));
        assert!(record.full_response_escaped.starts_with("ERROR: "));
    }
    assert_eq!(state.failed(), 3);
    assert_eq!(state.responded(), 0);
}

#[tokio::test]
async fn test_failure_does_not_abort_later_cases() {
    // The responder serves one connection and then stops listening.
    let addr = spawn_responder(BAD_REQUEST.as_bytes(), 1).await;
    let batches = two_batches();

    let runner = SuiteRunner::new(local_config(addr.port(), 500));
    let mut sink = MemorySink::new();
    let state = runner.run(&batches, &mut sink).await.unwrap();

    let records = sink.records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].first_line, "HTTP/1.1 400 Bad Request");
    assert!(records[1].first_line.starts_with("ERROR: "));
    assert!(records[2].first_line.starts_with("ERROR: "));
    assert_eq!(state.responded(), 1);
    assert_eq!(state.failed(), 2);
}

#[tokio::test]
async fn test_silent_peer_records_empty_first_line() {
    let addr = spawn_staller(b"", std::time::Duration::from_secs(5)).await;
    let batches = vec![Batch::new("silent", vec![simple_get("quiet", "timeout")])];

    let runner = SuiteRunner::new(local_config(addr.port(), 200));
    let mut sink = MemorySink::new();
    let state = runner.run(&batches, &mut sink).await.unwrap();

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].first_line, "");
    assert_eq!(records[0].full_response_escaped, "");
    assert_eq!(state.silent(), 1);
}

#[tokio::test]
async fn test_csv_sink_receives_every_record() {
    let addr = spawn_responder(BAD_REQUEST.as_bytes(), 3).await;
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("results").join("run.csv");

    let mut config = local_config(addr.port(), 1000);
    config.set_output_path(&path);

    let mut sink = open_sink(config.output_path(), SinkFormat::Csv).unwrap();
    let runner = SuiteRunner::new(config);
    runner.run(&two_batches(), &mut sink).await.unwrap();
    drop(sink);

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], CSV_HEADER);
    assert!(lines[1].contains(",127.0.0.1,alpha,400,HTTP/1.1 400 Bad Request,"));
    assert!(lines[3].contains(",gamma,"));
    assert!(lines[3].ends_with("Connection: close␍␊␍␊"));
}

#[tokio::test]
async fn test_reset_peer_still_yields_one_error_record() {
    let addr = spawn_resetter(
        b"HTTP/1.1 400 Bad Request\r\n",
        std::time::Duration::from_millis(200),
    )
    .await;
    let batches = vec![Batch::new("reset", vec![simple_get("rst", "400")])];

    let runner = SuiteRunner::new(local_config(addr.port(), 1000));
    let mut sink = MemorySink::new();
    let state = runner.run(&batches, &mut sink).await.unwrap();

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].first_line.starts_with("ERROR: Read failed"));
    assert!(records[0]
        .full_response_escaped
        .ends_with("| HTTP/1.1 400 Bad Request␍␊"));
    assert_eq!(state.failed(), 1);
    assert_eq!(state.responded(), 0);
}

struct FailingSink;

impl RecordSink for FailingSink {
    fn append(&mut self, _record: &LogRecord) -> Result<()> {
        Err(anyhow::anyhow!("disk full"))
    }
}

#[tokio::test]
async fn test_sink_failure_is_reported() {
    let port = closed_port().await;
    let runner = SuiteRunner::new(local_config(port, 200));
    let err = runner
        .run(&two_batches(), &mut FailingSink)
        .await
        .unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("disk full"));
    assert!(message.contains("Failed to record result of alpha"));
    assert!(message.contains("3 of 3 cases left unrecorded"));
}
