// File: catalog.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

//! Fixture catalog of raw HTTP/1.1 probes. Payloads are sent byte for byte;
//! most of them are malformed on purpose.

use anyhow::{bail, Result};
use std::collections::HashSet;

pub const CATALOG_VERSION: &str = "2025.1";

/// Padding length used by the oversized request-line and header probes.
pub const OVERSIZE_PADDING: usize = 9000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub expected_outcome: String,
    pub raw_payload: Vec<u8>,
}

impl TestCase {
    pub fn new(name: &str, expected_outcome: &str, raw_payload: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.to_string(),
            expected_outcome: expected_outcome.to_string(),
            raw_payload: raw_payload.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub name: String,
    pub cases: Vec<TestCase>,
}

impl Batch {
    pub fn new(name: &str, cases: Vec<TestCase>) -> Self {
        Self {
            name: name.to_string(),
            cases,
        }
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

pub fn total_cases(batches: &[Batch]) -> usize {
    batches.iter().map(Batch::len).sum()
}

/// Every batch, in reporting order, rendered for `host`.
pub fn catalog(host: &str) -> Vec<Batch> {
    vec![
        baseline(host),
        request_line(host),
        headers(host),
        framing(host),
        encoding(host),
    ]
}

/// Keeps catalog order; unknown names are an error.
pub fn select(batches: Vec<Batch>, names: &[String]) -> Result<Vec<Batch>> {
    if names.is_empty() {
        return Ok(batches);
    }

    let known: HashSet<&str> = batches.iter().map(|b| b.name.as_str()).collect();
    for name in names {
        if !known.contains(name.as_str()) {
            bail!(
                "Unknown batch '{}'. Available: {}",
                name,
                batches
                    .iter()
                    .map(|b| b.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    Ok(batches
        .into_iter()
        .filter(|b| names.iter().any(|n| n == &b.name))
        .collect())
}

fn baseline(host: &str) -> Batch {
    Batch::new(
        "baseline",
        vec![
            TestCase::new(
                "valid_get",
                "200 (baseline)",
                format!("GET / HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "valid_head",
                "200 (baseline)",
                format!("HEAD / HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "valid_post_content_length",
                "200 or 405 (baseline)",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: 3\r\nConnection: close\r\n\r\na=1"
                ),
            ),
            TestCase::new(
                "valid_post_chunked",
                "200 or 405 (baseline)",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n3\r\na=1\r\n0\r\n\r\n"
                ),
            ),
        ],
    )
}

fn request_line(host: &str) -> Batch {
    Batch::new(
        "request-line",
        vec![
            TestCase::new(
                "lowercase_method",
                "400 or 405",
                format!("get / HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "unknown_method",
                "405 or 501",
                format!("FOOBAR / HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "missing_version",
                "400 (HTTP/0.9 must not be accepted)",
                format!("GET /\r\nHost: {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "lowercase_version",
                "400",
                format!("GET / http/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "invalid_version_digits",
                "400 or 505",
                format!("GET / HTTP/1.x\r\nHost: {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "unsupported_major_version",
                "505",
                format!("GET / HTTP/3.0\r\nHost: {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "double_space_separator",
                "400",
                format!("GET  / HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "tab_separator",
                "400",
                format!("GET\t/\tHTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "leading_whitespace",
                "400",
                format!(" GET / HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "leading_empty_lines",
                "200 (robustness allows one leading CRLF)",
                format!("\r\n\r\nGET / HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "space_in_target",
                "400",
                format!("GET /a b HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "absolute_form_mismatched_host",
                "400 or served for Host header",
                format!(
                    "GET http://other.invalid/ HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"
                ),
            ),
            TestCase::new(
                "asterisk_form_get",
                "400",
                format!("GET * HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "bare_lf_line_endings",
                "400 or 200 (not blocked per vendor policy)",
                format!("GET / HTTP/1.1\nHost: {host}\nConnection: close\n\n"),
            ),
            TestCase::new(
                "bare_cr_line_endings",
                "400",
                format!("GET / HTTP/1.1\rHost: {host}\rConnection: close\r\r"),
            ),
            TestCase::new(
                "unterminated_header_section",
                "408 or timeout",
                format!("GET / HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n"),
            ),
        ],
    )
}

fn headers(host: &str) -> Batch {
    Batch::new(
        "headers",
        vec![
            TestCase::new(
                "missing_host",
                "400",
                "GET / HTTP/1.1\r\nConnection: close\r\n\r\n",
            ),
            TestCase::new(
                "duplicate_host",
                "400",
                format!(
                    "GET / HTTP/1.1\r\nHost: {host}\r\nHost: other.invalid\r\nConnection: close\r\n\r\n"
                ),
            ),
            TestCase::new(
                "empty_host_value",
                "400",
                "GET / HTTP/1.1\r\nHost: \r\nConnection: close\r\n\r\n",
            ),
            TestCase::new(
                "whitespace_before_colon",
                "400",
                format!("GET / HTTP/1.1\r\nHost : {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "whitespace_before_first_header",
                "400",
                format!("GET / HTTP/1.1\r\n Host: {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "obs_fold_continuation",
                "400 or folded into one value",
                format!(
                    "GET / HTTP/1.1\r\nHost: {host}\r\nX-Folded: first\r\n second\r\nConnection: close\r\n\r\n"
                ),
            ),
            TestCase::new(
                "obs_fold_tab_continuation",
                "400 or folded into one value",
                format!(
                    "GET / HTTP/1.1\r\nHost: {host}\r\nX-Folded: first\r\n\tsecond\r\nConnection: close\r\n\r\n"
                ),
            ),
            TestCase::new(
                "header_without_colon",
                "400",
                format!(
                    "GET / HTTP/1.1\r\nHost: {host}\r\nX-No-Colon\r\nConnection: close\r\n\r\n"
                ),
            ),
            TestCase::new(
                "empty_header_name",
                "400",
                format!("GET / HTTP/1.1\r\nHost: {host}\r\n: value\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "invalid_token_in_name",
                "400",
                format!(
                    "GET / HTTP/1.1\r\nHost: {host}\r\nX(Bad)Name: value\r\nConnection: close\r\n\r\n"
                ),
            ),
            TestCase::new(
                "underscore_in_name",
                "200 (not blocked per vendor policy)",
                format!(
                    "GET / HTTP/1.1\r\nHost: {host}\r\nX_Under_Score: value\r\nConnection: close\r\n\r\n"
                ),
            ),
            TestCase::new(
                "trailing_whitespace_value",
                "200",
                format!(
                    "GET / HTTP/1.1\r\nHost: {host}\r\nX-Trailing: value \t \r\nConnection: close\r\n\r\n"
                ),
            ),
        ],
    )
}

fn framing(host: &str) -> Batch {
    Batch::new(
        "framing",
        vec![
            TestCase::new(
                "cl_te_smuggle",
                "400 (CL.TE)",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nContent-Length: 6\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n0\r\n\r\nG"
                ),
            ),
            TestCase::new(
                "te_cl_smuggle",
                "400 (TE.CL)",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nContent-Length: 4\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n5c\r\nGPOST / HTTP/1.1\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: 15\r\n\r\nx=1\r\n0\r\n\r\n"
                ),
            ),
            TestCase::new(
                "duplicate_content_length_differing",
                "400",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nContent-Length: 3\r\nContent-Length: 5\r\nConnection: close\r\n\r\na=123"
                ),
            ),
            TestCase::new(
                "duplicate_content_length_equal",
                "200 or 400",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nContent-Length: 3\r\nContent-Length: 3\r\nConnection: close\r\n\r\na=1"
                ),
            ),
            TestCase::new(
                "content_length_list",
                "400",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nContent-Length: 3, 3\r\nConnection: close\r\n\r\na=1"
                ),
            ),
            TestCase::new(
                "negative_content_length",
                "400",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nContent-Length: -1\r\nConnection: close\r\n\r\n"
                ),
            ),
            TestCase::new(
                "non_numeric_content_length",
                "400",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nContent-Length: 3a\r\nConnection: close\r\n\r\na=1"
                ),
            ),
            TestCase::new(
                "plus_sign_content_length",
                "400",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nContent-Length: +3\r\nConnection: close\r\n\r\na=1"
                ),
            ),
            TestCase::new(
                "obs_fold_content_length",
                "400",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nContent-Length:\r\n 3\r\nConnection: close\r\n\r\na=1"
                ),
            ),
            TestCase::new(
                "te_unknown_coding",
                "501",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nTransfer-Encoding: xchunked\r\nConnection: close\r\n\r\n0\r\n\r\n"
                ),
            ),
            TestCase::new(
                "te_leading_space_name",
                "400",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\n Transfer-Encoding: chunked\r\nConnection: close\r\n\r\n0\r\n\r\n"
                ),
            ),
            TestCase::new(
                "te_space_before_colon",
                "400",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nTransfer-Encoding : chunked\r\nConnection: close\r\n\r\n0\r\n\r\n"
                ),
            ),
            TestCase::new(
                "te_chunked_not_final",
                "400",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nTransfer-Encoding: chunked, identity\r\nConnection: close\r\n\r\n0\r\n\r\n"
                ),
            ),
            TestCase::new(
                "te_duplicate_headers",
                "400",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nTransfer-Encoding: chunked\r\nTransfer-Encoding: identity\r\nConnection: close\r\n\r\n0\r\n\r\n"
                ),
            ),
            TestCase::new(
                "te_on_http10",
                "400",
                format!(
                    "POST / HTTP/1.0\r\nHost: {host}\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n0\r\n\r\n"
                ),
            ),
            TestCase::new(
                "invalid_chunk_size",
                "400",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\nzz\r\nabc\r\n0\r\n\r\n"
                ),
            ),
            TestCase::new(
                "chunk_size_overflow",
                "400",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\nFFFFFFFFFFFFFFFFF1\r\na\r\n0\r\n\r\n"
                ),
            ),
            TestCase::new(
                "chunk_extension",
                "200",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n3;ext=1\r\na=1\r\n0\r\n\r\n"
                ),
            ),
            TestCase::new(
                "chunk_bare_lf_terminator",
                "400",
                format!(
                    "POST / HTTP/1.1\r\nHost: {host}\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n3\na=1\n0\n\n"
                ),
            ),
            TestCase::new(
                "get_with_body_and_pipelined_request",
                "single response (pipelined request must not be served)",
                format!(
                    "GET / HTTP/1.1\r\nHost: {host}\r\nContent-Length: 35\r\n\r\nGET /smuggled HTTP/1.1\r\nHost: x\r\n\r\n"
                ),
            ),
        ],
    )
}

fn encoding(host: &str) -> Batch {
    let padding = "A".repeat(OVERSIZE_PADDING);

    let mut nul_in_target = b"GET /in".to_vec();
    nul_in_target.push(0x00);
    nul_in_target
        .extend_from_slice(format!("dex HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n").as_bytes());

    let mut raw_high_bytes = b"GET /caf".to_vec();
    raw_high_bytes.extend_from_slice(&[0xC3, 0xA9, 0xFF, 0xFE]);
    raw_high_bytes
        .extend_from_slice(format!(" HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n").as_bytes());

    let mut high_bytes_in_value = format!("GET / HTTP/1.1\r\nHost: {host}\r\nX-Latin: ").into_bytes();
    high_bytes_in_value.extend_from_slice(&[0xE9, 0xE8, 0xFF]);
    high_bytes_in_value.extend_from_slice(b"\r\nConnection: close\r\n\r\n");

    Batch::new(
        "encoding",
        vec![
            TestCase::new("nul_in_target", "400", nul_in_target),
            TestCase::new(
                "nul_in_header_value",
                "400",
                format!(
                    "GET / HTTP/1.1\r\nHost: {host}\r\nX-Nul: a\0b\r\nConnection: close\r\n\r\n"
                ),
            ),
            TestCase::new(
                "control_char_in_value",
                "400",
                format!(
                    "GET / HTTP/1.1\r\nHost: {host}\r\nX-Ctl: a\x01\x7fb\r\nConnection: close\r\n\r\n"
                ),
            ),
            TestCase::new(
                "bare_cr_in_value",
                "400",
                format!(
                    "GET / HTTP/1.1\r\nHost: {host}\r\nX-Cr: a\rInjected: 1\r\nConnection: close\r\n\r\n"
                ),
            ),
            TestCase::new(
                "tab_in_header_name",
                "400",
                format!("GET / HTTP/1.1\r\nHost: {host}\r\nX\tTab: v\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new("raw_non_ascii_target", "400", raw_high_bytes),
            TestCase::new(
                "utf8_in_target",
                "400",
                format!("GET /caf\u{e9} HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"),
            ),
            TestCase::new(
                "obs_text_in_value",
                "200 (obs-text is allowed in values)",
                high_bytes_in_value,
            ),
            TestCase::new(
                "oversized_request_line",
                "414",
                format!(
                    "GET /{padding} HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"
                ),
            ),
            TestCase::new(
                "oversized_header_value",
                "431 or 400",
                format!(
                    "GET / HTTP/1.1\r\nHost: {host}\r\nX-Big: {padding}\r\nConnection: close\r\n\r\n"
                ),
            ),
            TestCase::new(
                "oversized_method",
                "400 or 501",
                format!("{padding} / HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"),
            ),
        ],
    )
}
