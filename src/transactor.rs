// File: transactor.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

//! Semantics-blind raw TCP exchange: connect, write bytes verbatim, read until
//! the peer closes or goes quiet.

use log::{debug, trace, warn};
use std::borrow::Cow;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Prefix of every result text produced by a failed transaction.
pub const ERROR_MARKER: &str = "ERROR: ";

const READ_CHUNK: usize = 4096;

#[derive(Debug)]
pub enum TransactError {
    ConnectTimeout(Duration),
    Connect(std::io::Error),
    /// `received` holds whatever the peer sent before the fault.
    Write {
        source: std::io::Error,
        received: String,
    },
    Read {
        source: std::io::Error,
        received: String,
    },
}

impl fmt::Display for TransactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectTimeout(t) => {
                write!(f, "Connection timeout after {} ms", t.as_millis())
            }
            Self::Connect(e) => write!(f, "Connection failed: {}", e),
            Self::Write { source, received } => {
                write!(f, "Write failed: {}", source)?;
                write_received(f, received)
            }
            Self::Read { source, received } => {
                write!(f, "Read failed: {}", source)?;
                write_received(f, received)
            }
        }
    }
}

fn write_received(f: &mut fmt::Formatter<'_>, received: &str) -> fmt::Result {
    if received.is_empty() {
        Ok(())
    } else {
        write!(f, " | {}", received)
    }
}

impl std::error::Error for TransactError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConnectTimeout(_) => None,
            Self::Connect(e) => Some(e),
            Self::Write { source, .. } | Self::Read { source, .. } => Some(source),
        }
    }
}

#[derive(Debug)]
pub enum TransactionResult {
    /// Everything received before the peer closed or a read stalled.
    Response(String),
    Failed(TransactError),
}

impl TransactionResult {
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Response(text) => Cow::Borrowed(text),
            Self::Failed(e) => Cow::Owned(format!("{}{}", ERROR_MARKER, e)),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Response(text) => text,
            Self::Failed(e) => format!("{}{}", ERROR_MARKER, e),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Outcome of a single bounded read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Data(usize),
    EndOfStream,
    DeadlineExceeded,
}

/// Reads once into `buf`, waiting at most `deadline`.
pub async fn read_with_deadline<R>(
    reader: &mut R,
    buf: &mut [u8],
    deadline: Duration,
) -> std::io::Result<ReadOutcome>
where
    R: AsyncRead + Unpin,
{
    match tokio::time::timeout(deadline, reader.read(buf)).await {
        Ok(Ok(0)) => Ok(ReadOutcome::EndOfStream),
        Ok(Ok(n)) => Ok(ReadOutcome::Data(n)),
        Ok(Err(e)) => Err(e),
        Err(_) => Ok(ReadOutcome::DeadlineExceeded),
    }
}

/// One connection per call. The same `timeout` bounds the connect and every
/// individual read.
#[derive(Debug, Clone, Copy)]
pub struct RawTransactor {
    timeout: Duration,
}

impl RawTransactor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn transact(&self, host: &str, port: u16, raw_payload: &[u8]) -> TransactionResult {
        let start = Instant::now();
        let result = match self.exchange(host, port, raw_payload).await {
            Ok(bytes) => TransactionResult::Response(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                warn!("Transaction with {}:{} failed: {}", host, port, e);
                TransactionResult::Failed(e)
            }
        };
        debug!(
            "Transaction with {}:{} finished in {} ms",
            host,
            port,
            start.elapsed().as_millis()
        );
        result
    }

    async fn exchange(
        &self,
        host: &str,
        port: u16,
        raw_payload: &[u8],
    ) -> Result<Vec<u8>, TransactError> {
        let mut stream =
            match tokio::time::timeout(self.timeout, TcpStream::connect((host, port))).await {
                Ok(Ok(stream)) => stream,
                Ok(Err(e)) => return Err(TransactError::Connect(e)),
                Err(_) => return Err(TransactError::ConnectTimeout(self.timeout)),
            };
        trace!("Connected to {}:{}", host, port);

        let write_error = match stream.write_all(raw_payload).await {
            Ok(()) => {
                trace!("Wrote {} bytes", raw_payload.len());
                None
            }
            Err(e) => {
                debug!("Write to {}:{} failed: {}", host, port, e);
                Some(e)
            }
        };

        let mut response = Vec::new();
        let read_error = self.drain(&mut stream, &mut response).await;

        let _ = stream.shutdown().await;
        drop(stream);

        if let Some(source) = write_error {
            return Err(TransactError::Write {
                source,
                received: String::from_utf8_lossy(&response).into_owned(),
            });
        }
        if let Some(source) = read_error {
            return Err(TransactError::Read {
                source,
                received: String::from_utf8_lossy(&response).into_owned(),
            });
        }

        Ok(response)
    }

    async fn drain<R>(&self, reader: &mut R, response: &mut Vec<u8>) -> Option<std::io::Error>
    where
        R: AsyncRead + Unpin,
    {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match read_with_deadline(reader, &mut chunk, self.timeout).await {
                Ok(ReadOutcome::Data(n)) => response.extend_from_slice(&chunk[..n]),
                Ok(ReadOutcome::EndOfStream) => {
                    trace!("Peer closed after {} bytes", response.len());
                    return None;
                }
                Ok(ReadOutcome::DeadlineExceeded) => {
                    trace!("Read stalled after {} bytes", response.len());
                    return None;
                }
                Err(e) => return Some(e),
            }
        }
    }
}
