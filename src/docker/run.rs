use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::types::{CommandInvocation, CommandResult, OutputKind, OutputObserver, OutputRecord};
use crate::error::{Error, Result};

const CHUNK_SIZE: usize = 8 * 1024;

/// Executes one external command to completion.
///
/// Implementations append a [`OutputKind::Command`] record first, then one
/// record per output chunk in arrival order. Each chunk is handed to the
/// observer before the next read. A panicking observer unwinds out of `run`
/// and aborts the read loop.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        invocation: &CommandInvocation,
        on_output: Option<OutputObserver<'_>>,
    ) -> Result<CommandResult>;
}

/// Runs commands as real child processes.
///
/// The child gets a null stdin and is killed if the returned future is
/// dropped before it exits, so dropping is the cancellation path.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        invocation: &CommandInvocation,
        mut on_output: Option<OutputObserver<'_>>,
    ) -> Result<CommandResult> {
        let command_line = invocation.command_line();
        tracing::debug!("$ {command_line}");

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn {
                command: command_line.clone(),
                source,
            })?;

        let mut records = vec![OutputRecord {
            kind: OutputKind::Command,
            text: command_line.clone(),
        }];

        let mut stdout = child.stdout.take().map(|s| Pipe::new(OutputKind::Stdout, s));
        let mut stderr = child.stderr.take().map(|s| Pipe::new(OutputKind::Stderr, s));

        while stdout.is_some() || stderr.is_some() {
            let record = tokio::select! {
                read = read_pipe(&mut stdout) => read,
                read = read_pipe(&mut stderr) => read,
            };
            let Some(record) = record else {
                continue;
            };

            if record.kind == OutputKind::Stderr {
                tracing::debug!("ERR {}", record.text.trim_end());
            }
            if let Some(observer) = on_output.as_deref_mut() {
                observer(&record);
            }
            records.push(record);
        }

        let exit_code = match child.wait().await {
            Ok(status) => status.code(),
            Err(e) => {
                tracing::warn!("failed to wait for `{command_line}`: {e}");
                None
            }
        };
        tracing::debug!("`{command_line}` exited with {exit_code:?}");

        Ok(CommandResult { exit_code, records })
    }
}

/// One piped output stream plus the undecoded tail of its last chunk.
struct Pipe {
    kind: OutputKind,
    reader: Box<dyn AsyncRead + Send + Unpin>,
    buf: Vec<u8>,
    pending: Vec<u8>,
}

impl Pipe {
    fn new(kind: OutputKind, reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self {
            kind,
            reader: Box::new(reader),
            buf: vec![0; CHUNK_SIZE],
            pending: Vec::new(),
        }
    }
}

/// Read the next chunk from `slot`. At EOF or on a read error the slot is
/// cleared and any undecodable tail is emitted as a final lossy record.
///
/// A cleared slot never resolves, so `select!` keeps waiting on the other pipe.
async fn read_pipe(slot: &mut Option<Pipe>) -> Option<OutputRecord> {
    let Some(pipe) = slot.as_mut() else {
        return std::future::pending().await;
    };

    let n = match pipe.reader.read(&mut pipe.buf).await {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!("failed to read {:?} pipe: {e}", pipe.kind);
            0
        }
    };

    if n == 0 {
        let pipe = slot.take()?;
        if pipe.pending.is_empty() {
            return None;
        }
        return Some(OutputRecord {
            kind: pipe.kind,
            text: String::from_utf8_lossy(&pipe.pending).into_owned(),
        });
    }

    let text = decode_chunk(&mut pipe.pending, &pipe.buf[..n]);
    if text.is_empty() {
        return None;
    }
    Some(OutputRecord {
        kind: pipe.kind,
        text,
    })
}

/// Decode `chunk` as UTF-8, carrying an incomplete trailing sequence over in
/// `pending` so a multi-byte character split across reads is not mangled.
fn decode_chunk(pending: &mut Vec<u8>, chunk: &[u8]) -> String {
    pending.extend_from_slice(chunk);

    let mut out = String::new();
    let mut rest: &[u8] = &pending[..];
    loop {
        match std::str::from_utf8(rest) {
            Ok(s) => {
                out.push_str(s);
                rest = &[];
                break;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                out.push_str(&String::from_utf8_lossy(valid));
                match e.error_len() {
                    Some(len) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        rest = &after[len..];
                    }
                    // Incomplete sequence at the end: keep it for the next chunk.
                    None => {
                        rest = after;
                        break;
                    }
                }
            }
        }
    }

    let keep = rest.to_vec();
    *pending = keep;
    out
}
