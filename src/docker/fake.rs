//! Scripted [`CommandRunner`] for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::run::CommandRunner;
use super::types::{CommandInvocation, CommandResult, OutputKind, OutputObserver, OutputRecord};
use crate::error::{Error, Result};

struct Script {
    exit_code: Option<i32>,
    chunks: Vec<OutputRecord>,
}

/// Replays canned output keyed by [`CommandInvocation::command_line`], the same text
/// [`ProcessRunner`](super::ProcessRunner) puts in the `Command` record, and records every
/// invocation it receives. Unscripted commands exit 0 with no output.
#[derive(Default)]
pub struct FakeRunner {
    scripts: HashMap<String, Script>,
    fail_spawn: Vec<String>,
    calls: Mutex<Vec<CommandInvocation>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, command_line: &str, exit_code: i32, chunks: Vec<OutputRecord>) -> Self {
        self.scripts.insert(
            command_line.to_string(),
            Script {
                exit_code: Some(exit_code),
                chunks,
            },
        );
        self
    }

    /// Make `command_line` fail as if the executable were missing.
    pub fn fail_spawn(mut self, command_line: &str) -> Self {
        self.fail_spawn.push(command_line.to_string());
        self
    }

    pub fn calls(&self) -> Vec<CommandInvocation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(CommandInvocation::command_line).collect()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(
        &self,
        invocation: &CommandInvocation,
        mut on_output: Option<OutputObserver<'_>>,
    ) -> Result<CommandResult> {
        let command_line = invocation.command_line();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(invocation.clone());
        }

        if self.fail_spawn.contains(&command_line) {
            return Err(Error::Spawn {
                command: command_line,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
            });
        }

        let mut records = vec![OutputRecord {
            kind: OutputKind::Command,
            text: command_line.clone(),
        }];
        let exit_code = match self.scripts.get(&command_line) {
            Some(script) => {
                for chunk in &script.chunks {
                    if let Some(observer) = on_output.as_deref_mut() {
                        observer(chunk);
                    }
                    records.push(chunk.clone());
                }
                script.exit_code
            }
            None => Some(0),
        };

        Ok(CommandResult { exit_code, records })
    }
}
