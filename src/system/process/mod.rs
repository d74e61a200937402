// src/system/process/mod.rs
//
// Platform backends for supervising one child process. Each backend exposes
// the same surface — `spawn`, then `poll_output` / `poll_exited` /
// `write_input` / `terminate` / `cleanup` on the returned handle — selected
// at build time, so the executor's state machine is platform-agnostic.
//
// - `unix`: the child's stdout and stderr share a single pipe whose read end
//   is switched to non-blocking mode and polled directly.
// - `windows`: the child's piped handles are drained by detached reader
//   threads into one channel that the poll loop inspects without blocking.

use thiserror::Error;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::{ChildHandle, spawn};

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::{ChildHandle, spawn};

/// Outcome of a single non-blocking read of the child's combined output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputPoll {
    /// `n` bytes were copied into the caller's buffer.
    Data(usize),
    /// Nothing available right now; the child may still produce more.
    Empty,
    /// The stream is closed; no further output will arrive.
    Eof,
}

#[derive(Error, Debug)]
pub enum SpawnError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Failed to create the output pipe: {0}")]
    Pipe(#[source] std::io::Error),
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Tokenizes a pre-assembled command line into a program and its arguments.
pub(crate) fn split_command(command: &str) -> Result<(String, Vec<String>), SpawnError> {
    let parts = shlex::split(command.trim())
        .ok_or_else(|| SpawnError::CommandParse(command.to_string()))?;
    let mut parts = parts.into_iter();
    let program = parts.next().ok_or(SpawnError::EmptyCommand)?;
    Ok((program, parts.collect()))
}
