// src/system/process/windows.rs
//
// Handle-based backend. Anonymous pipe handles cannot be polled for readiness
// without direct Win32 calls, so the child's stdout and stderr are each
// drained by a detached reader thread feeding one channel. `try_recv` on that
// channel gives the poll loop the same non-blocking view of a combined stream
// that the Unix backend gets from its O_NONBLOCK pipe.

use super::{OutputPoll, SpawnError, split_command};
use crate::constants::READ_CHUNK_SIZE;
use std::io::{self, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread;

#[derive(Debug)]
pub struct ChildHandle {
    child: Child,
    output_rx: Receiver<Vec<u8>>,
    stdin: Option<ChildStdin>,
}

/// Launches the command with all three standard streams piped and starts the
/// reader threads. The threads exit on their own when the pipes close, so
/// they are not joined.
pub fn spawn(command: &str) -> Result<ChildHandle, SpawnError> {
    let (program, args) = split_command(command)?;

    let mut child = Command::new(&program)
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| SpawnError::Spawn { program, source: e })?;

    let (tx, output_rx) = channel();
    if let Some(stdout) = child.stdout.take() {
        spawn_reader(stdout, tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_reader(stderr, tx);
    }
    // Both sender clones must be dropped for the receiver to report
    // disconnection, which is why the original `tx` moves into a reader.

    let stdin = child.stdin.take();
    log::debug!("Spawned child process (PID: {})", child.id());

    Ok(ChildHandle {
        child,
        output_rx,
        stdin,
    })
}

fn spawn_reader<R: Read + Send + 'static>(mut source: R, tx: Sender<Vec<u8>>) {
    thread::spawn(move || {
        let mut buf = [0u8; READ_CHUNK_SIZE];
        loop {
            match source.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
    });
}

impl ChildHandle {
    /// One non-blocking poll of the combined output channel.
    pub fn poll_output(&mut self, buf: &mut [u8]) -> io::Result<OutputPoll> {
        match self.output_rx.try_recv() {
            Ok(chunk) => {
                let n = chunk.len().min(buf.len());
                if let (Some(dst), Some(src)) = (buf.get_mut(..n), chunk.get(..n)) {
                    dst.copy_from_slice(src);
                }
                Ok(OutputPoll::Data(n))
            }
            Err(TryRecvError::Empty) => Ok(OutputPoll::Empty),
            Err(TryRecvError::Disconnected) => Ok(OutputPoll::Eof),
        }
    }

    /// Checks for process termination without blocking. Returns the exit code
    /// once the child has exited.
    pub fn poll_exited(&mut self) -> io::Result<Option<i32>> {
        Ok(self
            .child
            .try_wait()?
            .map(|status| status.code().unwrap_or(-1)))
    }

    /// Writes a reply into the child's stdin. A closed or already-taken write
    /// end makes this a silent no-op.
    pub fn write_input(&mut self, text: &str) {
        if let Some(stdin) = self.stdin.as_mut() {
            if let Err(e) = stdin.write_all(text.as_bytes()).and_then(|()| stdin.flush()) {
                log::debug!("Could not write to child stdin: {}", e);
            }
        }
    }

    /// Forcibly terminates the child.
    pub fn terminate(&mut self) {
        log::debug!("Terminating child process (PID: {})", self.child.id());
        if let Err(e) = self.child.kill() {
            log::warn!("Failed to kill child process {}: {}", self.child.id(), e);
        }
    }

    /// Blocks until the child is reaped and returns its exit code. Used after
    /// a kill, where the wait is brief.
    pub fn wait_exit(&mut self) -> i32 {
        match self.child.wait() {
            Ok(status) => status.code().unwrap_or(-1),
            Err(e) => {
                log::warn!("Failed to wait for child process: {}", e);
                -1
            }
        }
    }

    /// Releases the stdin handle and reaps the child if it is still running.
    /// The reader threads notice the closed pipes and exit on their own.
    pub fn cleanup(&mut self) {
        drop(self.stdin.take());
        if let Ok(None) = self.child.try_wait() {
            self.terminate();
            self.wait_exit();
        }
    }
}

impl Drop for ChildHandle {
    fn drop(&mut self) {
        self.cleanup();
    }
}
