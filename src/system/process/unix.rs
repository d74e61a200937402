// src/system/process/unix.rs
//
// Pipe-based backend. A single pipe carries the child's combined stdout and
// stderr: both streams are redirected onto the same write end, which is what
// a terminal-less ffmpeg expects, and the parent polls the read end in
// non-blocking mode.

use super::{OutputPoll, SpawnError, split_command};
use nix::errno::Errno;
use nix::fcntl::{FcntlArg, OFlag, fcntl};
use nix::unistd::{pipe, read};
use std::io::{self, Write};
use std::os::fd::{AsFd, OwnedFd};
use std::process::{Child, ChildStdin, Command, Stdio};

#[derive(Debug)]
pub struct ChildHandle {
    child: Child,
    output: OwnedFd,
    stdin: Option<ChildStdin>,
}

/// Launches the command with stdin piped and stdout+stderr joined onto one
/// non-blocking pipe. On any failure all created descriptors are released
/// before returning.
pub fn spawn(command: &str) -> Result<ChildHandle, SpawnError> {
    let (program, args) = split_command(command)?;

    let (read_end, write_end) = pipe().map_err(|e| SpawnError::Pipe(io::Error::from(e)))?;
    let stderr_end = write_end
        .try_clone()
        .map_err(SpawnError::Pipe)?;
    set_nonblocking(&read_end).map_err(SpawnError::Pipe)?;

    let mut child = Command::new(&program)
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::from(write_end))
        .stderr(Stdio::from(stderr_end))
        .spawn()
        .map_err(|e| SpawnError::Spawn { program, source: e })?;
    // The parent's copies of the write end were consumed by `Command` and are
    // closed when it drops at the end of this function, so EOF on `read_end`
    // tracks the child alone.

    let stdin = child.stdin.take();
    log::debug!("Spawned child process (PID: {})", child.id());

    Ok(ChildHandle {
        child,
        output: read_end,
        stdin,
    })
}

impl ChildHandle {
    /// One non-blocking read of the combined output stream.
    pub fn poll_output(&mut self, buf: &mut [u8]) -> io::Result<OutputPoll> {
        match read(self.output.as_fd(), buf) {
            Ok(0) => Ok(OutputPoll::Eof),
            Ok(n) => Ok(OutputPoll::Data(n)),
            Err(Errno::EAGAIN) | Err(Errno::EINTR) => Ok(OutputPoll::Empty),
            Err(e) => Err(io::Error::from(e)),
        }
    }

    /// Checks for process termination without blocking. Returns the exit code
    /// once the child has exited; a signal-killed child reports `-1`.
    pub fn poll_exited(&mut self) -> io::Result<Option<i32>> {
        Ok(self
            .child
            .try_wait()?
            .map(|status| status.code().unwrap_or(-1)))
    }

    /// Writes a reply into the child's stdin. A closed or already-taken write
    /// end makes this a silent no-op: the child may have stopped reading
    /// input on its own, which is not an error for the engine.
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
    /// Safe to call on every exit path; the output descriptor closes when the
    /// handle drops.
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

fn set_nonblocking<Fd: AsFd>(fd: &Fd) -> io::Result<()> {
    let flags = fcntl(fd.as_fd(), FcntlArg::F_GETFL).map_err(io::Error::from)?;
    let flags = OFlag::from_bits_truncate(flags);
    fcntl(fd.as_fd(), FcntlArg::F_SETFL(flags | OFlag::O_NONBLOCK))
        .map_err(io::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn drain_until_exit(handle: &mut ChildHandle) -> (Vec<u8>, i32) {
        let mut collected = Vec::new();
        let mut buf = [0u8; 256];
        let exit_code = loop {
            if let Some(code) = handle.poll_exited().unwrap() {
                break code;
            }
            while let OutputPoll::Data(n) = handle.poll_output(&mut buf).unwrap() {
                collected.extend_from_slice(&buf[..n]);
            }
            thread::sleep(Duration::from_millis(5));
        };
        // Final pass for bytes written right before exit.
        while let OutputPoll::Data(n) = handle.poll_output(&mut buf).unwrap() {
            collected.extend_from_slice(&buf[..n]);
        }
        (collected, exit_code)
    }

    #[test]
    fn stdout_and_stderr_share_one_stream() {
        let mut handle = spawn("sh -c 'echo out; echo err >&2'").unwrap();
        let (bytes, exit_code) = drain_until_exit(&mut handle);
        let text = String::from_utf8_lossy(&bytes);
        assert_eq!(exit_code, 0);
        assert!(text.contains("out"));
        assert!(text.contains("err"));
    }

    #[test]
    fn poll_output_is_nonblocking_while_child_is_quiet() {
        let mut handle = spawn("sleep 2").unwrap();
        let mut buf = [0u8; 64];
        assert_eq!(handle.poll_output(&mut buf).unwrap(), OutputPoll::Empty);
        handle.terminate();
        assert_eq!(handle.wait_exit(), -1);
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let result = spawn("definitely-not-a-real-binary-xyz");
        assert!(matches!(result, Err(SpawnError::Spawn { .. })));
    }

    #[test]
    fn write_input_unblocks_a_reading_child() {
        let mut handle = spawn("sh -c 'read answer; echo \"got $answer\"'").unwrap();
        handle.write_input("y\n");
        let (bytes, exit_code) = drain_until_exit(&mut handle);
        assert_eq!(exit_code, 0);
        assert!(String::from_utf8_lossy(&bytes).contains("got y"));
    }

    #[test]
    fn write_input_after_cleanup_is_a_noop() {
        let mut handle = spawn("sh -c 'exit 0'").unwrap();
        handle.cleanup();
        handle.write_input("ignored\n");
    }
}
