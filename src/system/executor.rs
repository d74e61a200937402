// src/system/executor.rs

use crate::constants::{OVERWRITE_REPLY, POLL_INTERVAL, READ_CHUNK_SIZE};
use crate::system::classify;
use crate::system::lines::LineAssembler;
use crate::system::process::{self, ChildHandle, OutputPoll};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// Reported when `execute` is called while a previous run is still active.
const BUSY_MESSAGE: &str = "An ffmpeg command is already running.";

/// Immutable input for one run: a fully pre-assembled command line and the
/// auto-respond policy for overwrite prompts.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub command: String,
    pub auto_overwrite: bool,
}

impl ExecutionRequest {
    pub fn new(command: impl Into<String>, auto_overwrite: bool) -> Self {
        Self {
            command: command.into(),
            auto_overwrite,
        }
    }
}

/// The finalized outcome of one run. Every failure mode of the engine is
/// encoded here; `execute` never panics or returns a `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// True if a completion marker was seen in the output, or the process
    /// exited with status 0. A marker is never downgraded by a later
    /// non-zero exit code.
    pub success: bool,
    /// The child's exit status; `-1` while unknown, if the child was killed
    /// by a signal, or if it could not be spawned at all.
    pub exit_code: i32,
    /// Every reassembled output line, newline-joined, in arrival order.
    pub output: String,
    /// The most recent line classified as an error; empty if none.
    pub error: String,
    /// Whether an overwrite prompt was observed.
    pub overwrite_prompted: bool,
    /// Whether the engine answered the prompt.
    pub overwrite_confirmed: bool,
}

impl ExecutionResult {
    fn busy() -> Self {
        Self {
            success: false,
            exit_code: -1,
            output: String::new(),
            error: BUSY_MESSAGE.to_string(),
            overwrite_prompted: false,
            overwrite_confirmed: false,
        }
    }
}

/// State shared between the calling thread and the I/O pump for the duration
/// of one run. The output accumulator and the error slot each have their own
/// lock so line classification could fan out without contention; the caller
/// only reads after the pump thread has been joined.
#[derive(Debug, Default)]
struct RunState {
    output: Mutex<Vec<String>>,
    last_error: Mutex<String>,
    overwrite_prompted: AtomicBool,
    overwrite_confirmed: AtomicBool,
    success_marker: AtomicBool,
}

impl RunState {
    fn push_line(&self, line: String) {
        self.output.lock().unwrap().push(line);
    }

    fn record_error(&self, message: String) {
        *self.last_error.lock().unwrap() = message;
    }
}

/// Supervises one external ffmpeg run at a time: spawns the child with its
/// standard streams redirected, pumps its combined output through the line
/// classifier on a background thread, answers overwrite prompts when asked
/// to, and aggregates everything into an [`ExecutionResult`].
///
/// The engine is deliberately one-shot: a second `execute` while a run is in
/// progress fails fast with a busy result instead of queueing. There is no
/// built-in timeout; a caller wanting a deadline must invoke [`stop`] from
/// another thread.
///
/// [`stop`]: FfmpegExecutor::stop
#[derive(Debug, Default)]
pub struct FfmpegExecutor {
    running: Arc<AtomicBool>,
    stop_requested: Arc<AtomicBool>,
}

impl FfmpegExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the command to completion and returns the aggregated result.
    ///
    /// Blocks the caller for the lifetime of the child process. With
    /// `auto_overwrite` disabled in the request, a child that asks an
    /// overwrite question will wait forever for an answer that never comes;
    /// callers must either enable the policy, confirm the overwrite up
    /// front, or arrange an external `stop`.
    pub fn execute(&self, request: ExecutionRequest) -> ExecutionResult {
        // First caller wins; everyone else gets the busy result immediately.
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::debug!("Rejected execute call: a run is already in progress");
            return ExecutionResult::busy();
        }
        self.stop_requested.store(false, Ordering::SeqCst);

        log::debug!("Executing: {}", request.command);
        let state = Arc::new(RunState::default());

        let pump_state = Arc::clone(&state);
        let stop = Arc::clone(&self.stop_requested);
        let worker = thread::Builder::new()
            .name("ffkit-io-pump".to_string())
            .spawn(move || run_pump(&request, &pump_state, &stop));

        let exit_code = match worker {
            Ok(handle) => handle.join().unwrap_or(-1),
            Err(e) => {
                state.record_error(format!("Failed to start the I/O worker thread: {e}"));
                -1
            }
        };

        let result = assemble_result(&state, exit_code);
        self.running.store(false, Ordering::SeqCst);
        result
    }

    /// Non-blocking status query.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Requests cancellation of the run in progress. The pump kills the child
    /// within one poll interval; the blocked `execute` caller then returns
    /// with whatever output had been collected. Safe to call from any thread,
    /// and harmless when nothing is running.
    pub fn stop(&self) {
        log::debug!("Stop requested");
        self.stop_requested.store(true, Ordering::SeqCst);
    }
}

fn assemble_result(state: &RunState, exit_code: i32) -> ExecutionResult {
    let output = state.output.lock().unwrap().join("\n");
    let error = state.last_error.lock().unwrap().clone();
    let marker = state.success_marker.load(Ordering::SeqCst);
    ExecutionResult {
        // A clean exit counts as success even without a marker; a marker
        // counts even when the exit code disagrees (ffmpeg occasionally
        // returns non-zero after completing useful work).
        success: marker || exit_code == 0,
        exit_code,
        output,
        error,
        overwrite_prompted: state.overwrite_prompted.load(Ordering::SeqCst),
        overwrite_confirmed: state.overwrite_confirmed.load(Ordering::SeqCst),
    }
}

/// The I/O pump: spawn, poll-and-read until exit or stop, drain, release.
/// Returns the child's exit code, `-1` when it could not be spawned or was
/// killed by a signal.
fn run_pump(request: &ExecutionRequest, state: &RunState, stop: &AtomicBool) -> i32 {
    let mut child = match process::spawn(&request.command) {
        Ok(child) => child,
        Err(e) => {
            log::debug!("Spawn failed: {}", e);
            state.record_error(e.to_string());
            return -1;
        }
    };

    let mut assembler = LineAssembler::new();
    let mut buf = [0u8; READ_CHUNK_SIZE];
    let mut exit_code = None;

    loop {
        if stop.load(Ordering::SeqCst) {
            child.terminate();
            break;
        }
        match child.poll_exited() {
            Ok(Some(code)) => {
                exit_code = Some(code);
                break;
            }
            Ok(None) => {}
            Err(e) => {
                state.record_error(format!("Failed to query child status: {e}"));
                child.terminate();
                break;
            }
        }
        drain_available(&mut child, &mut assembler, &mut buf, state, request.auto_overwrite);
        thread::sleep(POLL_INTERVAL);
    }

    // Flush output produced between the last poll and process exit, then
    // surface a trailing line that never got its newline.
    drain_available(&mut child, &mut assembler, &mut buf, state, request.auto_overwrite);
    if let Some(line) = assembler.take_remainder() {
        process_line(line, state, &mut child, request.auto_overwrite);
    }

    let code = exit_code.unwrap_or_else(|| child.wait_exit());
    child.cleanup();
    code
}

/// Reads everything currently available from the child without blocking.
fn drain_available(
    child: &mut ChildHandle,
    assembler: &mut LineAssembler,
    buf: &mut [u8],
    state: &RunState,
    auto_overwrite: bool,
) {
    loop {
        match child.poll_output(buf) {
            Ok(OutputPoll::Data(n)) => {
                for line in assembler.feed(&buf[..n]) {
                    process_line(line, state, child, auto_overwrite);
                }
            }
            Ok(OutputPoll::Empty) | Ok(OutputPoll::Eof) => break,
            Err(e) => {
                log::debug!("Read from child output failed: {}", e);
                break;
            }
        }
    }
}

/// Runs one completed line through all three classifiers and updates the
/// shared state. The predicates are independent; a line may hit several.
fn process_line(line: String, state: &RunState, child: &mut ChildHandle, auto_overwrite: bool) {
    if classify::is_overwrite_prompt(&line) {
        state.overwrite_prompted.store(true, Ordering::SeqCst);
        if auto_overwrite {
            state.overwrite_confirmed.store(true, Ordering::SeqCst);
            child.write_input(OVERWRITE_REPLY);
        }
    }
    if classify::is_error_line(&line) {
        state.record_error(line.clone());
    }
    if classify::is_success_marker(&line) {
        state.success_marker.store(true, Ordering::SeqCst);
    }
    state.push_line(line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn run(command: &str, auto_overwrite: bool) -> ExecutionResult {
        FfmpegExecutor::new().execute(ExecutionRequest::new(command, auto_overwrite))
    }

    #[test]
    fn clean_exit_with_no_output() {
        let result = run("true", true);
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.output, "");
        assert_eq!(result.error, "");
        assert!(!result.overwrite_prompted);
        assert!(!result.overwrite_confirmed);
    }

    #[test]
    fn output_lines_arrive_in_order() {
        let result = run("sh -c 'echo one; echo two; echo three'", true);
        assert_eq!(result.output, "one\ntwo\nthree");
        assert!(result.success);
    }

    #[test]
    fn crlf_output_is_normalized() {
        let result = run(r#"sh -c 'printf "a\r\nb\r\n"'"#, true);
        assert_eq!(result.output, "a\nb");
    }

    #[test]
    fn trailing_line_without_newline_is_flushed() {
        let result = run(r#"sh -c 'printf "no newline here"'"#, true);
        assert_eq!(result.output, "no newline here");
        assert!(result.success);
    }

    #[test]
    fn error_line_is_recorded_without_aborting() {
        let result = run(
            "sh -c 'echo \"Error while decoding stream\"; echo recovered; exit 0'",
            true,
        );
        assert_eq!(result.error, "Error while decoding stream");
        assert!(result.output.contains("recovered"));
        // An error line is informational; a clean exit still succeeds.
        assert!(result.success);
    }

    #[test]
    fn most_recent_error_line_wins() {
        let result = run(
            "sh -c 'echo \"Unknown encoder x\"; echo \"Conversion failed!\"; exit 1'",
            true,
        );
        assert_eq!(result.error, "Conversion failed!");
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn auto_overwrite_answers_the_prompt() {
        let result = run(
            "sh -c 'echo \"File x.mp4 already exists. Overwrite? [y/N]\"; read reply; echo \"reply=$reply\"'",
            true,
        );
        assert!(result.overwrite_prompted);
        assert!(result.overwrite_confirmed);
        assert!(result.output.contains("reply=y"));
        assert!(result.success);
    }

    #[test]
    fn disabled_policy_records_the_prompt_without_answering() {
        // The child here does not block on stdin, so the documented
        // unanswered-prompt hang does not apply.
        let result = run("sh -c 'echo \"Overwrite? (y/n)\"; exit 0'", false);
        assert!(result.overwrite_prompted);
        assert!(!result.overwrite_confirmed);
    }

    #[test]
    fn success_marker_survives_nonzero_exit() {
        // Documented lenience: ffmpeg can report a non-zero status after
        // completing useful work, and the marker takes precedence.
        let result = run(
            "sh -c 'echo \"video:10kB audio:2kB subtitle:0kB other streams:0kB\"; exit 3'",
            true,
        );
        assert!(result.success);
        assert_eq!(result.exit_code, 3);
    }

    #[test]
    fn nonzero_exit_without_marker_fails() {
        let result = run("sh -c 'exit 2'", true);
        assert!(!result.success);
        assert_eq!(result.exit_code, 2);
    }

    #[test]
    fn concurrent_execute_fails_fast_with_busy() {
        let executor = Arc::new(FfmpegExecutor::new());

        let first = {
            let executor = Arc::clone(&executor);
            thread::spawn(move || executor.execute(ExecutionRequest::new("sleep 1", true)))
        };
        // Give the first run time to take the running flag.
        while !executor.is_running() {
            thread::sleep(Duration::from_millis(5));
        }

        let started = Instant::now();
        let second = executor.execute(ExecutionRequest::new("true", true));
        assert!(!second.success);
        assert_eq!(second.exit_code, -1);
        assert_eq!(second.error, BUSY_MESSAGE);
        // The busy result must come back immediately, not after the first run.
        assert!(started.elapsed() < Duration::from_millis(500));

        let first = first.join().unwrap();
        assert!(first.success);
        assert_eq!(first.exit_code, 0);
    }

    #[test]
    fn stop_terminates_the_child_promptly() {
        let executor = Arc::new(FfmpegExecutor::new());

        let worker = {
            let executor = Arc::clone(&executor);
            thread::spawn(move || executor.execute(ExecutionRequest::new("sleep 30", true)))
        };
        while !executor.is_running() {
            thread::sleep(Duration::from_millis(5));
        }

        let started = Instant::now();
        executor.stop();
        let result = worker.join().unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(!result.success);
        assert_eq!(result.exit_code, -1);
        assert!(!executor.is_running());
    }

    #[test]
    fn spawn_failure_is_reported_in_the_result() {
        let executor = FfmpegExecutor::new();
        let result = executor.execute(ExecutionRequest::new(
            "definitely-not-a-real-binary-xyz -i a b",
            true,
        ));
        assert!(!result.success);
        assert_eq!(result.exit_code, -1);
        assert!(result.error.contains("definitely-not-a-real-binary-xyz"));
        assert_eq!(result.output, "");
        assert!(!executor.is_running());
    }

    #[test]
    fn unparsable_command_is_a_spawn_failure() {
        let result = run("ffmpeg -i 'unterminated", true);
        assert!(!result.success);
        assert_eq!(result.exit_code, -1);
        assert!(!result.error.is_empty());
    }

    #[test]
    fn executor_is_reusable_after_a_run() {
        let executor = FfmpegExecutor::new();
        let first = executor.execute(ExecutionRequest::new("true", true));
        assert!(first.success);
        let second = executor.execute(ExecutionRequest::new("sh -c 'echo again'", true));
        assert!(second.success);
        assert_eq!(second.output, "again");
    }

    #[test]
    fn stop_without_a_run_is_harmless() {
        let executor = FfmpegExecutor::new();
        executor.stop();
        // The stale stop request must not cancel the next run.
        let result = executor.execute(ExecutionRequest::new("true", true));
        assert!(result.success);
    }
}
