use eduplus_core::{BarcodeError, Result};
use std::ffi::OsString;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

/// Extra time to drain pipes after a child exits right at its deadline
const DRAIN_GRACE: Duration = Duration::from_millis(100);

/// Options for running the external binary
#[derive(Debug, Clone)]
pub struct ExecOptions {
    pub binary: PathBuf,
    /// Passed to the child verbatim, one argv entry each; no shell is involved
    pub args: Vec<OsString>,
    /// Bounds the whole call, output collection included; `None` waits
    /// indefinitely
    pub timeout: Option<Duration>,
}

/// Result of a finished child process
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// `None` when the child was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Both streams in the order their chunks were read
    pub output: String,
    pub duration_ms: u64,
}

impl ExecResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stdout and stderr as one stream, unmodified
    pub fn combined_output(&self) -> String {
        self.output.clone()
    }

    pub fn has_output(&self) -> bool {
        !self.stdout.trim().is_empty() || !self.stderr.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

type Chunk = (Stream, Vec<u8>);

/// Forward everything read from `pipe` to `tx`; the sender drops at EOF
fn spawn_reader<R>(pipe: Option<R>, stream: Stream, tx: Sender<Chunk>)
where
    R: Read + Send + 'static,
{
    let Some(mut pipe) = pipe else {
        return;
    };

    std::thread::spawn(move || {
        let mut buf = [0u8; 8192];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send((stream, buf[..n].to_vec())).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
    });
}

#[derive(Default)]
struct Captured {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    output: Vec<u8>,
}

impl Captured {
    fn push(&mut self, (stream, bytes): Chunk) {
        match stream {
            Stream::Stdout => self.stdout.extend_from_slice(&bytes),
            Stream::Stderr => self.stderr.extend_from_slice(&bytes),
        }
        self.output.extend_from_slice(&bytes);
    }

    /// Receive until every reader has hit EOF or `deadline` passes
    ///
    /// Returns `false` when the deadline cut collection short, which happens
    /// when a descendant of the child still holds the pipes open.
    fn drain(&mut self, rx: &Receiver<Chunk>, deadline: Option<Instant>) -> bool {
        loop {
            let chunk = match deadline {
                Some(deadline) => {
                    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                        Ok(chunk) => chunk,
                        Err(RecvTimeoutError::Disconnected) => return true,
                        Err(RecvTimeoutError::Timeout) => return false,
                    }
                }
                None => match rx.recv() {
                    Ok(chunk) => chunk,
                    Err(_) => return true,
                },
            };
            self.push(chunk);
        }
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Kill and reap; the child may already be gone
fn terminate(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Run the binary to completion, capturing both output streams in full
///
/// Output is collected before the exit status is inspected. The timeout
/// covers the whole call:
/// - if the child is still running when it elapses, the child is killed and
///   reaped and `ExecTimeout` is returned;
/// - if the child exited but a process it left behind keeps the pipes open,
///   collection stops at the deadline and the output read so far is returned.
pub fn exec_binary(options: &ExecOptions) -> Result<ExecResult> {
    let started = Instant::now();
    let deadline = options.timeout.map(|limit| started + limit);

    let mut child = Command::new(&options.binary)
        .args(&options.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| BarcodeError::ExecSpawnFailed {
            binary: options.binary.clone(),
            reason: e.to_string(),
        })?;

    let (tx, rx) = mpsc::channel();
    spawn_reader(child.stdout.take(), Stream::Stdout, tx.clone());
    spawn_reader(child.stderr.take(), Stream::Stderr, tx);

    let waited = match options.timeout {
        Some(limit) => child.wait_timeout(limit),
        None => child.wait().map(Some),
    };
    let status = match waited {
        Ok(Some(status)) => status,
        Ok(None) => {
            terminate(&mut child);
            let limit = options.timeout.unwrap_or_default();
            log::warn!(
                "{} exceeded {:?} and was killed",
                options.binary.display(),
                limit
            );
            return Err(BarcodeError::ExecTimeout { limit });
        }
        Err(e) => {
            terminate(&mut child);
            return Err(e.into());
        }
    };

    let mut captured = Captured::default();
    let drain_deadline = deadline.map(|deadline| deadline.max(Instant::now() + DRAIN_GRACE));
    if !captured.drain(&rx, drain_deadline) {
        log::warn!(
            "{} exited but its output pipes are still held open; returning partial output",
            options.binary.display()
        );
    }

    Ok(ExecResult {
        exit_code: status.code(),
        stdout: lossy(&captured.stdout),
        stderr: lossy(&captured.stderr),
        output: lossy(&captured.output),
        duration_ms: started.elapsed().as_millis() as u64,
    })
}
