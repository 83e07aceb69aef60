use std::ffi::OsString;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Flags appended to every tagging invocation, before the input path
pub const CONLL_FLAGS: [&str; 2] = ["--output-format", "conll"];

const WAIT_POLL: Duration = Duration::from_millis(5);

const RUNNING: u8 = 0;
const TIMED_OUT: u8 = 1;
const CANCELLED: u8 = 2;
const EXITED: u8 = 3;

/// Split a command template with shell quoting rules.
pub fn split_command(command: &str) -> Result<Vec<String>> {
    let argv = shlex::split(command).ok_or_else(|| Error::InvalidCommand {
        command: command.to_string(),
        reason: "unbalanced quotes or trailing escape".to_string(),
    })?;
    if argv.is_empty() {
        return Err(Error::InvalidCommand {
            command: command.to_string(),
            reason: "empty command".to_string(),
        });
    }
    Ok(argv)
}

/// One tagger run: the base command and the file it should tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationSpec {
    pub command: String,
    pub input: PathBuf,
}

impl InvocationSpec {
    pub fn new(command: impl Into<String>, input: impl AsRef<Path>) -> Self {
        Self {
            command: command.into(),
            input: input.as_ref().to_path_buf(),
        }
    }

    /// Full argument vector, program first
    pub fn args(&self) -> Result<Vec<OsString>> {
        let mut argv: Vec<OsString> = split_command(&self.command)?
            .into_iter()
            .map(OsString::from)
            .collect();
        argv.extend(CONLL_FLAGS.iter().map(OsString::from));
        argv.push(self.input.clone().into_os_string());
        Ok(argv)
    }

    /// Launch the tagger and return its stdout as a lazy line stream.
    ///
    /// With a `timeout`, a watchdog kills the child once the deadline passes
    /// and the stream ends with [`Error::Timeout`].
    pub fn spawn(&self, timeout: Option<Duration>) -> Result<TaggerLines> {
        if !self.input.is_file() {
            return Err(Error::InvalidInput(format!(
                "input is not a readable file: {}",
                self.input.display()
            )));
        }
        let argv = self.args()?;
        debug!("Launching tagger: {:?}", argv);

        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        // Own process group, so a launcher script and its JVM die together.
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut cmd, 0);
        let mut child = cmd
            .spawn()
            .map_err(|source| Error::ToolNotFound {
                command: self.command.clone(),
                source,
            })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            Error::Io(std::io::Error::other("tagger stdout was not captured"))
        })?;

        let child = Arc::new(Mutex::new(child));
        let state = Arc::new(AtomicU8::new(RUNNING));
        let watchdog = timeout.map(|limit| spawn_watchdog(limit, &child, &state));

        Ok(TaggerLines {
            command: self.command.clone(),
            reader: BufReader::new(stdout),
            child,
            state,
            timeout,
            watchdog,
            finished: false,
            line: Vec::new(),
        })
    }
}

fn lock(child: &Mutex<Child>) -> MutexGuard<'_, Child> {
    child.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Kill the child and everything else in its process group.
/// Only valid while the child has not been reaped.
fn kill_group(child: &mut Child) {
    #[cfg(unix)]
    if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
        // SAFETY: killpg only sends a signal; the group id is the unreaped
        // child's pid, so it cannot have been recycled.
        unsafe {
            libc::killpg(pgid, libc::SIGKILL);
        }
    }
    let _ = child.kill();
}

/// Move a running child to `to` and kill its group. The child lock is held
/// across the transition so a child reaped in `wait_child` is never killed.
fn stop_running(child: &Mutex<Child>, state: &AtomicU8, to: u8) -> bool {
    let mut child = lock(child);
    if state
        .compare_exchange(RUNNING, to, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return false;
    }
    kill_group(&mut child);
    true
}

fn spawn_watchdog(
    limit: Duration,
    child: &Arc<Mutex<Child>>,
    state: &Arc<AtomicU8>,
) -> (Sender<()>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel::<()>();
    let child = Arc::clone(child);
    let state = Arc::clone(state);
    let handle = thread::spawn(move || {
        if let Err(RecvTimeoutError::Timeout) = rx.recv_timeout(limit) {
            if stop_running(&child, &state, TIMED_OUT) {
                warn!("Tagger exceeded {:?}, killed it", limit);
            }
        }
    });
    (tx, handle)
}

/// Kills a running tagger from another thread
#[derive(Clone)]
pub struct CancelHandle {
    child: Arc<Mutex<Child>>,
    state: Arc<AtomicU8>,
}

impl CancelHandle {
    /// Terminate the tagger. The stream it belongs to ends with
    /// [`Error::Cancelled`]; lines already read must not be trusted.
    pub fn cancel(&self) {
        stop_running(&self.child, &self.state, CANCELLED);
    }
}

/// Lines of tagger stdout, tied to the child's lifetime and read once.
///
/// The final item (if any) reports how the child ended: an abnormal exit,
/// a timeout or a cancellation. Dropping the stream early kills the child.
pub struct TaggerLines {
    command: String,
    reader: BufReader<ChildStdout>,
    child: Arc<Mutex<Child>>,
    state: Arc<AtomicU8>,
    timeout: Option<Duration>,
    watchdog: Option<(Sender<()>, JoinHandle<()>)>,
    finished: bool,
    line: Vec<u8>,
}

impl TaggerLines {
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            child: Arc::clone(&self.child),
            state: Arc::clone(&self.state),
        }
    }

    // Poll so the watchdog can take the lock and kill between checks. The
    // state leaves RUNNING under the same lock that reaps the child.
    fn wait_child(&self) -> std::io::Result<ExitStatus> {
        loop {
            {
                let mut child = lock(&self.child);
                if let Some(status) = child.try_wait()? {
                    let _ = self.state.compare_exchange(
                        RUNNING,
                        EXITED,
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                    );
                    return Ok(status);
                }
            }
            thread::sleep(WAIT_POLL);
        }
    }

    fn stop_watchdog(&mut self) {
        if let Some((tx, handle)) = self.watchdog.take() {
            drop(tx);
            let _ = handle.join();
        }
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        let status = self.wait_child();
        self.stop_watchdog();

        match self.state.load(Ordering::SeqCst) {
            TIMED_OUT => {
                return Err(Error::Timeout {
                    command: self.command.clone(),
                    secs: self.timeout.map(|d| d.as_secs()).unwrap_or_default(),
                });
            }
            CANCELLED => {
                return Err(Error::Cancelled {
                    command: self.command.clone(),
                });
            }
            _ => {}
        }

        let status = status?;
        if !status.success() {
            return Err(Error::ToolInvocation {
                command: self.command.clone(),
                status,
            });
        }
        debug!("Tagger finished: {}", status);
        Ok(())
    }
}

impl Iterator for TaggerLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        self.line.clear();
        match self.reader.read_until(b'\n', &mut self.line) {
            Ok(0) => self.finish().err().map(Err),
            Ok(_) => {
                let mut end = self.line.len();
                if self.line[..end].ends_with(b"\n") {
                    end -= 1;
                }
                if self.line[..end].ends_with(b"\r") {
                    end -= 1;
                }
                Some(Ok(String::from_utf8_lossy(&self.line[..end]).into_owned()))
            }
            Err(e) => {
                // A killed child surfaces as its kill reason, not the pipe error.
                let reason = self.finish().err();
                Some(Err(reason.unwrap_or(Error::Io(e))))
            }
        }
    }
}

impl Drop for TaggerLines {
    fn drop(&mut self) {
        if !self.finished {
            let mut child = lock(&self.child);
            // Not reaped yet: the group id is still ours even if the
            // watchdog already fired.
            kill_group(&mut child);
            let _ = child.wait();
            drop(child);
            self.stop_watchdog();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_append_conll_flags_and_path() {
        let spec = InvocationSpec::new(
            "java -XX:ParallelGCThreads=2 -Xmx500m -jar 'ark tweet.jar'",
            "tweets.txt",
        );
        let argv = spec.args().unwrap();
        let argv: Vec<&str> = argv.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(
            argv,
            vec![
                "java",
                "-XX:ParallelGCThreads=2",
                "-Xmx500m",
                "-jar",
                "ark tweet.jar",
                "--output-format",
                "conll",
                "tweets.txt",
            ]
        );
    }

    #[test]
    fn untokenizable_command_is_rejected() {
        assert!(matches!(
            split_command("java -jar 'unterminated"),
            Err(Error::InvalidCommand { .. })
        ));
        assert!(matches!(
            split_command("   "),
            Err(Error::InvalidCommand { .. })
        ));
    }

    #[test]
    fn missing_input_file_is_rejected_before_spawn() {
        let spec = InvocationSpec::new("java -jar ark.jar", "/definitely/not/here.txt");
        assert!(matches!(spec.spawn(None), Err(Error::InvalidInput(_))));
    }

    #[cfg(unix)]
    #[test]
    fn late_watchdog_does_not_kill_a_reaped_child() {
        let input = tempfile::NamedTempFile::new().unwrap();
        let spec = InvocationSpec::new("sh -c 'exit 0'", input.path());
        let mut lines = spec.spawn(None).unwrap();

        assert!(lines.wait_child().unwrap().success());
        assert!(!stop_running(&lines.child, &lines.state, TIMED_OUT));
        assert_eq!(lines.state.load(Ordering::SeqCst), EXITED);
        assert!(lines.next().is_none());
    }

    #[test]
    fn missing_executable_is_tool_not_found() {
        let input = tempfile::NamedTempFile::new().unwrap();
        let spec = InvocationSpec::new("/nonexistent/arktag-runTagger", input.path());
        match spec.spawn(None) {
            Err(Error::ToolNotFound { command, .. }) => {
                assert_eq!(command, "/nonexistent/arktag-runTagger")
            }
            Err(other) => panic!("expected ToolNotFound, got {:?}", other),
            Ok(_) => panic!("expected ToolNotFound, got a running tagger"),
        }
    }
}
