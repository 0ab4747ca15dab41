//! Non-blocking reader over a spawned command's standard output.
//!
//! A background thread reads complete lines and hands them to the UI thread
//! through a bounded channel. The UI thread only ever calls [`StreamReader::poll`],
//! which never blocks.

use crate::model::CommandError;
use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError};
use std::thread;
use tracing::{debug, warn};

/// Records buffered between the reader thread and the UI thread.
/// A full queue blocks the reader thread, which in turn blocks the command.
pub const QUEUE_CAPACITY: usize = 4096;

/// Result of one non-blocking poll.
#[derive(Debug)]
pub enum StreamEvent {
    /// One complete record, line terminator removed.
    Record(String),
    /// Nothing available yet; try again next tick.
    Pending,
    /// All output consumed and the command exited successfully.
    Eof,
    /// The command failed; no further records follow.
    Error(CommandError),
}

enum ReaderMessage {
    Record(String),
    Eof,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    /// Output pipe still open.
    Streaming,
    /// Output fully read, waiting for the process to exit.
    Exiting,
    /// Terminal event delivered or reader stopped.
    Done,
}

/// Owns a child process (if any) and the receiving end of its output queue.
pub struct StreamReader {
    command: String,
    child: Option<Child>,
    receiver: Option<Receiver<ReaderMessage>>,
    state: ReaderState,
}

impl std::fmt::Debug for StreamReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamReader")
            .field("command", &self.command)
            .field("pid", &self.child_id())
            .field("state", &self.state)
            .finish()
    }
}

impl StreamReader {
    /// Launch `command` through `sh -c` with stdout captured.
    ///
    /// On unix the shell leads its own process group, so [`stop`](Self::stop)
    /// reaches every member of a pipeline.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Spawn` if the shell cannot be launched or the
    /// reader thread cannot be started.
    pub fn start(command: &str) -> Result<Self, CommandError> {
        let spawn_error = |source| CommandError::Spawn {
            command: command.to_string(),
            source,
        };

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        let mut child = cmd.spawn().map_err(spawn_error)?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(spawn_error(std::io::Error::other("stdout not captured")));
        };

        let receiver = match spawn_reader_thread(stdout) {
            Ok(receiver) => receiver,
            Err(source) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(spawn_error(source));
            }
        };

        debug!(command, pid = child.id(), "Started command");

        Ok(Self {
            command: command.to_string(),
            child: Some(child),
            receiver: Some(receiver),
            state: ReaderState::Streaming,
        })
    }

    /// Stream records from any reader (piped stdin, tests). There is no
    /// process to wait for, so EOF is always a success.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Spawn` if the reader thread cannot be started.
    pub fn from_reader<R>(label: &str, reader: R) -> Result<Self, CommandError>
    where
        R: Read + Send + 'static,
    {
        let receiver = spawn_reader_thread(reader).map_err(|source| CommandError::Spawn {
            command: label.to_string(),
            source,
        })?;

        Ok(Self {
            command: label.to_string(),
            child: None,
            receiver: Some(receiver),
            state: ReaderState::Streaming,
        })
    }

    /// Resolved command line (or source label).
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Process id of the running command, if one is still owned.
    pub fn child_id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// True once a terminal event was delivered or the reader was stopped.
    pub fn is_finished(&self) -> bool {
        self.state == ReaderState::Done
    }

    /// Fetch the next record without blocking.
    ///
    /// Records arrive in the order the command produced them. After `Eof`
    /// or `Error`, further polls return `Eof`.
    pub fn poll(&mut self) -> StreamEvent {
        if self.state == ReaderState::Streaming {
            let Some(receiver) = &self.receiver else {
                self.state = ReaderState::Exiting;
                return self.poll_exit();
            };

            match receiver.try_recv() {
                Ok(ReaderMessage::Record(line)) => return StreamEvent::Record(line),
                Ok(ReaderMessage::Eof) | Err(TryRecvError::Disconnected) => {
                    self.receiver = None;
                    self.state = ReaderState::Exiting;
                }
                Ok(ReaderMessage::Failed(reason)) => {
                    warn!(command = %self.command, %reason, "Reading command output failed");
                    self.stop();
                    return StreamEvent::Error(CommandError::Read {
                        command: self.command.clone(),
                        reason,
                    });
                }
                Err(TryRecvError::Empty) => return StreamEvent::Pending,
            }
        }

        self.poll_exit()
    }

    fn poll_exit(&mut self) -> StreamEvent {
        if self.state == ReaderState::Done {
            return StreamEvent::Eof;
        }

        let Some(child) = self.child.as_mut() else {
            self.state = ReaderState::Done;
            return StreamEvent::Eof;
        };

        match child.try_wait() {
            Ok(None) => StreamEvent::Pending,
            Ok(Some(status)) => {
                self.child = None;
                self.state = ReaderState::Done;
                if status.success() {
                    debug!(command = %self.command, "Command finished");
                    StreamEvent::Eof
                } else {
                    warn!(command = %self.command, ?status, "Command failed");
                    StreamEvent::Error(CommandError::Exit {
                        command: self.command.clone(),
                        code: status.code(),
                    })
                }
            }
            Err(err) => {
                self.child = None;
                self.state = ReaderState::Done;
                StreamEvent::Error(CommandError::Read {
                    command: self.command.clone(),
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Terminate the command, including every process it started, and
    /// discard queued records.
    ///
    /// Safe mid-stream: dropping the receiver unblocks a reader thread that
    /// is waiting on a full queue, and the thread is never joined.
    pub fn stop(&mut self) {
        self.receiver = None;
        if let Some(mut child) = self.child.take() {
            if let Err(err) = kill_command(&mut child) {
                debug!(command = %self.command, %err, "Kill failed, process already exited");
            }
            if let Err(err) = child.wait() {
                warn!(command = %self.command, %err, "Failed to reap command");
            }
            debug!(command = %self.command, "Stopped command");
        }
        self.state = ReaderState::Done;
    }
}

impl Drop for StreamReader {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Signal the process group led by `child`.
#[cfg(unix)]
fn kill_command(child: &mut Child) -> std::io::Result<()> {
    let pgid = libc::pid_t::try_from(child.id())
        .map_err(|_| std::io::Error::other("process id out of range"))?;
    // SAFETY: killpg takes plain integers and touches no memory we own.
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn kill_command(child: &mut Child) -> std::io::Result<()> {
    child.kill()
}

fn spawn_reader_thread<R>(reader: R) -> std::io::Result<Receiver<ReaderMessage>>
where
    R: Read + Send + 'static,
{
    let (sender, receiver) = mpsc::sync_channel(QUEUE_CAPACITY);
    thread::Builder::new()
        .name("tigview-reader".to_string())
        .spawn(move || read_records(reader, sender))?;
    Ok(receiver)
}

fn read_records<R: Read>(reader: R, sender: SyncSender<ReaderMessage>) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                let _ = sender.send(ReaderMessage::Eof);
                return;
            }
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                let line = String::from_utf8_lossy(&buf).into_owned();
                if sender.send(ReaderMessage::Record(line)).is_err() {
                    // Receiver dropped: the view was stopped.
                    return;
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => {
                let _ = sender.send(ReaderMessage::Failed(err.to_string()));
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    /// Poll until a non-pending event arrives or two seconds pass.
    fn next_event(reader: &mut StreamReader) -> StreamEvent {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            match reader.poll() {
                StreamEvent::Pending if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(5));
                }
                event => return event,
            }
        }
    }

    fn collect(reader: &mut StreamReader) -> (Vec<String>, StreamEvent) {
        let mut records = Vec::new();
        loop {
            match next_event(reader) {
                StreamEvent::Record(line) => records.push(line),
                event => return (records, event),
            }
        }
    }

    #[test]
    fn from_reader_yields_lines_in_order() {
        let data = b"line1\nline2\nline3\n";
        let mut reader = StreamReader::from_reader("test", &data[..]).unwrap();

        let (records, end) = collect(&mut reader);
        assert_eq!(records, ["line1", "line2", "line3"]);
        assert!(matches!(end, StreamEvent::Eof));
        assert!(reader.is_finished());
    }

    #[test]
    fn final_unterminated_fragment_is_a_record() {
        let data = b"complete\npartial";
        let mut reader = StreamReader::from_reader("test", &data[..]).unwrap();

        let (records, end) = collect(&mut reader);
        assert_eq!(records, ["complete", "partial"]);
        assert!(matches!(end, StreamEvent::Eof));
    }

    #[test]
    fn crlf_is_stripped() {
        let data = b"dos line\r\n";
        let mut reader = StreamReader::from_reader("test", &data[..]).unwrap();
        let (records, _) = collect(&mut reader);
        assert_eq!(records, ["dos line"]);
    }

    #[test]
    fn empty_input_is_immediate_eof() {
        let data = b"";
        let mut reader = StreamReader::from_reader("test", &data[..]).unwrap();
        let (records, end) = collect(&mut reader);
        assert!(records.is_empty());
        assert!(matches!(end, StreamEvent::Eof));
    }

    #[test]
    fn blank_lines_are_records() {
        let data = b"a\n\n\nb\n";
        let mut reader = StreamReader::from_reader("test", &data[..]).unwrap();
        let (records, _) = collect(&mut reader);
        assert_eq!(records, ["a", "", "", "b"]);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let data: &[u8] = b"caf\xe9\n";
        let mut reader = StreamReader::from_reader("test", data).unwrap();
        let (records, _) = collect(&mut reader);
        assert_eq!(records.len(), 1);
        assert!(records[0].starts_with("caf"));
    }

    #[test]
    fn command_output_and_success() {
        let mut reader = StreamReader::start("printf 'one\\ntwo\\n'").unwrap();
        let (records, end) = collect(&mut reader);
        assert_eq!(records, ["one", "two"]);
        assert!(matches!(end, StreamEvent::Eof), "got {end:?}");
        assert!(reader.child_id().is_none(), "process handle released");
    }

    #[test]
    fn nonzero_exit_is_error_after_output() {
        let mut reader = StreamReader::start("echo partial; exit 3").unwrap();
        let (records, end) = collect(&mut reader);
        assert_eq!(records, ["partial"]);
        match end {
            StreamEvent::Error(CommandError::Exit { code, .. }) => assert_eq!(code, Some(3)),
            other => panic!("expected exit error, got {other:?}"),
        }
    }

    #[test]
    fn poll_after_terminal_event_is_eof() {
        let mut reader = StreamReader::start("true").unwrap();
        let (_, end) = collect(&mut reader);
        assert!(matches!(end, StreamEvent::Eof));
        assert!(matches!(reader.poll(), StreamEvent::Eof));
    }

    #[test]
    fn slow_command_reports_pending_first() {
        let mut reader = StreamReader::start("sleep 0.3; echo late").unwrap();
        assert!(matches!(reader.poll(), StreamEvent::Pending));
        let (records, _) = collect(&mut reader);
        assert_eq!(records, ["late"]);
    }

    #[test]
    fn stop_kills_running_command() {
        let mut reader = StreamReader::start("while true; do echo x; done").unwrap();
        let pid = reader.child_id().expect("running");
        assert!(matches!(next_event(&mut reader), StreamEvent::Record(_)));

        reader.stop();

        assert!(reader.is_finished());
        assert!(reader.child_id().is_none());
        assert!(matches!(reader.poll(), StreamEvent::Eof));
        #[cfg(target_os = "linux")]
        assert!(
            !std::path::Path::new(&format!("/proc/{pid}")).exists(),
            "process {pid} should be gone"
        );
        let _ = pid;
    }

    /// Pids of live processes whose argv is exactly `argv`.
    #[cfg(target_os = "linux")]
    fn processes_running(argv: &[&str]) -> Vec<u32> {
        let Ok(entries) = std::fs::read_dir("/proc") else {
            return Vec::new();
        };
        entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let pid = entry.file_name().to_str()?.parse::<u32>().ok()?;
                let cmdline = std::fs::read(entry.path().join("cmdline")).ok()?;
                let args: Vec<_> = cmdline
                    .split(|&b| b == 0)
                    .filter(|arg| !arg.is_empty())
                    .map(String::from_utf8_lossy)
                    .collect();
                (args == argv).then_some(pid)
            })
            .collect()
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn stop_kills_every_pipeline_member() {
        let argv = ["sleep", "41.731"];
        let mut reader = StreamReader::start("sleep 41.731 | cat").unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while processes_running(&argv).is_empty() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!processes_running(&argv).is_empty(), "pipeline did not start");

        let started = Instant::now();
        reader.stop();
        assert!(started.elapsed() < Duration::from_secs(2));

        let deadline = Instant::now() + Duration::from_secs(2);
        while !processes_running(&argv).is_empty() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(processes_running(&argv), Vec::<u32>::new(), "sleep left running");
    }

    #[test]
    fn stop_with_full_queue_does_not_hang() {
        let mut reader = StreamReader::start("yes").unwrap();
        thread::sleep(Duration::from_millis(100));
        let started = Instant::now();
        reader.stop();
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
