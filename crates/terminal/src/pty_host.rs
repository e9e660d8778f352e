//! PTY process management.

use crate::host::{HostEvent, HostEventSender, ProcessHost};
use crate::types::{SessionId, TermSize};
use anyhow::{Context, Result};
use collections::FxHashMap;
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use settings::constants::terminal::{READ_BUFFER_SIZE, TERM_ENV};
use settings::Invocation;
use std::io::{ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// The shell used when an invocation leaves the command unset.
///
/// Unix uses `$SHELL`, falling back to `bash`. Windows uses the configured shell.
pub fn platform_default_shell(windows_shell: &str) -> String {
    if cfg!(target_os = "windows") {
        windows_shell.to_string()
    } else {
        std::env::var("SHELL")
            .ok()
            .filter(|shell| !shell.trim().is_empty())
            .unwrap_or_else(|| "bash".to_string())
    }
}

fn pty_size(size: TermSize) -> PtySize {
    PtySize {
        rows: size.rows,
        cols: size.cols,
        pixel_width: 0,
        pixel_height: 0,
    }
}

/// One live PTY and its child.
///
/// Dropping it kills and reaps the child. The reader thread is not joined;
/// it exits once the PTY reports EOF.
struct PtySession {
    master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    child: Box<dyn Child + Send + Sync>,
    closed: Arc<AtomicBool>,
    _reader_thread: thread::JoinHandle<()>,
}

impl PtySession {
    fn spawn(
        id: &SessionId,
        invocation: &Invocation,
        default_shell: &str,
        events: HostEventSender,
    ) -> Result<Self> {
        let pty_system = native_pty_system();

        let pair = pty_system
            .openpty(pty_size(TermSize::default()))
            .context("Failed to open PTY")?;

        let program = invocation.command.as_deref().unwrap_or(default_shell);
        let mut cmd = CommandBuilder::new(program);
        cmd.args(&invocation.args);
        cmd.env("TERM", TERM_ENV);

        let mut child = pair
            .slave
            .spawn_command(cmd)
            .with_context(|| format!("Failed to spawn '{}'", program))?;
        // The parent must not hold the slave, or the reader never sees EOF.
        drop(pair.slave);

        let master = pair.master;
        let writer = master.take_writer().context("Failed to get PTY writer")?;
        let reader = master
            .try_clone_reader()
            .context("Failed to get PTY reader")?;

        let closed = Arc::new(AtomicBool::new(false));
        let reader_closed = closed.clone();
        let reader_id = id.clone();
        let spawned = thread::Builder::new()
            .name(format!("terminon-pty-{}", id))
            .spawn(move || read_loop(reader_id, reader, events, reader_closed));
        let reader_thread = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                if let Err(kill_error) = child.kill() {
                    tracing::debug!("Kill child process: {}", kill_error);
                }
                if let Err(wait_error) = child.wait() {
                    tracing::debug!("Wait for child process: {}", wait_error);
                }
                return Err(e).context("Failed to spawn PTY reader thread");
            }
        };

        Ok(Self {
            master,
            writer,
            child,
            closed,
            _reader_thread: reader_thread,
        })
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.writer.flush()?;
        Ok(())
    }

    fn resize(&self, size: TermSize) -> Result<()> {
        self.master
            .resize(pty_size(size))
            .context("Failed to resize PTY")
    }
}

impl Drop for PtySession {
    fn drop(&mut self) {
        // Silence the reader before the child goes away
        self.closed.store(true, Ordering::Release);

        // Kill the child process if still running
        if let Err(e) = self.child.kill() {
            // ESRCH (no such process) is expected if already exited
            tracing::debug!("Kill child process: {}", e);
        }

        // Wait for child to reap it (avoid zombie)
        if let Err(e) = self.child.wait() {
            tracing::debug!("Wait for child process: {}", e);
        }

        tracing::debug!("PTY session dropped, child process cleaned up");
    }
}

/// Forward PTY output as data events, then report the exit.
///
/// Nothing is sent once the session has been closed from our side.
fn read_loop(
    id: SessionId,
    mut reader: Box<dyn Read + Send>,
    events: HostEventSender,
    closed: Arc<AtomicBool>,
) {
    let mut buf = [0u8; READ_BUFFER_SIZE];
    let mut decoder = Utf8Decoder::default();
    loop {
        match reader.read(&mut buf) {
            // EOF - process exited
            Ok(0) => break,
            Ok(n) => {
                if closed.load(Ordering::Acquire) {
                    return;
                }
                let data = decoder.decode(&buf[..n]);
                if data.is_empty() {
                    continue;
                }
                if events
                    .send(HostEvent::Data {
                        id: id.clone(),
                        data,
                    })
                    .is_err()
                {
                    return; // Receiver gone
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                // Linux reports EIO once the child side is gone
                tracing::trace!("PTY read for {} ended: {}", id, e);
                break;
            }
        }
    }

    if closed.load(Ordering::Acquire) {
        return;
    }
    let tail = decoder.finish();
    if !tail.is_empty() {
        let _ = events.send(HostEvent::Data {
            id: id.clone(),
            data: tail,
        });
    }
    tracing::debug!("Session {} exited", id);
    let _ = events.send(HostEvent::Exit { id });
}

/// Decodes a byte stream as UTF-8 without splitting a character across chunks.
///
/// A trailing incomplete sequence is held back until the next chunk. Invalid
/// bytes become U+FFFD.
#[derive(Debug, Default)]
pub(crate) struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub(crate) fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let mut out = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    return out;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match e.error_len() {
                        Some(invalid) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + invalid);
                        }
                        None => {
                            self.pending.drain(..valid);
                            return out;
                        }
                    }
                }
            }
        }
    }

    /// Flush whatever is held back, lossily.
    pub(crate) fn finish(self) -> String {
        String::from_utf8_lossy(&self.pending).into_owned()
    }
}

/// [`ProcessHost`] backed by native pseudo-terminals.
///
/// Each session gets its own PTY and a reader thread that feeds the shared
/// event sink. Dropping the host closes every remaining session.
pub struct PtyHost {
    sessions: FxHashMap<SessionId, PtySession>,
    events: HostEventSender,
    default_shell: String,
}

impl PtyHost {
    pub fn new(events: HostEventSender, default_shell: impl Into<String>) -> Self {
        Self {
            sessions: FxHashMap::default(),
            events,
            default_shell: default_shell.into(),
        }
    }

    pub fn has_session(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl ProcessHost for PtyHost {
    fn create_session(&mut self, id: &SessionId, invocation: &Invocation) {
        if self.sessions.contains_key(id) {
            tracing::debug!("Session {} already exists, ignoring create", id);
            return;
        }
        match PtySession::spawn(id, invocation, &self.default_shell, self.events.clone()) {
            Ok(session) => {
                tracing::debug!("Created session {} ({:?})", id, invocation);
                self.sessions.insert(id.clone(), session);
            }
            Err(e) => {
                tracing::error!("Failed to start session {}: {:#}", id, e);
                let _ = self.events.send(HostEvent::Exit { id: id.clone() });
            }
        }
    }

    fn write_session(&mut self, id: &SessionId, data: &str) {
        let Some(session) = self.sessions.get_mut(id) else {
            tracing::trace!("Write to unknown session {} ignored", id);
            return;
        };
        if let Err(e) = session.write(data.as_bytes()) {
            tracing::warn!("Write to session {} failed: {}", id, e);
        }
    }

    fn resize_session(&mut self, id: &SessionId, size: TermSize) {
        let Some(session) = self.sessions.get(id) else {
            return;
        };
        if let Err(e) = session.resize(size) {
            tracing::warn!("Resize of session {} failed: {:#}", id, e);
        }
    }

    fn close_session(&mut self, id: &SessionId) {
        if self.sessions.remove(id).is_some() {
            tracing::debug!("Closed session {}", id);
        }
    }
}
