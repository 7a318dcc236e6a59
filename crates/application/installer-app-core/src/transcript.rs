use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use installer_core::{OutputEvent, SessionState};
use installer_pipeline::SessionId;
use tracing::warn;

/// Append-only copy of the session log on disk, so it survives the UI.
///
/// Replaced transfer lines cannot be rewritten in a file and are appended
/// instead. The first write error disables the transcript.
pub struct Transcript {
    path: Utf8PathBuf,
    out: Option<LineWriter<File>>,
}

impl Transcript {
    pub fn open(path: impl AsRef<Utf8Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            out: Some(LineWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn is_active(&self) -> bool {
        self.out.is_some()
    }

    pub fn begin(&mut self, session_id: SessionId, command: &str) {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S");
        self.write_line(&format!("=== Installation started {now} (session {session_id}) ==="));
        self.write_line(&format!("Command: {command}"));
    }

    pub fn record(&mut self, ev: &OutputEvent) {
        match ev {
            OutputEvent::LogLine { text } | OutputEvent::LogLineReplace { text } => {
                self.write_line(text)
            }
            OutputEvent::ErrorNotice { message } => self.write_line(&format!("ERROR: {message}")),
            _ => {}
        }
    }

    pub fn end(&mut self, state: SessionState, exit_code: Option<i32>) {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = match exit_code {
            Some(code) => format!("=== Installation finished {now}: {state:?} (exit code {code}) ==="),
            None => format!("=== Installation finished {now}: {state:?} ==="),
        };
        self.write_line(&line);
    }

    fn write_line(&mut self, line: &str) {
        let Some(out) = self.out.as_mut() else {
            return;
        };
        if let Err(e) = writeln!(out, "{line}") {
            warn!(path = %self.path, "transcript write failed, disabling: {e}");
            self.out = None;
        }
    }
}
