use std::collections::VecDeque;

use installer_config::LOG_CAPACITY;
use installer_core::OutputEvent;

/// Bounded log; the oldest line is evicted once capacity is reached.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(LOG_CAPACITY)
    }
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    /// Overwrites the newest line, or appends when the log is empty.
    pub fn replace_last(&mut self, line: impl Into<String>) {
        match self.lines.back_mut() {
            Some(last) => *last = line.into(),
            None => self.push(line),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

/// Everything the progress page shows, built only from drained events.
#[derive(Debug, Clone, Default)]
pub struct ProgressState {
    pub percent: u8,
    pub progress_message: String,
    pub status: String,
    pub log: LogBuffer,
    pub notices: Vec<String>,
    pub complete: bool,
}

impl ProgressState {
    pub fn with_log_capacity(capacity: usize) -> Self {
        Self {
            log: LogBuffer::new(capacity),
            ..Self::default()
        }
    }
}

pub fn apply_event(state: &mut ProgressState, ev: &OutputEvent) {
    match ev {
        OutputEvent::LogLine { text } => state.log.push(text.as_str()),
        OutputEvent::LogLineReplace { text } => state.log.replace_last(text.as_str()),
        OutputEvent::ProgressUpdate { percent, message } => {
            state.percent = (*percent).min(100);
            state.progress_message = message.clone();
        }
        OutputEvent::StatusUpdate { message } => state.status = message.clone(),
        OutputEvent::ErrorNotice { message } => {
            state.log.push(format!("ERROR: {message}"));
            state.notices.push(message.clone());
        }
        OutputEvent::MarkComplete
        | OutputEvent::InstallSucceeded { .. }
        | OutputEvent::InstallFailed { .. } => state.complete = true,
    }
}
