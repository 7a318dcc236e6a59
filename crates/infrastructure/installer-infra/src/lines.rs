use tracing::warn;

/// Reassembles `\n`-terminated lines from arbitrary byte chunks.
///
/// Carriage returns are kept; interpreting them is left to the caller. Lines
/// longer than `max_line_bytes` are cut at that length and the rest of the line
/// is dropped.
pub struct LineSplitter {
    pending: Vec<u8>,
    max_line_bytes: usize,
    truncated: bool,
}

impl LineSplitter {
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            pending: Vec::new(),
            max_line_bytes: max_line_bytes.max(1),
            truncated: false,
        }
    }

    /// Feeds a chunk and returns every line it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut rest = chunk;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            self.append(&rest[..pos]);
            lines.push(self.take_line());
            rest = &rest[pos + 1..];
        }
        self.append(rest);
        lines
    }

    /// Flushes an unterminated last line at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() && !self.truncated {
            return None;
        }
        Some(self.take_line())
    }

    fn append(&mut self, bytes: &[u8]) {
        if self.truncated {
            return;
        }
        let room = self.max_line_bytes - self.pending.len();
        if bytes.len() > room {
            self.pending.extend_from_slice(&bytes[..room]);
            self.truncated = true;
            warn!(
                limit = self.max_line_bytes,
                "installer output line exceeds limit, truncating"
            );
        } else {
            self.pending.extend_from_slice(bytes);
        }
    }

    fn take_line(&mut self) -> String {
        self.truncated = false;
        let bytes = std::mem::take(&mut self.pending);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}
