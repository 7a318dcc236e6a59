//! Transfer progress extraction.
//!
//! Values are display text only: the percentage embedded in transfer output is
//! carried verbatim, and the speed is never converted into a numeric rate.

pub const DEFAULT_PERCENT: &str = "0%";
pub const DEFAULT_SPEED: &str = "0.0MB/s";
pub const DEFAULT_ELAPSED: &str = "0:00:00";

/// Byte-rate units that mark a line as raw transfer output.
pub const RATE_UNITS: [&str; 3] = ["MB/s", "KB/s", "GB/s"];

const RATE_SUFFIX: &str = "B/s";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferProgress {
    pub percent: String,
    pub speed: String,
    pub elapsed: String,
}

impl Default for TransferProgress {
    fn default() -> Self {
        Self {
            percent: DEFAULT_PERCENT.to_string(),
            speed: DEFAULT_SPEED.to_string(),
            elapsed: DEFAULT_ELAPSED.to_string(),
        }
    }
}

impl TransferProgress {
    /// Parses the whitespace separated `<percent> <speed> <elapsed>` payload
    /// that follows the progress marker. Missing trailing fields keep their
    /// defaults; `None` when the payload has no fields at all.
    pub fn from_tagged(payload: &str) -> Option<Self> {
        let mut fields = payload.split_whitespace();
        let mut progress = Self {
            percent: fields.next()?.to_string(),
            ..Self::default()
        };
        if let Some(speed) = fields.next() {
            progress.speed = speed.to_string();
        }
        if let Some(elapsed) = fields.next() {
            progress.elapsed = elapsed.to_string();
        }
        Some(progress)
    }

    /// Recovers percent and speed from free-form transfer output such as
    /// `  1,234,567  45%   10.52MB/s    0:00:12`.
    pub fn from_raw(line: &str) -> Self {
        let mut progress = Self::default();
        if let Some(percent) = first_percent(line) {
            progress.percent = percent;
        }
        if let Some(speed) = speed_token(line) {
            progress.speed = speed.to_string();
        }
        progress
    }

    pub fn tagged_log_text(&self) -> String {
        format!(
            "Copying files: {} {} {}",
            self.percent, self.speed, self.elapsed
        )
    }

    pub fn tagged_status_text(&self) -> String {
        format!("Copying system files... {} {}", self.percent, self.speed)
    }

    pub fn raw_log_text(&self) -> String {
        format!("Copying: {} {}", self.percent, self.speed)
    }
}

pub fn has_rate_unit(line: &str) -> bool {
    RATE_UNITS.iter().any(|unit| line.contains(unit))
}

/// First run of ASCII digits directly followed by `%`, normalized through an
/// integer parse (`007%` becomes `7%`).
fn first_percent(line: &str) -> Option<String> {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if bytes.get(i) == Some(&b'%') {
            let digits = &line[start..i];
            let normalized = digits
                .parse::<u64>()
                .map(|n| n.to_string())
                .unwrap_or_else(|_| digits.to_string());
            return Some(format!("{normalized}%"));
        }
    }
    None
}

/// Walks back from the first `B/s` over digits, `.` and the unit prefixes.
fn speed_token(line: &str) -> Option<&str> {
    let pos = line.find(RATE_SUFFIX)?;
    let bytes = line.as_bytes();
    let mut start = pos;
    while start > 0 {
        let prev = bytes[start - 1];
        if prev.is_ascii_digit() || matches!(prev, b'.' | b'M' | b'K' | b'G') {
            start -= 1;
        } else {
            break;
        }
    }
    Some(&line[start..pos + RATE_SUFFIX.len()])
}
