//! Line protocol spoken by the external installer.
//!
//! Every line of output is mapped to a [`ControlLine`] first, in a fixed
//! precedence order, and only then turned into [`OutputEvent`]s. Keeping the
//! two steps apart lets callers inspect which rule matched a line.

use installer_config::STATUS_LINE_MAX_LEN;

use crate::exit::COMPLETE_MESSAGE;
use crate::progress::{has_rate_unit, TransferProgress};
use crate::OutputEvent;

pub const TRANSFER_MARKER: &str = "RSYNC_PROGRESS:";
pub const PROGRESS_PREFIX: &str = "PROGRESS:";
pub const ERROR_PREFIX: &str = "ERROR:";
pub const SUCCESS_PREFIX: &str = "SUCCESS:";
pub const INFO_PREFIX: &str = "INFO:";

pub const SUCCESS_STATUS: &str = "Installation completed successfully!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlLine<'a> {
    /// Carries [`TRANSFER_MARKER`] followed by at least one field.
    TaggedTransfer(TransferProgress),
    /// Contains a byte-rate unit but no marker.
    RawTransfer(TransferProgress),
    Progress { percent: u8, message: &'a str },
    /// A `PROGRESS:` line whose percent is missing, non-numeric or out of range.
    MalformedProgress(&'a str),
    Error(&'a str),
    Success,
    Info(&'a str),
    Text(&'a str),
    Empty,
}

pub fn parse_line(line: &str) -> ControlLine<'_> {
    if let Some(progress) = tagged_transfer(line) {
        return ControlLine::TaggedTransfer(progress);
    }
    if has_rate_unit(line) {
        return ControlLine::RawTransfer(TransferProgress::from_raw(line));
    }
    if let Some(rest) = line.strip_prefix(PROGRESS_PREFIX) {
        return match parse_progress(rest) {
            Some((percent, message)) => ControlLine::Progress { percent, message },
            None => ControlLine::MalformedProgress(line),
        };
    }
    if let Some(message) = line.strip_prefix(ERROR_PREFIX) {
        return ControlLine::Error(message);
    }
    if line.starts_with(SUCCESS_PREFIX) {
        return ControlLine::Success;
    }
    if let Some(message) = line.strip_prefix(INFO_PREFIX) {
        return ControlLine::Info(message);
    }
    if line.is_empty() {
        ControlLine::Empty
    } else {
        ControlLine::Text(line)
    }
}

/// Maps one newline-stripped line to the events it produces, in order.
pub fn classify(line: &str) -> Vec<OutputEvent> {
    parse_line(line).into_events()
}

impl ControlLine<'_> {
    pub fn into_events(self) -> Vec<OutputEvent> {
        match self {
            ControlLine::TaggedTransfer(p) => vec![
                OutputEvent::replace_log(p.tagged_log_text()),
                OutputEvent::status(p.tagged_status_text()),
            ],
            ControlLine::RawTransfer(p) => vec![OutputEvent::replace_log(p.raw_log_text())],
            ControlLine::Progress { percent, message } => {
                vec![OutputEvent::progress(percent, message)]
            }
            ControlLine::MalformedProgress(raw) => vec![OutputEvent::log(raw)],
            ControlLine::Error(message) => vec![OutputEvent::error(message)],
            ControlLine::Success => vec![
                OutputEvent::progress(100, COMPLETE_MESSAGE),
                OutputEvent::status(SUCCESS_STATUS),
                OutputEvent::MarkComplete,
            ],
            ControlLine::Info(message) => vec![OutputEvent::status(message)],
            ControlLine::Text(text) => {
                let mut events = vec![OutputEvent::log(text)];
                if text.contains(':') || text.len() < STATUS_LINE_MAX_LEN {
                    events.push(OutputEvent::status(text));
                }
                events
            }
            ControlLine::Empty => Vec::new(),
        }
    }
}

fn tagged_transfer(line: &str) -> Option<TransferProgress> {
    let idx = line.find(TRANSFER_MARKER)?;
    TransferProgress::from_tagged(&line[idx + TRANSFER_MARKER.len()..])
}

fn parse_progress(rest: &str) -> Option<(u8, &str)> {
    let (percent, message) = rest.split_once(':')?;
    let percent: i64 = percent.trim().parse().ok()?;
    let percent = u8::try_from(percent).ok().filter(|p| *p <= 100)?;
    Some((percent, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_wins_over_rate_unit() {
        assert!(matches!(
            parse_line("RSYNC_PROGRESS: 5% 1.0MB/s 0:00:01"),
            ControlLine::TaggedTransfer(_)
        ));
    }

    #[test]
    fn rate_unit_wins_over_control_prefixes() {
        assert!(matches!(
            parse_line("PROGRESS:50:copying at 3MB/s"),
            ControlLine::RawTransfer(_)
        ));
        assert!(matches!(
            parse_line("INFO:fetching 3MB/s"),
            ControlLine::RawTransfer(_)
        ));
    }

    #[test]
    fn bare_marker_falls_through_to_text() {
        assert_eq!(
            parse_line("RSYNC_PROGRESS:"),
            ControlLine::Text("RSYNC_PROGRESS:")
        );
    }

    #[test]
    fn progress_requires_message_separator() {
        assert_eq!(
            parse_line("PROGRESS:50"),
            ControlLine::MalformedProgress("PROGRESS:50")
        );
        assert_eq!(
            parse_line("PROGRESS:50:"),
            ControlLine::Progress {
                percent: 50,
                message: ""
            }
        );
    }

    #[test]
    fn progress_message_keeps_later_colons() {
        assert_eq!(
            parse_line("PROGRESS:10:Step: partition"),
            ControlLine::Progress {
                percent: 10,
                message: "Step: partition"
            }
        );
    }

    #[test]
    fn progress_bounds_are_inclusive() {
        assert!(matches!(parse_line("PROGRESS:0:a"), ControlLine::Progress { percent: 0, .. }));
        assert!(matches!(
            parse_line("PROGRESS:100:a"),
            ControlLine::Progress { percent: 100, .. }
        ));
        assert!(matches!(parse_line("PROGRESS:-1:a"), ControlLine::MalformedProgress(_)));
        assert!(matches!(parse_line("PROGRESS:101:a"), ControlLine::MalformedProgress(_)));
    }

    #[test]
    fn prefixes_are_case_sensitive() {
        assert_eq!(parse_line("info:hello"), ControlLine::Text("info:hello"));
        assert_eq!(parse_line("Error:x"), ControlLine::Text("Error:x"));
    }

    #[test]
    fn empty_line_produces_nothing() {
        assert!(classify("").is_empty());
    }
}
