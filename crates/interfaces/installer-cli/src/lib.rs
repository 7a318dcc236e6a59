pub mod commands;

use camino::Utf8PathBuf;
use installer_config::{clamp_log_capacity, DEFAULT_TRANSCRIPT_PATH, LOG_CAPACITY};

/// Settings for one `run` invocation, already resolved from flags.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub transcript: Option<Utf8PathBuf>,
    pub log_capacity: usize,
    pub export_log: Option<Utf8PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            transcript: Some(Utf8PathBuf::from(DEFAULT_TRANSCRIPT_PATH)),
            log_capacity: LOG_CAPACITY,
            export_log: None,
        }
    }
}

impl RunOptions {
    pub fn new(
        log_file: Option<Utf8PathBuf>,
        no_log_file: bool,
        log_capacity: Option<usize>,
        export_log: Option<Utf8PathBuf>,
    ) -> Self {
        let transcript = if no_log_file {
            None
        } else {
            Some(log_file.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_TRANSCRIPT_PATH)))
        };
        Self {
            transcript,
            log_capacity: log_capacity.map_or(LOG_CAPACITY, clamp_log_capacity),
            export_log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_write_transcript_to_tmp() {
        let opts = RunOptions::new(None, false, None, None);
        assert_eq!(
            opts.transcript.as_deref(),
            Some(camino::Utf8Path::new("/tmp/loc-installer.log"))
        );
        assert_eq!(opts.log_capacity, LOG_CAPACITY);
    }

    #[test]
    fn no_log_file_wins_and_capacity_is_clamped() {
        let opts = RunOptions::new(Some("x.log".into()), true, Some(0), None);
        assert!(opts.transcript.is_none());
        assert_eq!(opts.log_capacity, 1);
    }
}
