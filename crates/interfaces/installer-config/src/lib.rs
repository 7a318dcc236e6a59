//! Central configuration constants for runtime limits and defaults.

/// Longest logical output line kept from the installer, in bytes.
/// Anything past this up to the next newline is dropped.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Exit codes treated as a successful installation. 23 and 24 are the
/// partial-transfer warnings of the file synchronization step.
pub const ACCEPTED_EXIT_CODES: [i32; 3] = [0, 23, 24];

/// Free-text lines shorter than this also become the status message.
pub const STATUS_LINE_MAX_LEN: usize = 100;

/// Lines retained in the UI log before the oldest are evicted.
pub const LOG_CAPACITY: usize = 5000;

/// How often a UI context drains the update queue, in milliseconds.
pub const DRAIN_INTERVAL_MS: u64 = 100;

/// Default location of the on-disk transcript of the UI log.
pub const DEFAULT_TRANSCRIPT_PATH: &str = "/tmp/loc-installer.log";

/// Command-line flags whose values are masked when a command is displayed.
pub const REDACTED_FLAGS: [&str; 2] = ["--password", "--root-password"];

/// Clamp a requested log capacity into a usable range.
pub fn clamp_log_capacity(v: usize) -> usize {
    v.clamp(1, LOG_CAPACITY * 10)
}
