pub mod command;
pub mod lines;
pub mod process;

// Re-exports for convenience
pub use command::CommandSpec;
pub use lines::LineSplitter;
pub use process::{InstallerProcess, ProcessError, ProcessLauncher, SystemLauncher, SystemProcess};
