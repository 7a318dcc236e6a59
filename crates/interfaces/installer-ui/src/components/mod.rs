pub mod actions;
pub mod header;
pub mod log_view;
pub mod progress;
