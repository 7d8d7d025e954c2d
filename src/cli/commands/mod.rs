//! CLI command implementations.

mod config;
mod digest;
mod doctor;
mod latest;
mod mcp;
mod monitor;
mod summarize;
mod transcribe;

pub use config::run_config;
pub use digest::run_digest;
pub use doctor::run_doctor;
pub use latest::run_latest;
pub use mcp::run_mcp;
pub use monitor::run_monitor;
pub use summarize::run_summarize;
pub use transcribe::run_transcribe;
