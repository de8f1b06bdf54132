//! Structured logging to a rotating file.
//!
//! ```text
//! tracing macros → EnvFilter → JSON fmt layer → RotatingFileWriter → <data_dir>/news-brief.log
//!                           └→ fmt layer → stderr (optional)
//! ```
//!
//! # Features
//!
//! - **JSON Lines**: one event per line, with the enclosing span
//! - **Automatic Rotation**: files rotate at 10MB with 3-backup retention
//!
//! # Configuration
//!
//! Log level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `log_level` in [`Config`](crate::Config)
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

pub mod file_writer;
mod init;

pub use file_writer::RotatingFileWriter;
pub use init::{init_tracing, LOG_FILE_NAME};
