//! Utilities shared by the loader and the command line.
//!
//! - [`fs`] - atomic writes for rendered output
//! - [`platform`] - path expansion (`~`, `$VAR`)

pub mod fs;
pub mod platform;

pub use fs::{atomic_write, ensure_dir, safe_write};
pub use platform::resolve_path;
