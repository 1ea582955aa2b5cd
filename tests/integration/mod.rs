//! Integration test suite for zenfig
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **resolution**: resolving YAML-defined variables through the public API
//! - **loader**: variable files, directories and `ZENFIG_VARS_PATH`
//! - **cli**: the `zenfig` binary end to end

mod cli;
mod loader;
mod resolution;
