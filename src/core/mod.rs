//! Core types for zenfig
//!
//! Currently this is the application error type and the user-facing error
//! reporting used by the binary; see [`error`].

pub mod error;

pub use error::{ErrorContext, ZenfigError, user_friendly_error};
