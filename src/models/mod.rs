//! Shared data models.
//!
//! [`Value`] is the one type that flows through every stage: it comes out of the
//! variable loader, is scanned and rendered by the resolver, and is written back
//! out by the CLI.

mod value;

pub use value::{Value, Variables};
