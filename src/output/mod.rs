//! Output formatting for subnet group state.
//!
//! - [`terminal`] - terminal output with colors

mod terminal;

pub use terminal::{format_state, print_state, quoted};
