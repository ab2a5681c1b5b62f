//! Session domain module
//!
//! Prior conversation turns and how they are folded into a request.

pub mod entities;
pub mod history;

pub use entities::{Message, Role};
pub use history::{NO_HISTORY, format_history, with_history};
