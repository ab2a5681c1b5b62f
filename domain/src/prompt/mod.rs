//! Prompt templates

pub mod template;

pub use template::{APOLOGY, CANCELLED_NOTICE, DEFAULT_TITLE, MAX_TITLE_WORDS, PromptTemplate};
