//! Core domain concepts shared by every module

pub mod error;
pub mod identifier;
pub mod string;
