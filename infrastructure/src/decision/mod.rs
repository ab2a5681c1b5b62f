//! Decision service adapters

mod http;
mod wire;

pub use http::{HttpDecisionConfig, HttpDecisionService};
