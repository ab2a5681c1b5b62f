//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod assemble_agents;
pub mod build_tool;
pub mod dispatch;
pub mod reload;
mod scenarios;
#[cfg(test)]
pub(crate) mod testing;
pub mod trace_recorder;
