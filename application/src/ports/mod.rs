//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod decision_service;
pub mod knowledge_base;
pub mod manifest_source;
pub mod progress;
pub mod tool_handler;
pub mod trace_logger;
