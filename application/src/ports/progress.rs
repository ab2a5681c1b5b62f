//! Progress notification port
//!
//! Defines the interface for reporting progress while a request is dispatched.

use switchyard_domain::RoutingDecision;

/// Callback for progress updates during dispatch
///
/// Implementations live in the presentation layer (console spinner lines in
/// the chat REPL). Every method defaults to a no-op.
pub trait DispatchProgress: Send + Sync {
    /// Called once the routing mode has been decided
    fn on_route(&self, _decision: &RoutingDecision) {}

    /// Called when the router delegates to an agent
    fn on_delegate(&self, _agent: &str) {}

    /// Called when an agent calls one of its tools
    fn on_tool_call(&self, _agent: &str, _tool: &str) {}

    /// Called when a comparison target finishes
    fn on_target_complete(&self, _agent: &str, _success: bool) {}

    /// Called when comparison synthesis starts
    fn on_synthesis_start(&self) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DispatchProgress for NoProgress {}
