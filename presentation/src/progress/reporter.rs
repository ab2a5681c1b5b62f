//! Progress reporting while a request is dispatched

use colored::Colorize;
use switchyard_application::DispatchProgress;
use switchyard_domain::{RoutingDecision, RoutingMode};

/// Prints one line per dispatch event to stderr, leaving stdout for results.
pub struct ProgressReporter;

impl ProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter {
    fn route_line(decision: &RoutingDecision) -> String {
        match decision.mode {
            RoutingMode::Comparison => format!(
                "{} {} {}",
                "->".cyan(),
                "Comparing".bold(),
                decision.targets.join(" vs ")
            ),
            RoutingMode::Single if decision.fell_back => format!(
                "{} {} (comparison needs two matching agents)",
                "->".cyan(),
                "Routing".bold()
            ),
            RoutingMode::Single => format!("{} {}", "->".cyan(), "Routing".bold()),
        }
    }
}

impl DispatchProgress for ProgressReporter {
    fn on_route(&self, decision: &RoutingDecision) {
        eprintln!("{}", Self::route_line(decision));
    }

    fn on_delegate(&self, agent: &str) {
        eprintln!("  {} {}", "*".cyan(), agent.bold());
    }

    fn on_tool_call(&self, agent: &str, tool: &str) {
        eprintln!("    {} {} {}", agent.dimmed(), "->".dimmed(), tool);
    }

    fn on_target_complete(&self, agent: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), agent);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), agent);
        }
    }

    fn on_synthesis_start(&self) {
        eprintln!("{} {}", "->".cyan(), "Synthesizing comparison".bold());
    }
}
