//! Output formatter trait

use switchyard_domain::ExecutionResult;

/// Trait for formatting dispatch results
pub trait OutputFormatter {
    /// The response alone, with a one-line routing summary
    fn format(&self, result: &ExecutionResult) -> String;

    /// The response followed by the execution trace
    fn format_detailed(&self, result: &ExecutionResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &ExecutionResult) -> String;
}
