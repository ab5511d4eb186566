//! Structured sequence logging utilities.

use tracing::{info, warn};

use gait_models::SequenceId;

/// Logger carrying sequence context so pipeline events stay correlatable.
#[derive(Debug, Clone)]
pub struct SequenceLogger {
    sequence_id: String,
    operation: String,
}

impl SequenceLogger {
    /// Create a logger for one sequence and operation.
    pub fn new(sequence_id: &SequenceId, operation: &str) -> Self {
        Self {
            sequence_id: sequence_id.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            sequence_id = %self.sequence_id,
            operation = %self.operation,
            "Sequence started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            sequence_id = %self.sequence_id,
            operation = %self.operation,
            "Sequence progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            sequence_id = %self.sequence_id,
            operation = %self.operation,
            "Sequence warning: {}", message
        );
    }

    pub fn log_complete(&self, message: &str) {
        info!(
            sequence_id = %self.sequence_id,
            operation = %self.operation,
            "Sequence complete: {}", message
        );
    }
}
