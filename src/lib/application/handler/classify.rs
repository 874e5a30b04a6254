//! Maps failure text to the single user-facing error message of an
//! invocation.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A read timeout against an endpoint that was never set.
    GatewayUrlConfiguration,
    GatewayTimeout,
    ExecutionFailed,
}

impl FailureKind {
    pub fn classify(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if lowered.contains("read timeout") {
            if lowered.contains("none") {
                FailureKind::GatewayUrlConfiguration
            } else {
                FailureKind::GatewayTimeout
            }
        } else {
            FailureKind::ExecutionFailed
        }
    }

    fn label(self) -> &'static str {
        match self {
            FailureKind::GatewayUrlConfiguration => "Gateway URL configuration error",
            FailureKind::GatewayTimeout => "Gateway response timeout",
            FailureKind::ExecutionFailed => "Agent execution failed",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classified message carrying the original text, e.g.
/// `Gateway response timeout: Read timeout on endpoint ...`.
pub fn classify_failure(message: &str) -> String {
    format!("{}: {message}", FailureKind::classify(message))
}
