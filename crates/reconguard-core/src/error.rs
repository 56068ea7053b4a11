use crate::target::ScopeTier;
use thiserror::Error;

/// Result type alias for gate and registry operations
pub type Result<T> = std::result::Result<T, GuardError>;

/// Errors raised by the scope-enforcement layer
#[derive(Error, Debug)]
pub enum GuardError {
    /// The required `target` parameter was absent or blank
    #[error("Target parameter required")]
    MissingTarget,

    /// The target is not present in the allow-list for this tier
    #[error("{}", scope_violation_message(.target, .tier))]
    ScopeViolation {
        /// The rejected identifier, as supplied by the caller
        target: String,
        /// The allow-list that rejected it
        tier: ScopeTier,
    },

    /// Administrative insert of an identifier that is already registered
    #[error("target already registered: {0}")]
    DuplicateTarget(String),

    /// The backing store failed
    #[error("registry error: {0}")]
    Registry(String),

    /// Configuration is invalid or could not be read
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn scope_violation_message(target: &str, tier: &ScopeTier) -> String {
    match tier {
        ScopeTier::Passive => format!("Target {target} is NOT authorized."),
        ScopeTier::Active => format!(
            "ETHICAL_GUARDRAIL: Target '{target}' is not in the authorized lab environment."
        ),
    }
}

impl GuardError {
    /// Returns the HTTP status code this error maps to at the gate
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::MissingTarget => Some(400),
            Self::ScopeViolation { .. } => Some(403),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_violation_names_target() {
        let err = GuardError::ScopeViolation {
            target: "evil.example".into(),
            tier: ScopeTier::Passive,
        };
        assert_eq!(err.to_string(), "Target evil.example is NOT authorized.");

        let err = GuardError::ScopeViolation {
            target: "evil.example".into(),
            tier: ScopeTier::Active,
        };
        assert!(err.to_string().starts_with("ETHICAL_GUARDRAIL"));
        assert!(err.to_string().contains("'evil.example'"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GuardError::MissingTarget.status_code(), Some(400));
        let denied = GuardError::ScopeViolation {
            target: "x".into(),
            tier: ScopeTier::Active,
        };
        assert_eq!(denied.status_code(), Some(403));

        let dup = GuardError::DuplicateTarget("x".into());
        assert_eq!(dup.status_code(), None);
    }
}
