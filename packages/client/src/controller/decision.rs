use crate::config::TimeoutConfiguration;
use crate::escalation::EscalationResult;

/// What recording one outcome decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Configuration to use for the next request
    pub config: TimeoutConfiguration,
    /// Bumped on every applied escalation; orders publications
    pub generation: u64,
    /// Set when a detector with its style enabled asked for escalation
    pub escalation: Option<EscalationResult>,
}

impl Decision {
    /// Whether the transport must be rebuilt to pick up `config`.
    #[must_use]
    pub fn rebuild_transport(&self) -> bool {
        matches!(
            self.escalation,
            Some(EscalationResult::Applied {
                rebuild_transport: true,
                ..
            })
        )
    }

    /// Whether `config` differs from the configuration before this outcome.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.escalation.is_some_and(|e| e.is_applied())
    }
}
