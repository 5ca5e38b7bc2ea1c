use serde::{Deserialize, Serialize};

use crate::kernel::grounding::ContactState;
use crate::kernel::rules::RuleTier;
use crate::kernel::types::Speaker;

// Allowed: rule names, tiers, counts, enums
// Forbidden: move content, questions, propositions

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    RuleFired {
        rule: String,
        tier: RuleTier,
        iteration: usize,
    },

    ContactTransition {
        from: ContactState,
        to: ContactState,
        kind: ContactEventKind,
    },

    TurnCompleted {
        speaker: Speaker,
        firings: usize,
        outgoing: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactEventKind {
    Reprompted,
    Escalated,
    Reset,
}
