use serde::{Deserialize, Serialize};

/// Contact state derived from the consecutive-silence counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactState {
    /// The user spoke on the last turn (counter at zero).
    Listening,
    /// `n` silent turns in a row, still re-prompting.
    Waiting(u32),
    /// Silence reached the escalation threshold.
    Escalated(u32),
}

impl ContactState {
    pub fn from_count(count: u32, threshold: u32) -> Self {
        match count {
            0 => ContactState::Listening,
            n if n < threshold => ContactState::Waiting(n),
            n => ContactState::Escalated(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSignal {
    /// The turn consisted solely of `no_input`.
    Silence,
    /// The turn carried an ask, answer or request.
    Engagement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Re-ask the open question; counter becomes `count`.
    Reprompt { count: u32 },
    /// Stop re-asking and fall back to a default answer.
    Escalate { count: u32 },
    /// Counter back to zero.
    Reset,
    Unchanged,
}

/// Pure transition function over the silence counter.
pub struct ContactGraph;

impl ContactGraph {
    pub fn transition(count: u32, signal: ContactSignal, threshold: u32) -> ContactOutcome {
        use ContactSignal::*;
        use ContactState::*;

        match (ContactState::from_count(count, threshold), signal) {
            (Listening, Engagement) => ContactOutcome::Unchanged,
            (Waiting(_) | Escalated(_), Engagement) => ContactOutcome::Reset,
            (_, Silence) => {
                let next = count.saturating_add(1);
                if next >= threshold {
                    ContactOutcome::Escalate { count: next }
                } else {
                    ContactOutcome::Reprompt { count: next }
                }
            }
        }
    }
}
