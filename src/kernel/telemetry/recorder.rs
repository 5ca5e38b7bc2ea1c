use std::collections::VecDeque;

use super::event::{ContactEventKind, TelemetryEvent};
use super::metrics::{compute_snapshot, TelemetrySnapshot};
use crate::kernel::engine::{RuleObserver, TurnInput};
use crate::kernel::grounding::ContactState;
use crate::kernel::rules::grounding::INTEGRATE_NO_INPUT;
use crate::kernel::rules::Rule;
use crate::kernel::state::InformationState;

const MAX_EVENTS: usize = 10_000;

/// Bounded in-memory event buffer.
#[derive(Debug)]
pub struct TelemetryRecorder {
    buffer: VecDeque<TelemetryEvent>,
    escalation_threshold: u32,
}

impl TelemetryRecorder {
    pub fn new(escalation_threshold: u32) -> Self {
        Self {
            buffer: VecDeque::with_capacity(MAX_EVENTS),
            escalation_threshold,
        }
    }

    pub fn record(&mut self, event: TelemetryEvent) {
        if self.buffer.len() >= MAX_EVENTS {
            self.buffer.pop_front();
        }
        self.buffer.push_back(event);
    }

    pub fn events(&self) -> impl Iterator<Item = &TelemetryEvent> {
        self.buffer.iter()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        compute_snapshot(&self.buffer)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Escalation commits a fallback fact; a plain reset does not.
    fn contact_event(&self, before: &InformationState, after: &InformationState) -> Option<TelemetryEvent> {
        let (was, now) = (before.private.no_input_count, after.private.no_input_count);
        let kind = if now > was {
            ContactEventKind::Reprompted
        } else if now == 0 && after.shared.com.len() > before.shared.com.len() {
            ContactEventKind::Escalated
        } else if now == 0 && was > 0 {
            ContactEventKind::Reset
        } else {
            return None;
        };
        Some(TelemetryEvent::ContactTransition {
            from: ContactState::from_count(was, self.escalation_threshold),
            to: ContactState::from_count(now, self.escalation_threshold),
            kind,
        })
    }
}

impl RuleObserver for TelemetryRecorder {
    fn on_rule_fired(&mut self, rule: &Rule, iteration: usize, before: &InformationState, after: &InformationState) {
        self.record(TelemetryEvent::RuleFired {
            rule: rule.name.to_string(),
            tier: rule.tier,
            iteration,
        });
        if rule.name == INTEGRATE_NO_INPUT.name {
            if let Some(event) = self.contact_event(before, after) {
                self.record(event);
            }
        }
    }

    fn on_turn_completed(&mut self, input: &TurnInput, firings: usize, state: &InformationState) {
        self.record(TelemetryEvent::TurnCompleted {
            speaker: input.speaker,
            firings,
            outgoing: state.next_moves.len(),
        });
    }
}
