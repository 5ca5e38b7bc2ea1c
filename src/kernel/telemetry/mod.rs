//! Rule-engine observability.
//!
//! # SAFETY INVARIANT
//! Telemetry is a READ-ONLY side-effect layer fed by the dispatcher's
//! observer hook. It is never read inside rule guards or transforms.
//!
//! # PRIVACY INVARIANT
//! Events carry rule names, tiers and counts only, never move content.

pub mod event;
pub mod metrics;
pub mod recorder;

use tracing::{debug, trace};

use super::engine::{RuleObserver, TurnInput};
use super::rules::Rule;
use super::state::InformationState;

/// Default observer: turns dispatcher callbacks into `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RuleObserver for TracingObserver {
    fn on_rule_evaluated(&mut self, rule: &Rule, matched: bool) {
        trace!(rule = rule.name, matched, "guard evaluated");
    }

    fn on_rule_fired(&mut self, rule: &Rule, iteration: usize, _before: &InformationState, after: &InformationState) {
        debug!(
            rule = rule.name,
            tier = ?rule.tier,
            iteration,
            version = after.version,
            "rule fired"
        );
    }

    fn on_turn_completed(&mut self, input: &TurnInput, firings: usize, state: &InformationState) {
        debug!(
            speaker = ?input.speaker,
            firings,
            outgoing = state.next_moves.len(),
            agenda = state.private.agenda.len(),
            plan = state.private.plan.len(),
            qud = state.shared.qud.len(),
            "cycle settled"
        );
        if state.next_moves.is_empty() && !state.private.plan.is_empty() {
            debug!(head = ?state.private.plan.head(), "plan waiting");
        }
    }
}
