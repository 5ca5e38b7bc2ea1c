use std::collections::{BTreeMap, VecDeque};

use super::event::{ContactEventKind, TelemetryEvent};
use crate::kernel::rules::RuleTier;
use crate::kernel::types::Speaker;

#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub rule_stats: RuleStats,
    pub turn_stats: TurnStats,
    pub contact_stats: ContactStats,
}

#[derive(Debug, Clone, Default)]
pub struct RuleStats {
    pub by_rule: BTreeMap<String, u64>,
    pub by_tier: BTreeMap<RuleTier, u64>,
}

#[derive(Debug, Clone, Default)]
pub struct TurnStats {
    pub user_turns: u64,
    pub echo_turns: u64,
    pub total_firings: u64,
    pub avg_firings_per_turn: f64,
    pub max_firings_per_turn: u64,
    /// User turns that produced no outgoing move.
    pub silent_replies: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ContactStats {
    pub reprompts: u64,
    pub escalations: u64,
    pub resets: u64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::RuleFired { rule, tier, .. } => {
                *snap.rule_stats.by_rule.entry(rule.clone()).or_default() += 1;
                *snap.rule_stats.by_tier.entry(*tier).or_default() += 1;
            }
            TelemetryEvent::ContactTransition { kind, .. } => match kind {
                ContactEventKind::Reprompted => snap.contact_stats.reprompts += 1,
                ContactEventKind::Escalated => snap.contact_stats.escalations += 1,
                ContactEventKind::Reset => snap.contact_stats.resets += 1,
            },
            TelemetryEvent::TurnCompleted { speaker, firings, outgoing } => {
                let firings = *firings as u64;
                match speaker {
                    Speaker::Usr => {
                        snap.turn_stats.user_turns += 1;
                        if *outgoing == 0 {
                            snap.turn_stats.silent_replies += 1;
                        }
                    }
                    Speaker::Sys => snap.turn_stats.echo_turns += 1,
                }
                snap.turn_stats.total_firings += firings;
                snap.turn_stats.max_firings_per_turn = snap.turn_stats.max_firings_per_turn.max(firings);
            }
        }
    }

    let turns = snap.turn_stats.user_turns + snap.turn_stats.echo_turns;
    if turns > 0 {
        snap.turn_stats.avg_firings_per_turn = snap.turn_stats.total_firings as f64 / turns as f64;
    }

    snap
}
