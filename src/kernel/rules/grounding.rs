//! Grounding: silence escalation, low-confidence clarification,
//! format validation and positive acknowledgement.

use super::{Rule, RuleContext, RuleTier};
use crate::kernel::grounding::{ContactGraph, ContactOutcome, ContactSignal};
use crate::kernel::semantics::{combine, relevant};
use crate::kernel::state::StateDelta;
use crate::kernel::types::{Act, Action, Move};

pub const INTEGRATE_NO_INPUT: Rule = Rule {
    name: "integrate_no_input",
    tier: RuleTier::Ground,
    guard: |ctx| contact_signal(ctx).is_some(),
    transform: no_input_transform,
};

pub const INTEGRATE_LOW_CONFIDENCE: Rule = Rule {
    name: "integrate_low_confidence",
    tier: RuleTier::Ground,
    guard: |ctx| {
        !ctx.state.turn.grounded
            && ctx
                .user_turn()
                .map_or(false, |lu| !lu.is_intelligible(ctx.config.low_confidence_threshold))
    },
    transform: |ctx| {
        let mut deltas: Vec<StateDelta> = ctx
            .qud_top()
            .map(|q| StateDelta::Emit(Move::ask(q.clone())))
            .into_iter()
            .collect();
        deltas.push(StateDelta::Emit(Move::inform(ctx.config.clarification_text.clone())));
        deltas.push(StateDelta::MarkGrounded);
        deltas.push(StateDelta::MarkSelected);
        deltas
    },
};

pub const INTEGRATE_PARTIAL_UNDERSTANDING: Rule = Rule {
    name: "integrate_partial_understanding",
    tier: RuleTier::Ground,
    guard: |ctx| misformatted_answer(ctx).is_some(),
    transform: |ctx| match (misformatted_answer(ctx), ctx.qud_top()) {
        (Some((index, hint)), Some(q)) => vec![
            StateDelta::Emit(Move::ask(q.clone())),
            StateDelta::Emit(Move::inform(hint)),
            StateDelta::ConsumeMove(index),
            StateDelta::MarkGrounded,
            StateDelta::MarkSelected,
        ],
        _ => Vec::new(),
    },
};

pub const INTEGRATE_POSITIVE_GROUNDING: Rule = Rule {
    name: "integrate_positive_grounding",
    tier: RuleTier::Ground,
    guard: |ctx| {
        !ctx.state.turn.acknowledged
            && !ctx.state.turn.grounded
            && ctx.intelligible_user_turn().map_or(false, |lu| {
                lu.moves.iter().any(|m| {
                    matches!(m.act, Act::Answer(_)) && m.confidence() > ctx.config.acknowledge_threshold
                })
            })
    },
    transform: |ctx| {
        vec![
            StateDelta::Emit(Move::acknowledge(ctx.config.acknowledgement_text.clone())),
            StateDelta::MarkAcknowledged,
        ]
    },
};

/// Silence needs unhandled `no_input` moves; engagement only matters while counting.
fn contact_signal(ctx: &RuleContext<'_>) -> Option<ContactSignal> {
    let lu = ctx.user_turn()?;
    if lu.is_silence() {
        ctx.pending()
            .any(|(_, m)| m.is_no_input())
            .then_some(ContactSignal::Silence)
    } else if lu.has_contentful_move() && ctx.state.private.no_input_count > 0 {
        Some(ContactSignal::Engagement)
    } else {
        None
    }
}

fn no_input_transform(ctx: &RuleContext<'_>) -> Vec<StateDelta> {
    let Some(signal) = contact_signal(ctx) else {
        return Vec::new();
    };
    let count = ctx.state.private.no_input_count;
    let threshold = ctx.config.escalation_threshold;

    let mut deltas: Vec<StateDelta> = ctx
        .pending()
        .filter(|(_, m)| m.is_no_input())
        .map(|(i, _)| StateDelta::ConsumeMove(i))
        .collect();

    match ContactGraph::transition(count, signal, threshold) {
        ContactOutcome::Reset => deltas.push(StateDelta::SetNoInputCount(0)),
        ContactOutcome::Unchanged => {}
        ContactOutcome::Reprompt { count } => reprompt(ctx, count, &mut deltas),
        ContactOutcome::Escalate { count } => {
            let top = ctx.qud_top();
            match top.and_then(|q| ctx.domain.default_answer(&q.predicate).map(|p| (q, p))) {
                Some((q, fallback)) => {
                    deltas.push(StateDelta::Emit(Move::answer(fallback.clone())));
                    deltas.push(StateDelta::Commit(fallback));
                    deltas.push(StateDelta::PopQud);
                    deltas.push(StateDelta::ClearAgenda);
                    let asks_top = matches!(
                        ctx.state.private.plan.head(),
                        Some(Action::Findout(pq) | Action::Raise(pq)) if pq == q
                    );
                    if asks_top {
                        deltas.push(StateDelta::PopPlan);
                    }
                    deltas.push(StateDelta::SetNoInputCount(0));
                }
                // Nothing to fall back on: keep re-prompting.
                None => reprompt(ctx, count, &mut deltas),
            }
        }
    }
    deltas
}

fn reprompt(ctx: &RuleContext<'_>, count: u32, deltas: &mut Vec<StateDelta>) {
    deltas.push(StateDelta::Emit(Move::no_input()));
    if let Some(q) = ctx.qud_top() {
        deltas.push(StateDelta::Emit(Move::ask(q.clone())));
    }
    deltas.push(StateDelta::SetNoInputCount(count));
    deltas.push(StateDelta::MarkSelected);
}

/// A relevant answer the domain's format rejects, with the hint to give back.
fn misformatted_answer(ctx: &RuleContext<'_>) -> Option<(usize, String)> {
    if ctx.state.turn.grounded {
        return None;
    }
    ctx.intelligible_user_turn()?;
    let top = ctx.qud_top()?;
    let format = ctx.domain.format(&top.predicate)?;
    ctx.pending().find_map(|(i, m)| match &m.act {
        Act::Answer(a) if relevant(ctx.domain, a, top) => {
            let p = combine(ctx.domain, top, a);
            (!format.accepts(&p.argument)).then(|| (i, format.hint.clone()))
        }
        _ => None,
    })
}
