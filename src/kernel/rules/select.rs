//! Selection: choosing the next action and realizing it as an outgoing move.

use super::{Rule, RuleContext, RuleTier};
use crate::kernel::semantics::relevant_fact;
use crate::kernel::state::StateDelta;
use crate::kernel::types::{Action, Move, Proposition};

/// `consultDB` is never copied: it runs from the plan, not the agenda.
pub const SELECT_FROM_PLAN: Rule = Rule {
    name: "select_from_plan",
    tier: RuleTier::Select,
    guard: |ctx| {
        ctx.may_select()
            && ctx.state.private.agenda.is_empty()
            && matches!(ctx.state.private.plan.head(), Some(a) if !matches!(a, Action::ConsultDb(_)))
    },
    transform: |ctx| {
        ctx.state
            .private
            .plan
            .head()
            .map(|a| StateDelta::PushAgenda(a.clone()))
            .into_iter()
            .collect()
    },
};

pub const SELECT_ASK: Rule = Rule {
    name: "select_ask",
    tier: RuleTier::Select,
    guard: |ctx| {
        ctx.may_select()
            && matches!(
                ctx.state.private.agenda.head(),
                Some(Action::Findout(_) | Action::Raise(_))
            )
    },
    transform: |ctx| {
        let Some(Action::Findout(q) | Action::Raise(q)) = ctx.state.private.agenda.head() else {
            return Vec::new();
        };
        let mut deltas = vec![
            StateDelta::Emit(Move::ask(q.clone())),
            StateDelta::PopAgenda,
            StateDelta::MarkSelected,
        ];
        if matches!(ctx.state.private.plan.head(), Some(Action::Raise(_))) {
            deltas.push(StateDelta::PopPlan);
        }
        deltas
    },
};

pub const SELECT_RESPOND: Rule = Rule {
    name: "select_respond",
    tier: RuleTier::Select,
    guard: |ctx| {
        ctx.may_select()
            && ctx.state.private.agenda.is_empty()
            && ctx.state.private.plan.is_empty()
            && ctx.qud_top().map_or(false, |q| {
                ctx.state.unshared_beliefs().any(|b| relevant_fact(b, q))
            })
    },
    transform: |ctx| {
        ctx.qud_top()
            .map(|q| StateDelta::PushAgenda(Action::Respond(q.clone())))
            .into_iter()
            .collect()
    },
};

pub const SELECT_ANSWER: Rule = Rule {
    name: "select_answer",
    tier: RuleTier::Select,
    guard: |ctx| ctx.may_select() && answerable(ctx).is_some(),
    transform: |ctx| match answerable(ctx) {
        Some(belief) => vec![
            StateDelta::Emit(Move::answer(belief)),
            StateDelta::PopAgenda,
            StateDelta::MarkSelected,
        ],
        None => Vec::new(),
    },
};

pub const SELECT_OTHER: Rule = Rule {
    name: "select_other",
    tier: RuleTier::Select,
    guard: |ctx| ctx.may_select() && matches!(ctx.state.private.agenda.head(), Some(Action::Greet)),
    transform: |_| {
        vec![
            StateDelta::Emit(Move::greet()),
            StateDelta::PopAgenda,
            StateDelta::MarkSelected,
        ]
    },
};

/// First unshared belief that answers the `respond` at the agenda head.
fn answerable(ctx: &RuleContext<'_>) -> Option<Proposition> {
    let Some(Action::Respond(q)) = ctx.state.private.agenda.head() else {
        return None;
    };
    ctx.state
        .unshared_beliefs()
        .find(|b| relevant_fact(b, q))
        .cloned()
}
