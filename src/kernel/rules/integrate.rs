//! Latching and integration: turn uptake from the latest utterance.

use super::{Rule, RuleContext, RuleTier};
use crate::kernel::semantics::{combine, relevant};
use crate::kernel::state::StateDelta;
use crate::kernel::types::{Act, Action, Proposition, Question, Speaker, Utterance};

/// Only fires when the caller asks for an agenda reset.
pub const CLEAR_AGENDA: Rule = Rule {
    name: "clear_agenda",
    tier: RuleTier::Reset,
    guard: |ctx| ctx.input.reset_agenda && !ctx.state.private.agenda.is_empty(),
    transform: |_| vec![StateDelta::ClearAgenda],
};

pub const GET_LATEST_MOVE: Rule = Rule {
    name: "get_latest_move",
    tier: RuleTier::Latch,
    guard: |ctx| !ctx.input.moves.is_empty() && !ctx.state.turn.latched,
    transform: |ctx| {
        vec![StateDelta::LatchUtterance(Utterance::new(
            ctx.input.speaker,
            ctx.input.moves.clone(),
        ))]
    },
};

pub const INTEGRATE_USR_REQUEST: Rule = Rule {
    name: "integrate_usr_request",
    tier: RuleTier::Integrate,
    guard: |ctx| usr_request(ctx).is_some(),
    transform: |ctx| match usr_request(ctx) {
        Some((index, steps)) => vec![StateDelta::PrependAgenda(steps), StateDelta::ConsumeMove(index)],
        None => Vec::new(),
    },
};

pub const INTEGRATE_SYS_ASK: Rule = Rule {
    name: "integrate_sys_ask",
    tier: RuleTier::Integrate,
    guard: |ctx| sys_ask(ctx).is_some(),
    transform: |ctx| match sys_ask(ctx) {
        Some((index, q)) => vec![StateDelta::PushQud(q), StateDelta::ConsumeMove(index)],
        None => Vec::new(),
    },
};

pub const INTEGRATE_USR_ASK: Rule = Rule {
    name: "integrate_usr_ask",
    tier: RuleTier::Integrate,
    guard: |ctx| usr_ask(ctx).is_some(),
    transform: |ctx| match usr_ask(ctx) {
        Some((index, q)) => vec![
            StateDelta::PushQud(q.clone()),
            StateDelta::PushAgenda(Action::Respond(q)),
            StateDelta::ConsumeMove(index),
        ],
        None => Vec::new(),
    },
};

pub const INTEGRATE_ANSWER: Rule = Rule {
    name: "integrate_answer",
    tier: RuleTier::Integrate,
    guard: |ctx| relevant_answer(ctx).is_some(),
    transform: |ctx| match relevant_answer(ctx) {
        Some((index, p)) => vec![StateDelta::Commit(p), StateDelta::ConsumeMove(index)],
        None => Vec::new(),
    },
};

pub const INTEGRATE_GREET: Rule = Rule {
    name: "integrate_greet",
    tier: RuleTier::Integrate,
    guard: |ctx| greeting(ctx).is_some(),
    transform: |ctx| greeting(ctx).map(StateDelta::ConsumeMove).into_iter().collect(),
};

fn usr_request(ctx: &RuleContext<'_>) -> Option<(usize, Vec<Action>)> {
    ctx.intelligible_user_turn()?;
    ctx.pending().find_map(|(i, m)| match &m.act {
        Act::Request(Some(name)) => ctx.domain.action_plan(name).map(|plan| (i, plan.steps.clone())),
        _ => None,
    })
}

fn sys_ask(ctx: &RuleContext<'_>) -> Option<(usize, Question)> {
    ctx.latched().filter(|lu| lu.speaker == Speaker::Sys)?;
    ctx.pending().find_map(|(i, m)| match &m.act {
        Act::Ask(q) => Some((i, q.clone())),
        _ => None,
    })
}

fn usr_ask(ctx: &RuleContext<'_>) -> Option<(usize, Question)> {
    ctx.intelligible_user_turn()?;
    ctx.pending().find_map(|(i, m)| match &m.act {
        Act::Ask(q) => Some((i, q.clone())),
        _ => None,
    })
}

/// An answer relevant to the top of QUD. User answers must also be
/// intelligible and pass the domain's format check; the grounding rules
/// handle the ones that don't.
fn relevant_answer(ctx: &RuleContext<'_>) -> Option<(usize, Proposition)> {
    let lu = ctx.latched()?;
    if lu.speaker == Speaker::Usr && ctx.intelligible_user_turn().is_none() {
        return None;
    }
    let top = ctx.qud_top()?;
    ctx.pending().find_map(|(i, m)| match &m.act {
        Act::Answer(a) if relevant(ctx.domain, a, top) => {
            let p = combine(ctx.domain, top, a);
            (lu.speaker == Speaker::Sys || ctx.domain.accepts(&p)).then_some((i, p))
        }
        _ => None,
    })
}

fn greeting(ctx: &RuleContext<'_>) -> Option<usize> {
    ctx.pending()
        .find_map(|(i, m)| matches!(m.act, Act::Greet).then_some(i))
}
