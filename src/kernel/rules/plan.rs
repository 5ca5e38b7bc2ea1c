//! QUD downdate and plan execution.

use super::{Rule, RuleContext, RuleTier};
use crate::kernel::semantics::{relevant_fact, resolves};
use crate::kernel::state::StateDelta;
use crate::kernel::types::{Action, Proposition, Question};

pub const DOWNDATE_QUD: Rule = Rule {
    name: "downdate_qud",
    tier: RuleTier::Downdate,
    guard: |ctx| ctx.qud_top().map_or(false, |q| committed(ctx, q)),
    transform: |_| vec![StateDelta::PopQud],
};

/// Loads the issue plan for a `respond` the system cannot answer from its beliefs yet.
pub const FIND_PLAN: Rule = Rule {
    name: "find_plan",
    tier: RuleTier::ExecPlan,
    guard: |ctx| issue_steps(ctx).is_some(),
    transform: |ctx| match issue_steps(ctx) {
        Some(steps) => vec![StateDelta::PopAgenda, StateDelta::InstallPlan(steps)],
        None => Vec::new(),
    },
};

pub const REMOVE_FINDOUT: Rule = Rule {
    name: "remove_findout",
    tier: RuleTier::ExecPlan,
    guard: |ctx| match ctx.state.private.plan.head() {
        Some(Action::Findout(q)) => committed(ctx, q),
        _ => false,
    },
    transform: |_| vec![StateDelta::PopPlan],
};

/// A `None` lookup leaves the step in place; the plan waits for more commitments.
pub const EXEC_CONSULT_DB: Rule = Rule {
    name: "exec_consultDB",
    tier: RuleTier::ExecPlan,
    guard: |ctx| lookup(ctx).is_some(),
    transform: |ctx| match lookup(ctx) {
        Some(p) => vec![StateDelta::PopPlan, StateDelta::AddBelief(p)],
        None => Vec::new(),
    },
};

fn committed(ctx: &RuleContext<'_>, q: &Question) -> bool {
    ctx.state.shared.com.iter().any(|p| resolves(p, q))
}

fn issue_steps(ctx: &RuleContext<'_>) -> Option<Vec<Action>> {
    let Some(Action::Respond(q)) = ctx.state.private.agenda.head() else {
        return None;
    };
    if ctx.state.unshared_beliefs().any(|b| relevant_fact(b, q)) {
        return None;
    }
    ctx.domain.issue_plan(q).map(|plan| plan.steps.clone())
}

fn lookup(ctx: &RuleContext<'_>) -> Option<Proposition> {
    match ctx.state.private.plan.head() {
        Some(Action::ConsultDb(q)) => ctx.database.consult(q, ctx.state.shared.com.as_slice()),
        _ => None,
    }
}
