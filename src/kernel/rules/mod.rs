//! The rule table.
//!
//! Every rule is plain data: a name, a priority tier, a guard and a transform.
//! Guards are pure predicates over the rule context; transforms describe the
//! next state as a list of [`StateDelta`]s. A transform must falsify its own
//! guard, otherwise the engine's firing ceiling trips.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::EngineConfig;
use super::database::Database;
use super::domain::Domain;
use super::engine::TurnInput;
use super::state::{InformationState, StateDelta};
use super::types::{Move, Question, Speaker, Utterance};

pub mod grounding;
pub mod integrate;
pub mod plan;
pub mod select;

pub type Guard = fn(&RuleContext<'_>) -> bool;
pub type Transform = fn(&RuleContext<'_>) -> Vec<StateDelta>;

/// Priority bands, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleTier {
    Reset,
    Latch,
    Integrate,
    Ground,
    Downdate,
    ExecPlan,
    Select,
}

#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub tier: RuleTier,
    pub guard: Guard,
    pub transform: Transform,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("tier", &self.tier)
            .finish()
    }
}

/// Everything a guard or transform may read.
pub struct RuleContext<'a> {
    pub state: &'a InformationState,
    pub domain: &'a Domain,
    pub database: &'a dyn Database,
    pub config: &'a EngineConfig,
    pub input: &'a TurnInput,
}

impl<'a> RuleContext<'a> {
    /// The utterance latched during this cycle, if any.
    pub fn latched(&self) -> Option<&'a Utterance> {
        if self.state.turn.latched {
            self.state.shared.lu.as_ref()
        } else {
            None
        }
    }

    /// The latched utterance when the user produced it.
    pub fn user_turn(&self) -> Option<&'a Utterance> {
        self.latched().filter(|lu| lu.speaker == Speaker::Usr)
    }

    /// Latched user turn with every move above the confidence threshold.
    pub fn intelligible_user_turn(&self) -> Option<&'a Utterance> {
        self.user_turn()
            .filter(|lu| lu.is_intelligible(self.config.low_confidence_threshold))
    }

    pub fn pending(&self) -> impl Iterator<Item = (usize, &'a Move)> + 'a {
        self.state.pending_moves()
    }

    pub fn qud_top(&self) -> Option<&'a Question> {
        self.state.shared.qud.head()
    }

    /// Selection never answers the system's own echo and realizes one move per cycle.
    pub fn may_select(&self) -> bool {
        self.input.speaker != Speaker::Sys && !self.state.turn.selected
    }
}

/// Canonical rule order. Earlier entries win ties.
pub fn default_rules() -> Vec<Rule> {
    vec![
        integrate::CLEAR_AGENDA,
        integrate::GET_LATEST_MOVE,
        integrate::INTEGRATE_USR_REQUEST,
        integrate::INTEGRATE_SYS_ASK,
        integrate::INTEGRATE_USR_ASK,
        integrate::INTEGRATE_ANSWER,
        integrate::INTEGRATE_GREET,
        grounding::INTEGRATE_NO_INPUT,
        grounding::INTEGRATE_LOW_CONFIDENCE,
        grounding::INTEGRATE_PARTIAL_UNDERSTANDING,
        grounding::INTEGRATE_POSITIVE_GROUNDING,
        plan::DOWNDATE_QUD,
        plan::FIND_PLAN,
        plan::REMOVE_FINDOUT,
        plan::EXEC_CONSULT_DB,
        select::SELECT_FROM_PLAN,
        select::SELECT_ASK,
        select::SELECT_RESPOND,
        select::SELECT_ANSWER,
        select::SELECT_OTHER,
    ]
}
