use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::types::{Action, Move, Proposition, Question, Utterance};

/// Head-first stack. Rules only ever inspect or pop the head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stack<T>(Vec<T>);

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head(&self) -> Option<&T> {
        self.0.first()
    }

    pub fn push(&mut self, item: T) {
        self.0.insert(0, item);
    }

    /// Puts `items` on top, keeping their order: the first item becomes the head.
    pub fn push_all(&mut self, items: impl IntoIterator<Item = T>) {
        let mut items: Vec<T> = items.into_iter().collect();
        items.append(&mut self.0);
        self.0 = items;
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.remove(0))
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Head first.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T: PartialEq> Stack<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.0.contains(item)
    }
}

impl<T> FromIterator<T> for Stack<T> {
    /// Items are taken head first.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivateState {
    pub agenda: Stack<Action>,
    pub plan: Stack<Action>,
    /// Append-only within a session.
    pub bel: Vec<Proposition>,
    pub no_input_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedState {
    pub lu: Option<Utterance>,
    pub qud: Stack<Question>,
    pub com: Stack<Proposition>,
}

/// Cycle-local bookkeeping. Reset when a cycle starts, discarded when it ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnMarks {
    pub latched: bool,
    /// Indices into `shared.lu.moves` already handled this cycle.
    pub consumed: BTreeSet<usize>,
    pub grounded: bool,
    pub acknowledged: bool,
    /// A move-producing rule has realized this cycle's output.
    pub selected: bool,
}

/// Strict state delta. Rule transforms only describe changes through these.
#[derive(Debug, Clone, PartialEq)]
pub enum StateDelta {
    LatchUtterance(Utterance),
    ConsumeMove(usize),
    ClearAgenda,
    PushAgenda(Action),
    PrependAgenda(Vec<Action>),
    PopAgenda,
    InstallPlan(Vec<Action>),
    PopPlan,
    AddBelief(Proposition),
    PushQud(Question),
    PopQud,
    Commit(Proposition),
    Emit(Move),
    SetNoInputCount(u32),
    MarkGrounded,
    MarkAcknowledged,
    MarkSelected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformationState {
    pub private: PrivateState,
    pub shared: SharedState,
    pub next_moves: Vec<Move>,
    /// Number of rule applications that produced this version.
    pub version: u64,
    #[serde(skip)]
    pub turn: TurnMarks,
}

impl Default for InformationState {
    fn default() -> Self {
        Self::new()
    }
}

impl InformationState {
    /// Fresh session state: empty stacks, `greet` on the agenda.
    pub fn new() -> Self {
        let mut private = PrivateState::default();
        private.agenda.push(Action::Greet);
        Self {
            private,
            shared: SharedState::default(),
            next_moves: Vec::new(),
            version: 0,
            turn: TurnMarks::default(),
        }
    }

    pub fn with_beliefs(mut self, beliefs: impl IntoIterator<Item = Proposition>) -> Self {
        self.private.bel.extend(beliefs);
        self
    }

    pub fn with_agenda(mut self, agenda: impl IntoIterator<Item = Action>) -> Self {
        self.private.agenda = agenda.into_iter().collect();
        self
    }

    pub fn with_plan(mut self, plan: impl IntoIterator<Item = Action>) -> Self {
        self.private.plan = plan.into_iter().collect();
        self
    }

    pub fn with_qud(mut self, qud: impl IntoIterator<Item = Question>) -> Self {
        self.shared.qud = qud.into_iter().collect();
        self
    }

    pub fn with_commitments(mut self, com: impl IntoIterator<Item = Proposition>) -> Self {
        self.shared.com = com.into_iter().collect();
        self
    }

    pub fn begin_turn(&mut self) {
        self.next_moves.clear();
        self.turn = TurnMarks::default();
    }

    pub fn end_turn(&mut self) {
        self.turn = TurnMarks::default();
    }

    /// Beliefs not yet on the shared commitments, in belief order.
    pub fn unshared_beliefs(&self) -> impl Iterator<Item = &Proposition> + '_ {
        self.private
            .bel
            .iter()
            .filter(move |b| !self.shared.com.contains(b))
    }

    /// Latched moves not yet handled this cycle, with their index.
    pub fn pending_moves(&self) -> impl Iterator<Item = (usize, &Move)> + '_ {
        let latched = if self.turn.latched { self.shared.lu.as_ref() } else { None };
        latched
            .into_iter()
            .flat_map(|lu| lu.moves.iter().enumerate())
            .filter(move |(i, _)| !self.turn.consumed.contains(i))
    }

    /// Copy-with-changes: the input is left untouched.
    pub fn apply(&self, deltas: impl IntoIterator<Item = StateDelta>) -> Self {
        let mut next = self.clone();
        for delta in deltas {
            next.reduce(delta);
        }
        next.version += 1;
        next
    }

    /// Pure reduction: State + Delta -> Mutated State
    pub fn reduce(&mut self, delta: StateDelta) {
        match delta {
            StateDelta::LatchUtterance(utterance) => {
                self.shared.lu = Some(utterance);
                self.turn.latched = true;
                self.turn.consumed.clear();
            }
            StateDelta::ConsumeMove(index) => {
                self.turn.consumed.insert(index);
            }
            StateDelta::ClearAgenda => self.private.agenda.clear(),
            StateDelta::PushAgenda(action) => self.private.agenda.push(action),
            StateDelta::PrependAgenda(actions) => self.private.agenda.push_all(actions),
            StateDelta::PopAgenda => {
                self.private.agenda.pop();
            }
            StateDelta::InstallPlan(steps) => {
                // Replaces, never merges.
                self.private.plan = steps.into_iter().collect();
            }
            StateDelta::PopPlan => {
                self.private.plan.pop();
            }
            StateDelta::AddBelief(p) => self.private.bel.push(p),
            StateDelta::PushQud(q) => self.shared.qud.push(q),
            StateDelta::PopQud => {
                self.shared.qud.pop();
            }
            StateDelta::Commit(p) => self.shared.com.push(p),
            StateDelta::Emit(m) => self.next_moves.push(m),
            StateDelta::SetNoInputCount(n) => self.private.no_input_count = n,
            StateDelta::MarkGrounded => self.turn.grounded = true,
            StateDelta::MarkAcknowledged => self.turn.acknowledged = true,
            StateDelta::MarkSelected => self.turn.selected = true,
        }
    }
}
