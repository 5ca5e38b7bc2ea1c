use std::sync::Arc;

use crate::config::EngineConfig;
use super::database::Database;
use super::domain::Domain;
use super::error::{ConfigError, EngineError};
use super::rules::{default_rules, Rule, RuleContext};
use super::state::InformationState;
use super::types::{Move, Speaker};
use super::telemetry::TracingObserver;

/// What the external driver hands in once per cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnInput {
    pub speaker: Speaker,
    pub moves: Vec<Move>,
    /// Caller-specified reset condition for `clear_agenda`.
    pub reset_agenda: bool,
}

impl TurnInput {
    pub fn new(speaker: Speaker, moves: Vec<Move>) -> Self {
        Self {
            speaker,
            moves,
            reset_agenda: false,
        }
    }

    pub fn user(moves: Vec<Move>) -> Self {
        Self::new(Speaker::Usr, moves)
    }

    /// The system's own output fed back so it lands on QUD / COM.
    pub fn echo(moves: Vec<Move>) -> Self {
        Self::new(Speaker::Sys, moves)
    }

    /// A cycle with nothing said, used to open the dialogue.
    pub fn opening() -> Self {
        Self::new(Speaker::Usr, Vec::new())
    }

    pub fn with_agenda_reset(mut self) -> Self {
        self.reset_agenda = true;
        self
    }
}

/// Hook invoked by the dispatcher around every rule evaluation.
/// Rules never log themselves.
pub trait RuleObserver {
    fn on_rule_evaluated(&mut self, _rule: &Rule, _matched: bool) {}

    fn on_rule_fired(
        &mut self,
        _rule: &Rule,
        _iteration: usize,
        _before: &InformationState,
        _after: &InformationState,
    ) {
    }

    fn on_turn_completed(&mut self, _input: &TurnInput, _firings: usize, _state: &InformationState) {}
}

impl<T: RuleObserver + ?Sized> RuleObserver for &mut T {
    fn on_rule_evaluated(&mut self, rule: &Rule, matched: bool) {
        (**self).on_rule_evaluated(rule, matched)
    }

    fn on_rule_fired(&mut self, rule: &Rule, iteration: usize, before: &InformationState, after: &InformationState) {
        (**self).on_rule_fired(rule, iteration, before, after)
    }

    fn on_turn_completed(&mut self, input: &TurnInput, firings: usize, state: &InformationState) {
        (**self).on_turn_completed(input, firings, state)
    }
}

impl<A: RuleObserver, B: RuleObserver> RuleObserver for (A, B) {
    fn on_rule_evaluated(&mut self, rule: &Rule, matched: bool) {
        self.0.on_rule_evaluated(rule, matched);
        self.1.on_rule_evaluated(rule, matched);
    }

    fn on_rule_fired(&mut self, rule: &Rule, iteration: usize, before: &InformationState, after: &InformationState) {
        self.0.on_rule_fired(rule, iteration, before, after);
        self.1.on_rule_fired(rule, iteration, before, after);
    }

    fn on_turn_completed(&mut self, input: &TurnInput, firings: usize, state: &InformationState) {
        self.0.on_turn_completed(input, firings, state);
        self.1.on_turn_completed(input, firings, state);
    }
}

/// Ordered first-match rule interpreter, iterated to a fixpoint per cycle.
pub struct RuleEngine {
    rules: Vec<Rule>,
    domain: Arc<Domain>,
    database: Arc<dyn Database>,
    config: EngineConfig,
}

impl RuleEngine {
    pub fn new(domain: Arc<Domain>, database: Arc<dyn Database>, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rules: default_rules(),
            domain,
            database,
            config,
        })
    }

    /// Replaces the rule table. Order is priority.
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn apply_turn(
        &self,
        state: &InformationState,
        speaker: Speaker,
        moves: &[Move],
    ) -> Result<InformationState, EngineError> {
        self.run(state, &TurnInput::new(speaker, moves.to_vec()), &mut TracingObserver)
    }

    /// One cycle: reset cycle-local state, then fire the first matching rule
    /// and rescan from the top until a full scan fires nothing.
    pub fn run(
        &self,
        state: &InformationState,
        input: &TurnInput,
        observer: &mut dyn RuleObserver,
    ) -> Result<InformationState, EngineError> {
        let mut current = state.clone();
        current.begin_turn();
        let mut firings = 0usize;

        'scan: loop {
            for rule in &self.rules {
                let next = {
                    let ctx = RuleContext {
                        state: &current,
                        domain: &self.domain,
                        database: self.database.as_ref(),
                        config: &self.config,
                        input,
                    };
                    let matched = (rule.guard)(&ctx);
                    observer.on_rule_evaluated(rule, matched);
                    if !matched {
                        continue;
                    }
                    if firings >= self.config.max_firings_per_turn {
                        return Err(EngineError::NoProgress {
                            rule: rule.name,
                            firings,
                        });
                    }
                    current.apply((rule.transform)(&ctx))
                };
                firings += 1;
                observer.on_rule_fired(rule, firings, &current, &next);
                current = next;
                continue 'scan;
            }
            break;
        }

        current.end_turn();
        observer.on_turn_completed(input, firings, &current);
        Ok(current)
    }
}
