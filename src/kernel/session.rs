use std::sync::Arc;
use tracing::{info, info_span};
use uuid::Uuid;

use crate::config::EngineConfig;
use super::database::Database;
use super::domain::Domain;
use super::engine::{RuleEngine, TurnInput};
use super::error::{ConfigError, EngineError};
use super::state::InformationState;
use super::telemetry::recorder::TelemetryRecorder;
use super::telemetry::TracingObserver;
use super::types::Move;

/// One dialogue: owns the information state and serializes cycles against it.
pub struct DialogueSession {
    pub id: Uuid,
    engine: RuleEngine,
    state: InformationState,
    pub telemetry: TelemetryRecorder,
}

impl DialogueSession {
    /// Domain and database are built once by the caller and handed in here.
    pub fn new(
        domain: Arc<Domain>,
        database: Arc<dyn Database>,
        config: EngineConfig,
        initial: InformationState,
    ) -> Result<Self, ConfigError> {
        let telemetry = TelemetryRecorder::new(config.escalation_threshold);
        let engine = RuleEngine::new(domain, database, config)?;
        Ok(Self::with_engine(engine, initial, telemetry))
    }

    pub fn with_engine(engine: RuleEngine, initial: InformationState, telemetry: TelemetryRecorder) -> Self {
        let id = Uuid::new_v4();
        info!(session = %id, "Dialogue session created");
        Self {
            id,
            engine,
            state: initial,
            telemetry,
        }
    }

    pub fn state(&self) -> &InformationState {
        &self.state
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Runs exactly one cycle and returns its outgoing moves.
    pub fn step(&mut self, input: TurnInput) -> Result<Vec<Move>, EngineError> {
        let _span = info_span!("cycle", session = %self.id, speaker = ?input.speaker).entered();
        let mut observer = (&mut self.telemetry, TracingObserver);
        let next = self.engine.run(&self.state, &input, &mut observer)?;
        self.state = next;
        Ok(self.state.next_moves.clone())
    }

    /// Opening cycle (nothing said yet), followed by the echo of what the system said.
    pub fn start(&mut self) -> Result<Vec<Move>, EngineError> {
        self.converse(TurnInput::opening())
    }

    /// A user turn, followed by the echo of the system's reply.
    pub fn hear(&mut self, moves: Vec<Move>) -> Result<Vec<Move>, EngineError> {
        self.converse(TurnInput::user(moves))
    }

    fn converse(&mut self, input: TurnInput) -> Result<Vec<Move>, EngineError> {
        let reply = self.step(input)?;
        if !reply.is_empty() {
            self.step(TurnInput::echo(reply.clone()))?;
        }
        info!(session = %self.id, moves = reply.len(), "System reply ready");
        Ok(reply)
    }
}
