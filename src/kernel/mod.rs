pub mod database;
pub mod domain;
pub mod engine;
pub mod error;
pub mod grounding;
pub mod rules;
pub mod semantics;
pub mod session;
pub mod state;
pub mod telemetry;
pub mod types;
