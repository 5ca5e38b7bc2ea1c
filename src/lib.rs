pub mod config;
pub mod inputs;
pub mod kernel;
pub mod lecture;
pub mod outputs;

// Re-export specific items for convenient access
pub use config::{DriverConfig, EngineConfig};
pub use kernel::engine::{RuleEngine, TurnInput};
pub use kernel::session::DialogueSession;
pub use kernel::state::InformationState;
