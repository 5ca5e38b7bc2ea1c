use thiserror::Error;

/// Rejected domain configuration. Raised at construction time, never mid-dialogue.
#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("plan {plan} references unknown predicate `{predicate}`")]
    UnknownPredicate { plan: usize, predicate: String },

    #[error("plan {plan} stores a `respond` step; respond is runtime-only")]
    RespondInPlan { plan: usize },

    #[error("issue plan {plan} has no question as its content")]
    IssueWithoutQuestion { plan: usize },

    #[error("`{name}` declared with conflicting sorts `{first}` and `{second}`")]
    ConflictingSort {
        name: String,
        first: String,
        second: String,
    },

    #[error("default for `{predicate}` names unknown individual `{individual}`")]
    UnknownIndividual { predicate: String, individual: String },

    #[error("default `{individual}` for `{predicate}` has sort `{found}`, expected `{expected}`")]
    SortMismatch {
        predicate: String,
        individual: String,
        expected: String,
        found: String,
    },

    #[error("{context} names unknown predicate `{predicate}`")]
    UnknownTablePredicate { context: &'static str, predicate: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
}

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// The firing ceiling was reached; `rule` matched but was refused a firing.
    #[error("rule `{rule}` made no progress: {firings} firings in one cycle")]
    NoProgress { rule: &'static str, firings: usize },
}
