use super::types::{Proposition, Question};

/// Lookup contract called by the plan interpreter.
///
/// Implementations must be deterministic and may only read the commitments
/// they are handed.
pub trait Database: Send + Sync {
    fn consult(&self, question: &Question, commitments: &[Proposition]) -> Option<Proposition>;
}

impl<F> Database for F
where
    F: Fn(&Question, &[Proposition]) -> Option<Proposition> + Send + Sync,
{
    fn consult(&self, question: &Question, commitments: &[Proposition]) -> Option<Proposition> {
        self(question, commitments)
    }
}

/// Argument of the most recent commitment on `predicate`.
pub fn fact_argument<'a>(commitments: &'a [Proposition], predicate: &str) -> Option<&'a str> {
    commitments
        .iter()
        .find(|p| p.predicate == predicate)
        .map(|p| p.argument.as_str())
}
