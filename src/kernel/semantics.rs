//! Relevance, combination and resolution between answers and questions.

use super::domain::Domain;
use super::types::{Answer, Proposition, Question};

/// A full answer is relevant when its predicate matches; a short answer when
/// the individual's sort is the sort the question's predicate ranges over.
pub fn relevant(domain: &Domain, answer: &Answer, question: &Question) -> bool {
    match answer {
        Answer::Full(p) => p.predicate == question.predicate,
        Answer::Short(individual) => match (
            domain.individual_sort(individual),
            domain.predicate_sort(&question.predicate),
        ) {
            (Some(found), Some(expected)) => found == expected,
            _ => false,
        },
    }
}

/// Belief relevance. Beliefs are always full propositions.
pub fn relevant_fact(fact: &Proposition, question: &Question) -> bool {
    fact.predicate == question.predicate
}

pub fn combine(_domain: &Domain, question: &Question, answer: &Answer) -> Proposition {
    let argument = match answer {
        Answer::Full(p) => p.argument.clone(),
        Answer::Short(individual) => individual.clone(),
    };
    Proposition::new(question.predicate.clone(), argument)
}

pub fn resolves(proposition: &Proposition, question: &Question) -> bool {
    proposition.predicate == question.predicate
}
