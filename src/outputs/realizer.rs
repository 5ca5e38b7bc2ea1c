//! Console-only realization: outgoing moves to text.

use crate::kernel::types::{Act, Answer, Move, Proposition};
use crate::lecture::{BOOKING_COURSE, BOOKING_DAY, BOOKING_ROOM, DIALOGUE_SYSTEMS_2, FAVORITE_FOOD};

pub const GREETING: &str = "Hello! You can ask me anything!";
pub const NO_INPUT: &str = "I didn't hear anything from you.";
pub const MISUNDERSTOOD: &str = "Sorry, I didn't understand.";

/// PURE FUNCTION: `no_input` followed by an `ask` renders as one prompt.
pub fn realize(moves: &[Move]) -> String {
    let no_input = moves.iter().any(Move::is_no_input);
    let ask = moves.iter().find(|m| matches!(m.act, Act::Ask(_)));

    if let (true, Some(ask)) = (no_input, ask) {
        return format!("{} {}", NO_INPUT, realize_move(ask)).trim().to_string();
    }

    moves
        .iter()
        .map(realize_move)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn realize_move(m: &Move) -> String {
    match &m.act {
        Act::Greet => GREETING.to_string(),
        Act::NoInput => NO_INPUT.to_string(),
        Act::Ask(q) => match q.predicate.as_str() {
            BOOKING_DAY => "Which day?".to_string(),
            BOOKING_COURSE => "Which course?".to_string(),
            BOOKING_ROOM => "Where is the lecture?".to_string(),
            FAVORITE_FOOD => "What's your favorite food?".to_string(),
            other => format!("What is the {}?", other.replace('_', " ")),
        },
        Act::Answer(Answer::Full(p)) => realize_fact(p),
        Act::Answer(Answer::Short(s)) => format!("{}.", capitalize(s)),
        Act::Inform(text) | Act::Acknowledge(text) => text.clone(),
        Act::Request(_) => String::new(),
    }
}

fn realize_fact(p: &Proposition) -> String {
    match p.predicate.as_str() {
        FAVORITE_FOOD => format!("{}.", capitalize(&p.argument)),
        BOOKING_ROOM => format!("The lecture is in {}.", p.argument),
        BOOKING_DAY => format!("Let's say {}.", capitalize(&p.argument)),
        BOOKING_COURSE if p.argument == DIALOGUE_SYSTEMS_2 => "Let's say Dialogue Systems 2.".to_string(),
        _ => format!("{}: {}.", p.predicate.replace('_', " "), p.argument),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
