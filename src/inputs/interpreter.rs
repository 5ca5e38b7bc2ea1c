//! Console-only phrase table: typed text to moves.

use crate::kernel::types::{Move, Question};
use crate::lecture::{BOOKING_ROOM, DIALOGUE_SYSTEMS_2, FAVORITE_FOOD, WEEKDAYS};

/// Typed input is recognized at this confidence, high enough not to trip grounding.
pub const TYPED_CONFIDENCE: f32 = 0.9;

/// `None` when the utterance is outside the table.
pub fn interpret(utterance: &str) -> Option<Vec<Move>> {
    let normalized = utterance.trim().to_lowercase();
    let moves = match normalized.as_str() {
        "" | "*no_input*" | "no_input" => vec![Move::no_input()],
        "hello" | "hi" => vec![Move::greet()],
        "where is the lecture?" | "where is the lecture" => vec![Move::ask(Question::whq(BOOKING_ROOM))],
        "what's your favorite food?" | "what's your favorite food" => {
            vec![Move::ask(Question::whq(FAVORITE_FOOD))]
        }
        "pizza" => vec![Move::short_answer("pizza")],
        "dialogue systems 2" => vec![Move::short_answer(DIALOGUE_SYSTEMS_2)],
        day if WEEKDAYS.contains(&day) || day == "saturday" || day == "sunday" => {
            vec![Move::short_answer(day)]
        }
        _ => return None,
    };
    Some(
        moves
            .into_iter()
            .map(|m| m.with_confidence(TYPED_CONFIDENCE))
            .collect(),
    )
}
