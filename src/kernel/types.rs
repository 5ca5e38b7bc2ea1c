use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Usr,
    Sys,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Whq,
}

/// An open wh-question over a single predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    pub kind: QuestionKind,
    pub predicate: String,
}

impl Question {
    pub fn whq(predicate: impl Into<String>) -> Self {
        Self {
            kind: QuestionKind::Whq,
            predicate: predicate.into(),
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?x.{}(x)", self.predicate)
    }
}

/// A fully resolved fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proposition {
    pub predicate: String,
    pub argument: String,
}

impl Proposition {
    pub fn new(predicate: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
            argument: argument.into(),
        }
    }
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.predicate, self.argument)
    }
}

/// Content of an answer move: either a full proposition or a bare individual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Full(Proposition),
    Short(String),
}

impl From<Proposition> for Answer {
    fn from(p: Proposition) -> Self {
        Answer::Full(p)
    }
}

/// One step of a domain plan. `Respond` is synthesized at runtime and never stored in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Action {
    Greet,
    Respond(Question),
    Raise(Question),
    Findout(Question),
    #[serde(rename = "consultDB")]
    ConsultDb(Question),
}

impl Action {
    pub fn question(&self) -> Option<&Question> {
        match self {
            Action::Greet => None,
            Action::Respond(q) | Action::Raise(q) | Action::Findout(q) | Action::ConsultDb(q) => Some(q),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Greet => "greet",
            Action::Respond(_) => "respond",
            Action::Raise(_) => "raise",
            Action::Findout(_) => "findout",
            Action::ConsultDb(_) => "consultDB",
        }
    }
}

/// Speech act payload, one case per move kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Act {
    Greet,
    Request(Option<String>),
    Ask(Question),
    Answer(Answer),
    NoInput,
    Inform(String),
    Acknowledge(String),
}

/// A speech act plus its recognition confidence.
/// `None` means the act was typed or generated, and counts as full confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub act: Act,
    #[serde(
        default,
        deserialize_with = "clamped_confidence",
        skip_serializing_if = "Option::is_none"
    )]
    pub confidence: Option<f32>,
}

/// Recognizer scores outside [0, 1] are pinned to the range.
fn clamped_confidence<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f32>, D::Error> {
    Ok(Option::<f32>::deserialize(deserializer)?.map(|c| c.clamp(0.0, 1.0)))
}

impl Move {
    pub fn new(act: Act) -> Self {
        Self { act, confidence: None }
    }

    pub fn greet() -> Self {
        Self::new(Act::Greet)
    }

    pub fn request(action: impl Into<String>) -> Self {
        Self::new(Act::Request(Some(action.into())))
    }

    pub fn ask(question: Question) -> Self {
        Self::new(Act::Ask(question))
    }

    pub fn answer(answer: impl Into<Answer>) -> Self {
        Self::new(Act::Answer(answer.into()))
    }

    pub fn short_answer(individual: impl Into<String>) -> Self {
        Self::new(Act::Answer(Answer::Short(individual.into())))
    }

    pub fn no_input() -> Self {
        Self::new(Act::NoInput)
    }

    pub fn inform(text: impl Into<String>) -> Self {
        Self::new(Act::Inform(text.into()))
    }

    pub fn acknowledge(text: impl Into<String>) -> Self {
        Self::new(Act::Acknowledge(text.into()))
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    pub fn confidence(&self) -> f32 {
        self.confidence.unwrap_or(1.0)
    }

    pub fn is_no_input(&self) -> bool {
        matches!(self.act, Act::NoInput)
    }

    /// Recognized below `threshold`. `no_input` carries nothing to misrecognize;
    /// a NaN confidence never clears the threshold.
    pub fn is_unclear(&self, threshold: f32) -> bool {
        !self.is_no_input() && !(self.confidence() >= threshold)
    }

    /// Moves that count as the user actually engaging (resets silence tracking).
    pub fn is_contentful(&self) -> bool {
        matches!(self.act, Act::Ask(_) | Act::Answer(_) | Act::Request(_))
    }
}

impl From<Act> for Move {
    fn from(act: Act) -> Self {
        Move::new(act)
    }
}

/// The latest utterance, latched into `shared.lu`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: Speaker,
    pub moves: Vec<Move>,
}

impl Utterance {
    pub fn new(speaker: Speaker, moves: Vec<Move>) -> Self {
        Self { speaker, moves }
    }

    pub fn is_silence(&self) -> bool {
        !self.moves.is_empty() && self.moves.iter().all(Move::is_no_input)
    }

    pub fn has_contentful_move(&self) -> bool {
        self.moves.iter().any(Move::is_contentful)
    }

    /// False if any move was recognized below `threshold`.
    pub fn is_intelligible(&self, threshold: f32) -> bool {
        !self.moves.iter().any(|m| m.is_unclear(threshold))
    }
}
