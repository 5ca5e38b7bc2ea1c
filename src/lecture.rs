//! Lecture-room lookup: which room a course meets in on a given day.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::kernel::database::{fact_argument, Database};
use crate::kernel::domain::{AnswerFormat, Domain, PlanInfo};
use crate::kernel::error::{ConfigError, DomainError};
use crate::kernel::session::DialogueSession;
use crate::kernel::state::InformationState;
use crate::kernel::types::{Action, Proposition, Question};

pub const FAVORITE_FOOD: &str = "favorite_food";
pub const BOOKING_COURSE: &str = "booking_course";
pub const BOOKING_DAY: &str = "booking_day";
pub const BOOKING_ROOM: &str = "booking_room";

pub const DIALOGUE_SYSTEMS_2: &str = "LT2319";

pub const WEEKDAYS: [&str; 5] = ["monday", "tuesday", "wednesday", "thursday", "friday"];
pub const WEEKDAY_HINT: &str = "Please specify a weekday (e.g., Monday, Tuesday, etc.)";

pub fn lecture_domain() -> Result<Domain, DomainError> {
    let mut builder = Domain::builder()
        .predicate(FAVORITE_FOOD, "food")
        .predicate(BOOKING_COURSE, "course")
        .predicate(BOOKING_DAY, "day")
        .predicate(BOOKING_ROOM, "room")
        .individual("pizza", "food")
        .individual(DIALOGUE_SYSTEMS_2, "course");

    // Weekend days are valid days, just not days with lectures.
    for day in WEEKDAYS.iter().chain(["saturday", "sunday"].iter()) {
        builder = builder.individual(*day, "day");
    }

    builder
        .plan(PlanInfo::issue(
            Question::whq(BOOKING_ROOM),
            vec![
                Action::Findout(Question::whq(BOOKING_DAY)),
                Action::Findout(Question::whq(BOOKING_COURSE)),
                Action::ConsultDb(Question::whq(BOOKING_ROOM)),
            ],
        ))
        .default_answer(BOOKING_DAY, "friday")
        .default_answer(BOOKING_COURSE, DIALOGUE_SYSTEMS_2)
        .format(BOOKING_DAY, AnswerFormat::new(WEEKDAYS, WEEKDAY_HINT))
        .build()
}

/// Room schedule keyed on course and day.
#[derive(Debug, Clone)]
pub struct LectureRooms {
    schedule: Vec<(&'static str, &'static str, &'static str)>,
}

impl Default for LectureRooms {
    fn default() -> Self {
        Self {
            schedule: vec![
                (DIALOGUE_SYSTEMS_2, "friday", "G212"),
                (DIALOGUE_SYSTEMS_2, "tuesday", "J440"),
            ],
        }
    }
}

impl Database for LectureRooms {
    fn consult(&self, question: &Question, commitments: &[Proposition]) -> Option<Proposition> {
        if *question != Question::whq(BOOKING_ROOM) {
            return None;
        }
        let course = fact_argument(commitments, BOOKING_COURSE)?;
        let day = fact_argument(commitments, BOOKING_DAY)?;
        self.schedule
            .iter()
            .find(|(c, d, _)| *c == course && *d == day)
            .map(|(_, _, room)| Proposition::new(BOOKING_ROOM, *room))
    }
}

/// Initial state: `greet` on the agenda and one private belief.
pub fn initial_state() -> InformationState {
    InformationState::new().with_beliefs([Proposition::new(FAVORITE_FOOD, "pizza")])
}

pub fn session(config: EngineConfig) -> Result<DialogueSession, ConfigError> {
    let domain = Arc::new(lecture_domain()?);
    DialogueSession::new(domain, Arc::new(LectureRooms::default()), config, initial_state())
}
