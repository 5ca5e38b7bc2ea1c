use std::sync::Arc;

use isu_dm::config::EngineConfig;
use isu_dm::kernel::database::Database;
use isu_dm::kernel::domain::{Domain, PlanInfo};
use isu_dm::kernel::engine::{RuleEngine, TurnInput};
use isu_dm::kernel::error::EngineError;
use isu_dm::kernel::rules::{default_rules, Rule, RuleTier};
use isu_dm::kernel::state::InformationState;
use isu_dm::kernel::telemetry::TracingObserver;
use isu_dm::kernel::types::{Action, Move, Proposition, Question, Speaker};
use isu_dm::lecture::{
    initial_state, lecture_domain, LectureRooms, BOOKING_COURSE, BOOKING_DAY, BOOKING_ROOM, DIALOGUE_SYSTEMS_2,
    FAVORITE_FOOD,
};

fn lecture_engine() -> RuleEngine {
    let domain = Arc::new(lecture_domain().expect("lecture domain should validate"));
    RuleEngine::new(domain, Arc::new(LectureRooms::default()), EngineConfig::default())
        .expect("default config should validate")
}

#[test]
fn test_rule_order_is_canonical() {
    let names: Vec<&str> = default_rules().iter().map(|r| r.name).collect();

    assert_eq!(names.first(), Some(&"clear_agenda"));
    assert_eq!(names[1], "get_latest_move");
    assert_eq!(names.last(), Some(&"select_other"));
    assert!(
        default_rules().windows(2).all(|w| w[0].tier <= w[1].tier),
        "Tiers should never go backwards in the table"
    );
}

#[test]
fn test_empty_cycle_is_idempotent() {
    let engine = lecture_engine();

    // 1. Nothing on the agenda, nothing said
    let state = InformationState::new().with_agenda([]);
    for speaker in [Speaker::Usr, Speaker::Sys] {
        let next = engine.apply_turn(&state, speaker, &[]).expect("cycle should settle");
        assert_eq!(next, state, "Empty cycle should not change a settled state");
    }

    // 2. A plan stalled on a lookup with nothing committed yet
    let stalled = InformationState::new()
        .with_agenda([])
        .with_plan([Action::ConsultDb(Question::whq(BOOKING_ROOM))]);
    let next = engine.apply_turn(&stalled, Speaker::Usr, &[]).expect("cycle should settle");
    assert_eq!(next, stalled, "Stalled consultDB should be retried without side effects");
}

#[test]
fn test_input_state_is_untouched() {
    let engine = lecture_engine();
    let state = initial_state();
    let before = state.clone();

    let next = engine.apply_turn(&state, Speaker::Usr, &[]).expect("cycle should settle");

    assert_eq!(state, before, "apply_turn must copy, not mutate");
    assert!(next.version > state.version, "Fired rules should bump the version");
}

#[test]
fn test_greet_then_answer_from_beliefs() {
    let engine = lecture_engine();

    // 1. Opening cycle: agenda [greet], no input
    let state = engine
        .apply_turn(&initial_state(), Speaker::Usr, &[])
        .expect("opening cycle should settle");
    assert_eq!(state.next_moves, vec![Move::greet()]);
    assert!(state.private.agenda.is_empty());

    // 2. User asks something the system already believes
    let state = engine
        .apply_turn(&state, Speaker::Usr, &[Move::ask(Question::whq(FAVORITE_FOOD))])
        .expect("ask cycle should settle");
    assert_eq!(
        state.next_moves,
        vec![Move::answer(Proposition::new(FAVORITE_FOOD, "pizza"))]
    );
    assert!(state.private.plan.is_empty(), "No plan should be loaded for a known answer");
    assert_eq!(state.shared.qud.head(), Some(&Question::whq(FAVORITE_FOOD)));
}

#[test]
fn test_user_ask_loads_issue_plan() {
    let engine = lecture_engine();
    let state = InformationState::new().with_agenda([]);

    let next = engine
        .apply_turn(&state, Speaker::Usr, &[Move::ask(Question::whq(BOOKING_ROOM))])
        .expect("cycle should settle");

    assert_eq!(next.next_moves, vec![Move::ask(Question::whq(BOOKING_DAY))]);
    assert_eq!(
        next.private.plan.as_slice(),
        &[
            Action::Findout(Question::whq(BOOKING_DAY)),
            Action::Findout(Question::whq(BOOKING_COURSE)),
            Action::ConsultDb(Question::whq(BOOKING_ROOM)),
        ]
    );
    assert!(next.private.agenda.is_empty(), "Realized findout should leave the agenda");
}

#[test]
fn test_echo_lands_on_qud_and_com() {
    let engine = lecture_engine();
    let state = InformationState::new().with_agenda([]);

    // 1. System asks: the question becomes open
    let state = engine
        .apply_turn(&state, Speaker::Sys, &[Move::ask(Question::whq(BOOKING_DAY))])
        .expect("echo should settle");
    assert_eq!(state.shared.qud.head(), Some(&Question::whq(BOOKING_DAY)));
    assert!(state.next_moves.is_empty(), "Echo cycles never select");

    // 2. System answers: the fact is committed and the question downdated
    let fact = Proposition::new(BOOKING_DAY, "friday");
    let state = engine
        .apply_turn(&state, Speaker::Sys, &[Move::answer(fact.clone())])
        .expect("echo should settle");
    assert!(state.shared.com.contains(&fact));
    assert!(state.shared.qud.is_empty());
}

#[test]
fn test_consult_db_commits_room_and_answers() {
    let engine = lecture_engine();
    let state = InformationState::new()
        .with_agenda([])
        .with_qud([Question::whq(BOOKING_COURSE), Question::whq(BOOKING_ROOM)])
        .with_commitments([Proposition::new(BOOKING_DAY, "tuesday")])
        .with_plan([
            Action::Findout(Question::whq(BOOKING_COURSE)),
            Action::ConsultDb(Question::whq(BOOKING_ROOM)),
        ]);

    let next = engine
        .apply_turn(&state, Speaker::Usr, &[Move::short_answer(DIALOGUE_SYSTEMS_2).with_confidence(0.9)])
        .expect("cycle should settle");

    let room = Proposition::new(BOOKING_ROOM, "J440");
    assert_eq!(next.next_moves, vec![Move::answer(room.clone())]);
    assert!(next.private.bel.contains(&room), "Lookup result should become a belief");
    assert!(next.private.plan.is_empty());
}

#[test]
fn test_request_prepends_action_plan() {
    let food = Question::whq(FAVORITE_FOOD);
    let domain = Domain::builder()
        .predicate(FAVORITE_FOOD, "food")
        .individual("pizza", "food")
        .plan(PlanInfo::action("recommend_food", vec![Action::Raise(food.clone())]))
        .build()
        .expect("domain should validate");
    let database: Arc<dyn Database> = Arc::new(|_: &Question, _: &[Proposition]| -> Option<Proposition> { None });
    let engine = RuleEngine::new(Arc::new(domain), database, EngineConfig::default())
        .expect("default config should validate");

    let state = InformationState::new().with_agenda([]);
    let next = engine
        .apply_turn(&state, Speaker::Usr, &[Move::request("recommend_food")])
        .expect("cycle should settle");

    assert_eq!(next.next_moves, vec![Move::ask(food.clone())]);
    assert!(next.private.agenda.is_empty());

    // Raise on the plan is dropped once realized.
    let state = InformationState::new().with_agenda([]).with_plan([Action::Raise(food.clone())]);
    let next = engine.apply_turn(&state, Speaker::Usr, &[]).expect("cycle should settle");
    assert_eq!(next.next_moves, vec![Move::ask(food)]);
    assert!(next.private.plan.is_empty(), "Raise should leave the plan when asked");
}

#[test]
fn test_agenda_reset_on_request() {
    let engine = lecture_engine();
    let state = initial_state();

    let next = engine
        .run(&state, &TurnInput::opening().with_agenda_reset(), &mut TracingObserver)
        .expect("cycle should settle");

    assert!(next.private.agenda.is_empty());
    assert!(next.next_moves.is_empty(), "Cleared greet should not be realized");
}

const SPIN: Rule = Rule {
    name: "spin",
    tier: RuleTier::Select,
    guard: |_| true,
    transform: |_| Vec::new(),
};

#[test]
fn test_no_progress_rule_hits_ceiling() {
    let domain = Arc::new(lecture_domain().expect("lecture domain should validate"));
    let config = EngineConfig {
        max_firings_per_turn: 8,
        ..EngineConfig::default()
    };
    let engine = RuleEngine::new(domain, Arc::new(LectureRooms::default()), config)
        .expect("config should validate")
        .with_rules(vec![SPIN]);

    let result = engine.apply_turn(&InformationState::new(), Speaker::Usr, &[]);

    assert_eq!(result, Err(EngineError::NoProgress { rule: "spin", firings: 8 }));
}
