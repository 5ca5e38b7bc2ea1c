use isu_dm::config::{DriverConfig, EngineConfig, CLARIFICATION_TEXT, NO_INPUT_TIMEOUT_ENV};
use isu_dm::inputs::interpreter::{interpret, TYPED_CONFIDENCE};
use isu_dm::kernel::error::ConfigError;
use isu_dm::kernel::types::{Act, Answer, Move, Proposition, Question};
use isu_dm::lecture::{BOOKING_COURSE, BOOKING_DAY, BOOKING_ROOM, DIALOGUE_SYSTEMS_2, FAVORITE_FOOD};
use isu_dm::outputs::realizer::{realize, GREETING, NO_INPUT};

#[test]
fn test_interpret_phrase_table() {
    assert_eq!(interpret("  "), Some(vec![Move::no_input().with_confidence(TYPED_CONFIDENCE)]));
    assert_eq!(interpret("Hello"), Some(vec![Move::greet().with_confidence(TYPED_CONFIDENCE)]));
    assert_eq!(
        interpret("Where is the lecture?"),
        Some(vec![Move::ask(Question::whq(BOOKING_ROOM)).with_confidence(TYPED_CONFIDENCE)])
    );
    assert_eq!(
        interpret("Dialogue Systems 2"),
        Some(vec![Move::short_answer(DIALOGUE_SYSTEMS_2).with_confidence(TYPED_CONFIDENCE)])
    );
    assert_eq!(interpret("open the pod bay doors"), None, "Unknown text should not be guessed");
}

#[test]
fn test_interpret_days() {
    for day in ["Monday", "TUESDAY", "friday", "Sunday"] {
        let moves = interpret(day).unwrap_or_else(|| panic!("{} should be understood", day));
        match &moves[0].act {
            Act::Answer(Answer::Short(s)) => assert_eq!(s, &day.to_lowercase()),
            other => panic!("Expected a short answer, got {:?}", other),
        }
    }
}

#[test]
fn test_typed_input_is_intelligible_but_not_acknowledged() {
    let defaults = EngineConfig::default();
    assert!(TYPED_CONFIDENCE >= defaults.low_confidence_threshold);
    assert!(TYPED_CONFIDENCE <= defaults.acknowledge_threshold);
}

#[test]
fn test_realize_moves() {
    assert_eq!(realize(&[Move::greet()]), GREETING);
    assert_eq!(
        realize(&[Move::no_input(), Move::ask(Question::whq(BOOKING_DAY))]),
        format!("{} Which day?", NO_INPUT)
    );
    assert_eq!(realize(&[Move::no_input()]), NO_INPUT);
    assert_eq!(
        realize(&[Move::answer(Proposition::new(BOOKING_COURSE, DIALOGUE_SYSTEMS_2))]),
        "Let's say Dialogue Systems 2."
    );
    assert_eq!(
        realize(&[Move::answer(Proposition::new(FAVORITE_FOOD, "pizza"))]),
        "Pizza."
    );
    assert_eq!(
        realize(&[Move::ask(Question::whq(BOOKING_DAY)), Move::inform(CLARIFICATION_TEXT)]),
        format!("Which day? {}", CLARIFICATION_TEXT)
    );
    assert_eq!(realize(&[]), "");
}

#[test]
fn test_engine_config_from_json() {
    let config = EngineConfig::from_json(r#"{ "escalation_threshold": 2 }"#).expect("partial config should parse");
    assert_eq!(config.escalation_threshold, 2);
    assert_eq!(config.low_confidence_threshold, 0.7, "Missing fields fall back to defaults");
    assert_eq!(config.clarification_text, CLARIFICATION_TEXT);

    assert!(matches!(
        EngineConfig::from_json(r#"{ "low_confidence_threshold": 1.5 }"#),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        EngineConfig::from_json(r#"{ "escalation_threshold": 0 }"#),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(EngineConfig::from_json("[1, 2"), Err(ConfigError::Parse(_))));
}

#[test]
fn test_driver_config_from_env() {
    assert_eq!(DriverConfig::default().no_input_timeout_ms, 8_000);

    std::env::set_var(NO_INPUT_TIMEOUT_ENV, "250");
    assert_eq!(DriverConfig::from_env().no_input_timeout_ms, 250);

    std::env::set_var(NO_INPUT_TIMEOUT_ENV, "soon");
    assert_eq!(DriverConfig::from_env().no_input_timeout_ms, 8_000, "Bad values are ignored");

    std::env::remove_var(NO_INPUT_TIMEOUT_ENV);
}
