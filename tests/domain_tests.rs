use isu_dm::kernel::domain::{AnswerFormat, Domain, PlanInfo};
use isu_dm::kernel::error::{ConfigError, DomainError};
use isu_dm::kernel::semantics::{combine, relevant, resolves};
use isu_dm::kernel::types::{Action, Answer, Proposition, Question};
use isu_dm::lecture::{lecture_domain, BOOKING_COURSE, BOOKING_DAY, BOOKING_ROOM, DIALOGUE_SYSTEMS_2, WEEKDAY_HINT};

#[test]
fn test_lecture_domain_builds() {
    let domain = lecture_domain().expect("lecture domain should validate");

    assert_eq!(domain.predicate_sort(BOOKING_DAY), Some("day"));
    assert_eq!(domain.individual_sort(DIALOGUE_SYSTEMS_2), Some("course"));
    assert!(domain.issue_plan(&Question::whq(BOOKING_ROOM)).is_some(), "Room question should have a plan");
    assert!(domain.issue_plan(&Question::whq(BOOKING_DAY)).is_none());
    assert_eq!(
        domain.default_answer(BOOKING_COURSE),
        Some(Proposition::new(BOOKING_COURSE, DIALOGUE_SYSTEMS_2))
    );
    assert_eq!(domain.format(BOOKING_DAY).map(|f| f.hint.as_str()), Some(WEEKDAY_HINT));
}

#[test]
fn test_plan_with_unknown_predicate_is_rejected() {
    let result = Domain::builder()
        .predicate(BOOKING_DAY, "day")
        .plan(PlanInfo::issue(
            Question::whq(BOOKING_ROOM),
            vec![Action::Findout(Question::whq(BOOKING_DAY))],
        ))
        .build();

    assert_eq!(
        result,
        Err(DomainError::UnknownPredicate {
            plan: 0,
            predicate: BOOKING_ROOM.to_string(),
        })
    );
}

#[test]
fn test_respond_step_is_rejected() {
    let q = Question::whq("favorite_food");
    let result = Domain::builder()
        .predicate("favorite_food", "food")
        .plan(PlanInfo::issue(q.clone(), vec![Action::Respond(q)]))
        .build();

    assert_eq!(result, Err(DomainError::RespondInPlan { plan: 0 }));
}

#[test]
fn test_conflicting_sorts_are_rejected() {
    let result = Domain::builder()
        .individual("friday", "day")
        .individual("friday", "food")
        .build();

    assert!(
        matches!(result, Err(DomainError::ConflictingSort { ref name, .. }) if name == "friday"),
        "Got {:?}",
        result
    );
}

#[test]
fn test_default_answer_must_match_sort() {
    let result = Domain::builder()
        .predicate(BOOKING_DAY, "day")
        .individual("pizza", "food")
        .default_answer(BOOKING_DAY, "pizza")
        .build();

    assert!(matches!(result, Err(DomainError::SortMismatch { .. })), "Got {:?}", result);

    let result = Domain::builder()
        .predicate(BOOKING_DAY, "day")
        .default_answer(BOOKING_DAY, "someday")
        .build();

    assert!(matches!(result, Err(DomainError::UnknownIndividual { .. })), "Got {:?}", result);
}

#[test]
fn test_format_for_unknown_predicate_is_rejected() {
    let result = Domain::builder()
        .format(BOOKING_DAY, AnswerFormat::new(["friday"], "Say friday"))
        .build();

    assert!(matches!(result, Err(DomainError::UnknownTablePredicate { .. })), "Got {:?}", result);
}

#[test]
fn test_domain_from_json() {
    let json = r#"{
        "predicates": { "booking_day": "day", "booking_room": "room" },
        "individuals": { "friday": "day" },
        "plans": [{
            "kind": "issue",
            "content": { "kind": "whq", "predicate": "booking_room" },
            "plan": [
                { "type": "findout", "content": { "kind": "whq", "predicate": "booking_day" } },
                { "type": "consultDB", "content": { "kind": "whq", "predicate": "booking_room" } }
            ]
        }],
        "defaults": { "booking_day": "friday" }
    }"#;

    let domain = Domain::from_json(json).expect("domain json should parse");
    let plan = domain
        .issue_plan(&Question::whq(BOOKING_ROOM))
        .expect("issue plan should be indexed by its question");

    assert_eq!(plan.steps.len(), 2);
    assert_eq!(plan.steps[1], Action::ConsultDb(Question::whq(BOOKING_ROOM)));
    assert_eq!(domain.default_answer(BOOKING_DAY), Some(Proposition::new(BOOKING_DAY, "friday")));
}

#[test]
fn test_domain_json_errors() {
    let unknown = r#"{
        "predicates": { "booking_day": "day" },
        "individuals": {},
        "plans": [{
            "kind": "issue",
            "content": { "kind": "whq", "predicate": "booking_day" },
            "plan": [{ "type": "findout", "content": { "kind": "whq", "predicate": "booking_course" } }]
        }]
    }"#;
    assert!(
        matches!(Domain::from_json(unknown), Err(ConfigError::Domain(DomainError::UnknownPredicate { .. }))),
        "Unknown predicate should surface as a domain error"
    );

    assert!(matches!(Domain::from_json("{ not json"), Err(ConfigError::Parse(_))));
}

#[test]
fn test_resolves_iff_predicates_match() {
    let predicates = [BOOKING_DAY, BOOKING_COURSE, BOOKING_ROOM, "favorite_food"];
    for p in predicates {
        for q in predicates {
            let fact = Proposition::new(p, "anything");
            assert_eq!(resolves(&fact, &Question::whq(q)), p == q, "resolves({}, {})", p, q);
        }
    }
}

#[test]
fn test_short_answer_relevance_goes_through_sorts() {
    let domain = lecture_domain().expect("lecture domain should validate");
    let day = Question::whq(BOOKING_DAY);

    assert!(relevant(&domain, &Answer::Short("friday".into()), &day));
    assert!(relevant(&domain, &Answer::Short("saturday".into()), &day), "Weekend days are still days");
    assert!(!relevant(&domain, &Answer::Short("pizza".into()), &day));
    assert!(!relevant(&domain, &Answer::Short("unheard-of".into()), &day));
    assert!(relevant(&domain, &Answer::Full(Proposition::new(BOOKING_DAY, "x")), &day));

    assert_eq!(
        combine(&domain, &day, &Answer::Short("friday".into())),
        Proposition::new(BOOKING_DAY, "friday")
    );
}

#[test]
fn test_domain_format_check() {
    let domain = lecture_domain().expect("lecture domain should validate");

    assert!(domain.accepts(&Proposition::new(BOOKING_DAY, "Friday")), "Format check is case-insensitive");
    assert!(!domain.accepts(&Proposition::new(BOOKING_DAY, "saturday")));
    assert!(domain.accepts(&Proposition::new(BOOKING_COURSE, "anything")), "No format means no check");
}

#[test]
fn test_json_format_is_case_insensitive() {
    let json = r#"{
        "predicates": { "booking_day": "day" },
        "individuals": { "monday": "day" },
        "formats": { "booking_day": { "allowed": ["Monday"], "hint": "Monday only" } }
    }"#;

    let domain = Domain::from_json(json).expect("domain json should parse");

    assert!(domain.accepts(&Proposition::new(BOOKING_DAY, "monday")));
    assert!(domain.accepts(&Proposition::new(BOOKING_DAY, "MONDAY")));
    assert!(!domain.accepts(&Proposition::new(BOOKING_DAY, "friday")));

    let format = AnswerFormat::new(["Tuesday"], "Tuesday only");
    assert!(format.accepts("tuesday"), "Builder formats are normalized too");
}
