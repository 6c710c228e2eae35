//! Integration tests for the adaptive quiz engine
//!
//! These tests drive the quiz service end to end:
//! - Answer scoring and rating updates, including the cap
//! - Next-question selection, anti-repetition and fallback
//! - Reports and reportable recent questions
//! - Topic selection and per-topic ratings
//! - Concurrent answers against the shared store

mod fixtures;

use adaptive_quiz::bank::QuestionBank;
use adaptive_quiz::error::QuizError;
use adaptive_quiz::types::{Rating, ReportFlags};
use adaptive_quiz::SelectionResult;
use std::io::Write;

use fixtures::{
    add_rated_questions, add_text_question, create_test_player, create_test_service,
    set_player_rating,
};

#[test]
fn test_correct_answer_at_equal_ratings() {
    let service = create_test_service();
    create_test_player(&service, "alice", "math");
    let question = add_text_question(&service, "fractions", 2, "numerator");

    let outcome = service
        .submit_answer("alice", question.id, " NUMERATOR ")
        .unwrap();

    assert!(outcome.feedback.answered_correct);
    assert_eq!(outcome.feedback.correct, vec!["numerator".to_string()]);
    assert!(outcome.rating_update.updated);
    assert_eq!(service.player("alice").unwrap().rating, Rating(1016.0));
    assert_eq!(service.question(question.id).unwrap().rating, Rating(984.0));
}

#[test]
fn test_wrong_answer_at_cap_leaves_ratings_untouched() {
    let service = create_test_service();
    create_test_player(&service, "alice", "math");
    set_player_rating(&service, "alice", 1500.0);
    let question = add_text_question(&service, "fractions", 5, "denominator");

    let outcome = service.submit_answer("alice", question.id, "nope").unwrap();

    assert!(!outcome.feedback.answered_correct);
    assert!(!outcome.rating_update.updated);
    assert_eq!(service.player("alice").unwrap().rating, Rating(1500.0));
    assert_eq!(service.question(question.id).unwrap().rating, Rating(1300.0));

    // The answer is still part of the history
    let history = service
        .store()
        .most_recent(&"alice".to_string(), None, 10)
        .unwrap();
    assert_eq!(history.len(), 1);
    assert!(!history[0].result);

    // Correct answers above the cap still count
    let outcome = service
        .submit_answer("alice", question.id, "denominator")
        .unwrap();
    assert!(outcome.rating_update.updated);
    assert!(service.player("alice").unwrap().rating.value() > 1500.0);

    let suppressed = service
        .metrics()
        .ratings()
        .updates_total
        .with_label_values(&["suppressed"])
        .get();
    assert_eq!(suppressed, 1);
}

#[test]
fn test_next_question_prefers_closest_rating() {
    let service = create_test_service();
    create_test_player(&service, "alice", "math");
    let questions = add_rated_questions(&service, "fractions", &[800.0, 1200.0, 990.0, 1100.0]);

    let offer = service.next_question("alice").unwrap();

    assert_eq!(offer.virtual_rating, Rating(1000.0));
    assert_eq!(offer.selection, SelectionResult::Selected(questions[2].id));
    assert_eq!(offer.question.id, questions[2].id);
    assert!(offer.recent_questions.is_empty());
}

#[test]
fn test_recently_answered_questions_are_not_repeated() {
    let service = create_test_service();
    create_test_player(&service, "alice", "math");
    let questions = add_rated_questions(
        &service,
        "fractions",
        &[1000.0, 1010.0, 1020.0, 1030.0, 1040.0, 1050.0],
    );

    for question in &questions[..5] {
        service
            .report_question("alice", question.id, ReportFlags::default(), "")
            .unwrap();
    }

    let offer = service.next_question("alice").unwrap();
    assert_eq!(offer.selection, SelectionResult::Selected(questions[5].id));

    // The oldest question drops out of the five-answer window
    service
        .report_question("alice", questions[5].id, ReportFlags::default(), "")
        .unwrap();
    let offer = service.next_question("alice").unwrap();
    assert_eq!(offer.selection, SelectionResult::Selected(questions[0].id));
}

#[test]
fn test_fallback_when_every_question_was_seen() {
    let service = create_test_service();
    create_test_player(&service, "alice", "math");
    let questions = add_rated_questions(&service, "geometry", &[1000.0, 1100.0, 1200.0]);

    for question in &questions {
        service
            .report_question("alice", question.id, ReportFlags::default(), "")
            .unwrap();
    }

    // History is [q3, q2, q1]; index 2 is the oldest
    let offer = service.next_question("alice").unwrap();
    assert_eq!(offer.selection, SelectionResult::Fallback(questions[0].id));
    assert_eq!(offer.question.id, questions[0].id);

    let fallbacks = service
        .metrics()
        .selections()
        .selections_total
        .with_label_values(&["fallback"])
        .get();
    assert_eq!(fallbacks, 1);
}

#[test]
fn test_reportable_recent_questions() {
    let service = create_test_service();
    create_test_player(&service, "alice", "math");
    let questions = add_rated_questions(&service, "fractions", &[1000.0, 1000.0, 1000.0, 1000.0]);

    for question in &questions[..3] {
        service.submit_answer("alice", question.id, "wrong").unwrap();
    }

    let offer = service.next_question("alice").unwrap();
    assert_eq!(offer.question.id, questions[3].id);

    let recent: Vec<u64> = offer.recent_questions.iter().map(|q| q.id).collect();
    assert_eq!(recent, vec![questions[2].id, questions[1].id]);
}

#[test]
fn test_reported_questions_are_not_reportable_again() {
    let service = create_test_service();
    create_test_player(&service, "alice", "math");
    let questions = add_rated_questions(&service, "fractions", &[1000.0, 1000.0, 1000.0]);

    service.submit_answer("alice", questions[0].id, "x").unwrap();
    service
        .report_question(
            "alice",
            questions[1].id,
            ReportFlags {
                red_right: true,
                ..ReportFlags::default()
            },
            "the marked answer is wrong",
        )
        .unwrap();

    let offer = service.next_question("alice").unwrap();
    assert_eq!(offer.question.id, questions[2].id);

    let recent: Vec<u64> = offer.recent_questions.iter().map(|q| q.id).collect();
    assert_eq!(recent, vec![questions[0].id]);

    let reports = service
        .store()
        .reports_for_question(questions[1].id)
        .unwrap();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].flags.red_right);
}

#[test]
fn test_topic_selection_limits_candidates() {
    let service = create_test_service();
    create_test_player(&service, "alice", "language");
    add_rated_questions(&service, "fractions", &[1000.0]);
    let verbs = add_rated_questions(&service, "verbs", &[1300.0]);

    let offer = service.next_question("alice").unwrap();
    assert_eq!(offer.question.id, verbs[0].id);

    service
        .select_topics("alice", "language", &["fractions".to_string()])
        .unwrap();
    let err = service.next_question("alice").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<QuizError>(),
        Some(QuizError::NoTopicsSelected { .. })
    ));
}

#[test]
fn test_virtual_rating_follows_recent_results() {
    let service = create_test_service();
    create_test_player(&service, "alice", "math");
    let questions = add_rated_questions(&service, "fractions", &[1000.0, 1000.0]);

    service
        .submit_answer("alice", questions[0].id, "word0")
        .unwrap();
    let stored = service.player("alice").unwrap().rating;
    assert_eq!(stored, Rating(1016.0));

    let virtual_rating = service
        .virtual_rating("alice", &["fractions".to_string()])
        .unwrap();
    assert!(virtual_rating > stored);

    // No history in the other topic
    let geometry = service
        .virtual_rating("alice", &["geometry".to_string()])
        .unwrap();
    assert_eq!(geometry, stored);
}

#[test]
fn test_rating_list_per_topic() {
    let service = create_test_service();
    create_test_player(&service, "alice", "math");
    let questions = add_rated_questions(&service, "geometry", &[1000.0]);

    service
        .submit_answer("alice", questions[0].id, "wrong")
        .unwrap();

    let ratings = service.rating_list("alice", &[]).unwrap();
    assert_eq!(ratings.len(), 2);
    assert_eq!(ratings[0].topic, "fractions");
    assert_eq!(ratings[0].rating, Rating(984.0));
    assert_eq!(ratings[1].topic, "geometry");
    assert!(ratings[1].rating < Rating(984.0));
}

#[test]
fn test_concurrent_answers_keep_ratings_consistent() {
    let service = create_test_service();
    let question = add_text_question(&service, "fractions", 2, "shared");
    let players: Vec<String> = (0..8).map(|i| format!("player{}", i)).collect();
    for player in &players {
        create_test_player(&service, player, "math");
    }

    std::thread::scope(|scope| {
        for player in &players {
            let service = &service;
            scope.spawn(move || {
                for round in 0..10 {
                    let answer = if round % 2 == 0 { "shared" } else { "other" };
                    service.submit_answer(player, question.id, answer).unwrap();
                }
            });
        }
    });

    // Equal K factors: every update moves player and question by opposite amounts
    let player_total: f64 = players
        .iter()
        .map(|player| service.player(player).unwrap().rating.value() - 1000.0)
        .sum();
    let question_total = service.question(question.id).unwrap().rating.value() - 1000.0;
    assert!((player_total + question_total).abs() < 1e-6);

    let answers: usize = players
        .iter()
        .map(|player| service.store().most_recent(player, None, 100).unwrap().len())
        .sum();
    assert_eq!(answers, 80);
}

#[test]
fn test_bank_file_drives_a_session() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[[topics]]
title = "capitals"
subject = "geography"

[[questions]]
topic = "capitals"
text = "Capital of France?"
difficulty = 2
kind = {{ type = "text", answer = "Paris" }}

[[questions]]
topic = "capitals"
text = "Is Bern the capital of Switzerland?"
difficulty = 3
kind = {{ type = "true_false", answer = true }}
"#
    )
    .unwrap();

    let service = create_test_service();
    QuestionBank::from_file(file.path())
        .unwrap()
        .load_into(&service)
        .unwrap();
    create_test_player(&service, "alice", "geography");

    let offer = service.next_question("alice").unwrap();
    assert_eq!(offer.question.text, "Capital of France?");

    let outcome = service
        .submit_answer("alice", offer.question.id, "paris")
        .unwrap();
    assert!(outcome.feedback.answered_correct);

    let offer = service.next_question("alice").unwrap();
    assert_eq!(offer.question.text, "Is Bern the capital of Switzerland?");
    let outcome = service
        .submit_answer("alice", offer.question.id, "TRUE")
        .unwrap();
    assert!(outcome.feedback.answered_correct);
}
