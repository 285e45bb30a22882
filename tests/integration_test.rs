use quiz_engine::config::Config;
use quiz_engine::models::loaders::{find_answer_sheet, load_all_quizzes, load_quiz_file};
use quiz_engine::models::{ChoiceQuestion, MatchQuestion, TrueFalseQuestion};
use quiz_engine::orchestrator::{grade_quiz, GradeOutcome};
use quiz_engine::services::randomizer::randomize;
use quiz_engine::{
    load_quiz, validate, App, CandidateAnswer, InputRejected, MatchBoard, Question, Quiz,
    QuizSession, SessionState,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::rc::Rc;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn sky_quiz() -> Quiz {
    Quiz::new(
        "Sky",
        vec![Question::TrueFalse(TrueFalseQuestion {
            text: "Sky is blue".into(),
            correct: true,
        })],
    )
}

const CURSOR_QUIZ: &str = r#"
title = "Cursor 入门"
description = "课程第一单元"

[[questions]]
kind = "mcq"
text = "Which one is an editor?"
options = ["Cursor", "Postgres", "Stripe", "Clerk"]
correct = [0]

[[questions]]
kind = "msq"
text = "Pick the AI features"
options = ["Tab completion", "Billing", "Chat", "Webhooks"]
correct = [0, 2]

[[questions]]
kind = "short"
text = "Which company makes Cursor?"
answers = ["Anysphere"]

[[questions]]
kind = "match"
text = "连线"
left = ["Cursor", "AI"]
right = ["A tool", "Smart"]
correctPairs = [[0, 0], [1, 1]]
"#;

#[test]
fn true_false_pass_end_to_end() {
    let outcome = Rc::new(RefCell::new(None));
    let sink = outcome.clone();
    let mut session = QuizSession::builder(sky_quiz())
        .on_complete(move |passed, details| {
            *sink.borrow_mut() = Some((passed, details.score.correct_count, details.score.total));
        })
        .build()
        .unwrap();

    session.set_answer(0, CandidateAnswer::Bool(true)).unwrap();
    session.submit().unwrap();

    assert_eq!(*outcome.borrow(), Some((true, 1, 1)));
}

#[test]
fn true_false_fail_then_retry_resets() {
    let passes = Rc::new(RefCell::new(Vec::new()));
    let sink = passes.clone();
    let mut session = QuizSession::builder(sky_quiz())
        .on_complete(move |passed, _| sink.borrow_mut().push(passed))
        .build()
        .unwrap();

    session.set_answer(0, CandidateAnswer::Bool(false)).unwrap();
    let result = session.submit().unwrap();
    assert!(!result.passed());

    session.retry_failed_only().unwrap();
    assert_eq!(session.state(), &SessionState::InProgress);
    assert!(session.answers().is_empty());

    session.set_answer(0, CandidateAnswer::Bool(true)).unwrap();
    session.submit().unwrap();
    assert_eq!(*passes.borrow(), vec![false, true]);
}

#[test]
fn match_scoring_ignores_pair_order() {
    let question = Question::Match(MatchQuestion::new(
        "",
        strings(&["Cursor", "AI"]),
        strings(&["A tool", "Smart"]),
        [(0, 0), (1, 1)],
    ));
    assert!(validate(&question, Some(&CandidateAnswer::pairs([(1, 1), (0, 0)]))));
}

#[test]
fn short_answer_normalization() {
    let quiz = Quiz::from_json_str(
        r#"{"title": "t", "questions": [{"kind": "short", "text": "Capital", "answers": ["Paris"]}]}"#,
    )
    .unwrap();
    assert!(validate(&quiz.questions[0], Some(&CandidateAnswer::text("  paris "))));
}

#[test]
fn full_match_detection_on_board() {
    let mut board = MatchBoard::new(2, 2);
    board.add_pair(0, 1).unwrap();
    board.add_pair(1, 0).unwrap();
    assert!(board.is_fully_matched());
    assert_eq!(board.pairs().len(), 2);
}

#[test]
fn randomized_choices_keep_correct_content() {
    let question = Question::Msq(ChoiceQuestion::new(
        "q",
        strings(&["a", "b", "c", "d", "e"]),
        [1, 3],
    ));
    let texts = |q: &Question| -> BTreeSet<String> {
        match q {
            Question::Mcq(c) | Question::Msq(c) => {
                c.correct.iter().map(|&i| c.options[i].clone()).collect()
            }
            _ => BTreeSet::new(),
        }
    };
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let randomized = randomize(&question, &mut rng);
        assert_eq!(texts(&question), texts(&randomized.question));
    }
}

#[test]
fn full_session_over_every_kind() {
    let quiz = Quiz::from_toml_str(CURSOR_QUIZ).unwrap();
    assert_eq!(quiz.description.as_deref(), Some("课程第一单元"));

    let mut session = QuizSession::builder(quiz).seed(8).build().unwrap();
    session.set_answer_original(0, CandidateAnswer::choices([0])).unwrap();
    session.set_answer_original(1, CandidateAnswer::choices([2, 0])).unwrap();
    session.set_answer(2, CandidateAnswer::text(" anysphere")).unwrap();
    session.begin_drag(3, 0).unwrap();
    session.drop_on(3, 0).unwrap();
    assert!(!session.can_submit());
    session.add_pair(3, 1, 1).unwrap();
    assert!(session.can_submit());

    let result = session.submit().unwrap();
    assert!(result.passed());
    assert_eq!(result.total, 4);
    assert_eq!(
        session.set_answer(2, CandidateAnswer::text("x")),
        Err(InputRejected::Frozen)
    );
}

#[test]
fn load_quiz_rejects_bad_pairs() {
    let quiz = Quiz::new(
        "bad",
        vec![Question::Match(MatchQuestion::new(
            "",
            strings(&["a", "b"]),
            strings(&["x", "y"]),
            [(0, 0), (0, 1)],
        ))],
    );
    assert!(load_quiz(quiz).is_err());
}

#[test]
fn loader_reads_folder_and_skips_invalid() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a_cursor.toml"), CURSOR_QUIZ).unwrap();
    fs::write(
        dir.path().join("b_broken.json"),
        r#"{"title": "broken", "questions": []}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("a_cursor.answers.toml"),
        "[[answers]]\nquestion = 0\nvalue = [0]\n",
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let folder = dir.path().to_string_lossy().to_string();
    let loaded = tokio_test::block_on(load_all_quizzes(&folder)).unwrap();
    assert_eq!(loaded.quizzes.len(), 1);
    assert_eq!(loaded.rejected.len(), 1);
    assert_eq!(loaded.quizzes[0].quiz.title, "Cursor 入门");

    let sheet = tokio_test::block_on(find_answer_sheet(&loaded.quizzes[0].file_path));
    assert_eq!(sheet, Some(dir.path().join("a_cursor.answers.toml")));

    let missing = tokio_test::block_on(load_quiz_file(&dir.path().join("nope.toml")));
    assert!(missing.is_err());
}

#[test]
fn grading_with_incomplete_sheet_does_not_submit() {
    let quiz = Quiz::from_toml_str(CURSOR_QUIZ).unwrap();
    let sheet = toml::from_str("[[answers]]\nquestion = 0\nvalue = [0]\n").unwrap();
    let outcome = grade_quiz(quiz, sheet, &Config::default()).unwrap();
    assert_eq!(outcome, GradeOutcome::Incomplete { missing: vec![1, 2, 3] });
}

#[test]
fn batch_grader_writes_results() {
    let dir = tempfile::tempdir().unwrap();
    let quizzes = dir.path().join("quizzes");
    fs::create_dir(&quizzes).unwrap();
    fs::write(quizzes.join("cursor.toml"), CURSOR_QUIZ).unwrap();
    fs::write(
        quizzes.join("cursor.answers.toml"),
        r#"
[[answers]]
question = 0
value = [0]

[[answers]]
question = 1
value = [0, 2]

[[answers]]
question = 2
value = "Anysphere"

[[answers]]
question = 3
value = [[1, 1], [0, 0]]
"#,
    )
    .unwrap();
    fs::write(
        quizzes.join("sky.json"),
        r#"{"title": "Sky", "questions": [{"kind": "truefalse", "text": "Sky is blue", "correct": true}]}"#,
    )
    .unwrap();

    let config = Config {
        quiz_folder: quizzes.to_string_lossy().to_string(),
        output_log_file: dir.path().join("report.txt").to_string_lossy().to_string(),
        results_file: dir.path().join("results.jsonl").to_string_lossy().to_string(),
        shuffle_seed: Some(3),
        ..Config::default()
    };

    let app = App::initialize(config.clone()).unwrap();
    let stats = tokio_test::block_on(app.run()).unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.graded, 1);
    assert_eq!(stats.passed, 1);
    assert_eq!(stats.without_sheet, 1);

    let results = fs::read_to_string(&config.results_file).unwrap();
    let line: serde_json::Value = serde_json::from_str(results.lines().next().unwrap()).unwrap();
    assert_eq!(line["quiz"], "Cursor 入门");
    assert_eq!(line["passed"], true);
    assert_eq!(line["original_answers"]["1"], serde_json::json!([0, 2]));
}
