use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{Preferences, QuestionBank, QuizMode};
use quiz_core::quiz::{Intent, QuizController, Transition};
use quiz_core::time::fixed_now;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{BankService, PreferencesService};
use storage::repository::{KeyValueStore, Storage, StorageError};

use crate::views::test_harness::{ViewKind, setup_view_harness};

struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Connection("unavailable".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("unavailable".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("unavailable".into()))
    }
}

fn bundled() -> QuestionBank {
    BankService::bundled().unwrap()
}

fn networking_prefs(mode: QuizMode) -> Preferences {
    Preferences {
        mode,
        randomize: false,
        chapter: Some("Réseaux".to_string()),
        ..Preferences::default()
    }
}

fn started(bank: &QuestionBank, prefs: &Preferences) -> QuizController {
    let mut controller = QuizController::new();
    controller
        .start(bank, prefs, &mut StdRng::seed_from_u64(7), fixed_now())
        .unwrap();
    controller
}

fn screens(bank: QuestionBank, prefs: Preferences, controller: QuizController) -> ViewKind {
    ViewKind::Screens {
        bank,
        prefs,
        controller,
    }
}

#[tokio::test]
async fn shell_loads_bundled_bank_into_home() {
    let mut harness = setup_view_harness(ViewKind::Shell, &Storage::in_memory());
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("12 questions dans la banque"), "{html}");
    assert!(html.contains("Réseaux"));
    assert!(html.contains("Cryptographie"));
    assert!(html.contains("home-start"));
}

#[tokio::test]
async fn shell_applies_stored_filters() {
    let storage = Storage::in_memory();
    let stored = Preferences {
        chapter: Some("Web".to_string()),
        ..Preferences::default()
    };
    PreferencesService::new(Arc::clone(&storage.kv)).save(&stored).await;

    let mut harness = setup_view_harness(ViewKind::Shell, &storage);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("2 questions correspondent aux filtres."), "{html}");
    assert!(html.contains("Commencer (2 questions)"));
}

#[tokio::test]
async fn shell_survives_unavailable_storage() {
    let storage = Storage {
        kv: Arc::new(FailingStore),
    };
    let mut harness = setup_view_harness(ViewKind::Shell, &storage);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("12 questions dans la banque"), "{html}");
    assert!(html.contains("Entraînement"));
}

#[tokio::test]
async fn training_mode_reveals_feedback_after_an_answer() {
    let bank = bundled();
    let prefs = networking_prefs(QuizMode::Training);
    let mut controller = started(&bank, &prefs);
    controller.dispatch(Intent::Answer(0), fixed_now()).unwrap();

    let mut harness = setup_view_harness(screens(bank, prefs, controller), &Storage::in_memory());
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("Question 1 / 4"), "{html}");
    assert!(html.contains("1 / 4 répondues"));
    assert!(html.contains("Mauvaise réponse"));
    assert!(html.contains("Réponse attendue : 443"));
    assert!(html.contains("RFC 2818"));
    assert!(!html.contains("quiz-timer"));
}

#[tokio::test]
async fn exam_mode_hides_feedback_and_shows_finish_prompt() {
    let bank = bundled();
    let prefs = Preferences {
        timer_enabled: true,
        timer_minutes: 1,
        ..networking_prefs(QuizMode::Exam)
    };
    let mut controller = started(&bank, &prefs);
    controller.dispatch(Intent::Answer(0), fixed_now()).unwrap();
    let prompt = controller.dispatch(Intent::Finish, fixed_now()).unwrap();
    assert_eq!(prompt, Transition::ConfirmationRequired { unanswered: 3 });

    let mut harness = setup_view_harness(screens(bank, prefs, controller), &Storage::in_memory());
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("01:00"), "{html}");
    assert!(html.contains("Examen"));
    assert!(!html.contains("quiz-feedback"));
    assert!(html.contains("confirm-message"));
    assert!(html.contains("3 questions sont sans réponse"));
}

#[tokio::test]
async fn results_show_score_and_chapter_breakdown() {
    let bank = bundled();
    let prefs = networking_prefs(QuizMode::Exam);
    let mut controller = started(&bank, &prefs);
    let now = fixed_now();
    let answers: Vec<usize> = controller
        .session()
        .unwrap()
        .questions()
        .map(|q| q.answer_index())
        .collect();
    for (position, correct) in answers.iter().enumerate() {
        // Miss the last one.
        let choice = if position + 1 == answers.len() {
            (correct + 1) % 4
        } else {
            *correct
        };
        controller.dispatch(Intent::Answer(choice), now).unwrap();
        controller.dispatch(Intent::Next, now).unwrap();
    }

    let mut harness = setup_view_harness(screens(bank, prefs, controller), &Storage::in_memory());
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("75 %"), "{html}");
    assert!(html.contains("3 / 4 bonnes réponses"));
    assert!(html.contains("Par chapitre"));
    assert!(html.contains("review review--ko"));
    assert!(!html.contains("results-reason"));
}

#[tokio::test]
async fn time_up_results_explain_the_submission() {
    let bank = bundled();
    let prefs = Preferences {
        timer_enabled: true,
        timer_minutes: 1,
        ..networking_prefs(QuizMode::Exam)
    };
    let mut controller = started(&bank, &prefs);
    for _ in 0..60 {
        controller.dispatch(Intent::Tick, fixed_now()).unwrap();
    }

    let mut harness = setup_view_harness(screens(bank, prefs, controller), &Storage::in_memory());
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("results-reason"), "{html}");
    assert!(html.contains("Temps écoulé"));
    assert!(html.contains("0 %"));
    assert!(html.contains("Sans réponse"));
}

#[tokio::test]
async fn unknown_stored_chapter_is_dropped_at_startup() {
    let storage = Storage::in_memory();
    let preferences = PreferencesService::new(Arc::clone(&storage.kv));
    let stored = Preferences {
        chapter: Some("Chapitre retiré".to_string()),
        ..Preferences::default()
    };
    preferences.save(&stored).await;

    let mut harness = setup_view_harness(ViewKind::Shell, &storage);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("12 questions correspondent aux filtres."), "{html}");
    assert!(html.contains("Commencer (10 questions)"));
    assert_eq!(preferences.load().await.chapter, None);
}

#[tokio::test(start_paused = true)]
async fn countdown_runs_in_the_view_until_time_up() {
    let bank = bundled();
    let prefs = Preferences {
        timer_enabled: true,
        timer_minutes: 1,
        ..networking_prefs(QuizMode::Exam)
    };
    let controller = started(&bank, &prefs);

    let mut harness = setup_view_harness(screens(bank, prefs, controller), &Storage::in_memory());
    harness.rebuild();
    let mut html = harness.render();
    assert!(html.contains("01:00"), "{html}");

    for _ in 0..100 {
        if html.contains("00:59") {
            break;
        }
        harness.drive_async().await;
        html = harness.render();
    }
    assert!(html.contains("00:59"), "{html}");

    for _ in 0..2_000 {
        if html.contains("results-reason") {
            break;
        }
        harness.drive_async().await;
        html = harness.render();
    }
    assert!(html.contains("Temps écoulé"), "{html}");
    assert!(html.contains("Sans réponse"));
}
