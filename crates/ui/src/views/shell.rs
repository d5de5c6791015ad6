use dioxus::prelude::*;
use quiz_core::model::{Preferences, QuestionBank};
use quiz_core::quiz::{QuizController, Screen};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tracing::{info, warn};

use crate::context::AppContext;
use crate::views::{HomeView, QuizView, ResultsView, ViewError, ViewState, view_state_from_resource};

/// Signals shared by the three screens. The controller is the single owner of
/// session state; timer ticks and UI events both go through it.
#[derive(Clone, Copy)]
pub struct QuizStore {
    pub bank: Signal<QuestionBank>,
    pub prefs: Signal<Preferences>,
    pub controller: Signal<QuizController>,
}

/// Handle to the single task that persists preferences, so edits reach the
/// store in the order they were made.
#[derive(Clone)]
pub struct PrefsWriter(UnboundedSender<Preferences>);

impl PrefsWriter {
    pub fn send(&self, prefs: Preferences) {
        if self.0.send(prefs).is_err() {
            warn!("preferences writer stopped; change not persisted");
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct StartupData {
    bank: QuestionBank,
    prefs: Preferences,
}

/// Loads the bank and preferences once, then hands over to the screens.
#[component]
pub fn QuizShell() -> Element {
    let ctx = use_context::<AppContext>();

    let resource = use_resource(move || {
        let bank_service = ctx.bank();
        let preferences = ctx.preferences();

        async move {
            let bank = bank_service.load().await.map_err(ViewError::from)?;
            let mut prefs = preferences.load().await;
            if prefs.has_unknown_chapter(&bank) {
                info!(chapter = ?prefs.chapter, "dropping chapter filter absent from the bank");
                prefs.chapter = None;
                preferences.save(&prefs).await;
            }
            Ok::<_, ViewError>(StartupData { bank, prefs })
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        match state {
            ViewState::Idle | ViewState::Loading => rsx! {
                div { class: "page", p { class: "muted", "Chargement…" } }
            },
            ViewState::Ready(data) => rsx! {
                QuizScreens {
                    bank: data.bank,
                    prefs: data.prefs,
                    controller: QuizController::new(),
                }
            },
            ViewState::Error(err) => rsx! {
                div { class: "page",
                    p { class: "notice notice--error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Réessayer"
                    }
                }
            },
        }
    }
}

#[component]
pub fn QuizScreens(bank: QuestionBank, prefs: Preferences, controller: QuizController) -> Element {
    let ctx = use_context::<AppContext>();
    let writer = use_hook(|| {
        let (tx, rx) = unbounded_channel();
        let preferences = ctx.preferences();
        spawn(async move { preferences.run_writer(rx).await });
        PrefsWriter(tx)
    });
    use_context_provider(|| writer);

    let store = QuizStore {
        bank: use_signal(|| bank),
        prefs: use_signal(|| prefs),
        controller: use_signal(|| controller),
    };
    use_context_provider(|| store);

    let screen = store.controller.read().screen();
    match screen {
        Screen::Home => rsx! { HomeView {} },
        Screen::Quiz => rsx! { QuizView {} },
        Screen::Results => rsx! { ResultsView {} },
    }
}
