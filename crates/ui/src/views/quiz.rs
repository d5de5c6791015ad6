use std::time::Duration;

use dioxus::document::eval;
use dioxus::prelude::*;
use quiz_core::quiz::{Intent, QuizController, Screen, intent_for_key};
use tracing::warn;

use crate::context::AppContext;
use crate::views::QuizStore;
use crate::vm::{ChoiceVm, FeedbackVm, PaletteItemVm, QuizVm};

fn countdown_running(controller: &QuizController) -> bool {
    controller.screen() == Screen::Quiz && controller.session().is_some_and(|s| s.is_timed())
}

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_context::<QuizStore>();

    let dispatch = {
        let quiz = ctx.quiz();
        use_callback(move |intent: Intent| {
            let mut controller = store.controller;
            if let Err(err) = quiz.dispatch(&mut controller.write(), intent) {
                warn!(?intent, error = %err, "intent rejected");
            }
        })
    };

    // One tick per second while a timed quiz is showing. Dropped with the view.
    use_future(move || async move {
        while countdown_running(&store.controller.peek()) {
            tokio::time::sleep(Duration::from_secs(1)).await;
            if countdown_running(&store.controller.peek()) {
                dispatch.call(Intent::Tick);
            }
        }
    });

    use_effect(move || {
        let _ = eval("document.getElementById('quiz-root')?.focus();");
    });

    let on_key = move |evt: KeyboardEvent| {
        let key = evt.data.key().to_string();
        let (choice_count, confirming) = {
            let controller = store.controller.read();
            (
                controller.session().map_or(0, |s| s.current().choices().len()),
                controller.pending_finish().is_some(),
            )
        };
        if let Some(intent) = intent_for_key(&key, choice_count, confirming) {
            evt.prevent_default();
            dispatch.call(intent);
        }
    };

    let vm = {
        let controller = store.controller.read();
        controller
            .session()
            .map(|session| QuizVm::new(session, controller.pending_finish()))
    };
    let Some(vm) = vm else {
        return rsx! {};
    };
    let timer_class = if vm.time_low { "timer timer--low" } else { "timer" };
    let next_label = if vm.is_last { "Terminer" } else { "Suivant" };
    let confirm_message = vm.confirm_message();

    rsx! {
        div { class: "page quiz-page", id: "quiz-root", tabindex: "0", onkeydown: on_key,
            header { class: "quiz-header",
                span { class: "quiz-header__progress", "{vm.progress_label}" }
                span { class: "quiz-header__answered", "{vm.answered_label}" }
                span { class: "badge", "{vm.mode_label}" }
                if let Some(timer) = vm.timer_label.as_ref() {
                    span { class: timer_class, id: "quiz-timer", "{timer}" }
                }
                button {
                    class: "btn btn-ghost",
                    id: "quiz-quit",
                    r#type: "button",
                    onclick: move |_| dispatch.call(Intent::Quit),
                    "Quitter"
                }
            }

            nav { class: "palette",
                for (i, item) in vm.palette.iter().cloned().enumerate() {
                    PaletteButton { key: "{i}", item, on_intent: dispatch }
                }
            }

            section { class: "question-card",
                p { class: "question-card__meta", "{vm.chapter} · {vm.level_label}" }
                h2 { class: "question-card__text", "{vm.question}" }
                ul { class: "choices",
                    for (i, choice) in vm.choices.iter().cloned().enumerate() {
                        ChoiceButton { key: "{i}", choice, on_intent: dispatch }
                    }
                }
                if let Some(feedback) = vm.feedback.clone() {
                    FeedbackPanel { feedback }
                }
            }

            footer { class: "quiz-nav",
                button {
                    class: "btn btn-secondary",
                    id: "quiz-prev",
                    r#type: "button",
                    disabled: vm.is_first,
                    onclick: move |_| dispatch.call(Intent::Prev),
                    "Précédent"
                }
                button {
                    class: "btn btn-secondary",
                    id: "quiz-next",
                    r#type: "button",
                    onclick: move |_| dispatch.call(Intent::Next),
                    "{next_label}"
                }
                button {
                    class: "btn btn-primary",
                    id: "quiz-finish",
                    r#type: "button",
                    onclick: move |_| dispatch.call(Intent::Finish),
                    "Terminer la session"
                }
            }
            p { class: "hint", "Raccourcis : 1 à 6 pour répondre, N / P pour naviguer." }

            if let Some(message) = confirm_message {
                ConfirmDialog { message, on_intent: dispatch }
            }
        }
    }
}

#[component]
fn ChoiceButton(choice: ChoiceVm, on_intent: EventHandler<Intent>) -> Element {
    let index = choice.index;
    rsx! {
        li {
            button {
                class: choice.class(),
                r#type: "button",
                aria_pressed: "{choice.selected}",
                onclick: move |_| on_intent.call(Intent::Answer(index)),
                if let Some(shortcut) = choice.shortcut {
                    span { class: "choice__key", "{shortcut}" }
                }
                span { class: "choice__text", "{choice.text}" }
            }
        }
    }
}

#[component]
fn PaletteButton(item: PaletteItemVm, on_intent: EventHandler<Intent>) -> Element {
    let position = item.position;
    rsx! {
        button {
            class: item.class(),
            r#type: "button",
            onclick: move |_| on_intent.call(Intent::Goto(position)),
            "{item.label}"
        }
    }
}

#[component]
fn FeedbackPanel(feedback: FeedbackVm) -> Element {
    let (class, verdict) = if feedback.correct {
        ("feedback feedback--ok", "Bonne réponse")
    } else {
        ("feedback feedback--ko", "Mauvaise réponse")
    };
    rsx! {
        div { class, id: "quiz-feedback",
            p { class: "feedback__verdict", "{verdict}" }
            if !feedback.correct {
                p { "Réponse attendue : {feedback.correct_choice}" }
            }
            if let Some(explanation) = feedback.explanation.as_ref() {
                p { class: "feedback__explanation", "{explanation}" }
            }
            if !feedback.sources.is_empty() {
                ul { class: "feedback__sources",
                    for (i, source) in feedback.sources.iter().enumerate() {
                        li { key: "{i}", "{source}" }
                    }
                }
            }
        }
    }
}

#[component]
fn ConfirmDialog(message: String, on_intent: EventHandler<Intent>) -> Element {
    rsx! {
        div { class: "overlay",
            div {
                class: "dialog",
                role: "alertdialog",
                aria_modal: "true",
                aria_labelledby: "confirm-message",
                p { id: "confirm-message", "{message}" }
                div { class: "dialog__actions",
                    button {
                        class: "btn btn-secondary",
                        id: "confirm-cancel",
                        r#type: "button",
                        onclick: move |_| on_intent.call(Intent::CancelFinish),
                        "Continuer la session"
                    }
                    button {
                        class: "btn btn-primary",
                        id: "confirm-finish",
                        r#type: "button",
                        onclick: move |_| on_intent.call(Intent::ConfirmFinish),
                        "Terminer"
                    }
                }
                p { class: "hint", "Entrée pour terminer, Échap pour revenir." }
            }
        }
    }
}
