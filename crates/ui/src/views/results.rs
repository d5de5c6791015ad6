use dioxus::prelude::*;
use quiz_core::quiz::{Intent, QuizState, Score};
use tracing::warn;

use crate::context::AppContext;
use crate::views::{Notice, QuizStore, ViewError};
use crate::vm::{RESULTS_EXPORT_FILE, ResultsVm, ReviewRowVm, write_export};

#[component]
pub fn ResultsView() -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_context::<QuizStore>();
    let mut notice = use_signal(|| None::<Notice>);
    let quiz = ctx.quiz();

    let retry = use_callback(move |()| {
        let mut controller = store.controller;
        let shuffle = store.prefs.read().randomize;
        if let Err(err) = quiz.retry(&mut controller.write(), shuffle) {
            warn!(error = %err, "retry rejected");
            notice.set(Some(Notice::Error(ViewError::from(err))));
        }
    });

    let new_session = use_callback(move |()| {
        let mut controller = store.controller;
        if let Err(err) = quiz.dispatch(&mut controller.write(), Intent::NewSession) {
            warn!(error = %err, "new session rejected");
        }
    });

    let export_csv = {
        let export_dir = ctx.export_dir().to_path_buf();
        use_callback(move |()| {
            let csv = match quiz.results_csv(&store.controller.read()) {
                Ok(Some(csv)) => csv,
                Ok(None) => return,
                Err(err) => {
                    notice.set(Some(Notice::Error(ViewError::ExportFailed(err.to_string()))));
                    return;
                }
            };
            notice.set(Some(match write_export(&export_dir, RESULTS_EXPORT_FILE, &csv) {
                Ok(path) => Notice::Info(format!("Résultats exportés vers {}", path.display())),
                Err(err) => Notice::Error(err),
            }));
        })
    };

    let vm = match store.controller.read().state() {
        QuizState::Results {
            session,
            finished_at,
            reason,
        } => Some(ResultsVm::new(
            &Score::of(session),
            *reason,
            session.started_at(),
            *finished_at,
        )),
        _ => None,
    };
    let Some(vm) = vm else {
        return rsx! {};
    };
    let current_notice = notice.read().clone();

    rsx! {
        div { class: "page results-page",
            header { class: "page__header",
                h1 { "Résultats" }
                p { class: "muted", "Terminé le {vm.finished_at} · durée {vm.duration}" }
            }

            if let Some(note) = vm.reason_note {
                p { class: "notice notice--warn", id: "results-reason", "{note}" }
            }

            section { class: "score",
                p { class: "score__pct", id: "results-pct", "{vm.pct} %" }
                p { class: "score__ratio", "{vm.headline} bonnes réponses" }
            }

            section { class: "panel",
                h2 { "Par chapitre" }
                table { class: "chapters",
                    thead {
                        tr {
                            th { "Chapitre" }
                            th { "Score" }
                            th { "%" }
                        }
                    }
                    tbody {
                        for row in vm.chapters.iter() {
                            tr { key: "{row.chapter}",
                                td { "{row.chapter}" }
                                td { "{row.score_label}" }
                                td { "{row.pct} %" }
                            }
                        }
                    }
                }
            }

            section { class: "panel",
                h2 { "Correction" }
                ol { class: "reviews",
                    for (i, row) in vm.rows.iter().cloned().enumerate() {
                        ReviewItem { key: "{i}", row }
                    }
                }
            }

            div { class: "actions",
                button {
                    class: "btn btn-primary",
                    id: "results-retry",
                    r#type: "button",
                    onclick: move |_| retry.call(()),
                    "Recommencer"
                }
                button {
                    class: "btn btn-secondary",
                    id: "results-new",
                    r#type: "button",
                    onclick: move |_| new_session.call(()),
                    "Nouvelle session"
                }
                button {
                    class: "btn btn-secondary",
                    id: "results-export",
                    r#type: "button",
                    onclick: move |_| export_csv.call(()),
                    "Exporter en CSV"
                }
            }

            if let Some(shown) = current_notice {
                p { class: shown.class(), id: "results-notice", "{shown.text()}" }
            }
        }
    }
}

#[component]
fn ReviewItem(row: ReviewRowVm) -> Element {
    rsx! {
        li { class: row.class(),
            p { class: "review__meta", "#{row.number} · {row.chapter} · {row.level_label}" }
            p { class: "review__question", "{row.question}" }
            p { "Votre réponse : {row.chosen}" }
            if !row.correct {
                p { "Bonne réponse : {row.correct_choice}" }
            }
            if let Some(explanation) = row.explanation.as_ref() {
                p { class: "review__explanation", "{explanation}" }
            }
            if !row.sources.is_empty() {
                p { class: "review__sources", "Sources : {row.sources}" }
            }
        }
    }
}
