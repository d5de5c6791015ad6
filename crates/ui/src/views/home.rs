use dioxus::prelude::*;
use quiz_core::model::{QuestionBank, QuizMode};

use crate::context::AppContext;
use crate::views::{Notice, PrefsWriter, QuizStore, ViewError};
use crate::vm::{BANK_EXPORT_FILE, HomeVm, PrefsEdit, read_import_file, write_export};

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_context::<QuizStore>();
    let writer = use_context::<PrefsWriter>();
    let mut notice = use_signal(|| None::<Notice>);
    let mut import_path = use_signal(String::new);

    let edit_prefs = use_callback(move |edit: PrefsEdit| {
        let mut prefs = store.prefs;
        edit.apply(&mut prefs.write());
        writer.send(prefs.peek().clone());
    });

    // Swap in a new bank, clearing a chapter filter it has no questions for.
    let replace_bank = move |bank: QuestionBank| {
        let stale_chapter = store.prefs.peek().has_unknown_chapter(&bank);
        let mut bank_signal = store.bank;
        bank_signal.set(bank);
        if stale_chapter {
            edit_prefs.call(PrefsEdit::Chapter(None));
        }
    };

    let start = {
        let quiz = ctx.quiz();
        use_callback(move |()| {
            let mut controller = store.controller;
            let result = quiz.start(&mut controller.write(), &store.bank.read(), &store.prefs.read());
            if let Err(err) = result {
                notice.set(Some(Notice::Error(ViewError::from(err))));
            }
        })
    };

    let import_bank = {
        let bank_service = ctx.bank();
        use_callback(move |()| {
            let raw = match read_import_file(&import_path.read()) {
                Ok(raw) => raw,
                Err(err) => {
                    notice.set(Some(Notice::Error(err)));
                    return;
                }
            };
            let bank_service = bank_service.clone();
            spawn(async move {
                match bank_service.import_json(&raw).await {
                    Ok(bank) => {
                        let count = bank.len();
                        replace_bank(bank);
                        notice.set(Some(Notice::Info(format!("{count} questions importées."))));
                    }
                    Err(err) => notice.set(Some(Notice::Error(ViewError::from(err)))),
                }
            });
        })
    };

    let export_bank = {
        let bank_service = ctx.bank();
        let export_dir = ctx.export_dir().to_path_buf();
        use_callback(move |()| {
            let written = bank_service
                .export_json(&store.bank.read())
                .map_err(ViewError::from)
                .and_then(|json| write_export(&export_dir, BANK_EXPORT_FILE, &json));
            notice.set(Some(match written {
                Ok(path) => Notice::Info(format!("Banque exportée vers {}", path.display())),
                Err(err) => Notice::Error(err),
            }));
        })
    };

    let reset_bank = {
        let bank_service = ctx.bank();
        use_callback(move |()| {
            let bank_service = bank_service.clone();
            spawn(async move {
                match bank_service.reset().await {
                    Ok(bank) => {
                        replace_bank(bank);
                        notice.set(Some(Notice::Info("Banque par défaut restaurée.".to_string())));
                    }
                    Err(err) => notice.set(Some(Notice::Error(ViewError::from(err)))),
                }
            });
        })
    };

    let prefs = store.prefs.read().clone();
    let vm = HomeVm::new(&store.bank.read(), &prefs);
    let current_notice = notice.read().clone();
    let export_dir_label = ctx.export_dir().display().to_string();
    let selected_chapter = prefs.chapter.clone().unwrap_or_default();
    let selected_level = prefs.level.map(|level| level.as_str()).unwrap_or_default();

    rsx! {
        div { class: "page home-page",
            header { class: "page__header",
                h1 { "Entraînement QCM" }
                p { class: "muted", "{vm.bank_size} questions dans la banque" }
            }

            section { class: "panel",
                h2 { "Session" }

                div { class: "field",
                    label { r#for: "pref-mode", "Mode" }
                    select {
                        id: "pref-mode",
                        onchange: move |evt: FormEvent| {
                            if let Ok(mode) = evt.value().parse::<QuizMode>() {
                                edit_prefs.call(PrefsEdit::Mode(mode));
                            }
                        },
                        for mode in [QuizMode::Training, QuizMode::Exam] {
                            option {
                                key: "{mode.as_str()}",
                                value: mode.as_str(),
                                selected: prefs.mode == mode,
                                "{mode.label()}"
                            }
                        }
                    }
                    p { class: "hint", "{vm.mode_hint}" }
                }

                div { class: "field field--inline",
                    input {
                        id: "pref-randomize",
                        r#type: "checkbox",
                        checked: prefs.randomize,
                        onchange: move |evt: FormEvent| edit_prefs.call(PrefsEdit::Randomize(evt.checked())),
                    }
                    label { r#for: "pref-randomize", "Ordre aléatoire" }
                }

                div { class: "field field--inline",
                    input {
                        id: "pref-timer",
                        r#type: "checkbox",
                        checked: prefs.timer_enabled,
                        onchange: move |evt: FormEvent| edit_prefs.call(PrefsEdit::Timer(evt.checked())),
                    }
                    label { r#for: "pref-timer", "Minuteur" }
                    input {
                        id: "pref-timer-minutes",
                        r#type: "number",
                        min: "1",
                        max: "180",
                        value: "{prefs.timer_minutes}",
                        disabled: !prefs.timer_enabled,
                        oninput: move |evt: FormEvent| {
                            if let Some(edit) = PrefsEdit::timer_minutes_from_input(&evt.value()) {
                                edit_prefs.call(edit);
                            }
                        },
                    }
                    span { class: "hint", "minutes" }
                }

                div { class: "field",
                    label { r#for: "pref-chapter", "Chapitre" }
                    select {
                        id: "pref-chapter",
                        onchange: move |evt: FormEvent| edit_prefs.call(PrefsEdit::chapter_from_input(&evt.value())),
                        option { value: "", selected: selected_chapter.is_empty(), "Tous les chapitres" }
                        for chapter in vm.chapters.iter() {
                            option {
                                key: "{chapter}",
                                value: "{chapter}",
                                selected: *chapter == selected_chapter,
                                "{chapter}"
                            }
                        }
                    }
                }

                div { class: "field",
                    label { r#for: "pref-level", "Niveau" }
                    select {
                        id: "pref-level",
                        onchange: move |evt: FormEvent| edit_prefs.call(PrefsEdit::level_from_input(&evt.value())),
                        option { value: "", selected: selected_level.is_empty(), "Tous les niveaux" }
                        for level in vm.levels.iter() {
                            option {
                                key: "{level.value}",
                                value: level.value,
                                selected: level.value == selected_level,
                                "{level.label}"
                            }
                        }
                    }
                }

                div { class: "field",
                    label { r#for: "pref-count", "Nombre de questions" }
                    input {
                        id: "pref-count",
                        r#type: "number",
                        min: "1",
                        value: "{prefs.count}",
                        oninput: move |evt: FormEvent| {
                            if let Some(edit) = PrefsEdit::count_from_input(&evt.value()) {
                                edit_prefs.call(edit);
                            }
                        },
                    }
                }

                p { class: "hint", id: "home-matching", "{vm.matching_label()}" }

                button {
                    class: "btn btn-primary",
                    id: "home-start",
                    r#type: "button",
                    disabled: !vm.can_start(),
                    onclick: move |_| start.call(()),
                    "Commencer ({vm.session_size} questions)"
                }
            }

            section { class: "panel",
                h2 { "Banque de questions" }
                div { class: "field",
                    label { r#for: "import-path", "Fichier JSON à importer" }
                    input {
                        id: "import-path",
                        r#type: "text",
                        placeholder: "/chemin/vers/banque.json",
                        value: "{import_path}",
                        oninput: move |evt: FormEvent| import_path.set(evt.value()),
                    }
                }
                div { class: "actions",
                    button {
                        class: "btn btn-secondary",
                        id: "bank-import",
                        r#type: "button",
                        onclick: move |_| import_bank.call(()),
                        "Importer"
                    }
                    button {
                        class: "btn btn-secondary",
                        id: "bank-export",
                        r#type: "button",
                        onclick: move |_| export_bank.call(()),
                        "Exporter la banque"
                    }
                    button {
                        class: "btn btn-ghost",
                        id: "bank-reset",
                        r#type: "button",
                        onclick: move |_| reset_bank.call(()),
                        "Banque par défaut"
                    }
                }
                p { class: "hint", "Exports écrits dans {export_dir_label}" }
            }

            if let Some(shown) = current_notice {
                p { class: shown.class(), id: "home-notice", "{shown.text()}" }
            }
        }
    }
}
