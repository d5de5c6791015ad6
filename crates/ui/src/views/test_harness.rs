use std::path::PathBuf;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use quiz_core::model::{Preferences, QuestionBank};
use quiz_core::quiz::QuizController;
use quiz_core::time::fixed_clock;
use services::{AppServices, BankService, PreferencesService, QuizService};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::{QuizScreens, QuizShell};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
    export_dir: PathBuf,
}

impl UiApp for TestApp {
    fn bank(&self) -> Arc<BankService> {
        self.services.bank()
    }

    fn preferences(&self) -> Arc<PreferencesService> {
        self.services.preferences()
    }

    fn quiz(&self) -> QuizService {
        self.services.quiz()
    }

    fn export_dir(&self) -> PathBuf {
        self.export_dir.clone()
    }
}

#[derive(Clone, PartialEq)]
pub enum ViewKind {
    /// Full startup path: load from storage, then the home screen.
    Shell,
    /// Screens seeded with an already-driven controller.
    Screens {
        bank: QuestionBank,
        prefs: Preferences,
        controller: QuizController,
    },
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewHarnessRoot(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    match props.view.clone() {
        ViewKind::Shell => rsx! { QuizShell {} },
        ViewKind::Screens {
            bank,
            prefs,
            controller,
        } => rsx! { QuizScreens { bank, prefs, controller } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let startup resources resolve.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, storage: &Storage) -> ViewHarness {
    let app = Arc::new(TestApp {
        services: AppServices::from_storage(storage, fixed_clock()),
        export_dir: std::env::temp_dir().join("qcm-ui-harness"),
    });
    let dom = VirtualDom::new_with_props(ViewHarnessRoot, ViewHarnessProps { app, view });
    ViewHarness { dom }
}
