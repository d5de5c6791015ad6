mod home;
mod quiz;
mod results;
mod shell;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use home::HomeView;
pub use quiz::QuizView;
pub use results::ResultsView;
pub use shell::{PrefsWriter, QuizScreens, QuizShell, QuizStore};
pub use state::{Notice, ViewError, ViewState, view_state_from_resource};
