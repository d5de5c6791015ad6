mod files;
mod home_vm;
mod quiz_vm;
mod results_vm;
mod time_fmt;

pub use files::{BANK_EXPORT_FILE, RESULTS_EXPORT_FILE, read_import_file, write_export};
pub use home_vm::{HomeVm, LevelOptionVm, PrefsEdit};
pub use quiz_vm::{ChoiceVerdict, ChoiceVm, FeedbackVm, PaletteItemVm, QuizVm};
pub use results_vm::{ChapterRowVm, ResultsVm, ReviewRowVm};
pub use time_fmt::{format_countdown, format_datetime};
