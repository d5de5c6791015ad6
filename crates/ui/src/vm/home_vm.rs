use quiz_core::model::{Level, MAX_TIMER_MINUTES, Preferences, QuestionBank, QuizMode};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelOptionVm {
    pub value: &'static str,
    pub label: &'static str,
}

/// Everything the home screen shows besides the form values themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomeVm {
    pub bank_size: usize,
    pub chapters: Vec<String>,
    pub levels: Vec<LevelOptionVm>,
    pub matching: usize,
    /// Questions the next session will actually contain.
    pub session_size: usize,
    pub mode_hint: &'static str,
}

impl HomeVm {
    #[must_use]
    pub fn new(bank: &QuestionBank, prefs: &Preferences) -> Self {
        let matching = prefs.filter().count(bank);
        Self {
            bank_size: bank.len(),
            chapters: bank.chapters().into_iter().map(str::to_string).collect(),
            levels: Level::ALL
                .into_iter()
                .map(|level| LevelOptionVm {
                    value: level.as_str(),
                    label: level.label(),
                })
                .collect(),
            matching,
            session_size: prefs.effective_count(bank.len()).min(matching),
            mode_hint: mode_hint(prefs.mode),
        }
    }

    #[must_use]
    pub fn can_start(&self) -> bool {
        self.matching > 0
    }

    #[must_use]
    pub fn matching_label(&self) -> String {
        match self.matching {
            0 => "Aucune question ne correspond aux filtres.".to_string(),
            1 => "1 question correspond aux filtres.".to_string(),
            n => format!("{n} questions correspondent aux filtres."),
        }
    }
}

/// One change made on the home form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrefsEdit {
    Mode(QuizMode),
    Randomize(bool),
    Timer(bool),
    TimerMinutes(u32),
    Chapter(Option<String>),
    Level(Option<Level>),
    Count(usize),
}

impl PrefsEdit {
    /// Decode a `<select>` value where `""` means "all".
    #[must_use]
    pub fn chapter_from_input(value: &str) -> Self {
        let value = value.trim();
        PrefsEdit::Chapter((!value.is_empty()).then(|| value.to_string()))
    }

    #[must_use]
    pub fn level_from_input(value: &str) -> Self {
        PrefsEdit::Level(value.parse().ok())
    }

    /// Numeric inputs report partial text while typing; ignore what does not parse.
    #[must_use]
    pub fn timer_minutes_from_input(value: &str) -> Option<Self> {
        value
            .trim()
            .parse::<u32>()
            .ok()
            .map(|m| PrefsEdit::TimerMinutes(m.clamp(1, MAX_TIMER_MINUTES)))
    }

    #[must_use]
    pub fn count_from_input(value: &str) -> Option<Self> {
        value
            .trim()
            .parse::<usize>()
            .ok()
            .map(|c| PrefsEdit::Count(c.max(1)))
    }

    pub fn apply(self, prefs: &mut Preferences) {
        match self {
            PrefsEdit::Mode(mode) => prefs.mode = mode,
            PrefsEdit::Randomize(on) => prefs.randomize = on,
            PrefsEdit::Timer(on) => prefs.timer_enabled = on,
            PrefsEdit::TimerMinutes(minutes) => prefs.timer_minutes = minutes,
            PrefsEdit::Chapter(chapter) => prefs.chapter = chapter,
            PrefsEdit::Level(level) => prefs.level = level,
            PrefsEdit::Count(count) => prefs.count = count,
        }
    }
}

fn mode_hint(mode: QuizMode) -> &'static str {
    match mode {
        QuizMode::Training => "La correction s'affiche dès que vous répondez.",
        QuizMode::Exam => "La correction n'apparaît qu'à la fin de la session.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::BankService;

    #[test]
    fn counts_matching_and_caps_session_size() {
        let bank = BankService::bundled().unwrap();
        let prefs = Preferences {
            chapter: Some("Réseaux".into()),
            count: 50,
            ..Preferences::default()
        };
        let vm = HomeVm::new(&bank, &prefs);
        assert_eq!(vm.matching, 4);
        assert_eq!(vm.session_size, 4);
        assert!(vm.chapters.contains(&"Web".to_string()));
        assert_eq!(vm.levels.len(), 3);
    }

    #[test]
    fn empty_selection_cannot_start() {
        let bank = BankService::bundled().unwrap();
        let prefs = Preferences {
            chapter: Some("Inexistant".into()),
            ..Preferences::default()
        };
        let vm = HomeVm::new(&bank, &prefs);
        assert!(!vm.can_start());
        assert_eq!(vm.session_size, 0);
        assert_eq!(vm.matching_label(), "Aucune question ne correspond aux filtres.");
    }

    #[test]
    fn form_inputs_decode_into_edits() {
        let mut prefs = Preferences::default();
        PrefsEdit::chapter_from_input("Web").apply(&mut prefs);
        PrefsEdit::level_from_input("avancé").apply(&mut prefs);
        PrefsEdit::timer_minutes_from_input("999").unwrap().apply(&mut prefs);
        PrefsEdit::count_from_input("0").unwrap().apply(&mut prefs);
        assert_eq!(prefs.chapter.as_deref(), Some("Web"));
        assert_eq!(prefs.level, Some(Level::Advanced));
        assert_eq!(prefs.timer_minutes, MAX_TIMER_MINUTES);
        assert_eq!(prefs.count, 1);

        PrefsEdit::chapter_from_input("").apply(&mut prefs);
        PrefsEdit::level_from_input("").apply(&mut prefs);
        assert_eq!(prefs.chapter, None);
        assert_eq!(prefs.level, None);
        assert_eq!(PrefsEdit::count_from_input("1a"), None);
    }
}
