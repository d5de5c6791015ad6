use crate::model::{Level, Question, QuestionBank};

/// Chapter/level selection from the filter panel. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    pub chapter: Option<String>,
    pub level: Option<Level>,
}

impl QuestionFilter {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        let chapter_ok = self
            .chapter
            .as_deref()
            .is_none_or(|chapter| question.chapter() == chapter);
        let level_ok = self.level.is_none_or(|level| question.level() == level);
        chapter_ok && level_ok
    }

    /// Matching questions, in bank order.
    #[must_use]
    pub fn apply<'a>(&self, bank: &'a QuestionBank) -> Vec<&'a Question> {
        bank.iter().filter(|q| self.matches(q)).collect()
    }

    #[must_use]
    pub fn count(&self, bank: &QuestionBank) -> usize {
        bank.iter().filter(|q| self.matches(q)).count()
    }
}
