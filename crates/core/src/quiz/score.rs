use crate::model::Question;
use crate::quiz::session::QuizSession;

/// `round(100 * ok / total)`, halves rounded up, `0` for an empty total.
#[must_use]
pub fn percentage(ok: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let ok = u64::from(ok);
    let total = u64::from(total);
    let pct = (200 * ok + total) / (2 * total);
    u32::try_from(pct).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterScore {
    pub chapter: String,
    pub ok: u32,
    pub total: u32,
}

impl ChapterScore {
    #[must_use]
    pub fn pct(&self) -> u32 {
        percentage(self.ok, self.total)
    }
}

/// One question of a finished session, as shown on the results screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub question: Question,
    pub chosen: Option<usize>,
    pub correct: bool,
}

impl ReviewRow {
    #[must_use]
    pub fn chosen_text(&self) -> Option<&str> {
        self.chosen.and_then(|i| self.question.choice(i))
    }
}

/// Derived score of a session. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub ok: u32,
    pub total: u32,
    pub pct: u32,
    /// Chapters in order of first appearance in the session.
    pub chapters: Vec<ChapterScore>,
    pub rows: Vec<ReviewRow>,
}

impl Score {
    #[must_use]
    pub fn of(session: &QuizSession) -> Self {
        let mut ok = 0_u32;
        let mut total = 0_u32;
        let mut chapters: Vec<ChapterScore> = Vec::new();
        let mut rows = Vec::with_capacity(session.len());

        for question in session.questions() {
            let chosen = session.answer_for(question.id());
            let correct = chosen == Some(question.answer_index());

            total = total.saturating_add(1);
            if correct {
                ok = ok.saturating_add(1);
            }

            let idx = match chapters.iter().position(|c| c.chapter == question.chapter()) {
                Some(idx) => idx,
                None => {
                    chapters.push(ChapterScore {
                        chapter: question.chapter().to_string(),
                        ok: 0,
                        total: 0,
                    });
                    chapters.len() - 1
                }
            };
            let entry = &mut chapters[idx];
            entry.total += 1;
            if correct {
                entry.ok += 1;
            }

            rows.push(ReviewRow {
                question: question.clone(),
                chosen,
                correct,
            });
        }

        Self {
            ok,
            total,
            pct: percentage(ok, total),
            chapters,
            rows,
        }
    }
}
