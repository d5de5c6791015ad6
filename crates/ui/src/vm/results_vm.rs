use chrono::{DateTime, Utc};
use quiz_core::quiz::{FinishReason, Score};

use crate::vm::time_fmt::{elapsed_secs, format_countdown, format_datetime};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterRowVm {
    pub chapter: String,
    pub score_label: String,
    pub pct: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRowVm {
    pub number: usize,
    pub question: String,
    pub chapter: String,
    pub level_label: &'static str,
    pub chosen: String,
    pub correct_choice: String,
    pub correct: bool,
    pub explanation: Option<String>,
    pub sources: String,
}

impl ReviewRowVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        if self.correct {
            "review review--ok"
        } else {
            "review review--ko"
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub headline: String,
    pub pct: u32,
    pub reason_note: Option<&'static str>,
    pub finished_at: String,
    pub duration: String,
    pub chapters: Vec<ChapterRowVm>,
    pub rows: Vec<ReviewRowVm>,
}

impl ResultsVm {
    #[must_use]
    pub fn new(
        score: &Score,
        reason: FinishReason,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let chapters = score
            .chapters
            .iter()
            .map(|c| ChapterRowVm {
                chapter: c.chapter.clone(),
                score_label: format!("{} / {}", c.ok, c.total),
                pct: c.pct(),
            })
            .collect();

        let rows = score
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| ReviewRowVm {
                number: i + 1,
                question: row.question.text().to_string(),
                chapter: row.question.chapter().to_string(),
                level_label: row.question.level().label(),
                chosen: row
                    .chosen_text()
                    .map_or_else(|| "Sans réponse".to_string(), str::to_string),
                correct_choice: row.question.correct_choice().to_string(),
                correct: row.correct,
                explanation: row.question.explanation().map(str::to_string),
                sources: row.question.sources().join(" · "),
            })
            .collect();

        Self {
            headline: format!("{} / {}", score.ok, score.total),
            pct: score.pct,
            reason_note: match reason {
                FinishReason::TimeUp => Some("Temps écoulé : la session a été soumise automatiquement."),
                FinishReason::Completed | FinishReason::Confirmed => None,
            },
            finished_at: format_datetime(finished_at),
            duration: format_countdown(elapsed_secs(started_at, finished_at)),
            chapters,
            rows,
        }
    }
}
