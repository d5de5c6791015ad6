use csv::{QuoteStyle, Terminator, WriterBuilder};

use quiz_core::model::QuestionBank;
use quiz_core::quiz::Score;

use crate::error::ExportError;

pub const RESULTS_HEADER: &str = "id;chapitre;niveau;question;choix;reponse;correct;explication;sources";

const CHOICE_SEPARATOR: &str = "|";
const SOURCE_SEPARATOR: &str = " || ";

/// Pretty-printed JSON array, readable back by `parse_bank`.
///
/// # Errors
///
/// Returns `ExportError::Json` if serialization fails.
pub fn bank_to_json(bank: &QuestionBank) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(bank)?)
}

/// Semicolon table of a finished session, one row per question in visiting
/// order. Every field is quoted and embedded quotes are doubled.
///
/// # Errors
///
/// Returns `ExportError` if the CSV writer fails.
pub fn results_csv(score: &Score) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(Vec::new());

    for row in &score.rows {
        let question = &row.question;
        let choices = question.choices().join(CHOICE_SEPARATOR);
        let sources = question.sources().join(SOURCE_SEPARATOR);
        let correct = if row.correct { "1" } else { "0" };
        writer.write_record([
            question.id().as_str(),
            question.chapter(),
            question.level().as_str(),
            question.text(),
            choices.as_str(),
            row.chosen_text().unwrap_or_default(),
            correct,
            question.explanation().unwrap_or_default(),
            sources.as_str(),
        ])?;
    }

    let body = writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.error().to_string()))?;
    let body = String::from_utf8(body)?;

    let mut out = String::with_capacity(RESULTS_HEADER.len() + 1 + body.len());
    out.push_str(RESULTS_HEADER);
    out.push('\n');
    out.push_str(&body);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parse_bank;
    use quiz_core::model::{Level, QuestionDraft, QuestionId, QuestionKind, QuizMode};
    use quiz_core::quiz::QuizSession;
    use quiz_core::time::fixed_now;

    fn session() -> QuizSession {
        let quoted = QuestionDraft {
            id: QuestionId::new("7"),
            kind: QuestionKind::Mcq,
            chapitre: "Web".into(),
            niveau: Level::Intermediate,
            question: "Quel en-tête ?".into(),
            choices: vec!["Content-Type".into(), "Le \"Host\"".into()],
            answer_index: 1,
            explanation: Some("Obligatoire en HTTP/1.1".into()),
            sources: vec!["RFC 9110".into(), "MDN".into()],
        }
        .validate()
        .unwrap();
        let skipped = QuestionDraft {
            id: QuestionId::new("8"),
            kind: QuestionKind::Mcq,
            chapitre: "Web".into(),
            niveau: Level::Beginner,
            question: "Port HTTP ?".into(),
            choices: vec!["80".into(), "8080".into()],
            answer_index: 0,
            explanation: None,
            sources: Vec::new(),
        }
        .validate()
        .unwrap();
        let mut session =
            QuizSession::new(vec![quoted, skipped], QuizMode::Exam, None, fixed_now()).unwrap();
        session.record_answer(1).unwrap();
        session
    }

    #[test]
    fn results_csv_doubles_quotes_and_leaves_unanswered_empty() {
        let csv = results_csv(&Score::of(&session())).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], RESULTS_HEADER);
        assert_eq!(
            lines[1],
            r#""7";"Web";"intermédiaire";"Quel en-tête ?";"Content-Type|Le ""Host""";"Le ""Host""";"1";"Obligatoire en HTTP/1.1";"RFC 9110 || MDN""#
        );
        assert_eq!(
            lines[2],
            r#""8";"Web";"débutant";"Port HTTP ?";"80|8080";"";"0";"";"""#
        );
        assert!(csv.ends_with('\n'));
        assert!(!csv.contains('\r'));
    }

    #[test]
    fn bank_json_reimports_unchanged() {
        let bank = parse_bank(
            r#"[{"id": 1, "type": "mcq", "chapitre": "Web", "niveau": "avancé",
                 "question": "?", "choices": ["a", "b"], "answerIndex": 1}]"#,
        )
        .unwrap();
        let json = bank_to_json(&bank).unwrap();
        assert!(json.contains("\n  {"), "pretty printed: {json}");
        assert!(json.contains("\"answerIndex\": 1"));
        assert_eq!(parse_bank(&json).unwrap(), bank);
    }
}
