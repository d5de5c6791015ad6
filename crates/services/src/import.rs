//! Validation of imported question banks.
//!
//! Shape checks run on the raw JSON first so the error names the exact field
//! at fault; the typed decode and the question invariants come after.

use serde_json::Value;

use quiz_core::model::{Question, QuestionBank, QuestionDraft};

use crate::error::{ImportError, ImportIssue};

/// Parse and validate a bank. All-or-nothing: the first bad record aborts.
///
/// # Errors
///
/// Returns `ImportError` for malformed JSON, a non-array top level, a record
/// that fails validation, or duplicate ids.
pub fn parse_bank(raw: &str) -> Result<QuestionBank, ImportError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Array(records) = value else {
        return Err(ImportError::NotAnArray);
    };

    let mut questions = Vec::with_capacity(records.len());
    for (idx, record) in records.into_iter().enumerate() {
        let position = idx + 1;
        let id = record_id(&record);
        let question = parse_record(record).map_err(|issue| ImportError::Record {
            position,
            id,
            issue,
        })?;
        questions.push(question);
    }

    Ok(QuestionBank::new(questions)?)
}

fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_record(record: Value) -> Result<Question, ImportIssue> {
    check_shape(&record)?;
    let draft: QuestionDraft =
        serde_json::from_value(record).map_err(|err| ImportIssue::Malformed(err.to_string()))?;
    Ok(draft.validate()?)
}

fn check_shape(record: &Value) -> Result<(), ImportIssue> {
    let Value::Object(fields) = record else {
        return Err(ImportIssue::NotAnObject);
    };

    match fields.get("type") {
        Some(Value::String(kind)) if kind == "mcq" => {}
        Some(other) => return Err(ImportIssue::WrongType(other.to_string())),
        None => return Err(ImportIssue::WrongType("nothing".to_string())),
    }

    let Some(Value::Array(choices)) = fields.get("choices") else {
        return Err(ImportIssue::ChoicesNotAList);
    };
    if !choices.iter().all(Value::is_string) {
        return Err(ImportIssue::ChoiceNotText);
    }

    match fields.get("answerIndex") {
        Some(Value::Number(n)) if n.as_u64().is_some() => {}
        Some(Value::Number(_)) => return Err(ImportIssue::AnswerIndexNotInteger),
        _ => return Err(ImportIssue::AnswerIndexNotNumeric),
    }

    match fields.get("sources") {
        None | Some(Value::Null) => {}
        Some(Value::Array(sources)) if sources.iter().all(Value::is_string) => {}
        Some(_) => return Err(ImportIssue::SourcesNotStrings),
    }

    Ok(())
}
