// src/status.rs
//! Turns one homework record into the chat message for its review verdict.

use serde_json::Value;

use crate::api::validate::type_name;
use crate::api::HomeworkRecord;
use crate::error::{BotError, Result};

/// Candidate message when the API reports no homework updates.
pub const NO_NEW_STATUSES: &str = "Новых статусов нет.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

/// Closed verdict table. New statuses go here and in the enum, nowhere else.
pub static VERDICTS: [(HomeworkStatus, &str, &str); 3] = [
    (
        HomeworkStatus::Approved,
        "approved",
        "Работа проверена: ревьюеру всё понравилось. Ура!",
    ),
    (
        HomeworkStatus::Reviewing,
        "reviewing",
        "Работа взята на проверку ревьюером.",
    ),
    (
        HomeworkStatus::Rejected,
        "rejected",
        "Работа проверена: у ревьюера есть замечания.",
    ),
];

impl HomeworkStatus {
    pub fn from_code(code: &str) -> Option<Self> {
        VERDICTS
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(status, _, _)| *status)
    }

    pub fn code(self) -> &'static str {
        self.entry().1
    }

    pub fn verdict(self) -> &'static str {
        self.entry().2
    }

    fn entry(self) -> &'static (HomeworkStatus, &'static str, &'static str) {
        let row = match self {
            HomeworkStatus::Approved => 0,
            HomeworkStatus::Reviewing => 1,
            HomeworkStatus::Rejected => 2,
        };
        &VERDICTS[row]
    }
}

pub fn interpret(record: &HomeworkRecord) -> Result<String> {
    if record.as_object().is_none() {
        return Err(BotError::Schema(format!(
            "homework record must be an object, got {}",
            type_name(record.raw())
        )));
    }

    let name = match record.field("homework_name") {
        None => return Err(BotError::MissingField("homework_name")),
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(BotError::Schema(format!(
                "`homework_name` must be a string, got {other}"
            )))
        }
    };

    let code = match record.field("status") {
        None => return Err(BotError::MissingField("status")),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    let status = HomeworkStatus::from_code(&code).ok_or(BotError::UnknownStatus(code))?;

    Ok(format!(
        "Изменился статус проверки работы \"{name}\". {}",
        status.verdict()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> HomeworkRecord {
        HomeworkRecord::new(v)
    }

    #[test]
    fn table_rows_match_their_status() {
        for (row, (status, _, _)) in VERDICTS.iter().enumerate() {
            assert!(std::ptr::eq(status.entry(), &VERDICTS[row]), "{status:?}");
        }
    }

    #[test]
    fn non_object_record_is_schema_error() {
        let err = interpret(&record(json!(["approved"]))).unwrap_err();
        assert!(matches!(err, BotError::Schema(ref m) if m.contains("a list")), "{err:?}");
    }

    #[test]
    fn every_verdict_renders_name_and_text() {
        for (status, code, text) in VERDICTS {
            let msg = interpret(&record(json!({
                "homework_name": "hw05_final",
                "status": code
            })))
            .unwrap();
            assert!(msg.contains("hw05_final"), "{msg}");
            assert!(msg.contains(text), "{msg}");
            assert_eq!(status.code(), code);
            assert_eq!(HomeworkStatus::from_code(code), Some(status));
        }
    }

    #[test]
    fn missing_name_is_reported() {
        let err = interpret(&record(json!({ "status": "approved" }))).unwrap_err();
        assert!(matches!(err, BotError::MissingField("homework_name")));
    }

    #[test]
    fn missing_status_is_reported() {
        let err = interpret(&record(json!({ "homework_name": "x", "status": null }))).unwrap_err();
        assert!(matches!(err, BotError::MissingField("status")));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = interpret(&record(json!({ "homework_name": "x", "status": "done" }))).unwrap_err();
        assert!(matches!(err, BotError::UnknownStatus(ref s) if s == "done"));

        // codes are case-sensitive
        let err = interpret(&record(json!({ "homework_name": "x", "status": "APPROVED" })))
            .unwrap_err();
        assert!(matches!(err, BotError::UnknownStatus(_)));
    }

    #[test]
    fn non_string_status_is_unknown() {
        let err = interpret(&record(json!({ "homework_name": "x", "status": 1 }))).unwrap_err();
        assert!(matches!(err, BotError::UnknownStatus(ref s) if s == "1"));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let msg = interpret(&record(json!({
            "id": 124,
            "homework_name": "username__hw_python_oop.zip",
            "status": "rejected",
            "reviewer_comment": "Код не по PEP8",
            "date_updated": "2020-02-13T16:42:47Z"
        })))
        .unwrap();
        assert_eq!(
            msg,
            "Изменился статус проверки работы \"username__hw_python_oop.zip\". \
             Работа проверена: у ревьюера есть замечания."
        );
    }
}
