use crate::{
    error::{FieldError, ValidationError},
    types::{InterviewType, NewInterview, TimeSlot, DATE_FORMAT},
};
use chrono::{Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationErrors};

lazy_static! {
    static ref CANONICAL_DATE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref CANONICAL_TIME_SLOT: Regex = Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap();
}

/// Interview fields as typed in by the user, before any checks.
/// Absent and `null` fields both arrive as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct InterviewDraft {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(custom(function = "not_blank"))]
    pub candidate_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(custom(function = "not_blank"))]
    pub interviewer_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "not_blank"),
        regex(path = *CANONICAL_DATE, message = "must be a YYYY-MM-DD date")
    )]
    pub date: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "not_blank"),
        regex(path = *CANONICAL_TIME_SLOT, message = "must be a HH:MM 24-hour time")
    )]
    pub time_slot: String,
    #[serde(rename = "type", deserialize_with = "null_as_empty")]
    #[validate(custom(function = "known_interview_type"))]
    pub kind: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("required").with_message("is required".into()));
    }
    Ok(())
}

fn known_interview_type(value: &str) -> Result<(), validator::ValidationError> {
    not_blank(value)?;
    if value.parse::<InterviewType>().is_ok() {
        return Ok(());
    }
    Err(validator::ValidationError::new("interview_type")
        .with_message("must be one of technical, hr, behavioral".into()))
}

/// The local calendar date, used as the earliest schedulable day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Checks every field of `draft` and converts it into a typed interview.
///
/// All invalid fields are reported together, in form order. Dates before
/// `today` are rejected.
pub fn validate_draft(
    draft: &InterviewDraft,
    today: NaiveDate,
) -> Result<NewInterview, ValidationError> {
    let errors = draft.validate().err().unwrap_or_else(ValidationErrors::new);
    let field_errors = errors.field_errors();
    let rule = |field: &str| match field_errors.get(field).and_then(|errors| reason(errors)) {
        Some(reason) => Err(reason),
        None => Ok(()),
    };

    let mut gate = Gate::default();
    let candidate_name = gate.check(
        "candidateName",
        rule("candidate_name").map(|()| draft.candidate_name.trim().to_string()),
    );
    let interviewer_name = gate.check(
        "interviewerName",
        rule("interviewer_name").map(|()| draft.interviewer_name.trim().to_string()),
    );
    let date = gate.check(
        "date",
        rule("date").and_then(|()| schedulable_date(&draft.date, today)),
    );
    let time_slot = gate.check(
        "timeSlot",
        rule("time_slot").and_then(|()| {
            TimeSlot::parse(&draft.time_slot).ok_or_else(|| "must be a HH:MM 24-hour time".into())
        }),
    );
    let kind = gate.check(
        "type",
        rule("kind").and_then(|()| draft.kind.parse::<InterviewType>()),
    );

    match (candidate_name, interviewer_name, date, time_slot, kind) {
        (Some(candidate_name), Some(interviewer_name), Some(date), Some(time_slot), Some(kind)) => {
            Ok(NewInterview {
                candidate_name,
                interviewer_name,
                date,
                time_slot,
                kind,
            })
        }
        _ => Err(ValidationError {
            fields: gate.fields,
        }),
    }
}

fn reason(errors: &[validator::ValidationError]) -> Option<String> {
    let error = errors
        .iter()
        .find(|error| error.code == "required")
        .or_else(|| errors.first())?;
    Some(
        error
            .message
            .as_deref()
            .map_or_else(|| error.code.to_string(), str::to_string),
    )
}

fn schedulable_date(value: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| String::from("is not a valid calendar date"))?;
    if date < today {
        return Err("must not be in the past".into());
    }
    Ok(date)
}

#[derive(Default)]
struct Gate {
    fields: Vec<FieldError>,
}

impl Gate {
    fn check<T>(&mut self, field: &'static str, outcome: Result<T, String>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(reason) => {
                self.fields.push(FieldError { field, reason });
                None
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutils::date;
    use test_case::test_case;

    fn draft() -> InterviewDraft {
        InterviewDraft {
            candidate_name: "Sam".into(),
            interviewer_name: "Lee".into(),
            date: "2025-06-01".into(),
            time_slot: "10:00".into(),
            kind: "technical".into(),
        }
    }

    fn invalid_fields(draft: &InterviewDraft) -> Vec<(&'static str, String)> {
        validate_draft(draft, date("2025-05-01"))
            .unwrap_err()
            .fields
            .into_iter()
            .map(|field| (field.field, field.reason))
            .collect()
    }

    #[test]
    fn test_valid_draft() {
        let interview = validate_draft(&draft(), date("2025-05-01")).unwrap();

        assert_eq!(interview.candidate_name, "Sam");
        assert_eq!(interview.interviewer_name, "Lee");
        assert_eq!(interview.date, date("2025-06-01"));
        assert_eq!(interview.time_slot.to_string(), "10:00");
        assert_eq!(interview.kind, InterviewType::Technical);
    }

    #[test]
    fn test_today_is_schedulable() {
        validate_draft(&draft(), date("2025-06-01")).unwrap();
    }

    #[test]
    fn test_names_are_trimmed() {
        let draft = InterviewDraft {
            candidate_name: "  Sam ".into(),
            ..draft()
        };
        let interview = validate_draft(&draft, date("2025-05-01")).unwrap();
        assert_eq!(interview.candidate_name, "Sam");
    }

    #[test]
    fn test_empty_draft_lists_every_field() {
        let fields = invalid_fields(&InterviewDraft::default());

        let names: Vec<&str> = fields.iter().map(|(field, _)| *field).collect();
        assert_eq!(
            names,
            vec!["candidateName", "interviewerName", "date", "timeSlot", "type"]
        );
        assert!(fields.iter().all(|(_, reason)| reason == "is required"));
    }

    #[test_case("date", "2025-13-01", "is not a valid calendar date" ; "month out of range")]
    #[test_case("date", "2025-02-30", "is not a valid calendar date" ; "day out of range")]
    #[test_case("date", "2025-6-1", "must be a YYYY-MM-DD date" ; "non canonical date")]
    #[test_case("date", "2025-04-30", "must not be in the past" ; "past date")]
    #[test_case("timeSlot", "24:00", "must be a HH:MM 24-hour time" ; "hour out of range")]
    #[test_case("timeSlot", "9:30", "must be a HH:MM 24-hour time" ; "single digit hour")]
    #[test_case("timeSlot", "10:00 AM", "must be a HH:MM 24-hour time" ; "twelve hour clock")]
    #[test_case("type", "panel", "must be one of technical, hr, behavioral" ; "unknown type")]
    #[test_case("type", "HR", "must be one of technical, hr, behavioral" ; "type is case sensitive")]
    #[test_case("candidateName", "   ", "is required" ; "blank candidate")]
    fn test_invalid_field(field: &'static str, value: &str, expected_reason: &str) {
        let mut draft = draft();
        match field {
            "date" => draft.date = value.into(),
            "timeSlot" => draft.time_slot = value.into(),
            "type" => draft.kind = value.into(),
            "candidateName" => draft.candidate_name = value.into(),
            _ => unimplemented!(),
        }

        assert_eq!(
            invalid_fields(&draft),
            vec![(field, String::from(expected_reason))]
        );
    }

    #[test]
    fn test_missing_json_fields_default_to_empty() {
        let draft: InterviewDraft =
            serde_json::from_str(r#"{"candidateName": "Sam", "type": "hr"}"#).unwrap();

        let names: Vec<&str> = invalid_fields(&draft)
            .into_iter()
            .map(|(field, _)| field)
            .collect();
        assert_eq!(names, vec!["interviewerName", "date", "timeSlot"]);
    }

    #[test]
    fn test_null_json_fields_are_required() {
        let draft: InterviewDraft = serde_json::from_str(
            r#"{"candidateName": "Sam", "interviewerName": "Lee", "date": null, "timeSlot": "10:00", "type": null}"#,
        )
        .unwrap();

        assert_eq!(
            invalid_fields(&draft),
            vec![
                ("date", String::from("is required")),
                ("type", String::from("is required"))
            ]
        );
    }
}
