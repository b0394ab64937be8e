use crate::types::{Interview, InterviewId, NewInterview};
use serde::Deserialize;

/// Whether `candidate` would double-book a participant.
///
/// Two interviews clash when they share date and time slot and also share the
/// candidate or the interviewer. Names are compared exactly, case included.
/// `exclude_id` is the candidate's own id when editing.
pub fn has_conflict(
    candidate: &NewInterview,
    existing: &[Interview],
    exclude_id: Option<InterviewId>,
) -> bool {
    existing
        .iter()
        .filter(|interview| Some(interview.id) != exclude_id)
        .any(|interview| {
            interview.date == candidate.date
                && interview.time_slot == candidate.time_slot
                && (interview.candidate_name == candidate.candidate_name
                    || interview.interviewer_name == candidate.interviewer_name)
        })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Exact canonical date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Case-insensitive substring of the candidate name.
    pub candidate: Option<String>,
    /// Case-insensitive substring of the interviewer name.
    pub interviewer: Option<String>,
}

impl FilterCriteria {
    pub fn matches(&self, interview: &Interview) -> bool {
        let date_matches =
            constraint(&self.date).map_or(true, |date| interview.canonical_date() == date);
        let candidate_matches = constraint(&self.candidate)
            .map_or(true, |needle| contains_ignore_case(&interview.candidate_name, needle));
        let interviewer_matches = constraint(&self.interviewer).map_or(true, |needle| {
            contains_ignore_case(&interview.interviewer_name, needle)
        });

        date_matches && candidate_matches && interviewer_matches
    }
}

fn constraint(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Interviews matching every given criterion, in collection order.
pub fn filter<'a>(
    collection: &'a [Interview],
    criteria: &'a FilterCriteria,
) -> impl Iterator<Item = &'a Interview> + 'a {
    collection
        .iter()
        .filter(move |interview| criteria.matches(interview))
}
