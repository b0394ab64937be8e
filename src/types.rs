use chrono::{NaiveDate, NaiveTime};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr, sync::Arc};

pub type InterviewId = u64;

/// Immutable view of the whole collection at one point in time.
pub type Snapshot = Arc<Vec<Interview>>;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_SLOT_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: InterviewId,
    pub candidate_name: String,
    pub interviewer_name: String,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    #[serde(rename = "type")]
    pub kind: InterviewType,
}

/// An interview that passed the validation gate but has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInterview {
    pub candidate_name: String,
    pub interviewer_name: String,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub kind: InterviewType,
}

impl Interview {
    pub fn new(id: InterviewId, details: NewInterview) -> Self {
        Self {
            id,
            candidate_name: details.candidate_name,
            interviewer_name: details.interviewer_name,
            date: details.date,
            time_slot: details.time_slot,
            kind: details.kind,
        }
    }

    pub fn canonical_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewType {
    Technical,
    Hr,
    Behavioral,
}

impl InterviewType {
    pub const ALL: [InterviewType; 3] = [Self::Technical, Self::Hr, Self::Behavioral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Hr => "hr",
            Self::Behavioral => "behavioral",
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown interview type '{s}'"))
    }
}

/// Time of day with minute precision, serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    pub fn parse(value: &str) -> Option<Self> {
        NaiveTime::parse_from_str(value, TIME_SLOT_FORMAT)
            .ok()
            .map(Self)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_SLOT_FORMAT))
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        TimeSlot::parse(&value)
            .ok_or_else(|| de::Error::custom(format!("invalid time slot '{value}'")))
    }
}
