use crate::{
    backend::KeyValueStore,
    error::StorageError,
    types::{Interview, InterviewId, InterviewType, NewInterview, TimeSlot},
};
use chrono::NaiveDate;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
};

pub const DEFAULT_DATE: &str = "2030-06-01";
pub const DEFAULT_TIME_SLOT: &str = "10:00";

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

pub fn new_interview_on(
    candidate_name: &str,
    interviewer_name: &str,
    day: &str,
    time_slot: &str,
) -> NewInterview {
    NewInterview {
        candidate_name: candidate_name.into(),
        interviewer_name: interviewer_name.into(),
        date: date(day),
        time_slot: TimeSlot::parse(time_slot).unwrap(),
        kind: InterviewType::Technical,
    }
}

pub fn new_interview(candidate_name: &str, interviewer_name: &str) -> NewInterview {
    new_interview_on(
        candidate_name,
        interviewer_name,
        DEFAULT_DATE,
        DEFAULT_TIME_SLOT,
    )
}

pub fn interview_on(
    id: InterviewId,
    candidate_name: &str,
    interviewer_name: &str,
    day: &str,
    time_slot: &str,
) -> Interview {
    Interview::new(
        id,
        new_interview_on(candidate_name, interviewer_name, day, time_slot),
    )
}

pub fn interview(id: InterviewId, candidate_name: &str, interviewer_name: &str) -> Interview {
    Interview::new(id, new_interview(candidate_name, interviewer_name))
}

pub struct CountingKeyValueStoreInner {
    pub success: AtomicBool,
    pub calls_to_get: AtomicU64,
    pub calls_to_set: AtomicU64,
    pub entries: Mutex<HashMap<String, String>>,
}

/// Storage double that counts calls and can be switched to fail.
#[derive(Clone)]
pub struct CountingKeyValueStore(pub Arc<CountingKeyValueStoreInner>);

impl CountingKeyValueStoreInner {
    fn new() -> Self {
        Self {
            success: AtomicBool::new(true),
            calls_to_get: AtomicU64::default(),
            calls_to_set: AtomicU64::default(),
            entries: Mutex::default(),
        }
    }
}

impl CountingKeyValueStore {
    pub fn new() -> Self {
        Self(Arc::new(CountingKeyValueStoreInner::new()))
    }

    pub fn fail_writes(&self) {
        self.0.success.store(false, Ordering::SeqCst);
    }

    pub fn reads(&self) -> u64 {
        self.0.calls_to_get.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> u64 {
        self.0.calls_to_set.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for CountingKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.0.calls_to_get.fetch_add(1, Ordering::SeqCst);
        Ok(self.0.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.0.calls_to_set.fetch_add(1, Ordering::SeqCst);
        if !self.0.success.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("Supposed to fail".into()));
        }
        self.0.entries.lock().unwrap().insert(key.into(), value);
        Ok(())
    }
}
