use crate::{
    backend::KeyValueStore,
    error::{SchedulingError, StoreError},
    scheduling::{filter, has_conflict, FilterCriteria},
    store::InterviewStore,
    types::{Interview, InterviewId, Snapshot},
    validation::{self, validate_draft, InterviewDraft},
};
use chrono::NaiveDate;
use tokio_stream::wrappers::WatchStream;
use tracing::{info, warn};

/// Runs the validation gate and the conflict check in front of the store.
pub struct InterviewService<S: KeyValueStore> {
    store: InterviewStore<S>,
    today: fn() -> NaiveDate,
}

impl<S: KeyValueStore> InterviewService<S> {
    pub fn new(store: InterviewStore<S>) -> Self {
        Self::with_clock(store, validation::today)
    }

    pub fn with_clock(store: InterviewStore<S>, today: fn() -> NaiveDate) -> Self {
        Self { store, today }
    }

    pub fn schedule(&mut self, draft: &InterviewDraft) -> Result<Interview, SchedulingError> {
        let details = validate_draft(draft, (self.today)())?;
        if has_conflict(&details, &self.snapshot(), None) {
            warn!(
                candidate = %details.candidate_name,
                interviewer = %details.interviewer_name,
                date = %details.date,
                time_slot = %details.time_slot,
                "Rejected double booking"
            );
            return Err(SchedulingError::Conflict);
        }

        let interview = self.store.add(details)?;
        info!(id = interview.id, "Interview scheduled");
        Ok(interview)
    }

    pub fn reschedule(
        &mut self,
        id: InterviewId,
        draft: &InterviewDraft,
    ) -> Result<Interview, SchedulingError> {
        let details = validate_draft(draft, (self.today)())?;
        if self.store.find(id).is_none() {
            return Err(StoreError::NotFound(id).into());
        }
        if has_conflict(&details, &self.snapshot(), Some(id)) {
            warn!(id, "Rejected double booking on edit");
            return Err(SchedulingError::Conflict);
        }

        let interview = Interview::new(id, details);
        self.store.update(interview.clone())?;
        info!(id, "Interview updated");
        Ok(interview)
    }

    pub fn cancel(&mut self, id: InterviewId) -> Result<(), SchedulingError> {
        self.store.delete(id)?;
        info!(id, "Interview cancelled");
        Ok(())
    }

    pub fn get(&self, id: InterviewId) -> Option<Interview> {
        self.store.find(id).cloned()
    }

    pub fn list(&self, criteria: &FilterCriteria) -> Vec<Interview> {
        filter(&self.snapshot(), criteria)
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.current_snapshot()
    }

    pub fn subscribe(&self) -> WatchStream<Snapshot> {
        self.store.subscribe()
    }
}
