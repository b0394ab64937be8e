use crate::{
    backend::KeyValueStore,
    error::StoreError,
    persistence::SnapshotPersistence,
    types::{Interview, InterviewId, NewInterview, Snapshot},
};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch::{self, Sender};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Interview),
    Update(Interview),
    Delete(InterviewId),
}

impl Command {
    fn target(&self) -> InterviewId {
        match self {
            Command::Add(interview) | Command::Update(interview) => interview.id,
            Command::Delete(id) => *id,
        }
    }
}

/// Applies `command` to `state` and returns the next collection.
/// `state` itself is left untouched.
pub fn reduce(state: &[Interview], command: Command) -> Result<Vec<Interview>, StoreError> {
    let mut next = state.to_vec();
    match command {
        Command::Add(interview) => next.push(interview),
        Command::Update(interview) => {
            let index = position(state, interview.id)?;
            next[index] = interview;
        }
        Command::Delete(id) => {
            let index = position(state, id)?;
            next.remove(index);
        }
    }
    Ok(next)
}

fn position(state: &[Interview], id: InterviewId) -> Result<usize, StoreError> {
    state
        .iter()
        .position(|interview| interview.id == id)
        .ok_or(StoreError::NotFound(id))
}

/// Owns the authoritative interview collection and its durable copy.
pub struct InterviewStore<S: KeyValueStore> {
    snapshot: Snapshot,
    persistence: SnapshotPersistence<S>,
    sender: Sender<Snapshot>,
}

impl<S: KeyValueStore> InterviewStore<S> {
    /// Restores the collection stored under `key`, or starts empty.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let persistence = SnapshotPersistence::new(storage, key);
        let snapshot: Snapshot = Arc::new(persistence.load());
        let (sender, _) = watch::channel(snapshot.clone());
        info!(
            key = persistence.key(),
            interviews = snapshot.len(),
            "Interview store ready"
        );
        Self {
            snapshot,
            persistence,
            sender,
        }
    }

    pub fn current_snapshot(&self) -> Snapshot {
        self.snapshot.clone()
    }

    pub fn find(&self, id: InterviewId) -> Option<&Interview> {
        self.snapshot.iter().find(|interview| interview.id == id)
    }

    /// Yields the current snapshot, then every snapshot committed afterwards.
    pub fn subscribe(&self) -> WatchStream<Snapshot> {
        WatchStream::new(self.sender.subscribe())
    }

    /// Assigns a fresh id and commits the interview. Returns the created
    /// interview; the new snapshot is available from `current_snapshot`.
    pub fn add(&mut self, details: NewInterview) -> Result<Interview, StoreError> {
        let interview = Interview::new(self.next_id()?, details);
        self.dispatch(Command::Add(interview.clone()))?;
        Ok(interview)
    }

    pub fn update(&mut self, interview: Interview) -> Result<Snapshot, StoreError> {
        self.dispatch(Command::Update(interview))
    }

    pub fn delete(&mut self, id: InterviewId) -> Result<Snapshot, StoreError> {
        self.dispatch(Command::Delete(id))
    }

    /// Reduces, persists and only then publishes the new snapshot.
    pub fn dispatch(&mut self, command: Command) -> Result<Snapshot, StoreError> {
        let target = command.target();
        let next = reduce(&self.snapshot, command)?;

        if let Err(err) = self.persistence.save(&next) {
            error!(%err, id = target, "Failed to persist interviews, mutation dropped");
            return Err(err.into());
        }

        self.snapshot = Arc::new(next);
        self.sender.send_replace(self.snapshot.clone());
        debug!(id = target, interviews = self.snapshot.len(), "Committed snapshot");
        Ok(self.snapshot.clone())
    }

    /// Current time in milliseconds, bumped past the highest existing id.
    fn next_id(&self) -> Result<InterviewId, StoreError> {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        match self.snapshot.iter().map(|interview| interview.id).max() {
            Some(highest) if highest >= now => highest
                .checked_add(1)
                .ok_or(StoreError::IdsExhausted(highest)),
            _ => Ok(now),
        }
    }
}
