use crate::{
    backend::KeyValueStore,
    error::{SchedulingError, StoreError},
    scheduling::FilterCriteria,
    service::InterviewService,
    types::{Interview, InterviewId},
    validation::InterviewDraft,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::get,
    Json, Router,
};
use futures::{Stream, StreamExt};
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

pub struct AppState<S: KeyValueStore> {
    service: Arc<Mutex<InterviewService<S>>>,
}

impl<S: KeyValueStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<S: KeyValueStore> AppState<S> {
    fn service(&self) -> MutexGuard<'_, InterviewService<S>> {
        self.service.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn create_app<S: KeyValueStore>(service: InterviewService<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState {
        service: Arc::new(Mutex::new(service)),
    };

    Router::new()
        .route(
            "/interviews",
            get(list_interviews::<S>).post(schedule_interview::<S>),
        )
        .route("/interviews/events", get(stream_interviews::<S>))
        .route(
            "/interviews/:id",
            get(get_interview::<S>)
                .put(reschedule_interview::<S>)
                .delete(cancel_interview::<S>),
        )
        .with_state(state)
        .layer(cors)
}

impl IntoResponse for SchedulingError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            SchedulingError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": message, "fields": err.fields })),
            )
                .into_response(),
            SchedulingError::Conflict => {
                (StatusCode::CONFLICT, Json(json!({ "error": message }))).into_response()
            }
            SchedulingError::Store(StoreError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            SchedulingError::Store(err) => {
                error!(%err, "Request failed in the store");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message })),
                )
                    .into_response()
            }
        }
    }
}

async fn list_interviews<S: KeyValueStore>(
    State(state): State<AppState<S>>,
    Query(criteria): Query<FilterCriteria>,
) -> Json<Vec<Interview>> {
    Json(state.service().list(&criteria))
}

async fn get_interview<S: KeyValueStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<InterviewId>,
) -> Result<Json<Interview>, SchedulingError> {
    state
        .service()
        .get(id)
        .map(Json)
        .ok_or(StoreError::NotFound(id).into())
}

async fn schedule_interview<S: KeyValueStore>(
    State(state): State<AppState<S>>,
    Json(draft): Json<InterviewDraft>,
) -> Result<(StatusCode, Json<Interview>), SchedulingError> {
    let interview = state.service().schedule(&draft)?;
    Ok((StatusCode::CREATED, Json(interview)))
}

async fn reschedule_interview<S: KeyValueStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<InterviewId>,
    Json(draft): Json<InterviewDraft>,
) -> Result<Json<Interview>, SchedulingError> {
    let interview = state.service().reschedule(id, &draft)?;
    Ok(Json(interview))
}

async fn cancel_interview<S: KeyValueStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<InterviewId>,
) -> Result<StatusCode, SchedulingError> {
    state.service().cancel(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn stream_interviews<S: KeyValueStore>(
    State(state): State<AppState<S>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let snapshots = state.service().subscribe();
    let events = snapshots.map(|snapshot| {
        Event::default()
            .event("snapshot")
            .json_data(snapshot.as_slice())
    });
    Sse::new(events).keep_alive(KeepAlive::default())
}
