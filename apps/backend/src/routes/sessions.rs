//! Study session endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;
use crate::services::sessions;
use crate::AppState;

/// POST /api/sessions/preview
pub async fn preview(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SessionConfig>, JsonRejection>,
) -> Result<Json<PreviewResponse>> {
    let Json(config) = payload?;
    let (matching_cards, queue_length) = sessions::preview(state.cards.as_ref(), &config).await?;
    Ok(Json(PreviewResponse {
        matching_cards,
        queue_length,
    }))
}

/// POST /api/sessions
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SessionConfig>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionView>)> {
    let Json(config) = payload?;
    let id = sessions::start_session(state.cards.as_ref(), &state.sessions, config).await?;
    let view = state
        .sessions
        .read(id, |session| SessionView::new(id, session))
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/sessions/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let view = state
        .sessions
        .read(id, |session| SessionView::new(id, session))
        .await?;
    Ok(Json(view))
}

/// POST /api/sessions/:id/reveal
pub async fn reveal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let view = state
        .sessions
        .update(id, |session| {
            session.reveal()?;
            Ok(SessionView::new(id, session))
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/sessions/:id/grade
pub async fn grade(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<GradeRequest>,
) -> Result<Json<SessionView>> {
    tracing::debug!(
        "Grading session {} card {:?} as {}",
        id,
        request.card_id,
        request.outcome.as_str()
    );

    let view = state
        .sessions
        .update(id, |session| {
            match request.card_id {
                Some(card_id) => session.regrade(card_id, request.outcome)?,
                None => session.grade(request.outcome)?,
            }
            Ok(SessionView::new(id, session))
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/sessions/:id/advance
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let view = state
        .sessions
        .update(id, |session| {
            if session.advance()? == SessionStatus::Complete {
                let summary = session.summary();
                tracing::info!(
                    "Session {} complete: {} correct, {} incorrect, {} skipped of {}",
                    id,
                    summary.correct,
                    summary.incorrect,
                    summary.skipped,
                    summary.total
                );
            }
            Ok(SessionView::new(id, session))
        })
        .await?;
    Ok(Json(view))
}

/// GET /api/sessions/:id/summary
pub async fn summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SummaryResponse>> {
    let response = state
        .sessions
        .read(id, |session| SummaryResponse::new(id, session))
        .await?;
    Ok(Json(response))
}

/// DELETE /api/sessions/:id
pub async fn discard(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    let session = state.sessions.remove(id).await?;
    let summary = session.summary();
    tracing::info!(
        "Discarded session {} ({} of {} cards graded)",
        id,
        summary.total - summary.ungraded,
        summary.total
    );
    Ok(StatusCode::NO_CONTENT)
}
