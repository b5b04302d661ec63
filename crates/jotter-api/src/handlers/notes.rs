//! Note HTTP handlers.
//!
//! All routes require a bearer token. A path id that is not a UUID cannot
//! name a note the caller owns, so it is answered like any missing note.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use jotter_core::{
    CreateNoteRequest, MessageResponse, Note, NoteListResponse, NoteQuery, NoteResponse,
    TrashEmptiedResponse, UpdateNoteRequest,
};

use crate::auth::RequireAuth;
use crate::error::ApiError;
use crate::state::AppState;

fn parse_note_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

fn note_response(message: &str, note: Note) -> Json<NoteResponse> {
    Json(NoteResponse {
        success: true,
        message: Some(message.to_string()),
        note,
    })
}

/// Create a note.
///
/// POST /api/notes
#[utoipa::path(post, path = "/api/notes", tag = "Notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = NoteResponse),
        (status = 400, description = "Title and content are required", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse)
    ),
    security(("bearer" = [])))]
pub async fn create_note(
    State(state): State<AppState>,
    auth: RequireAuth,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    let Json(req) = payload?;
    let note = state.notes.create(auth.user_id, req).await?;
    Ok((
        StatusCode::CREATED,
        note_response("Note created successfully", note),
    ))
}

/// List notes for one view.
///
/// GET /api/notes
#[utoipa::path(get, path = "/api/notes", tag = "Notes",
    params(NoteQuery),
    responses(
        (status = 200, description = "Matching notes, pinned first then most recent", body = NoteListResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse)
    ),
    security(("bearer" = [])))]
pub async fn list_notes(
    State(state): State<AppState>,
    auth: RequireAuth,
    query: Result<Query<NoteQuery>, QueryRejection>,
) -> Result<Json<NoteListResponse>, ApiError> {
    let Query(query) = query?;
    let notes = state.notes.list(auth.user_id, &query).await?;
    Ok(Json(NoteListResponse {
        success: true,
        count: notes.len(),
        notes,
    }))
}

/// Get one note.
///
/// GET /api/notes/:id
#[utoipa::path(get, path = "/api/notes/{id}", tag = "Notes",
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "The note", body = NoteResponse),
        (status = 404, description = "Note not found", body = MessageResponse)
    ),
    security(("bearer" = [])))]
pub async fn get_note(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = state.notes.get(auth.user_id, parse_note_id(&id)?).await?;
    Ok(Json(NoteResponse {
        success: true,
        message: None,
        note,
    }))
}

/// Edit a note.
///
/// PUT /api/notes/:id
#[utoipa::path(put, path = "/api/notes/{id}", tag = "Notes",
    params(("id" = String, Path, description = "Note id")),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated", body = NoteResponse),
        (status = 400, description = "Invalid field value", body = MessageResponse),
        (status = 404, description = "Note not found", body = MessageResponse)
    ),
    security(("bearer" = [])))]
pub async fn update_note(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<String>,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Result<Json<NoteResponse>, ApiError> {
    let id = parse_note_id(&id)?;
    let Json(req) = payload?;
    let note = state.notes.update(auth.user_id, id, req).await?;
    Ok(note_response("Note updated successfully", note))
}

/// Toggle the pin flag.
///
/// PUT /api/notes/:id/pin
#[utoipa::path(put, path = "/api/notes/{id}/pin", tag = "Notes",
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note pinned or unpinned", body = NoteResponse),
        (status = 404, description = "Note not found", body = MessageResponse)
    ),
    security(("bearer" = [])))]
pub async fn toggle_pin(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = state
        .notes
        .toggle_pin(auth.user_id, parse_note_id(&id)?)
        .await?;
    let message = if note.is_pinned {
        "Note pinned"
    } else {
        "Note unpinned"
    };
    Ok(note_response(message, note))
}

/// Toggle the archive flag.
///
/// PUT /api/notes/:id/archive
#[utoipa::path(put, path = "/api/notes/{id}/archive", tag = "Notes",
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note archived or unarchived", body = NoteResponse),
        (status = 404, description = "Note not found", body = MessageResponse)
    ),
    security(("bearer" = [])))]
pub async fn toggle_archive(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = state
        .notes
        .toggle_archive(auth.user_id, parse_note_id(&id)?)
        .await?;
    let message = if note.is_archived {
        "Note archived"
    } else {
        "Note unarchived"
    };
    Ok(note_response(message, note))
}

/// Move a note to the trash.
///
/// DELETE /api/notes/:id
#[utoipa::path(delete, path = "/api/notes/{id}", tag = "Notes",
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note moved to trash", body = NoteResponse),
        (status = 404, description = "Note not found", body = MessageResponse)
    ),
    security(("bearer" = [])))]
pub async fn soft_delete_note(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = state
        .notes
        .soft_delete(auth.user_id, parse_note_id(&id)?)
        .await?;
    Ok(note_response("Note moved to trash", note))
}

/// Restore a note from the trash.
///
/// PUT /api/notes/:id/restore
#[utoipa::path(put, path = "/api/notes/{id}/restore", tag = "Notes",
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note restored", body = NoteResponse),
        (status = 404, description = "Note not found", body = MessageResponse)
    ),
    security(("bearer" = [])))]
pub async fn restore_note(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = state
        .notes
        .restore(auth.user_id, parse_note_id(&id)?)
        .await?;
    Ok(note_response("Note restored successfully", note))
}

/// Permanently delete a note.
///
/// DELETE /api/notes/:id/permanent
#[utoipa::path(delete, path = "/api/notes/{id}/permanent", tag = "Notes",
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note permanently deleted", body = MessageResponse),
        (status = 404, description = "Note not found", body = MessageResponse)
    ),
    security(("bearer" = [])))]
pub async fn permanent_delete_note(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .notes
        .permanent_delete(auth.user_id, parse_note_id(&id)?)
        .await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Note permanently deleted".to_string(),
    }))
}

/// Permanently delete everything in the caller's trash.
///
/// DELETE /api/notes/trash
#[utoipa::path(delete, path = "/api/notes/trash", tag = "Notes",
    responses(
        (status = 200, description = "Trash emptied", body = TrashEmptiedResponse),
        (status = 500, description = "Stopped part way; some notes may remain", body = MessageResponse)
    ),
    security(("bearer" = [])))]
pub async fn empty_trash(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<TrashEmptiedResponse>, ApiError> {
    let count = state.notes.empty_trash(auth.user_id).await?;
    Ok(Json(TrashEmptiedResponse {
        success: true,
        message: "Trash emptied successfully".to_string(),
        count,
    }))
}
