//! OpenAPI document, served at `/openapi.json`.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use jotter_core::{
    CreateNoteRequest, MessageResponse, Note, NoteListResponse, NoteResponse, Priority,
    TrashEmptiedResponse, UpdateNoteRequest,
};

use crate::handlers::{notes, system};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Jotter API",
        description = "Personal notes with pinning, archiving and a trash"
    ),
    paths(
        system::root,
        system::health_check,
        notes::create_note,
        notes::list_notes,
        notes::get_note,
        notes::update_note,
        notes::toggle_pin,
        notes::toggle_archive,
        notes::soft_delete_note,
        notes::restore_note,
        notes::permanent_delete_note,
        notes::empty_trash,
    ),
    components(schemas(
        Note,
        Priority,
        CreateNoteRequest,
        UpdateNoteRequest,
        NoteResponse,
        NoteListResponse,
        MessageResponse,
        TrashEmptiedResponse,
        system::HealthResponse,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "Notes", description = "Note lifecycle"),
        (name = "System", description = "Health checks and service info")
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_note_routes() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        for path in [
            "/api/notes",
            "/api/notes/{id}",
            "/api/notes/{id}/pin",
            "/api/notes/{id}/archive",
            "/api/notes/{id}/restore",
            "/api/notes/{id}/permanent",
            "/api/notes/trash",
            "/health",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
        assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
    }
}
