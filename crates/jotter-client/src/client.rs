//! Typed client for the notes API.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use jotter_core::{
    defaults, CreateNoteRequest, MessageResponse, Note, NoteListResponse, NoteQuery,
    NoteResponse, TrashEmptiedResponse, UpdateNoteRequest,
};

use crate::error::{ClientError, Result};

/// Where to reach the API and whose notes to act on.
///
/// The session is passed in explicitly; the client never reads ambient
/// credentials.
#[derive(Debug, Clone)]
pub struct Session {
    pub base_url: String,
    pub token: String,
}

impl Session {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            token: token.into(),
        }
    }
}

/// Async client bound to one [`Session`].
#[derive(Debug, Clone)]
pub struct NotesClient {
    client: Client,
    session: Session,
}

impl NotesClient {
    /// Create a client with the default request timeout.
    pub fn new(session: Session) -> Result<Self> {
        Self::with_timeout(session, Duration::from_secs(defaults::CLIENT_TIMEOUT_SECS))
    }

    pub fn with_timeout(session: Session, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        debug!(base_url = %session.base_url, "Initializing notes client");
        Ok(Self { client, session })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.session.base_url, path))
            .bearer_auth(&self.session.token)
    }

    /// `GET /health`; any failure counts as unhealthy.
    pub async fn health_check(&self) -> bool {
        let result = self
            .client
            .get(format!("{}/health", self.session.base_url))
            .timeout(Duration::from_secs(defaults::CLIENT_HEALTH_TIMEOUT_SECS))
            .send()
            .await;
        match result {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!("Notes API health check failed: {}", resp.status());
                false
            }
            Err(e) => {
                warn!("Notes API not reachable: {}", e);
                false
            }
        }
    }

    pub async fn create(&self, req: &CreateNoteRequest) -> Result<Note> {
        let resp = self
            .request(Method::POST, "/api/notes")
            .json(req)
            .send()
            .await?;
        let body: NoteResponse = decode(resp).await?;
        Ok(body.note)
    }

    /// List one view. Pass `NoteQuery::default()` for the active notes.
    pub async fn list(&self, query: &NoteQuery) -> Result<Vec<Note>> {
        let resp = self
            .request(Method::GET, "/api/notes")
            .query(query)
            .send()
            .await?;
        let body: NoteListResponse = decode(resp).await?;
        debug!(result_count = body.count, "Listed notes");
        Ok(body.notes)
    }

    pub async fn get(&self, id: Uuid) -> Result<Note> {
        let resp = self
            .request(Method::GET, &format!("/api/notes/{}", id))
            .send()
            .await?;
        let body: NoteResponse = decode(resp).await?;
        Ok(body.note)
    }

    pub async fn update(&self, id: Uuid, req: &UpdateNoteRequest) -> Result<Note> {
        let resp = self
            .request(Method::PUT, &format!("/api/notes/{}", id))
            .json(req)
            .send()
            .await?;
        let body: NoteResponse = decode(resp).await?;
        Ok(body.note)
    }

    pub async fn toggle_pin(&self, id: Uuid) -> Result<Note> {
        self.put_action(id, "pin").await
    }

    pub async fn toggle_archive(&self, id: Uuid) -> Result<Note> {
        self.put_action(id, "archive").await
    }

    pub async fn restore(&self, id: Uuid) -> Result<Note> {
        self.put_action(id, "restore").await
    }

    /// Move a note to the trash.
    pub async fn soft_delete(&self, id: Uuid) -> Result<Note> {
        let resp = self
            .request(Method::DELETE, &format!("/api/notes/{}", id))
            .send()
            .await?;
        let body: NoteResponse = decode(resp).await?;
        Ok(body.note)
    }

    pub async fn permanent_delete(&self, id: Uuid) -> Result<()> {
        let resp = self
            .request(Method::DELETE, &format!("/api/notes/{}/permanent", id))
            .send()
            .await?;
        let _: MessageResponse = decode(resp).await?;
        Ok(())
    }

    /// Empty the trash one note at a time.
    ///
    /// Lists the trash, then permanently deletes each note in turn. Stops at
    /// the first failure with [`ClientError::Partial`]; notes deleted before
    /// it stay deleted. Returns the number deleted.
    pub async fn empty_trash(&self) -> Result<usize> {
        let trashed = self.list(&NoteQuery::trashed()).await?;
        let mut deleted = 0;
        for note in &trashed {
            if let Err(e) = self.permanent_delete(note.id).await {
                warn!(
                    note_id = %note.id,
                    deleted,
                    error = %e,
                    "Emptying trash stopped part way"
                );
                return Err(ClientError::Partial {
                    deleted,
                    source: Box::new(e),
                });
            }
            deleted += 1;
        }
        info!(result_count = deleted, "Trash emptied");
        Ok(deleted)
    }

    /// Empty the trash with a single `DELETE /api/notes/trash`.
    pub async fn empty_trash_on_server(&self) -> Result<usize> {
        let resp = self
            .request(Method::DELETE, "/api/notes/trash")
            .send()
            .await?;
        let body: TrashEmptiedResponse = decode(resp).await?;
        Ok(body.count)
    }

    async fn put_action(&self, id: Uuid, action: &str) -> Result<Note> {
        let resp = self
            .request(Method::PUT, &format!("/api/notes/{}/{}", id, action))
            .send()
            .await?;
        let body: NoteResponse = decode(resp).await?;
        Ok(body.note)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    let bytes = resp.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<MessageResponse>(&bytes)
            .map(|m| m.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_strips_trailing_slash() {
        let session = Session::new("http://localhost:5000/", "tok");
        assert_eq!(session.base_url, "http://localhost:5000");
        assert_eq!(session.token, "tok");
    }
}
