//! HTTP client for the household event store.
//!
//! The store speaks a small REST dialect: `GET /events` lists everything,
//! `POST /events` takes one draft or an array of drafts, `PUT` and `DELETE`
//! address single events by id. Errors arrive as `{"error": "..."}` bodies.

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{FamCalError, FamCalResult};
use crate::event::{Event, EventDraft};

/// Outcome of a delete. Deleting an id the store no longer has is not an
/// error, but callers can tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    AlreadyGone,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Client for the event store's REST API.
#[derive(Debug, Clone)]
pub struct EventStore {
    http: reqwest::Client,
    base_url: String,
}

impl EventStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        EventStore {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Every stored event, in whatever order the store keeps them.
    pub async fn list(&self) -> FamCalResult<Vec<Event>> {
        let resp = self.http.get(self.url("/events")).send().await?;
        Self::decode(resp).await
    }

    /// Create one event. The store assigns the id.
    pub async fn create(&self, draft: &EventDraft) -> FamCalResult<Event> {
        let resp = self
            .http
            .post(self.url("/events"))
            .json(draft)
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// Create many events in one request, in input order.
    pub async fn create_batch(&self, drafts: &[EventDraft]) -> FamCalResult<Vec<Event>> {
        let resp = self
            .http
            .post(self.url("/events"))
            .json(&drafts)
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// Replace the stored fields of an existing event.
    pub async fn update(&self, id: &str, draft: &EventDraft) -> FamCalResult<Event> {
        let resp = self
            .http
            .put(self.url(&format!("/events/{id}")))
            .json(draft)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(FamCalError::NotFound(id.to_string()));
        }
        Self::decode(resp).await
    }

    /// Remove an event. A 404 means someone else got there first.
    pub async fn delete(&self, id: &str) -> FamCalResult<DeleteOutcome> {
        let resp = self
            .http
            .delete(self.url(&format!("/events/{id}")))
            .send()
            .await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(DeleteOutcome::AlreadyGone),
            status if status.is_success() => Ok(DeleteOutcome::Deleted),
            _ => Err(Self::error_from(resp).await),
        }
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> FamCalResult<T> {
        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }
        Ok(resp.json().await?)
    }

    /// The store sends `{"error": "..."}` bodies; fall back to the status
    /// line when it does not.
    async fn error_from(resp: reqwest::Response) -> FamCalError {
        let status = resp.status();
        let message = match resp.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        FamCalError::Persistence {
            status: status.as_u16(),
            message,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Category, Owner, Provenance};
    use chrono::NaiveDate;
    use httptest::matchers::{all_of, request};
    use httptest::responders::{json_encoded, status_code};
    use httptest::{Expectation, Server};
    use serde_json::json;

    fn store_for(server: &Server) -> EventStore {
        EventStore::new(server.url("/").to_string())
    }

    fn draft() -> EventDraft {
        EventDraft {
            title: "Checkup".to_string(),
            start: NaiveDate::from_ymd_opt(2025, 11, 29)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 11, 29)
                .unwrap()
                .and_hms_opt(11, 0, 0)
                .unwrap(),
            category: Category::Medical,
            owner: Owner::Nadia,
            description: None,
            location: None,
            provenance: Provenance::Manual,
        }
    }

    #[tokio::test]
    async fn list_decodes_events() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of!(
                request::method("GET"),
                request::path("/events")
            ))
            .respond_with(json_encoded(json!([{
                "id": "evt-1",
                "title": "Checkup",
                "start": "2025-11-29T10:00:00",
                "end": "2025-11-29T11:00:00",
                "category": "medical",
                "owner": "nadia",
                "provenance": "manual"
            }]))),
        );

        let events = store_for(&server).list().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "evt-1");
        assert_eq!(events[0].category, Category::Medical);
        assert_eq!(events[0].description, None);
    }

    #[tokio::test]
    async fn create_returns_the_stored_event() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of!(
                request::method("POST"),
                request::path("/events")
            ))
            .respond_with(json_encoded(json!({
                "id": "evt-7",
                "title": "Checkup",
                "start": "2025-11-29T10:00:00",
                "end": "2025-11-29T11:00:00",
                "category": "medical",
                "owner": "nadia",
                "provenance": "manual"
            }))),
        );

        let created = store_for(&server).create(&draft()).await.unwrap();
        assert_eq!(created.id, "evt-7");
        assert_eq!(created.title, "Checkup");
    }

    #[tokio::test]
    async fn persistence_errors_carry_the_server_message() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of!(
                request::method("GET"),
                request::path("/events")
            ))
            .respond_with(status_code(500).body(r#"{"error":"database is locked"}"#)),
        );

        let err = store_for(&server).list().await.unwrap_err();
        match err {
            FamCalError::Persistence { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "database is locked");
            }
            other => panic!("expected Persistence error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_distinguishes_already_gone() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of!(
                request::method("DELETE"),
                request::path("/events/evt-1")
            ))
            .respond_with(json_encoded(json!({"ok": true}))),
        );
        server.expect(
            Expectation::matching(all_of!(
                request::method("DELETE"),
                request::path("/events/evt-9")
            ))
            .respond_with(status_code(404).body(r#"{"error":"Event not found"}"#)),
        );

        let store = store_for(&server);
        assert_eq!(store.delete("evt-1").await.unwrap(), DeleteOutcome::Deleted);
        assert_eq!(
            store.delete("evt-9").await.unwrap(),
            DeleteOutcome::AlreadyGone
        );
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of!(
                request::method("PUT"),
                request::path("/events/ghost")
            ))
            .respond_with(status_code(404).body(r#"{"error":"Event not found"}"#)),
        );

        let err = store_for(&server).update("ghost", &draft()).await.unwrap_err();
        assert!(matches!(err, FamCalError::NotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn unreachable_store_is_a_network_error() {
        // Nothing listens on port 9; connection is refused immediately.
        let store = EventStore::new("http://127.0.0.1:9");
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, FamCalError::Network(_)));
    }
}
