//! Calendar events: publicly readable, admin-gated writes.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use domains::error::{DomainError, DomainResult};
use domains::models::{new_id, Event, EventPatch, SessionClaims};
use domains::ports::EventStore;

use crate::admin::AdminGate;

/// Fields for a new event; title and date are mandatory.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub date: NaiveDate,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct EventsService {
    store: Arc<dyn EventStore>,
    gate: AdminGate,
}

impl EventsService {
    pub fn new(store: Arc<dyn EventStore>, gate: AdminGate) -> Self {
        Self { store, gate }
    }

    pub async fn list(&self) -> DomainResult<Vec<Event>> {
        self.store.list().await
    }

    pub async fn create(&self, claims: &SessionClaims, new: NewEvent) -> DomainResult<Event> {
        self.gate.require(claims).await?;
        if new.title.trim().is_empty() {
            return Err(DomainError::Validation("title and date are required".into()));
        }
        let event = Event {
            id: new_id(),
            title: new.title.trim().to_string(),
            date: new.date,
            location: new.location.filter(|s| !s.trim().is_empty()),
            description: new.description.filter(|s| !s.trim().is_empty()),
            created_by: claims.sub.clone(),
            created_at: Utc::now(),
            updated_by: None,
            updated_at: None,
        };
        let event = self.store.insert(event).await?;
        info!(event_id = %event.id, admin = %claims.sub, "event created");
        Ok(event)
    }

    pub async fn update(
        &self,
        claims: &SessionClaims,
        id: &str,
        patch: EventPatch,
    ) -> DomainResult<Event> {
        self.gate.require(claims).await?;
        self.store
            .update(id, patch, &claims.sub, Utc::now())
            .await?
            .ok_or_else(|| DomainError::NotFound("Event".into(), id.to_string()))
    }

    pub async fn delete(&self, claims: &SessionClaims, id: &str) -> DomainResult<()> {
        self.gate.require(claims).await?;
        if self.store.delete(id).await? {
            info!(event_id = id, admin = %claims.sub, "event deleted");
            Ok(())
        } else {
            Err(DomainError::NotFound("Event".into(), id.to_string()))
        }
    }
}
