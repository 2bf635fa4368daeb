//! `EventStore` over the `events.json` document.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use domains::error::DomainResult;
use domains::models::{Event, EventPatch, EventsDocument};
use domains::ports::EventStore;

use crate::jsonfile::JsonStore;

pub struct FileEventStore {
    store: JsonStore<EventsDocument>,
}

impl FileEventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonStore::new(path),
        }
    }
}

#[async_trait]
impl EventStore for FileEventStore {
    async fn list(&self) -> DomainResult<Vec<Event>> {
        Ok(self.store.read().await?.events)
    }

    async fn insert(&self, event: Event) -> DomainResult<Event> {
        self.store
            .update(move |doc| {
                doc.events.insert(0, event.clone());
                event
            })
            .await
    }

    async fn update(
        &self,
        id: &str,
        patch: EventPatch,
        updated_by: &str,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Option<Event>> {
        self.store
            .update(move |doc| {
                let event = doc.events.iter_mut().find(|e| e.id == id)?;
                if let Some(title) = patch.title {
                    event.title = title;
                }
                if let Some(date) = patch.date {
                    event.date = date;
                }
                if let Some(location) = patch.location {
                    event.location = Some(location);
                }
                if let Some(description) = patch.description {
                    event.description = Some(description);
                }
                event.updated_by = Some(updated_by.to_string());
                event.updated_at = Some(updated_at);
                Some(event.clone())
            })
            .await
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        self.store
            .update(move |doc| {
                let before = doc.events.len();
                doc.events.retain(|e| e.id != id);
                doc.events.len() != before
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use domains::models::new_id;

    fn event(title: &str) -> Event {
        Event {
            id: new_id(),
            title: title.into(),
            date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            location: None,
            description: None,
            created_by: "u1".into(),
            created_at: Utc::now(),
            updated_by: None,
            updated_at: None,
        }
    }

    fn store() -> (tempfile::TempDir, FileEventStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileEventStore::new(dir.path().join("events.json"));
        (dir, store)
    }

    #[tokio::test]
    async fn patch_keeps_unset_fields() {
        let (_dir, store) = store();
        let created = store.insert(event("Raid Night")).await.unwrap();
        let updated = store
            .update(
                &created.id,
                EventPatch {
                    title: None,
                    date: None,
                    location: Some("Orgrimmar".into()),
                    description: None,
                },
                "admin",
                Utc::now(),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Raid Night");
        assert_eq!(updated.location.as_deref(), Some("Orgrimmar"));
        assert_eq!(updated.updated_by.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn update_and_delete_miss_unknown_ids() {
        let (_dir, store) = store();
        let missing = store
            .update("ghost", EventPatch::default(), "admin", Utc::now())
            .await
            .unwrap();
        assert!(missing.is_none());
        assert!(!store.delete("ghost").await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_event() {
        let (_dir, store) = store();
        let keep = store.insert(event("Fishing Derby")).await.unwrap();
        let gone = store.insert(event("Raid Night")).await.unwrap();
        assert!(store.delete(&gone.id).await.unwrap());
        let left = store.list().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, keep.id);
    }
}
