//! `ForumStore` over the `forum.json` document.

use std::path::PathBuf;

use async_trait::async_trait;

use domains::error::DomainResult;
use domains::models::{ForumDocument, ForumReply, ForumThread, ThreadSummary};
use domains::ports::ForumStore;

use crate::jsonfile::JsonStore;

pub struct FileForumStore {
    store: JsonStore<ForumDocument>,
}

impl FileForumStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonStore::new(path),
        }
    }
}

#[async_trait]
impl ForumStore for FileForumStore {
    async fn summaries(&self) -> DomainResult<Vec<ThreadSummary>> {
        let doc = self.store.read().await?;
        Ok(doc.threads.iter().map(ForumThread::summary).collect())
    }

    async fn create(&self, thread: ForumThread) -> DomainResult<ForumThread> {
        self.store
            .update(move |doc| {
                doc.threads.insert(0, thread.clone());
                thread
            })
            .await
    }

    async fn get(&self, id: &str) -> DomainResult<Option<ForumThread>> {
        let doc = self.store.read().await?;
        Ok(doc.threads.into_iter().find(|t| t.id == id))
    }

    async fn add_reply(
        &self,
        thread_id: &str,
        reply: ForumReply,
    ) -> DomainResult<Option<ForumReply>> {
        self.store
            .update(move |doc| {
                let thread = doc.threads.iter_mut().find(|t| t.id == thread_id)?;
                thread.replies.push(reply.clone());
                Some(reply)
            })
            .await
    }

    async fn ensure_thread(&self, thread: ForumThread) -> DomainResult<bool> {
        self.store
            .update(move |doc| {
                let exists = doc.threads.iter().any(|t| {
                    t.id == thread.id || t.title.eq_ignore_ascii_case(&thread.title)
                });
                if exists {
                    false
                } else {
                    doc.threads.insert(0, thread);
                    true
                }
            })
            .await
    }
}
