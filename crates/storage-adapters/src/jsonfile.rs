//! Whole-document JSON persistence.
//!
//! Each collection lives in one file (`users.json`, `forum.json`,
//! `events.json`) holding a single top-level object. The unit of read and
//! write is the entire document. Mutations run inside [`JsonStore::update`]
//! which holds a per-document mutex across read-apply-write, so writers to
//! the same collection are serialized within this process. The write itself
//! goes to a sibling temp file and is renamed into place, so the document on
//! disk is always one writer's complete output.

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;

use domains::error::DomainResult;

/// A single JSON document with serialized read-modify-write access.
pub struct JsonStore<D> {
    path: PathBuf,
    lock: Mutex<()>,
    _doc: PhantomData<fn() -> D>,
}

impl<D> JsonStore<D>
where
    D: Serialize + DeserializeOwned + Default + Send,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _doc: PhantomData,
        }
    }

    /// Reads the whole document, creating it with the empty default shape
    /// if it does not exist yet.
    pub async fn read(&self) -> DomainResult<D> {
        let _guard = self.lock.lock().await;
        self.load_locked().await
    }

    /// Applies `mutate` to the document and persists the result. The lock
    /// is held for the full read-apply-write, so concurrent updates to the
    /// same document cannot lose each other's changes.
    pub async fn update<R, F>(&self, mutate: F) -> DomainResult<R>
    where
        R: Send,
        F: FnOnce(&mut D) -> R + Send,
    {
        let _guard = self.lock.lock().await;
        let mut doc = self.load_locked().await?;
        let out = mutate(&mut doc);
        self.persist_locked(&doc).await?;
        Ok(out)
    }

    /// Like [`update`](Self::update), but the mutation may refuse. On `Err`
    /// nothing is written and the document keeps its previous content.
    pub async fn try_update<R, F>(&self, mutate: F) -> DomainResult<R>
    where
        R: Send,
        F: FnOnce(&mut D) -> DomainResult<R> + Send,
    {
        let _guard = self.lock.lock().await;
        let mut doc = self.load_locked().await?;
        let out = mutate(&mut doc)?;
        self.persist_locked(&doc).await?;
        Ok(out)
    }

    async fn load_locked(&self) -> DomainResult<D> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let doc = D::default();
                self.persist_locked(&doc).await?;
                info!(path = %self.path.display(), "initialized missing document");
                Ok(doc)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn persist_locked(&self, doc: &D) -> DomainResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(doc)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &body).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
