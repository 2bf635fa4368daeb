//! `UserStore` over the `users.json` document.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;

use domains::error::{DomainError, DomainResult};
use domains::models::{ProfilePatch, SiteUser, UsersDocument};
use domains::ports::UserStore;

use crate::jsonfile::JsonStore;

pub struct FileUserStore {
    store: JsonStore<UsersDocument>,
}

impl FileUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonStore::new(path),
        }
    }
}

fn nickname_taken(doc: &UsersDocument, nickname: &str) -> bool {
    doc.users.iter().any(|u| {
        u.nickname
            .as_deref()
            .is_some_and(|n| n.eq_ignore_ascii_case(nickname))
    })
}

#[async_trait]
impl UserStore for FileUserStore {
    async fn list(&self) -> DomainResult<Vec<SiteUser>> {
        Ok(self.store.read().await?.users)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<SiteUser>> {
        let doc = self.store.read().await?;
        Ok(doc.users.into_iter().find(|u| u.id == id))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<SiteUser>> {
        let doc = self.store.read().await?;
        Ok(doc.users.into_iter().find(|u| u.has_email(email)))
    }

    async fn insert(&self, user: SiteUser) -> DomainResult<SiteUser> {
        self.store
            .try_update(move |doc| {
                if let Some(email) = user.email.as_deref() {
                    if doc.users.iter().any(|u| u.has_email(email)) {
                        return Err(DomainError::Conflict("email already registered".into()));
                    }
                }
                if let Some(nickname) = user.nickname.as_deref() {
                    if nickname_taken(doc, nickname) {
                        return Err(DomainError::Conflict("nickname already taken".into()));
                    }
                }
                doc.users.push(user.clone());
                Ok(user)
            })
            .await
    }

    async fn update_profile(
        &self,
        id: &str,
        patch: ProfilePatch,
    ) -> DomainResult<Option<SiteUser>> {
        self.store
            .update(move |doc| {
                let user = doc.users.iter_mut().find(|u| u.id == id)?;
                if let Some(email) = patch.email {
                    user.email = Some(email);
                }
                if let Some(name) = patch.name {
                    user.name = name;
                }
                if let Some(avatar_url) = patch.avatar_url {
                    user.avatar_url = avatar_url;
                }
                Some(user.clone())
            })
            .await
    }

    async fn touch_last_login(&self, id: &str) -> DomainResult<()> {
        self.store
            .update(move |doc| {
                if let Some(user) = doc.users.iter_mut().find(|u| u.id == id) {
                    user.last_login_at = Some(Utc::now());
                }
            })
            .await
    }

    async fn set_admin(&self, id: &str, is_admin: bool) -> DomainResult<SiteUser> {
        self.store
            .try_update(move |doc| match doc.users.iter_mut().find(|u| u.id == id) {
                Some(user) => {
                    user.is_admin = is_admin;
                    Ok(user.clone())
                }
                None => Err(DomainError::NotFound("User".into(), id.to_string())),
            })
            .await
    }
}
