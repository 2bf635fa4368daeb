//! # Ports
//!
//! Contracts between the services and the adapter crates. Every adapter
//! implements one of these; test crates get `MockXxx` doubles through the
//! `testing` feature.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DomainResult;
use crate::models::{
    Event, EventPatch, ForumReply, ForumThread, GameAccount, OnlinePlayer, ProfilePatch,
    RankedCharacter, SessionClaims, SiteUser, ThreadSummary,
};

/// Persistence for site accounts (`users.json`).
///
/// The adapter owns whole-document read-modify-write; each method here is
/// one serialized mutation or one consistent read of the document.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> DomainResult<Vec<SiteUser>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<SiteUser>>;
    /// Case-insensitive email lookup.
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<SiteUser>>;
    /// Inserts a new record, enforcing email and nickname uniqueness
    /// (case-insensitive). Returns `Conflict` on violation.
    async fn insert(&self, user: SiteUser) -> DomainResult<SiteUser>;
    /// Applies a partial profile update. `None` means the row is absent so
    /// the caller may upsert a stub instead.
    async fn update_profile(&self, id: &str, patch: ProfilePatch)
        -> DomainResult<Option<SiteUser>>;
    async fn touch_last_login(&self, id: &str) -> DomainResult<()>;
    /// Flips the persisted admin flag; `NotFound` when the id is unknown.
    async fn set_admin(&self, id: &str, is_admin: bool) -> DomainResult<SiteUser>;
}

/// Persistence for the forum (`forum.json`).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ForumStore: Send + Sync {
    /// Thread summaries, newest first, reply counts recomputed.
    async fn summaries(&self) -> DomainResult<Vec<ThreadSummary>>;
    async fn create(&self, thread: ForumThread) -> DomainResult<ForumThread>;
    async fn get(&self, id: &str) -> DomainResult<Option<ForumThread>>;
    /// Appends a reply; `None` when the thread does not exist.
    async fn add_reply(&self, thread_id: &str, reply: ForumReply)
        -> DomainResult<Option<ForumReply>>;
    /// Inserts the thread unless one with the same id (or title) already
    /// exists. Returns `true` when an insert happened.
    async fn ensure_thread(&self, thread: ForumThread) -> DomainResult<bool>;
}

/// Persistence for calendar events (`events.json`).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list(&self) -> DomainResult<Vec<Event>>;
    async fn insert(&self, event: Event) -> DomainResult<Event>;
    /// Applies a partial update; `None` when the id is unknown.
    async fn update(
        &self,
        id: &str,
        patch: EventPatch,
        updated_by: &str,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Option<Event>>;
    /// Returns `true` when a record was removed.
    async fn delete(&self, id: &str) -> DomainResult<bool>;
}

/// The external game auth database. Read-mostly; `rename` is the single
/// write path this core owns.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait GameAccountRepo: Send + Sync {
    /// Matches username plus the legacy credential digest (lowercase hex).
    async fn authenticate(&self, username: &str, digest_hex: &str)
        -> DomainResult<Option<GameAccount>>;
    async fn rename(&self, id: u32, username: &str) -> DomainResult<()>;
}

/// Read-only projection of the external characters database.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CharacterReader: Send + Sync {
    /// Top characters by level desc, total played time desc.
    async fn top_by_level(&self, limit: u32) -> DomainResult<Vec<RankedCharacter>>;
    async fn online(&self) -> DomainResult<Vec<OnlinePlayer>>;
    /// Cheap liveness probe for the health endpoint.
    async fn ping(&self) -> DomainResult<()>;
}

/// Probe for locally stored character portraits.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PortraitLocator: Send + Sync {
    /// Public URL of the portrait for `character`, if one is on disk.
    async fn locate(&self, character: &str) -> Option<String>;
}

/// Signed session-token issuance and verification.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenService: Send + Sync {
    fn issue(&self, claims: &SessionClaims) -> DomainResult<String>;
    /// Signature and expiry check; failures map to `Unauthorized`.
    fn verify(&self, token: &str) -> DomainResult<SessionClaims>;
}

/// One-way password hashing for site accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> DomainResult<String>;
    /// Constant-time verification against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> bool;
}
