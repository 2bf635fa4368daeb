//! Forum use cases: thread listing, creation, replies, and the seeded
//! community-policy thread.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use domains::error::{DomainError, DomainResult};
use domains::models::{new_id, ForumReply, ForumThread, SessionClaims, ThreadSummary};
use domains::ports::ForumStore;

/// Stable id of the seeded policy thread; the seeding check also matches
/// on the title so pre-existing documents are not duplicated.
pub const POLICY_THREAD_ID: &str = "policy";
const POLICY_THREAD_TITLE: &str = "Política de Bom Comportamento";
const POLICY_THREAD_BODY: &str = "\
Mantenha a comunidade acolhedora e respeitosa. Ao participar do fórum e do chat, siga estas diretrizes:

• Respeite todos os membros; nada de ofensas, assédio ou discriminação.
• Evite spam, flood e conteúdo fora de tópico.
• Não compartilhe conteúdo ilegal, sexualmente explícito ou de ódio.
• Use linguagem apropriada e mantenha discussões construtivas.
• Marque spoilers e evite revelar conteúdo sem aviso.
• Denuncie comportamentos inadequados aos moderadores.

Importante: O descumprimento desta política poderá resultar em sanções, incluindo banimento do servidor.";

#[derive(Clone)]
pub struct ForumService {
    store: Arc<dyn ForumStore>,
}

impl ForumService {
    pub fn new(store: Arc<dyn ForumStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> DomainResult<Vec<ThreadSummary>> {
        self.store.summaries().await
    }

    pub async fn get(&self, id: &str) -> DomainResult<ForumThread> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Thread".into(), id.to_string()))
    }

    pub async fn create(
        &self,
        claims: &SessionClaims,
        title: &str,
        content: &str,
    ) -> DomainResult<ForumThread> {
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(DomainError::Validation("title and content are required".into()));
        }
        let thread = ForumThread {
            id: new_id(),
            title: title.trim().to_string(),
            content: content.to_string(),
            author_id: claims.sub.clone(),
            author_name: claims.name.clone(),
            created_at: Utc::now(),
            replies: vec![],
        };
        self.store.create(thread).await
    }

    pub async fn reply(
        &self,
        claims: &SessionClaims,
        thread_id: &str,
        content: &str,
    ) -> DomainResult<ForumReply> {
        if content.trim().is_empty() {
            return Err(DomainError::Validation("content is required".into()));
        }
        let reply = ForumReply {
            id: new_id(),
            content: content.to_string(),
            author_id: claims.sub.clone(),
            author_name: claims.name.clone(),
            created_at: Utc::now(),
        };
        self.store
            .add_reply(thread_id, reply)
            .await?
            .ok_or_else(|| DomainError::NotFound("Thread".into(), thread_id.to_string()))
    }

    /// Startup seeding: makes sure the community policy thread exists
    /// exactly once.
    pub async fn ensure_policy_thread(&self) -> DomainResult<()> {
        let thread = ForumThread {
            id: POLICY_THREAD_ID.into(),
            title: POLICY_THREAD_TITLE.into(),
            content: POLICY_THREAD_BODY.into(),
            author_id: "admin".into(),
            author_name: "Admin".into(),
            created_at: Utc::now(),
            replies: vec![],
        };
        if self.store.ensure_thread(thread).await? {
            info!("forum policy thread seeded");
        }
        Ok(())
    }
}
