//! The admin gate: one authorization predicate applied before every
//! mutating admin-scoped operation.

use std::sync::Arc;

use domains::error::{DomainError, DomainResult};
use domains::models::SessionClaims;
use domains::ports::UserStore;

use crate::identity::AdminRoster;

/// Decides admin privilege from the token snapshot, the live allow-list,
/// and the live persisted flag. Recomputing per request (rather than
/// trusting the token alone) makes same-day promotion and revocation
/// effective within a token's validity window.
#[derive(Clone)]
pub struct AdminGate {
    roster: AdminRoster,
    users: Arc<dyn UserStore>,
}

impl AdminGate {
    pub fn new(roster: AdminRoster, users: Arc<dyn UserStore>) -> Self {
        Self { roster, users }
    }

    pub async fn is_admin(&self, claims: &SessionClaims) -> DomainResult<bool> {
        if claims.admin || self.roster.contains(claims.email.as_deref()) {
            return Ok(true);
        }
        if let Some(user) = self.users.find_by_id(&claims.sub).await? {
            if user.is_admin || self.roster.contains(user.email.as_deref()) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub async fn require(&self, claims: &SessionClaims) -> DomainResult<()> {
        if self.is_admin(claims).await? {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::models::{new_id, SiteUser};
    use domains::ports::MockUserStore;

    fn claims(email: Option<&str>, admin: bool) -> SessionClaims {
        SessionClaims {
            sub: "u1".into(),
            name: "Jaina".into(),
            nickname: None,
            email: email.map(String::from),
            admin,
            iat: 0,
            exp: i64::MAX,
        }
    }

    fn stored_user(is_admin: bool) -> SiteUser {
        SiteUser {
            id: "u1".into(),
            email: Some("user@example.com".into()),
            name: "Jaina".into(),
            nickname: None,
            first_name: None,
            last_name: None,
            password_hash: None,
            avatar_url: "/a.svg".into(),
            is_admin,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[tokio::test]
    async fn token_snapshot_grants_without_a_store_round_trip() {
        let users = MockUserStore::new(); // no expectations: must not be hit
        let gate = AdminGate::new(AdminRoster::default(), Arc::new(users));
        assert!(gate.is_admin(&claims(None, true)).await.unwrap());
    }

    #[tokio::test]
    async fn allow_list_email_grants_even_with_false_flag() {
        let users = MockUserStore::new();
        let gate = AdminGate::new(AdminRoster::from_csv("ops@example.com"), Arc::new(users));
        assert!(gate.is_admin(&claims(Some("OPS@example.com"), false)).await.unwrap());
    }

    #[tokio::test]
    async fn freshly_persisted_flag_wins_over_a_stale_token() {
        let mut users = MockUserStore::new();
        users
            .expect_find_by_id()
            .returning(|_| Ok(Some(stored_user(true))));
        let gate = AdminGate::new(AdminRoster::default(), Arc::new(users));
        // Token predates the promotion, so its snapshot says false.
        assert!(gate.is_admin(&claims(Some("user@example.com"), false)).await.unwrap());
    }

    #[tokio::test]
    async fn plain_users_are_forbidden() {
        let mut users = MockUserStore::new();
        users
            .expect_find_by_id()
            .returning(|_| Ok(Some(stored_user(false))));
        let gate = AdminGate::new(AdminRoster::default(), Arc::new(users));
        let denied = gate.require(&claims(Some("user@example.com"), false)).await;
        assert!(matches!(denied, Err(DomainError::Forbidden)));
    }

    #[tokio::test]
    async fn unknown_subject_is_forbidden_not_an_error() {
        let mut users = MockUserStore::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let gate = AdminGate::new(AdminRoster::default(), Arc::new(users));
        assert!(!gate.is_admin(&claims(None, false)).await.unwrap());
    }
}
