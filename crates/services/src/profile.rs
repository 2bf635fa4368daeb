//! Profile mutations, the public recent-users list, and the admin console
//! operations over site accounts.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use domains::error::{DomainError, DomainResult};
use domains::models::{
    AdminUserRow, ProfilePatch, PublicUser, RecentUser, SessionClaims, SiteUser,
};
use domains::ports::{GameAccountRepo, TokenService, UserStore};

use crate::admin::AdminGate;
use crate::auth::{validate_email, validate_nickname, AuthSuccess};
use crate::identity::{default_game_avatar, AdminRoster, Identity};

const RECENT_USERS_LIMIT: usize = 20;

#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserStore>,
    accounts: Arc<dyn GameAccountRepo>,
    tokens: Arc<dyn TokenService>,
    roster: AdminRoster,
    gate: AdminGate,
}

impl ProfileService {
    pub fn new(
        users: Arc<dyn UserStore>,
        accounts: Arc<dyn GameAccountRepo>,
        tokens: Arc<dyn TokenService>,
        roster: AdminRoster,
        gate: AdminGate,
    ) -> Self {
        Self { users, accounts, tokens, roster, gate }
    }

    /// Applies a patch to the caller's profile, creating a stub row first
    /// when a game-account identity has none yet.
    async fn upsert(&self, claims: &SessionClaims, patch: ProfilePatch) -> DomainResult<SiteUser> {
        if let Some(user) = self.users.update_profile(&claims.sub, patch.clone()).await? {
            return Ok(user);
        }
        let seed = patch.name.clone().unwrap_or_else(|| claims.name.clone());
        let stub = SiteUser {
            id: claims.sub.clone(),
            email: patch.email.or_else(|| claims.email.clone()),
            name: patch.name.unwrap_or_else(|| claims.name.clone()),
            nickname: claims.nickname.clone(),
            first_name: None,
            last_name: None,
            password_hash: None,
            avatar_url: patch
                .avatar_url
                .unwrap_or_else(|| default_game_avatar(&seed)),
            is_admin: false,
            created_at: Utc::now(),
            last_login_at: None,
        };
        self.users.insert(stub).await
    }

    fn reissue(&self, user: &SiteUser) -> DomainResult<AuthSuccess> {
        let claims = Identity::Site(user.clone()).claims(user.is_admin, &self.roster, Utc::now());
        let token = self.tokens.issue(&claims)?;
        Ok(AuthSuccess { token, user: user.public(claims.admin) })
    }

    pub async fn set_avatar(&self, claims: &SessionClaims, avatar_url: &str) -> DomainResult<PublicUser> {
        if avatar_url.trim().is_empty() {
            return Err(DomainError::Validation("missing avatarUrl".into()));
        }
        let user = self
            .upsert(claims, ProfilePatch { avatar_url: Some(avatar_url.to_string()), ..Default::default() })
            .await?;
        let is_admin = self.gate.is_admin(claims).await?;
        Ok(user.public(is_admin))
    }

    /// Changes the account email and re-issues the token so its claims
    /// reflect the new address.
    pub async fn set_email(&self, claims: &SessionClaims, email: &str) -> DomainResult<AuthSuccess> {
        validate_email(email)?;
        if let Some(existing) = self.users.find_by_email(email).await? {
            if existing.id != claims.sub {
                return Err(DomainError::Conflict("email already registered".into()));
            }
        }
        let user = self
            .upsert(claims, ProfilePatch { email: Some(email.to_string()), ..Default::default() })
            .await?;
        info!(user_id = %user.id, "profile email updated");
        self.reissue(&user)
    }

    /// Renames the game account (the one external write this core owns),
    /// mirrors the name onto the site profile, and re-issues the token.
    pub async fn set_game_name(&self, claims: &SessionClaims, name: &str) -> DomainResult<AuthSuccess> {
        validate_nickname(name)?;
        let account_id: u32 = claims
            .sub
            .parse()
            .map_err(|_| DomainError::Validation("a game-account identity is required".into()))?;

        self.accounts.rename(account_id, name).await?;
        let user = self
            .upsert(claims, ProfilePatch { name: Some(name.to_string()), ..Default::default() })
            .await?;
        info!(account_id, new_name = name, "game account renamed");
        self.reissue(&user)
    }

    /// The public "recently joined" list: newest 20 accounts.
    pub async fn recent(&self) -> DomainResult<Vec<RecentUser>> {
        let mut users = self.users.list().await?;
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users
            .into_iter()
            .take(RECENT_USERS_LIMIT)
            .map(|u| RecentUser {
                id: u.id,
                name: u.name,
                nickname: u.nickname,
                avatar_url: u.avatar_url,
            })
            .collect())
    }

    /// Admin console: every site account, with live-derived admin flags.
    pub async fn list_users(&self, claims: &SessionClaims) -> DomainResult<Vec<AdminUserRow>> {
        self.gate.require(claims).await?;
        Ok(self
            .users
            .list()
            .await?
            .into_iter()
            .map(|u| {
                let is_admin = u.is_admin || self.roster.contains(u.email.as_deref());
                AdminUserRow {
                    user: u.public(is_admin),
                    created_at: u.created_at,
                    last_login_at: u.last_login_at,
                }
            })
            .collect())
    }

    /// Admin console: toggles another account's persisted admin flag.
    pub async fn set_admin_flag(
        &self,
        claims: &SessionClaims,
        target_id: &str,
        is_admin: bool,
    ) -> DomainResult<PublicUser> {
        self.gate.require(claims).await?;
        let user = self.users.set_admin(target_id, is_admin).await?;
        info!(admin = %claims.sub, target = target_id, is_admin, "admin flag toggled");
        let derived = user.is_admin || self.roster.contains(user.email.as_deref());
        Ok(user.public(derived))
    }
}
