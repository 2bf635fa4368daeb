//! The credential verifier: site-email login, game-account login, and
//! signup, all converging on the identity merger for token issuance.

use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use domains::error::{DomainError, DomainResult};
use domains::models::{new_id, PublicUser, SessionClaims, SiteUser};
use domains::ports::{CredentialHasher, GameAccountRepo, TokenService, UserStore};

use crate::identity::{default_game_avatar, default_site_avatar, AdminRoster, Identity};
use crate::legacy::game_digest;

const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static NICKNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,24}$").unwrap());

pub(crate) fn validate_email(email: &str) -> DomainResult<()> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(DomainError::Validation("invalid email format".into()))
    }
}

pub(crate) fn validate_nickname(nickname: &str) -> DomainResult<()> {
    if NICKNAME_RE.is_match(nickname) {
        Ok(())
    } else {
        Err(DomainError::Validation(
            "nickname must be 3-24 characters of letters, digits, '_' or '-'".into(),
        ))
    }
}

/// Validated signup payload.
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
}

/// A successful authentication: the signed token plus the client-safe user.
#[derive(Debug, Clone)]
pub struct AuthSuccess {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    accounts: Arc<dyn GameAccountRepo>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenService>,
    roster: AdminRoster,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        accounts: Arc<dyn GameAccountRepo>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenService>,
        roster: AdminRoster,
    ) -> Self {
        Self { users, accounts, hasher, tokens, roster }
    }

    fn issue(&self, identity: &Identity, stored_admin: bool) -> DomainResult<(String, SessionClaims)> {
        let claims = identity.claims(stored_admin, &self.roster, Utc::now());
        let token = self.tokens.issue(&claims)?;
        Ok((token, claims))
    }

    /// Creates a site account and logs it in.
    pub async fn signup(&self, input: SignupInput) -> DomainResult<AuthSuccess> {
        validate_email(&input.email)?;
        validate_nickname(&input.nickname)?;
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
            return Err(DomainError::Validation("first and last name are required".into()));
        }

        let avatar_url = input
            .avatar_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| default_site_avatar(&input.nickname));
        let user = SiteUser {
            id: new_id(),
            email: Some(input.email),
            name: input.nickname.clone(),
            nickname: Some(input.nickname),
            first_name: Some(input.first_name),
            last_name: Some(input.last_name),
            password_hash: Some(self.hasher.hash(&input.password)?),
            avatar_url,
            is_admin: false,
            created_at: Utc::now(),
            last_login_at: None,
        };

        let user = self.users.insert(user).await?;
        info!(user_id = %user.id, "user registered");

        let (token, claims) = self.issue(&Identity::Site(user.clone()), user.is_admin)?;
        Ok(AuthSuccess { token, user: user.public(claims.admin) })
    }

    /// Site-email path. Unknown email and wrong password are deliberately
    /// the same failure.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthSuccess> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                warn!(email, "failed login attempt");
                return Err(DomainError::InvalidCredentials);
            }
        };
        let verified = user
            .password_hash
            .as_deref()
            .is_some_and(|hash| self.hasher.verify(password, hash));
        if !verified {
            warn!(email, "failed login attempt");
            return Err(DomainError::InvalidCredentials);
        }

        self.users.touch_last_login(&user.id).await?;
        info!(user_id = %user.id, "user logged in");

        let (token, claims) = self.issue(&Identity::Site(user.clone()), user.is_admin)?;
        Ok(AuthSuccess { token, user: user.public(claims.admin) })
    }

    /// Game-account path: the legacy digest is matched by the external
    /// auth database.
    pub async fn login_game(&self, username: &str, password: &str) -> DomainResult<AuthSuccess> {
        let digest = game_digest(username, password);
        let account = self
            .accounts
            .authenticate(username, &digest)
            .await?
            .ok_or_else(|| {
                warn!(username, "failed game login attempt");
                DomainError::InvalidCredentials
            })?;

        // A site profile stub may exist from an earlier profile mutation;
        // it carries the persisted admin flag and any chosen avatar.
        let profile = self.users.find_by_id(&account.id.to_string()).await?;
        let stored_admin = profile.as_ref().is_some_and(|p| p.is_admin);

        let (token, claims) = self.issue(&Identity::Game(account.clone()), stored_admin)?;

        info!(account_id = account.id, "game account logged in");
        let user = match profile {
            Some(profile) => profile.public(claims.admin),
            None => PublicUser {
                id: account.id.to_string(),
                email: None,
                name: account.username.clone(),
                nickname: None,
                first_name: None,
                last_name: None,
                avatar_url: default_game_avatar(&account.username),
                is_admin: claims.admin,
            },
        };
        Ok(AuthSuccess { token, user })
    }

    /// Resolves the current identity for `GET /api/auth/me`, preferring the
    /// live profile over token claims and re-deriving the admin flag.
    pub async fn me(&self, claims: &SessionClaims) -> DomainResult<PublicUser> {
        let profile = self.users.find_by_id(&claims.sub).await?;
        let is_admin = match &profile {
            Some(profile) => {
                claims.admin
                    || profile.is_admin
                    || self.roster.contains(profile.email.as_deref())
            }
            None => claims.admin || self.roster.contains(claims.email.as_deref()),
        };
        Ok(match profile {
            Some(profile) => profile.public(is_admin),
            None => PublicUser {
                id: claims.sub.clone(),
                email: claims.email.clone(),
                name: claims.name.clone(),
                nickname: claims.nickname.clone(),
                first_name: None,
                last_name: None,
                avatar_url: default_game_avatar(&claims.name),
                is_admin,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::models::GameAccount;
    use domains::ports::{
        MockCredentialHasher, MockGameAccountRepo, MockTokenService, MockUserStore,
    };
    use mockall::predicate::eq;

    fn token_service() -> MockTokenService {
        let mut tokens = MockTokenService::new();
        tokens.expect_issue().returning(|_| Ok("signed-token".into()));
        tokens
    }

    fn stored_user() -> SiteUser {
        SiteUser {
            id: "u1".into(),
            email: Some("jaina@example.com".into()),
            name: "proudmoore".into(),
            nickname: Some("proudmoore".into()),
            first_name: Some("Jaina".into()),
            last_name: Some("Proudmoore".into()),
            password_hash: Some("stored-hash".into()),
            avatar_url: "/a.svg".into(),
            is_admin: false,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    fn service(
        users: MockUserStore,
        accounts: MockGameAccountRepo,
        hasher: MockCredentialHasher,
    ) -> AuthService {
        AuthService::new(
            Arc::new(users),
            Arc::new(accounts),
            Arc::new(hasher),
            Arc::new(token_service()),
            AdminRoster::from_csv("root@example.com"),
        )
    }

    fn signup_input() -> SignupInput {
        SignupInput {
            email: "jaina@example.com".into(),
            password: "kultiras-queen".into(),
            nickname: "proudmoore".into(),
            first_name: "Jaina".into(),
            last_name: "Proudmoore".into(),
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn signup_rejects_bad_email_before_touching_the_store() {
        let service = service(
            MockUserStore::new(),
            MockGameAccountRepo::new(),
            MockCredentialHasher::new(),
        );
        let input = SignupInput { email: "not-an-email".into(), ..signup_input() };
        assert!(matches!(
            service.signup(input).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn signup_rejects_short_passwords() {
        let service = service(
            MockUserStore::new(),
            MockGameAccountRepo::new(),
            MockCredentialHasher::new(),
        );
        let input = SignupInput { password: "short".into(), ..signup_input() };
        assert!(matches!(
            service.signup(input).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn signup_hashes_and_defaults_the_avatar() {
        let mut users = MockUserStore::new();
        users.expect_insert().returning(|user| {
            assert_eq!(user.password_hash.as_deref(), Some("argon2-hash"));
            assert!(user.avatar_url.contains("seed=proudmoore"));
            assert!(!user.is_admin);
            Ok(user)
        });
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .with(eq("kultiras-queen"))
            .returning(|_| Ok("argon2-hash".into()));

        let service = service(users, MockGameAccountRepo::new(), hasher);
        let success = service.signup(signup_input()).await.unwrap();
        assert_eq!(success.token, "signed-token");
        assert_eq!(success.user.nickname.as_deref(), Some("proudmoore"));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let mut users = MockUserStore::new();
        users
            .expect_find_by_email()
            .with(eq("jaina@example.com"))
            .returning(|_| Ok(Some(stored_user())));
        users
            .expect_find_by_email()
            .with(eq("ghost@example.com"))
            .returning(|_| Ok(None));
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_verify().returning(|_, _| false);

        let service = service(users, MockGameAccountRepo::new(), hasher);
        let wrong = service.login("jaina@example.com", "bad").await.unwrap_err();
        let ghost = service.login("ghost@example.com", "bad").await.unwrap_err();
        assert_eq!(wrong.to_string(), ghost.to_string());
    }

    #[tokio::test]
    async fn login_touches_last_login() {
        let mut users = MockUserStore::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_user())));
        users
            .expect_touch_last_login()
            .with(eq("u1"))
            .times(1)
            .returning(|_| Ok(()));
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_verify()
            .with(eq("right"), eq("stored-hash"))
            .returning(|_, _| true);

        let service = service(users, MockGameAccountRepo::new(), hasher);
        let success = service.login("jaina@example.com", "right").await.unwrap();
        assert_eq!(success.user.id, "u1");
    }

    #[tokio::test]
    async fn game_login_sends_the_legacy_digest() {
        let mut accounts = MockGameAccountRepo::new();
        let expected_digest = game_digest("thrall", "frostwolf");
        accounts
            .expect_authenticate()
            .withf(move |user, digest| user == "thrall" && digest == expected_digest)
            .returning(|_, _| Ok(Some(GameAccount { id: 7, username: "THRALL".into() })));
        let mut users = MockUserStore::new();
        users.expect_find_by_id().with(eq("7")).returning(|_| Ok(None));

        let service = service(users, accounts, MockCredentialHasher::new());
        let success = service.login_game("thrall", "frostwolf").await.unwrap();
        assert_eq!(success.user.id, "7");
        assert_eq!(success.user.name, "THRALL");
        assert!(success.user.email.is_none());
    }

    #[tokio::test]
    async fn game_login_rejects_unknown_accounts() {
        let mut accounts = MockGameAccountRepo::new();
        accounts.expect_authenticate().returning(|_, _| Ok(None));
        let service = service(MockUserStore::new(), accounts, MockCredentialHasher::new());
        assert!(matches!(
            service.login_game("ghost", "pw").await,
            Err(DomainError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn me_re_derives_admin_from_the_roster() {
        let mut users = MockUserStore::new();
        users.expect_find_by_id().returning(|_| {
            Ok(Some(SiteUser {
                email: Some("root@example.com".into()),
                ..stored_user()
            }))
        });
        let service = service(users, MockGameAccountRepo::new(), MockCredentialHasher::new());
        let claims = SessionClaims {
            sub: "u1".into(),
            name: "proudmoore".into(),
            nickname: None,
            email: Some("root@example.com".into()),
            admin: false, // stale snapshot
            iat: 0,
            exp: i64::MAX,
        };
        assert!(service.me(&claims).await.unwrap().is_admin);
    }
}
