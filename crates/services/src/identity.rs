//! Identity merging.
//!
//! Both verification paths (site email and game account) converge here:
//! a tagged identity with one projection to the canonical claim set, so
//! callers never care which backend authenticated them.

use chrono::{DateTime, Duration, Utc};

use domains::models::{GameAccount, SessionClaims, SiteUser};

/// Fixed session lifetime.
pub const SESSION_TTL_DAYS: i64 = 7;

/// The externally configured set of always-admin emails.
///
/// Membership makes an account admin even when its persisted flag is
/// false, which is how the first administrator exists at all.
#[derive(Debug, Clone, Default)]
pub struct AdminRoster {
    emails: Vec<String>,
}

impl AdminRoster {
    /// Parses the comma-separated allow-list from configuration.
    pub fn from_csv(csv: &str) -> Self {
        Self {
            emails: csv
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, email: Option<&str>) -> bool {
        email.is_some_and(|e| self.emails.iter().any(|a| a == &e.to_lowercase()))
    }
}

/// An authenticated identity, whichever backend produced it.
#[derive(Debug, Clone)]
pub enum Identity {
    Site(SiteUser),
    Game(GameAccount),
}

impl Identity {
    pub fn id(&self) -> String {
        match self {
            Identity::Site(user) => user.id.clone(),
            Identity::Game(account) => account.id.to_string(),
        }
    }

    /// Produces the canonical claim set with a fixed 7-day expiry.
    ///
    /// The admin flag is the OR of allow-list membership and the persisted
    /// flag. For a game identity the persisted flag comes from its site
    /// profile stub, which the caller looks up and passes in.
    pub fn claims(&self, stored_admin: bool, roster: &AdminRoster, now: DateTime<Utc>) -> SessionClaims {
        let (name, nickname, email) = match self {
            Identity::Site(user) => {
                (user.name.clone(), user.nickname.clone(), user.email.clone())
            }
            Identity::Game(account) => (account.username.clone(), None, None),
        };
        let admin = stored_admin || roster.contains(email.as_deref());
        SessionClaims {
            sub: self.id(),
            name,
            nickname,
            email,
            admin,
            iat: now.timestamp(),
            exp: (now + Duration::days(SESSION_TTL_DAYS)).timestamp(),
        }
    }
}

/// Deterministic default avatar for web-registered accounts.
pub fn default_site_avatar(seed: &str) -> String {
    format!(
        "https://api.dicebear.com/7.x/adventurer/svg?seed={}&size=64",
        safe_seed(seed)
    )
}

/// Deterministic default avatar for game-account identities.
pub fn default_game_avatar(seed: &str) -> String {
    format!("https://api.dicebear.com/7.x/initials/svg?seed={}", safe_seed(seed))
}

fn safe_seed(seed: &str) -> String {
    seed.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}
