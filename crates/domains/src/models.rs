//! # Domain Models
//!
//! Core entities of the Aethelgard community site. Serde names are
//! camelCase because the same structs are both the wire format consumed by
//! the SPA and the on-disk shape of the JSON documents, and both predate
//! this implementation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates an opaque entity id (uuid v4, simple form).
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

// ── Site accounts ────────────────────────────────────────────────────────────

/// A persisted site identity, as stored in `users.json`.
///
/// Most fields are optional: a game-account identity receives a stub row
/// here on its first profile mutation, and such rows carry no email,
/// nickname, or password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name shown next to forum posts and in the header.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Argon2 PHC string. Absent for game-account stub rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub avatar_url: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl SiteUser {
    /// Case-insensitive email match.
    pub fn has_email(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|e| e.eq_ignore_ascii_case(email))
    }

    /// Client-safe projection. The admin flag is supplied by the caller
    /// because it is derived live (allow-list OR stored flag), never read
    /// straight off the record.
    pub fn public(&self, is_admin: bool) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            nickname: self.nickname.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            avatar_url: self.avatar_url.clone(),
            is_admin,
        }
    }
}

/// The projection of a [`SiteUser`] that may leave the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub avatar_url: String,
    pub is_admin: bool,
}

/// Row in the admin console's user listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserRow {
    #[serde(flatten)]
    pub user: PublicUser,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Entry in the public "recently joined" list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentUser {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub avatar_url: String,
}

/// Partial profile update applied through [`crate::ports::UserStore`].
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

// ── Game accounts (external) ─────────────────────────────────────────────────

/// An account row in the external game auth database. Read-mostly; the one
/// write path this core owns is the username change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameAccount {
    pub id: u32,
    pub username: String,
}

// ── Forum ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumReply {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumThread {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    /// Append-only, ordered by creation.
    #[serde(default)]
    pub replies: Vec<ForumReply>,
}

impl ForumThread {
    /// List-view projection. The reply count is always recomputed from the
    /// reply vector so it cannot drift.
    pub fn summary(&self) -> ThreadSummary {
        ThreadSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            author_name: self.author_name.clone(),
            created_at: self.created_at,
            replies: self.replies.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    pub id: String,
    pub title: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub replies: usize,
}

// ── Events ───────────────────────────────────────────────────────────────────

/// An admin-curated calendar entry. The date is a plain calendar date with
/// no timezone semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial event update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub description: Option<String>,
}

// ── Game characters (external, read-only) ────────────────────────────────────

/// Leaderboard row projected from the characters database.
///
/// `totaltime` keeps the upstream column name; it is the character's total
/// played time in seconds and the level tie-breaker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCharacter {
    pub name: String,
    pub class: u8,
    pub level: u8,
    pub totaltime: u32,
    pub guild_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnlinePlayer {
    pub name: String,
    pub class: u8,
    pub level: u8,
}

// ── Session tokens ───────────────────────────────────────────────────────────

/// The signed, self-contained claim set. The server keeps no session table;
/// authorization is decided from these claims plus a live admin re-check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    /// Subject id: a `SiteUser` id, or a game account id rendered decimal.
    pub sub: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub admin: bool,
    pub iat: i64,
    pub exp: i64,
}

// ── Collection documents ─────────────────────────────────────────────────────

/// Top-level shape of `users.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersDocument {
    pub users: Vec<SiteUser>,
}

/// Top-level shape of `forum.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForumDocument {
    pub threads: Vec<ForumThread>,
}

/// Top-level shape of `events.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventsDocument {
    pub events: Vec<Event>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> SiteUser {
        SiteUser {
            id: new_id(),
            email: Some("Thrall@Example.COM".into()),
            name: "Thrall".into(),
            nickname: Some("warchief".into()),
            first_name: Some("Go'el".into()),
            last_name: Some("Durotan".into()),
            password_hash: Some("$argon2id$stub".into()),
            avatar_url: "https://example.test/a.svg".into(),
            is_admin: false,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn email_match_is_case_insensitive() {
        let user = sample_user();
        assert!(user.has_email("thrall@example.com"));
        assert!(!user.has_email("jaina@example.com"));
    }

    #[test]
    fn public_projection_never_carries_the_hash() {
        let user = sample_user();
        let json = serde_json::to_value(user.public(true)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["isAdmin"], serde_json::json!(true));
        assert_eq!(json["firstName"], serde_json::json!("Go'el"));
    }

    #[test]
    fn site_user_round_trips_through_camel_case_document() {
        let doc = UsersDocument { users: vec![sample_user()] };
        let text = serde_json::to_string_pretty(&doc).unwrap();
        assert!(text.contains("\"passwordHash\""));
        assert!(text.contains("\"createdAt\""));
        let back: UsersDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(back.users[0].id, doc.users[0].id);
    }

    #[test]
    fn stub_rows_deserialize_without_optional_fields() {
        let raw = r#"{"users":[{"id":"7","name":"Grom","avatarUrl":"/a.png",
                      "createdAt":"2025-10-01T00:00:00Z"}]}"#;
        let doc: UsersDocument = serde_json::from_str(raw).unwrap();
        let stub = &doc.users[0];
        assert!(stub.email.is_none());
        assert!(stub.password_hash.is_none());
        assert!(!stub.is_admin);
    }

    #[test]
    fn thread_summary_recomputes_reply_count() {
        let mut thread = ForumThread {
            id: "t1".into(),
            title: "Raid schedule".into(),
            content: "Weekly raids".into(),
            author_id: "u1".into(),
            author_name: "Jaina".into(),
            created_at: Utc::now(),
            replies: vec![],
        };
        assert_eq!(thread.summary().replies, 0);
        thread.replies.push(ForumReply {
            id: "r1".into(),
            content: "+1".into(),
            author_id: "u2".into(),
            author_name: "Thrall".into(),
            created_at: Utc::now(),
        });
        assert_eq!(thread.summary().replies, 1);
    }

    #[test]
    fn ranked_character_omits_missing_portrait() {
        let row = RankedCharacter {
            name: "Varok".into(),
            class: 1,
            level: 80,
            totaltime: 123_456,
            guild_name: None,
            image_url: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("imageUrl").is_none());
        // guildName stays present-as-null, matching the SQL projection.
        assert_eq!(json["guildName"], serde_json::Value::Null);
    }
}
