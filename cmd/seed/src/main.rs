//! # seed
//!
//! Operational bootstrap: ensures the three JSON documents and the forum
//! policy thread exist, and promotes (or creates) the first admin account
//! from `SEED_ADMIN_EMAIL` / `SEED_ADMIN_PASSWORD`. Admin access should
//! never require hand-editing `users.json`.

use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::Utc;
use tracing::info;

use auth_adapters::Argon2Hasher;
use configs::AppConfig;
use domains::models::{new_id, SiteUser};
use domains::ports::{CredentialHasher, EventStore, UserStore};
use services::identity::default_site_avatar;
use services::ForumService;
use storage_adapters::{FileEventStore, FileForumStore, FileUserStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let cfg = AppConfig::load().context("loading configuration")?;

    tokio::fs::create_dir_all(cfg.data.characters_dir())
        .await
        .context("creating the uploads directory")?;

    let users = FileUserStore::new(cfg.data.users_file());
    let events = FileEventStore::new(cfg.data.events_file());
    let forum = ForumService::new(Arc::new(FileForumStore::new(cfg.data.forum_file())));

    // Reads self-heal missing documents; listing is enough to create them.
    users.list().await.context("initializing users.json")?;
    events.list().await.context("initializing events.json")?;
    forum
        .ensure_policy_thread()
        .await
        .context("seeding the forum policy thread")?;

    match (
        std::env::var("SEED_ADMIN_EMAIL").ok(),
        std::env::var("SEED_ADMIN_PASSWORD").ok(),
    ) {
        (Some(email), Some(password)) => seed_admin(&users, &email, &password).await?,
        (None, None) => info!("no SEED_ADMIN_EMAIL set, skipping admin account"),
        _ => bail!("SEED_ADMIN_EMAIL and SEED_ADMIN_PASSWORD must be set together"),
    }

    info!("seed complete");
    Ok(())
}

async fn seed_admin(users: &FileUserStore, email: &str, password: &str) -> anyhow::Result<()> {
    if let Some(existing) = users.find_by_email(email).await? {
        users.set_admin(&existing.id, true).await?;
        info!(user_id = %existing.id, "existing account promoted to admin");
        return Ok(());
    }

    let nickname = email.split('@').next().unwrap_or("admin").to_string();
    let user = SiteUser {
        id: new_id(),
        email: Some(email.to_string()),
        name: nickname.clone(),
        nickname: Some(nickname.clone()),
        first_name: None,
        last_name: None,
        password_hash: Some(Argon2Hasher.hash(password)?),
        avatar_url: default_site_avatar(&nickname),
        is_admin: true,
        created_at: Utc::now(),
        last_login_at: None,
    };
    let user = users.insert(user).await?;
    info!(user_id = %user.id, "admin account created");
    Ok(())
}
