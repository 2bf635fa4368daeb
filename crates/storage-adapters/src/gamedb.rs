//! Read-mostly adapter for the external game databases (auth + characters).
//!
//! The schema belongs to the game server; queries here are projections over
//! it and must not assume anything beyond the columns they name. Every call
//! carries an explicit deadline so a stalled database surfaces as `Timeout`
//! instead of hanging the request.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::Row;
use tracing::info;

use domains::error::{DomainError, DomainResult};
use domains::models::{GameAccount, OnlinePlayer, RankedCharacter};
use domains::ports::{CharacterReader, GameAccountRepo};

#[derive(Debug, Clone)]
pub struct GameDbOptions {
    pub auth_url: String,
    pub characters_url: String,
    pub max_connections: u32,
    pub query_timeout: Duration,
}

pub struct GameDb {
    auth: MySqlPool,
    characters: MySqlPool,
    query_timeout: Duration,
}

fn upstream(err: sqlx::Error) -> DomainError {
    DomainError::Upstream(format!("game database: {err}"))
}

impl GameDb {
    pub async fn connect(opts: GameDbOptions) -> DomainResult<Self> {
        let auth = MySqlPoolOptions::new()
            .max_connections(opts.max_connections)
            .acquire_timeout(opts.query_timeout)
            .connect(&opts.auth_url)
            .await
            .map_err(upstream)?;
        let characters = MySqlPoolOptions::new()
            .max_connections(opts.max_connections)
            .acquire_timeout(opts.query_timeout)
            .connect(&opts.characters_url)
            .await
            .map_err(upstream)?;
        info!("game database pools established");
        Ok(Self {
            auth,
            characters,
            query_timeout: opts.query_timeout,
        })
    }

    /// Runs `fut` under the configured deadline, folding both failure modes
    /// into the domain taxonomy.
    async fn deadline<T, F>(&self, what: &'static str, fut: F) -> DomainResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Err(_) => Err(DomainError::Timeout(what.into())),
            Ok(Err(err)) => Err(DomainError::Upstream(format!("{what}: {err}"))),
            Ok(Ok(value)) => Ok(value),
        }
    }
}

#[async_trait]
impl CharacterReader for GameDb {
    async fn top_by_level(&self, limit: u32) -> DomainResult<Vec<RankedCharacter>> {
        let rows = self
            .deadline(
                "ranking query",
                sqlx::query(
                    "SELECT c.name, c.class, c.level, c.totaltime, g.name AS guildName \
                     FROM characters AS c \
                     LEFT JOIN guild_member AS gm ON gm.guid = c.guid \
                     LEFT JOIN guild AS g ON g.guildid = gm.guildid \
                     ORDER BY c.level DESC, c.totaltime DESC LIMIT ?",
                )
                .bind(limit)
                .fetch_all(&self.characters),
            )
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(RankedCharacter {
                    name: row.try_get("name").map_err(upstream)?,
                    class: row.try_get("class").map_err(upstream)?,
                    level: row.try_get("level").map_err(upstream)?,
                    totaltime: row.try_get("totaltime").map_err(upstream)?,
                    guild_name: row.try_get("guildName").map_err(upstream)?,
                    image_url: None,
                })
            })
            .collect()
    }

    async fn online(&self) -> DomainResult<Vec<OnlinePlayer>> {
        let rows = self
            .deadline(
                "online players query",
                sqlx::query(
                    "SELECT name, class, level FROM characters \
                     WHERE online = 1 ORDER BY level DESC",
                )
                .fetch_all(&self.characters),
            )
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(OnlinePlayer {
                    name: row.try_get("name").map_err(upstream)?,
                    class: row.try_get("class").map_err(upstream)?,
                    level: row.try_get("level").map_err(upstream)?,
                })
            })
            .collect()
    }

    async fn ping(&self) -> DomainResult<()> {
        self.deadline("health probe", sqlx::query("SELECT 1").execute(&self.characters))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl GameAccountRepo for GameDb {
    async fn authenticate(
        &self,
        username: &str,
        digest_hex: &str,
    ) -> DomainResult<Option<GameAccount>> {
        let row = self
            .deadline(
                "account lookup",
                sqlx::query(
                    "SELECT id, username FROM account \
                     WHERE username = ? AND sha_pass_hash = ?",
                )
                .bind(username)
                .bind(digest_hex)
                .fetch_optional(&self.auth),
            )
            .await?;

        row.map(|row| {
            Ok(GameAccount {
                id: row.try_get("id").map_err(upstream)?,
                username: row.try_get("username").map_err(upstream)?,
            })
        })
        .transpose()
    }

    async fn rename(&self, id: u32, username: &str) -> DomainResult<()> {
        self.deadline(
            "account rename",
            sqlx::query("UPDATE account SET username = ? WHERE id = ?")
                .bind(username)
                .bind(id)
                .execute(&self.auth),
        )
        .await?;
        Ok(())
    }
}
