//! The ranking projection: top characters from the game database enriched
//! with locally stored portraits, plus the online-players list.

use std::sync::Arc;

use domains::error::DomainResult;
use domains::models::{OnlinePlayer, RankedCharacter};
use domains::ports::{CharacterReader, PortraitLocator};

/// Hard ceiling on a single ranking query; prevents unbounded scans
/// whatever the client asks for.
pub const MAX_RANKING_LIMIT: u32 = 50;
const DEFAULT_RANKING_LIMIT: u32 = 10;

#[derive(Clone)]
pub struct RankingService {
    characters: Arc<dyn CharacterReader>,
    portraits: Arc<dyn PortraitLocator>,
}

impl RankingService {
    pub fn new(characters: Arc<dyn CharacterReader>, portraits: Arc<dyn PortraitLocator>) -> Self {
        Self { characters, portraits }
    }

    /// Top characters by level desc, played time desc. The requested count
    /// is clamped to `1..=MAX_RANKING_LIMIT`; a database failure surfaces
    /// to the caller, never synthesized rows.
    pub async fn top(&self, limit: Option<u32>) -> DomainResult<Vec<RankedCharacter>> {
        let limit = limit.unwrap_or(DEFAULT_RANKING_LIMIT).clamp(1, MAX_RANKING_LIMIT);
        let mut rows = self.characters.top_by_level(limit).await?;
        for row in &mut rows {
            row.image_url = self.portraits.locate(&row.name).await;
        }
        Ok(rows)
    }

    pub async fn online(&self) -> DomainResult<Vec<OnlinePlayer>> {
        self.characters.online().await
    }

    pub async fn ping(&self) -> DomainResult<()> {
        self.characters.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::error::DomainError;
    use domains::ports::{MockCharacterReader, MockPortraitLocator};
    use mockall::predicate::eq;

    fn row(name: &str, level: u8) -> RankedCharacter {
        RankedCharacter {
            name: name.into(),
            class: 1,
            level,
            totaltime: 1000,
            guild_name: None,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn oversized_limits_are_clamped_to_the_ceiling() {
        let mut characters = MockCharacterReader::new();
        characters
            .expect_top_by_level()
            .with(eq(MAX_RANKING_LIMIT))
            .returning(|_| Ok(vec![]));
        let service = RankingService::new(
            Arc::new(characters),
            Arc::new(MockPortraitLocator::new()),
        );
        service.top(Some(999)).await.unwrap();
    }

    #[tokio::test]
    async fn missing_limit_defaults_to_ten() {
        let mut characters = MockCharacterReader::new();
        characters
            .expect_top_by_level()
            .with(eq(10u32))
            .returning(|_| Ok(vec![]));
        let service = RankingService::new(
            Arc::new(characters),
            Arc::new(MockPortraitLocator::new()),
        );
        service.top(None).await.unwrap();
    }

    #[tokio::test]
    async fn portraits_are_attached_when_found() {
        let mut characters = MockCharacterReader::new();
        characters
            .expect_top_by_level()
            .returning(|_| Ok(vec![row("Thrall", 80), row("Jaina", 80)]));
        let mut portraits = MockPortraitLocator::new();
        portraits
            .expect_locate()
            .with(eq("Thrall"))
            .returning(|_| Some("/api/uploads/characters/Thrall.jpg".into()));
        portraits.expect_locate().with(eq("Jaina")).returning(|_| None);

        let service = RankingService::new(Arc::new(characters), Arc::new(portraits));
        let rows = service.top(Some(2)).await.unwrap();
        assert_eq!(
            rows[0].image_url.as_deref(),
            Some("/api/uploads/characters/Thrall.jpg")
        );
        assert!(rows[1].image_url.is_none());
    }

    #[tokio::test]
    async fn upstream_failures_pass_through_untouched() {
        let mut characters = MockCharacterReader::new();
        characters
            .expect_top_by_level()
            .returning(|_| Err(DomainError::Upstream("connection refused".into())));
        let service = RankingService::new(
            Arc::new(characters),
            Arc::new(MockPortraitLocator::new()),
        );
        assert!(matches!(
            service.top(Some(5)).await,
            Err(DomainError::Upstream(_))
        ));
    }
}
