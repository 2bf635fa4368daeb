//! Character portrait probe over the local uploads tree.
//!
//! Portraits are keyed by sanitized character name plus extension, e.g.
//! `uploads/characters/Thrall.jpg`, and served statically by the API under
//! `/api/uploads/characters/`.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use domains::ports::PortraitLocator;

/// Extensions probed in order; the first hit wins.
const CANDIDATE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".webp"];

pub struct LocalPortraits {
    dir: PathBuf,
    url_prefix: String,
}

impl LocalPortraits {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into(),
        }
    }
}

/// Collapses anything outside `[A-Za-z0-9_-]` to `_`, matching the name
/// under which upload tooling stores the file.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

#[async_trait]
impl PortraitLocator for LocalPortraits {
    async fn locate(&self, character: &str) -> Option<String> {
        let safe = sanitize_name(character);
        for ext in CANDIDATE_EXTENSIONS {
            let candidate = self.dir.join(format!("{safe}{ext}"));
            if fs::try_exists(&candidate).await.unwrap_or(false) {
                return Some(format!("{}/{safe}{ext}", self.url_prefix));
            }
        }
        None
    }
}
