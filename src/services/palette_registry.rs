use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crush_dither::{Palette, PaletteError};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use utoipa::ToSchema;

/// Prefix of ids assigned to imported palettes.
pub const CUSTOM_PREFIX: &str = "custom_";

/// Where a stored palette came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaletteSource {
    /// Listed in the configuration file
    Config,
    /// Imported from a hex color list
    HexList,
    /// Sampled from an image
    Image,
}

impl PaletteSource {
    pub fn as_str(self) -> &'static str {
        match self {
            PaletteSource::Config => "config",
            PaletteSource::HexList => "hex_list",
            PaletteSource::Image => "image",
        }
    }
}

/// A palette held by the registry
#[derive(Debug, Clone)]
pub struct StoredPalette {
    pub palette: Palette,
    pub name: Option<String>,
    pub source: PaletteSource,
    pub imported_at: DateTime<Utc>,
}

impl StoredPalette {
    pub fn id(&self) -> &str {
        self.palette.id()
    }
}

/// Trait for user palette storage
#[async_trait]
pub trait PaletteStore: Send + Sync {
    /// Store a new palette under a fresh `custom_{n}` id
    async fn import(
        &self,
        name: Option<String>,
        colors: Vec<[u8; 3]>,
        source: PaletteSource,
    ) -> Result<StoredPalette, PaletteError>;

    /// Find a palette by id
    async fn find(&self, id: &str) -> Option<StoredPalette>;

    /// All stored palettes, in insertion order
    async fn list(&self) -> Vec<StoredPalette>;
}

/// In-memory palette storage
pub struct InMemoryPaletteStore {
    palettes: Arc<RwLock<HashMap<String, StoredPalette>>>,
    order: Arc<RwLock<Vec<String>>>,
    next_id: AtomicU64,
}

impl InMemoryPaletteStore {
    pub fn new() -> Self {
        Self {
            palettes: Arc::new(RwLock::new(HashMap::new())),
            order: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a store preloaded with named palettes.
    ///
    /// Named palettes keep their name as id, so a configured palette with a
    /// built-in's name shadows that built-in.
    pub fn with_named(named: Vec<(String, Vec<[u8; 3]>)>) -> Self {
        let mut palettes = HashMap::new();
        let mut order = Vec::new();
        let now = Utc::now();

        for (name, colors) in named {
            if crush_dither::builtin(&name).is_some() {
                tracing::warn!(palette = %name, "Configured palette shadows a built-in");
            }
            match Palette::new(name.clone(), colors) {
                Ok(palette) => {
                    order.push(name.clone());
                    palettes.insert(
                        name.clone(),
                        StoredPalette {
                            palette,
                            name: Some(name),
                            source: PaletteSource::Config,
                            imported_at: now,
                        },
                    );
                }
                Err(e) => tracing::warn!(palette = %name, %e, "Skipping configured palette"),
            }
        }

        Self {
            palettes: Arc::new(RwLock::new(palettes)),
            order: Arc::new(RwLock::new(order)),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryPaletteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaletteStore for InMemoryPaletteStore {
    async fn import(
        &self,
        name: Option<String>,
        colors: Vec<[u8; 3]>,
        source: PaletteSource,
    ) -> Result<StoredPalette, PaletteError> {
        let id = format!(
            "{CUSTOM_PREFIX}{}",
            self.next_id.fetch_add(1, Ordering::Relaxed)
        );
        let stored = StoredPalette {
            palette: Palette::new(id.clone(), colors)?,
            name,
            source,
            imported_at: Utc::now(),
        };

        let mut palettes = self.palettes.write().await;
        let mut order = self.order.write().await;
        palettes.insert(id.clone(), stored.clone());
        order.push(id);

        tracing::info!(
            id = stored.id(),
            colors = stored.palette.len(),
            source = ?source,
            "Imported palette"
        );
        Ok(stored)
    }

    async fn find(&self, id: &str) -> Option<StoredPalette> {
        let palettes = self.palettes.read().await;
        palettes.get(id).cloned()
    }

    async fn list(&self) -> Vec<StoredPalette> {
        let palettes = self.palettes.read().await;
        let order = self.order.read().await;
        order
            .iter()
            .filter_map(|id| palettes.get(id).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_import_assigns_sequential_ids() {
        let store = InMemoryPaletteStore::new();

        let a = store
            .import(None, vec![[0, 0, 0]], PaletteSource::HexList)
            .await
            .unwrap();
        let b = store
            .import(Some("warm".into()), vec![[255, 0, 0]], PaletteSource::Image)
            .await
            .unwrap();

        assert_eq!(a.id(), "custom_1");
        assert_eq!(b.id(), "custom_2");
        assert_eq!(b.name.as_deref(), Some("warm"));
    }

    #[tokio::test]
    async fn test_import_empty_fails() {
        let store = InMemoryPaletteStore::new();
        let err = store
            .import(None, Vec::new(), PaletteSource::HexList)
            .await
            .unwrap_err();
        assert_eq!(err, PaletteError::EmptyPalette);
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_find_and_list() {
        let store = InMemoryPaletteStore::with_named(vec![(
            "sunset".to_string(),
            vec![[255, 94, 91], [216, 216, 216]],
        )]);
        store
            .import(None, vec![[1, 2, 3]], PaletteSource::HexList)
            .await
            .unwrap();

        let sunset = store.find("sunset").await.unwrap();
        assert_eq!(sunset.source, PaletteSource::Config);
        assert_eq!(sunset.palette.len(), 2);
        assert!(store.find("custom_9").await.is_none());

        let ids: Vec<String> = store
            .list()
            .await
            .iter()
            .map(|p| p.id().to_string())
            .collect();
        assert_eq!(ids, vec!["sunset", "custom_1"]);
    }
}
