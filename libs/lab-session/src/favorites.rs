//! Favorite lab tools

use lab_calc::LabTool;
use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::error::Result;
use crate::state::{load_json, save_json, StateStore, FAVORITES_KEY};

/// Favorite lab tools, persisted as a list of slugs
pub struct Favorites<S: StateStore> {
    store: S,
}

impl<S: StateStore> Favorites<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current favorites in catalog order
    ///
    /// Slugs that no longer name a tool are dropped.
    pub async fn list(&self) -> Result<Vec<LabTool>> {
        let slugs: Vec<String> = load_json(&self.store, FAVORITES_KEY)
            .await?
            .unwrap_or_default();

        let mut tools = BTreeSet::new();
        for slug in &slugs {
            match slug.parse::<LabTool>() {
                Ok(tool) => {
                    tools.insert(tool);
                },
                Err(_) => warn!(slug = %slug, "unknown favorite dropped"),
            }
        }
        Ok(LabTool::ALL
            .into_iter()
            .filter(|tool| tools.contains(tool))
            .collect())
    }

    pub async fn contains(&self, tool: LabTool) -> Result<bool> {
        Ok(self.list().await?.contains(&tool))
    }

    /// Add a tool; returns false if it was already a favorite
    pub async fn add(&self, tool: LabTool) -> Result<bool> {
        let mut tools = self.list().await?;
        if tools.contains(&tool) {
            return Ok(false);
        }
        tools.push(tool);
        self.save(&tools).await?;
        Ok(true)
    }

    /// Remove a tool; returns false if it was not a favorite
    pub async fn remove(&self, tool: LabTool) -> Result<bool> {
        let mut tools = self.list().await?;
        let before = tools.len();
        tools.retain(|t| *t != tool);
        if tools.len() == before {
            return Ok(false);
        }
        self.save(&tools).await?;
        Ok(true)
    }

    /// Flip membership; returns whether the tool is a favorite afterwards
    pub async fn toggle(&self, tool: LabTool) -> Result<bool> {
        if self.remove(tool).await? {
            Ok(false)
        } else {
            self.add(tool).await?;
            Ok(true)
        }
    }

    async fn save(&self, tools: &[LabTool]) -> Result<()> {
        let slugs: Vec<&str> = tools.iter().map(LabTool::slug).collect();
        save_json(&self.store, FAVORITES_KEY, &slugs).await?;
        info!(count = slugs.len(), "favorites saved");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::state::MemoryStateStore;
    use std::sync::Arc;
    use tracing_test::traced_test;

    #[tokio::test]
    async fn test_toggle() {
        let favorites = Favorites::new(MemoryStateStore::new());
        assert!(favorites.list().await.unwrap().is_empty());

        assert!(favorites.toggle(LabTool::Titration).await.unwrap());
        assert!(favorites.contains(LabTool::Titration).await.unwrap());

        assert!(!favorites.toggle(LabTool::Titration).await.unwrap());
        assert!(favorites.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_remove_idempotent() {
        let favorites = Favorites::new(MemoryStateStore::new());
        assert!(favorites.add(LabTool::SetOperations).await.unwrap());
        assert!(!favorites.add(LabTool::SetOperations).await.unwrap());
        assert!(favorites.remove(LabTool::SetOperations).await.unwrap());
        assert!(!favorites.remove(LabTool::SetOperations).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_in_catalog_order() {
        let favorites = Favorites::new(MemoryStateStore::new());
        favorites.add(LabTool::SetOperations).await.unwrap();
        favorites.add(LabTool::EquationSolver).await.unwrap();

        let expected: Vec<LabTool> = LabTool::ALL
            .into_iter()
            .filter(|t| matches!(t, LabTool::SetOperations | LabTool::EquationSolver))
            .collect();
        assert_eq!(favorites.list().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_persisted_as_slugs() {
        let store = Arc::new(MemoryStateStore::new());
        let favorites = Favorites::new(Arc::clone(&store));
        favorites.add(LabTool::GalvanicCell).await.unwrap();

        let raw = store.get(FAVORITES_KEY).await.unwrap().unwrap();
        let slugs: Vec<String> = serde_json::from_slice(&raw).unwrap();
        assert_eq!(slugs, vec![LabTool::GalvanicCell.slug().to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_slug_dropped() {
        let store = Arc::new(MemoryStateStore::new());
        store
            .set(FAVORITES_KEY, br#"["no-such-tool", "set-operations"]"#)
            .await
            .unwrap();

        let favorites = Favorites::new(Arc::clone(&store));
        assert_eq!(
            favorites.list().await.unwrap(),
            vec![LabTool::SetOperations]
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn test_save_is_logged() {
        let favorites = Favorites::new(MemoryStateStore::new());
        favorites.add(LabTool::Mechanics).await.unwrap();
        assert!(logs_contain("favorites saved"));
    }
}
