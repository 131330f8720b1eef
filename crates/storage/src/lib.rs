use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use waypoint_core::{Language, Place};

pub const ANONYMOUS_AUTHOR: &str = "Anonymous traveler";

#[derive(Debug, Error)]
pub enum NotebookError {
    #[error("place name must not be blank")]
    BlankPlaceName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceStats {
    pub favorite_count: u32,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FavoriteToggle {
    Saved { favorite_count: u32 },
    Removed { favorite_count: u32 },
}

/// The user's saved-places notebook. Everything is keyed by place name, the
/// only stable handle a place has across replies.
pub trait NotebookRepository: Send + Sync {
    async fn list_favorites(&self) -> Result<Vec<Place>>;
    async fn is_favorite(&self, name: &str) -> Result<bool>;
    async fn toggle_favorite(&self, place: &Place) -> Result<FavoriteToggle>;
    async fn stats_for(&self, name: &str) -> Result<PlaceStats>;
    async fn add_review(
        &self,
        place_name: &str,
        author: Option<&str>,
        text: &str,
    ) -> Result<Option<Review>>;
    async fn reviews_for(&self, name: &str) -> Result<Vec<Review>>;
    async fn language(&self) -> Result<Language>;
    async fn set_language(&self, language: Language) -> Result<()>;
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    favorites: Arc<RwLock<Vec<Place>>>,
    favorite_counts: Arc<RwLock<HashMap<String, u32>>>,
    reviews: Arc<RwLock<HashMap<String, Vec<Review>>>>,
    language: Arc<RwLock<Language>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotebookRepository for MemoryStore {
    async fn list_favorites(&self) -> Result<Vec<Place>> {
        Ok(self.favorites.read().clone())
    }

    async fn is_favorite(&self, name: &str) -> Result<bool> {
        Ok(self.favorites.read().iter().any(|place| place.name == name))
    }

    async fn toggle_favorite(&self, place: &Place) -> Result<FavoriteToggle> {
        if place.name.trim().is_empty() {
            return Err(NotebookError::BlankPlaceName.into());
        }

        let mut favorites = self.favorites.write();
        let mut counts = self.favorite_counts.write();
        let count = counts.entry(place.name.clone()).or_insert(0);

        if favorites.iter().any(|saved| saved.name == place.name) {
            favorites.retain(|saved| saved.name != place.name);
            *count = count.saturating_sub(1);
            Ok(FavoriteToggle::Removed {
                favorite_count: *count,
            })
        } else {
            favorites.insert(0, place.clone());
            *count += 1;
            Ok(FavoriteToggle::Saved {
                favorite_count: *count,
            })
        }
    }

    async fn stats_for(&self, name: &str) -> Result<PlaceStats> {
        Ok(PlaceStats {
            favorite_count: self
                .favorite_counts
                .read()
                .get(name)
                .copied()
                .unwrap_or(0),
            reviews: self.reviews.read().get(name).cloned().unwrap_or_default(),
        })
    }

    async fn add_review(
        &self,
        place_name: &str,
        author: Option<&str>,
        text: &str,
    ) -> Result<Option<Review>> {
        if place_name.trim().is_empty() {
            return Err(NotebookError::BlankPlaceName.into());
        }
        if text.trim().is_empty() {
            return Ok(None);
        }

        let review = Review {
            id: Uuid::new_v4(),
            author: author
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or(ANONYMOUS_AUTHOR)
                .to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        };

        self.reviews
            .write()
            .entry(place_name.to_string())
            .or_default()
            .insert(0, review.clone());

        Ok(Some(review))
    }

    async fn reviews_for(&self, name: &str) -> Result<Vec<Review>> {
        Ok(self.reviews.read().get(name).cloned().unwrap_or_default())
    }

    async fn language(&self) -> Result<Language> {
        Ok(*self.language.read())
    }

    async fn set_language(&self, language: Language) -> Result<()> {
        *self.language.write() = language;
        Ok(())
    }
}
