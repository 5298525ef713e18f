use crate::error::FavoritesError;
use crate::models::Property;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Current format: JSON array of UUIDs
const CURRENT_FILE: &str = "favorites.v1.json";
/// Older format: JSON array of id strings, migrated on open
const LEGACY_FILE: &str = "favorites.ids";

/// Set of favorited listing ids, persisted as JSON after every change
///
/// Ids are the stable listing identifiers, so a favorite made on a listing
/// without an upstream id still matches after the same listing is fetched again.
#[derive(Debug)]
pub struct FavoritesStore {
    dir: PathBuf,
    ids: BTreeSet<Uuid>,
}

impl FavoritesStore {
    /// Restore favorites kept under `dir`.
    ///
    /// A missing or unreadable current file falls back to the legacy one,
    /// which is rewritten in the current format and then removed. With
    /// neither present the store starts empty.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, FavoritesError> {
        let mut store = Self {
            dir: dir.into(),
            ids: BTreeSet::new(),
        };

        if let Some(ids) = read_current(&store.path()).await {
            store.ids = ids;
            debug!("Restored {} favorites", store.ids.len());
            return Ok(store);
        }

        let legacy = store.dir.join(LEGACY_FILE);
        if let Some(ids) = read_legacy(&legacy).await {
            store.ids = ids;
            store.save().await?;
            if let Err(e) = tokio::fs::remove_file(&legacy).await {
                warn!("Could not remove {}: {}", legacy.display(), e);
            }
            info!("Migrated {} favorites from {}", store.ids.len(), LEGACY_FILE);
        }

        Ok(store)
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CURRENT_FILE)
    }

    pub fn ids(&self) -> &BTreeSet<Uuid> {
        &self.ids
    }

    pub fn is_favorite(&self, property: &Property) -> bool {
        self.is_favorite_id(property.id)
    }

    pub fn is_favorite_id(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    /// Flip the listing's state; returns whether it is now a favorite
    pub async fn toggle(&mut self, property: &Property) -> Result<bool, FavoritesError> {
        let now_favorite = if self.ids.remove(&property.id) {
            false
        } else {
            self.ids.insert(property.id)
        };
        self.save().await?;
        Ok(now_favorite)
    }

    pub async fn add(&mut self, property: &Property) -> Result<(), FavoritesError> {
        if self.ids.insert(property.id) {
            self.save().await?;
        }
        Ok(())
    }

    pub async fn remove(&mut self, property: &Property) -> Result<(), FavoritesError> {
        if self.ids.remove(&property.id) {
            self.save().await?;
        }
        Ok(())
    }

    pub async fn remove_all(&mut self) -> Result<(), FavoritesError> {
        self.ids.clear();
        self.save().await
    }

    async fn save(&self) -> Result<(), FavoritesError> {
        let path = self.path();
        let write_err = |source: std::io::Error| FavoritesError::Write {
            path: path.clone(),
            source,
        };

        let json = serde_json::to_vec(&self.ids)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(write_err)?;

        // Replace in one step so a crash never leaves a truncated file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(write_err)?;
        Ok(())
    }
}

async fn read_current(path: &Path) -> Option<BTreeSet<Uuid>> {
    let bytes = tokio::fs::read(path).await.ok()?;
    match serde_json::from_slice::<Vec<Uuid>>(&bytes) {
        Ok(ids) => Some(ids.into_iter().collect()),
        Err(e) => {
            warn!("Ignoring unreadable favorites in {}: {}", path.display(), e);
            None
        }
    }
}

async fn read_legacy(path: &Path) -> Option<BTreeSet<Uuid>> {
    let bytes = tokio::fs::read(path).await.ok()?;
    let raw: Vec<String> = match serde_json::from_slice(&bytes) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Ignoring unreadable legacy favorites in {}: {}", path.display(), e);
            return None;
        }
    };
    Some(
        raw.iter()
            .filter_map(|s| Uuid::parse_str(s.trim()).ok())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{LocalPropertyRepository, PropertyRepository};
    use tempfile::tempdir;

    fn listing(id: Uuid) -> Property {
        Property {
            id,
            title: "コーポ高円寺 201".to_string(),
            rent: 78_000,
            layout: "1K".to_string(),
            area: "東京都杉並区高円寺南".to_string(),
            ward_or_city: "杉並区".to_string(),
            nearest_station: "高円寺駅".to_string(),
            walk_minutes: 4,
            image_glyph: None,
            latitude: None,
            longitude: None,
        }
    }

    #[tokio::test]
    async fn starts_empty_without_files() {
        let dir = tempdir().unwrap();
        let store = FavoritesStore::open(dir.path()).await.unwrap();
        assert!(store.ids().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn mutations_persist_across_reopen() {
        let dir = tempdir().unwrap();
        let a = listing(Uuid::new_v4());
        let b = listing(Uuid::new_v4());

        let mut store = FavoritesStore::open(dir.path()).await.unwrap();
        assert!(store.toggle(&a).await.unwrap());
        store.add(&b).await.unwrap();
        store.add(&b).await.unwrap();
        assert_eq!(store.ids().len(), 2);

        let mut reopened = FavoritesStore::open(dir.path()).await.unwrap();
        assert!(reopened.is_favorite(&a));
        assert!(reopened.is_favorite_id(b.id));

        assert!(!reopened.toggle(&a).await.unwrap());
        reopened.remove(&b).await.unwrap();
        let reopened = FavoritesStore::open(dir.path()).await.unwrap();
        assert!(reopened.ids().is_empty());
    }

    #[tokio::test]
    async fn remove_all_clears_saved_set() {
        let dir = tempdir().unwrap();
        let mut store = FavoritesStore::open(dir.path()).await.unwrap();
        store.add(&listing(Uuid::new_v4())).await.unwrap();
        store.remove_all().await.unwrap();

        let saved = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(saved, "[]");
    }

    #[tokio::test]
    async fn migrates_legacy_ids() {
        let dir = tempdir().unwrap();
        let kept = Uuid::new_v4();
        let legacy = dir.path().join(LEGACY_FILE);
        std::fs::write(&legacy, format!(r#"["{kept}", "not-a-uuid"]"#)).unwrap();

        let store = FavoritesStore::open(dir.path()).await.unwrap();
        assert_eq!(store.ids().iter().copied().collect::<Vec<_>>(), vec![kept]);
        assert!(!legacy.exists());

        let saved: Vec<Uuid> =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(saved, vec![kept]);
    }

    #[tokio::test]
    async fn corrupt_current_file_falls_back_to_legacy() {
        let dir = tempdir().unwrap();
        let kept = Uuid::new_v4();
        std::fs::write(dir.path().join(CURRENT_FILE), "{oops").unwrap();
        std::fs::write(dir.path().join(LEGACY_FILE), format!(r#"["{kept}"]"#)).unwrap();

        let store = FavoritesStore::open(dir.path()).await.unwrap();
        assert!(store.is_favorite_id(kept));
    }

    #[tokio::test]
    async fn current_file_wins_over_legacy() {
        let dir = tempdir().unwrap();
        let current = Uuid::new_v4();
        std::fs::write(dir.path().join(CURRENT_FILE), format!(r#"["{current}"]"#)).unwrap();
        std::fs::write(
            dir.path().join(LEGACY_FILE),
            format!(r#"["{}"]"#, Uuid::new_v4()),
        )
        .unwrap();

        let store = FavoritesStore::open(dir.path()).await.unwrap();
        assert_eq!(store.ids().len(), 1);
        assert!(store.is_favorite_id(current));
        assert!(dir.path().join(LEGACY_FILE).exists());
    }

    #[tokio::test]
    async fn favorite_survives_reload_of_listing_without_id() {
        let data = tempdir().unwrap();
        std::fs::write(
            data.path().join("properties.json"),
            r#"[{"title": "メゾン三軒茶屋 302", "rent": 98000, "layout": "1K",
                 "area": "東京都世田谷区太子堂", "wardOrCity": "世田谷区",
                 "nearestStation": "三軒茶屋駅", "walkMinutes": 5}]"#,
        )
        .unwrap();
        let repo = LocalPropertyRepository::new(data.path(), "properties");
        let favorites_dir = tempdir().unwrap();

        let first = repo.fetch_properties().await.unwrap();
        let mut store = FavoritesStore::open(favorites_dir.path()).await.unwrap();
        store.toggle(&first[0]).await.unwrap();
        drop(store);

        let second = repo.fetch_properties().await.unwrap();
        let store = FavoritesStore::open(favorites_dir.path()).await.unwrap();
        assert!(store.is_favorite(&second[0]));
    }
}
