use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use super::comics::visible_to;
use super::slugify;
use crate::error::{DomainError, DomainResult};
use crate::storage::models::{Comic, LibraryFolder, LibraryFolderItem, User};
use crate::storage::Database;

const DEFAULT_FOLDER_NAME: &str = "My Library";

/// A folder item with its comic resolved.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryEntry {
    pub comic: Comic,
    pub order: u32,
    pub added_at: chrono::DateTime<Utc>,
}

/// Personal libraries and curated folders.
///
/// A user's plain library is their default folder, created on first use.
/// Only the owner may change a folder; public folders can be read by anyone.
/// Unpublished comics are filtered by the same rule as direct comic reads:
/// they can only be added, or listed, by their creator or an admin.
pub struct LibraryService {
    db: Database,
}

impl LibraryService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn add_to_library(&self, user_id: &str, comic_id: &str) -> DomainResult<()> {
        self.require_visible_comic(user_id, comic_id)?;
        let mut folder = self.default_folder(user_id)?;
        if folder.contains(comic_id) {
            return Err(DomainError::Conflict("comic already in library".to_string()));
        }

        push_item(&mut folder, comic_id);
        self.db.put_folder(&folder)?;
        debug!(user_id = %user_id, comic_id = %comic_id, "Added comic to library");
        Ok(())
    }

    /// Removing a comic that is not in the library is a no-op.
    pub fn remove_from_library(&self, user_id: &str, comic_id: &str) -> DomainResult<()> {
        let Some(mut folder) = self.find_default_folder(user_id)? else {
            return Ok(());
        };
        if remove_item(&mut folder, comic_id) {
            self.db.put_folder(&folder)?;
        }
        Ok(())
    }

    pub fn get_library(&self, user_id: &str) -> DomainResult<Vec<LibraryEntry>> {
        let Some(folder) = self.find_default_folder(user_id)? else {
            return Ok(Vec::new());
        };
        let viewer = self.db.get_user(user_id)?;
        self.resolve_items(&folder, viewer.as_ref())
    }

    pub fn create_folder(
        &self,
        user_id: &str,
        name: &str,
        description: Option<String>,
        is_public: bool,
    ) -> DomainResult<LibraryFolder> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidInput(
                "folder name must not be empty".to_string(),
            ));
        }

        let folder = new_folder(user_id, name, description, is_public, false);
        self.db.put_folder(&folder)?;
        debug!(user_id = %user_id, folder_id = %folder.id, "Created folder");
        Ok(folder)
    }

    pub fn get_user_folders(&self, user_id: &str) -> DomainResult<Vec<LibraryFolder>> {
        Ok(self.db.get_user_folders(user_id)?)
    }

    /// A folder the requester owns, or any public folder.
    pub fn get_folder(&self, user_id: &str, folder_id: &str) -> DomainResult<LibraryFolder> {
        let folder = self
            .db
            .get_folder(folder_id)?
            .ok_or(DomainError::NotFound("folder"))?;
        if folder.user_id != user_id && !folder.is_public {
            return Err(DomainError::Forbidden);
        }
        Ok(folder)
    }

    /// Resolve a share link. Private folders look absent.
    pub fn get_public_folder(&self, slug: &str) -> DomainResult<LibraryFolder> {
        self.db
            .get_folder_by_slug(slug)?
            .filter(|f| f.is_public)
            .ok_or(DomainError::NotFound("folder"))
    }

    pub fn add_to_folder(&self, user_id: &str, folder_id: &str, comic_id: &str) -> DomainResult<()> {
        let mut folder = self.owned_folder(user_id, folder_id)?;
        self.require_visible_comic(user_id, comic_id)?;
        if folder.contains(comic_id) {
            return Err(DomainError::Conflict("comic already in folder".to_string()));
        }

        push_item(&mut folder, comic_id);
        self.db.put_folder(&folder)?;
        Ok(())
    }

    pub fn remove_from_folder(
        &self,
        user_id: &str,
        folder_id: &str,
        comic_id: &str,
    ) -> DomainResult<()> {
        let mut folder = self.owned_folder(user_id, folder_id)?;
        if remove_item(&mut folder, comic_id) {
            self.db.put_folder(&folder)?;
        }
        Ok(())
    }

    pub fn delete_folder(&self, user_id: &str, folder_id: &str) -> DomainResult<()> {
        let folder = self.owned_folder(user_id, folder_id)?;
        if folder.is_default {
            return Err(DomainError::Forbidden);
        }
        self.db.delete_folder(folder_id)?;
        debug!(user_id = %user_id, folder_id = %folder_id, "Deleted folder");
        Ok(())
    }

    /// Items of a folder with their comics, as seen by `viewer`.
    ///
    /// Comics deleted since are skipped, as are comics the viewer may not see
    /// (for example one that was rejected after being added).
    pub fn resolve_items(
        &self,
        folder: &LibraryFolder,
        viewer: Option<&User>,
    ) -> DomainResult<Vec<LibraryEntry>> {
        let mut entries = Vec::with_capacity(folder.items.len());
        for item in &folder.items {
            let Some(comic) = self.db.get_comic(&item.comic_id)? else {
                continue;
            };
            if visible_to(&comic, viewer) {
                entries.push(LibraryEntry {
                    comic,
                    order: item.order,
                    added_at: item.added_at,
                });
            }
        }
        Ok(entries)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn owned_folder(&self, user_id: &str, folder_id: &str) -> DomainResult<LibraryFolder> {
        let folder = self
            .db
            .get_folder(folder_id)?
            .ok_or(DomainError::NotFound("folder"))?;
        if folder.user_id != user_id {
            return Err(DomainError::Forbidden);
        }
        Ok(folder)
    }

    /// Comics the requester may not see look absent.
    fn require_visible_comic(&self, user_id: &str, comic_id: &str) -> DomainResult<()> {
        let viewer = self.db.get_user(user_id)?;
        self.db
            .get_comic(comic_id)?
            .filter(|c| visible_to(c, viewer.as_ref()))
            .map(|_| ())
            .ok_or(DomainError::NotFound("comic"))
    }

    fn find_default_folder(&self, user_id: &str) -> DomainResult<Option<LibraryFolder>> {
        Ok(self
            .db
            .get_user_folders(user_id)?
            .into_iter()
            .find(|f| f.is_default))
    }

    fn default_folder(&self, user_id: &str) -> DomainResult<LibraryFolder> {
        if let Some(folder) = self.find_default_folder(user_id)? {
            return Ok(folder);
        }
        let folder = new_folder(user_id, DEFAULT_FOLDER_NAME, None, false, true);
        self.db.put_folder(&folder)?;
        Ok(folder)
    }
}

fn new_folder(
    user_id: &str,
    name: &str,
    description: Option<String>,
    is_public: bool,
    is_default: bool,
) -> LibraryFolder {
    let id = uuid::Uuid::new_v4().to_string();
    let base = match slugify(name) {
        s if s.is_empty() => "folder".to_string(),
        s => s,
    };
    let now = Utc::now();

    LibraryFolder {
        slug: format!("{base}-{}", &id[..8]),
        id,
        user_id: user_id.to_string(),
        name: name.to_string(),
        description,
        is_public,
        is_default,
        items: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

fn push_item(folder: &mut LibraryFolder, comic_id: &str) {
    let now = Utc::now();
    folder.items.push(LibraryFolderItem {
        comic_id: comic_id.to_string(),
        order: folder.items.len() as u32,
        added_at: now,
    });
    folder.updated_at = now;
}

/// Remove a comic and close the gap in the ordering. Returns whether anything changed.
fn remove_item(folder: &mut LibraryFolder, comic_id: &str) -> bool {
    let before = folder.items.len();
    folder.items.retain(|i| i.comic_id != comic_id);
    if folder.items.len() == before {
        return false;
    }

    for (order, item) in folder.items.iter_mut().enumerate() {
        item.order = order as u32;
    }
    folder.updated_at = Utc::now();
    true
}
