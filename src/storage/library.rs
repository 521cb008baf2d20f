use redb::ReadableTable;

use super::db::{index_insert, index_remove, read_index_ids, Database, DatabaseError};
use super::models::LibraryFolder;
use super::tables::*;

impl Database {
    // ========================================================================
    // Library folder operations
    // ========================================================================

    /// Store a folder record and update the owner and slug indexes
    pub fn put_folder(&self, folder: &LibraryFolder) -> Result<(), DatabaseError> {
        debug_assert!(!folder.id.is_empty(), "folder id must not be empty");
        debug_assert!(!folder.slug.is_empty(), "folder slug must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(FOLDERS)?;
            let data = rmp_serde::to_vec_named(folder)?;
            table.insert(folder.id.as_str(), data.as_slice())?;

            let mut slug_table = write_txn.open_table(FOLDER_SLUGS)?;
            slug_table.insert(folder.slug.as_str(), folder.id.as_str())?;
        }
        index_insert(&write_txn, USER_FOLDERS, &folder.user_id, &folder.id)?;
        write_txn.commit()?;
        Ok(())
    }

    pub fn get_folder(&self, id: &str) -> Result<Option<LibraryFolder>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(FOLDERS)?;

        match table.get(id)? {
            Some(data) => {
                let folder: LibraryFolder = rmp_serde::from_slice(data.value())?;
                Ok(Some(folder))
            }
            None => Ok(None),
        }
    }

    /// Get a folder by its share slug (resolves slug -> uuid -> folder)
    pub fn get_folder_by_slug(&self, slug: &str) -> Result<Option<LibraryFolder>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let slug_table = read_txn.open_table(FOLDER_SLUGS)?;

        let id = match slug_table.get(slug)? {
            Some(data) => data.value().to_string(),
            None => return Ok(None),
        };

        let folders = read_txn.open_table(FOLDERS)?;
        match folders.get(id.as_str())? {
            Some(data) => {
                let folder: LibraryFolder = rmp_serde::from_slice(data.value())?;
                Ok(Some(folder))
            }
            None => Ok(None),
        }
    }

    /// All folders owned by a user, oldest first
    pub fn get_user_folders(&self, user_id: &str) -> Result<Vec<LibraryFolder>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let folder_ids = read_index_ids(&read_txn, USER_FOLDERS, user_id)?;
        let table = read_txn.open_table(FOLDERS)?;

        let mut folders = Vec::new();
        for folder_id in folder_ids {
            if let Some(data) = table.get(folder_id.as_str())? {
                let folder: LibraryFolder = rmp_serde::from_slice(data.value())?;
                folders.push(folder);
            }
        }

        folders.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(folders)
    }

    /// Delete a folder and clean up the owner and slug indexes
    pub fn delete_folder(&self, id: &str) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;

        let folder: Option<LibraryFolder> = {
            let table = write_txn.open_table(FOLDERS)?;
            let result = match table.get(id)? {
                Some(data) => Some(rmp_serde::from_slice(data.value())?),
                None => None,
            };
            result
        };

        let deleted = match folder {
            Some(folder) => {
                {
                    let mut table = write_txn.open_table(FOLDERS)?;
                    table.remove(id)?;
                }
                {
                    let mut slug_table = write_txn.open_table(FOLDER_SLUGS)?;
                    slug_table.remove(folder.slug.as_str())?;
                }
                index_remove(&write_txn, USER_FOLDERS, &folder.user_id, id)?;
                true
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(deleted)
    }
}
