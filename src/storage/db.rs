use redb::{
    Database as RedbDatabase, ReadTransaction, ReadableTable, TableDefinition, WriteTransaction,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::tables::*;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Commit error: {0}")]
    Commit(Box<redb::CommitError>),
    #[error("Database error: {0}")]
    Redb(Box<redb::Error>),
    #[error("Database error: {0}")]
    RedbDatabase(Box<redb::DatabaseError>),
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),
    #[error("Storage error: {0}")]
    Storage(Box<redb::StorageError>),
    #[error("Table error: {0}")]
    Table(Box<redb::TableError>),
    #[error("Transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),
}

impl From<redb::CommitError> for DatabaseError {
    fn from(e: redb::CommitError) -> Self {
        DatabaseError::Commit(Box::new(e))
    }
}

impl From<redb::DatabaseError> for DatabaseError {
    fn from(e: redb::DatabaseError) -> Self {
        DatabaseError::RedbDatabase(Box::new(e))
    }
}

impl From<redb::Error> for DatabaseError {
    fn from(e: redb::Error) -> Self {
        DatabaseError::Redb(Box::new(e))
    }
}

impl From<redb::StorageError> for DatabaseError {
    fn from(e: redb::StorageError) -> Self {
        DatabaseError::Storage(Box::new(e))
    }
}

impl From<redb::TableError> for DatabaseError {
    fn from(e: redb::TableError) -> Self {
        DatabaseError::Table(Box::new(e))
    }
}

impl From<redb::TransactionError> for DatabaseError {
    fn from(e: redb::TransactionError) -> Self {
        DatabaseError::Transaction(Box::new(e))
    }
}

/// Secondary index table: key -> msgpack Vec of record UUIDs
pub(super) type IndexTable = TableDefinition<'static, &'static str, &'static [u8]>;

pub struct Database {
    db: Arc<RedbDatabase>,
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}

/// Statistics from a purge operation
#[derive(Debug, Default)]
pub struct PurgeStats {
    pub comics: u64,
    pub chapters: u64,
    pub folders: u64,
    pub tags: u64,
    pub users: u64,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(data_dir.as_ref())?;
        let db_path = data_dir.as_ref().join("comic-manager.redb");
        let db = Arc::new(RedbDatabase::create(db_path)?);

        // Initialize application tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(COMICS)?;
            let _ = write_txn.open_table(CREATOR_COMICS)?;
            let _ = write_txn.open_table(CHAPTERS)?;
            let _ = write_txn.open_table(COMIC_CHAPTERS)?;
            let _ = write_txn.open_table(TAGS)?;
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERNAMES)?;
            let _ = write_txn.open_table(EMAILS)?;
            let _ = write_txn.open_table(FOLDERS)?;
            let _ = write_txn.open_table(USER_FOLDERS)?;
            let _ = write_txn.open_table(FOLDER_SLUGS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Begin a read transaction
    pub fn begin_read(&self) -> Result<ReadTransaction, DatabaseError> {
        Ok(self.db.begin_read()?)
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> Result<WriteTransaction, DatabaseError> {
        Ok(self.db.begin_write()?)
    }

    // ========================================================================
    // Admin operations
    // ========================================================================

    /// Purge all data - for testing only
    pub fn purge_all(&self) -> Result<PurgeStats, DatabaseError> {
        let write_txn = self.begin_write()?;
        let stats = PurgeStats {
            comics: clear_table(&write_txn, COMICS)?,
            chapters: clear_table(&write_txn, CHAPTERS)?,
            folders: clear_table(&write_txn, FOLDERS)?,
            tags: clear_table(&write_txn, TAGS)?,
            users: clear_table(&write_txn, USERS)?,
        };

        clear_table(&write_txn, CREATOR_COMICS)?;
        clear_table(&write_txn, COMIC_CHAPTERS)?;
        clear_table(&write_txn, USERNAMES)?;
        clear_table(&write_txn, EMAILS)?;
        clear_table(&write_txn, USER_FOLDERS)?;
        clear_table(&write_txn, FOLDER_SLUGS)?;

        write_txn.commit()?;
        Ok(stats)
    }
}

/// Remove every row of a string-keyed table, returning how many were removed.
fn clear_table<V: redb::Value + 'static>(
    txn: &WriteTransaction,
    definition: TableDefinition<'static, &'static str, V>,
) -> Result<u64, DatabaseError> {
    let keys: Vec<String> = {
        let table = txn.open_table(definition)?;
        let keys = table
            .iter()?
            .map(|r| r.map(|(k, _)| k.value().to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        keys
    };

    let mut table = txn.open_table(definition)?;
    for key in &keys {
        table.remove(key.as_str())?;
    }
    Ok(keys.len() as u64)
}

// ============================================================================
// Secondary index helpers
// ============================================================================

/// Read the id list stored under `key` in an index table.
pub(super) fn index_ids(
    txn: &WriteTransaction,
    definition: IndexTable,
    key: &str,
) -> Result<Vec<String>, DatabaseError> {
    let table = txn.open_table(definition)?;
    let ids = match table.get(key)? {
        Some(data) => rmp_serde::from_slice(data.value())?,
        None => Vec::new(),
    };
    Ok(ids)
}

/// Append `id` to the list under `key` unless it is already present.
pub(super) fn index_insert(
    txn: &WriteTransaction,
    definition: IndexTable,
    key: &str,
    id: &str,
) -> Result<(), DatabaseError> {
    let mut ids = index_ids(txn, definition, key)?;
    if ids.iter().any(|existing| existing == id) {
        return Ok(());
    }
    ids.push(id.to_string());

    let data = rmp_serde::to_vec_named(&ids)?;
    let mut table = txn.open_table(definition)?;
    table.insert(key, data.as_slice())?;
    Ok(())
}

/// Remove `id` from the list under `key`, dropping the entry once empty.
pub(super) fn index_remove(
    txn: &WriteTransaction,
    definition: IndexTable,
    key: &str,
    id: &str,
) -> Result<(), DatabaseError> {
    let mut ids = index_ids(txn, definition, key)?;
    ids.retain(|existing| existing != id);

    let mut table = txn.open_table(definition)?;
    if ids.is_empty() {
        table.remove(key)?;
    } else {
        let data = rmp_serde::to_vec_named(&ids)?;
        table.insert(key, data.as_slice())?;
    }
    Ok(())
}

/// Read-side counterpart of [`index_ids`].
pub(super) fn read_index_ids(
    txn: &ReadTransaction,
    definition: IndexTable,
    key: &str,
) -> Result<Vec<String>, DatabaseError> {
    let table = txn.open_table(definition)?;
    let ids = match table.get(key)? {
        Some(data) => rmp_serde::from_slice(data.value())?,
        None => Vec::new(),
    };
    Ok(ids)
}
