use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::User;
use super::tables::*;

impl Database {
    // ========================================================================
    // User operations
    // ========================================================================

    /// Store a user record and update the username and email indexes
    pub fn put_user(&self, user: &User) -> Result<(), DatabaseError> {
        debug_assert!(!user.id.is_empty(), "user id must not be empty");

        let write_txn = self.begin_write()?;
        {
            // Drop index entries for a previous username/email of this user
            let previous: Option<User> = {
                let table = write_txn.open_table(USERS)?;
                let result = match table.get(user.id.as_str())? {
                    Some(data) => Some(rmp_serde::from_slice(data.value())?),
                    None => None,
                };
                result
            };
            if let Some(previous) = previous {
                let mut usernames = write_txn.open_table(USERNAMES)?;
                usernames.remove(index_key(&previous.username).as_str())?;
                let mut emails = write_txn.open_table(EMAILS)?;
                emails.remove(index_key(&previous.email).as_str())?;
            }

            let mut table = write_txn.open_table(USERS)?;
            let data = rmp_serde::to_vec_named(user)?;
            table.insert(user.id.as_str(), data.as_slice())?;

            let mut usernames = write_txn.open_table(USERNAMES)?;
            usernames.insert(index_key(&user.username).as_str(), user.id.as_str())?;

            let mut emails = write_txn.open_table(EMAILS)?;
            emails.insert(index_key(&user.email).as_str(), user.id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a user by UUID
    pub fn get_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(USERS)?;

        match table.get(id)? {
            Some(data) => {
                let user: User = rmp_serde::from_slice(data.value())?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Resolve a username or email address to a user
    pub fn find_user_by_identifier(&self, identifier: &str) -> Result<Option<User>, DatabaseError> {
        let key = index_key(identifier);
        let read_txn = self.begin_read()?;

        let id = {
            let usernames = read_txn.open_table(USERNAMES)?;
            let emails = read_txn.open_table(EMAILS)?;
            let by_username = usernames.get(key.as_str())?.map(|v| v.value().to_string());
            let id = match by_username {
                Some(id) => Some(id),
                None => emails.get(key.as_str())?.map(|v| v.value().to_string()),
            };
            id
        };

        let Some(id) = id else {
            return Ok(None);
        };

        let table = read_txn.open_table(USERS)?;
        match table.get(id.as_str())? {
            Some(data) => {
                let user: User = rmp_serde::from_slice(data.value())?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    pub fn username_exists(&self, username: &str) -> Result<bool, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(USERNAMES)?;
        Ok(table.get(index_key(username).as_str())?.is_some())
    }

    pub fn email_exists(&self, email: &str) -> Result<bool, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(EMAILS)?;
        Ok(table.get(index_key(email).as_str())?.is_some())
    }
}

/// Usernames and emails are unique case-insensitively.
fn index_key(value: &str) -> String {
    value.trim().to_lowercase()
}
