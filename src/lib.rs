//! comic-manager - Content backend for a multilingual webcomic platform
//!
//! This crate provides:
//! - Comic lifecycle with an admin approval workflow (draft → review → published)
//! - Draft-to-public promotion of uploaded media on approval
//! - Validated image uploads into a server-chosen storage bucket
//! - Reader libraries and shareable folders
//! - redb embedded database for records (ACID, MVCC, crash-safe)
//! - REST API with JSend envelopes and multipart upload support

pub mod api;
pub mod assets;
pub mod config;
pub mod error;
pub mod gateway;
pub mod service;
pub mod state_machine;
pub mod storage;
#[cfg(test)]
pub mod testutil;

use std::sync::Arc;

use config::Config;
use gateway::StorageGateway;
use service::{ComicService, LibraryService, UploadGatekeeper, UserService};
use storage::Database;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub storage: Arc<dyn StorageGateway>,
    pub comics: ComicService,
    pub library: LibraryService,
    pub uploads: UploadGatekeeper,
    pub users: UserService,
}

impl AppState {
    /// Wire every service to the same database and storage gateway.
    pub fn new(config: Config, db: Database, storage: Arc<dyn StorageGateway>) -> Self {
        Self {
            comics: ComicService::new(db.clone(), Arc::clone(&storage)),
            library: LibraryService::new(db.clone()),
            uploads: UploadGatekeeper::new(Arc::clone(&storage)),
            users: UserService::new(db.clone(), config.admin_emails.clone()),
            config,
            db,
            storage,
        }
    }
}
