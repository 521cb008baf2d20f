//! Shared fixtures for the service-level integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use comic_manager::gateway::{public_url, StorageError, StorageGateway};
use comic_manager::service::{ComicService, LibraryService, UploadGatekeeper, UserService};
use comic_manager::storage::models::User;
use comic_manager::storage::Database;

pub const BASE_URL: &str = "https://proj.supabase.co";
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// In-memory gateway that records every call and can fail a chosen move.
#[derive(Default)]
pub struct RecordingGateway {
    objects: Mutex<HashMap<String, Bytes>>,
    uploads: Mutex<Vec<String>>,
    moves: Mutex<Vec<(String, String)>>,
    fail_move_from: Mutex<Option<String>>,
}

impl RecordingGateway {
    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn moves(&self) -> Vec<(String, String)> {
        self.moves.lock().unwrap().clone()
    }

    pub fn move_count(&self) -> usize {
        self.moves.lock().unwrap().len()
    }

    pub fn has_object(&self, path: &str) -> bool {
        self.objects.lock().unwrap().contains_key(path)
    }

    /// Make the next moves of `src` fail with a backend error.
    pub fn fail_move_from(&self, src: &str) {
        *self.fail_move_from.lock().unwrap() = Some(src.to_string());
    }

    pub fn clear_failure(&self) {
        *self.fail_move_from.lock().unwrap() = None;
    }

    /// Place an object directly, bypassing the upload counter.
    pub fn seed(&self, path: &str) -> String {
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), Bytes::from_static(b"img"));
        public_url(BASE_URL, "media", path)
    }
}

#[async_trait]
impl StorageGateway for RecordingGateway {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        self.uploads.lock().unwrap().push(path.to_string());
        self.objects.lock().unwrap().insert(path.to_string(), data);
        Ok(public_url(BASE_URL, bucket, path))
    }

    async fn move_object(&self, _bucket: &str, src: &str, dest: &str) -> Result<(), StorageError> {
        if self.fail_move_from.lock().unwrap().as_deref() == Some(src) {
            return Err(StorageError::Backend(format!("move of {src} refused")));
        }

        let mut objects = self.objects.lock().unwrap();
        let data = objects
            .remove(src)
            .ok_or_else(|| StorageError::NotFound(src.to_string()))?;
        objects.insert(dest.to_string(), data);
        self.moves
            .lock()
            .unwrap()
            .push((src.to_string(), dest.to_string()));
        Ok(())
    }

    async fn get(&self, _bucket: &str, path: &str) -> Result<Bytes, StorageError> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }
}

pub struct Harness {
    pub _dir: tempfile::TempDir,
    pub db: Database,
    pub gateway: Arc<RecordingGateway>,
    pub comics: ComicService,
    pub library: LibraryService,
    pub uploads: UploadGatekeeper,
    pub users: UserService,
}

impl Harness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("data")).unwrap();
        let gateway = Arc::new(RecordingGateway::default());
        let storage: Arc<dyn StorageGateway> = gateway.clone();

        Harness {
            comics: ComicService::new(db.clone(), Arc::clone(&storage)),
            library: LibraryService::new(db.clone()),
            uploads: UploadGatekeeper::new(storage),
            users: UserService::new(db.clone(), vec![ADMIN_EMAIL.to_string()]),
            gateway,
            db,
            _dir: dir,
        }
    }

    pub fn user(&self, username: &str) -> User {
        self.users
            .register(username, &format!("{username}@example.com"), "password123")
            .unwrap()
    }
}
