//! Shared test helpers for in-crate tests.

use std::sync::Arc;

use crate::config::{Config, NodeConfig, StorageConfig};
use crate::gateway::LocalGateway;
use crate::storage::models::User;
use crate::storage::Database;
use crate::AppState;

pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Create a test AppState with a temporary database and local storage gateway.
pub fn test_state(temp_dir: &tempfile::TempDir) -> Arc<AppState> {
    let data_dir = temp_dir.path().join("data");
    let media_dir = temp_dir.path().join("media");

    let config = Config {
        node: NodeConfig {
            bind_address: "127.0.0.1:0".to_string(),
            data_dir: data_dir.to_string_lossy().to_string(),
        },
        storage: StorageConfig {
            local_storage_path: media_dir.to_string_lossy().to_string(),
            ..StorageConfig::default()
        },
        admin_emails: vec![ADMIN_EMAIL.to_string()],
        test_mode: true,
        max_request_size: 8 * 1024 * 1024,
    };

    let db = Database::open(&data_dir).expect("Failed to open test database");
    let gateway = LocalGateway::new(&media_dir, &config.storage.public_base_url)
        .expect("Failed to create test storage gateway");

    Arc::new(AppState::new(config, db, Arc::new(gateway)))
}

/// Register a user and return it. Admin emails get the admin role.
pub fn register(state: &AppState, username: &str, email: &str) -> User {
    state
        .users
        .register(username, email, "password123")
        .expect("Failed to register test user")
}

/// Register a user and promote them to creator.
pub fn creator(state: &AppState, username: &str) -> User {
    let user = register(state, username, &format!("{username}@example.com"));
    state
        .users
        .become_creator(&user.id)
        .expect("Failed to promote test creator")
}
