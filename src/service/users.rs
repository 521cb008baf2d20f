use std::num::NonZeroU32;

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use chrono::Utc;
use ring::rand::{SecureRandom, SystemRandom};
use ring::{digest, pbkdf2};
use tracing::info;

use crate::error::{DomainError, DomainResult};
use crate::storage::models::{Role, User};
use crate::storage::Database;

const PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = digest::SHA256_OUTPUT_LEN;
const HASH_SCHEME: &str = "pbkdf2-sha256";
const MIN_PASSWORD_LEN: usize = 8;

pub struct UserService {
    db: Database,
    admin_emails: Vec<String>,
}

impl UserService {
    pub fn new(db: Database, admin_emails: Vec<String>) -> Self {
        Self { db, admin_emails }
    }

    pub fn register(&self, username: &str, email: &str, password: &str) -> DomainResult<User> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || email.is_empty() {
            return Err(DomainError::InvalidInput(
                "username and email are required".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(DomainError::InvalidInput("email is not valid".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        if self.db.email_exists(email)? || self.db.username_exists(email)? {
            return Err(DomainError::Conflict("email already exists".to_string()));
        }
        if self.db.username_exists(username)? || self.db.email_exists(username)? {
            return Err(DomainError::Conflict("username already exists".to_string()));
        }

        let role = if self
            .admin_emails
            .iter()
            .any(|e| e.eq_ignore_ascii_case(email))
        {
            Role::Admin
        } else {
            Role::User
        };

        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            role,
            created_at: now,
            updated_at: now,
        };

        self.db.put_user(&user)?;
        info!(user_id = %user.id, role = ?user.role, "Registered user");
        Ok(user)
    }

    /// Check a username-or-email and password pair.
    pub fn verify_credentials(&self, identifier: &str, password: &str) -> DomainResult<User> {
        let user = self
            .db
            .find_user_by_identifier(identifier)?
            .ok_or(DomainError::Unauthorized)?;

        if !verify_password(&user.password_hash, password) {
            return Err(DomainError::Unauthorized);
        }
        Ok(user)
    }

    pub fn get_profile(&self, user_id: &str) -> DomainResult<User> {
        self.db
            .get_user(user_id)?
            .ok_or(DomainError::NotFound("user"))
    }

    pub fn become_creator(&self, user_id: &str) -> DomainResult<User> {
        let mut user = self.get_profile(user_id)?;
        if user.role != Role::User {
            return Err(DomainError::Conflict(
                "user is already a creator or admin".to_string(),
            ));
        }

        user.role = Role::Creator;
        user.updated_at = Utc::now();
        self.db.put_user(&user)?;
        info!(user_id = %user_id, "User became a creator");
        Ok(user)
    }
}

/// `pbkdf2-sha256$<iterations>$<b64 salt>$<b64 hash>`
fn hash_password(password: &str) -> DomainResult<String> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| DomainError::Internal("failed to generate salt".to_string()))?;

    let iterations = NonZeroU32::new(PBKDF2_ITERATIONS)
        .ok_or_else(|| DomainError::Internal("invalid iteration count".to_string()))?;
    let mut hash = [0u8; HASH_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        &salt,
        password.as_bytes(),
        &mut hash,
    );

    Ok(format!(
        "{HASH_SCHEME}${}${}${}",
        iterations,
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(hash)
    ))
}

fn verify_password(stored: &str, password: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(HASH_SCHEME), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    let Some(iterations) = iterations.parse().ok().and_then(NonZeroU32::new) else {
        return false;
    };
    let (Ok(salt), Ok(hash)) = (STANDARD_NO_PAD.decode(salt), STANDARD_NO_PAD.decode(hash)) else {
        return false;
    };

    pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        &salt,
        password.as_bytes(),
        &hash,
    )
    .is_ok()
}
