use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Moderation status of a comic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComicStatus {
    #[default]
    Draft,
    PendingReview,
    Published,
    Rejected,
}

impl ComicStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComicStatus::Draft => "draft",
            ComicStatus::PendingReview => "pending_review",
            ComicStatus::Published => "published",
            ComicStatus::Rejected => "rejected",
        }
    }
}

/// Publication state of the story itself, independent of moderation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationStatus {
    #[default]
    Ongoing,
    Hiatus,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Unlisted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterStatus {
    #[default]
    Draft,
    Published,
    Scheduled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Creator,
    Admin,
}

/// Per-language comic text. At most one per language code per comic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComicTranslation {
    pub language: String,
    pub title: String,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub alt_title: Option<String>,
}

/// A comic record stored in redb. Chapters live in their own table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comic {
    pub id: String,
    pub creator_id: String,
    pub author: String,
    pub status: ComicStatus,
    pub serialization_status: SerializationStatus,
    pub visibility: Visibility,
    pub nsfw: bool,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub banner_image_url: Option<String>,
    #[serde(default)]
    pub schedule_publish_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    pub translations: Vec<ComicTranslation>,
    /// Tag slugs
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comic {
    pub fn translation(&self, language: &str) -> Option<&ComicTranslation> {
        self.translations.iter().find(|t| t.language == language)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterImage {
    pub url: String,
    /// 1-based position within the chapter
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterTranslation {
    pub language: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub comic_id: String,
    pub chapter_number: u32,
    pub status: ChapterStatus,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub images: Vec<ChapterImage>,
    pub translations: Vec<ChapterTranslation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagTranslation {
    pub language: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub tag_type: String,
    pub translations: Vec<TagTranslation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryFolderItem {
    pub comic_id: String,
    pub order: u32,
    pub added_at: DateTime<Utc>,
}

/// A user-owned, ordered collection of comics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryFolder {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_public: bool,
    /// The folder backing the user's plain "library"
    pub is_default: bool,
    pub slug: String,
    pub items: Vec<LibraryFolderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LibraryFolder {
    pub fn contains(&self, comic_id: &str) -> bool {
        self.items.iter().any(|i| i.comic_id == comic_id)
    }
}
