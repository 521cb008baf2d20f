//! Comic lifecycle: ownership checks, moderation transitions and the
//! draft-to-public asset promotion run on approval.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::slugify;
use crate::assets::{PromotionPlan, MEDIA_BUCKET};
use crate::error::{DomainError, DomainResult};
use crate::gateway::StorageGateway;
use crate::state_machine::Transition;
use crate::storage::models::{
    Chapter, ChapterImage, ChapterStatus, ChapterTranslation, Comic, ComicStatus,
    ComicTranslation, Role, SerializationStatus, Tag, TagTranslation, User, Visibility,
};
use crate::storage::Database;

const DEFAULT_TAG_TYPE: &str = "genre";

/// Published comics are visible to everyone. Any other status is visible
/// only to the comic's creator and to admins.
pub fn visible_to(comic: &Comic, viewer: Option<&User>) -> bool {
    comic.status == ComicStatus::Published
        || viewer.is_some_and(|u| u.id == comic.creator_id || u.role == Role::Admin)
}

// ============================================================================
// Inputs
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagInput {
    /// Names per language; the first one provides the slug.
    pub translations: Vec<TagTranslation>,
    #[serde(default, rename = "type")]
    pub tag_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateComicInput {
    pub author: String,
    pub translations: Vec<ComicTranslation>,
    pub tags: Vec<TagInput>,
    pub cover_image_url: Option<String>,
    pub banner_image_url: Option<String>,
    pub serialization_status: Option<SerializationStatus>,
    pub visibility: Option<Visibility>,
    pub nsfw: bool,
    pub schedule_publish_at: Option<DateTime<Utc>>,
}

/// Replacement values for an update.
///
/// Every scalar field overwrites the stored one; an omitted field resets it
/// to its default. Translations are merged by language code instead.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateComicInput {
    pub author: String,
    pub translations: Vec<ComicTranslation>,
    pub cover_image_url: Option<String>,
    pub banner_image_url: Option<String>,
    pub serialization_status: SerializationStatus,
    pub visibility: Visibility,
    pub nsfw: bool,
    pub schedule_publish_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateChapterInput {
    pub chapter_number: u32,
    pub translations: Vec<ChapterTranslation>,
    pub image_urls: Vec<String>,
}

/// A comic together with its chapters, ordered by chapter number.
#[derive(Debug, Clone)]
pub struct ComicDetail {
    pub comic: Comic,
    pub chapters: Vec<Chapter>,
}

// ============================================================================
// Service
// ============================================================================

pub struct ComicService {
    db: Database,
    storage: Arc<dyn StorageGateway>,
}

impl ComicService {
    pub fn new(db: Database, storage: Arc<dyn StorageGateway>) -> Self {
        Self { db, storage }
    }

    pub fn create_comic(&self, creator_id: &str, input: CreateComicInput) -> DomainResult<Comic> {
        validate_translations(&input.translations)?;
        let tags = self.materialize_tags(&input.tags)?;

        let now = Utc::now();
        let comic = Comic {
            id: uuid::Uuid::new_v4().to_string(),
            creator_id: creator_id.to_string(),
            author: input.author,
            status: ComicStatus::Draft,
            serialization_status: input.serialization_status.unwrap_or_default(),
            visibility: input.visibility.unwrap_or_default(),
            nsfw: input.nsfw,
            cover_image_url: input.cover_image_url,
            banner_image_url: input.banner_image_url,
            schedule_publish_at: input.schedule_publish_at,
            approved_at: None,
            rejection_reason: None,
            translations: input.translations,
            tags,
            created_at: now,
            updated_at: now,
        };

        self.db.put_comic(&comic)?;
        debug!(comic_id = %comic.id, creator_id = %creator_id, "Created comic");

        self.promote_to_creator(creator_id);
        Ok(comic)
    }

    pub fn update_comic(
        &self,
        comic_id: &str,
        requester_id: &str,
        input: UpdateComicInput,
    ) -> DomainResult<Comic> {
        let mut comic = self.owned_comic(comic_id, requester_id)?;
        validate_translations(&input.translations)?;

        for translation in input.translations {
            match comic
                .translations
                .iter_mut()
                .find(|t| t.language == translation.language)
            {
                Some(existing) => *existing = translation,
                None => comic.translations.push(translation),
            }
        }

        comic.author = input.author;
        comic.cover_image_url = input.cover_image_url;
        comic.banner_image_url = input.banner_image_url;
        comic.serialization_status = input.serialization_status;
        comic.visibility = input.visibility;
        comic.nsfw = input.nsfw;
        comic.schedule_publish_at = input.schedule_publish_at;
        comic.updated_at = Utc::now();

        self.db.put_comic(&comic)?;
        debug!(comic_id = %comic_id, "Updated comic");
        Ok(comic)
    }

    pub fn delete_comic(&self, comic_id: &str, requester_id: &str) -> DomainResult<()> {
        self.owned_comic(comic_id, requester_id)?;
        self.db.delete_comic(comic_id)?;
        debug!(comic_id = %comic_id, "Deleted comic");
        Ok(())
    }

    /// Submit a draft or rejected comic for admin review.
    pub fn request_publish(&self, comic_id: &str, requester_id: &str) -> DomainResult<Comic> {
        let mut comic = self.owned_comic(comic_id, requester_id)?;
        comic.status = comic.status.apply(Transition::RequestPublish)?;
        comic.updated_at = Utc::now();

        self.db.put_comic(&comic)?;
        info!(comic_id = %comic_id, "Comic submitted for review");
        Ok(comic)
    }

    /// Publish a comic, moving every draft asset to the public tier first.
    ///
    /// The caller must have verified the admin role. Moves are not rolled
    /// back: if one fails, earlier moves stay done and nothing is persisted.
    /// A retry skips URLs that no longer point at the draft tier. A draft
    /// referenced from several slots is moved once and rewritten everywhere.
    pub async fn approve_comic(&self, comic_id: &str) -> DomainResult<ComicDetail> {
        let mut comic = self
            .db
            .get_comic(comic_id)?
            .ok_or(DomainError::NotFound("comic"))?;
        let mut chapters = self.db.get_chapters_for_comic(comic_id)?;

        let mut moved = HashSet::new();
        if let Some(url) = comic.cover_image_url.as_mut() {
            self.promote_asset(url, &mut moved).await?;
        }
        if let Some(url) = comic.banner_image_url.as_mut() {
            self.promote_asset(url, &mut moved).await?;
        }
        for chapter in chapters.iter_mut() {
            for image in chapter.images.iter_mut() {
                self.promote_asset(&mut image.url, &mut moved).await?;
            }
        }

        let now = Utc::now();
        comic.status = comic.status.apply(Transition::Approve)?;
        comic.visibility = Visibility::Public;
        comic.approved_at = Some(now);
        comic.updated_at = now;

        self.db.save_comic_with_chapters(&comic, &chapters)?;
        info!(comic_id = %comic_id, assets_moved = moved.len(), "Comic approved");
        Ok(ComicDetail { comic, chapters })
    }

    /// Mark a comic rejected with a reason. The caller must have verified the
    /// admin role; any prior status is accepted.
    pub fn reject_comic(&self, comic_id: &str, reason: &str) -> DomainResult<Comic> {
        let mut comic = self
            .db
            .get_comic(comic_id)?
            .ok_or(DomainError::NotFound("comic"))?;

        if comic.status == ComicStatus::Published {
            warn!(comic_id = %comic_id, "Rejecting an already published comic");
        }

        comic.status = comic.status.apply(Transition::Reject)?;
        comic.rejection_reason = Some(reason.to_string());
        comic.updated_at = Utc::now();

        self.db.put_comic(&comic)?;
        info!(comic_id = %comic_id, reason = %reason, "Comic rejected");
        Ok(comic)
    }

    pub fn create_chapter(
        &self,
        comic_id: &str,
        requester_id: &str,
        input: CreateChapterInput,
    ) -> DomainResult<Chapter> {
        let comic = self.owned_comic(comic_id, requester_id)?;

        if !input
            .translations
            .iter()
            .any(|t| !t.title.trim().is_empty())
        {
            return Err(DomainError::InvalidInput(
                "at least one translation with a title is required".to_string(),
            ));
        }
        if input.chapter_number == 0 {
            return Err(DomainError::InvalidInput(
                "chapter_number must be greater than 0".to_string(),
            ));
        }
        if input.image_urls.is_empty() {
            return Err(DomainError::InvalidInput(
                "at least one image is required".to_string(),
            ));
        }
        if input.image_urls.iter().any(|u| u.trim().is_empty()) {
            return Err(DomainError::InvalidInput(
                "image urls must not be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let chapter = Chapter {
            id: uuid::Uuid::new_v4().to_string(),
            comic_id: comic.id,
            chapter_number: input.chapter_number,
            status: ChapterStatus::Published,
            published_at: Some(now),
            images: input
                .image_urls
                .into_iter()
                .zip(1u32..)
                .map(|(url, order)| ChapterImage { url, order })
                .collect(),
            translations: input.translations,
            created_at: now,
            updated_at: now,
        };

        self.db.put_chapter(&chapter)?;
        debug!(comic_id = %comic_id, chapter_id = %chapter.id, "Created chapter");
        Ok(chapter)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn get_comic(&self, comic_id: &str) -> DomainResult<ComicDetail> {
        let comic = self
            .db
            .get_comic(comic_id)?
            .ok_or(DomainError::NotFound("comic"))?;
        let chapters = self.db.get_chapters_for_comic(comic_id)?;
        Ok(ComicDetail { comic, chapters })
    }

    pub fn get_chapter(&self, chapter_id: &str) -> DomainResult<Chapter> {
        self.db
            .get_chapter(chapter_id)?
            .ok_or(DomainError::NotFound("chapter"))
    }

    pub fn get_tags(&self, slugs: &[String]) -> DomainResult<Vec<Tag>> {
        Ok(self.db.get_tags(slugs)?)
    }

    /// Published, publicly listed comics, newest update first.
    pub fn list_published(&self) -> DomainResult<Vec<Comic>> {
        Ok(self
            .db
            .list_comics_by_status(ComicStatus::Published)?
            .into_iter()
            .filter(|c| c.visibility == Visibility::Public)
            .collect())
    }

    /// The admin review queue.
    pub fn list_pending(&self) -> DomainResult<Vec<Comic>> {
        Ok(self.db.list_comics_by_status(ComicStatus::PendingReview)?)
    }

    pub fn list_by_creator(&self, creator_id: &str) -> DomainResult<Vec<Comic>> {
        self.db
            .get_user(creator_id)?
            .ok_or(DomainError::NotFound("user"))?;
        Ok(self.db.list_comics_by_creator(creator_id)?)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn owned_comic(&self, comic_id: &str, requester_id: &str) -> DomainResult<Comic> {
        let comic = self
            .db
            .get_comic(comic_id)?
            .ok_or(DomainError::NotFound("comic"))?;
        if comic.creator_id != requester_id {
            return Err(DomainError::Unauthorized);
        }
        Ok(comic)
    }

    /// Move one draft asset to the public tier and rewrite its URL.
    /// `moved` holds the source paths already moved during this approval.
    async fn promote_asset(
        &self,
        url: &mut String,
        moved: &mut HashSet<String>,
    ) -> DomainResult<()> {
        let Some(plan) = PromotionPlan::for_url(url, MEDIA_BUCKET) else {
            if url.contains("/drafts/") {
                warn!(url = %url, "Draft-looking URL outside the media bucket left as is");
            }
            return Ok(());
        };
        if moved.contains(&plan.source_path) {
            *url = plan.public_url;
            return Ok(());
        }

        if let Err(e) = self
            .storage
            .move_object(MEDIA_BUCKET, &plan.source_path, &plan.dest_path)
            .await
        {
            tracing::error!(
                source = %plan.source_path,
                error = %e,
                "Failed to move asset to the public tier"
            );
            return Err(e.into());
        }

        moved.insert(plan.source_path);
        *url = plan.public_url;
        Ok(())
    }

    /// Resolve tag inputs to slugs, creating tags that do not exist yet.
    fn materialize_tags(&self, inputs: &[TagInput]) -> DomainResult<Vec<String>> {
        let mut slugs: Vec<String> = Vec::with_capacity(inputs.len());

        for input in inputs {
            let name = input
                .translations
                .first()
                .map(|t| t.name.as_str())
                .unwrap_or_default();
            let slug = slugify(name);
            if slug.is_empty() {
                return Err(DomainError::InvalidInput(format!(
                    "tag name '{name}' does not produce a usable slug"
                )));
            }
            if slugs.contains(&slug) {
                continue;
            }

            if self.db.get_tag(&slug)?.is_none() {
                let now = Utc::now();
                let tag = Tag {
                    id: uuid::Uuid::new_v4().to_string(),
                    slug: slug.clone(),
                    tag_type: input
                        .tag_type
                        .clone()
                        .filter(|t| !t.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_TAG_TYPE.to_string()),
                    translations: input
                        .translations
                        .iter()
                        .filter(|t| !t.name.trim().is_empty())
                        .cloned()
                        .collect(),
                    created_at: now,
                    updated_at: now,
                };
                self.db.put_tag(&tag)?;
                debug!(slug = %slug, "Created tag");
            }
            slugs.push(slug);
        }

        Ok(slugs)
    }

    /// Promote a plain user to creator once they own a comic.
    ///
    /// Fire-and-forget: this may silently fail. Errors are logged and never
    /// reach the caller, whose comic is already stored.
    fn promote_to_creator(&self, user_id: &str) {
        let mut user = match self.db.get_user(user_id) {
            Ok(Some(user)) if user.role == Role::User => user,
            Ok(_) => return,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Role promotion lookup failed");
                return;
            }
        };

        user.role = Role::Creator;
        user.updated_at = Utc::now();
        match self.db.put_user(&user) {
            Ok(()) => info!(user_id = %user_id, "Promoted user to creator"),
            Err(e) => warn!(user_id = %user_id, error = %e, "Role promotion failed"),
        }
    }
}

/// Language codes must be present and unique within one payload.
fn validate_translations(translations: &[ComicTranslation]) -> DomainResult<()> {
    let mut seen = HashSet::new();
    for t in translations {
        let language = t.language.trim();
        if language.is_empty() {
            return Err(DomainError::InvalidInput(
                "translation language must not be empty".to_string(),
            ));
        }
        if !seen.insert(language) {
            return Err(DomainError::InvalidInput(format!(
                "duplicate translation for language '{language}'"
            )));
        }
    }
    Ok(())
}
