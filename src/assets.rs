//! Storage tiers for uploaded media.
//!
//! Uploads land in the draft tier; approval moves them to the public tier.
//! Both sides build and parse paths through this module so the convention
//! lives in one place.

/// The only bucket media is written to. Clients cannot choose another one.
pub const MEDIA_BUCKET: &str = "media";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetTier {
    Draft,
    Public,
}

impl AssetTier {
    /// Leading path segment for objects in this tier.
    pub fn segment(&self) -> &'static str {
        match self {
            AssetTier::Draft => "drafts",
            AssetTier::Public => "public",
        }
    }

    /// Bucket-relative path `<tier>/<owner>/<file_name>`.
    pub fn object_path(&self, owner: &str, file_name: &str) -> String {
        format!("{}/{owner}/{file_name}", self.segment())
    }

    /// Split a bucket-relative path into its tier and the key below it.
    pub fn parse(path: &str) -> Option<(AssetTier, &str)> {
        [AssetTier::Draft, AssetTier::Public]
            .into_iter()
            .find_map(|tier| {
                path.strip_prefix(tier.segment())
                    .and_then(|rest| rest.strip_prefix('/'))
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (tier, rest))
            })
    }
}

/// The storage move and URL rewrite needed to publish one draft asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionPlan {
    pub source_path: String,
    pub dest_path: String,
    pub public_url: String,
}

impl PromotionPlan {
    /// Plan the promotion of `url` if it addresses a draft object in `bucket`.
    ///
    /// Returns `None` for URLs that are already public, that point elsewhere,
    /// or that are empty; those are left untouched.
    pub fn for_url(url: &str, bucket: &str) -> Option<PromotionPlan> {
        let marker = format!("/{bucket}/");
        let (prefix, path) = url.split_once(marker.as_str())?;
        let (tier, key) = AssetTier::parse(path)?;
        if tier != AssetTier::Draft {
            return None;
        }

        let dest_path = format!("{}/{key}", AssetTier::Public.segment());
        Some(PromotionPlan {
            source_path: path.to_string(),
            public_url: format!("{prefix}{marker}{dest_path}"),
            dest_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://proj.supabase.co/storage/v1/object/public/media";

    #[test]
    fn object_path_is_namespaced_by_tier_and_owner() {
        assert_eq!(
            AssetTier::Draft.object_path("user-1", "abc.png"),
            "drafts/user-1/abc.png"
        );
        assert_eq!(
            AssetTier::Public.object_path("user-1", "abc.png"),
            "public/user-1/abc.png"
        );
    }

    #[test]
    fn parse_recognises_both_tiers() {
        assert_eq!(
            AssetTier::parse("drafts/u/a.png"),
            Some((AssetTier::Draft, "u/a.png"))
        );
        assert_eq!(
            AssetTier::parse("public/u/a.png"),
            Some((AssetTier::Public, "u/a.png"))
        );
        assert_eq!(AssetTier::parse("draftsy/u/a.png"), None);
        assert_eq!(AssetTier::parse("drafts/"), None);
        assert_eq!(AssetTier::parse("other/a.png"), None);
    }

    #[test]
    fn plans_draft_promotion() {
        let url = format!("{BASE}/drafts/user-1/abc.png");
        let plan = PromotionPlan::for_url(&url, MEDIA_BUCKET).expect("draft url");
        assert_eq!(plan.source_path, "drafts/user-1/abc.png");
        assert_eq!(plan.dest_path, "public/user-1/abc.png");
        assert_eq!(plan.public_url, format!("{BASE}/public/user-1/abc.png"));
    }

    #[test]
    fn skips_public_and_foreign_urls() {
        assert!(PromotionPlan::for_url(&format!("{BASE}/public/u/a.png"), MEDIA_BUCKET).is_none());
        assert!(PromotionPlan::for_url("https://cdn.example.com/drafts/a.png", MEDIA_BUCKET).is_none());
        assert!(PromotionPlan::for_url("", MEDIA_BUCKET).is_none());
    }

    #[test]
    fn only_the_tier_segment_is_rewritten() {
        let url = format!("{BASE}/drafts/user-1/drafts/abc.png");
        let plan = PromotionPlan::for_url(&url, MEDIA_BUCKET).expect("draft url");
        assert_eq!(plan.dest_path, "public/user-1/drafts/abc.png");
        assert_eq!(plan.public_url, format!("{BASE}/public/user-1/drafts/abc.png"));
    }
}
