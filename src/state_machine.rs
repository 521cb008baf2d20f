//! Moderation state machine for comics.
//!
//! ```text
//! draft ────request_publish───▶ pending_review ──approve──▶ published
//!                                 │        ▲
//!                              reject      │
//!                                 ▼        │
//!                              rejected ───┘ request_publish
//! ```
//!
//! Approval and rejection are admin actions and are not guarded by the
//! current status: re-approving is a no-op for already public assets, and a
//! published comic can still be pulled with a rejection.

use crate::error::DomainError;
use crate::storage::models::ComicStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    RequestPublish,
    Approve,
    Reject,
}

impl ComicStatus {
    /// Whether the creator may edit and (re)submit the comic.
    pub fn is_editable(&self) -> bool {
        matches!(self, ComicStatus::Draft | ComicStatus::Rejected)
    }

    /// The status reached by applying `transition`, or an error if the
    /// transition is not allowed from here.
    pub fn apply(self, transition: Transition) -> Result<ComicStatus, DomainError> {
        match transition {
            Transition::RequestPublish if self.is_editable() => Ok(ComicStatus::PendingReview),
            Transition::RequestPublish => Err(DomainError::InvalidStatus(format!(
                "only drafts or rejected comics can be submitted for review (status is {})",
                self.as_str()
            ))),
            Transition::Approve => Ok(ComicStatus::Published),
            Transition::Reject => Ok(ComicStatus::Rejected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_publish_only_from_draft_or_rejected() {
        assert_eq!(
            ComicStatus::Draft.apply(Transition::RequestPublish).unwrap(),
            ComicStatus::PendingReview
        );
        assert_eq!(
            ComicStatus::Rejected
                .apply(Transition::RequestPublish)
                .unwrap(),
            ComicStatus::PendingReview
        );
        assert!(matches!(
            ComicStatus::PendingReview.apply(Transition::RequestPublish),
            Err(DomainError::InvalidStatus(_))
        ));
        assert!(matches!(
            ComicStatus::Published.apply(Transition::RequestPublish),
            Err(DomainError::InvalidStatus(_))
        ));
    }

    #[test]
    fn admin_transitions_are_unguarded() {
        for status in [
            ComicStatus::Draft,
            ComicStatus::PendingReview,
            ComicStatus::Published,
            ComicStatus::Rejected,
        ] {
            assert_eq!(
                status.apply(Transition::Approve).unwrap(),
                ComicStatus::Published
            );
            assert_eq!(
                status.apply(Transition::Reject).unwrap(),
                ComicStatus::Rejected
            );
        }
    }
}
