/// Reaction service - the toggle state machine and its fan-out
///
/// States per (post, user): none or reacted-as-X. The transition is
/// decided up front by `plan_toggle` (pure, so the state machine is
/// testable in isolation) and then executed as a sequence of independent
/// writes in `toggle`.
use crate::db::{notification_repo, post_repo, reaction_repo};
use crate::db::notification_repo::NotificationRefs;
use crate::error::{AppError, Result};
use crate::models::{NotificationKind, ReactionKind};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Transition chosen for a toggle request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// none -> reacted: insert + increment + notify
    Added(ReactionKind),
    /// reacted-as-X -> none on a repeat of X: delete + decrement
    Removed,
    /// reacted-as-X -> reacted-as-Y: delete + decrement, insert +
    /// increment, notify. Net counter effect zero, via two writes.
    Switched { to: ReactionKind },
}

/// Decide the transition for a toggle request given the current state.
pub fn plan_toggle(existing: Option<ReactionKind>, requested: ReactionKind) -> ToggleOutcome {
    match existing {
        None => ToggleOutcome::Added(requested),
        Some(current) if current == requested => ToggleOutcome::Removed,
        Some(_) => ToggleOutcome::Switched { to: requested },
    }
}

/// Toggle response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResult {
    pub is_liked: bool,
    pub like_count: i64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ReactionKind>,
}

pub struct ReactionService {
    pool: PgPool,
}

impl ReactionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Toggle the caller's reaction on a post.
    ///
    /// Every step is an independent write; the switch path performs a
    /// decrement immediately followed by an increment, so other readers
    /// can observe a transient undercount between the two.
    pub async fn toggle(
        &self,
        post_id: Uuid,
        user_id: &str,
        requested: ReactionKind,
    ) -> Result<ToggleResult> {
        let post = post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        let existing = reaction_repo::find_reaction(&self.pool, post_id, user_id)
            .await?
            .map(|r| ReactionKind::try_from(r.kind.as_str()))
            .transpose()
            .map_err(AppError::Internal)?;

        let outcome = plan_toggle(existing, requested);

        match outcome {
            ToggleOutcome::Added(kind) => {
                reaction_repo::create_reaction(&self.pool, post_id, user_id, kind.as_str())
                    .await?;
                post_repo::adjust_like_count(&self.pool, post_id, 1).await?;
                self.notify_author(&post.author_id, user_id, post_id).await?;
            }
            ToggleOutcome::Removed => {
                reaction_repo::delete_reaction(&self.pool, post_id, user_id).await?;
                post_repo::adjust_like_count(&self.pool, post_id, -1).await?;
            }
            ToggleOutcome::Switched { to } => {
                reaction_repo::delete_reaction(&self.pool, post_id, user_id).await?;
                post_repo::adjust_like_count(&self.pool, post_id, -1).await?;
                reaction_repo::create_reaction(&self.pool, post_id, user_id, to.as_str()).await?;
                post_repo::adjust_like_count(&self.pool, post_id, 1).await?;
                self.notify_author(&post.author_id, user_id, post_id).await?;
            }
        }

        let like_count = post_repo::get_like_count(&self.pool, post_id).await?;

        Ok(match outcome {
            ToggleOutcome::Added(kind) => ToggleResult {
                is_liked: true,
                like_count,
                kind: Some(kind),
            },
            ToggleOutcome::Switched { to } => ToggleResult {
                is_liked: true,
                like_count,
                kind: Some(to),
            },
            ToggleOutcome::Removed => ToggleResult {
                is_liked: false,
                like_count,
                kind: None,
            },
        })
    }

    /// Current reaction state for the caller
    pub async fn check(&self, post_id: Uuid, user_id: &str) -> Result<Option<ReactionKind>> {
        let existing = reaction_repo::find_reaction(&self.pool, post_id, user_id)
            .await?
            .map(|r| ReactionKind::try_from(r.kind.as_str()))
            .transpose()
            .map_err(AppError::Internal)?;

        Ok(existing)
    }

    async fn notify_author(&self, post_author: &str, actor: &str, post_id: Uuid) -> Result<()> {
        if post_author == actor {
            return Ok(());
        }

        notification_repo::create_notification(
            &self.pool,
            post_author,
            NotificationKind::Like.as_str(),
            actor,
            NotificationRefs {
                post_id: Some(post_id),
                ..Default::default()
            },
        )
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn react_on_clean_state_adds() {
        assert_eq!(
            plan_toggle(None, ReactionKind::Love),
            ToggleOutcome::Added(ReactionKind::Love)
        );
    }

    #[test]
    fn repeating_the_same_kind_removes() {
        assert_eq!(
            plan_toggle(Some(ReactionKind::Love), ReactionKind::Love),
            ToggleOutcome::Removed
        );
        assert_eq!(
            plan_toggle(Some(ReactionKind::Smile), ReactionKind::Smile),
            ToggleOutcome::Removed
        );
    }

    #[test]
    fn different_kind_switches() {
        assert_eq!(
            plan_toggle(Some(ReactionKind::Love), ReactionKind::Angry),
            ToggleOutcome::Switched {
                to: ReactionKind::Angry
            }
        );
    }

    #[test]
    fn double_toggle_returns_to_clean_state() {
        // react(X) then react(X) again must end with no reaction
        let first = plan_toggle(None, ReactionKind::Laugh);
        assert_eq!(first, ToggleOutcome::Added(ReactionKind::Laugh));

        let second = plan_toggle(Some(ReactionKind::Laugh), ReactionKind::Laugh);
        assert_eq!(second, ToggleOutcome::Removed);
    }

    #[test]
    fn switch_has_zero_net_counter_effect() {
        // A switch decrements then increments: the plan carries both a
        // removal and an addition of one reaction.
        let outcome = plan_toggle(Some(ReactionKind::Love), ReactionKind::Smile);
        match outcome {
            ToggleOutcome::Switched { to } => assert_eq!(to, ReactionKind::Smile),
            other => panic!("expected switch, got {:?}", other),
        }
    }
}
