/// Data models for the Circlo API
///
/// Rows are owned by Postgres; server-generated ids are UUIDs while user
/// identities are opaque subjects issued by the external identity
/// provider. Wire names are camelCase to match the client contract.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Reaction kind enumeration (fixed emoji set)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Love,
    Laugh,
    Angry,
    Smile,
}

impl ReactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Love => "love",
            ReactionKind::Laugh => "laugh",
            ReactionKind::Angry => "angry",
            ReactionKind::Smile => "smile",
        }
    }
}

impl TryFrom<&str> for ReactionKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "love" => Ok(ReactionKind::Love),
            "laugh" => Ok(ReactionKind::Laugh),
            "angry" => Ok(ReactionKind::Angry),
            "smile" => Ok(ReactionKind::Smile),
            other => Err(format!("Unknown reaction kind: {}", other)),
        }
    }
}

/// Post visibility enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Followers,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Followers => "followers",
            Visibility::Private => "private",
        }
    }
}

/// Media kind derived from the uploaded file's MIME type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// MIME-prefix inspection: anything that is not video/* is an image.
    pub fn from_mime(content_type: &str) -> Self {
        match content_type.parse::<mime::Mime>() {
            Ok(parsed) if parsed.type_() == mime::VIDEO => MediaKind::Video,
            _ => MediaKind::Image,
        }
    }
}

/// Notification kind enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
    Message,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
            NotificationKind::Follow => "follow",
            NotificationKind::Message => "message",
        }
    }
}

/// A media attachment on a post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaItem {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

/// Identity profile keyed by the external auth subject
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub subject: String,
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub links: Vec<String>,
    pub is_verified: bool,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Social post with denormalized engagement counters.
///
/// The counters are advisory display data maintained by separate atomic
/// increments; they track the child collections only eventually.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub author_id: String,
    pub text: String,
    pub media: Json<Vec<MediaItem>>,
    pub like_count: i64,
    pub comment_count: i64,
    pub share_count: i64,
    pub visibility: String,
    pub hashtags: Vec<String>,
    pub mentions: Vec<String>,
    pub shared_from: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment on a post
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: String,
    pub text: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reaction, unique per (post, user)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

/// Directed follow edge, unique per ordered (follower, followee)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    pub id: Uuid,
    pub follower_id: String,
    pub followee_id: String,
    pub created_at: DateTime<Utc>,
}

/// Direct message with read marker
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub from_id: String,
    pub to_id: String,
    pub text: Option<String>,
    pub media_url: Option<String>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Notification fan-out record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    pub kind: String,
    pub actor_id: String,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub message_id: Option<Uuid>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Time-bounded story
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: Uuid,
    pub author_id: String,
    pub url: String,
    pub kind: String,
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaction_kind_round_trips_through_strings() {
        for kind in [
            ReactionKind::Love,
            ReactionKind::Laugh,
            ReactionKind::Angry,
            ReactionKind::Smile,
        ] {
            assert_eq!(ReactionKind::try_from(kind.as_str()), Ok(kind));
        }
        assert!(ReactionKind::try_from("wave").is_err());
    }

    #[test]
    fn media_kind_uses_mime_prefix() {
        assert_eq!(MediaKind::from_mime("video/mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime("video/webm"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime("image/png"), MediaKind::Image);
        assert_eq!(MediaKind::from_mime("application/pdf"), MediaKind::Image);
    }

    #[test]
    fn media_item_serializes_with_type_field() {
        let item = MediaItem {
            url: "https://example.com/a.png".to_string(),
            kind: MediaKind::Image,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["url"], "https://example.com/a.png");
    }

    #[test]
    fn notification_kind_strings() {
        assert_eq!(NotificationKind::Like.as_str(), "like");
        assert_eq!(NotificationKind::Comment.as_str(), "comment");
        assert_eq!(NotificationKind::Follow.as_str(), "follow");
        assert_eq!(NotificationKind::Message.as_str(), "message");
    }
}
