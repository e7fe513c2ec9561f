/// Search service - case-insensitive substring search over users and posts
use crate::db::{follow_repo, post_repo, user_repo};
use crate::error::Result;
use crate::models::{Post, User};
use crate::services::profiles::ProfileStats;
use serde::Serialize;
use sqlx::PgPool;

/// Results per category
const CATEGORY_LIMIT: i64 = 20;

/// Which categories a search request covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    Users,
    Posts,
    All,
}

impl SearchScope {
    pub fn from_param(value: &str) -> Self {
        match value {
            "users" => SearchScope::Users,
            "posts" => SearchScope::Posts,
            _ => SearchScope::All,
        }
    }

    fn includes_users(&self) -> bool {
        matches!(self, SearchScope::Users | SearchScope::All)
    }

    fn includes_posts(&self) -> bool {
        matches!(self, SearchScope::Posts | SearchScope::All)
    }
}

/// Search response; absent categories are omitted from the JSON
#[derive(Debug, Serialize)]
pub struct SearchResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<Post>>,
}

/// Suggestion entry: a not-yet-followed user with their counts
#[derive(Debug, Serialize)]
pub struct UserWithStats {
    #[serde(flatten)]
    pub user: User,
    pub stats: ProfileStats,
}

pub struct SearchService {
    pool: PgPool,
}

impl SearchService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn search(&self, query: &str, scope: SearchScope) -> Result<SearchResults> {
        let users = if scope.includes_users() {
            Some(user_repo::search(&self.pool, query, CATEGORY_LIMIT).await?)
        } else {
            None
        };

        let posts = if scope.includes_posts() {
            Some(post_repo::search(&self.pool, query, CATEGORY_LIMIT).await?)
        } else {
            None
        };

        Ok(SearchResults { users, posts })
    }

    /// People-you-may-know: users the caller does not follow yet, with
    /// their profile counts.
    pub async fn suggestions(&self, subject: &str, limit: i64) -> Result<Vec<UserWithStats>> {
        let users = user_repo::find_suggestions(&self.pool, subject, limit).await?;

        let mut suggestions = Vec::with_capacity(users.len());
        for user in users {
            let stats = ProfileStats {
                post_count: post_repo::count_posts(&self.pool, Some(&user.subject)).await?,
                follower_count: follow_repo::count_followers(&self.pool, &user.subject).await?,
                following_count: follow_repo::count_following(&self.pool, &user.subject).await?,
            };
            suggestions.push(UserWithStats { user, stats });
        }

        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_parses_known_values() {
        assert_eq!(SearchScope::from_param("users"), SearchScope::Users);
        assert_eq!(SearchScope::from_param("posts"), SearchScope::Posts);
        assert_eq!(SearchScope::from_param("all"), SearchScope::All);
        assert_eq!(SearchScope::from_param("garbage"), SearchScope::All);
    }

    #[test]
    fn scope_category_membership() {
        assert!(SearchScope::All.includes_users());
        assert!(SearchScope::All.includes_posts());
        assert!(SearchScope::Users.includes_users());
        assert!(!SearchScope::Users.includes_posts());
        assert!(!SearchScope::Posts.includes_users());
    }
}
