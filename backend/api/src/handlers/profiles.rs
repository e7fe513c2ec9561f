/// Profile handlers - identity profiles and their post listings
use crate::db::user_repo::ProfilePatch;
use crate::error::{AppError, Result};
use crate::handlers::posts::{PaginationMeta, PostListResponse};
use crate::middleware::AuthUser;
use crate::services::{PostService, ProfileService};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use validator::{Validate, ValidateUrl};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 30))]
    pub username: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
    #[validate(length(max = 5))]
    pub links: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UserPostsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn validate_username_charset(username: &str) -> Result<()> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Username may only contain letters, digits and underscores".to_string(),
        ))
    }
}

/// Current user's profile, auto-created on first access
pub async fn me(pool: web::Data<PgPool>, user: AuthUser) -> Result<HttpResponse> {
    let service = ProfileService::new((**pool).clone());
    let profile = service.me(&user.0).await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Another user's profile with follow state for the viewer
pub async fn get_profile(
    pool: web::Data<PgPool>,
    user: AuthUser,
    subject: web::Path<String>,
) -> Result<HttpResponse> {
    let service = ProfileService::new((**pool).clone());
    let profile = service.get(&subject, &user.0).await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Partial update of the current user's profile
pub async fn update_me(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    if let Some(username) = &req.username {
        validate_username_charset(username)?;
    }

    if let Some(links) = &req.links {
        for link in links {
            if !link.validate_url() {
                return Err(AppError::BadRequest(format!("Invalid link URL: {}", link)));
            }
        }
    }

    let patch = ProfilePatch {
        username: req.username.map(|u| u.to_lowercase()),
        name: req.name,
        bio: req.bio,
        avatar_url: req.avatar_url,
        links: req.links,
    };

    let service = ProfileService::new((**pool).clone());
    let updated = service.update(&user.0, patch).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// A user's posts, paginated
pub async fn user_posts(
    pool: web::Data<PgPool>,
    subject: web::Path<String>,
    query: web::Query<UserPostsQuery>,
) -> Result<HttpResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * limit;

    let service = PostService::new((**pool).clone());
    let (posts, total) = service
        .list_posts(Some(subject.as_str()), limit, offset)
        .await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts,
        pagination: PaginationMeta {
            page,
            limit,
            total,
            pages: (total + limit - 1) / limit,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_charset_accepts_word_characters() {
        assert!(validate_username_charset("alice_42").is_ok());
        assert!(validate_username_charset("Bob").is_ok());
    }

    #[test]
    fn username_charset_rejects_punctuation() {
        assert!(validate_username_charset("al ice").is_err());
        assert!(validate_username_charset("al.ice").is_err());
        assert!(validate_username_charset("名前").is_err());
    }

    #[test]
    fn update_profile_request_enforces_lengths() {
        let req = UpdateProfileRequest {
            username: Some("ab".to_string()),
            name: None,
            bio: None,
            avatar_url: None,
            links: None,
        };
        assert!(req.validate().is_err());

        let req = UpdateProfileRequest {
            username: Some("abc".to_string()),
            name: None,
            bio: None,
            avatar_url: None,
            links: None,
        };
        assert!(req.validate().is_ok());
    }
}
