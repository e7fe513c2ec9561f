/// Search handlers
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::services::search::SearchScope;
use crate::services::SearchService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    pub limit: Option<i64>,
}

/// Search responses must never be cached: results depend on the viewer
/// and change with every write.
fn no_store(mut response: HttpResponse) -> HttpResponse {
    let headers = response.headers_mut();
    headers.insert(
        actix_web::http::header::CACHE_CONTROL,
        actix_web::http::header::HeaderValue::from_static("no-store, no-cache, must-revalidate"),
    );
    headers.insert(
        actix_web::http::header::PRAGMA,
        actix_web::http::header::HeaderValue::from_static("no-cache"),
    );
    response
}

/// Search users and/or posts by substring
pub async fn search(
    pool: web::Data<PgPool>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let q = query
        .q
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Query parameter required".to_string()))?;

    let scope = SearchScope::from_param(query.scope.as_deref().unwrap_or("all"));

    let service = SearchService::new((**pool).clone());
    let results = service.search(q, scope).await?;

    Ok(no_store(HttpResponse::Ok().json(results)))
}

/// People-you-may-know suggestions for the caller
pub async fn user_suggestions(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<SuggestionsQuery>,
) -> Result<HttpResponse> {
    let limit = query.limit.unwrap_or(10).clamp(1, 50);

    let service = SearchService::new((**pool).clone());
    let users = service.suggestions(&user.0, limit).await?;

    Ok(no_store(
        HttpResponse::Ok().json(serde_json::json!({ "users": users })),
    ))
}
