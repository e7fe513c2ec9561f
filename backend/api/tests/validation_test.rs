//! Request validation behavior through real endpoints.
//!
//! Uses a lazy pool: every case here must be rejected before any query
//! is issued, so no database is required.

use actix_web::{test, web, App};
use circlo_api::handlers;
use circlo_api::middleware::{AuthMiddleware, AuthSettings};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgresql://localhost:1/unreachable")
        .expect("lazy pool")
}

fn dev_auth() -> AuthMiddleware {
    AuthMiddleware::new(AuthSettings {
        dev_subject: Some("dev_user_123".to_string()),
    })
}

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .service(
                    web::scope("/api")
                        .wrap(dev_auth())
                        .route(
                            "/comments",
                            web::post().to(handlers::comments::create_comment),
                        )
                        .route("/follows", web::post().to(handlers::follows::follow))
                        .route(
                            "/messages",
                            web::post().to(handlers::messages::send_message),
                        )
                        .route("/search", web::get().to(handlers::search::search))
                        .route(
                            "/reactions/check",
                            web::get().to(handlers::reactions::check_reaction),
                        ),
                ),
        )
    };
}

#[actix_web::test]
async fn empty_comment_text_is_a_client_error() {
    let app = test_app!().await;

    let req = test::TestRequest::post()
        .uri("/api/comments")
        .set_json(serde_json::json!({
            "postId": "7b1a3f86-4f2e-44c8-9c3e-3f61d1a3b111",
            "text": ""
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid input");
    assert!(body["details"].get("text").is_some());
}

#[actix_web::test]
async fn following_yourself_is_a_client_error() {
    let app = test_app!().await;

    let req = test::TestRequest::post()
        .uri("/api/follows")
        .set_json(serde_json::json!({ "followeeId": "dev_user_123" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn messaging_yourself_is_a_client_error() {
    let app = test_app!().await;

    let req = test::TestRequest::post()
        .uri("/api/messages")
        .set_json(serde_json::json!({ "toId": "dev_user_123", "text": "hi me" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn message_without_text_or_media_is_a_client_error() {
    let app = test_app!().await;

    let req = test::TestRequest::post()
        .uri("/api/messages")
        .set_json(serde_json::json!({ "toId": "somebody_else" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn search_requires_a_query() {
    let app = test_app!().await;

    let req = test::TestRequest::get().uri("/api/search").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn reaction_check_requires_post_id() {
    let app = test_app!().await;

    let req = test::TestRequest::get()
        .uri("/api/reactions/check")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
