//! Middleware behavior against a real actix service, no database needed.

use actix_web::dev::Service;
use actix_web::{test, web, App, HttpResponse};
use circlo_api::middleware::{
    AuthMiddleware, AuthSettings, AuthUser, RateLimitConfig, RateLimitMiddleware, RateLimiter,
};
use std::sync::Arc;
use std::time::Duration;

async fn whoami(user: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "subject": user.0 }))
}

#[actix_web::test]
async fn missing_authorization_header_is_rejected() {
    let app = test::init_service(
        App::new().service(
            web::scope("/api")
                .wrap(AuthMiddleware::new(AuthSettings::default()))
                .route("/whoami", web::get().to(whoami)),
        ),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/whoami").to_request();
    let err = app.call(req).await.err().expect("request should fail");
    assert_eq!(err.as_response_error().status_code(), 401);
}

#[actix_web::test]
async fn non_bearer_scheme_is_rejected() {
    let app = test::init_service(
        App::new().service(
            web::scope("/api")
                .wrap(AuthMiddleware::new(AuthSettings::default()))
                .route("/whoami", web::get().to(whoami)),
        ),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .insert_header(("Authorization", "Token abc123"))
        .to_request();
    let err = app.call(req).await.err().expect("request should fail");
    assert_eq!(err.as_response_error().status_code(), 401);
}

#[actix_web::test]
async fn garbage_bearer_token_is_rejected() {
    let app = test::init_service(
        App::new().service(
            web::scope("/api")
                .wrap(AuthMiddleware::new(AuthSettings::default()))
                .route("/whoami", web::get().to(whoami)),
        ),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let err = app.call(req).await.err().expect("request should fail");
    assert_eq!(err.as_response_error().status_code(), 401);
}

#[actix_web::test]
async fn dev_subject_bypasses_validation() {
    let settings = AuthSettings {
        dev_subject: Some("dev_user_123".to_string()),
    };

    let app = test::init_service(
        App::new().service(
            web::scope("/api")
                .wrap(AuthMiddleware::new(settings))
                .route("/whoami", web::get().to(whoami)),
        ),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/whoami").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["subject"], "dev_user_123");
}

#[actix_web::test]
async fn requests_over_the_window_budget_get_429() {
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        max_requests: 2,
        window: Duration::from_secs(60),
    }));

    let app = test::init_service(
        App::new().service(
            web::scope("/api")
                .wrap(RateLimitMiddleware::new(limiter))
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
        ),
    )
    .await;

    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/api/ping").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    let req = test::TestRequest::get().uri("/api/ping").to_request();
    let err = app.call(req).await.err().expect("third request should fail");
    assert_eq!(err.as_response_error().status_code(), 429);
}

#[actix_web::test]
async fn window_elapses_and_budget_resets() {
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        max_requests: 1,
        window: Duration::from_millis(30),
    }));

    let app = test::init_service(
        App::new().service(
            web::scope("/api")
                .wrap(RateLimitMiddleware::new(limiter))
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
        ),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/ping").to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = test::TestRequest::get().uri("/api/ping").to_request();
    assert!(app.call(req).await.is_err());

    tokio::time::sleep(Duration::from_millis(40)).await;

    let req = test::TestRequest::get().uri("/api/ping").to_request();
    assert!(test::call_service(&app, req).await.status().is_success());
}
