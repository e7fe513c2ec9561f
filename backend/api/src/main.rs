use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use circlo_api::auth::RealtimeTokenMinter;
use circlo_api::handlers::{self, realtime::RealtimeState};
use circlo_api::middleware::{
    AuthMiddleware, AuthSettings, RateLimitConfig, RateLimitMiddleware, RateLimiter,
};
use circlo_api::services::MediaStorage;
use circlo_api::{auth, db};
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn health(pool: web::Data<sqlx::PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "circlo-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("database connection failed: {}", e),
            "service": "circlo-api"
        })),
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match circlo_api::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting circlo-api v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    match (&config.auth.jwt_public_key, &config.auth.dev_subject) {
        (Some(public_key), _) => {
            if let Err(err) = auth::initialize_validation_key(public_key) {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("Failed to initialize JWT validation key: {err}"),
                ));
            }
        }
        (None, Some(subject)) => {
            tracing::warn!(
                "Auth bypass enabled; every request acts as '{}' (development only)",
                subject
            );
        }
        (None, None) => {
            tracing::warn!(
                "AUTH_JWT_PUBLIC_KEY not configured; authentication middleware will fail requests"
            );
        }
    }

    let db_pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(8))
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Connected to database");

    db::ensure_schema(&db_pool).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to ensure database schema: {e}"),
        )
    })?;

    let storage = MediaStorage::new(config.uploads.dir.clone(), config.uploads.max_bytes);
    storage.ensure_dir().await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to create upload directory: {e}"),
        )
    })?;

    let realtime_state = match (
        &config.realtime.service_account_email,
        &config.realtime.private_key,
    ) {
        (Some(email), Some(key)) => match RealtimeTokenMinter::new(email.clone(), key) {
            Ok(minter) => RealtimeState {
                minter: Some(Arc::new(minter)),
            },
            Err(e) => {
                tracing::error!("Invalid real-time credentials: {}", e);
                eprintln!("ERROR: Invalid real-time credentials: {}", e);
                std::process::exit(1);
            }
        },
        _ => {
            tracing::warn!(
                "Real-time credentials not configured; /api/realtime/token will fail requests"
            );
            RealtimeState::default()
        }
    };

    let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        max_requests: config.rate_limit.max_requests,
        window: Duration::from_secs(config.rate_limit.window_seconds),
    }));

    let auth_settings = AuthSettings {
        dev_subject: config.auth.dev_subject.clone(),
    };

    // Story expiry sweeper runs for the lifetime of the process
    tokio::spawn(circlo_api::jobs::story_sweeper::start_story_sweeper(
        db_pool.clone(),
        storage.clone(),
    ));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let upload_dir = config.uploads.dir.clone();
    let allowed_origins = config.cors.allowed_origins.clone();

    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(realtime_state.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/api/health", web::get().to(health))
            .service(actix_files::Files::new("/uploads", upload_dir.clone()))
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(auth_settings.clone()))
                    .wrap(RateLimitMiddleware::new(rate_limiter.clone()))
                    .service(
                        web::scope("/posts")
                            .service(
                                web::resource("")
                                    .route(web::get().to(handlers::posts::list_posts))
                                    .route(web::post().to(handlers::posts::create_post)),
                            )
                            .service(
                                web::resource("/{post_id}")
                                    .route(web::get().to(handlers::posts::get_post))
                                    .route(web::patch().to(handlers::posts::update_post))
                                    .route(web::delete().to(handlers::posts::delete_post)),
                            )
                            .route("/{post_id}/repost", web::post().to(handlers::posts::repost)),
                    )
                    .service(
                        web::scope("/profiles")
                            .service(
                                web::resource("/me")
                                    .route(web::get().to(handlers::profiles::me))
                                    .route(web::patch().to(handlers::profiles::update_me)),
                            )
                            .route(
                                "/{subject}/posts",
                                web::get().to(handlers::profiles::user_posts),
                            )
                            .route("/{subject}", web::get().to(handlers::profiles::get_profile)),
                    )
                    .service(
                        web::scope("/comments")
                            .service(
                                web::resource("")
                                    .route(web::get().to(handlers::comments::list_comments))
                                    .route(web::post().to(handlers::comments::create_comment)),
                            )
                            .route(
                                "/{comment_id}",
                                web::delete().to(handlers::comments::delete_comment),
                            ),
                    )
                    .service(
                        web::scope("/reactions")
                            .route(
                                "/toggle",
                                web::post().to(handlers::reactions::toggle_reaction),
                            )
                            .route("/check", web::get().to(handlers::reactions::check_reaction)),
                    )
                    .service(
                        web::scope("/follows")
                            .service(
                                web::resource("").route(web::post().to(handlers::follows::follow)),
                            )
                            .route(
                                "/followers/{subject}",
                                web::get().to(handlers::follows::list_followers),
                            )
                            .route(
                                "/following/{subject}",
                                web::get().to(handlers::follows::list_following),
                            )
                            .route(
                                "/{followee_id}",
                                web::delete().to(handlers::follows::unfollow),
                            ),
                    )
                    .service(
                        web::scope("/messages")
                            .route(
                                "/conversations",
                                web::get().to(handlers::messages::list_conversations),
                            )
                            .service(
                                web::resource("")
                                    .route(web::post().to(handlers::messages::send_message)),
                            )
                            .service(
                                web::resource("/{subject}")
                                    .route(web::get().to(handlers::messages::get_thread))
                                    .route(web::delete().to(handlers::messages::delete_message)),
                            ),
                    )
                    .service(
                        web::scope("/notifications")
                            .service(
                                web::resource("")
                                    .route(web::get().to(handlers::notifications::list_notifications)),
                            )
                            .route(
                                "/read-all",
                                web::patch().to(handlers::notifications::mark_all_read),
                            )
                            .route(
                                "/{notification_id}/read",
                                web::patch().to(handlers::notifications::mark_read),
                            ),
                    )
                    .service(
                        web::scope("/search")
                            .route("/users", web::get().to(handlers::search::user_suggestions))
                            .service(
                                web::resource("").route(web::get().to(handlers::search::search)),
                            ),
                    )
                    .service(
                        web::scope("/stories")
                            .service(
                                web::resource("")
                                    .route(web::get().to(handlers::stories::list_stories))
                                    .route(web::post().to(handlers::stories::create_story)),
                            )
                            .service(
                                web::resource("/{story_id}")
                                    .route(web::patch().to(handlers::stories::update_story))
                                    .route(web::delete().to(handlers::stories::delete_story)),
                            ),
                    )
                    .service(
                        web::scope("/media")
                            .service(web::resource("").route(web::post().to(handlers::media::upload))),
                    )
                    .service(
                        web::scope("/realtime")
                            .route("/token", web::post().to(handlers::realtime::mint_token)),
                    ),
            )
    })
    .bind(&bind_address)?
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    tokio::select! {
        result = server_task => {
            match result {
                Ok(outcome) => outcome?,
                Err(e) => {
                    return Err(io::Error::new(io::ErrorKind::Other, e.to_string()));
                }
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
        }
    }

    tracing::info!("circlo-api shutting down");

    Ok(())
}
