use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use presently::auth::{middleware::require_auth, middleware::require_json_content_type, rate_limit::RateLimiter};
use presently::config::AppConfig;
use presently::errors::ApiErrorResponse;
use presently::{db, generate, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cfg = AppConfig::from_env();

    // Ensure data directories exist
    std::fs::create_dir_all(&cfg.presentations_dir)
        .expect("Failed to create presentations directory");

    // Initialize database
    let db_path = cfg.data_dir.join("app.db");
    let pool = db::init_pool(db_path.to_str().expect("Data dir is not valid UTF-8"));
    db::run_migrations(&pool);

    let http = generate::client::build_client(&cfg.generator);
    let limiter = RateLimiter::for_login();

    // Session encryption key — load from SESSION_KEY env var for persistent sessions across restarts
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+) — generating random key", val.len());
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    log::info!("Starting server at http://127.0.0.1:8080");
    log::info!("Content generator at {}", cfg.generator.endpoint);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(cfg.clone()))
            .app_data(web::Data::new(http.clone()))
            .app_data(web::Data::new(limiter.clone()))
            // SPA assets
            .service(actix_files::Files::new("/static", "./static"))
            // Public routes
            .service(
                web::resource("/login")
                    .wrap(actix_web::middleware::from_fn(require_json_content_type))
                    .route(web::post().to(handlers::auth_handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(actix_web::middleware::from_fn(require_json_content_type))
                    .route(web::post().to(handlers::auth_handlers::register)),
            )
            .route("/logout", web::post().to(handlers::auth_handlers::logout))
            .route("/api/templates", web::get().to(handlers::presentation_handlers::templates))
            // Downloads are addressed by opaque generated filenames
            .route(
                "/download-presentation/{filename}",
                web::get().to(handlers::presentation_handlers::download),
            )
            // Protected routes
            .service(
                web::scope("")
                    .wrap(actix_web::middleware::from_fn(require_auth))
                    .route(
                        "/generate-presentation",
                        web::post().to(handlers::presentation_handlers::generate),
                    )
                    .service(
                        web::scope("/api")
                            .wrap(actix_web::middleware::from_fn(require_json_content_type))
                            .route(
                                "/my-presentations",
                                web::get().to(handlers::presentation_handlers::my_presentations),
                            )
                            .route("/user", web::get().to(handlers::auth_handlers::current_user))
                            .route("/profile", web::get().to(handlers::profile_handlers::show))
                            .route("/profile", web::post().to(handlers::profile_handlers::update)),
                    ),
            )
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound().json(ApiErrorResponse {
                    error: "Not found".to_string(),
                    details: None,
                })
            }))
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
}
