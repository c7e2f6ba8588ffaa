use actix_multipart::form::MultipartFormConfig;
use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use travelogue_backend::{
    config::Config,
    database::{create_pool, run_migrations, seed_super_admin},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

// Covers up to 5 MB plus PDFs up to 50 MB, with room for the text fields.
const MULTIPART_LIMIT_BYTES: usize = 60 * 1024 * 1024;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration file");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    seed_super_admin(&pool, &config.seed_admin)
        .await
        .expect("Failed to seed super admin account");

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    let file_service = FileService::new(config.uploads.root_dir.clone());
    let log_service = LogService::new(pool.clone());
    let activity_service = ActivityService::new(pool.clone());

    let auth_service = AuthService::new(
        pool.clone(),
        jwt_service.clone(),
        activity_service.clone(),
        log_service.clone(),
    );
    let guide_service = GuideService::new(
        pool.clone(),
        file_service.clone(),
        activity_service.clone(),
        log_service.clone(),
    );
    let category_service = CategoryService::new(pool.clone(), log_service.clone());
    let favorite_service =
        FavoriteService::new(pool.clone(), guide_service.clone(), log_service.clone());
    let user_service = UserService::new(
        pool.clone(),
        guide_service.clone(),
        activity_service.clone(),
    );
    let subscription_service = SubscriptionService::new(pool.clone());
    let admin_service = AdminService::new(
        pool.clone(),
        subscription_service.clone(),
        activity_service.clone(),
        log_service.clone(),
    );

    let uploads_root = config.uploads.root_dir.clone();

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(MULTIPART_LIMIT_BYTES)
                    .memory_limit(MULTIPART_LIMIT_BYTES),
            )
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(guide_service.clone()))
            .app_data(web::Data::new(category_service.clone()))
            .app_data(web::Data::new(favorite_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(subscription_service.clone()))
            .app_data(web::Data::new(admin_service.clone()))
            .app_data(web::Data::new(log_service.clone()))
            .app_data(web::Data::new(activity_service.clone()))
            .configure(swagger_config)
            .service(actix_files::Files::new("/uploads", uploads_root.clone()))
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::guide_config)
                    .configure(handlers::category_config)
                    .configure(handlers::favorite_config)
                    .configure(handlers::user_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
